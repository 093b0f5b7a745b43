//! Client configuration.

use twentyone_countdown::CountdownConfig;

/// Settings for a [`GameClient`](crate::GameClient).
///
/// # Example
///
/// ```rust
/// use twentyone::ClientConfig;
///
/// let config = ClientConfig::new()
///     .server("ws://games.example.com:8080")
///     .player_name("Ada");
/// assert_eq!(config.player_name.as_deref(), Some("Ada"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// WebSocket URL of the game server.
    pub url: String,
    /// Name sent with `create_room` / `join_room`. When `None`, the
    /// client uses `"Player <id>"` from its assigned identity.
    pub player_name: Option<String>,
    /// Auto-leave countdown shown after each round.
    pub countdown: CountdownConfig,
}

impl ClientConfig {
    /// Server used when none is configured.
    pub const DEFAULT_URL: &'static str = "ws://127.0.0.1:8080";

    /// Creates a config with default settings.
    pub fn new() -> Self {
        Self {
            url: Self::DEFAULT_URL.to_string(),
            player_name: None,
            countdown: CountdownConfig::default(),
        }
    }

    /// Sets the server URL.
    pub fn server(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the display name used when creating or joining rooms.
    pub fn player_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = Some(name.into());
        self
    }

    /// Sets the auto-leave countdown.
    pub fn countdown(mut self, countdown: CountdownConfig) -> Self {
        self.countdown = countdown;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
