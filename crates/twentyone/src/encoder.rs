//! User intents and their mapping onto outbound commands.

use twentyone_protocol::{Codec, Command, JsonCodec, PlayerId, ProtocolError, RoomId};

/// Something the user asked for.
///
/// Intents are queued through a [`ClientHandle`](crate::ClientHandle) and
/// handled on the client task, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    RefreshRooms,
    CreateRoom,
    JoinRoom(RoomId),
    LeaveRoom,
    Hit,
    Stand,
    Rematch,
    /// Close the connection and stop the client loop.
    Disconnect,
}

/// Turns intents into commands and commands into text frames.
#[derive(Debug, Clone)]
pub struct CommandEncoder<C: Codec = JsonCodec> {
    codec: C,
    player_name: Option<String>,
}

impl CommandEncoder<JsonCodec> {
    /// A JSON encoder. `player_name` overrides the `"Player <id>"` default.
    pub fn new(player_name: Option<String>) -> Self {
        Self::with_codec(JsonCodec, player_name)
    }
}

impl<C: Codec> CommandEncoder<C> {
    pub fn with_codec(codec: C, player_name: Option<String>) -> Self {
        Self { codec, player_name }
    }

    /// The command an intent sends, if any.
    ///
    /// `player` is our assigned identity, used to name rooms we create or
    /// join when no name is configured.
    pub fn command(&self, intent: &Intent, player: Option<PlayerId>) -> Option<Command> {
        let command = match intent {
            Intent::RefreshRooms => Command::GetRooms,
            Intent::CreateRoom => Command::CreateRoom {
                name: self.display_name(player),
            },
            Intent::JoinRoom(room_id) => Command::JoinRoom {
                room_id: *room_id,
                name: self.display_name(player),
            },
            Intent::LeaveRoom => Command::LeaveRoom,
            Intent::Hit => Command::Hit,
            Intent::Stand => Command::Stand,
            Intent::Rematch => Command::Rematch,
            Intent::Disconnect => return None,
        };
        Some(command)
    }

    /// The name announced to other players.
    pub fn display_name(&self, player: Option<PlayerId>) -> String {
        match (&self.player_name, player) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => format!("Player {}", id.0),
            (None, None) => "Player".to_string(),
        }
    }

    /// Serializes a command into one text frame.
    pub fn encode(&self, command: &Command) -> Result<String, ProtocolError> {
        self.codec.encode(command)
    }

    /// The codec used for both directions.
    pub fn codec(&self) -> &C {
        &self.codec
    }
}

impl Default for CommandEncoder<JsonCodec> {
    fn default() -> Self {
        Self::new(None)
    }
}
