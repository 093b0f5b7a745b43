//! Codec trait and implementations for text frames.
//!
//! A "codec" (coder/decoder) converts between Rust types and the text that
//! travels in a socket frame. The rest of the client doesn't care HOW
//! envelopes are serialized; it just needs something that implements
//! [`Codec`].
//!
//! The game server speaks JSON, so [`JsonCodec`] is the only implementation.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust types to text frames and decode them back.
///
/// `Send + Sync + 'static` because the codec lives inside the long-running
/// client task, which Tokio may move between worker threads.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into a text frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes a text frame back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the text is malformed, incomplete,
    /// or doesn't match the expected type.
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// This is behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use twentyone_protocol::{Codec, Command, JsonCodec, ServerEvent, PlayerId};
///
/// let codec = JsonCodec;
///
/// let text = codec.encode(&Command::Hit).unwrap();
/// assert_eq!(text, r#"{"type":"hit"}"#);
///
/// let event: ServerEvent = codec.decode(r#"{"type":"welcome","playerId":5}"#).unwrap();
/// assert_eq!(event, ServerEvent::Welcome { player_id: PlayerId(5) });
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}
