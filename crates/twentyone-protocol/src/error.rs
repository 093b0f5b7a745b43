//! Error types for the protocol layer.
//!
//! Each crate in the workspace defines its own error enum. When you see a
//! `ProtocolError`, you know the problem is in encoding or decoding a frame,
//! not in the socket or in the match state.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization of an outbound command failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization of an inbound frame failed.
    ///
    /// Common causes: malformed JSON, a missing `type` tag, or a missing
    /// required field for the declared type (e.g. `round_end` without
    /// `health`).
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
