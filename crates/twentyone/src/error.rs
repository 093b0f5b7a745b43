//! Unified error type for the Twenty-One client.

use twentyone_protocol::ProtocolError;
use twentyone_state::StateError;
use twentyone_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame that could not be decoded, or a command that could not be
    /// encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A server event that is not valid in the current state.
    #[error(transparent)]
    State(#[from] StateError),

    /// The client loop has stopped; intents can no longer be delivered.
    #[error("client is not running")]
    NotRunning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ReceiveFailed(std::io::Error::other("gone"));
        let client_err: ClientError = err.into();
        assert!(matches!(client_err, ClientError::Transport(_)));
        assert!(client_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let client_err: ClientError = ProtocolError::Decode(err).into();
        assert!(matches!(client_err, ClientError::Protocol(_)));
    }

    #[test]
    fn test_from_state_error() {
        let err = StateError::NoIdentity { event: "hit_result" };
        let client_err: ClientError = err.into();
        assert!(matches!(client_err, ClientError::State(_)));
        assert_eq!(
            client_err.to_string(),
            "hit_result received before an identity was assigned"
        );
    }

    #[test]
    fn test_not_running_display() {
        assert_eq!(ClientError::NotRunning.to_string(), "client is not running");
    }
}
