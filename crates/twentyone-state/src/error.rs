//! Error types for the state layer.

use twentyone_protocol::PlayerId;

use crate::Phase;

/// Why a transition was rejected. The state is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// The event or intent isn't valid in the current phase, e.g. a
    /// `hit_result` while in the lobby.
    #[error("{event} is not valid in phase {phase}")]
    InvalidPhase { event: &'static str, phase: Phase },

    /// A second `welcome` tried to change our identity.
    #[error("identity already assigned as {current}, refusing {offered}")]
    IdentityAlreadySet { current: PlayerId, offered: PlayerId },

    /// A player-specific event arrived before `welcome`.
    #[error("{event} received before an identity was assigned")]
    NoIdentity { event: &'static str },

    /// The event names a player that is neither us nor our opponent.
    #[error("{event} references unknown player {player}")]
    UnknownPlayer { event: &'static str, player: PlayerId },
}
