//! The client-side match phase.

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where the client is in the match lifecycle.
///
/// ```text
///            round_start / game_start
///   Lobby ─────────────────────────────→ InRound ──(round_end)──→ RoundOver
///     ↑                                    ↑                          │
///     │                                    └──(rematch / next round)──┤
///     └─────────────(countdown expiry / leave)────────────────────────┘
/// ```
///
/// - **Lobby**: not seated at a table. Room listings are accepted here.
/// - **InRound**: cards are being dealt; `hit_result` and `turn_change`
///   are accepted.
/// - **RoundOver**: the round is decided, the outcome and the opponent's
///   hidden card are visible, and the disconnect countdown is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Lobby,
    InRound,
    RoundOver,
}

impl Phase {
    /// Returns `true` while seated at a table (the game screen is shown).
    pub fn in_game(&self) -> bool {
        matches!(self, Self::InRound | Self::RoundOver)
    }

    /// Returns `true` once the current round has been decided.
    pub fn is_round_over(&self) -> bool {
        matches!(self, Self::RoundOver)
    }

    /// Returns `true` if moving to `target` is an edge of the state machine.
    ///
    /// Staying in `InRound` is allowed: a repeated `round_start` replaces
    /// the round wholesale. Any phase may fall back to `Lobby`.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (_, Self::InRound) | (Self::InRound, Self::RoundOver) | (_, Self::Lobby)
        )
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::InRound => write!(f, "InRound"),
            Self::RoundOver => write!(f, "RoundOver"),
        }
    }
}
