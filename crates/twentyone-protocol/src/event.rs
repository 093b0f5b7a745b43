//! Inbound events: everything the server can push to the client.
//!
//! Every frame is a JSON object with a string `type` tag and type-specific
//! fields next to it:
//!
//! ```json
//! { "type": "hit_result", "playerId": 5, "card": "9", "newValue": 17 }
//! ```
//!
//! `#[serde(tag = "type")]` maps that "internally tagged" shape straight
//! onto [`ServerEvent`]. Unknown tags land on [`ServerEvent::Unknown`]
//! instead of failing, so a newer server can add event types without
//! breaking older clients.
//!
//! Optional fields and aliased keys are resolved here, once. Each payload
//! with defaulting rules is decoded through a private `Raw*` struct that
//! mirrors the wire, then converted with `#[serde(from = ...)]` into the
//! public type, which has no `Option`s left for the reducer to worry about.

use serde::Deserialize;

use crate::{Card, Health, PlayerId, RoomSummary};

/// A decoded inbound envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// The server assigned us an identity.
    Welcome {
        #[serde(rename = "playerId")]
        player_id: PlayerId,
    },

    /// Full replacement of the lobby's room listing.
    RoomList { rooms: Vec<RoomSummary> },

    /// A new match begins (first round).
    GameStart(RoundStart),

    /// The next round of the current match begins.
    RoundStart(RoundStart),

    /// A player drew a card.
    HitResult(HitResult),

    /// The turn passed to another player.
    TurnChange {
        #[serde(rename = "currentTurnPlayerId")]
        current_turn: PlayerId,
    },

    /// The round was decided.
    RoundEnd(RoundEnd),

    /// The match is over (someone's health ran out).
    GameOver,

    /// Any `type` this client doesn't know about.
    #[serde(other)]
    Unknown,
}

impl ServerEvent {
    /// The wire tag of this event, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Welcome { .. } => "welcome",
            Self::RoomList { .. } => "room_list",
            Self::GameStart(_) => "game_start",
            Self::RoundStart(_) => "round_start",
            Self::HitResult(_) => "hit_result",
            Self::TurnChange { .. } => "turn_change",
            Self::RoundEnd(_) => "round_end",
            Self::GameOver => "game_over",
            Self::Unknown => "unknown",
        }
    }
}

// ---------------------------------------------------------------------------
// round_start / game_start
// ---------------------------------------------------------------------------

/// Payload of `game_start` and `round_start`, with all defaults applied.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawRoundStart")]
pub struct RoundStart {
    pub your_hand: Vec<Card>,
    pub opponent_hand: Vec<Card>,
    pub your_value: u32,
    pub opponent_value: u32,
    /// `None` means the server didn't send health; keep the current values.
    pub health: Option<Health>,
    pub round: u32,
    pub damage: u32,
    pub current_turn: PlayerId,
}

impl RoundStart {
    /// Round number assumed when the server omits it.
    pub const DEFAULT_ROUND: u32 = 1;
    /// Damage per lost round assumed when the server omits it.
    pub const DEFAULT_DAMAGE: u32 = 1;
}

/// `round_start` exactly as it appears on the wire.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRoundStart {
    your_hand: Vec<Card>,
    opponent_hand: Option<Vec<Card>>,
    opponent_card_hand: Option<Vec<Card>>,
    your_value: u32,
    opponent_value: Option<u32>,
    health: Option<Health>,
    round: Option<u32>,
    damage: Option<u32>,
    current_turn_player_id: PlayerId,
}

impl From<RawRoundStart> for RoundStart {
    fn from(raw: RawRoundStart) -> Self {
        // Older servers call it `opponentCardHand`. `opponentHand` wins when
        // both are present.
        let opponent_hand = raw
            .opponent_hand
            .or(raw.opponent_card_hand)
            .unwrap_or_default();

        Self {
            your_hand: raw.your_hand,
            opponent_hand,
            your_value: raw.your_value,
            opponent_value: raw.opponent_value.unwrap_or(0),
            health: raw.health,
            round: raw.round.unwrap_or(Self::DEFAULT_ROUND),
            damage: raw.damage.unwrap_or(Self::DEFAULT_DAMAGE),
            current_turn: raw.current_turn_player_id,
        }
    }
}

// ---------------------------------------------------------------------------
// hit_result
// ---------------------------------------------------------------------------

/// Payload of `hit_result`: one card for one side.
///
/// Only the acting side's total is carried, so the other side's total is
/// never touched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitResult {
    pub player_id: PlayerId,
    pub card: Card,
    pub new_value: u32,
}

// ---------------------------------------------------------------------------
// round_end
// ---------------------------------------------------------------------------

/// Who took the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundWinner {
    Draw,
    Player(PlayerId),
}

impl RoundWinner {
    /// Wire value of `winnerId` for a drawn round.
    pub const DRAW_ID: i64 = -1;

    fn from_wire(id: i64) -> Self {
        if id == Self::DRAW_ID {
            Self::Draw
        } else {
            Self::Player(PlayerId(id))
        }
    }
}

/// Payload of `round_end`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawRoundEnd")]
pub struct RoundEnd {
    pub health: Health,
    pub winner: RoundWinner,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRoundEnd {
    health: Health,
    winner_id: Option<i64>,
}

impl From<RawRoundEnd> for RoundEnd {
    fn from(raw: RawRoundEnd) -> Self {
        Self {
            health: raw.health,
            winner: RoundWinner::from_wire(raw.winner_id.unwrap_or(RoundWinner::DRAW_ID)),
        }
    }
}
