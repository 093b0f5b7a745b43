//! Value types shared by inbound events and outbound commands.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The server-assigned identity of a player.
///
/// A newtype wrapper so a `PlayerId` can never be confused with a
/// `RoomId`, even though both are plain integers on the wire. Signed,
/// because the protocol uses `-1` as the "nobody" marker in `round_end`.
///
/// `#[serde(transparent)]` keeps the JSON shape a bare number: `PlayerId(5)`
/// is just `5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub i64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// The server-assigned identity of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub i64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Card
// ---------------------------------------------------------------------------

/// A single card: just a rank, no suit.
///
/// Ranks are numeric strings in `1..=11` for this variant. The server is
/// not consistent about quoting them (`"9"` in hands, sometimes a bare `9`
/// in `hit_result`), so deserialization accepts either and normalizes to
/// the string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Card(String);

impl Card {
    /// Lowest rank in the deck.
    pub const MIN_RANK: u8 = 1;
    /// Highest rank in the deck.
    pub const MAX_RANK: u8 = 11;

    /// Creates a card from its rank text.
    pub fn new(rank: impl Into<String>) -> Self {
        Self(rank.into())
    }

    /// The rank exactly as the server sent it.
    pub fn rank(&self) -> &str {
        &self.0
    }

    /// The rank as a point value, or `None` if it isn't a number in the
    /// deck's range.
    pub fn points(&self) -> Option<u8> {
        self.0
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|p| (Self::MIN_RANK..=Self::MAX_RANK).contains(p))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RankVisitor;

        impl Visitor<'_> for RankVisitor {
            type Value = Card;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a card rank as a string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Card, E> {
                Ok(Card::new(v))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Card, E> {
                Ok(Card(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Card, E> {
                Ok(Card(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Card, E> {
                Ok(Card(v.to_string()))
            }
        }

        deserializer.deserialize_any(RankVisitor)
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// Health of both players, from the receiving client's point of view.
///
/// Signed: a round's damage can take a player below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub you: i32,
    pub opponent: i32,
}

// ---------------------------------------------------------------------------
// RoomSummary
// ---------------------------------------------------------------------------

/// One entry of a `room_list` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    #[serde(rename = "roomId")]
    pub room_id: RoomId,
    /// Display names of the seated players, in seat order.
    #[serde(rename = "players")]
    pub player_names: Vec<String>,
    /// Server-side room state, e.g. `"waiting"` or `"playing"`.
    pub state: String,
    /// Game mode label.
    pub mode: String,
}

impl RoomSummary {
    /// The state label the server uses for rooms that accept a second player.
    pub const WAITING: &'static str = "waiting";

    /// Returns `true` if the room is waiting for an opponent.
    pub fn is_waiting(&self) -> bool {
        self.state == Self::WAITING
    }
}
