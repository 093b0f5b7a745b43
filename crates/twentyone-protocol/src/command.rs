//! Outbound commands: everything the client can ask the server to do.
//!
//! Commands are fire-and-forget. There is no request id and no reply
//! correlation; the server answers, if at all, with ordinary events.

use serde::{Deserialize, Serialize};

use crate::RoomId;

/// An outbound envelope.
///
/// Serialized internally tagged, like the inbound events:
/// `Command::JoinRoom { room_id: RoomId(3), name: "Player 5".into() }`
/// becomes `{"type":"join_room","roomId":3,"name":"Player 5"}` and
/// `Command::Hit` becomes `{"type":"hit"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Ask for a fresh `room_list`.
    GetRooms,

    /// Open a new room and sit in it.
    CreateRoom { name: String },

    /// Take the free seat of an existing room.
    JoinRoom {
        #[serde(rename = "roomId")]
        room_id: RoomId,
        name: String,
    },

    /// Leave the current room.
    LeaveRoom,

    /// Draw a card.
    Hit,

    /// End our turn.
    Stand,

    /// Ask for another match against the same opponent.
    Rematch,
}

impl Command {
    /// The wire tag of this command, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GetRooms => "get_rooms",
            Self::CreateRoom { .. } => "create_room",
            Self::JoinRoom { .. } => "join_room",
            Self::LeaveRoom => "leave_room",
            Self::Hit => "hit",
            Self::Stand => "stand",
            Self::Rematch => "rematch",
        }
    }
}
