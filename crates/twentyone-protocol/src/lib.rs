//! Wire protocol for the Twenty-One client.
//!
//! This crate defines the "language" the client and the game server speak:
//!
//! - **Inbound events** ([`ServerEvent`]): what the server pushes to us
//!   (`welcome`, `room_list`, `round_start`, `hit_result`, ...).
//! - **Outbound commands** ([`Command`]): what the client sends
//!   (`get_rooms`, `join_room`, `hit`, `rematch`, ...).
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those envelopes are
//!   converted to and from text frames.
//! - **Errors** ([`ProtocolError`]): what can go wrong while decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between the transport (raw text frames) and the
//! state layer (the match snapshot). It knows nothing about sockets or
//! phases; it only turns frames into tagged Rust values.
//!
//! ```text
//! Transport (text) → Protocol (ServerEvent) → State (MatchState)
//! ```
//!
//! All defaulting and key-aliasing rules of the wire format live here, at
//! the boundary, so the reducer above only ever sees fully-populated values.

mod codec;
mod command;
mod error;
mod event;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use command::Command;
pub use error::ProtocolError;
pub use event::{HitResult, RoundEnd, RoundStart, RoundWinner, ServerEvent};
pub use types::{Card, Health, PlayerId, RoomId, RoomSummary};
