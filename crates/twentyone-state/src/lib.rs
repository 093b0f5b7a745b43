//! Match state and state reducer for the Twenty-One client.
//!
//! [`MatchState`] is the single, canonical snapshot of everything the UI
//! shows: hands, totals, health, whose turn it is, the round outcome and
//! the disconnect countdown. It is changed only through typed transitions:
//!
//! - [`MatchState::apply`]: one server event ([`ServerEvent`]) at a time
//! - [`MatchState::begin_rematch`], [`MatchState::reset`],
//!   [`MatchState::set_countdown`], [`MatchState::set_status`]: local
//!   transitions driven from the client side
//!
//! A transition either applies completely or returns a [`StateError`] and
//! leaves the state untouched.
//!
//! # Key types
//!
//! - [`MatchState`]: the snapshot
//! - [`Phase`]: `Lobby → InRound → RoundOver` state machine
//! - [`Outcome`]: result of the last round from our point of view
//! - [`CardView`]: a card as the opponent's hand should be rendered
//!
//! [`ServerEvent`]: twentyone_protocol::ServerEvent

mod error;
mod phase;
mod reducer;
mod state;

pub use error::StateError;
pub use phase::Phase;
pub use state::{CardView, HandTotals, MatchState, Outcome, status};
