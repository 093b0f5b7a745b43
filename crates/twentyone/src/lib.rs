//! # Twenty-One
//!
//! Client-side state synchronizer for a two-player Twenty-One card duel.
//!
//! The server is authoritative. This crate turns its stream of events into
//! one consistent, render-ready [`MatchState`] and turns user intents into
//! commands. It also runs the auto-leave countdown that starts when a round
//! ends.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use twentyone::prelude::*;
//!
//! # async fn demo() -> Result<(), ClientError> {
//! let (snapshots, mut rx) = tokio::sync::mpsc::unbounded_channel::<Snapshot>();
//! let config = ClientConfig::new().server("ws://127.0.0.1:8080");
//!
//! let (client, handle) = GameClient::connect(&config, snapshots).await?;
//! tokio::spawn(client.run());
//!
//! handle.create_room()?;
//! while let Some(state) = rx.recv().await {
//!     println!("{}", state.status());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`MatchState`]: twentyone_state::MatchState

mod client;
mod config;
mod encoder;
mod error;
mod presenter;
mod router;

pub use client::{ClientHandle, GameClient, CLOSE_REASON};
pub use config::ClientConfig;
pub use encoder::{CommandEncoder, Intent};
pub use error::ClientError;
pub use presenter::{Presenter, Snapshot};
pub use router::{Dispatch, EventRouter};

pub mod prelude {
    pub use crate::{
        ClientConfig, ClientError, ClientHandle, GameClient, Intent, Presenter, Snapshot,
    };
    pub use twentyone_countdown::CountdownConfig;
    pub use twentyone_protocol::{Card, PlayerId, RoomId, RoomSummary};
    pub use twentyone_state::{CardView, HandTotals, MatchState, Outcome, Phase};
}
