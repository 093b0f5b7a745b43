//! Transport abstraction layer for the Twenty-One client.
//!
//! Provides the [`Connector`] and [`Connection`] traits that abstract over
//! the socket that carries text frames to and from the game server. The
//! client core only ever talks to these traits, which keeps it testable
//! with an in-memory connection.
//!
//! Opening is implied by a successful [`Connector::connect`]; a clean close
//! shows up as `Ok(None)` from [`Connection::recv`], and any other failure
//! as an `Err`.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketConnector};

use std::fmt;

/// Close code sent when the client shuts the connection down on purpose.
pub const NORMAL_CLOSURE: u16 = 1000;

/// Opaque identifier for a connection, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Opens outgoing connections.
pub trait Connector: Send + Sync + 'static {
    /// The connection type produced by this connector.
    type Connection: Connection;

    /// Connects to `url` and completes any protocol handshake.
    async fn connect(&self, url: &str) -> Result<Self::Connection, TransportError>;
}

/// A single open connection that exchanges text frames.
///
/// Methods take `&self` so one task can wait in [`recv`](Self::recv) while
/// the same task (from another `select!` branch) or another one sends.
pub trait Connection: Send + Sync + 'static {
    /// Sends one text frame to the server.
    async fn send(&self, text: &str) -> Result<(), TransportError>;

    /// Receives the next text frame.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed. Must be
    /// cancel-safe: dropping the future before it resolves loses no frame.
    async fn recv(&self) -> Result<Option<String>, TransportError>;

    /// Closes the connection with a close code and a human-readable reason.
    async fn close(&self, code: u16, reason: &str) -> Result<(), TransportError>;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}
