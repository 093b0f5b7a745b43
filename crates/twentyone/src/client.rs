//! The client actor: one task that owns the connection and the match.
//!
//! Everything that mutates the match runs inside [`GameClient::run`]:
//!
//! ```text
//!   ClientHandle ──(Intent)──┐
//!   Connection   ──(frame)───┼──→ select! ──→ EventRouter ──→ Presenter
//!   Countdown    ──(step)────┘                    │
//!                                                 └──(Command)──→ Connection
//! ```
//!
//! `tokio::select!` drops the futures of the branches that lost before the
//! winning handler runs, so a frame that restarts the round and a countdown
//! step can never interleave.

use tokio::sync::mpsc;
use twentyone_protocol::RoomId;
use twentyone_transport::{Connection, NORMAL_CLOSURE};

use crate::{ClientConfig, ClientError, Dispatch, EventRouter, Intent, Presenter};

/// Close reason sent when the user disconnects.
pub const CLOSE_REASON: &str = "Client closing";

// ---------------------------------------------------------------------------
// ClientHandle
// ---------------------------------------------------------------------------

/// A cloneable handle for queuing user intents.
///
/// All methods return immediately; the intent is handled on the client
/// task, in order.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    tx: mpsc::UnboundedSender<Intent>,
}

impl ClientHandle {
    /// Queues an intent.
    ///
    /// # Errors
    /// `ClientError::NotRunning` once the client loop has exited.
    pub fn send(&self, intent: Intent) -> Result<(), ClientError> {
        self.tx.send(intent).map_err(|_| ClientError::NotRunning)
    }

    pub fn refresh_rooms(&self) -> Result<(), ClientError> {
        self.send(Intent::RefreshRooms)
    }

    pub fn create_room(&self) -> Result<(), ClientError> {
        self.send(Intent::CreateRoom)
    }

    pub fn join_room(&self, room_id: RoomId) -> Result<(), ClientError> {
        self.send(Intent::JoinRoom(room_id))
    }

    pub fn leave_room(&self) -> Result<(), ClientError> {
        self.send(Intent::LeaveRoom)
    }

    pub fn hit(&self) -> Result<(), ClientError> {
        self.send(Intent::Hit)
    }

    pub fn stand(&self) -> Result<(), ClientError> {
        self.send(Intent::Stand)
    }

    pub fn rematch(&self) -> Result<(), ClientError> {
        self.send(Intent::Rematch)
    }

    /// Closes the connection and stops the client loop.
    pub fn disconnect(&self) -> Result<(), ClientError> {
        self.send(Intent::Disconnect)
    }
}

// ---------------------------------------------------------------------------
// GameClient
// ---------------------------------------------------------------------------

/// A connected client, ready to [`run`](Self::run).
pub struct GameClient<C: Connection, P: Presenter> {
    conn: C,
    router: EventRouter,
    presenter: P,
    intents: mpsc::UnboundedReceiver<Intent>,
}

impl<C: Connection, P: Presenter> GameClient<C, P> {
    /// Wraps an open connection. Returns the client and a handle for
    /// sending it intents.
    pub fn new(conn: C, config: &ClientConfig, presenter: P) -> (Self, ClientHandle) {
        let (tx, intents) = mpsc::unbounded_channel();
        let client = Self {
            conn,
            router: EventRouter::new(config),
            presenter,
            intents,
        };
        (client, ClientHandle { tx })
    }

    /// Runs the client until the connection closes or the user disconnects.
    ///
    /// Dropping every [`ClientHandle`] counts as a disconnect.
    ///
    /// # Errors
    /// Returns the transport error if receiving fails. The presenter has
    /// already been shown a `"Connection error: ..."` status by then.
    pub async fn run(mut self) -> Result<(), ClientError> {
        let conn_id = self.conn.id();
        tracing::info!(%conn_id, "client running");

        let open = self.router.on_open();
        self.flush(open).await;

        loop {
            tokio::select! {
                intent = self.intents.recv() => match intent {
                    Some(Intent::Disconnect) | None => {
                        tracing::info!(%conn_id, "disconnecting");
                        if let Err(e) = self.conn.close(NORMAL_CLOSURE, CLOSE_REASON).await {
                            tracing::debug!(%conn_id, error = %e, "close failed");
                        }
                        let closed = self.router.on_closed();
                        self.flush(closed).await;
                        return Ok(());
                    }
                    Some(intent) => {
                        tracing::debug!(%conn_id, ?intent, "intent");
                        let dispatch = self.router.on_intent(intent);
                        self.flush(dispatch).await;
                    }
                },

                frame = self.conn.recv() => match frame {
                    Ok(Some(text)) => match self.router.on_frame(&text) {
                        Ok(dispatch) => self.flush(dispatch).await,
                        Err(ClientError::Protocol(e)) => {
                            tracing::warn!(%conn_id, error = %e, "discarding malformed frame");
                        }
                        Err(e) => {
                            tracing::warn!(%conn_id, error = %e, "event rejected");
                        }
                    },
                    Ok(None) => {
                        tracing::info!(%conn_id, "connection closed by server");
                        let closed = self.router.on_closed();
                        self.flush(closed).await;
                        return Ok(());
                    }
                    Err(e) => {
                        tracing::warn!(%conn_id, error = %e, "receive failed");
                        let failed = self.router.on_transport_error(&e);
                        self.flush(failed).await;
                        return Err(e.into());
                    }
                },

                step = self.router.next_countdown_event() => {
                    let dispatch = self.router.on_countdown(step);
                    self.flush(dispatch).await;
                }
            }
        }
    }

    /// Sends the dispatch's commands, then presents once if anything changed.
    async fn flush(&mut self, dispatch: Dispatch) {
        let mut changed = dispatch.changed;

        for command in dispatch.commands {
            let text = match self.router.encoder().encode(&command) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(command = command.kind(), error = %e, "encode failed");
                    continue;
                }
            };
            match self.conn.send(&text).await {
                Ok(()) => tracing::debug!(command = command.kind(), "sent"),
                Err(e) => {
                    tracing::warn!(command = command.kind(), error = %e, "send failed");
                    changed |= self.router.on_send_failed(&e).changed;
                }
            }
        }

        if changed {
            self.presenter.present(self.router.snapshot());
        }
    }
}

#[cfg(feature = "websocket")]
mod websocket {
    use std::sync::Arc;

    use twentyone_state::MatchState;
    use twentyone_transport::{Connector, WebSocketConnection, WebSocketConnector};

    use super::*;

    impl<P: Presenter> GameClient<WebSocketConnection, P> {
        /// Connects to `config.url` over WebSocket.
        ///
        /// # Errors
        /// Returns the transport error if the server can't be reached, after
        /// showing it to the presenter as a `"Connection error: ..."` status.
        pub async fn connect(
            config: &ClientConfig,
            mut presenter: P,
        ) -> Result<(Self, ClientHandle), ClientError> {
            tracing::info!(url = %config.url, "connecting");
            match WebSocketConnector.connect(&config.url).await {
                Ok(conn) => Ok(Self::new(conn, config, presenter)),
                Err(e) => {
                    let mut state = MatchState::new(config.countdown.start_from);
                    state.set_status(format!("Connection error: {e}"));
                    presenter.present(Arc::new(state));
                    Err(e.into())
                }
            }
        }
    }
}
