//! WebSocket transport implementation using `tokio-tungstenite`.

use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::error::ProtocolError;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::{Connection, ConnectionId, Connector, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A [`Connector`] that opens `ws://` connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

impl Connector for WebSocketConnector {
    type Connection = WebSocketConnection;

    async fn connect(&self, url: &str) -> Result<Self::Connection, TransportError> {
        let (ws, _response) = tokio_tungstenite::connect_async(url).await.map_err(|e| {
            TransportError::ConnectFailed(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                e,
            ))
        })?;

        let conn = WebSocketConnection::new(ws);
        tracing::info!(id = %conn.id, url, "WebSocket connected");
        Ok(conn)
    }
}

/// A single client-side WebSocket connection.
///
/// The stream is split so a pending [`recv`](Connection::recv) never holds
/// the lock that [`send`](Connection::send) needs.
pub struct WebSocketConnection {
    id: ConnectionId,
    sink: Mutex<SplitSink<WsStream, Message>>,
    stream: Mutex<SplitStream<WsStream>>,
}

impl WebSocketConnection {
    fn new(ws: WsStream) -> Self {
        let (sink, stream) = ws.split();
        Self {
            id: ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed)),
            sink: Mutex::new(sink),
            stream: Mutex::new(stream),
        }
    }
}

/// Maps a failed write. Writing after either side closed is reported as
/// `ConnectionClosed`, not as a broken pipe.
fn send_error(e: tungstenite::Error) -> TransportError {
    match e {
        tungstenite::Error::ConnectionClosed
        | tungstenite::Error::AlreadyClosed
        | tungstenite::Error::Protocol(ProtocolError::SendAfterClosing) => {
            TransportError::ConnectionClosed(e.to_string())
        }
        e => TransportError::SendFailed(std::io::Error::new(std::io::ErrorKind::BrokenPipe, e)),
    }
}

impl Connection for WebSocketConnection {
    async fn send(&self, text: &str) -> Result<(), TransportError> {
        let msg = Message::Text(text.to_owned().into());
        self.sink.lock().await.send(msg).await.map_err(send_error)
    }

    async fn recv(&self) -> Result<Option<String>, TransportError> {
        let mut stream = self.stream.lock().await;
        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_str().to_owned()));
                }
                Some(Ok(Message::Binary(data))) => {
                    return Ok(Some(String::from_utf8_lossy(&data).into_owned()));
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::debug!(id = %self.id, ?frame, "server closed connection");
                    return Ok(None);
                }
                None => return Ok(None),
                Some(Ok(_)) => continue, // ping/pong/raw frame
                Some(Err(
                    tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed,
                )) => return Ok(None),
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(std::io::Error::new(
                        std::io::ErrorKind::ConnectionReset,
                        e,
                    )));
                }
            }
        }
    }

    async fn close(&self, code: u16, reason: &str) -> Result<(), TransportError> {
        let frame = CloseFrame {
            code: CloseCode::from(code),
            reason: reason.to_owned().into(),
        };
        tracing::debug!(id = %self.id, code, reason, "closing connection");
        self.sink
            .lock()
            .await
            .send(Message::Close(Some(frame)))
            .await
            .map_err(send_error)
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
