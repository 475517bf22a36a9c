//! The chat channel: one WebSocket per client, JSON text frames `{message}`.
//!
//! DESIGN
//! ======
//! The socket is split on connect. The write half stays in [`ChatChannel`];
//! the read half moves into a reader task that decodes frames and forwards
//! them on an mpsc channel, so incoming messages keep their arrival order.
//! Replacing or closing the connection aborts the reader, which drops the
//! sender and ends the caller's receiver. When the server goes away first
//! the reader marks the connection closed before it exits, and the channel
//! reports itself disconnected from then on.
//!
//! The room id is one path segment of `{ws_base}/chat/{room}` and is
//! percent-encoded, so ids containing `/`, `?` or spaces reach the server
//! intact.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here returns an error. Connect failures, send failures, bad frames
//! and read errors are logged; a failed connect leaves the channel
//! disconnected and hands back an already-closed receiver.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, warn};

const INBOX_CAPACITY: usize = 64;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// One chat frame, in either direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message: String,
}

struct Connection {
    room: String,
    sink: SplitSink<WsStream, Message>,
    reader: JoinHandle<()>,
    open: Arc<AtomicBool>,
}

impl Connection {
    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

/// At most one live chat connection.
pub struct ChatChannel {
    ws_base: String,
    conn: Option<Connection>,
}

impl ChatChannel {
    /// `ws_base` is the server origin with a `ws://` or `wss://` scheme.
    #[must_use]
    pub fn new(ws_base: String) -> Self {
        Self { ws_base, conn: None }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.live().is_some()
    }

    /// Room of the open connection.
    #[must_use]
    pub fn room(&self) -> Option<&str> {
        self.live().map(|c| c.room.as_str())
    }

    fn live(&self) -> Option<&Connection> {
        self.conn.as_ref().filter(|c| c.is_open())
    }

    /// Connect to `{ws_base}/chat/{room_id}`, closing any open connection first.
    pub async fn connect(&mut self, room_id: &str) -> mpsc::Receiver<ChatMessage> {
        self.close().await;
        let (tx, rx) = mpsc::channel(INBOX_CAPACITY);
        let Some(url) = chat_url(&self.ws_base, room_id) else {
            return rx;
        };

        let stream = match connect_async(url.as_str()).await {
            Ok((stream, _)) => stream,
            Err(e) => {
                error!(%url, error = %e, "chat connect failed");
                return rx;
            }
        };
        let (sink, source) = stream.split();
        let open = Arc::new(AtomicBool::new(true));
        let reader = {
            let room = room_id.to_owned();
            let open = Arc::clone(&open);
            tokio::spawn(async move {
                read_loop(&room, source, &tx).await;
                open.store(false, Ordering::Release);
            })
        };
        self.conn = Some(Connection { room: room_id.to_owned(), sink, reader, open });
        info!(room = room_id, "chat connected");
        rx
    }

    /// Send `{"message": text}`. Returns `false` if disconnected or the send failed.
    pub async fn send(&mut self, text: &str) -> bool {
        let Some(conn) = self.conn.as_mut() else {
            warn!("chat send while disconnected; dropping message");
            return false;
        };
        if !conn.is_open() {
            warn!(room = %conn.room, "chat connection lost; dropping message");
            self.conn = None;
            return false;
        }
        let payload = match serde_json::to_string(&ChatMessage { message: text.to_owned() }) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "chat encode failed");
                return false;
            }
        };
        match conn.sink.send(Message::text(payload)).await {
            Ok(()) => {
                debug!(room = %conn.room, len = text.len(), "chat message sent");
                true
            }
            Err(e) => {
                error!(room = %conn.room, error = %e, "chat send failed");
                false
            }
        }
    }

    /// Close the open connection, if any.
    pub async fn close(&mut self) {
        let Some(mut conn) = self.conn.take() else {
            return;
        };
        if let Err(e) = conn.sink.close().await {
            debug!(room = %conn.room, error = %e, "chat close handshake failed");
        }
        info!(room = %conn.room, "chat closed");
    }
}

/// `{ws_base}/chat/{room_id}` with the room as a single encoded segment.
fn chat_url(ws_base: &str, room_id: &str) -> Option<Url> {
    let mut url = match Url::parse(ws_base) {
        Ok(url) => url,
        Err(e) => {
            error!(ws_base, error = %e, "invalid chat base url");
            return None;
        }
    };
    match url.path_segments_mut() {
        Ok(mut segments) => {
            segments.pop_if_empty().push("chat").push(room_id);
        }
        Err(()) => {
            error!(ws_base, "chat base url cannot take a path");
            return None;
        }
    }
    Some(url)
}

async fn read_loop(room: &str, mut source: SplitStream<WsStream>, tx: &mpsc::Sender<ChatMessage>) {
    while let Some(frame) = source.next().await {
        match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<ChatMessage>(text.as_str()) {
                Ok(msg) => {
                    if tx.send(msg).await.is_err() {
                        debug!(%room, "chat receiver dropped");
                        return;
                    }
                }
                Err(e) => warn!(%room, error = %e, "ignoring malformed chat frame"),
            },
            Ok(Message::Close(_)) => {
                info!(%room, "chat closed by server");
                return;
            }
            Ok(_) => {}
            Err(e) => {
                error!(%room, error = %e, "chat read failed");
                return;
            }
        }
    }
    info!(%room, "chat stream ended");
}
