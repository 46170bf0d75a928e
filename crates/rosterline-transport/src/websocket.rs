//! WebSocket backend proxy using `tokio-tungstenite`.
//!
//! The proxy connects lazily: nothing touches the network until the
//! first call. Each connection starts with a handshake carrying the
//! principal the proxy was bound to, so the backend knows who is calling.

use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::{SinkExt, StreamExt};
use rosterline_protocol::{
    Codec, Envelope, JsonCodec, Player, PlayerFields, PlayerId, PrincipalId,
    ProtocolError, Reply, Request, PROTOCOL_VERSION,
};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;

use crate::{Backend, BackendError};

type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// A [`Backend`] that speaks the Rosterline wire protocol over WebSocket.
///
/// One request is in flight per proxy: the connection lock is held from
/// send until the matching reply arrives. If anything goes wrong on the
/// wire the connection is dropped, and the next call opens a new one.
/// The failing call itself is never retried.
pub struct WebSocketBackend<C: Codec = JsonCodec> {
    url: String,
    principal: PrincipalId,
    codec: C,
    next_seq: AtomicU64,
    conn: Mutex<Option<WsStream>>,
}

impl WebSocketBackend<JsonCodec> {
    /// Creates a proxy for the backend at `url` (e.g. `ws://127.0.0.1:4000`)
    /// bound to `principal`. Does not connect yet.
    pub fn new(url: impl Into<String>, principal: PrincipalId) -> Self {
        Self::with_codec(url, principal, JsonCodec)
    }
}

impl<C: Codec> WebSocketBackend<C> {
    /// Same as [`new`](WebSocketBackend::new) with a custom codec.
    pub fn with_codec(
        url: impl Into<String>,
        principal: PrincipalId,
        codec: C,
    ) -> Self {
        Self {
            url: url.into(),
            principal,
            codec,
            next_seq: AtomicU64::new(1),
            conn: Mutex::new(None),
        }
    }

    /// The principal every connection of this proxy identifies as.
    pub fn principal(&self) -> &PrincipalId {
        &self.principal
    }

    /// Returns `true` if a connection is currently open.
    pub async fn is_connected(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    /// Sends one request and waits for its reply.
    async fn call(&self, request: Request) -> Result<Reply, BackendError> {
        let mut conn = self.conn.lock().await;

        // Take the stream out; it only goes back in if the exchange
        // left it in a known-good state.
        let mut ws = match conn.take() {
            Some(ws) => ws,
            None => self.connect().await?,
        };

        match self.exchange(&mut ws, request).await {
            Ok(reply) => {
                *conn = Some(ws);
                Ok(reply)
            }
            Err(e) => {
                tracing::debug!(url = %self.url, error = %e, "dropping backend connection");
                Err(e)
            }
        }
    }

    /// Opens a connection and performs the handshake.
    async fn connect(&self) -> Result<WsStream, BackendError> {
        let (mut ws, _) = tokio_tungstenite::connect_async(self.url.as_str())
            .await
            .map_err(|e| {
                BackendError::ConnectFailed(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    e,
                ))
            })?;

        let handshake = Request::Handshake {
            version: PROTOCOL_VERSION,
            principal: self.principal.clone(),
        };
        match self.exchange(&mut ws, handshake).await? {
            Reply::HandshakeAck => {
                tracing::debug!(url = %self.url, principal = %self.principal, "backend connection ready");
                Ok(ws)
            }
            Reply::Error { code, message } => {
                Err(BackendError::Rejected { code, message })
            }
            other => Err(unexpected("HandshakeAck", &other)),
        }
    }

    /// Writes one envelope and reads until the reply with the same `seq`.
    async fn exchange(
        &self,
        ws: &mut WsStream,
        request: Request,
    ) -> Result<Reply, BackendError> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(seq, kind = request.kind(), "sending request");

        let bytes = self.codec.encode(&Envelope { seq, payload: request })?;
        ws.send(Message::Binary(bytes.into())).await.map_err(|e| {
            BackendError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })?;

        loop {
            let data: Vec<u8> = match ws.next().await {
                Some(Ok(Message::Binary(data))) => data.into(),
                Some(Ok(Message::Text(text))) => text.as_bytes().to_vec(),
                Some(Ok(Message::Close(_))) | None => {
                    return Err(BackendError::ConnectionClosed(format!(
                        "closed while waiting for reply {seq}"
                    )));
                }
                Some(Ok(_)) => continue, // ping/pong/frame
                Some(Err(e)) => {
                    return Err(BackendError::ReceiveFailed(
                        std::io::Error::new(
                            std::io::ErrorKind::ConnectionReset,
                            e,
                        ),
                    ));
                }
            };

            let envelope: Envelope<Reply> = self.codec.decode(&data)?;
            if envelope.seq == seq {
                return Ok(envelope.payload);
            }
            tracing::debug!(expected = seq, got = envelope.seq, "skipping stale reply");
        }
    }

    /// Calls and expects `Done`.
    async fn mutate(&self, request: Request) -> Result<(), BackendError> {
        match self.call(request).await? {
            Reply::Done => Ok(()),
            Reply::Error { code, message } => {
                Err(BackendError::Rejected { code, message })
            }
            other => Err(unexpected("Done", &other)),
        }
    }
}

impl<C: Codec> Backend for WebSocketBackend<C> {
    async fn list_players(&self) -> Result<Vec<Player>, BackendError> {
        match self.call(Request::ListPlayers).await? {
            Reply::Players { players } => Ok(players),
            Reply::Error { code, message } => {
                Err(BackendError::Rejected { code, message })
            }
            other => Err(unexpected("Players", &other)),
        }
    }

    async fn add_player(&self, fields: &PlayerFields) -> Result<(), BackendError> {
        self.mutate(Request::AddPlayer {
            player: fields.clone(),
        })
        .await
    }

    async fn edit_player(
        &self,
        id: PlayerId,
        fields: &PlayerFields,
    ) -> Result<(), BackendError> {
        self.mutate(Request::EditPlayer {
            id,
            player: fields.clone(),
        })
        .await
    }

    async fn delete_player(&self, id: PlayerId) -> Result<(), BackendError> {
        self.mutate(Request::DeletePlayer { id }).await
    }
}

fn unexpected(wanted: &str, got: &Reply) -> BackendError {
    BackendError::Protocol(ProtocolError::InvalidMessage(format!(
        "expected {wanted} reply, got {got:?}"
    )))
}
