//! Integration tests for the WebSocket backend proxy.
//!
//! These spin up a real WebSocket server in-process that speaks the
//! backend side of the protocol, then drive it through the proxy.

#[cfg(feature = "websocket")]
mod websocket {
    use std::sync::Arc;

    use futures_util::{SinkExt, StreamExt};
    use rosterline_protocol::{
        Envelope, Player, PlayerFields, PlayerId, PrincipalId, Reply, Request,
    };
    use rosterline_transport::{Backend, BackendError, WebSocketBackend};
    use tokio::net::TcpListener;
    use tokio::sync::Mutex;
    use tokio_tungstenite::tungstenite::Message;

    // =====================================================================
    // Fake backend server
    // =====================================================================

    #[derive(Default)]
    struct ServerState {
        last_id: u64,
        players: Vec<Player>,
        /// Principals seen in handshakes, in order.
        handshakes: Vec<PrincipalId>,
        /// When set, the next non-handshake request closes the socket
        /// instead of answering.
        drop_next: bool,
        /// When set, the next reply is preceded by one carrying a `seq`
        /// the client never sent.
        stray_reply: bool,
    }

    type Shared = Arc<Mutex<ServerState>>;

    /// Starts the fake backend on a random port. Returns its ws:// URL.
    async fn start_server(state: Shared) -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = listener.local_addr().expect("should have addr");

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let Ok(ws) = tokio_tungstenite::accept_async(stream).await
                    else {
                        return;
                    };
                    serve(ws, state).await;
                });
            }
        });

        format!("ws://{addr}")
    }

    async fn serve(
        mut ws: tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>,
        state: Shared,
    ) {
        while let Some(Ok(msg)) = ws.next().await {
            let data = match msg {
                Message::Binary(data) => data.to_vec(),
                Message::Close(_) => return,
                _ => continue,
            };
            let env: Envelope<Request> =
                serde_json::from_slice(&data).expect("client sent valid json");

            let reply = {
                let mut s = state.lock().await;
                match env.payload {
                    Request::Handshake { principal, .. } => {
                        let banned = principal.as_str() == "banned";
                        s.handshakes.push(principal);
                        if banned {
                            Reply::Error {
                                code: 401,
                                message: "unknown principal".into(),
                            }
                        } else {
                            Reply::HandshakeAck
                        }
                    }
                    _ if s.drop_next => {
                        s.drop_next = false;
                        drop(s);
                        let _ = ws.close(None).await;
                        return;
                    }
                    Request::ListPlayers => Reply::Players {
                        players: s.players.clone(),
                    },
                    Request::AddPlayer { player } => {
                        s.last_id += 1;
                        let id = PlayerId(s.last_id);
                        s.players.push(Player::from_fields(id, player));
                        Reply::Done
                    }
                    Request::EditPlayer { id, player } => {
                        match s.players.iter_mut().find(|p| p.id == id) {
                            Some(p) => {
                                *p = Player::from_fields(id, player);
                                Reply::Done
                            }
                            None => Reply::Error {
                                code: 404,
                                message: "not found".into(),
                            },
                        }
                    }
                    Request::DeletePlayer { id } => {
                        s.players.retain(|p| p.id != id);
                        Reply::Done
                    }
                }
            };

            if std::mem::take(&mut state.lock().await.stray_reply) {
                let stray = serde_json::to_vec(&Envelope {
                    seq: env.seq + 1000,
                    payload: Reply::Error {
                        code: 500,
                        message: "stray reply".into(),
                    },
                })
                .unwrap();
                if ws.send(Message::Binary(stray.into())).await.is_err() {
                    return;
                }
            }

            let out = serde_json::to_vec(&Envelope {
                seq: env.seq,
                payload: reply,
            })
            .unwrap();
            if ws.send(Message::Binary(out.into())).await.is_err() {
                return;
            }
        }
    }

    fn principal(text: &str) -> PrincipalId {
        PrincipalId::new(text)
    }

    // =====================================================================
    // Tests
    // =====================================================================

    #[tokio::test]
    async fn test_proxy_does_not_connect_until_first_call() {
        let state = Shared::default();
        let url = start_server(Arc::clone(&state)).await;

        let proxy = WebSocketBackend::new(url, principal("alice"));

        assert!(!proxy.is_connected().await);
        assert!(state.lock().await.handshakes.is_empty());
    }

    #[tokio::test]
    async fn test_proxy_crud_round_trip() {
        let state = Shared::default();
        let url = start_server(Arc::clone(&state)).await;
        let proxy = WebSocketBackend::new(url, principal("alice"));

        proxy
            .add_player(&PlayerFields::new("Jane", "Doe", "Red"))
            .await
            .expect("add should succeed");
        let players = proxy.list_players().await.expect("list should succeed");
        assert_eq!(players.len(), 1);
        let id = players[0].id;

        proxy
            .edit_player(id, &PlayerFields::new("Jane", "Doe", "Blue"))
            .await
            .expect("edit should succeed");
        let players = proxy.list_players().await.unwrap();
        assert_eq!(players[0].team, "Blue");

        proxy.delete_player(id).await.expect("delete should succeed");
        assert!(proxy.list_players().await.unwrap().is_empty());

        // All of that went over one connection.
        assert_eq!(state.lock().await.handshakes, vec![principal("alice")]);
    }

    #[tokio::test]
    async fn test_proxy_rejected_handshake_returns_rejected() {
        let state = Shared::default();
        let url = start_server(Arc::clone(&state)).await;
        let proxy = WebSocketBackend::new(url, principal("banned"));

        let result = proxy.list_players().await;

        assert!(
            matches!(result, Err(BackendError::Rejected { code: 401, .. })),
            "got {result:?}"
        );
        assert!(!proxy.is_connected().await);
    }

    #[tokio::test]
    async fn test_proxy_rejected_call_keeps_connection() {
        let state = Shared::default();
        let url = start_server(Arc::clone(&state)).await;
        let proxy = WebSocketBackend::new(url, principal("alice"));

        let result = proxy
            .edit_player(PlayerId(42), &PlayerFields::new("A", "B", "C"))
            .await;

        assert!(matches!(
            result,
            Err(BackendError::Rejected { code: 404, .. })
        ));
        assert!(proxy.is_connected().await);
        assert_eq!(state.lock().await.handshakes.len(), 1);
    }

    #[tokio::test]
    async fn test_proxy_reply_with_other_seq_is_skipped() {
        let state = Shared::default();
        let url = start_server(Arc::clone(&state)).await;
        let proxy = WebSocketBackend::new(url, principal("alice"));
        proxy
            .add_player(&PlayerFields::new("Jane", "Doe", "Red"))
            .await
            .unwrap();

        state.lock().await.stray_reply = true;
        let players = proxy
            .list_players()
            .await
            .expect("the reply matching the request should win");

        assert_eq!(players.len(), 1);
        assert_eq!(players[0].first_name, "Jane");
        assert!(!state.lock().await.stray_reply);
        assert!(proxy.is_connected().await);
        assert_eq!(state.lock().await.handshakes.len(), 1);
    }

    #[tokio::test]
    async fn test_proxy_reconnects_after_connection_drop() {
        let state = Shared::default();
        let url = start_server(Arc::clone(&state)).await;
        let proxy = WebSocketBackend::new(url, principal("alice"));
        proxy.list_players().await.unwrap();

        state.lock().await.drop_next = true;
        let failed = proxy.list_players().await;
        assert!(
            matches!(failed, Err(BackendError::ConnectionClosed(_))),
            "got {failed:?}"
        );
        assert!(!proxy.is_connected().await);

        // No automatic retry happened; the next call opens a new connection.
        proxy.list_players().await.expect("should reconnect");
        assert_eq!(state.lock().await.handshakes.len(), 2);
    }

    #[tokio::test]
    async fn test_proxy_connect_to_closed_port_returns_connect_failed() {
        // Bind then drop to get a port nobody listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let proxy = WebSocketBackend::new(format!("ws://{addr}"), principal("alice"));
        let result = proxy.list_players().await;

        assert!(matches!(result, Err(BackendError::ConnectFailed(_))));
    }
}
