//! End-to-end tests for the roster client.
//!
//! Most tests run against the in-process `MemoryBackend`. The last group
//! starts a real WebSocket backend in-process and drives the client
//! through `WebSocketBackend`, exercising every layer:
//! provider → session → bound proxy → wire protocol → roster.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use rosterline::prelude::*;
use rosterline::protocol::{Envelope, Reply, Request};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;

type MemoryFactory = Box<dyn Fn(Identity) -> MemoryBackend + Send + Sync>;

fn memory_factory(backend: &MemoryBackend) -> MemoryFactory {
    let backend = backend.clone();
    Box::new(move |id: Identity| backend.bind(id.principal()))
}

async fn memory_client(
    backend: &MemoryBackend,
    provider: DevIdentityProvider,
) -> RosterClient<DevIdentityProvider, MemoryFactory> {
    RosterClientBuilder::new()
        .build(provider, memory_factory(backend))
        .await
        .expect("build should succeed")
}

// =========================================================================
// Startup
// =========================================================================

#[tokio::test]
async fn test_build_fresh_provider_starts_anonymous() {
    let backend = MemoryBackend::new();
    let client = memory_client(&backend, DevIdentityProvider::new()).await;

    assert!(!client.is_authenticated().await);
    assert!(client.identity().await.is_none());
    assert!(client.roster().is_empty());
    assert_eq!(client.roster().freshness(), Freshness::Stale);
}

#[tokio::test]
async fn test_build_existing_session_is_restored_without_login() {
    let backend = MemoryBackend::new();
    let client = memory_client(&backend, DevIdentityProvider::signed_in("bob")).await;

    let identity = client.identity().await.expect("session should be restored");
    assert_eq!(identity.principal().as_str(), "bob");
    assert!(client.session().provider().last_login().is_none());
}

#[tokio::test]
async fn test_sign_in_local_mode_uses_local_identity_endpoint() {
    let backend = MemoryBackend::new();
    let client = RosterClientBuilder::new()
        .provider_config(ProviderConfig::local("rdmx6-jaaaa-aaaaa-aaadq-cai"))
        .build(DevIdentityProvider::new(), memory_factory(&backend))
        .await
        .unwrap();

    client.sign_in().await.unwrap();

    let options = client.session().provider().last_login().unwrap();
    assert_eq!(
        options.identity_provider.as_deref(),
        Some("http://localhost:4943/?canisterId=rdmx6-jaaaa-aaaaa-aaadq-cai")
    );
}

#[tokio::test]
async fn test_sign_in_production_mode_uses_provider_default() {
    let backend = MemoryBackend::new();
    let client = memory_client(&backend, DevIdentityProvider::new()).await;

    client.sign_in().await.unwrap();

    let options = client.session().provider().last_login().unwrap();
    assert_eq!(options.identity_provider, None);
}

// =========================================================================
// Roster through the client
// =========================================================================

#[tokio::test]
async fn test_roster_lifecycle_add_edit_delete() {
    let backend = MemoryBackend::new();
    let mut client = memory_client(&backend, DevIdentityProvider::with_principal("alice")).await;
    client.sign_in().await.unwrap();

    let mut draft = NewPlayerDraft {
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        team: "Red".into(),
    };
    client.submit_new(&mut draft).await.unwrap();
    assert!(draft.is_empty());

    let players = client.list_players().await.unwrap().to_vec();
    assert_eq!(players.len(), 1);
    let jane = players[0].clone();
    assert_eq!(jane.to_string(), "Jane Doe - Red");

    client
        .edit_player(jane.id, &PlayerFields::new("Jane", "Doe", "Blue"))
        .await
        .unwrap();
    let edited = client.roster().get(jane.id).unwrap();
    assert_eq!(edited.team, "Blue");

    client.delete_player(jane.id).await.unwrap();
    assert!(client.roster().is_empty());
    assert!(backend.snapshot().await.is_empty());
}

#[tokio::test]
async fn test_crud_anonymous_makes_zero_calls() {
    let backend = MemoryBackend::new();
    let mut client = memory_client(&backend, DevIdentityProvider::new()).await;

    let err = client.list_players().await.unwrap_err();
    assert!(err.is_not_authenticated());
    let err = client
        .add_player(&PlayerFields::new("Jane", "Doe", "Red"))
        .await
        .unwrap_err();
    assert!(err.is_not_authenticated());

    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_sign_out_then_crud_is_refused() {
    let backend = MemoryBackend::new();
    let mut client = memory_client(&backend, DevIdentityProvider::with_principal("alice")).await;
    client.sign_in().await.unwrap();
    client
        .add_player(&PlayerFields::new("Jane", "Doe", "Red"))
        .await
        .unwrap();

    client.sign_out().await.unwrap();
    let calls = backend.call_count();

    let err = client.delete_player(PlayerId(1)).await.unwrap_err();
    assert!(err.is_not_authenticated());
    assert_eq!(backend.call_count(), calls);
    assert!(!client.is_authenticated().await);
}

#[tokio::test]
async fn test_submit_edit_incomplete_draft_is_draft_error() {
    let backend = MemoryBackend::new();
    let mut client = memory_client(&backend, DevIdentityProvider::with_principal("alice")).await;
    client.sign_in().await.unwrap();
    let mut draft = EditPlayerDraft::default();

    let err = client.submit_edit(&mut draft).await.unwrap_err();

    assert!(matches!(
        err,
        RosterlineError::Roster(RosterError::Draft(DraftError::NoPlayerSelected))
    ));
    assert_eq!(backend.call_count(), 0);
}

// =========================================================================
// Over the wire
// =========================================================================

#[derive(Default)]
struct WireState {
    last_id: u64,
    players: Vec<Player>,
    handshakes: Vec<PrincipalId>,
}

type Shared = Arc<Mutex<WireState>>;

/// Starts a minimal backend on a random port. Returns its ws:// URL.
async fn start_backend(state: Shared) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
    let addr = listener.local_addr().expect("should have addr");

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
                    return;
                };
                while let Some(Ok(Message::Binary(data))) = ws.next().await {
                    let env: Envelope<Request> =
                        serde_json::from_slice(&data).expect("client sent valid json");
                    let reply = {
                        let mut s = state.lock().await;
                        match env.payload {
                            Request::Handshake { principal, .. } => {
                                s.handshakes.push(principal);
                                Reply::HandshakeAck
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
                                for p in s.players.iter_mut().filter(|p| p.id == id) {
                                    *p = Player::from_fields(id, player.clone());
                                }
                                Reply::Done
                            }
                            Request::DeletePlayer { id } => {
                                s.players.retain(|p| p.id != id);
                                Reply::Done
                            }
                        }
                    };
                    let out = serde_json::to_vec(&Envelope {
                        seq: env.seq,
                        payload: reply,
                    })
                    .unwrap();
                    if ws.send(Message::Binary(out.into())).await.is_err() {
                        return;
                    }
                }
            });
        }
    });

    format!("ws://{addr}")
}

#[tokio::test]
async fn test_roster_over_websocket_binds_signed_in_principal() {
    let state = Shared::default();
    let url = start_backend(Arc::clone(&state)).await;
    let mut client = RosterClientBuilder::new()
        .build(
            DevIdentityProvider::with_principal("alice"),
            move |id: Identity| WebSocketBackend::new(url.clone(), id.principal().clone()),
        )
        .await
        .unwrap();

    client.sign_in().await.unwrap();
    client
        .add_player(&PlayerFields::new("Jane", "Doe", "Red"))
        .await
        .unwrap();
    let id = client.roster().players()[0].id;
    client
        .edit_player(id, &PlayerFields::new("Jane", "Doe", "Blue"))
        .await
        .unwrap();

    assert_eq!(client.roster().get(id).unwrap().team, "Blue");
    let s = state.lock().await;
    assert_eq!(s.handshakes, vec![PrincipalId::new("alice")]);
    assert_eq!(s.players.len(), 1);
}

#[tokio::test]
async fn test_sign_in_again_rebinds_new_principal() {
    let state = Shared::default();
    let url = start_backend(Arc::clone(&state)).await;
    let mut client = RosterClientBuilder::new()
        .build(DevIdentityProvider::new(), move |id: Identity| {
            WebSocketBackend::new(url.clone(), id.principal().clone())
        })
        .await
        .unwrap();

    let first = client.sign_in().await.unwrap();
    client.list_players().await.unwrap();
    client.sign_out().await.unwrap();
    let second = client.sign_in().await.unwrap();
    client.list_players().await.unwrap();

    assert_ne!(first.principal(), second.principal());
    let s = state.lock().await;
    assert_eq!(
        s.handshakes,
        vec![first.principal().clone(), second.principal().clone()]
    );
}
