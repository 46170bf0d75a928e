use rosterline::prelude::*;

/// Backend to talk to. Unset means an in-process store.
const BACKEND_URL_VAR: &str = "ROSTERLINE_BACKEND_URL";

/// Log to stderr, filtered by `RUST_LOG`.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("roster_demo=info,rosterline=info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

fn print_roster(roster: &Roster) {
    if roster.is_empty() {
        println!("  (no players)");
    }
    for player in roster.players() {
        println!("  {} {player}", player.id);
    }
}

/// Sign in, add a player, move them to another team, delete them, sign out.
async fn run<F>(mut client: RosterClient<DevIdentityProvider, F>) -> Result<(), RosterlineError>
where
    F: ProxyFactory,
    F::Proxy: Backend,
{
    if !client.is_authenticated().await {
        let identity = client.sign_in().await?;
        println!("signed in as {}", identity.principal());
    }

    println!("players:");
    client.list_players().await?;
    print_roster(client.roster());

    let mut draft = NewPlayerDraft {
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        team: "Red".into(),
    };
    client.submit_new(&mut draft).await?;
    println!("after add:");
    print_roster(client.roster());

    let Some(jane) = client
        .roster()
        .players()
        .iter()
        .rev()
        .find(|p| p.first_name == "Jane" && p.last_name == "Doe")
        .cloned()
    else {
        tracing::warn!("added player is missing from the refetched roster");
        return Ok(());
    };

    let mut edit = EditPlayerDraft::for_player(&jane);
    edit.team = "Blue".into();
    client.submit_edit(&mut edit).await?;
    println!("after edit:");
    print_roster(client.roster());

    client.delete_player(jane.id).await?;
    println!("after delete:");
    print_roster(client.roster());

    client.sign_out().await?;
    match client.list_players().await {
        Err(e) if e.is_not_authenticated() => println!("signed out, roster locked"),
        Err(e) => return Err(e),
        Ok(_) => tracing::warn!("roster still reachable after sign-out"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = ProviderConfig::from_env();
    tracing::info!(mode = %config.mode, "starting roster demo");
    let provider = DevIdentityProvider::new();

    match std::env::var(BACKEND_URL_VAR) {
        Ok(url) => {
            tracing::info!(%url, "using remote backend");
            let client = RosterClientBuilder::new()
                .provider_config(config)
                .build(provider, move |id: Identity| {
                    WebSocketBackend::new(url.clone(), id.principal().clone())
                })
                .await?;
            run(client).await?;
        }
        Err(_) => {
            tracing::info!("{BACKEND_URL_VAR} not set, using in-process backend");
            let backend = MemoryBackend::new();
            let client = RosterClientBuilder::new()
                .provider_config(config)
                .build(provider, move |id: Identity| backend.bind(id.principal()))
                .await?;
            run(client).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_memory_backend_leaves_store_empty() {
        let backend = MemoryBackend::with_players(vec![Player::from_fields(
            PlayerId(1),
            PlayerFields::new("Ada", "Lovelace", "Green"),
        )]);
        let store = backend.clone();
        let client = RosterClientBuilder::new()
            .build(
                DevIdentityProvider::with_principal("demo"),
                move |id: Identity| backend.bind(id.principal()),
            )
            .await
            .unwrap();

        run(client).await.unwrap();

        let players = store.snapshot().await;
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].first_name, "Ada");
        // list, add + list, edit + list, delete + list, refused list.
        assert_eq!(store.call_count(), 7);
    }
}
