use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;
use twentyone::prelude::*;

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(state: &MatchState) -> String {
    if !state.in_game() {
        let rooms: Vec<String> = state
            .rooms()
            .iter()
            .map(|r| format!("{} [{}] {}", r.room_id, r.player_names.join(", "), r.state))
            .collect();
        let rooms = if rooms.is_empty() {
            "none".to_string()
        } else {
            rooms.join(" | ")
        };
        return format!("[lobby] {} | rooms: {rooms}", state.status());
    }

    let yours: Vec<String> = state.your_hand().iter().map(|c| c.to_string()).collect();
    let theirs: Vec<String> = state
        .opponent_cards()
        .into_iter()
        .map(|c| match c {
            CardView::Hidden => "##".to_string(),
            CardView::Shown(card) => card.to_string(),
        })
        .collect();
    let their_value = opponent_value_line(state);

    let mut line = format!(
        "[round {} / dmg {}] {} | you: {} = {} (hp {}) | opponent: {} = {} (hp {})",
        state.round(),
        state.damage(),
        state.status(),
        yours.join(" "),
        state.your_value(),
        state.your_health(),
        theirs.join(" "),
        their_value,
        state.opponent_health(),
    );
    if let Some(label) = state.winner_label() {
        line.push_str(&format!(" | {label}"));
    }
    if let Some(seconds) = state.countdown() {
        line.push_str(&format!(" | auto-disconnect in {seconds}s"));
    }
    if state.can_rematch() {
        line.push_str(" | type `rematch` to play again");
    }
    line
}

/// `?? + revealed` while the round runs, the full total afterwards.
fn opponent_value_line(state: &MatchState) -> String {
    let totals = state.opponent_totals();
    if state.round_over() {
        format!(
            "{} (revealed {} + hidden {})",
            totals.total(),
            totals.revealed,
            totals.hidden
        )
    } else {
        format!("?? + {}", totals.revealed)
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

fn parse_intent(line: &str) -> Result<Intent, String> {
    let mut words = line.split_whitespace();
    let intent = match words.next() {
        Some("rooms") => Intent::RefreshRooms,
        Some("create") => Intent::CreateRoom,
        Some("join") => {
            let id = words
                .next()
                .ok_or("usage: join <room id>")?
                .parse::<i64>()
                .map_err(|e| format!("bad room id: {e}"))?;
            Intent::JoinRoom(RoomId(id))
        }
        Some("leave") => Intent::LeaveRoom,
        Some("hit") => Intent::Hit,
        Some("stand") => Intent::Stand,
        Some("rematch") => Intent::Rematch,
        Some("quit") => Intent::Disconnect,
        Some(other) => return Err(format!("unknown command: {other}")),
        None => return Err("empty command".into()),
    };
    Ok(intent)
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,twentyone_cli=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let mut config = ClientConfig::new();
    if let Some(url) = args.next() {
        config = config.server(url);
    }
    if let Some(name) = args.next() {
        config = config.player_name(name);
    }

    let (presenter, mut snapshots) = watch::channel(Arc::new(MatchState::default()));
    let renderer = tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let state = Arc::clone(&snapshots.borrow_and_update());
            println!("{}", render(&state));
        }
    });

    tracing::info!(url = %config.url, "connecting");
    let (client, handle) = match GameClient::connect(&config, presenter).await {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!(error = %e, "could not connect");
            renderer.await?;
            return Err(e.into());
        }
    };
    let client = tokio::spawn(client.run());

    eprintln!("commands: rooms | create | join <id> | leave | hit | stand | rematch | quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_intent(&line) {
            Ok(intent) => {
                let quit = intent == Intent::Disconnect;
                if handle.send(intent).is_err() || quit {
                    break;
                }
            }
            Err(msg) => tracing::warn!(input = %line.trim(), "{msg}"),
        }
    }
    drop(handle);

    let result = client.await?;
    renderer.await?;
    match &result {
        Ok(()) => tracing::info!("client stopped"),
        Err(e) => tracing::error!(error = %e, "client stopped with an error"),
    }
    result.map_err(Into::into)
}
