//! Human readable rendering of games.

use chrono::{DateTime, Utc};

use crate::game::GameRecord;
use crate::player::Seat;

/// Render a unix timestamp as `YYYY-MM-DDTHH:MM:SS` (UTC), or `-` when absent.
pub fn pretty_timestamp(ts: Option<u64>) -> String {
    let Some(ts) = ts else {
        return "-".to_string();
    };
    i64::try_from(ts)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}

pub fn player_status(game: &GameRecord, seat: Seat) -> String {
    let slot = game.slot(seat);
    let mut items = Vec::new();
    let mut ts = None;

    if let Some(commit) = &slot.commit {
        items.push(format!("Commit({})", commit));
        ts = slot.commit_ts;
    }
    if let Some(action) = slot.action {
        items.push(format!("Action({})", action));
        ts = slot.reveal_ts;
    }
    if let Some(nonce) = &slot.nonce {
        items.push(format!("Nonce({})", nonce));
    }

    let ts = match ts {
        Some(_) => format!(" Ts({})", pretty_timestamp(ts)),
        None => String::new(),
    };
    let items = if items.is_empty() {
        "No Commit".to_string()
    } else {
        items.join(", ")
    };

    format!(
        "Player({}) Parity({}){}: {}",
        game.player(seat).display_id(),
        slot.parity,
        ts,
        items
    )
}

pub fn game_status(game: &GameRecord) -> String {
    format!(
        "Game({}) Phase({}) Last({} - {}) | {} | {}",
        game.id(),
        game.phase(),
        game.last_interaction(),
        pretty_timestamp(Some(game.last_ts())),
        player_status(game, Seat::Creator),
        player_status(game, Seat::Challenger)
    )
}
