//! # Add Command
//!
//! Handles `/add`. Each non-empty line after the command is a candidate code;
//! candidates already in the inventory are skipped.

use super::reply;
use crate::application::state::AppState;
use crate::domain::traits::ChatGateway;
use crate::domain::types::IncomingMessage;
use crate::strings::{logs, messages};
use anyhow::Result;

/// Trimmed, non-empty lines of `body`, in order. Duplicates are kept.
pub fn parse_codes(body: &str) -> Vec<&str> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

pub async fn handle_add(
    state: &mut AppState,
    chat: &dyn ChatGateway,
    msg: &IncomingMessage,
    body: &str,
) -> Result<bool> {
    let candidates = parse_codes(body);
    if candidates.is_empty() {
        reply(chat, msg, messages::ADD_USAGE).await;
        return Ok(false);
    }

    let added = candidates
        .iter()
        .filter(|code| state.codes.insert(code))
        .count();
    tracing::info!(
        "{}",
        logs::codes_added(added, candidates.len(), state.codes.len())
    );

    if added == 0 {
        reply(chat, msg, messages::NOTHING_ADDED).await;
        return Ok(false);
    }

    let available = state.codes.unused_count();
    reply(chat, msg, &messages::codes_added(added, available)).await;
    Ok(true)
}
