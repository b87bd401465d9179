//! # Command Router
//!
//! Classifies a message's text into a `Command` once, then dispatches it to the matching
//! handler in `interface/commands`. Everything except `/set_topic` is gated on the bound topic.

use anyhow::Result;

use crate::application::state::AppState;
use crate::domain::traits::ChatGateway;
use crate::domain::types::{Command, IncomingMessage};
use crate::interface::commands;

pub const SET_TOPIC: &str = "/set_topic";
pub const GET: &str = "/get";
pub const ADD: &str = "/add";

/// Prefix match on the raw text, checked in a fixed order.
pub fn classify(text: &str) -> Command {
    if text.starts_with(SET_TOPIC) {
        Command::SetTopic
    } else if text.starts_with(GET) {
        Command::Get
    } else if let Some(rest) = text.strip_prefix(ADD) {
        Command::Add {
            body: strip_mention(rest).to_string(),
        }
    } else {
        Command::Unrecognized
    }
}

/// Drops a `@BotName` suffix glued to the command token (`/add@BotName`).
fn strip_mention(rest: &str) -> &str {
    match rest.strip_prefix('@') {
        Some(mention) => mention
            .find(char::is_whitespace)
            .map_or("", |idx| &mention[idx..]),
        None => rest,
    }
}

pub struct CommandRouter<'a> {
    chat: &'a dyn ChatGateway,
}

impl<'a> CommandRouter<'a> {
    pub fn new(chat: &'a dyn ChatGateway) -> Self {
        Self { chat }
    }

    /// Returns true when the state was mutated.
    pub async fn route(&self, state: &mut AppState, msg: &IncomingMessage, text: &str) -> Result<bool> {
        let command = classify(text);
        tracing::debug!(
            "Router dispatching {:?} from {:?} in {}/{:?}",
            command,
            msg.sender_id,
            msg.chat_id,
            msg.thread_id
        );

        if command == Command::SetTopic {
            return commands::set_topic::handle_set_topic(state, self.chat, msg).await;
        }

        if !state.config.matches(msg.chat_id, msg.thread_id) {
            tracing::debug!("Ignoring update {} outside the bound topic", msg.update_id);
            return Ok(false);
        }

        match command {
            Command::Get => commands::get::handle_get(state, self.chat, msg).await,
            Command::Add { body } => commands::add::handle_add(state, self.chat, msg, &body).await,
            Command::SetTopic | Command::Unrecognized => Ok(false),
        }
    }
}
