//! # Set Topic Command
//!
//! Handles `/set_topic`. Binds the bot to the forum topic the command was sent from.
//! Only chat administrators may bind; a new binding replaces the old one.

use super::reply;
use crate::application::state::AppState;
use crate::domain::traits::ChatGateway;
use crate::domain::types::IncomingMessage;
use crate::strings::{logs, messages};
use anyhow::Result;

pub async fn handle_set_topic(
    state: &mut AppState,
    chat: &dyn ChatGateway,
    msg: &IncomingMessage,
) -> Result<bool> {
    // Check Permissions
    let Some(sender_id) = msg.sender_id else {
        reply(chat, msg, messages::ADMIN_ONLY).await;
        return Ok(false);
    };
    match chat.get_member_role(msg.chat_id, sender_id).await {
        Ok(role) if role.is_admin() => {}
        Ok(role) => {
            tracing::info!("Denied /set_topic for user {} with role {:?}", sender_id, role);
            reply(chat, msg, messages::ADMIN_ONLY).await;
            return Ok(false);
        }
        Err(e) => {
            tracing::warn!(
                "{}",
                logs::role_lookup_failed(msg.chat_id, sender_id, &e.to_string())
            );
            reply(chat, msg, messages::BOT_NEEDS_ADMIN).await;
            return Ok(false);
        }
    }

    let thread_id = match (msg.is_topic_message, msg.thread_id) {
        (true, Some(thread_id)) => thread_id,
        _ => {
            reply(chat, msg, messages::SET_TOPIC_USAGE).await;
            return Ok(false);
        }
    };

    state.config.bind(msg.chat_id, thread_id);
    tracing::info!("{}", logs::topic_bound(msg.chat_id, thread_id));
    reply(chat, msg, messages::TOPIC_BOUND).await;
    Ok(true)
}
