//! # Command Handlers
//!
//! One handler per supported command (`/set_topic`, `/get`, `/add`).
//! Handlers are invoked by the Router and return whether they mutated the state.

pub mod add;
pub mod get;
pub mod set_topic;

use crate::domain::traits::ChatGateway;
use crate::domain::types::IncomingMessage;
use crate::strings::logs;

/// Replies to `msg` in its own thread. A failed reply is logged and the batch goes on.
pub(crate) async fn reply(chat: &dyn ChatGateway, msg: &IncomingMessage, text: &str) {
    let thread_id = if msg.is_topic_message { msg.thread_id } else { None };
    if let Err(e) = chat
        .send_message(msg.chat_id, thread_id, Some(msg.message_id), text)
        .await
    {
        tracing::warn!("{}", logs::reply_failed(msg.chat_id, &e.to_string()));
    }
}
