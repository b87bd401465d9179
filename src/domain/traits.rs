//! # Domain Traits
//!
//! Abstract interfaces for the external collaborators (messaging platform, key-value store).
//! Allows the processor and driver to run against Telegram/Redis or test doubles.

use crate::domain::types::{IncomingMessage, MemberRole};
use anyhow::Result;
use async_trait::async_trait;

/// Abstract interface for a messaging platform (e.g., Telegram Bot API)
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Fetch updates with id >= `offset` (everything retained when `None`),
    /// waiting up to `timeout_secs` for new ones.
    async fn fetch_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
        allowed_updates: &[&str],
    ) -> Result<Vec<IncomingMessage>>;

    /// Send a message to a chat, optionally inside a thread and as a reply.
    async fn send_message(
        &self,
        chat_id: i64,
        thread_id: Option<i64>,
        reply_to: Option<i64>,
        text: &str,
    ) -> Result<()>;

    /// Look up the membership status of a user in a chat
    async fn get_member_role(&self, chat_id: i64, user_id: i64) -> Result<MemberRole>;

    /// Release the underlying session
    async fn close(&self) -> Result<()>;
}

/// Abstract interface for a string key-value store (e.g., Redis)
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn close(&self) -> Result<()>;
}
