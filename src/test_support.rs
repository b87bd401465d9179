//! Test doubles shared by the unit tests.

use crate::domain::traits::{ChatGateway, KeyValueStore};
use crate::domain::types::{IncomingMessage, MemberRole};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::Mutex as AsyncMutex;

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub thread_id: Option<i64>,
    pub reply_to: Option<i64>,
    pub text: String,
}

/// Recording `ChatGateway`. Fetches pop queued batches and filter on the offset
/// the way the Bot API does.
#[derive(Default)]
pub struct FakeGateway {
    batches: Mutex<VecDeque<Result<Vec<IncomingMessage>, String>>>,
    roles: Mutex<HashMap<(i64, i64), MemberRole>>,
    sent: Mutex<Vec<SentMessage>>,
    offsets: Mutex<Vec<Option<i64>>>,
    /// Sends succeed until this many messages were recorded.
    fail_after: Mutex<Option<usize>>,
    closed: Mutex<bool>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_batch(&self, batch: Vec<IncomingMessage>) {
        self.batches.lock().unwrap().push_back(Ok(batch));
    }

    pub fn push_fetch_error(&self, err: &str) {
        self.batches.lock().unwrap().push_back(Err(err.to_string()));
    }

    pub fn set_role(&self, chat_id: i64, user_id: i64, role: MemberRole) {
        self.roles.lock().unwrap().insert((chat_id, user_id), role);
    }

    pub fn fail_sends(&self) {
        self.fail_sends_after(0);
    }

    pub fn fail_sends_after(&self, successful: usize) {
        *self.fail_after.lock().unwrap() = Some(successful);
    }

    pub fn restore_sends(&self) {
        *self.fail_after.lock().unwrap() = None;
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn offsets(&self) -> Vec<Option<i64>> {
        self.offsets.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.lock().unwrap()
    }
}

#[async_trait]
impl ChatGateway for FakeGateway {
    async fn fetch_updates(
        &self,
        offset: Option<i64>,
        _timeout_secs: u64,
        _allowed_updates: &[&str],
    ) -> Result<Vec<IncomingMessage>> {
        self.offsets.lock().unwrap().push(offset);
        match self.batches.lock().unwrap().pop_front() {
            Some(Ok(batch)) => Ok(batch
                .into_iter()
                .filter(|m| offset.is_none_or(|o| m.update_id >= o))
                .collect()),
            Some(Err(e)) => Err(anyhow!(e)),
            None => Ok(Vec::new()),
        }
    }

    async fn send_message(
        &self,
        chat_id: i64,
        thread_id: Option<i64>,
        reply_to: Option<i64>,
        text: &str,
    ) -> Result<()> {
        let mut sent = self.sent.lock().unwrap();
        if let Some(limit) = *self.fail_after.lock().unwrap()
            && sent.len() >= limit
        {
            return Err(anyhow!("Bad Request: message thread not found"));
        }
        sent.push(SentMessage {
            chat_id,
            thread_id,
            reply_to,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn get_member_role(&self, chat_id: i64, user_id: i64) -> Result<MemberRole> {
        self.roles
            .lock()
            .unwrap()
            .get(&(chat_id, user_id))
            .copied()
            .ok_or_else(|| anyhow!("Bad Request: not enough rights"))
    }

    async fn close(&self) -> Result<()> {
        *self.closed.lock().unwrap() = true;
        Ok(())
    }
}

/// A text message inside `chat_id`/`thread_id` from user 7.
pub fn message(update_id: i64, chat_id: i64, thread_id: Option<i64>, text: &str) -> IncomingMessage {
    IncomingMessage {
        update_id,
        message_id: update_id * 10,
        chat_id,
        thread_id,
        sender_id: Some(7),
        text: Some(text.to_string()),
        is_topic_message: thread_id.is_some(),
    }
}

/// In-process `KeyValueStore` that records which keys were written.
#[derive(Default)]
pub struct MemoryStore {
    entries: AsyncMutex<HashMap<String, String>>,
    writes: AsyncMutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without recording it as a write.
    pub async fn insert(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
    }

    /// Keys passed to `set`, in call order.
    pub async fn writes(&self) -> Vec<String> {
        self.writes.lock().await.clone()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        self.writes.lock().await.push(key.to_string());
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
