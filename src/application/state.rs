//! # Bot State
//!
//! Defines the persistent state of the application (`AppState`): the bound topic and the
//! code inventory. `StateRepository` loads and saves it, plus the update cursor, through
//! a `KeyValueStore`.
//!
//! The inventory is a JSON object keyed by code. Its order is insertion order, both in
//! memory and on disk, and "first unused" allocation follows that order.

use crate::domain::config::StorageConfig;
use crate::domain::traits::KeyValueStore;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The forum topic the bot serves. Both ids are set together by `/set_topic`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicBinding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_chat_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_thread_id: Option<i64>,
}

impl TopicBinding {
    /// An unbound config never matches.
    pub fn matches(&self, chat_id: i64, thread_id: Option<i64>) -> bool {
        match (self.target_chat_id, self.target_thread_id) {
            (Some(chat), Some(thread)) => chat == chat_id && Some(thread) == thread_id,
            _ => false,
        }
    }

    pub fn bind(&mut self, chat_id: i64, thread_id: i64) {
        *self = Self {
            target_chat_id: Some(chat_id),
            target_thread_id: Some(thread_id),
        };
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeRecord {
    #[serde(default)]
    pub is_used: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_at: Option<DateTime<Utc>>,
}

/// Insertion-ordered map of code -> record. Codes are never removed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CodeInventory {
    entries: Vec<(String, CodeRecord)>,
    index: HashMap<String, usize>,
}

impl CodeInventory {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    #[cfg(test)]
    pub fn get(&self, code: &str) -> Option<&CodeRecord> {
        self.index.get(code).map(|&i| &self.entries[i].1)
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CodeRecord)> {
        self.entries.iter().map(|(code, record)| (code.as_str(), record))
    }

    /// Adds `code` as unused. Returns false if it was already present.
    pub fn insert(&mut self, code: &str) -> bool {
        if self.contains(code) {
            return false;
        }
        self.push(code.to_string(), CodeRecord::default());
        true
    }

    /// The earliest inserted unused code, left unused.
    pub fn first_unused(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, r)| !r.is_used)
            .map(|(code, _)| code.as_str())
    }

    /// Marks `code` as used. Returns false if it is unknown or already used.
    pub fn mark_used(&mut self, code: &str, now: DateTime<Utc>) -> bool {
        let Some(&i) = self.index.get(code) else {
            return false;
        };
        let record = &mut self.entries[i].1;
        if record.is_used {
            return false;
        }
        record.is_used = true;
        record.used_at = Some(now);
        true
    }

    /// Marks the earliest inserted unused code as used and returns it.
    #[cfg(test)]
    pub fn allocate(&mut self, now: DateTime<Utc>) -> Option<String> {
        let code = self.first_unused()?.to_string();
        self.mark_used(&code, now);
        Some(code)
    }

    pub fn unused_count(&self) -> usize {
        self.entries.iter().filter(|(_, r)| !r.is_used).count()
    }

    fn push(&mut self, code: String, record: CodeRecord) {
        match self.index.get(&code) {
            Some(&i) => self.entries[i].1 = record,
            None => {
                self.index.insert(code.clone(), self.entries.len());
                self.entries.push((code, record));
            }
        }
    }
}

impl Serialize for CodeInventory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (code, record) in &self.entries {
            map.serialize_entry(code, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CodeInventory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct InventoryVisitor;

        impl<'de> Visitor<'de> for InventoryVisitor {
            type Value = CodeInventory;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of code to record")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut inventory = CodeInventory::default();
                while let Some((code, record)) = access.next_entry::<String, CodeRecord>()? {
                    inventory.push(code, record);
                }
                Ok(inventory)
            }
        }

        deserializer.deserialize_map(InventoryVisitor)
    }
}

/// Persistent state of the bot. Saved as one JSON blob.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub config: TopicBinding,
    #[serde(default)]
    pub codes: CodeInventory,
}

/// Loads and saves `AppState` and the update cursor.
#[derive(Clone)]
pub struct StateRepository {
    store: Arc<dyn KeyValueStore>,
    keys: StorageConfig,
}

impl StateRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: StorageConfig) -> Self {
        Self { store, keys }
    }

    /// Loads the state, or the empty default when the key was never written.
    pub async fn load(&self) -> Result<AppState> {
        match self.store.get(&self.keys.state_key).await? {
            Some(content) => serde_json::from_str(&content)
                .with_context(|| format!("Corrupt state blob under {}", self.keys.state_key)),
            None => Ok(AppState::default()),
        }
    }

    pub async fn save(&self, state: &AppState) -> Result<()> {
        let content = serde_json::to_string_pretty(state).context("Failed to serialize state")?;
        self.store.set(&self.keys.state_key, &content).await?;
        tracing::info!("State saved to {}", self.keys.state_key);
        Ok(())
    }

    pub async fn get_cursor(&self) -> Result<Option<i64>> {
        let Some(raw) = self.store.get(&self.keys.cursor_key).await? else {
            return Ok(None);
        };
        match raw.trim().parse::<i64>() {
            Ok(cursor) => Ok(Some(cursor)),
            Err(e) => {
                tracing::warn!("Ignoring unparseable cursor {:?}: {}", raw, e);
                Ok(None)
            }
        }
    }

    pub async fn set_cursor(&self, update_id: i64) -> Result<()> {
        self.store
            .set(&self.keys.cursor_key, &update_id.to_string())
            .await
    }
}
