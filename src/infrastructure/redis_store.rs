//! # Redis Store Adapter
//!
//! Implements `KeyValueStore` on top of a `redis` connection manager.
//! `close` drops the manager; any later call fails instead of silently reconnecting.

use crate::domain::traits::KeyValueStore;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tokio::sync::Mutex;

pub struct RedisStore {
    manager: Mutex<Option<ConnectionManager>>,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .context("Failed to open redis client")?;
        let manager = client
            .get_connection_manager()
            .await
            .context("Failed to connect to redis")?;
        Ok(Self {
            manager: Mutex::new(Some(manager)),
        })
    }

    async fn conn(&self) -> Result<ConnectionManager> {
        self.manager
            .lock()
            .await
            .clone()
            .ok_or_else(|| anyhow!("Redis connection already closed"))
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn().await?;
        conn.get::<_, Option<String>>(key)
            .await
            .with_context(|| format!("Failed to read redis key {key}"))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn().await?;
        conn.set::<_, _, ()>(key, value)
            .await
            .with_context(|| format!("Failed to write redis key {key}"))
    }

    async fn close(&self) -> Result<()> {
        if self.manager.lock().await.take().is_some() {
            tracing::debug!("Redis connection released");
        }
        Ok(())
    }
}
