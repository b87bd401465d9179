//! # Invocation Driver
//!
//! Runs one invocation: read cursor, fetch updates, process, persist.
//! State is written only when a handler mutated it; the cursor is written after
//! every non-empty batch. A failed fetch persists nothing, so the next scheduled
//! run retries from the same cursor. A batch stopped by a failed code delivery
//! persists everything before the failed message and leaves the cursor just
//! short of it.
//!
//! Overlapping invocations are not safe: there is no lock around the
//! read-modify-write of state and cursor. The scheduler must run one at a time.

use anyhow::Result;
use std::sync::Arc;

use crate::application::processor::UpdateProcessor;
use crate::application::state::StateRepository;
use crate::domain::traits::{ChatGateway, KeyValueStore};
use crate::strings::logs;

const ALLOWED_UPDATES: &[&str] = &["message"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSummary {
    /// The gateway fetch failed; nothing was persisted.
    FetchFailed,
    /// No new updates.
    Idle,
    Processed {
        updates: usize,
        mutated: bool,
        cursor: i64,
    },
    /// Processing stopped at `halted_at`; only earlier updates were persisted.
    Interrupted {
        processed: usize,
        mutated: bool,
        cursor: Option<i64>,
        halted_at: i64,
    },
}

pub struct InvocationDriver {
    chat: Arc<dyn ChatGateway>,
    store: Arc<dyn KeyValueStore>,
    repo: StateRepository,
    poll_timeout_secs: u64,
}

impl InvocationDriver {
    pub fn new(
        chat: Arc<dyn ChatGateway>,
        store: Arc<dyn KeyValueStore>,
        repo: StateRepository,
        poll_timeout_secs: u64,
    ) -> Self {
        Self {
            chat,
            store,
            repo,
            poll_timeout_secs,
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("{}", logs::RUN_START);
        let mut state = self.repo.load().await?;
        let offset = self.repo.get_cursor().await?.map(|cursor| cursor + 1);

        let updates = match self
            .chat
            .fetch_updates(offset, self.poll_timeout_secs, ALLOWED_UPDATES)
            .await
        {
            Ok(updates) => updates,
            Err(e) => {
                tracing::error!("{}", logs::fetch_failed(&format!("{e:#}")));
                return Ok(RunSummary::FetchFailed);
            }
        };

        if updates.is_empty() {
            tracing::info!("{}", logs::NO_UPDATES);
            return Ok(RunSummary::Idle);
        }
        tracing::info!("{}", logs::updates_received(updates.len()));

        let outcome = UpdateProcessor::new(self.chat.as_ref())
            .process(&mut state, &updates)
            .await?;

        if outcome.mutated {
            self.repo.save(&state).await?;
        }
        // Nothing advances when the very first update failed.
        if let Some(cursor) = outcome.last_update_id {
            self.repo.set_cursor(cursor).await?;
            tracing::debug!("{}", logs::cursor_advanced(cursor));
        }

        if let Some(halted_at) = outcome.halted_at {
            let processed = updates
                .iter()
                .take_while(|m| m.update_id != halted_at)
                .count();
            tracing::warn!("{}", logs::run_interrupted(processed, updates.len()));
            return Ok(RunSummary::Interrupted {
                processed,
                mutated: outcome.mutated,
                cursor: outcome.last_update_id,
                halted_at,
            });
        }

        // Non-empty batch always carries a last id.
        let Some(cursor) = outcome.last_update_id else {
            return Ok(RunSummary::Idle);
        };
        tracing::info!("{}", logs::RUN_DONE);

        Ok(RunSummary::Processed {
            updates: updates.len(),
            mutated: outcome.mutated,
            cursor,
        })
    }

    /// Releases the gateway session and the store connection. Both are attempted
    /// even if the first fails.
    pub async fn shutdown(&self) -> Result<()> {
        let chat = self.chat.close().await;
        let store = self.store.close().await;
        tracing::info!("{}", logs::CONNECTIONS_CLOSED);
        chat.and(store)
    }
}
