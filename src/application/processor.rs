//! # Update Processor
//!
//! Applies one batch of updates to the in-memory state, in delivery order.
//! Order matters: a `/set_topic` earlier in the batch decides whether later
//! messages in the same batch pass the topic gate.
//!
//! A handler error stops the batch at that message. The outcome then covers only
//! the messages before it, so the driver persists their effects and the failed
//! message is fetched again on the next run.

use anyhow::Result;

use crate::application::router::CommandRouter;
use crate::application::state::AppState;
use crate::domain::traits::ChatGateway;
use crate::domain::types::IncomingMessage;
use crate::strings::logs;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub mutated: bool,
    /// Highest update id handled, whether or not it was acted on.
    pub last_update_id: Option<i64>,
    /// Update id of the message whose handler failed; nothing after it ran.
    pub halted_at: Option<i64>,
}

pub struct UpdateProcessor<'a> {
    router: CommandRouter<'a>,
}

impl<'a> UpdateProcessor<'a> {
    pub fn new(chat: &'a dyn ChatGateway) -> Self {
        Self {
            router: CommandRouter::new(chat),
        }
    }

    pub async fn process(
        &self,
        state: &mut AppState,
        messages: &[IncomingMessage],
    ) -> Result<ProcessOutcome> {
        let mut outcome = ProcessOutcome::default();

        for msg in messages {
            if let Some(text) = msg.text.as_deref() {
                match self.router.route(state, msg, text).await {
                    Ok(true) => outcome.mutated = true,
                    Ok(false) => {}
                    Err(e) => {
                        tracing::error!("{}", logs::batch_halted(msg.update_id, &format!("{e:#}")));
                        outcome.halted_at = Some(msg.update_id);
                        break;
                    }
                }
            }
            outcome.last_update_id = outcome.last_update_id.max(Some(msg.update_id));
        }

        Ok(outcome)
    }
}
