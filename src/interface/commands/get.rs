//! # Get Command
//!
//! Handles `/get`. Issues the earliest unused code into the bound topic.
//! The code is marked used only after it was delivered; a failed delivery leaves
//! it unused and returns an error so the batch stops at this message.

use super::reply;
use crate::application::state::AppState;
use crate::domain::traits::ChatGateway;
use crate::domain::types::IncomingMessage;
use crate::strings::{logs, messages};
use anyhow::{Context, Result};
use chrono::Utc;

pub async fn handle_get(
    state: &mut AppState,
    chat: &dyn ChatGateway,
    msg: &IncomingMessage,
) -> Result<bool> {
    let Some(code) = state.codes.first_unused().map(str::to_string) else {
        reply(chat, msg, messages::CODES_EXHAUSTED).await;
        return Ok(false);
    };
    let remaining = state.codes.unused_count() - 1;

    // The router only lets bound-topic messages through, so msg ids equal the binding.
    chat.send_message(
        msg.chat_id,
        msg.thread_id,
        None,
        &messages::code_issued(&code, remaining),
    )
    .await
    .context("Failed to deliver issued code")?;

    state.codes.mark_used(&code, Utc::now());
    tracing::info!("{}", logs::code_allocated(remaining));
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeGateway, message};

    fn bound_state(codes: &[&str]) -> AppState {
        let mut state = AppState::default();
        state.config.bind(1, 5);
        for code in codes {
            state.codes.insert(code);
        }
        state
    }

    #[tokio::test]
    async fn test_issues_last_code_then_exhausts() {
        let chat = FakeGateway::new();
        let mut state = bound_state(&["A1"]);

        assert!(handle_get(&mut state, &chat, &message(1, 1, Some(5), "/get")).await.unwrap());
        assert!(state.codes.get("A1").unwrap().is_used);

        let sent = chat.sent();
        assert!(sent[0].text.contains("A1"));
        assert!(sent[0].text.contains("Осталось: 0"));
        assert_eq!((sent[0].chat_id, sent[0].thread_id), (1, Some(5)));
        assert_eq!(sent[0].reply_to, None);

        let before = state.clone();
        assert!(!handle_get(&mut state, &chat, &message(2, 1, Some(5), "/get")).await.unwrap());
        assert_eq!(state, before);
        let sent = chat.sent();
        assert_eq!(sent[1].text, messages::CODES_EXHAUSTED);
        assert_eq!(sent[1].reply_to, Some(20));
    }

    #[tokio::test]
    async fn test_n_codes_yield_n_distinct() {
        let chat = FakeGateway::new();
        let mut state = bound_state(&["C1", "C2", "C3"]);

        for id in 1..=4 {
            handle_get(&mut state, &chat, &message(id, 1, Some(5), "/get"))
                .await
                .unwrap();
        }

        let texts: Vec<String> = chat.sent().into_iter().map(|m| m.text).collect();
        assert_eq!(texts[0], messages::code_issued("C1", 2));
        assert_eq!(texts[1], messages::code_issued("C2", 1));
        assert_eq!(texts[2], messages::code_issued("C3", 0));
        assert_eq!(texts[3], messages::CODES_EXHAUSTED);
    }

    #[tokio::test]
    async fn test_delivery_failure_is_an_error() {
        let chat = FakeGateway::new();
        chat.fail_sends();
        let mut state = bound_state(&["A1"]);

        assert!(handle_get(&mut state, &chat, &message(1, 1, Some(5), "/get")).await.is_err());
        assert!(!state.codes.get("A1").unwrap().is_used);
        assert_eq!(state.codes.unused_count(), 1);
    }
}
