//! # Telegram Gateway Adapter
//!
//! Implements the `ChatGateway` trait over the Telegram Bot HTTP API using `reqwest`.
//! Only the handful of methods the bot needs are wrapped: `getUpdates`, `sendMessage`
//! and `getChatMember`. Outbound text is sent with HTML parse mode.

use crate::domain::config::TelegramConfig;
use crate::domain::traits::ChatGateway;
use crate::domain::types::{IncomingMessage, MemberRole};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct TelegramResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TelegramUpdate {
    update_id: i64,
    message: Option<TelegramMessage>,
}

#[derive(Debug, Deserialize)]
struct TelegramMessage {
    message_id: i64,
    chat: TelegramChat,
    from: Option<TelegramUser>,
    text: Option<String>,
    message_thread_id: Option<i64>,
    #[serde(default)]
    is_topic_message: bool,
}

#[derive(Debug, Deserialize)]
struct TelegramChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct TelegramUser {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct TelegramChatMember {
    status: MemberRole,
}

impl TelegramUpdate {
    /// Updates without a message keep their id so the cursor still moves past them.
    fn into_incoming(self) -> IncomingMessage {
        match self.message {
            Some(msg) => IncomingMessage {
                update_id: self.update_id,
                message_id: msg.message_id,
                chat_id: msg.chat.id,
                thread_id: msg.message_thread_id,
                sender_id: msg.from.map(|u| u.id),
                text: msg.text,
                is_topic_message: msg.is_topic_message,
            },
            None => IncomingMessage {
                update_id: self.update_id,
                message_id: 0,
                chat_id: 0,
                thread_id: None,
                sender_id: None,
                text: None,
                is_topic_message: false,
            },
        }
    }
}

#[derive(Clone)]
pub struct TelegramService {
    client: reqwest::Client,
    base_url: String,
}

impl TelegramService {
    pub fn new(token: &str, config: &TelegramConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: format!("{}/bot{}", config.api_base.trim_end_matches('/'), token),
        })
    }

    /// POST a Bot API method and unwrap the `{ok, result, description}` envelope.
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let url = format!("{}/{}", self.base_url, method);
        let res = self
            .client
            .post(url)
            .json(&params)
            .send()
            .await
            .with_context(|| format!("Telegram {method}: request failed"))?;

        // Error responses still carry the JSON envelope, so parse before checking status.
        let status = res.status();
        let text = res
            .text()
            .await
            .with_context(|| format!("Telegram {method}: failed to read body"))?;
        let response: TelegramResponse<T> = serde_json::from_str(&text)
            .with_context(|| format!("Telegram {method}: HTTP {status}, unexpected body: {text}"))?;

        if !response.ok {
            return Err(anyhow!(
                "Telegram {method} failed: {}",
                response
                    .description
                    .unwrap_or_else(|| format!("HTTP {status}"))
            ));
        }
        response
            .result
            .ok_or_else(|| anyhow!("Telegram {method}: missing result"))
    }
}

#[async_trait]
impl ChatGateway for TelegramService {
    async fn fetch_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
        allowed_updates: &[&str],
    ) -> Result<Vec<IncomingMessage>> {
        let mut params = json!({
            "timeout": timeout_secs,
            "allowed_updates": allowed_updates,
        });
        if let Some(offset) = offset {
            params["offset"] = json!(offset);
        }
        let updates: Vec<TelegramUpdate> = self.call("getUpdates", params).await?;
        Ok(updates
            .into_iter()
            .map(TelegramUpdate::into_incoming)
            .collect())
    }

    async fn send_message(
        &self,
        chat_id: i64,
        thread_id: Option<i64>,
        reply_to: Option<i64>,
        text: &str,
    ) -> Result<()> {
        // Text may carry an issued code, so it stays out of info-level logs.
        tracing::info!("Bot sending message to {}/{:?}", chat_id, thread_id);
        tracing::debug!("Message text: {}", text);
        let mut params = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(thread_id) = thread_id {
            params["message_thread_id"] = json!(thread_id);
        }
        if let Some(message_id) = reply_to {
            params["reply_parameters"] = json!({
                "message_id": message_id,
                "allow_sending_without_reply": true,
            });
        }
        let _: Value = self.call("sendMessage", params).await?;
        Ok(())
    }

    async fn get_member_role(&self, chat_id: i64, user_id: i64) -> Result<MemberRole> {
        let member: TelegramChatMember = self
            .call(
                "getChatMember",
                json!({ "chat_id": chat_id, "user_id": user_id }),
            )
            .await?;
        Ok(member.status)
    }

    async fn close(&self) -> Result<()> {
        // reqwest drops pooled connections with the client; nothing to flush.
        tracing::debug!("Telegram session released");
        Ok(())
    }
}
