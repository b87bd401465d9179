//! # Strings Module
//!
//! Centralizes user-facing replies and log lines.
//! Replies keep the bot's Russian wording; log lines are English.

pub mod logs;
pub mod messages;
