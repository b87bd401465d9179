//! # Application Layer
//!
//! Contains the core business logic and orchestration of the bot.
//! This includes the invocation driver, update processing, command routing and state persistence.

pub mod driver;
pub mod logging;
pub mod processor;
pub mod router;
pub mod state;
