//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (ChatGateway, KeyValueStore).

pub mod redis_store;
pub mod telegram;
