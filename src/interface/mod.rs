//! # Interface Layer
//!
//! User-facing command handlers, invoked by the application router.

pub mod commands;
