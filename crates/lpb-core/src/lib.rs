//! Core domain + application logic for the LinkedIn publishing bot.
//!
//! This crate is intentionally framework-agnostic. Telegram / Gemini / LinkedIn
//! live behind ports (traits) implemented in adapter crates.

pub mod assets;
pub mod config;
pub mod domain;
pub mod drafts;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod ports;
pub mod prompt;
pub mod router;
pub mod security;
pub mod workflow;

pub use errors::{Error, Result};

#[cfg(test)]
mod testing;
