//! Chat-facing abstractions (Telegram today) and the callback payload format.

pub mod callback;
pub mod port;
pub mod types;
