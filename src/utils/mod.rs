//! Small helpers shared across layers.

pub mod log_sanitizer;
pub mod time;
pub mod tokens;
