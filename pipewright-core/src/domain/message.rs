//! Deployment message types
//!
//! A deployment accumulates an ordered sequence of leveled messages; the
//! same sequence feeds the live log stream and the final outcome handed
//! back to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of one deployment message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageLevel {
    Info,
    Warn,
    Error,
}

impl MessageLevel {
    /// The log-stream prefix for this level
    pub fn prefix(&self) -> &'static str {
        match self {
            MessageLevel::Info => "[INFO]",
            MessageLevel::Warn => "[WARN]",
            MessageLevel::Error => "[ERROR]",
        }
    }
}

/// One diagnostic produced during a deployment
///
/// Messages are retained in the order they were produced, across all
/// deployment states, and are never removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
}

impl Message {
    pub fn new(level: MessageLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == MessageLevel::Error
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.level.prefix(), self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_renders_with_level_prefix() {
        let info = Message::new(MessageLevel::Info, "created pipeline df-1");
        let warn = Message::new(MessageLevel::Warn, "could not remove df-0");
        let error = Message::new(MessageLevel::Error, "validation failed");

        assert_eq!(info.to_string(), "[INFO] created pipeline df-1");
        assert_eq!(warn.to_string(), "[WARN] could not remove df-0");
        assert_eq!(error.to_string(), "[ERROR] validation failed");
    }

    #[test]
    fn test_is_error() {
        assert!(Message::new(MessageLevel::Error, "boom").is_error());
        assert!(!Message::new(MessageLevel::Warn, "meh").is_error());
    }
}
