//! Ordered message accumulator
//!
//! The deployer owns exactly one [`MessageLog`] per run and threads it
//! through every state. Each push is emitted live through `tracing` at the
//! matching level and retained, in order, for the final outcome.

use pipewright_core::domain::message::{Message, MessageLevel};
use tracing::{error, info, warn};

/// Append-only sequence of leveled deployment messages
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and emits it on the live log stream
    pub fn push(&mut self, level: MessageLevel, text: impl Into<String>) {
        let text = text.into();
        match level {
            MessageLevel::Info => info!("{text}"),
            MessageLevel::Warn => warn!("{text}"),
            MessageLevel::Error => error!("{text}"),
        }
        self.messages.push(Message::new(level, text));
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(MessageLevel::Info, text);
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.push(MessageLevel::Warn, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(MessageLevel::Error, text);
    }

    /// The accumulated messages, in the order they were produced
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_keep_push_order_across_levels() {
        let mut log = MessageLog::new();
        log.info("one");
        log.error("two");
        log.warn("three");
        log.info("four");

        let rendered: Vec<String> = log.messages().iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec!["[INFO] one", "[ERROR] two", "[WARN] three", "[INFO] four"]
        );
    }

    #[test]
    fn test_into_messages_preserves_order() {
        let mut log = MessageLog::new();
        log.warn("a");
        log.info("b");

        let messages = log.into_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].level, MessageLevel::Warn);
        assert_eq!(messages[1].text, "b");
    }
}
