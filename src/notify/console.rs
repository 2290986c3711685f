//! Console notifier
//!
//! Used in dry-run mode: messages are written to the terminal instead of
//! being delivered.

use super::message::Message;
use super::traits::Notifier;
use crate::error::NotifyError;
use std::io::{self, Write};

/// Terminal notifier writing to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }

    fn format_message(message: &Message) -> String {
        let body = message
            .plain_text()
            .lines()
            .map(|line| format!("  | {}", line))
            .collect::<Vec<_>>()
            .join("\n");
        format!("[dry-run] message:\n{}", body)
    }
}

impl Notifier for ConsoleNotifier {
    fn send(&self, message: &Message) -> Result<(), NotifyError> {
        let text = Self::format_message(message);

        writeln!(io::stdout().lock(), "{}", text)
            .map_err(|e| NotifyError::Rejected(format!("console write failed: {}", e)))
    }

    fn verify(&self) -> Result<(), NotifyError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MessageBuilder;

    #[test]
    fn test_console_notifier_creation() {
        let notifier = ConsoleNotifier::new();
        assert_eq!(notifier.name(), "console");
    }

    #[test]
    fn test_format_message_strips_markup() {
        let msg = MessageBuilder::new()
            .bold("Alert")
            .newline()
            .code("85.00")
            .build();
        assert_eq!(
            ConsoleNotifier::format_message(&msg),
            "[dry-run] message:\n  | Alert\n  | 85.00"
        );
    }

    #[test]
    fn test_send_and_verify() {
        let notifier = ConsoleNotifier::new();
        let msg = MessageBuilder::new().text("hello").build();
        assert!(notifier.send(&msg).is_ok());
        assert!(notifier.verify().is_ok());
    }
}
