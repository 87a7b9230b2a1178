// Diagnostic console state.
// Recent info/warn/error messages shown in the viewer's status bar.

use chrono::{DateTime, Utc};

/// Console message level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Info,
    Warn,
    Error,
}

/// A console message for the activity log.
#[derive(Debug, Clone)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ConsoleMessage {
    pub fn info(message: impl Into<String>) -> Self {
        Self::with_level(ConsoleLevel::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::with_level(ConsoleLevel::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(ConsoleLevel::Error, message)
    }

    fn with_level(level: ConsoleLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Bounded activity log; the oldest message is dropped when full.
#[derive(Debug)]
pub struct Console {
    messages: Vec<ConsoleMessage>,
    capacity: usize,
    /// Number of errors logged this session.
    pub errors_total: u64,
}

impl Default for Console {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl Console {
    const DEFAULT_CAPACITY: usize = 100;

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: Vec::new(),
            capacity: capacity.max(1),
            errors_total: 0,
        }
    }

    pub fn log_error(&mut self, message: impl Into<String>) {
        self.push(ConsoleMessage::error(message));
    }

    /// Append a message, dropping the oldest when full.
    pub fn push(&mut self, message: ConsoleMessage) {
        if message.level == ConsoleLevel::Error {
            self.errors_total += 1;
        }
        if self.messages.len() == self.capacity {
            self.messages.remove(0);
        }
        self.messages.push(message);
    }

    /// Most recent message, if any.
    pub fn latest(&self) -> Option<&ConsoleMessage> {
        self.messages.last()
    }

    pub fn messages(&self) -> &[ConsoleMessage] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_is_bounded() {
        let mut console = Console::with_capacity(2);
        console.push(ConsoleMessage::info("one"));
        console.push(ConsoleMessage::warn("two"));
        console.log_error("three");

        let texts: Vec<&str> = console.messages().iter().map(|m| m.message.as_str()).collect();
        assert_eq!(texts, ["two", "three"]);
        assert_eq!(console.latest().map(|m| m.level), Some(ConsoleLevel::Error));
        assert_eq!(console.errors_total, 1);
    }
}
