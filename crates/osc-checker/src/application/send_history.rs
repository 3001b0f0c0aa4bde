//! Bounded history of successful sends.
//!
//! The history is a presentation concern layered on top of
//! [`SendMessageUseCase`](super::send_message::SendMessageUseCase): the
//! sender itself only returns a [`SendResult`], and whoever owns the history
//! records it here.  The bounding policy is the same newest-first truncation
//! the received-message log uses, with a fixed capacity of 50.

use osc_core::BoundedLog;

use super::send_message::SendResult;

/// Maximum number of history lines kept.
pub const SEND_HISTORY_CAPACITY: usize = 50;

/// Placeholder shown while the history is empty.
pub const EMPTY_HISTORY_TEXT: &str = "Send history will be displayed here";

#[derive(Debug, Clone)]
pub struct SendHistory {
    lines: BoundedLog<String>,
}

impl SendHistory {
    pub fn new() -> Self {
        Self {
            lines: BoundedLog::new(SEND_HISTORY_CAPACITY),
        }
    }

    /// Records a successful send as its formatted history line.
    pub fn record(&mut self, result: &SendResult) {
        self.lines.push(result.history_line());
    }

    /// History lines, newest first.
    pub fn lines(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The history as one newline-joined block, or the placeholder text.
    pub fn as_text(&self) -> String {
        if self.lines.is_empty() {
            return EMPTY_HISTORY_TEXT.to_string();
        }
        self.lines().join("\n")
    }
}

impl Default for SendHistory {
    fn default() -> Self {
        Self::new()
    }
}
