//! The log of received OSC messages.
//!
//! Entries are kept newest-first and capped at `max_entries`; the oldest
//! entries are dropped silently once the cap is reached.  The log only shrinks
//! through that cap or through an explicit [`MessageLog::clear`].
//!
//! This type is a plain single-owner value (`&mut self` to mutate).  Sharing it
//! between the receive pump and the operator's commands is the application
//! layer's job.

use std::fmt;

use chrono::Local;

use super::bounded_log::BoundedLog;
use super::filter::AddressFilter;

/// Default cap on the number of retained messages.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// One received message, immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    /// Local wall-clock time of arrival, `HH:MM:SS`.
    pub timestamp: String,
    pub address: String,
    /// Decoded argument values joined with `", "`.
    pub values: String,
}

impl ReceivedMessage {
    /// Creates a message stamped with the current local time.
    pub fn new(address: impl Into<String>, values: impl Into<String>) -> Self {
        Self::with_timestamp(Local::now().format("%H:%M:%S").to_string(), address, values)
    }

    pub fn with_timestamp(
        timestamp: impl Into<String>,
        address: impl Into<String>,
        values: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            address: address.into(),
            values: values.into(),
        }
    }
}

impl fmt::Display for ReceivedMessage {
    /// `HH:MM:SS | /address | v1, v2`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | {}", self.timestamp, self.address, self.values)
    }
}

/// Bounded, newest-first record of received messages.
#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: BoundedLog<ReceivedMessage>,
}

impl MessageLog {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: BoundedLog::new(max_entries),
        }
    }

    /// Records a message that arrived now.
    pub fn add(&mut self, address: impl Into<String>, values: impl Into<String>) {
        self.push(ReceivedMessage::new(address, values));
    }

    /// Records an already-built message (newest first, bounded).
    pub fn push(&mut self, message: ReceivedMessage) {
        self.entries.push(message);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of retained messages; this is the "Received: N" counter.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.entries.capacity()
    }

    /// Iterates newest first over the messages whose address passes `filter`.
    pub fn filtered<'a>(
        &'a self,
        filter: &'a AddressFilter,
    ) -> impl Iterator<Item = &'a ReceivedMessage> + 'a {
        self.entries.iter().filter(move |m| filter.matches(&m.address))
    }

    /// Snapshot of the messages matching `pattern`, newest first.
    pub fn filtered_view(&self, pattern: &str) -> Vec<ReceivedMessage> {
        let filter = AddressFilter::parse(pattern);
        self.filtered(&filter).cloned().collect()
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(view: &[ReceivedMessage]) -> Vec<(&str, &str)> {
        view.iter()
            .map(|m| (m.address.as_str(), m.values.as_str()))
            .collect()
    }

    #[test]
    fn test_add_beyond_bound_keeps_most_recent_in_reverse_order() {
        // Arrange
        let mut log = MessageLog::new(3);

        // Act
        log.add("/a", "1");
        log.add("/b", "2");
        log.add("/c", "3");
        log.add("/d", "4");

        // Assert
        assert_eq!(
            pairs(&log.filtered_view("")),
            vec![("/d", "4"), ("/c", "3"), ("/b", "2")]
        );
    }

    #[test]
    fn test_len_never_exceeds_max_entries() {
        let mut log = MessageLog::new(5);
        for i in 0..50 {
            log.add(format!("/n/{i}"), i.to_string());
            assert!(log.len() <= 5);
        }
        assert_eq!(log.len(), 5);
        assert_eq!(log.filtered_view("")[0].address, "/n/49");
    }

    #[test]
    fn test_clear_then_view_is_empty() {
        let mut log = MessageLog::new(10);
        log.add("/a", "1");
        log.add("/b", "2");

        log.clear();

        assert!(log.is_empty());
        assert!(log.filtered_view("").is_empty());
        assert!(log.filtered_view("/a").is_empty());
    }

    #[test]
    fn test_filtered_view_applies_pattern_in_newest_first_order() {
        let mut log = MessageLog::new(10);
        log.add("/test/one", "1");
        log.add("/other", "2");
        log.add("/test/two", "3");

        let view = log.filtered_view("/test*");

        assert_eq!(pairs(&view), vec![("/test/two", "3"), ("/test/one", "1")]);
        // The view is a snapshot; the log itself is untouched.
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_add_stamps_hh_mm_ss() {
        let mut log = MessageLog::default();
        log.add("/a", "");

        let ts = &log.filtered_view("")[0].timestamp;
        assert_eq!(ts.len(), 8, "timestamp {ts:?} must be HH:MM:SS");
        assert_eq!(ts.as_bytes()[2], b':');
        assert_eq!(ts.as_bytes()[5], b':');
    }

    #[test]
    fn test_default_log_holds_one_hundred() {
        assert_eq!(MessageLog::default().max_entries(), DEFAULT_MAX_ENTRIES);
        assert_eq!(DEFAULT_MAX_ENTRIES, 100);
    }

    #[test]
    fn test_received_message_display_is_pipe_separated() {
        let msg = ReceivedMessage::with_timestamp("12:34:56", "/vol", "0.5, true");
        assert_eq!(msg.to_string(), "12:34:56 | /vol | 0.5, true");
    }
}
