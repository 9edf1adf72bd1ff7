//! Transient user-facing messages produced by containers.

use chrono::{DateTime, Utc};
use depot_core::environment::Clock;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    /// Neutral information
    Info,
    /// An operation went through
    Success,
    /// The user has to fix something first
    Warning,
    /// An operation failed
    Error,
}

/// One message for the shell to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Text shown to the user
    pub message: String,
    /// When the container raised it
    pub at: DateTime<Utc>,
}

/// Notices waiting to be shown, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notices(Vec<Notice>);

impl Notices {
    /// Queue a notice stamped with `clock`.
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>, clock: &dyn Clock) {
        let message = message.into();
        tracing::debug!(?level, %message, "notice");
        self.0.push(Notice {
            level,
            message,
            at: clock.now(),
        });
    }

    /// Queue an info notice.
    pub fn info(&mut self, message: impl Into<String>, clock: &dyn Clock) {
        self.push(NoticeLevel::Info, message, clock);
    }

    /// Queue a success notice.
    pub fn success(&mut self, message: impl Into<String>, clock: &dyn Clock) {
        self.push(NoticeLevel::Success, message, clock);
    }

    /// Queue a warning notice.
    pub fn warning(&mut self, message: impl Into<String>, clock: &dyn Clock) {
        self.push(NoticeLevel::Warning, message, clock);
    }

    /// Queue an error notice.
    pub fn error(&mut self, message: impl Into<String>, clock: &dyn Clock) {
        self.push(NoticeLevel::Error, message, clock);
    }

    /// Pending notices, oldest first.
    #[must_use]
    pub fn as_slice(&self) -> &[Notice] {
        &self.0
    }

    /// Most recent notice.
    #[must_use]
    pub fn last(&self) -> Option<&Notice> {
        self.0.last()
    }

    /// Number of pending notices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take every pending notice.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_testing::test_clock;

    #[test]
    fn notices_queue_in_order_and_drain() {
        let clock = test_clock();
        let mut notices = Notices::default();
        notices.success("Product created successfully", &clock);
        notices.error("Failed to delete product", &clock);

        assert_eq!(notices.len(), 2);
        assert_eq!(notices.last().map(|n| n.level), Some(NoticeLevel::Error));
        assert_eq!(notices.as_slice()[0].at, clock.now());

        let drained = notices.drain();
        assert_eq!(drained[0].message, "Product created successfully");
        assert!(notices.is_empty());
    }
}
