use std::sync::Mutex;

use chrono::{DateTime, Utc};

pub const SPONSORSHIP_THANKS: &str = "Thank you for your sponsorship!";
pub const SPONSORSHIP_FAILED: &str = "There was an error sponsoring the envelope. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// A user-facing message that must be acknowledged before the user carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            at: Utc::now(),
        }
    }

    pub fn sponsorship_succeeded() -> Self {
        Self::new(NoticeKind::Success, SPONSORSHIP_THANKS)
    }

    pub fn sponsorship_failed() -> Self {
        Self::new(NoticeKind::Failure, SPONSORSHIP_FAILED)
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Keeps every notice in arrival order.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<Notice> {
        match self.notices.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        tracing::debug!(kind = ?notice.kind, "notice raised: {}", notice.message);
        match self.notices.lock() {
            Ok(mut guard) => guard.push(notice),
            Err(poisoned) => poisoned.into_inner().push(notice),
        }
    }
}
