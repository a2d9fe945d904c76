/// User-facing notifications
///
/// The SDK never renders anything itself; it hands notices (the toast
/// equivalents) and the login-redirect signal to whatever the embedding UI
/// registered. The contract the rest of the client relies on:
///
/// - every failure path produces exactly one notice, emitted by the
///   transport for HTTP failures and by the query layer for failures that
///   never reach the network;
/// - every successful mutation produces exactly one success notice;
/// - successful reads produce none.

use std::sync::Mutex;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Operation succeeded
    Success,

    /// Operation failed
    Error,
}

/// A single user-visible notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,

    /// Message to display
    pub message: String,
}

impl Notice {
    /// Creates a success notice
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    /// Creates an error notice
    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// Sink for notices and session-expiry redirects
///
/// Implementations must be cheap and non-blocking; they are called from the
/// middle of request handling.
pub trait Notifier: Send + Sync {
    /// Delivers one notice to the user
    fn notify(&self, notice: Notice);

    /// Asks the UI to navigate to the login entry point
    ///
    /// Called when a 401 invalidates the session. The default does nothing,
    /// for embeddings without navigation.
    fn redirect_to_login(&self) {}
}

/// Notifier that logs notices through `tracing`
///
/// The default sink for headless embeddings and examples.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => tracing::info!(message = %notice.message, "notice"),
            NoticeLevel::Error => tracing::warn!(message = %notice.message, "notice"),
        }
    }

    fn redirect_to_login(&self) {
        tracing::info!("redirect to login requested");
    }
}

/// Notifier that records everything it receives
///
/// Used by tests to assert the exactly-one-notification contract.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
    redirects: Mutex<usize>,
}

impl RecordingNotifier {
    /// Creates an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every notice received so far
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    /// Returns the notices of the given level
    pub fn notices_at(&self, level: NoticeLevel) -> Vec<Notice> {
        self.notices()
            .into_iter()
            .filter(|notice| notice.level == level)
            .collect()
    }

    /// Number of login redirects requested
    pub fn redirect_count(&self) -> usize {
        *self.redirects.lock().unwrap()
    }

    /// Drops everything recorded so far
    pub fn reset(&self) {
        self.notices.lock().unwrap().clear();
        *self.redirects.lock().unwrap() = 0;
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }

    fn redirect_to_login(&self) {
        *self.redirects.lock().unwrap() += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_captures_in_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notice::success("created"));
        notifier.notify(Notice::error("failed"));

        let notices = notifier.notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0], Notice::success("created"));
        assert_eq!(notices[1], Notice::error("failed"));

        assert_eq!(notifier.notices_at(NoticeLevel::Error).len(), 1);
    }

    #[test]
    fn test_redirects_are_counted() {
        let notifier = RecordingNotifier::new();
        assert_eq!(notifier.redirect_count(), 0);
        notifier.redirect_to_login();
        notifier.redirect_to_login();
        assert_eq!(notifier.redirect_count(), 2);

        notifier.reset();
        assert_eq!(notifier.redirect_count(), 0);
        assert!(notifier.notices().is_empty());
    }
}
