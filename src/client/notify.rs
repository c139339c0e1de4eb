use std::fmt;

/// Identifies the single pending undo offer. A newer delete issues a new
/// token and the old one stops working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UndoToken(pub(crate) u64);

impl fmt::Display for UndoToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "undo#{}", self.0)
    }
}

/// The notification surface (toasts in a browser). Presentation is up to
/// the implementor.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn undo_offered(&self, message: &str, token: UndoToken);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(notice = "success", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::warn!(notice = "error", "{message}");
    }

    fn undo_offered(&self, message: &str, token: UndoToken) {
        tracing::info!(notice = "undo", %token, "{message}");
    }
}
