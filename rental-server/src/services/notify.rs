//! Operator Notification Service
//!
//! The orchestration flow reports user-visible outcomes through an
//! injected [`Notifier`] rather than any ambient global. Critical
//! notifications mean a compensating delete failed and the store needs
//! manual cleanup; they must be distinguishable from ordinary failures.

/// Notification sink injected into the orchestration layer
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);

    fn error(&self, message: &str);

    /// Compensation failed; an operator must clean up by hand
    fn critical(&self, message: &str);
}

/// Default notifier: structured log events
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn info(&self, message: &str) {
        tracing::info!(target: "notify", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "notify", "{message}");
    }

    fn critical(&self, message: &str) {
        tracing::error!(target: "notify", severity = "critical", "MANUAL CLEANUP REQUIRED: {message}");
    }
}
