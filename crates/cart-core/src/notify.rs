//! Failure notification sink.

use crate::error::Notice;

/// Receives one-line, user-facing messages when a cart operation fails.
///
/// Observers only: a notifier cannot change the outcome of an operation.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Default notifier: forwards notices to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &Notice) {
        tracing::warn!(
            kind = ?notice.kind,
            product_id = %notice.product_id,
            "{}",
            notice.message
        );
    }
}

impl<F> Notifier for F
where
    F: Fn(&Notice) + Send + Sync,
{
    fn notify(&self, notice: &Notice) {
        self(notice)
    }
}
