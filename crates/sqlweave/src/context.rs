//! Per-run deadline and cancellation.

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Deadline and cancel signal for one or more runs.
///
/// `Context` is cheap to clone; clones share the same cancel signal.
///
/// ```ignore
/// let (ctx, cancel) = Context::with_cancel();
/// let ctx = ctx.timeout(Duration::from_secs(2));
/// tokio::spawn(async move { shutdown.await; cancel.cancel() });
/// session.exec_context(&ctx, &stmt).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Fires the cancel signal of the [`Context`] it was created with.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Context {
    /// No deadline, never cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context plus the handle that cancels it.
    pub fn with_cancel() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        (
            Self {
                deadline: None,
                cancel: Some(rx),
            },
            CancelHandle { tx },
        )
    }

    /// Deadline `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().timeout(timeout)
    }

    /// Fixed deadline.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self::background().deadline_at(deadline)
    }

    /// Tighten the deadline to at most `timeout` from now.
    ///
    /// A timeout too large to represent as an instant leaves the deadline unchanged.
    pub fn timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.deadline_at(deadline),
            None => self,
        }
    }

    /// Tighten the deadline to at most `deadline`. An earlier existing deadline wins.
    pub fn deadline_at(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves once the context is cancelled; pends forever if it never can be.
    pub(crate) async fn cancelled(&self) {
        let Some(rx) = &self.cancel else {
            return std::future::pending().await;
        };
        let mut rx = rx.clone();
        let fired = rx.wait_for(|cancelled| *cancelled).await.is_ok();
        if !fired {
            // Handle dropped without cancelling.
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancel_handle_fires_clones() {
        let (ctx, cancel) = Context::with_cancel();
        let clone = ctx.clone();
        assert!(!ctx.is_cancelled());
        cancel.cancel();
        assert!(ctx.is_cancelled());
        assert!(cancel.is_cancelled());
        tokio::time::timeout(Duration::from_secs(1), clone.cancelled())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_background_never_cancels() {
        let ctx = Context::background();
        assert!(ctx.deadline().is_none());
        let res = tokio::time::timeout(Duration::from_millis(20), ctx.cancelled()).await;
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn test_unrepresentable_timeout_keeps_deadline() {
        assert!(Context::with_timeout(Duration::MAX).deadline().is_none());

        let ctx = Context::with_timeout(Duration::from_secs(5));
        let deadline = ctx.deadline();
        assert!(deadline.is_some());
        assert_eq!(ctx.timeout(Duration::MAX).deadline(), deadline);
    }

    #[tokio::test]
    async fn test_dropped_handle_never_cancels() {
        let (ctx, cancel) = Context::with_cancel();
        drop(cancel);
        let res = tokio::time::timeout(Duration::from_millis(20), ctx.cancelled()).await;
        assert!(res.is_err());
    }

    #[test]
    fn test_earlier_deadline_wins() {
        let now = Instant::now();
        let ctx = Context::with_deadline(now + Duration::from_secs(1))
            .deadline_at(now + Duration::from_secs(5));
        assert_eq!(ctx.deadline(), Some(now + Duration::from_secs(1)));
    }
}
