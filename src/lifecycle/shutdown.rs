//! Shutdown coordination for the server supervisor.

use tokio::sync::watch;

/// Why shutdown was initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownCause {
    /// A termination signal (SIGINT/SIGTERM) was delivered.
    Signal,
    /// The serve loop returned, either cleanly or with an error.
    ServeExit,
}

/// Write-once shutdown event shared between the serve task and the supervisor.
///
/// The first call to [`trigger`](Shutdown::trigger) wins and records its
/// cause; later calls are no-ops. Waiters observe the cause with the
/// happens-before ordering the watch channel provides, so no extra locking
/// is needed around the trigger.
#[derive(Clone)]
pub struct Shutdown {
    tx: watch::Sender<Option<ShutdownCause>>,
}

impl Shutdown {
    /// Create a new, untriggered shutdown event.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// Record the shutdown trigger. Returns `true` if this call won the race.
    pub fn trigger(&self, cause: ShutdownCause) -> bool {
        self.tx.send_if_modified(|slot| {
            if slot.is_none() {
                *slot = Some(cause);
                true
            } else {
                false
            }
        })
    }

    /// The recorded cause, if shutdown has been triggered.
    pub fn cause(&self) -> Option<ShutdownCause> {
        *self.tx.borrow()
    }

    /// Wait until shutdown has been triggered and return the winning cause.
    pub async fn triggered(&self) -> ShutdownCause {
        let mut rx = self.tx.subscribe();
        let slot = rx
            .wait_for(Option::is_some)
            .await
            .expect("shutdown sender dropped while still borrowed");
        (*slot).expect("watch predicate guarantees a cause")
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_trigger_wins() {
        let shutdown = Shutdown::new();
        assert!(shutdown.trigger(ShutdownCause::Signal));
        assert!(!shutdown.trigger(ShutdownCause::ServeExit));
        assert_eq!(shutdown.cause(), Some(ShutdownCause::Signal));
        assert_eq!(shutdown.triggered().await, ShutdownCause::Signal);
    }

    #[tokio::test]
    async fn repeat_trigger_is_a_noop() {
        let shutdown = Shutdown::new();
        shutdown.trigger(ShutdownCause::ServeExit);
        shutdown.trigger(ShutdownCause::ServeExit);
        assert_eq!(shutdown.cause(), Some(ShutdownCause::ServeExit));
    }

    #[tokio::test]
    async fn waiter_observes_trigger_from_another_task() {
        let shutdown = Shutdown::new();
        let waiter = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move { shutdown.triggered().await })
        };
        shutdown.trigger(ShutdownCause::Signal);
        assert_eq!(waiter.await.unwrap(), ShutdownCause::Signal);
    }
}
