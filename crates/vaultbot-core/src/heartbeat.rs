//! Periodic background task with cooperative shutdown.
//!
//! Used to keep a "typing" indicator alive while a slow engine call is
//! in flight. The tick closure runs immediately on spawn and then on a
//! fixed interval until [`Heartbeat::stop`] cancels the task. Stop
//! waits for the task to finish so no tick can fire after it returns.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Handle to a running periodic task.
pub struct Heartbeat {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Heartbeat {
    /// Start ticking. The first tick fires immediately.
    pub fn spawn<F, Fut>(period: Duration, tick: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => {
                        trace!("heartbeat stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        tick().await;
                    }
                }
            }
        });

        Self { cancel, handle }
    }

    /// Cancel the task and wait for it to finish.
    pub async fn stop(self) {
        self.cancel.cancel();
        // A panic in the tick closure surfaces here as a join error;
        // shutdown proceeds either way.
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn ticks_fire_on_the_period() {
        let count = Arc::new(AtomicUsize::new(0));
        let tick_count = Arc::clone(&count);

        let hb = Heartbeat::spawn(Duration::from_millis(20), move || {
            let c = Arc::clone(&tick_count);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(70)).await;
        hb.stop().await;

        // First tick is immediate, then one roughly every 20ms.
        let n = count.load(Ordering::SeqCst);
        assert!(n >= 2, "expected at least 2 ticks, got {n}");
    }

    #[tokio::test]
    async fn no_ticks_after_stop_returns() {
        let count = Arc::new(AtomicUsize::new(0));
        let tick_count = Arc::clone(&count);

        let hb = Heartbeat::spawn(Duration::from_millis(10), move || {
            let c = Arc::clone(&tick_count);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(25)).await;
        hb.stop().await;
        let after_stop = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
    }

    #[tokio::test]
    async fn stop_immediately_after_spawn_is_clean() {
        let hb = Heartbeat::spawn(Duration::from_millis(10), || async {});
        hb.stop().await;
    }
}
