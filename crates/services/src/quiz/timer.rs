use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

/// Repeating tick source backed by a tokio task.
///
/// The task is aborted on `cancel()` and on drop, so a session torn down
/// mid-countdown never leaves a timer firing.
#[derive(Debug, Default)]
pub(crate) struct TickTimer {
    handle: Option<JoinHandle<()>>,
}

impl TickTimer {
    /// Call `on_tick` every `period`, starting one period from now, until it
    /// returns `ControlFlow::Break` or the timer is cancelled.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn spawn<F, Fut>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            loop {
                ticks.tick().await;
                if on_tick().await.is_break() {
                    break;
                }
            }
        });
        Self {
            handle: Some(handle),
        }
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period_until_break() {
        let count = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&count);
        let timer = TickTimer::spawn(Duration::from_secs(1), move || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) + 1 >= 3 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }
        });

        tokio::time::sleep(Duration::from_millis(10_500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_ticks() {
        let count = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&count);
        let mut timer = TickTimer::spawn(Duration::from_secs(1), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                ControlFlow::Continue(())
            }
        });

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        timer.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(!timer.is_running());
    }
}
