//! Cancellable one-shot timer used for auto-resume.

use std::fmt;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A delayed action running on a tokio task.
///
/// Cancelling (explicitly or by dropping the handle) guarantees the action is
/// not started afterwards. The generation lets the owner tell a stale firing
/// apart from the timer it currently tracks.
pub struct DelayedAction {
    generation: u64,
    delay: Duration,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl DelayedAction {
    pub fn spawn<F>(
        handle: &Handle,
        generation: u64,
        delay: Duration,
        action: F,
    ) -> Self
    where
        F: FnOnce(u64) + Send + 'static,
    {
        let token = CancellationToken::new();
        let child = token.clone();
        let task = handle.spawn(async move {
            tokio::select! {
                biased;
                _ = child.cancelled() => {
                    tracing::trace!(target: "ticker::timer", generation, "delayed action cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    if !child.is_cancelled() {
                        tracing::trace!(target: "ticker::timer", generation, "delayed action firing");
                        action(generation);
                    }
                }
            }
        });

        Self {
            generation,
            delay,
            token,
            task,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for DelayedAction {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl fmt::Debug for DelayedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelayedAction")
            .field("generation", &self.generation)
            .field("delay", &self.delay)
            .field("cancelled", &self.token.is_cancelled())
            .field("finished", &self.task.is_finished())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay() {
        let fired = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&fired);
        let timer = DelayedAction::spawn(
            &Handle::current(),
            7,
            Duration::from_secs(2),
            move |generation| seen.store(generation, Ordering::SeqCst),
        );

        tokio::time::sleep(Duration::from_millis(1_999)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 7);
        assert_eq!(timer.generation(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_fires() {
        let fired = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&fired);
        let timer = DelayedAction::spawn(
            &Handle::current(),
            1,
            Duration::from_secs(1),
            move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            },
        );
        timer.cancel();
        assert!(timer.is_cancelled());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(timer.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_cancels() {
        let fired = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&fired);
        drop(DelayedAction::spawn(
            &Handle::current(),
            1,
            Duration::from_millis(10),
            move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            },
        ));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
