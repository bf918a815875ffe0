//! Per-key debouncing.
//!
//! Each key has at most one pending timer. Scheduling again cancels the
//! pending timer and starts a new one, so a burst of events collapses into a
//! single run once the key has been quiet for the full delay.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::trace;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
struct Pending {
    generation: u64,
    cancel: CancellationToken,
}

#[derive(Debug, Default)]
struct Timers {
    next_generation: u64,
    pending: HashMap<String, Pending>,
}

/// Debounces tasks by key.
///
/// Timers run as tokio tasks, so [`Debouncer::schedule`] must be called from
/// within a tokio runtime.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    timers: Arc<Mutex<Timers>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            timers: Arc::new(Mutex::new(Timers::default())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` once `key` has been quiet for the delay.
    ///
    /// Any timer already pending for `key` is cancelled.
    pub fn schedule<F>(&self, key: &str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let generation = {
            let mut timers = self.lock();
            timers.next_generation += 1;
            let generation = timers.next_generation;
            let previous = timers.pending.insert(
                key.to_string(),
                Pending {
                    generation,
                    cancel: cancel.clone(),
                },
            );
            if let Some(previous) = previous {
                previous.cancel.cancel();
            }
            generation
        };

        trace!("Debounce scheduled for '{}'", key);

        let delay = self.delay;
        let timers = Arc::clone(&self.timers);
        let key = key.to_string();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }

            {
                let mut timers = timers.lock().unwrap_or_else(PoisonError::into_inner);
                if !timers.pending.get(&key).is_some_and(|p| p.generation == generation) {
                    trace!("Debounce for '{}' superseded", key);
                    return;
                }
                timers.pending.remove(&key);
            }
            trace!("Debounce fired for '{}'", key);
            task.await;
        });
    }

    /// Cancel the pending timer for `key`. Returns `true` if one was pending.
    pub fn cancel(&self, key: &str) -> bool {
        match self.lock().pending.remove(key) {
            Some(pending) => {
                pending.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every pending timer.
    pub fn cancel_all(&self) {
        for (_, pending) in self.lock().pending.drain() {
            pending.cancel.cancel();
        }
    }

    /// Returns `true` if a timer is pending for `key`.
    pub fn is_pending(&self, key: &str) -> bool {
        self.lock().pending.contains_key(key)
    }

    fn lock(&self) -> MutexGuard<'_, Timers> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn bump(hits: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let hits = Arc::clone(hits);
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_runs_once() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            debouncer.schedule("username", bump(&hits));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(debouncer.is_pending("username"));

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending("username"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_at_deadline_fires_once() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..50 {
            debouncer.schedule("username", bump(&hits));
            tokio::time::sleep(Duration::from_millis(300)).await;
            let before = hits.load(Ordering::SeqCst);
            debouncer.schedule("username", bump(&hits));
            tokio::time::sleep(Duration::from_millis(400)).await;
            assert_eq!(hits.load(Ordering::SeqCst), before + 1);
        }
        assert!(!debouncer.is_pending("username"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_timer_never_fires() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..50 {
            debouncer.schedule("username", bump(&hits));
            tokio::time::sleep(Duration::from_millis(299)).await;
        }
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let hits = Arc::new(AtomicUsize::new(0));

        debouncer.schedule("username", bump(&hits));
        debouncer.schedule("email", bump(&hits));
        tokio::time::sleep(Duration::from_millis(301)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let hits = Arc::new(AtomicUsize::new(0));

        debouncer.schedule("username", bump(&hits));
        debouncer.schedule("email", bump(&hits));
        assert!(debouncer.cancel("username"));
        assert!(!debouncer.cancel("username"));
        debouncer.cancel_all();

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(debouncer.delay(), Duration::from_millis(300));
    }
}
