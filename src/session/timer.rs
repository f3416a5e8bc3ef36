//! Actor timers.
//!
//! A timer is a tokio task that sleeps and then posts a command into its
//! actor's inbox. It never touches actor state. Each schedule gets a new
//! generation number; rescheduling or cancelling a key aborts the old task,
//! and [`TimerSet::take`] ignores commands carrying a stale generation that
//! were already in flight.

use std::hash::Hash;
use std::time::Duration;

use rustc_hash::FxHashMap;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Keyed one-shot timers feeding an actor inbox.
#[derive(Debug)]
pub struct TimerSet<K> {
    next_generation: u64,
    pending: FxHashMap<K, (u64, JoinHandle<()>)>,
}

impl<K: Copy + Eq + Hash> TimerSet<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_generation: 0,
            pending: FxHashMap::default(),
        }
    }

    /// Arm `key`, replacing any timer already armed under it.
    ///
    /// After `after`, `make(generation)` is sent to `inbox`. Returns the
    /// generation.
    pub fn schedule<M, F>(&mut self, key: K, after: Duration, inbox: UnboundedSender<M>, make: F) -> u64
    where
        M: Send + 'static,
        F: FnOnce(u64) -> M + Send + 'static,
    {
        self.cancel(key);
        self.next_generation += 1;
        let generation = self.next_generation;
        let task = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = inbox.send(make(generation));
        });
        self.pending.insert(key, (generation, task));
        generation
    }

    /// Disarm `key`.
    pub fn cancel(&mut self, key: K) {
        if let Some((_, task)) = self.pending.remove(&key) {
            task.abort();
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, (_, task)) in self.pending.drain() {
            task.abort();
        }
    }

    /// Consume a fired timer. True only for the generation currently armed
    /// under `key`.
    pub fn take(&mut self, key: K, generation: u64) -> bool {
        match self.pending.get(&key) {
            Some((current, _)) if *current == generation => {
                self.pending.remove(&key);
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_armed(&self, key: K) -> bool {
        self.pending.contains_key(&key)
    }
}

impl<K: Copy + Eq + Hash> Default for TimerSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Drop for TimerSet<K> {
    fn drop(&mut self) {
        for (_, (_, task)) in self.pending.drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Key {
        Turn,
        Idle,
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let (tx, mut rx) = unbounded_channel();
        let mut timers = TimerSet::new();
        let generation = timers.schedule(Key::Turn, Duration::from_secs(5), tx, |g| g);

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(rx.try_recv().unwrap(), generation);
        assert!(timers.take(Key::Turn, generation));
        assert!(!timers.take(Key::Turn, generation));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_aborts_old_timer() {
        let (tx, mut rx) = unbounded_channel();
        let mut timers = TimerSet::new();
        let first = timers.schedule(Key::Turn, Duration::from_secs(5), tx.clone(), |g| g);
        tokio::time::sleep(Duration::from_secs(3)).await;
        let second = timers.schedule(Key::Turn, Duration::from_secs(5), tx, |g| g);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(rx.try_recv().is_err());
        assert!(!timers.take(Key::Turn, first));

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(rx.try_recv().unwrap(), second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let (tx, mut rx) = unbounded_channel::<u64>();
        let mut timers = TimerSet::new();
        timers.schedule(Key::Idle, Duration::from_secs(1), tx, |g| g);
        assert!(timers.is_armed(Key::Idle));

        timers.cancel(Key::Idle);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
        assert!(!timers.is_armed(Key::Idle));
    }
}
