//! Per-system mutual exclusion.
//!
//! Moves, calls, selections and maintenance toggles read a snapshot of a
//! system and write back derived state. Two of them running at once on the
//! same system could both decide on the same stale snapshot, so every
//! mutating use-case holds the system's lock from read to commit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;

use elevator_domain::id::SystemId;

type LockMap = HashMap<SystemId, Arc<tokio::sync::Mutex<()>>>;

/// One async mutex per system, created on first use and dropped once no
/// caller holds or waits for it.
#[derive(Debug, Default)]
pub struct SystemLocks {
    locks: Mutex<LockMap>,
}

impl SystemLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other caller holds the lock for `id`, then take it.
    /// The lock is released when the guard is dropped.
    pub async fn acquire(&self, id: SystemId) -> SystemGuard<'_> {
        let lock = {
            let mut locks = self.map();
            Arc::clone(locks.entry(id).or_default())
        };
        SystemGuard {
            owner: self,
            guard: Some(lock.lock_owned().await),
        }
    }

    fn map(&self) -> std::sync::MutexGuard<'_, LockMap> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Forget every lock only the map still refers to.
    fn evict_unused(&self) {
        self.map().retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.map().len()
    }
}

/// Holds a system's lock; dropping it releases the lock.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct SystemGuard<'a> {
    owner: &'a SystemLocks,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SystemGuard<'_> {
    fn drop(&mut self) {
        // Release first so this guard's reference no longer counts.
        drop(self.guard.take());
        self.owner.evict_unused();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn should_block_second_caller_on_same_system() {
        let locks = SystemLocks::new();
        let id = SystemId::new();

        let guard = locks.acquire(id).await;
        let second = tokio::time::timeout(Duration::from_millis(20), locks.acquire(id)).await;
        assert!(second.is_err(), "second acquire should wait");

        drop(guard);
        let third = tokio::time::timeout(Duration::from_millis(20), locks.acquire(id)).await;
        assert!(third.is_ok(), "lock should be free after drop");
    }

    #[tokio::test]
    async fn should_not_block_other_systems() {
        let locks = SystemLocks::new();
        let _guard = locks.acquire(SystemId::new()).await;

        let other =
            tokio::time::timeout(Duration::from_millis(20), locks.acquire(SystemId::new())).await;
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn should_forget_locks_once_released() {
        let locks = SystemLocks::new();
        for _ in 0..10_000 {
            let guard = locks.acquire(SystemId::new()).await;
            drop(guard);
        }
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn should_keep_lock_while_someone_waits_for_it() {
        let locks = SystemLocks::new();
        let id = SystemId::new();

        let guard = locks.acquire(id).await;
        let (_, waited) = tokio::join!(
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                drop(guard);
            },
            locks.acquire(id),
        );
        assert_eq!(locks.len(), 1);

        drop(waited);
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn should_forget_lock_after_abandoned_wait() {
        let locks = SystemLocks::new();
        let id = SystemId::new();

        let guard = locks.acquire(id).await;
        let abandoned = tokio::time::timeout(Duration::from_millis(10), locks.acquire(id)).await;
        assert!(abandoned.is_err());

        drop(guard);
        assert_eq!(locks.len(), 0);
    }
}
