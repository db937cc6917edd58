use std::io::Read;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use hwev_wire::{CursorState, JsonCursor};

use crate::config::DecoderConfig;

/// A free list of cursor states shared by every decode call.
///
/// Each decode leases one [`JsonCursor`] for its duration. The lease
/// hands back a recycled [`CursorState`] when one is idle, otherwise it
/// allocates a new one. Dropping the [`PooledCursor`] returns the state,
/// so the release happens on every exit path including unwinding.
///
/// ```text
///   acquire(src) ──► idle.pop() ──┬─► Some(state) ─► reset ─┐
///                                 └─► None ─► allocate ─────┤
///                                                           ▼
///                                     PooledCursor { JsonCursor }
///                                                           │ drop
///   idle.push(state) ◄── reset ◄── len < max_idle? ◄────────┘
/// ```
///
/// The mutex only guards the `Vec` push/pop; decoding runs unlocked.
#[derive(Debug)]
pub struct CursorPool {
    idle: Mutex<Vec<CursorState>>,
    max_idle: usize,
    buffer_capacity: usize,
    created: AtomicUsize,
    reused: AtomicUsize,
}

/// Snapshot of a pool's reuse counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// States allocated because none were idle.
    pub created: usize,
    /// Leases served from the idle list.
    pub reused: usize,
    /// States currently parked in the idle list.
    pub idle: usize,
}

impl CursorPool {
    pub fn new(max_idle: usize, buffer_capacity: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            max_idle,
            buffer_capacity,
            created: AtomicUsize::new(0),
            reused: AtomicUsize::new(0),
        }
    }

    pub fn from_config(config: &DecoderConfig) -> Self {
        Self::new(config.max_idle_cursors, config.buffer_capacity)
    }

    /// Lease a cursor reading from `source`.
    ///
    /// The cursor never carries a fault or leftover bytes from an
    /// earlier lease. Acquiring cannot fail.
    pub fn acquire<R: Read>(&self, source: R) -> PooledCursor<'_, R> {
        let recycled = self.lock().pop();
        let state = match recycled {
            Some(state) => {
                self.reused.fetch_add(1, Ordering::Relaxed);
                state
            }
            None => {
                let created = self.created.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::trace!(created, "cursor pool grew");
                CursorState::with_capacity(self.buffer_capacity)
            }
        };

        PooledCursor {
            pool: self,
            cursor: JsonCursor::with_state(source, state),
        }
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            created: self.created.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            idle: self.lock().len(),
        }
    }

    fn release(&self, mut state: CursorState) {
        // Detached placeholders have no buffer and are not worth keeping.
        if state.buffer_capacity() == 0 {
            return;
        }
        state.reset();
        let mut idle = self.lock();
        if idle.len() < self.max_idle {
            idle.push(state);
        }
    }

    /// Push and pop never leave the `Vec` half updated, so a poisoned
    /// lock is recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, Vec<CursorState>> {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CursorPool {
    fn default() -> Self {
        Self::from_config(&DecoderConfig::default())
    }
}

/// A leased cursor. Derefs to [`JsonCursor`]; returns its state to the
/// pool when dropped.
pub struct PooledCursor<'p, R> {
    pool: &'p CursorPool,
    cursor: JsonCursor<R>,
}

impl<R> Deref for PooledCursor<'_, R> {
    type Target = JsonCursor<R>;

    fn deref(&self) -> &Self::Target {
        &self.cursor
    }
}

impl<R> DerefMut for PooledCursor<'_, R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.cursor
    }
}

impl<R> Drop for PooledCursor<'_, R> {
    fn drop(&mut self) {
        self.pool.release(self.cursor.detach_state());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_lease_reuses_state() {
        let pool = CursorPool::new(4, 32);
        {
            let mut cursor = pool.acquire(&br#"{"a":1}"#[..]);
            assert_eq!(cursor.next_key().unwrap(), Some("a"));
        }
        assert_eq!(pool.stats().idle, 1);

        let mut cursor = pool.acquire(&br#"{"b":2}"#[..]);
        assert_eq!(cursor.next_key().unwrap(), Some("b"));
        drop(cursor);

        let stats = pool.stats();
        assert_eq!(stats.created, 1);
        assert_eq!(stats.reused, 1);
        assert_eq!(stats.idle, 1);
    }

    #[test]
    fn failed_lease_does_not_leak_poison() {
        let pool = CursorPool::new(4, 32);
        {
            let mut cursor = pool.acquire(&b"{\"a\" 1}"[..]);
            assert!(cursor.next_key().is_err());
            assert!(cursor.is_poisoned());
        }

        let cursor = pool.acquire(&b"{}"[..]);
        assert!(!cursor.is_poisoned());
        assert!(cursor.state().is_clear());
        assert_eq!(cursor.state().buffer_capacity(), 32);
    }

    #[test]
    fn idle_list_is_bounded() {
        let pool = CursorPool::new(2, 16);
        let leases: Vec<_> = (0..5).map(|_| pool.acquire(&b"{}"[..])).collect();
        drop(leases);

        let stats = pool.stats();
        assert_eq!(stats.created, 5);
        assert_eq!(stats.idle, 2);
    }

    #[test]
    fn zero_max_idle_keeps_nothing() {
        let pool = CursorPool::new(0, 16);
        drop(pool.acquire(&b"{}"[..]));
        drop(pool.acquire(&b"{}"[..]));

        let stats = pool.stats();
        assert_eq!(stats.created, 2);
        assert_eq!(stats.reused, 0);
        assert_eq!(stats.idle, 0);
    }

    #[test]
    fn release_survives_unwinding() {
        let pool = CursorPool::new(4, 16);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _cursor = pool.acquire(&b"{}"[..]);
            panic!("decode blew up");
        }));
        assert!(result.is_err());
        assert_eq!(pool.stats().idle, 1);
    }
}
