//! Bounded worker pool.
//!
//! The pool does not own or run workers; it only bounds how many are running.
//! A caller acquires a `Slot` before spawning a task and the task releases it
//! when finished (explicitly with `Slot::free`, or by dropping it). `wait()`
//! blocks until every slot is back and then closes the pool for good.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting semaphore bounding concurrently running units of work.
#[derive(Debug, Clone)]
pub struct Pool {
    capacity: usize,
    permits: Arc<Semaphore>,
    done: Arc<AtomicBool>,
}

/// One occupied concurrency slot. Released on `free()` or drop.
#[derive(Debug)]
#[must_use = "a slot is released as soon as it is dropped"]
pub struct Slot {
    _permit: OwnedSemaphorePermit,
}

impl Slot {
    /// Releases the slot.
    pub fn free(self) {}
}

impl Pool {
    /// Creates a pool with `capacity` slots. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            permits: Arc::new(Semaphore::new(capacity)),
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Maximum number of concurrently held slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots currently free.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Waits for a free slot and occupies it.
    ///
    /// # Panics
    ///
    /// Panics if called after `wait()` has completed; requesting work on a
    /// finished pool is a programming error.
    pub async fn slot(&self) -> Slot {
        if self.done.load(Ordering::SeqCst) {
            panic!("Pool::slot() called on completed pool");
        }
        match Arc::clone(&self.permits).acquire_owned().await {
            Ok(permit) => Slot { _permit: permit },
            Err(_) => panic!("Pool::slot() called on completed pool"),
        }
    }

    /// Waits until every slot has been released, then marks the pool done.
    ///
    /// # Panics
    ///
    /// Panics if the pool has already completed.
    pub async fn wait(&self) {
        if self.done.load(Ordering::SeqCst) {
            panic!("Pool::wait() called on completed pool");
        }
        let capacity = u32::try_from(self.capacity).unwrap_or(u32::MAX);
        match self.permits.acquire_many(capacity).await {
            Ok(all) => all.forget(),
            Err(_) => panic!("Pool::wait() called on completed pool"),
        }
        self.done.store(true, Ordering::SeqCst);
        self.permits.close();
    }

    /// Whether `wait()` has completed.
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::SeqCst)
    }
}
