//! Concurrency gate bounding in-flight fetches
//!
//! A fixed pool of interchangeable tokens backed by a tokio semaphore. Every
//! fetch task holds one token for its whole duration; the token is returned
//! when the guard drops, whichever way the task exits.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A fixed-capacity token pool
///
/// Cloning the gate shares the same pool.
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// A held token; released on drop
#[derive(Debug)]
pub struct GateToken {
    _permit: OwnedSemaphorePermit,
}

impl ConcurrencyGate {
    /// Creates a gate with `capacity` tokens
    ///
    /// Capacity is validated by configuration to be at least 1; a zero-capacity
    /// gate would never hand out a token.
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Waits until a token is free and takes it
    ///
    /// Waiters are served in the semaphore's queue order; there is no priority.
    /// Returns `None` once the gate has been closed.
    pub async fn acquire(&self) -> Option<GateToken> {
        let permit = self.semaphore.clone().acquire_owned().await.ok()?;
        Some(GateToken { _permit: permit })
    }

    /// Closes the gate: pending and future `acquire` calls return `None`
    ///
    /// Tokens already handed out stay valid until dropped.
    pub fn close(&self) {
        self.semaphore.close();
    }

    /// Total number of tokens
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of tokens currently held
    pub fn in_flight(&self) -> usize {
        self.capacity - self.semaphore.available_permits()
    }
}
