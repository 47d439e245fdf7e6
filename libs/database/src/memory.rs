//! In-memory unit of work for development and tests.
//!
//! [`MemoryStore`] owns a table behind an async mutex. [`MemoryStore::begin`]
//! takes the mutex for the whole unit, so units are serialized, and hands out a
//! [`StagedUnit`] that works on a private copy. Commit writes the copy back;
//! rollback or drop throws it away.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, OwnedMutexGuard};

use crate::common::DatabaseResult;
use crate::unit_of_work::UnitOfWork;

/// Shared in-memory table of type `T`
#[derive(Debug, Default)]
pub struct MemoryStore<T> {
    state: Arc<Mutex<T>>,
}

impl<T> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Clone + Send + 'static> MemoryStore<T> {
    pub fn new(initial: T) -> Self {
        Self {
            state: Arc::new(Mutex::new(initial)),
        }
    }

    /// Open a unit of work. Waits until any other open unit finishes.
    pub async fn begin(&self) -> StagedUnit<T> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = Mutex::new(guard.clone());
        StagedUnit { guard, staged }
    }

    /// Snapshot of the committed state
    pub async fn snapshot(&self) -> T {
        self.state.lock().await.clone()
    }
}

/// A unit of work over a private copy of the table
#[derive(Debug)]
pub struct StagedUnit<T> {
    guard: OwnedMutexGuard<T>,
    staged: Mutex<T>,
}

impl<T: Send> StagedUnit<T> {
    /// Access the staged copy
    pub async fn table(&self) -> MutexGuard<'_, T> {
        self.staged.lock().await
    }
}

#[async_trait]
impl<T: Send + 'static> UnitOfWork for StagedUnit<T> {
    async fn commit(self) -> DatabaseResult<()> {
        let StagedUnit { mut guard, staged } = self;
        *guard = staged.into_inner();
        Ok(())
    }

    async fn rollback(self) -> DatabaseResult<()> {
        Ok(())
    }
}
