//! Unit-of-work abstraction shared by every domain store.
//!
//! A store opens a unit with `begin()`, the service runs all of its reads and
//! writes through that unit, and [`finish_unit`] commits on success or rolls
//! back on failure. Dropping a unit without committing discards its changes.

use async_trait::async_trait;
use std::fmt::Display;
use tracing::warn;

use crate::common::{DatabaseError, DatabaseResult};

/// An atomic persistence boundary around a single service operation
#[async_trait]
pub trait UnitOfWork: Send + Sized {
    /// Make every change performed through this unit visible to later units
    async fn commit(self) -> DatabaseResult<()>;

    /// Discard every change performed through this unit
    async fn rollback(self) -> DatabaseResult<()>;
}

/// Commit `work` when `result` is `Ok`, roll it back otherwise.
///
/// A failed commit replaces the successful result with the commit error. A
/// failed rollback is logged and the original error is returned unchanged.
pub async fn finish_unit<W, T, E>(work: W, result: Result<T, E>) -> Result<T, E>
where
    W: UnitOfWork,
    E: From<DatabaseError> + Display,
{
    match result {
        Ok(value) => {
            work.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = work.rollback().await {
                warn!(error = %rollback_err, cause = %err, "Rollback failed");
            }
            Err(err)
        }
    }
}

#[cfg(feature = "postgres")]
#[async_trait]
impl UnitOfWork for sea_orm::DatabaseTransaction {
    async fn commit(self) -> DatabaseResult<()> {
        sea_orm::DatabaseTransaction::commit(self)
            .await
            .map_err(DatabaseError::from)
    }

    async fn rollback(self) -> DatabaseResult<()> {
        sea_orm::DatabaseTransaction::rollback(self)
            .await
            .map_err(DatabaseError::from)
    }
}
