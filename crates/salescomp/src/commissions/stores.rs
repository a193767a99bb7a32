use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::domain::{MonthRef, SaleCategory, SaleRecord, Target, User, UserId};

/// Unclassified data-access failure. Store errors are surfaced to callers
/// as-is; nothing in this crate retries or recovers them.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Directory of salesperson profiles. Abstract so the engine and the
/// ingestion processor can be exercised against in-memory fakes.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError>;
}

/// Storage abstraction for sale records.
#[async_trait]
pub trait SaleStore: Send + Sync {
    /// Sale records for a user with `start <= date <= end`.
    async fn find_by_user_and_range(
        &self,
        user_id: &UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SaleRecord>, StoreError>;

    /// An already-persisted record with the same user, amount, date, and
    /// category, if any. Backs the bulk-ingestion duplicate check.
    async fn find_matching(
        &self,
        user_id: &UserId,
        amount: f64,
        date: DateTime<Utc>,
        category: SaleCategory,
    ) -> Result<Option<SaleRecord>, StoreError>;

    async fn insert(&self, record: SaleRecord) -> Result<SaleRecord, StoreError>;
}

/// Storage abstraction for monthly targets.
#[async_trait]
pub trait TargetStore: Send + Sync {
    async fn find_one(&self, user_id: &UserId, month: MonthRef)
        -> Result<Option<Target>, StoreError>;
}
