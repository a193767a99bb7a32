use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use super::domain::{SaleDraft, SaleId, SaleRecord};
use super::stores::{SaleStore, StoreError, UserDirectory};

static SALE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_sale_id() -> SaleId {
    let id = SALE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SaleId(format!("sale-{id:06}"))
}

/// Admits sale drafts against the stores. Batches are processed strictly in
/// input order with per-item isolation: a rejected item never aborts the
/// batch, only a store failure does, and then prior inserts stay persisted.
pub struct BulkIngestionProcessor<U, S> {
    users: Arc<U>,
    sales: Arc<S>,
    default_commission_rate: f64,
}

/// Batch outcome: how many drafts were persisted and which were rejected.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub success_count: usize,
    pub errors: Vec<BulkItemError>,
}

/// One rejected batch item, by position in the submitted batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BulkItemError {
    pub index: usize,
    pub error: BulkItemRejection,
}

/// Semantic rejections surfaced per item. The wire strings match the
/// original ingestion API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum BulkItemRejection {
    #[error("User not found")]
    #[serde(rename = "User not found")]
    UserNotFound,
    #[error("Duplicate sale found")]
    #[serde(rename = "Duplicate sale found")]
    DuplicateSale,
}

/// Error raised by single-sale ingestion.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl<U, S> BulkIngestionProcessor<U, S>
where
    U: UserDirectory,
    S: SaleStore,
{
    pub fn new(users: Arc<U>, sales: Arc<S>, default_commission_rate: f64) -> Self {
        Self {
            users,
            sales,
            default_commission_rate,
        }
    }

    /// Persist a single draft after the user-existence check.
    pub async fn ingest_one(&self, draft: SaleDraft) -> Result<SaleRecord, IngestError> {
        if self.users.find_by_id(&draft.user_id).await?.is_none() {
            return Err(IngestError::UserNotFound);
        }
        Ok(self.sales.insert(self.record_from_draft(draft)).await?)
    }

    /// Admit a batch in input order. Items referencing an unknown user or
    /// duplicating a persisted sale are recorded by index and skipped;
    /// everything else is inserted. No transaction spans the batch.
    pub async fn process(&self, drafts: Vec<SaleDraft>) -> Result<BulkOutcome, StoreError> {
        let mut outcome = BulkOutcome::default();

        for (index, draft) in drafts.into_iter().enumerate() {
            if self.users.find_by_id(&draft.user_id).await?.is_none() {
                outcome.errors.push(BulkItemError {
                    index,
                    error: BulkItemRejection::UserNotFound,
                });
                continue;
            }

            let duplicate = self
                .sales
                .find_matching(&draft.user_id, draft.amount, draft.date, draft.category)
                .await?;
            if duplicate.is_some() {
                outcome.errors.push(BulkItemError {
                    index,
                    error: BulkItemRejection::DuplicateSale,
                });
                continue;
            }

            self.sales.insert(self.record_from_draft(draft)).await?;
            outcome.success_count += 1;
        }

        Ok(outcome)
    }

    fn record_from_draft(&self, draft: SaleDraft) -> SaleRecord {
        SaleRecord {
            id: next_sale_id(),
            user_id: draft.user_id,
            amount: draft.amount,
            date: draft.date,
            category: draft.category,
            commission_rate: draft
                .commission_rate
                .unwrap_or(self.default_commission_rate),
        }
    }
}
