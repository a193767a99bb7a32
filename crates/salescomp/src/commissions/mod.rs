//! Commission calculation and sale ingestion workflows.

pub mod domain;
pub mod engine;
pub mod ingestion;
pub mod router;
pub mod stores;
pub mod validation;

pub use domain::{
    CommissionResult, CommissionSummary, MonthRef, Region, RegionAssignment, RegionSegment,
    SaleCategory, SaleDraft, SaleId, SaleRecord, Target, User, UserId, UserStatus,
};
pub use engine::{CommissionConfig, CommissionEngine, CommissionError, RegionalMultipliers};
pub use ingestion::{
    BulkIngestionProcessor, BulkItemError, BulkItemRejection, BulkOutcome, IngestError,
};
pub use router::commission_router;
pub use stores::{SaleStore, StoreError, TargetStore, UserDirectory};
