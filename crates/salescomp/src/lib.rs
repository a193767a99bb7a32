//! Sales compensation domain: monthly commission calculation, sale batch
//! ingestion, and the HTTP surface that exposes both.

pub mod commissions;
pub mod config;
pub mod error;
pub mod telemetry;
