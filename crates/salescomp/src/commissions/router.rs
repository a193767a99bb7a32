use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{MonthRef, SaleDraft, UserId};
use super::engine::{CommissionEngine, CommissionError};
use super::ingestion::{BulkIngestionProcessor, BulkItemError, IngestError};
use super::stores::{SaleStore, TargetStore, UserDirectory};
use super::validation::{self, BatchFieldErrors, FieldError};

/// Router builder exposing the commission and ingestion endpoints.
pub fn commission_router<U, S, T>(
    engine: Arc<CommissionEngine<U, S, T>>,
    ingestion: Arc<BulkIngestionProcessor<U, S>>,
) -> Router
where
    U: UserDirectory + 'static,
    S: SaleStore + 'static,
    T: TargetStore + 'static,
{
    let state = CommissionState { engine, ingestion };
    Router::new()
        .route(
            "/api/v1/commissions/:user_id/summary",
            get(summary_handler::<U, S, T>),
        )
        .route(
            "/api/v1/commissions/:user_id/:month/:year",
            get(commission_handler::<U, S, T>),
        )
        .route("/api/v1/sales", post(create_sale_handler::<U, S, T>))
        .route("/api/v1/sales/bulk", post(bulk_sales_handler::<U, S, T>))
        .with_state(state)
}

struct CommissionState<U, S, T> {
    engine: Arc<CommissionEngine<U, S, T>>,
    ingestion: Arc<BulkIngestionProcessor<U, S>>,
}

impl<U, S, T> Clone for CommissionState<U, S, T> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            ingestion: Arc::clone(&self.ingestion),
        }
    }
}

fn validation_failure(details: Vec<FieldError>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({ "error": "Validation failed", "details": details })),
    )
        .into_response()
}

fn commission_failure(error: CommissionError) -> Response {
    match error {
        CommissionError::UserNotFound => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "error": "User not found" })),
        )
            .into_response(),
        CommissionError::Store(store) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({ "error": store.to_string() })),
        )
            .into_response(),
    }
}

async fn commission_handler<U, S, T>(
    State(state): State<CommissionState<U, S, T>>,
    Path((user_id, month, year)): Path<(String, u32, i32)>,
) -> Response
where
    U: UserDirectory + 'static,
    S: SaleStore + 'static,
    T: TargetStore + 'static,
{
    let errors = validation::validate_period(month, year);
    let period = match MonthRef::new(month, year) {
        Some(period) if errors.is_empty() => period,
        _ => return validation_failure(errors),
    };

    match state
        .engine
        .calculate_commission(&UserId(user_id), period)
        .await
    {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => commission_failure(error),
    }
}

#[derive(Debug, Deserialize)]
struct SummaryParams {
    year: Option<i32>,
}

async fn summary_handler<U, S, T>(
    State(state): State<CommissionState<U, S, T>>,
    Path(user_id): Path<String>,
    Query(params): Query<SummaryParams>,
) -> Response
where
    U: UserDirectory + 'static,
    S: SaleStore + 'static,
    T: TargetStore + 'static,
{
    let year = params.year.unwrap_or_else(|| Utc::now().year());
    let errors = validation::validate_year(year);
    if !errors.is_empty() {
        return validation_failure(errors);
    }

    match state.engine.annual_summary(&UserId(user_id), year).await {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => commission_failure(error),
    }
}

async fn create_sale_handler<U, S, T>(
    State(state): State<CommissionState<U, S, T>>,
    axum::Json(draft): axum::Json<SaleDraft>,
) -> Response
where
    U: UserDirectory + 'static,
    S: SaleStore + 'static,
    T: TargetStore + 'static,
{
    let errors = validation::validate_sale_draft(&draft, Utc::now());
    if !errors.is_empty() {
        return validation_failure(errors);
    }

    match state.ingestion.ingest_one(draft).await {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(IngestError::UserNotFound) => validation_failure(vec![FieldError {
            field: "user_id",
            message: "User not found".to_string(),
        }]),
        Err(IngestError::Store(store)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({ "error": store.to_string() })),
        )
            .into_response(),
    }
}

#[derive(Debug, Serialize)]
struct BulkResponse {
    success_count: usize,
    errors: Vec<BulkItemError>,
    validation_errors: Vec<BatchFieldErrors>,
}

async fn bulk_sales_handler<U, S, T>(
    State(state): State<CommissionState<U, S, T>>,
    axum::Json(drafts): axum::Json<Vec<SaleDraft>>,
) -> Response
where
    U: UserDirectory + 'static,
    S: SaleStore + 'static,
    T: TargetStore + 'static,
{
    let (valid, validation_errors) = validation::validate_bulk(drafts, Utc::now());
    if valid.is_empty() && !validation_errors.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "error": "No valid sales data provided",
                "validation_errors": validation_errors,
            })),
        )
            .into_response();
    }

    match state.ingestion.process(valid).await {
        Ok(outcome) => (
            StatusCode::OK,
            axum::Json(BulkResponse {
                success_count: outcome.success_count,
                errors: outcome.errors,
                validation_errors,
            }),
        )
            .into_response(),
        Err(store) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({ "error": store.to_string() })),
        )
            .into_response(),
    }
}
