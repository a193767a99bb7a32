use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use salescomp::commissions::{
    commission_router, validation, BulkIngestionProcessor, CommissionEngine, Region,
    RegionAssignment, Target, User, UserDirectory, UserId, UserStatus,
};
use serde::Deserialize;
use serde_json::json;

use crate::infra::{
    next_user_id, AppState, InMemorySaleStore, InMemoryTargetStore, InMemoryUserDirectory,
};

pub(crate) type Engine =
    CommissionEngine<InMemoryUserDirectory, InMemorySaleStore, InMemoryTargetStore>;
pub(crate) type Ingestion = BulkIngestionProcessor<InMemoryUserDirectory, InMemorySaleStore>;

#[derive(Clone)]
pub(crate) struct AdminState {
    pub(crate) users: Arc<InMemoryUserDirectory>,
    pub(crate) targets: Arc<InMemoryTargetStore>,
}

/// The full route table: domain endpoints, operability endpoints, and the
/// directory/target intake backed by the in-memory stores.
pub(crate) fn api_router(
    engine: Arc<Engine>,
    ingestion: Arc<Ingestion>,
    admin: AdminState,
) -> axum::Router {
    commission_router(engine, ingestion)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .merge(
            axum::Router::new()
                .route("/api/v1/users", axum::routing::post(create_user_endpoint))
                .route(
                    "/api/v1/targets",
                    axum::routing::post(create_target_endpoint),
                )
                .with_state(admin),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateUserRequest {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) region: Region,
    pub(crate) hire_date: DateTime<Utc>,
    #[serde(default)]
    pub(crate) region_start_date: Option<DateTime<Utc>>,
}

pub(crate) async fn create_user_endpoint(
    State(admin): State<AdminState>,
    Json(payload): Json<CreateUserRequest>,
) -> impl IntoResponse {
    let errors = validation::validate_user_profile(&payload.name, &payload.email);
    if !errors.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Validation failed", "details": errors })),
        )
            .into_response();
    }

    let region_start_date = payload.region_start_date.unwrap_or(payload.hire_date);
    let user = User {
        id: next_user_id(),
        name: payload.name,
        email: payload.email,
        region: payload.region,
        hire_date: payload.hire_date,
        status: UserStatus::Active,
        region_start_date,
        region_history: vec![RegionAssignment {
            region: payload.region,
            effective_from: region_start_date,
        }],
    };

    let stored = admin.users.add(user);
    (StatusCode::CREATED, Json(stored)).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateTargetRequest {
    pub(crate) user_id: String,
    pub(crate) month: u32,
    pub(crate) year: i32,
    pub(crate) target_amount: f64,
}

pub(crate) async fn create_target_endpoint(
    State(admin): State<AdminState>,
    Json(payload): Json<CreateTargetRequest>,
) -> impl IntoResponse {
    let errors = validation::validate_target(payload.month, payload.year, payload.target_amount);
    if !errors.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Validation failed", "details": errors })),
        )
            .into_response();
    }

    let user_id = UserId(payload.user_id);
    match admin.users.find_by_id(&user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Validation failed",
                    "details": [{ "field": "user_id", "message": "User not found" }],
                })),
            )
                .into_response();
        }
        Err(err) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response();
        }
    }

    let target = Target {
        user_id,
        month: payload.month,
        year: payload.year,
        amount: payload.target_amount,
    };
    admin.targets.set(target.clone());
    (StatusCode::CREATED, Json(target)).into_response()
}
