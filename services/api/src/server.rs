use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use salescomp::commissions::{BulkIngestionProcessor, CommissionEngine};
use salescomp::config::AppConfig;
use salescomp::error::AppError;
use salescomp::telemetry;
use tracing::info;

use crate::cli::ServeArgs;
use crate::demo;
use crate::infra::{
    default_commission_config, AppState, InMemorySaleStore, InMemoryTargetStore,
    InMemoryUserDirectory,
};
use crate::routes::{api_router, AdminState};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let users = Arc::new(InMemoryUserDirectory::default());
    let sales = Arc::new(InMemorySaleStore::default());
    let targets = Arc::new(InMemoryTargetStore::default());

    if args.seed {
        let seeded = demo::seed_sample_data(&users, &sales, &targets);
        info!(
            users = seeded.len(),
            sales = sales.record_count(),
            "seeded sample dataset"
        );
    }

    let commission_config = default_commission_config();
    let default_rate = commission_config.default_sale_commission_rate;
    let engine = Arc::new(CommissionEngine::new(
        users.clone(),
        sales.clone(),
        targets.clone(),
        commission_config,
    ));
    let ingestion = Arc::new(BulkIngestionProcessor::new(
        users.clone(),
        sales.clone(),
        default_rate,
    ));
    let admin = AdminState { users, targets };

    let app = api_router(engine, ingestion, admin)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "sales commission service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
