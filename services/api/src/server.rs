use crate::cli::ServeArgs;
use crate::infra::{
    demo_postings, demo_students, load_postings, AppState, InMemoryApplicationRepository,
    InMemoryPlacementDirectory,
};
use crate::routes::with_placement_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use campus_placement::config::AppConfig;
use campus_placement::error::AppError;
use campus_placement::telemetry;
use campus_placement::workflows::placement::PlacementService;
use campus_placement::workflows::roster::RosterImporter;
use chrono::Utc;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

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

    let directory = Arc::new(load_directory(&config)?);
    info!(
        postings = directory.posting_count(),
        students = directory.student_count(),
        "placement directory loaded"
    );
    let repository = Arc::new(InMemoryApplicationRepository::default());
    let placement_service = Arc::new(PlacementService::new(directory, repository));

    let app = with_placement_routes(placement_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "campus placement gate ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Configured files take precedence; sample data fills any gap outside production.
fn load_directory(config: &AppConfig) -> Result<InMemoryPlacementDirectory, AppError> {
    let seed = config.environment.seeds_demo_data();

    let postings = match &config.data.postings_path {
        Some(path) => load_postings(path)?,
        None if seed => demo_postings(Utc::now()),
        None => Vec::new(),
    };
    let students = match &config.data.roster_path {
        Some(path) => RosterImporter::from_path(path)?,
        None if seed => demo_students(),
        None => Vec::new(),
    };

    Ok(InMemoryPlacementDirectory::new(postings, students))
}
