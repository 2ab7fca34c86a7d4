use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use campus_placement::error::AppError;
use campus_placement::workflows::placement::{
    placement_router, ApplicationRepository, EligibilityCriteria, PlacementDirectory,
    PlacementService, PostingEligibilityRecord,
};
use campus_placement::workflows::roster::{
    screen_roster, tally, RosterImporter, ScreeningOutcome, ScreeningTally,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct RosterScreenRequest {
    pub(crate) criteria: PostingEligibilityRecord,
    pub(crate) roster_csv: String,
    #[serde(default)]
    pub(crate) only_eligible: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct RosterScreenResponse {
    pub(crate) criteria: EligibilityCriteria,
    pub(crate) tally: ScreeningTally,
    pub(crate) students: Vec<ScreeningOutcome>,
}

pub(crate) fn with_placement_routes<D, R>(service: Arc<PlacementService<D, R>>) -> axum::Router
where
    D: PlacementDirectory + 'static,
    R: ApplicationRepository + 'static,
{
    placement_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/roster/screen",
            axum::routing::post(roster_screen_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    if ready {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "initializing" })),
        )
    }
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Screens an uploaded roster export against ad-hoc criteria.
pub(crate) async fn roster_screen_endpoint(
    Json(payload): Json<RosterScreenRequest>,
) -> Result<Json<RosterScreenResponse>, AppError> {
    let RosterScreenRequest {
        criteria,
        roster_csv,
        only_eligible,
    } = payload;

    let criteria = EligibilityCriteria::try_from(criteria)?;
    let students = RosterImporter::from_reader(Cursor::new(roster_csv.into_bytes()))?;

    let outcomes = screen_roster(&criteria, &students);
    let tally = tally(&outcomes);
    let students = if only_eligible {
        outcomes
            .into_iter()
            .filter(ScreeningOutcome::is_eligible)
            .collect()
    } else {
        outcomes
    };

    Ok(Json(RosterScreenResponse {
        criteria,
        tally,
        students,
    }))
}
