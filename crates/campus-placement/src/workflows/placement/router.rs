use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationId, ApplicationStatus, PostingId, StudentId};
use super::eligibility::{evaluate, CandidateEducation, EligibilityCriteria};
use super::records::{PostingEligibilityRecord, StudentEducationRecord};
use super::repository::{ApplicationRepository, ApplicationView, PlacementDirectory};
use super::service::{PlacementService, PlacementServiceError};

/// Ad-hoc evaluation payload in the upstream record shape.
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub criteria: PostingEligibilityRecord,
    pub candidate: StudentEducationRecord,
}

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub student_id: String,
}

#[derive(Debug, Deserialize)]
pub struct BulkStatusRequest {
    pub application_ids: Vec<String>,
    pub status: ApplicationStatus,
}

/// Router builder exposing eligibility checks, the application gate, and admin triage.
pub fn placement_router<D, R>(service: Arc<PlacementService<D, R>>) -> Router
where
    D: PlacementDirectory + 'static,
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route("/api/v1/eligibility/evaluate", post(evaluate_handler))
        .route(
            "/api/v1/postings/:posting_id/eligibility/:student_id",
            get(eligibility_handler::<D, R>),
        )
        .route(
            "/api/v1/postings/:posting_id/applications",
            post(apply_handler::<D, R>).get(applications_handler::<D, R>),
        )
        .route(
            "/api/v1/postings/:posting_id/eligible-students",
            get(eligible_students_handler::<D, R>),
        )
        .route(
            "/api/v1/postings/:posting_id/stats",
            get(stats_handler::<D, R>),
        )
        .route(
            "/api/v1/applications/status",
            patch(bulk_status_handler::<D, R>),
        )
        .with_state(service)
}

pub(crate) async fn evaluate_handler(Json(request): Json<EvaluateRequest>) -> Response {
    let criteria = match EligibilityCriteria::try_from(request.criteria) {
        Ok(criteria) => criteria,
        Err(error) => return bad_request(error.to_string()),
    };
    let candidate = match CandidateEducation::try_from(request.candidate) {
        Ok(candidate) => candidate,
        Err(error) => return bad_request(error.to_string()),
    };

    let result = evaluate(&criteria, &candidate);
    (StatusCode::OK, Json(result)).into_response()
}

pub(crate) async fn eligibility_handler<D, R>(
    State(service): State<Arc<PlacementService<D, R>>>,
    Path((posting_id, student_id)): Path<(String, String)>,
) -> Response
where
    D: PlacementDirectory + 'static,
    R: ApplicationRepository + 'static,
{
    match service.check(&PostingId(posting_id), &StudentId(student_id)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn apply_handler<D, R>(
    State(service): State<Arc<PlacementService<D, R>>>,
    Path(posting_id): Path<String>,
    Json(request): Json<ApplyRequest>,
) -> Response
where
    D: PlacementDirectory + 'static,
    R: ApplicationRepository + 'static,
{
    match service.apply(
        &PostingId(posting_id),
        &StudentId(request.student_id),
        Utc::now(),
    ) {
        Ok(application) => {
            let view = ApplicationView::from(&application);
            (StatusCode::CREATED, Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn applications_handler<D, R>(
    State(service): State<Arc<PlacementService<D, R>>>,
    Path(posting_id): Path<String>,
) -> Response
where
    D: PlacementDirectory + 'static,
    R: ApplicationRepository + 'static,
{
    match service.applications(&PostingId(posting_id)) {
        Ok(applications) => {
            let views = applications
                .iter()
                .map(ApplicationView::from)
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(json!({ "applications": views }))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn eligible_students_handler<D, R>(
    State(service): State<Arc<PlacementService<D, R>>>,
    Path(posting_id): Path<String>,
) -> Response
where
    D: PlacementDirectory + 'static,
    R: ApplicationRepository + 'static,
{
    match service.eligible_students(&PostingId(posting_id)) {
        Ok(students) => (StatusCode::OK, Json(json!({ "students": students }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn stats_handler<D, R>(
    State(service): State<Arc<PlacementService<D, R>>>,
    Path(posting_id): Path<String>,
) -> Response
where
    D: PlacementDirectory + 'static,
    R: ApplicationRepository + 'static,
{
    match service.stats(&PostingId(posting_id)) {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn bulk_status_handler<D, R>(
    State(service): State<Arc<PlacementService<D, R>>>,
    Json(request): Json<BulkStatusRequest>,
) -> Response
where
    D: PlacementDirectory + 'static,
    R: ApplicationRepository + 'static,
{
    let ids = request
        .application_ids
        .into_iter()
        .map(ApplicationId)
        .collect::<Vec<_>>();

    match service.update_statuses(&ids, request.status) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

fn bad_request(message: String) -> Response {
    let payload = json!({
        "error": "INVALID_RECORD",
        "message": message,
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

fn error_response(error: PlacementServiceError) -> Response {
    let status = match &error {
        PlacementServiceError::PostingNotFound(_) | PlacementServiceError::StudentNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        PlacementServiceError::MissingEducation(_)
        | PlacementServiceError::DeadlinePassed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        PlacementServiceError::PostingClosed { .. }
        | PlacementServiceError::AlreadyApplied { .. } => StatusCode::CONFLICT,
        PlacementServiceError::Ineligible { .. } => StatusCode::FORBIDDEN,
        PlacementServiceError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
        PlacementServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let mut payload = json!({
        "error": error.kind(),
        "message": error.to_string(),
    });
    if let PlacementServiceError::Ineligible { reasons } = &error {
        payload["reasons"] = json!(reasons);
    }

    (status, Json(payload)).into_response()
}
