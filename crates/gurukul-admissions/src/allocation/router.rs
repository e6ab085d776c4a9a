use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{ApplicationStatusUpdate, Class, Enrollment, RejectionRecord, Student};
use super::eligibility::evaluate;
use super::engine::{AllocationEngine, AllocationPolicy};
use super::intake::{AdmissionsDataset, DroppedPreference};
use super::ledger::CapacityEntry;

/// Request body for a one-shot allocation run.
#[derive(Debug, Deserialize)]
pub struct AllocationRequest {
    #[serde(flatten)]
    pub dataset: AdmissionsDataset,
    #[serde(default)]
    pub run_date: Option<NaiveDate>,
    #[serde(default)]
    pub policy: Option<AllocationPolicy>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AllocationResponse {
    pub run_date: NaiveDate,
    pub enrollments: Vec<Enrollment>,
    pub status_updates: Vec<ApplicationStatusUpdate>,
    pub rejections: Vec<RejectionRecord>,
    pub capacity: Vec<CapacityEntry>,
    pub dropped_preferences: Vec<DroppedPreference>,
}

#[derive(Debug, Deserialize)]
pub struct EligibilityRequest {
    pub student: Student,
    pub class: Class,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EligibilityResponse {
    pub eligible: bool,
    pub reason: String,
}

/// Router exposing allocation and eligibility checks over HTTP.
///
/// `policy` is used for requests that do not carry their own.
pub fn allocation_router(policy: AllocationPolicy) -> Router {
    Router::new()
        .route("/api/v1/admissions/allocations", post(allocate_handler))
        .route("/api/v1/admissions/eligibility", post(eligibility_handler))
        .with_state(Arc::new(policy))
}

pub(crate) async fn allocate_handler(
    State(default_policy): State<Arc<AllocationPolicy>>,
    axum::Json(request): axum::Json<AllocationRequest>,
) -> Response {
    let AllocationRequest {
        dataset,
        run_date,
        policy,
    } = request;

    let policy = policy.unwrap_or_else(|| default_policy.as_ref().clone());
    let run_date = run_date.unwrap_or_else(|| Local::now().date_naive());

    match AllocationEngine::new(policy).run(&dataset, run_date) {
        Ok(outcome) => {
            let body = AllocationResponse {
                run_date: outcome.run_date,
                capacity: outcome.ledger.snapshot(),
                enrollments: outcome.enrollments,
                status_updates: outcome.status_updates,
                rejections: outcome.rejections,
                dropped_preferences: outcome.dropped,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn eligibility_handler(
    axum::Json(request): axum::Json<EligibilityRequest>,
) -> axum::Json<EligibilityResponse> {
    let verdict = evaluate(&request.student, &request.class);
    axum::Json(EligibilityResponse {
        eligible: verdict.is_eligible(),
        reason: verdict.reason(),
    })
}
