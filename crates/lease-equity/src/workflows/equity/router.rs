use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Datelike, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::domain::{EquityEstimate, EstimateMode, InquiryId, LeaseInquiry, VehicleLeaseInput};
use super::repository::{InquiryNotifier, InquiryRepository, RepositoryError};
use super::service::{InquiryServiceError, LeaseEquityService};
use crate::error::AppError;

const DEFAULT_RECENT_LIMIT: usize = 20;

/// Response body for estimate submissions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    #[serde(flatten)]
    pub estimate: EquityEstimate,
    pub estimate_mode: EstimateMode,
    pub inquiry_id: String,
}

impl From<LeaseInquiry> for EstimateResponse {
    fn from(inquiry: LeaseInquiry) -> Self {
        Self {
            estimate: inquiry.assessment.estimate,
            estimate_mode: inquiry.assessment.mode,
            inquiry_id: inquiry.id.0,
        }
    }
}

/// A stored inquiry as returned by the lookup and listing endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryResponse {
    pub inquiry_id: String,
    pub submitted_at: DateTime<Utc>,
    pub input: VehicleLeaseInput,
    #[serde(flatten)]
    pub estimate: EquityEstimate,
    pub estimate_mode: EstimateMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_reasoning: Option<String>,
}

impl From<LeaseInquiry> for InquiryResponse {
    fn from(inquiry: LeaseInquiry) -> Self {
        Self {
            inquiry_id: inquiry.id.0,
            submitted_at: inquiry.submitted_at,
            input: inquiry.input,
            estimate: inquiry.assessment.estimate,
            estimate_mode: inquiry.assessment.mode,
            analysis_reasoning: inquiry.assessment.analysis_reasoning,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecentQuery {
    limit: Option<usize>,
}

/// Router builder exposing the equity estimate endpoints.
pub fn equity_router<R, N>(service: Arc<LeaseEquityService<R, N>>) -> Router
where
    R: InquiryRepository + 'static,
    N: InquiryNotifier + 'static,
{
    Router::new()
        .route("/api/v1/equity/estimate", post(estimate_handler::<R, N>))
        .route("/api/v1/equity/inquiries", get(recent_handler::<R, N>))
        .route(
            "/api/v1/equity/inquiries/:inquiry_id",
            get(inquiry_handler::<R, N>),
        )
        .with_state(service)
}

pub(crate) async fn estimate_handler<R, N>(
    State(service): State<Arc<LeaseEquityService<R, N>>>,
    axum::Json(input): axum::Json<VehicleLeaseInput>,
) -> Response
where
    R: InquiryRepository + 'static,
    N: InquiryNotifier + 'static,
{
    let current_year = Local::now().year();
    match service.submit(input, current_year).await {
        Ok(inquiry) => {
            let body = EstimateResponse::from(inquiry);
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(InquiryServiceError::Input(error)) => AppError::from(error).into_response(),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn inquiry_handler<R, N>(
    State(service): State<Arc<LeaseEquityService<R, N>>>,
    Path(inquiry_id): Path<String>,
) -> Response
where
    R: InquiryRepository + 'static,
    N: InquiryNotifier + 'static,
{
    let id = InquiryId(inquiry_id);
    match service.get(&id) {
        Ok(inquiry) => {
            let body = InquiryResponse::from(inquiry);
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(InquiryServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "inquiry not found",
                "inquiry_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn recent_handler<R, N>(
    State(service): State<Arc<LeaseEquityService<R, N>>>,
    Query(query): Query<RecentQuery>,
) -> Response
where
    R: InquiryRepository + 'static,
    N: InquiryNotifier + 'static,
{
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    match service.recent(limit) {
        Ok(inquiries) => {
            let inquiries: Vec<InquiryResponse> =
                inquiries.into_iter().map(InquiryResponse::from).collect();
            (StatusCode::OK, axum::Json(json!({ "inquiries": inquiries }))).into_response()
        }
        Err(other) => internal_error(other),
    }
}

fn internal_error(err: InquiryServiceError) -> Response {
    error!(error = %err, "equity request failed");
    let payload = json!({ "error": "internal error" });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
