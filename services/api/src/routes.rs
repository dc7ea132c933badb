use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use lease_equity::workflows::equity::{
    equity_router, InquiryNotifier, InquiryRepository, LeaseEquityService,
};
use lease_equity::workflows::payoff::{payoff_router, PayoffDirectory};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_service_routes<R, N>(
    service: Arc<LeaseEquityService<R, N>>,
    directory: Arc<PayoffDirectory>,
) -> axum::Router
where
    R: InquiryRepository + 'static,
    N: InquiryNotifier + 'static,
{
    equity_router(service)
        .merge(payoff_router(directory))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryInquiryRepository, TracingNotifier};
    use axum::body::Body;
    use axum::http::Request;
    use lease_equity::workflows::equity::EquityEstimator;
    use std::io::Cursor;
    use tower::ServiceExt;

    fn router() -> axum::Router {
        let service = Arc::new(LeaseEquityService::new(
            EquityEstimator::offline(),
            Arc::new(InMemoryInquiryRepository::default()),
            Arc::new(TracingNotifier),
        ));
        let directory = PayoffDirectory::from_reader(Cursor::new(
            "Lender,Payoff Phone\nKia Motors Finance,800-555-0130\n",
        ))
        .expect("directory parses");
        with_service_routes(service, Arc::new(directory))
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn merged_router_serves_estimates_and_payoff_lookups() {
        let response = router()
            .oneshot(
                Request::post("/api/v1/equity/estimate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({
                            "make": "Kia",
                            "model": "Sportage",
                            "year": 2023,
                            "currentMileage": 0,
                            "annualMileageAllowance": 12000,
                            "monthsRemaining": 36,
                            "leaseTerm": 36
                        })
                        .to_string(),
                    ))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router()
            .oneshot(
                Request::get("/api/v1/payoff/lenders/kia%20motors%20finance")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
