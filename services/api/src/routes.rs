use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use loan_risk::scoring::{assessment_router, AssessmentState};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_assessment_routes(state: Arc<AssessmentState>) -> axum::Router {
    assessment_router(state)
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
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use loan_risk::report::ReportSettings;
    use loan_risk::scoring::{LogisticRegression, RiskPipeline};
    use serde_json::Value;
    use tower::ServiceExt;

    fn state() -> Arc<AssessmentState> {
        let classifier = Arc::new(LogisticRegression::new(vec![0.0; 11], -1.0, 0.5));
        Arc::new(AssessmentState {
            pipeline: Arc::new(RiskPipeline::new(classifier, None)),
            report: ReportSettings::default(),
        })
    }

    #[tokio::test]
    async fn health_route_is_mounted_beside_assessments() {
        let router = with_assessment_routes(state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024).await.expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload["status"], "ok");
    }

    #[tokio::test]
    async fn assessment_route_is_reachable_through_service_router() {
        let router = with_assessment_routes(state());
        let form = json!({
            "gender": "Male",
            "married": "No",
            "dependents": "1",
            "education": "Graduate",
            "self_employed": "No",
            "applicant_income": 4100.0,
            "coapplicant_income": 0.0,
            "loan_amount": 95.0,
            "loan_amount_term": 180.0,
            "credit_history": "Good",
            "property_area": "Semiurban"
        });

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/assessments")
                    .header("content-type", "application/json")
                    .body(Body::from(form.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload["summary"]["headline"], "Low Risk");
    }
}
