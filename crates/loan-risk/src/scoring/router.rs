use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use super::domain::{ApplicantForm, ApplicantProfile};
use super::pipeline::{PipelineStage, RiskAssessment, RiskPipeline};
use crate::error::AppError;
use crate::report::{present, ChartSeries, ReportSettings, RiskSummary};

/// Shared, read-only handles for the assessment endpoints.
#[derive(Debug, Clone)]
pub struct AssessmentState {
    pub pipeline: Arc<RiskPipeline>,
    pub report: ReportSettings,
}

#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub profile: ApplicantProfile,
    pub assessment: RiskAssessment,
    pub summary: RiskSummary,
    pub charts: ChartSeries,
}

/// Router builder exposing the scoring and report download endpoints.
pub fn assessment_router(state: Arc<AssessmentState>) -> Router {
    Router::new()
        .route("/api/v1/assessments", post(assess_handler))
        .route("/api/v1/assessments/report", post(report_handler))
        .with_state(state)
}

pub(crate) async fn assess_handler(
    State(state): State<Arc<AssessmentState>>,
    form: Result<axum::Json<ApplicantForm>, JsonRejection>,
) -> Result<Response, AppError> {
    let axum::Json(form) = match form {
        Ok(form) => form,
        Err(rejection) => return Ok(malformed_form(rejection)),
    };
    let (profile, assessment) = state.pipeline.assess_form(&form)?;
    let presentation = present(&profile, &assessment, &state.report, Utc::now());
    let body = AssessmentResponse {
        profile,
        assessment,
        summary: presentation.summary,
        charts: presentation.charts,
    };
    Ok((StatusCode::OK, axum::Json(body)).into_response())
}

pub(crate) async fn report_handler(
    State(state): State<Arc<AssessmentState>>,
    form: Result<axum::Json<ApplicantForm>, JsonRejection>,
) -> Result<Response, AppError> {
    let axum::Json(form) = match form {
        Ok(form) => form,
        Err(rejection) => return Ok(malformed_form(rejection)),
    };
    let (profile, assessment) = state.pipeline.assess_form(&form)?;
    let document = present(&profile, &assessment, &state.report, Utc::now()).document;
    let headers = [
        (
            header::CONTENT_TYPE,
            document.style.content_type().to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.file_name()),
        ),
    ];
    Ok((StatusCode::OK, headers, document.render()).into_response())
}

/// Bodies that never reach the encoder still fail at the encoding stage.
fn malformed_form(rejection: JsonRejection) -> Response {
    let error = format!(
        "{} stage failed: {}",
        PipelineStage::Encoding.label(),
        rejection.body_text()
    );
    let payload = json!({ "error": error, "stage": PipelineStage::Encoding });
    (rejection.status(), axum::Json(payload)).into_response()
}
