//! Axum Handlers for the REST API
//!
//! This module contains the logic for handling HTTP requests for interview sessions.
//! It uses `utoipa` doc comments to generate OpenAPI documentation.

use axum::{
    extract::{
        Path, State,
        multipart::{Multipart, MultipartError},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use interview_core::InterviewError;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    models::{
        ErrorResponse, FeedbackResponse, QuestionResponse, ReportResponse, SessionSummary,
        StartSessionForm, StartSessionResponse, SubmitAnswerPayload,
    },
    state::AppState,
};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    UpstreamFailure(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse { message })).into_response()
            }
            ApiError::Conflict(message) => {
                (StatusCode::CONFLICT, Json(ErrorResponse { message })).into_response()
            }
            ApiError::UpstreamFailure(message) => {
                (StatusCode::BAD_GATEWAY, Json(ErrorResponse { message })).into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                let message = "An internal server error occurred.".to_string();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { message }),
                )
                    .into_response()
            }
        }
    }
}

impl From<InterviewError> for ApiError {
    fn from(err: InterviewError) -> Self {
        match err {
            InterviewError::NotFound(_) => Self::NotFound(err.to_string()),
            InterviewError::DuplicateSession(_)
            | InterviewError::Conflict(_)
            | InterviewError::NoActiveQuestion(_) => Self::Conflict(err.to_string()),
            InterviewError::GenerationFailure(_) | InterviewError::EvaluationFailure(_) => {
                warn!(error = %err, "Upstream model call failed");
                Self::UpstreamFailure(err.to_string())
            }
            InterviewError::CorruptSession { .. } => Self::InternalServerError(err.into()),
            InterviewError::Storage(e) => Self::InternalServerError(e),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::BadRequest(err.body_text())
    }
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Upload a résumé and start a new interview session.
#[utoipa::path(
    post,
    path = "/sessions",
    request_body(content = StartSessionForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Session created successfully", body = StartSessionResponse),
        (status = 400, description = "Missing or unreadable résumé", body = ErrorResponse),
        (status = 502, description = "Question generation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn start_session(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut resume = None;
    let mut job_description = String::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let has_file_name = field.file_name().is_some_and(|n| !n.is_empty());
                if !has_file_name {
                    return Err(ApiError::BadRequest("No selected file".to_string()));
                }
                resume = Some(field.bytes().await?);
            }
            "job_description" => job_description = field.text().await?,
            _ => {}
        }
    }

    let resume = resume
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No resume file part".to_string()))?;

    let reader = state.resume_reader.clone();
    let resume_text = tokio::task::spawn_blocking(move || reader.read_text(&resume))
        .await
        .map_err(|e| {
            if e.is_panic() {
                warn!("Resume extraction panicked on a malformed upload");
                ApiError::BadRequest("Failed to read PDF".to_string())
            } else {
                ApiError::InternalServerError(e.into())
            }
        })?
        .map_err(|e| ApiError::BadRequest(format!("{e:#}")))?;

    let session = state
        .interviews
        .start_session(resume_text, job_description.trim().to_string())
        .await?;
    info!(session_id = %session.session_id, "Started interview session");

    Ok((
        StatusCode::CREATED,
        Json(StartSessionResponse {
            session_id: session.session_id,
            total_questions: session.questions.len(),
        }),
    ))
}

/// Get a summary of a session's progress.
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    responses(
        (status = 200, description = "Session summary", body = SessionSummary),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    params(("id" = Uuid, Path, description = "Session ID"))
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSummary>, ApiError> {
    let session = state.interviews.session(id).await?;
    Ok(Json(SessionSummary::from(&session)))
}

/// Fetch the next question: a pending follow-up, the next top-level question,
/// or the end-of-interview message.
#[utoipa::path(
    post,
    path = "/sessions/{id}/next-question",
    responses(
        (status = 200, description = "Next question or completion message", body = QuestionResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "Session was modified concurrently", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    params(("id" = Uuid, Path, description = "Session ID"))
)]
pub async fn next_question(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let outcome = state.interviews.next_question(id).await?;
    Ok(Json(QuestionResponse::from_outcome(id, outcome)))
}

/// Submit an answer to the current question.
#[utoipa::path(
    post,
    path = "/sessions/{id}/answers",
    request_body = SubmitAnswerPayload,
    responses(
        (status = 200, description = "Answer recorded", body = FeedbackResponse),
        (status = 400, description = "Empty answer", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "No question awaiting an answer, or concurrent update", body = ErrorResponse),
        (status = 502, description = "Answer evaluation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    params(("id" = Uuid, Path, description = "Session ID"))
)]
pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitAnswerPayload>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    if payload.answer.trim().is_empty() {
        return Err(ApiError::BadRequest("answer must not be empty".to_string()));
    }
    let feedback = state.interviews.submit_answer(id, &payload.answer).await?;
    Ok(Json(FeedbackResponse::new(id, feedback)))
}

/// Get the question-and-answer report for a session.
#[utoipa::path(
    get,
    path = "/sessions/{id}/report",
    responses(
        (status = 200, description = "Interview report", body = ReportResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    params(("id" = Uuid, Path, description = "Session ID"))
)]
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReportResponse>, ApiError> {
    let report = state.interviews.report(id).await?;
    Ok(Json(ReportResponse::from(report)))
}
