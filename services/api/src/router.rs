//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API and OpenAPI documentation.

use crate::{
    handlers,
    models::{
        ErrorResponse, FeedbackResponse, FollowUpAnswer, QuestionResponse, ReportEntry,
        ReportResponse, SessionSummary, StartSessionForm, StartSessionResponse,
        SubmitAnswerPayload,
    },
    state::AppState,
};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::start_session,
        handlers::get_session,
        handlers::next_question,
        handlers::submit_answer,
        handlers::get_report,
    ),
    components(
        schemas(
            StartSessionForm, StartSessionResponse, QuestionResponse, SubmitAnswerPayload,
            FeedbackResponse, SessionSummary, ReportResponse, ReportEntry, FollowUpAnswer,
            ErrorResponse
        )
    ),
    tags(
        (name = "Interview API", description = "Question-and-answer sessions for automated technical interviews")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let max_upload_bytes = app_state.max_upload_bytes;

    let api_router = Router::new()
        .route("/health", get(handlers::health))
        .route("/sessions", post(handlers::start_session))
        .route("/sessions/{id}", get(handlers::get_session))
        .route("/sessions/{id}/next-question", post(handlers::next_question))
        .route("/sessions/{id}/answers", post(handlers::submit_answer))
        .route("/sessions/{id}/report", get(handlers::get_report))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
        .layer(TraceLayer::new_for_http())
}
