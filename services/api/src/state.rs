//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the shared,
//! clonable resources every handler needs.

use crate::pdf::ResumeReader;
use interview_core::service::InterviewService;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub interviews: InterviewService,
    pub resume_reader: Arc<dyn ResumeReader>,
    /// Upper bound on the multipart body accepted by `POST /sessions`.
    pub max_upload_bytes: usize,
}
