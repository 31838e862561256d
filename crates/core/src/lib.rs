//! Interview Core
//!
//! The decision logic for an automated technical interview: the session
//! record, the pure state machine that advances it, and the collaborator
//! seams (question generation, answer evaluation, storage) it is driven
//! through.

pub mod acknowledgement;
pub mod error;
pub mod evaluator;
pub mod llm_client;
pub mod machine;
pub mod question_bank;
pub mod report;
pub mod service;
pub mod session;
pub mod store;

pub use error::{InterviewError, Result};
pub use machine::{AnswerFeedback, NextQuestion};
pub use session::{FOLLOW_UP_BUDGET, SessionState, TranscriptEntry, Verdict};
