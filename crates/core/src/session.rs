//! Interview Session State
//!
//! This module defines the persisted record for one candidate interview. The
//! record is a plain value: stores hand it out, the state machine consumes it
//! and returns the successor, and the store writes the successor back.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Follow-ups allowed for each top-level question.
pub const FOLLOW_UP_BUDGET: u32 = 2;

/// One answered question, in the order the candidate answered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub question: String,
    pub answer: String,
    /// Whether the question answered was a follow-up rather than a top-level question.
    #[serde(default)]
    pub follow_up: bool,
    /// The evaluator's acceptability verdict for this answer.
    #[serde(default)]
    pub acceptable: bool,
}

/// The structured result of evaluating one candidate answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub acceptable: bool,
    pub follow_up_wanted: bool,
    /// Follow-up question text when `follow_up_wanted`, otherwise feedback for the candidate.
    pub feedback_or_follow_up: String,
}

/// The complete state of one interview, keyed by `session_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: Uuid,
    pub resume_text: String,
    pub job_description: String,
    /// Top-level questions, fixed at creation.
    pub questions: Vec<String>,
    /// Cursor into `questions`; the next top-level question to deliver.
    pub question_index: usize,
    /// A follow-up queued by the last evaluation but not yet delivered.
    #[serde(default)]
    pub pending_follow_up: Option<String>,
    /// Follow-ups remaining for the current top-level question.
    pub follow_up_budget: u32,
    /// The question most recently put to the candidate. Empty when nothing is being asked.
    #[serde(default)]
    pub current_question: String,
    #[serde(default)]
    pub current_is_follow_up: bool,
    #[serde(default)]
    pub transcript: Vec<TranscriptEntry>,
    #[serde(default = "default_acceptable")]
    pub last_verdict_acceptable: bool,
}

fn default_acceptable() -> bool {
    true
}

impl SessionState {
    /// Creates a fresh session for the given reference material and question set.
    ///
    /// The cursor starts at the first question, the follow-up budget at
    /// [`FOLLOW_UP_BUDGET`], and nothing has been asked or answered yet.
    pub fn new(resume_text: String, job_description: String, questions: Vec<String>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            resume_text,
            job_description,
            questions,
            question_index: 0,
            pending_follow_up: None,
            follow_up_budget: FOLLOW_UP_BUDGET,
            current_question: String::new(),
            current_is_follow_up: false,
            transcript: Vec::new(),
            last_verdict_acceptable: true,
        }
    }

    /// Number of top-level questions not yet delivered.
    pub fn remaining_questions(&self) -> usize {
        self.questions.len().saturating_sub(self.question_index)
    }

    /// True once the interview has reached its terminal state: every question
    /// delivered, nothing queued, and nothing awaiting an answer.
    pub fn is_exhausted(&self) -> bool {
        self.question_index >= self.questions.len()
            && self.pending_follow_up.is_none()
            && self.current_question.is_empty()
    }

    /// Checks the structural invariants a persisted record must satisfy.
    ///
    /// A violation means the record was corrupted outside the state machine.
    pub fn validate(&self) -> Result<(), String> {
        if self.questions.is_empty() {
            return Err("session has no questions".to_string());
        }
        if self.question_index > self.questions.len() {
            return Err(format!(
                "question_index {} exceeds question count {}",
                self.question_index,
                self.questions.len()
            ));
        }
        if self.follow_up_budget > FOLLOW_UP_BUDGET {
            return Err(format!(
                "follow_up_budget {} exceeds the per-question limit {}",
                self.follow_up_budget, FOLLOW_UP_BUDGET
            ));
        }
        if matches!(&self.pending_follow_up, Some(text) if text.trim().is_empty()) {
            return Err("pending follow-up is blank".to_string());
        }
        Ok(())
    }
}
