//! API Models
//!
//! Request and response bodies for the HTTP surface, with `utoipa` schemas for
//! the OpenAPI document.

use interview_core::{
    AnswerFeedback, NextQuestion, SessionState,
    report::{AnsweredFollowUp, InterviewReport, ReportItem},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Message returned once every question has been asked.
pub const EXHAUSTED_MESSAGE: &str = "All questions have been asked";

/// Multipart form accepted by `POST /sessions`.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct StartSessionForm {
    /// The candidate's résumé as a PDF file.
    #[schema(value_type = String, format = Binary)]
    pub resume: Vec<u8>,
    #[schema(example = "Backend engineer, Rust and PostgreSQL")]
    pub job_description: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct StartSessionResponse {
    #[schema(value_type = String, format = Uuid)]
    pub session_id: Uuid,
    pub total_questions: usize,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct QuestionResponse {
    #[schema(value_type = String, format = Uuid)]
    pub session_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    pub follow_up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_ups_remaining: Option<u32>,
    pub done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "All questions have been asked")]
    pub message: Option<String>,
}

impl QuestionResponse {
    pub fn from_outcome(session_id: Uuid, outcome: NextQuestion) -> Self {
        match outcome {
            NextQuestion::Ask {
                question,
                follow_up,
                question_number,
                follow_ups_remaining,
            } => Self {
                session_id,
                question: Some(question),
                follow_up,
                question_number: Some(question_number),
                follow_ups_remaining: Some(follow_ups_remaining),
                done: false,
                message: None,
            },
            NextQuestion::Exhausted => Self {
                session_id,
                question: None,
                follow_up: false,
                question_number: None,
                follow_ups_remaining: None,
                done: true,
                message: Some(EXHAUSTED_MESSAGE.to_string()),
            },
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct SubmitAnswerPayload {
    #[schema(example = "Ownership moves values; borrowing lends references.")]
    pub answer: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct FeedbackResponse {
    #[schema(value_type = String, format = Uuid)]
    pub session_id: Uuid,
    pub feedback: String,
    pub acceptable: bool,
    pub follow_up_queued: bool,
}

impl FeedbackResponse {
    pub fn new(session_id: Uuid, feedback: AnswerFeedback) -> Self {
        Self {
            session_id,
            feedback: feedback.feedback,
            acceptable: feedback.acceptable,
            follow_up_queued: feedback.follow_up_queued,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct SessionSummary {
    #[schema(value_type = String, format = Uuid)]
    pub session_id: Uuid,
    pub total_questions: usize,
    pub questions_asked: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<String>,
    pub follow_ups_remaining: u32,
    pub answers_recorded: usize,
    pub last_answer_acceptable: bool,
    pub complete: bool,
}

impl From<&SessionState> for SessionSummary {
    fn from(state: &SessionState) -> Self {
        Self {
            session_id: state.session_id,
            total_questions: state.questions.len(),
            questions_asked: state.question_index,
            current_question: Some(state.current_question.clone()).filter(|q| !q.is_empty()),
            follow_ups_remaining: state.follow_up_budget,
            answers_recorded: state.transcript.len(),
            last_answer_acceptable: state.last_verdict_acceptable,
            complete: state.is_exhausted(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct FollowUpAnswer {
    pub question: String,
    pub answer: String,
    pub acceptable: bool,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub question: String,
    pub answer: String,
    pub acceptable: bool,
    pub follow_ups: Vec<FollowUpAnswer>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct ReportResponse {
    #[schema(value_type = String, format = Uuid)]
    pub session_id: Uuid,
    pub entries: Vec<ReportEntry>,
    pub unanswered: Vec<String>,
    pub answers_recorded: usize,
    pub acceptable_answers: usize,
    pub complete: bool,
}

impl From<AnsweredFollowUp> for FollowUpAnswer {
    fn from(f: AnsweredFollowUp) -> Self {
        Self {
            question: f.question,
            answer: f.answer,
            acceptable: f.acceptable,
        }
    }
}

impl From<ReportItem> for ReportEntry {
    fn from(item: ReportItem) -> Self {
        Self {
            question: item.question,
            answer: item.answer,
            acceptable: item.acceptable,
            follow_ups: item.follow_ups.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<InterviewReport> for ReportResponse {
    fn from(report: InterviewReport) -> Self {
        Self {
            session_id: report.session_id,
            entries: report.items.into_iter().map(Into::into).collect(),
            unanswered: report.unanswered,
            answers_recorded: report.answers_recorded,
            acceptable_answers: report.acceptable_answers,
            complete: report.complete,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_core::report::build_report;
    use interview_core::{FOLLOW_UP_BUDGET, TranscriptEntry};

    fn state() -> SessionState {
        SessionState::new(
            "resume".to_string(),
            String::new(),
            vec!["Intro".to_string(), "Q1".to_string()],
        )
    }

    #[test]
    fn test_question_response_for_question() {
        let id = Uuid::new_v4();
        let response = QuestionResponse::from_outcome(
            id,
            NextQuestion::Ask {
                question: "Intro".to_string(),
                follow_up: false,
                question_number: 1,
                follow_ups_remaining: FOLLOW_UP_BUDGET,
            },
        );

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["question"], "Intro");
        assert_eq!(json["done"], false);
        assert_eq!(json["question_number"], 1);
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_question_response_for_exhausted() {
        let response = QuestionResponse::from_outcome(Uuid::new_v4(), NextQuestion::Exhausted);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"], EXHAUSTED_MESSAGE);
        assert_eq!(json["done"], true);
        assert!(json.get("question").is_none());
    }

    #[test]
    fn test_submit_answer_payload_missing_field() {
        let result: Result<SubmitAnswerPayload, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }

    #[test]
    fn test_summary_of_fresh_session() {
        let state = state();
        let summary = SessionSummary::from(&state);

        assert_eq!(summary.session_id, state.session_id);
        assert_eq!(summary.total_questions, 2);
        assert_eq!(summary.questions_asked, 0);
        assert_eq!(summary.current_question, None);
        assert_eq!(summary.follow_ups_remaining, FOLLOW_UP_BUDGET);
        assert!(!summary.complete);
    }

    #[test]
    fn test_summary_complete_only_after_exhaustion() {
        let mut state = state();
        state.question_index = 2;
        state.current_question = "Q1".to_string();
        assert!(!SessionSummary::from(&state).complete);

        state.current_question.clear();
        assert!(SessionSummary::from(&state).complete);
    }

    #[test]
    fn test_report_response_conversion() {
        let mut state = state();
        state.question_index = 1;
        state.transcript = vec![
            TranscriptEntry {
                question: "Intro".to_string(),
                answer: "hi".to_string(),
                follow_up: false,
                acceptable: true,
            },
            TranscriptEntry {
                question: "More?".to_string(),
                answer: "sure".to_string(),
                follow_up: true,
                acceptable: false,
            },
        ];

        let response = ReportResponse::from(build_report(&state));
        assert_eq!(response.entries.len(), 1);
        assert_eq!(response.entries[0].follow_ups[0].answer, "sure");
        assert_eq!(response.unanswered, vec!["Q1"]);
        assert_eq!(response.acceptable_answers, 1);
    }

    #[test]
    fn test_error_response_serialization() {
        let error = ErrorResponse {
            message: "Session not found".to_string(),
        };

        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(json, r#"{"message":"Session not found"}"#);
    }
}
