//! Interview Report
//!
//! Folds a session's flat transcript back into the interview's shape: each
//! top-level answer with the follow-up answers it prompted.

use crate::session::{SessionState, TranscriptEntry};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnsweredFollowUp {
    pub question: String,
    pub answer: String,
    pub acceptable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportItem {
    pub question: String,
    pub answer: String,
    pub acceptable: bool,
    pub follow_ups: Vec<AnsweredFollowUp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterviewReport {
    pub session_id: Uuid,
    pub items: Vec<ReportItem>,
    /// Top-level questions never delivered.
    pub unanswered: Vec<String>,
    pub answers_recorded: usize,
    pub acceptable_answers: usize,
    pub complete: bool,
}

impl ReportItem {
    fn from_entry(entry: &TranscriptEntry) -> Self {
        Self {
            question: entry.question.clone(),
            answer: entry.answer.clone(),
            acceptable: entry.acceptable,
            follow_ups: Vec::new(),
        }
    }
}

/// Builds the report for `state`.
///
/// A follow-up answer with no top-level answer before it becomes an item of its own.
pub fn build_report(state: &SessionState) -> InterviewReport {
    let mut items: Vec<ReportItem> = Vec::new();
    for entry in &state.transcript {
        if entry.follow_up {
            if let Some(item) = items.last_mut() {
                item.follow_ups.push(AnsweredFollowUp {
                    question: entry.question.clone(),
                    answer: entry.answer.clone(),
                    acceptable: entry.acceptable,
                });
                continue;
            }
        }
        items.push(ReportItem::from_entry(entry));
    }

    let unanswered = state
        .questions
        .iter()
        .skip(state.question_index)
        .cloned()
        .collect();

    InterviewReport {
        session_id: state.session_id,
        items,
        unanswered,
        answers_recorded: state.transcript.len(),
        acceptable_answers: state.transcript.iter().filter(|e| e.acceptable).count(),
        complete: state.is_exhausted(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(question: &str, answer: &str, follow_up: bool, acceptable: bool) -> TranscriptEntry {
        TranscriptEntry {
            question: question.to_string(),
            answer: answer.to_string(),
            follow_up,
            acceptable,
        }
    }

    fn state_with(transcript: Vec<TranscriptEntry>, question_index: usize) -> SessionState {
        let mut state = SessionState::new(
            "resume".to_string(),
            String::new(),
            vec!["Intro".to_string(), "Q1".to_string(), "Q2".to_string()],
        );
        state.transcript = transcript;
        state.question_index = question_index;
        state
    }

    #[test]
    fn test_follow_ups_nest_under_their_question() {
        let state = state_with(
            vec![
                entry("Intro", "hi", false, true),
                entry("Q1", "borrowck", false, true),
                entry("Why?", "aliasing", true, false),
                entry("Example?", "two &mut", true, true),
            ],
            2,
        );
        let report = build_report(&state);

        assert_eq!(report.items.len(), 2);
        assert!(report.items[0].follow_ups.is_empty());
        assert_eq!(report.items[1].question, "Q1");
        assert_eq!(
            report.items[1]
                .follow_ups
                .iter()
                .map(|f| f.question.as_str())
                .collect::<Vec<_>>(),
            ["Why?", "Example?"]
        );
        assert_eq!(report.unanswered, vec!["Q2"]);
        assert_eq!(report.answers_recorded, 4);
        assert_eq!(report.acceptable_answers, 3);
        assert!(!report.complete);
    }

    #[test]
    fn test_leading_follow_up_becomes_own_item() {
        let state = state_with(vec![entry("Orphan?", "a", true, true)], 0);
        let report = build_report(&state);
        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].question, "Orphan?");
        assert_eq!(report.unanswered.len(), 3);
    }

    #[test]
    fn test_finished_interview_is_complete() {
        let state = state_with(
            vec![
                entry("Intro", "a", false, true),
                entry("Q1", "b", false, true),
                entry("Q2", "c", false, false),
            ],
            3,
        );
        let report = build_report(&state);
        assert!(report.complete);
        assert!(report.unanswered.is_empty());
        assert_eq!(report.acceptable_answers, 2);
    }
}
