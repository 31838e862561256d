//! Interview State Machine
//!
//! Pure transition functions over [`SessionState`]. Each function takes the
//! current state by value and returns the successor together with an outcome
//! for the caller. Nothing here performs I/O; loading, evaluating and storing
//! are the caller's job.
//!
//! The interview shape is "ask, optionally probe deeper, then move on":
//!
//! - [`advance`] delivers a queued follow-up while the current top-level
//!   question still has follow-up budget, otherwise moves the cursor to the
//!   next top-level question (resetting the budget), otherwise reports that
//!   the interview is exhausted.
//! - [`submit_answer`] records the answer and, when the evaluator asks for
//!   it, queues a follow-up. It never touches the budget.

use crate::acknowledgement::Acknowledgements;
use crate::session::{FOLLOW_UP_BUDGET, SessionState, TranscriptEntry, Verdict};

/// What the candidate should be asked next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextQuestion {
    /// Put `question` to the candidate.
    Ask {
        question: String,
        /// True if this is a follow-up to the current top-level question.
        follow_up: bool,
        /// 1-based number of the top-level question this belongs to.
        question_number: usize,
        /// Follow-ups still available for this top-level question.
        follow_ups_remaining: u32,
    },
    /// Every question has been asked. Terminal.
    Exhausted,
}

/// The result of recording one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    /// Text to show the candidate.
    pub feedback: String,
    pub acceptable: bool,
    /// True if the next [`advance`] will deliver a follow-up.
    pub follow_up_queued: bool,
    /// True if `feedback` came from the acknowledgement pool rather than the evaluator.
    pub acknowledged: bool,
}

fn assert_invariants(state: &SessionState) {
    if let Err(reason) = state.validate() {
        panic!("session {} is in an invalid state: {reason}", state.session_id);
    }
}

/// Fetches the next question.
///
/// # Panics
///
/// Panics if `state` violates the [`SessionState::validate`] invariants.
pub fn advance(mut state: SessionState) -> (SessionState, NextQuestion) {
    assert_invariants(&state);

    // A queued follow-up is consumed either way; without budget it is dropped.
    if let Some(follow_up) = state.pending_follow_up.take() {
        if state.follow_up_budget > 0 {
            state.follow_up_budget -= 1;
            state.current_question = follow_up.clone();
            state.current_is_follow_up = true;
            let outcome = NextQuestion::Ask {
                question: follow_up,
                follow_up: true,
                question_number: state.question_index,
                follow_ups_remaining: state.follow_up_budget,
            };
            return (state, outcome);
        }
    }

    if state.question_index >= state.questions.len() {
        state.current_question.clear();
        state.current_is_follow_up = false;
        return (state, NextQuestion::Exhausted);
    }

    let question = state.questions[state.question_index].clone();
    state.question_index += 1;
    state.follow_up_budget = FOLLOW_UP_BUDGET;
    state.current_question = question.clone();
    state.current_is_follow_up = false;

    let outcome = NextQuestion::Ask {
        question,
        follow_up: false,
        question_number: state.question_index,
        follow_ups_remaining: state.follow_up_budget,
    };
    (state, outcome)
}

/// Records `answer` to the current question and applies the evaluator's `verdict`.
///
/// The answer is always appended to the transcript, even when no question is
/// current (it is then recorded with an empty question label). When the
/// follow-up budget was already spent on entry, the returned feedback is an
/// acknowledgement from `acknowledgements` instead of the evaluator's text.
///
/// # Panics
///
/// Panics if `state` violates the [`SessionState::validate`] invariants.
pub fn submit_answer(
    mut state: SessionState,
    answer: &str,
    verdict: &Verdict,
    acknowledgements: &Acknowledgements,
) -> (SessionState, AnswerFeedback) {
    assert_invariants(&state);
    let budget_spent = state.follow_up_budget == 0;

    state.transcript.push(TranscriptEntry {
        question: state.current_question.clone(),
        answer: answer.to_string(),
        follow_up: state.current_is_follow_up,
        acceptable: verdict.acceptable,
    });
    state.last_verdict_acceptable = verdict.acceptable;

    let follow_up = verdict.feedback_or_follow_up.trim();
    if verdict.follow_up_wanted && !follow_up.is_empty() {
        state.pending_follow_up = Some(follow_up.to_string());
        state.current_question = follow_up.to_string();
        state.current_is_follow_up = true;
    }

    let feedback = if budget_spent {
        acknowledgements.next_message().to_string()
    } else {
        verdict.feedback_or_follow_up.clone()
    };

    let outcome = AnswerFeedback {
        feedback,
        acceptable: verdict.acceptable,
        follow_up_queued: state.pending_follow_up.is_some() && !budget_spent,
        acknowledged: budget_spent,
    };
    (state, outcome)
}
