//! Interview Service
//!
//! Runs each request as one load, transition, store cycle. Slow collaborator
//! calls (question generation, answer evaluation) happen before the write and
//! hold no lock; the write is a compare-and-update against the version that was
//! loaded, so a racing request on the same session cannot overwrite this one.

use crate::acknowledgement::Acknowledgements;
use crate::error::{InterviewError, Result};
use crate::evaluator::{AnswerEvaluator, EvaluationRequest};
use crate::machine::{self, AnswerFeedback, NextQuestion};
use crate::question_bank::QuestionBank;
use crate::report::{InterviewReport, build_report};
use crate::session::SessionState;
use crate::store::{SessionStore, Versioned};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Attempts `next_question` makes before giving up on a contended session.
const MAX_ADVANCE_ATTEMPTS: usize = 3;

/// Drives interview sessions against a store and the external collaborators.
#[derive(Clone)]
pub struct InterviewService {
    store: Arc<dyn SessionStore>,
    question_bank: Arc<dyn QuestionBank>,
    evaluator: Arc<dyn AnswerEvaluator>,
    acknowledgements: Arc<Acknowledgements>,
}

impl InterviewService {
    pub fn new(
        store: Arc<dyn SessionStore>,
        question_bank: Arc<dyn QuestionBank>,
        evaluator: Arc<dyn AnswerEvaluator>,
        acknowledgements: Arc<Acknowledgements>,
    ) -> Self {
        Self {
            store,
            question_bank,
            evaluator,
            acknowledgements,
        }
    }

    /// Generates the question set and persists a fresh session.
    ///
    /// Fails with `GenerationFailure` if the question bank errors or yields no
    /// usable questions; nothing is persisted in that case.
    #[instrument(skip_all)]
    pub async fn start_session(
        &self,
        resume_text: String,
        job_description: String,
    ) -> Result<SessionState> {
        let questions = self
            .question_bank
            .generate(&resume_text, &job_description)
            .await
            .map_err(|e| {
                warn!(error = ?e, "Question generation failed");
                InterviewError::GenerationFailure(format!("{e:#}"))
            })?;

        let questions = normalize_questions(questions);
        if questions.is_empty() {
            warn!("Question bank returned no usable questions");
            return Err(InterviewError::GenerationFailure(
                "no usable questions were generated".to_string(),
            ));
        }

        let state = SessionState::new(resume_text, job_description, questions);
        self.store.create(&state).await?;
        info!(
            session_id = %state.session_id,
            questions = state.questions.len(),
            "Interview session created"
        );
        Ok(state)
    }

    /// Advances the session and returns the question to ask next.
    ///
    /// The transition is re-derived from fresh state when a concurrent writer
    /// wins the race, up to a small number of attempts.
    #[instrument(skip(self))]
    pub async fn next_question(&self, session_id: Uuid) -> Result<NextQuestion> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let Versioned { version, value } = self.store.get(session_id).await?;
            let before = value.clone();
            let (next, outcome) = machine::advance(value);

            if next == before {
                return Ok(outcome);
            }

            match self
                .store
                .compare_and_update(session_id, version, &next)
                .await
            {
                Ok(_) => {
                    match &outcome {
                        NextQuestion::Ask {
                            follow_up,
                            question_number,
                            follow_ups_remaining,
                            ..
                        } => info!(
                            question_number,
                            follow_up,
                            follow_ups_remaining,
                            "Delivered question"
                        ),
                        NextQuestion::Exhausted => info!("Interview exhausted"),
                    }
                    return Ok(outcome);
                }
                Err(InterviewError::Conflict(_)) if attempt < MAX_ADVANCE_ATTEMPTS => {
                    warn!(attempt, "Concurrent update while advancing; retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Evaluates and records an answer to the current question.
    ///
    /// Evaluation failures leave the session untouched. A concurrent update is
    /// reported as `Conflict` rather than retried, since answers are append-only.
    #[instrument(skip(self, answer), fields(answer_len = answer.len()))]
    pub async fn submit_answer(&self, session_id: Uuid, answer: &str) -> Result<AnswerFeedback> {
        let Versioned {
            version,
            value: state,
        } = self.store.get(session_id).await?;

        if state.current_question.is_empty() {
            return Err(InterviewError::NoActiveQuestion(session_id));
        }

        let request = EvaluationRequest {
            question: state.current_question.clone(),
            resume_text: state.resume_text.clone(),
            job_description: state.job_description.clone(),
            answer: answer.to_string(),
            follow_up_budget: state.follow_up_budget,
        };
        let verdict = self.evaluator.evaluate(request).await.map_err(|e| {
            warn!(error = ?e, "Answer evaluation failed");
            InterviewError::EvaluationFailure(format!("{e:#}"))
        })?;

        let (next, feedback) =
            machine::submit_answer(state, answer, &verdict, &self.acknowledgements);
        self.store
            .compare_and_update(session_id, version, &next)
            .await?;

        info!(
            acceptable = feedback.acceptable,
            follow_up_queued = feedback.follow_up_queued,
            transcript_len = next.transcript.len(),
            "Answer recorded"
        );
        Ok(feedback)
    }

    pub async fn session(&self, session_id: Uuid) -> Result<SessionState> {
        Ok(self.store.get(session_id).await?.value)
    }

    pub async fn report(&self, session_id: Uuid) -> Result<InterviewReport> {
        let state = self.store.get(session_id).await?.value;
        Ok(build_report(&state))
    }
}

fn normalize_questions(questions: Vec<String>) -> Vec<String> {
    questions
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acknowledgement::RoundRobinPicker;
    use crate::evaluator::MockAnswerEvaluator;
    use crate::question_bank::MockQuestionBank;
    use crate::session::Verdict;
    use crate::store::InMemorySessionStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn bank_with(questions: &'static [&'static str]) -> MockQuestionBank {
        let mut bank = MockQuestionBank::new();
        bank.expect_generate()
            .returning(move |_, _| Ok(questions.iter().map(|q| q.to_string()).collect()));
        bank
    }

    fn verdict(follow_up_wanted: bool, text: &str) -> Verdict {
        Verdict {
            acceptable: true,
            follow_up_wanted,
            feedback_or_follow_up: text.to_string(),
        }
    }

    fn service(
        store: Arc<dyn SessionStore>,
        bank: MockQuestionBank,
        evaluator: MockAnswerEvaluator,
    ) -> InterviewService {
        InterviewService::new(
            store,
            Arc::new(bank),
            Arc::new(evaluator),
            Arc::new(Acknowledgements::with_picker(Box::new(
                RoundRobinPicker::default(),
            ))),
        )
    }

    /// Wraps the in-memory store and reports a conflict for the first `conflicts` writes.
    struct ContendedStore {
        inner: InMemorySessionStore,
        conflicts: AtomicUsize,
    }

    #[async_trait]
    impl SessionStore for ContendedStore {
        async fn get(&self, id: Uuid) -> Result<Versioned<SessionState>> {
            self.inner.get(id).await
        }

        async fn create(&self, state: &SessionState) -> Result<()> {
            self.inner.create(state).await
        }

        async fn compare_and_update(
            &self,
            id: Uuid,
            expected_version: i64,
            state: &SessionState,
        ) -> Result<i64> {
            if self
                .conflicts
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(InterviewError::Conflict(id));
            }
            self.inner
                .compare_and_update(id, expected_version, state)
                .await
        }
    }

    #[tokio::test]
    async fn test_start_session_persists_normalized_questions() {
        let store = Arc::new(InMemorySessionStore::new());
        let svc = service(
            store.clone(),
            bank_with(&["  Intro  ", "", "Q1"]),
            MockAnswerEvaluator::new(),
        );

        let state = svc
            .start_session("resume".to_string(), "job".to_string())
            .await
            .unwrap();
        assert_eq!(state.questions, vec!["Intro", "Q1"]);
        assert_eq!(store.get(state.session_id).await.unwrap().value, state);
    }

    #[tokio::test]
    async fn test_start_session_without_questions_persists_nothing() {
        let store = Arc::new(InMemorySessionStore::new());
        let svc = service(store.clone(), bank_with(&["   "]), MockAnswerEvaluator::new());

        let err = svc
            .start_session("resume".to_string(), String::new())
            .await
            .unwrap_err();
        assert!(matches!(err, InterviewError::GenerationFailure(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_start_session_surfaces_bank_error() {
        let mut bank = MockQuestionBank::new();
        bank.expect_generate()
            .returning(|_, _| Err(anyhow::anyhow!("model unavailable")));
        let svc = service(
            Arc::new(InMemorySessionStore::new()),
            bank,
            MockAnswerEvaluator::new(),
        );

        let err = svc
            .start_session("resume".to_string(), String::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("model unavailable"));
    }

    #[tokio::test]
    async fn test_full_interview_with_follow_up() {
        let mut evaluator = MockAnswerEvaluator::new();
        let mut seq = mockall::Sequence::new();
        evaluator
            .expect_evaluate()
            .withf(|r| r.question == "Intro" && r.follow_up_budget == 2)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(verdict(true, "Which project?")));
        evaluator
            .expect_evaluate()
            .withf(|r| r.question == "Which project?" && r.follow_up_budget == 1)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(verdict(false, "Thanks!")));
        evaluator
            .expect_evaluate()
            .withf(|r| r.question == "Q1")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(verdict(false, "Good.")));

        let svc = service(
            Arc::new(InMemorySessionStore::new()),
            bank_with(&["Intro", "Q1"]),
            evaluator,
        );
        let id = svc
            .start_session("resume".to_string(), String::new())
            .await
            .unwrap()
            .session_id;

        assert!(matches!(
            svc.next_question(id).await.unwrap(),
            NextQuestion::Ask { ref question, follow_up: false, .. } if question == "Intro"
        ));
        let fb = svc.submit_answer(id, "I build services").await.unwrap();
        assert_eq!(fb.feedback, "Which project?");
        assert!(fb.follow_up_queued);

        assert!(matches!(
            svc.next_question(id).await.unwrap(),
            NextQuestion::Ask { ref question, follow_up: true, .. } if question == "Which project?"
        ));
        assert_eq!(
            svc.submit_answer(id, "The gateway").await.unwrap().feedback,
            "Thanks!"
        );

        assert!(matches!(
            svc.next_question(id).await.unwrap(),
            NextQuestion::Ask { ref question, .. } if question == "Q1"
        ));
        svc.submit_answer(id, "Ownership").await.unwrap();

        assert_eq!(svc.next_question(id).await.unwrap(), NextQuestion::Exhausted);
        assert_eq!(svc.next_question(id).await.unwrap(), NextQuestion::Exhausted);

        let report = svc.report(id).await.unwrap();
        assert!(report.complete);
        assert_eq!(report.items.len(), 2);
        assert_eq!(report.items[0].follow_ups.len(), 1);
    }

    #[tokio::test]
    async fn test_answer_before_any_question_is_rejected() {
        let svc = service(
            Arc::new(InMemorySessionStore::new()),
            bank_with(&["Intro"]),
            MockAnswerEvaluator::new(),
        );
        let id = svc
            .start_session("resume".to_string(), String::new())
            .await
            .unwrap()
            .session_id;

        let err = svc.submit_answer(id, "hello").await.unwrap_err();
        assert!(matches!(err, InterviewError::NoActiveQuestion(_)));
        assert!(svc.session(id).await.unwrap().transcript.is_empty());
    }

    #[tokio::test]
    async fn test_evaluation_failure_leaves_state_unchanged() {
        let mut evaluator = MockAnswerEvaluator::new();
        evaluator
            .expect_evaluate()
            .returning(|_| Err(anyhow::anyhow!("timeout")));
        let store = Arc::new(InMemorySessionStore::new());
        let svc = service(store.clone(), bank_with(&["Intro"]), evaluator);
        let id = svc
            .start_session("resume".to_string(), String::new())
            .await
            .unwrap()
            .session_id;
        svc.next_question(id).await.unwrap();
        let before = store.get(id).await.unwrap();

        let err = svc.submit_answer(id, "hello").await.unwrap_err();
        assert!(matches!(err, InterviewError::EvaluationFailure(_)));
        assert_eq!(store.get(id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let svc = service(
            Arc::new(InMemorySessionStore::new()),
            MockQuestionBank::new(),
            MockAnswerEvaluator::new(),
        );
        let id = Uuid::new_v4();
        assert!(matches!(
            svc.next_question(id).await.unwrap_err(),
            InterviewError::NotFound(_)
        ));
        assert!(matches!(
            svc.submit_answer(id, "a").await.unwrap_err(),
            InterviewError::NotFound(_)
        ));
        assert!(matches!(
            svc.report(id).await.unwrap_err(),
            InterviewError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_next_question_retries_on_conflict() {
        let store = Arc::new(ContendedStore {
            inner: InMemorySessionStore::new(),
            conflicts: AtomicUsize::new(2),
        });
        let svc = service(
            store.clone(),
            bank_with(&["Intro", "Q1"]),
            MockAnswerEvaluator::new(),
        );
        let id = svc
            .start_session("resume".to_string(), String::new())
            .await
            .unwrap()
            .session_id;

        assert!(matches!(
            svc.next_question(id).await.unwrap(),
            NextQuestion::Ask { ref question, .. } if question == "Intro"
        ));
        assert_eq!(store.inner.get(id).await.unwrap().value.question_index, 1);
    }

    #[tokio::test]
    async fn test_next_question_gives_up_after_repeated_conflicts() {
        let store = Arc::new(ContendedStore {
            inner: InMemorySessionStore::new(),
            conflicts: AtomicUsize::new(10),
        });
        let svc = service(store.clone(), bank_with(&["Intro"]), MockAnswerEvaluator::new());
        let id = svc
            .start_session("resume".to_string(), String::new())
            .await
            .unwrap()
            .session_id;

        let err = svc.next_question(id).await.unwrap_err();
        assert!(matches!(err, InterviewError::Conflict(_)));
        assert_eq!(store.inner.get(id).await.unwrap().value.question_index, 0);
    }

    #[tokio::test]
    async fn test_submit_answer_does_not_retry_conflict() {
        let mut evaluator = MockAnswerEvaluator::new();
        evaluator
            .expect_evaluate()
            .times(1)
            .returning(|_| Ok(verdict(false, "ok")));
        let store = Arc::new(ContendedStore {
            inner: InMemorySessionStore::new(),
            conflicts: AtomicUsize::new(0),
        });
        let svc = service(store.clone(), bank_with(&["Intro"]), evaluator);
        let id = svc
            .start_session("resume".to_string(), String::new())
            .await
            .unwrap()
            .session_id;
        svc.next_question(id).await.unwrap();

        store.conflicts.store(1, Ordering::SeqCst);
        let err = svc.submit_answer(id, "hello").await.unwrap_err();
        assert!(matches!(err, InterviewError::Conflict(_)));
        assert!(store.inner.get(id).await.unwrap().value.transcript.is_empty());
    }
}
