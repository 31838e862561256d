//! Answer Evaluation Service
//!
//! Judges a candidate's free-text answer and decides whether a follow-up
//! question is warranted.

use crate::llm_client::{LLMClient, render_prompt, strip_code_fences};
use crate::session::Verdict;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Everything an evaluator needs to judge one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRequest {
    pub question: String,
    pub resume_text: String,
    pub job_description: String,
    pub answer: String,
    /// Follow-ups still available for the current top-level question.
    pub follow_up_budget: u32,
}

/// Defines the contract for any service that can evaluate interview answers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnswerEvaluator: Send + Sync {
    async fn evaluate(&self, request: EvaluationRequest) -> Result<Verdict>;
}

const SYSTEM_PROMPT: &str = "You are an AI technical interview evaluator.";

#[derive(Deserialize)]
struct RawVerdict {
    #[serde(rename = "isAdequate")]
    is_adequate: bool,
    #[serde(rename = "subquestion", default)]
    wants_follow_up: bool,
    #[serde(default)]
    feedback: String,
}

/// An `AnswerEvaluator` backed by a language model.
pub struct LLMAnswerEvaluator {
    client: Arc<dyn LLMClient>,
    prompts: HashMap<String, String>,
}

impl LLMAnswerEvaluator {
    /// Creates a new LLM-based evaluator.
    ///
    /// `prompts` must include an `"evaluate_answer"` template. Supported
    /// placeholders are `{question}`, `{answer}`, `{resume_text}`,
    /// `{job_description}` and `{follow_up_budget}`.
    pub fn new(client: Arc<dyn LLMClient>, prompts: HashMap<String, String>) -> Self {
        Self { client, prompts }
    }
}

#[async_trait]
impl AnswerEvaluator for LLMAnswerEvaluator {
    async fn evaluate(&self, request: EvaluationRequest) -> Result<Verdict> {
        let template = self
            .prompts
            .get("evaluate_answer")
            .context("Missing prompt template: 'evaluate_answer'")?;
        let budget = request.follow_up_budget.to_string();
        let prompt = render_prompt(
            template,
            &[
                ("question", request.question.as_str()),
                ("answer", request.answer.as_str()),
                ("resume_text", request.resume_text.as_str()),
                ("job_description", request.job_description.as_str()),
                ("follow_up_budget", budget.as_str()),
            ],
        );

        let reply = self.client.complete(SYSTEM_PROMPT, &prompt).await?;
        parse_verdict(&reply)
    }
}

/// Parses a model reply of the form
/// `{"isAdequate": bool, "subquestion": bool, "feedback": string}`.
pub fn parse_verdict(reply: &str) -> Result<Verdict> {
    let raw: RawVerdict = serde_json::from_str(strip_code_fences(reply))
        .with_context(|| format!("Unparseable evaluation reply: {}", reply.trim()))?;
    Ok(Verdict {
        acceptable: raw.is_adequate,
        follow_up_wanted: raw.wants_follow_up,
        feedback_or_follow_up: raw.feedback.trim().to_string(),
    })
}
