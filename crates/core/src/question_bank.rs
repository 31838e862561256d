//! Question Generation Service
//!
//! This module produces the ordered set of top-level interview questions for a
//! session from the candidate's résumé and the job description.

use crate::llm_client::{LLMClient, render_prompt, strip_code_fences};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Defines the contract for any service that can produce interview questions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionBank: Send + Sync {
    /// Generates the ordered list of top-level questions for an interview.
    ///
    /// # Arguments
    ///
    /// * `resume_text` - Plain text of the candidate's résumé.
    /// * `job_description` - The role being interviewed for; may be empty.
    async fn generate(&self, resume_text: &str, job_description: &str) -> Result<Vec<String>>;
}

const SYSTEM_PROMPT: &str = "You are an expert technical interviewer.";

/// Accepted reply shapes: a bare array, or an object holding the array under `questions`.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionsReply {
    List(Vec<String>),
    Wrapped { questions: Vec<String> },
}

/// A `QuestionBank` that asks a language model for the questions.
pub struct LLMQuestionBank {
    client: Arc<dyn LLMClient>,
    prompts: HashMap<String, String>,
}

impl LLMQuestionBank {
    /// Creates a new LLM-based question bank.
    ///
    /// `prompts` must include a `"generate_questions"` template with
    /// `{resume_text}` and `{job_description}` placeholders.
    pub fn new(client: Arc<dyn LLMClient>, prompts: HashMap<String, String>) -> Self {
        Self { client, prompts }
    }
}

#[async_trait]
impl QuestionBank for LLMQuestionBank {
    async fn generate(&self, resume_text: &str, job_description: &str) -> Result<Vec<String>> {
        let template = self
            .prompts
            .get("generate_questions")
            .context("Missing prompt template: 'generate_questions'")?;
        let prompt = render_prompt(
            template,
            &[
                ("resume_text", resume_text),
                ("job_description", job_description),
            ],
        );

        let reply = self.client.complete(SYSTEM_PROMPT, &prompt).await?;
        debug!(reply_len = reply.len(), "Received question set from LLM");
        parse_questions(&reply)
    }
}

/// Parses a model reply into a list of questions.
pub fn parse_questions(reply: &str) -> Result<Vec<String>> {
    let parsed: QuestionsReply = serde_json::from_str(strip_code_fences(reply)).map_err(|e| {
        warn!(error = %e, "Question set reply was not valid JSON");
        anyhow::anyhow!("Unparseable question set: {e}")
    })?;
    let questions = match parsed {
        QuestionsReply::List(questions) | QuestionsReply::Wrapped { questions } => questions,
    };
    if questions.is_empty() {
        bail!("Question set was empty");
    }
    Ok(questions)
}
