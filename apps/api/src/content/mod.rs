// Content source: resume text + job description -> candidate document draft.
// Also owns text extraction from uploaded resumes.
// All provider calls go through llm_client.

pub mod extract;
pub mod handlers;
pub mod prompts;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::llm_client::{LlmClient, LlmError};
use crate::models::resume::{CandidateDocument, ResumeDraft};
use crate::render::RenderError;

const MIN_JOB_DESCRIPTION_CHARS: usize = 50;
const MAX_JOB_DESCRIPTION_CHARS: usize = 10_000;

#[derive(Debug, Error)]
pub enum ContentSourceError {
    #[error("Provider call failed: {0}")]
    Provider(#[from] LlmError),

    #[error("Provider returned an invalid resume structure: {0}")]
    InvalidStructure(#[from] RenderError),
}

/// Produces a candidate document tailored to a job description.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn optimize(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<ResumeDraft, ContentSourceError>;
}

/// Rejects inputs that are not worth a provider call.
pub fn validate_optimize_input(resume_text: &str, job_description: &str) -> Result<(), String> {
    if resume_text.trim().is_empty() {
        return Err("Resume text is required".to_string());
    }
    if job_description.trim().is_empty() {
        return Err("Job description is required".to_string());
    }
    let chars = job_description.chars().count();
    if chars < MIN_JOB_DESCRIPTION_CHARS {
        return Err(format!(
            "Job description is too short ({chars} characters); provide at least {MIN_JOB_DESCRIPTION_CHARS}"
        ));
    }
    if chars > MAX_JOB_DESCRIPTION_CHARS {
        return Err(format!(
            "Job description is too long ({chars} characters); keep it under {MAX_JOB_DESCRIPTION_CHARS}"
        ));
    }
    Ok(())
}

/// Content source backed by the LLM client.
pub struct LlmContentSource {
    llm: LlmClient,
}

impl LlmContentSource {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ContentSource for LlmContentSource {
    async fn optimize(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<ResumeDraft, ContentSourceError> {
        let prompt = prompts::build_optimization_prompt(resume_text, job_description);
        info!(
            "Optimization request: model={}, prompt_chars={}",
            crate::llm_client::MODEL,
            prompt.len()
        );

        let draft: ResumeDraft = self
            .llm
            .call_json(&prompt, &prompts::optimization_system())
            .await?;

        // Structural check only; the draft itself is returned unchanged.
        CandidateDocument::try_from(draft.clone())?;
        Ok(draft)
    }
}
