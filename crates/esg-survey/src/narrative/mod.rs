//! Qualitative recommendations generated by an external language model.
//!
//! The model is optional: without an API key, or on any failure, callers get
//! [`AnalysisResult::fallback`] instead of an error.

mod gemini;
pub mod prompt;

pub use gemini::GeminiAnalyst;
pub use prompt::NarrativePrompt;

use crate::config::NarrativeConfig;
use crate::survey::{AnswerStore, QuestionCatalog};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{error, info};

pub const FALLBACK_SUMMARY: &str =
    "AI 분석 서비스를 일시적으로 사용할 수 없습니다. 잠시 후 다시 시도해주세요.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    pub focus_areas: Vec<String>,
    pub improvement_areas: Vec<String>,
    pub collaboration_with_residents: Vec<String>,
    pub community_solidarity: Vec<String>,
    pub corporate_partnership: Vec<String>,
    pub other_meaningful_areas: Vec<String>,
    pub summary: String,
}

impl AnalysisResult {
    pub fn fallback() -> Self {
        Self {
            summary: FALLBACK_SUMMARY.to_string(),
            ..Self::default()
        }
    }

    pub fn is_fallback(&self) -> bool {
        self == &Self::fallback()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    #[error("no narrative API key configured")]
    MissingApiKey,
    #[error("narrative request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("narrative service returned status {0}")]
    Status(u16),
    #[error("narrative service returned no text")]
    EmptyResponse,
    #[error("narrative response was not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[async_trait]
pub trait NarrativeAnalyst: Send + Sync + Debug {
    async fn analyze(&self, prompt: &NarrativePrompt) -> Result<AnalysisResult, NarrativeError>;
}

/// Builds prompts from answer sets and shields callers from analyst failures.
#[derive(Debug, Clone)]
pub struct NarrativeReporter {
    analyst: Option<Arc<dyn NarrativeAnalyst>>,
    catalog: Arc<QuestionCatalog>,
}

impl NarrativeReporter {
    pub fn new(analyst: Option<Arc<dyn NarrativeAnalyst>>, catalog: Arc<QuestionCatalog>) -> Self {
        Self { analyst, catalog }
    }

    pub fn from_config(config: &NarrativeConfig, catalog: Arc<QuestionCatalog>) -> Self {
        let analyst = match GeminiAnalyst::from_config(config) {
            Ok(analyst) => Some(Arc::new(analyst) as Arc<dyn NarrativeAnalyst>),
            Err(err) => {
                info!(reason = %err, "narrative reports will use the fallback result");
                None
            }
        };
        Self::new(analyst, catalog)
    }

    pub fn is_enabled(&self) -> bool {
        self.analyst.is_some()
    }

    pub async fn generate(&self, answers: &AnswerStore) -> AnalysisResult {
        let Some(analyst) = &self.analyst else {
            return AnalysisResult::fallback();
        };

        let prompt = NarrativePrompt::from_answers(answers, &self.catalog);
        match analyst.analyze(&prompt).await {
            Ok(result) => result,
            Err(err) => {
                error!(error = %err, "narrative analysis failed");
                AnalysisResult::fallback()
            }
        }
    }
}
