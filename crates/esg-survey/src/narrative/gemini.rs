use super::prompt::{response_schema, NarrativePrompt};
use super::{AnalysisResult, NarrativeAnalyst, NarrativeError};
use crate::config::NarrativeConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

/// `generateContent` client for the Gemini REST API.
#[derive(Debug, Clone)]
pub struct GeminiAnalyst {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiAnalyst {
    pub fn from_config(config: &NarrativeConfig) -> Result<Self, NarrativeError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(NarrativeError::MissingApiKey)?;
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl NarrativeAnalyst for GeminiAnalyst {
    #[instrument(skip_all, fields(model = %self.model))]
    async fn analyze(&self, prompt: &NarrativePrompt) -> Result<AnalysisResult, NarrativeError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt.render() }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
            }
        });

        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NarrativeError::Status(status.as_u16()));
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
            .filter(|text| !text.trim().is_empty())
            .ok_or(NarrativeError::EmptyResponse)?;

        debug!(bytes = text.len(), "narrative response received");
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(api_key: Option<&str>) -> NarrativeConfig {
        NarrativeConfig {
            api_key: api_key.map(str::to_string),
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta/".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn requires_api_key() {
        let error = GeminiAnalyst::from_config(&config(None)).expect_err("missing key");
        assert!(matches!(error, NarrativeError::MissingApiKey));
    }

    #[test]
    fn builds_generate_content_url() {
        let analyst = GeminiAnalyst::from_config(&config(Some("key"))).expect("analyst");
        assert_eq!(
            analyst.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
