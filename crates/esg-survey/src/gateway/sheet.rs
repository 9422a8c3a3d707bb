use super::normalizer::normalize_rows;
use super::{GatewayError, SubmissionGateway};
use crate::survey::{Submission, SubmissionPayload};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// Spreadsheet web-app endpoint: POST appends a row, GET returns every row.
#[derive(Debug, Clone)]
pub struct SheetGateway {
    client: Client,
    url: String,
}

impl SheetGateway {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SubmissionGateway for SheetGateway {
    #[instrument(skip_all, fields(participant = %payload.name))]
    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        debug!(status = %response.status(), "submission accepted by spreadsheet");
        Ok(())
    }

    #[instrument(skip_all)]
    async fn fetch(&self) -> Result<Vec<Submission>, GatewayError> {
        let body: Value = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let submissions = normalize_rows(body)?;
        debug!(rows = submissions.len(), "fetched spreadsheet rows");
        Ok(submissions)
    }
}
