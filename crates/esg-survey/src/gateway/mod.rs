//! Remote storage for finished assessments.
//!
//! A gateway accepts [`SubmissionPayload`]s and hands back every stored record
//! as normalized [`Submission`]s. The spreadsheet endpoint is the production
//! backend; [`LocalGateway`] stands in when no endpoint is configured.

mod local;
pub mod normalizer;
mod sheet;

pub use local::LocalGateway;
pub use sheet::SheetGateway;

use crate::config::GatewayConfig;
use crate::survey::{Submission, SubmissionPayload};
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::info;

#[async_trait]
pub trait SubmissionGateway: Send + Sync + Debug {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), GatewayError>;
    async fn fetch(&self) -> Result<Vec<Submission>, GatewayError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("gateway returned a {0} body where an array was expected")]
    UnexpectedBody(&'static str),
    #[error("local store unavailable: {0}")]
    Storage(#[from] std::io::Error),
    #[error("local store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Selects the spreadsheet endpoint when one is configured, the local store otherwise.
pub fn from_config(config: &GatewayConfig) -> Result<Arc<dyn SubmissionGateway>, GatewayError> {
    match config.remote_url() {
        Some(url) => {
            info!(target: "esg_survey::gateway", "using spreadsheet gateway");
            Ok(Arc::new(SheetGateway::new(url, config.timeout)?))
        }
        None => {
            let gateway = match &config.local_store {
                Some(path) => LocalGateway::file(path.clone()),
                None => LocalGateway::in_memory(),
            };
            info!(
                target: "esg_survey::gateway",
                store = ?config.local_store,
                "no spreadsheet endpoint configured; using local gateway"
            );
            Ok(Arc::new(gateway))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn placeholder_url_selects_local_gateway() {
        let config = GatewayConfig {
            sheet_url: Some("https://script.google.com/macros/s/.../exec".to_string()),
            local_store: None,
            timeout: Duration::from_secs(5),
        };
        let gateway = from_config(&config).expect("gateway");
        assert!(format!("{gateway:?}").starts_with("LocalGateway"));
    }

    #[test]
    fn configured_url_selects_sheet_gateway() {
        let config = GatewayConfig {
            sheet_url: Some("https://script.google.com/macros/s/abc/exec".to_string()),
            local_store: None,
            timeout: Duration::from_secs(5),
        };
        let gateway = from_config(&config).expect("gateway");
        assert!(format!("{gateway:?}").starts_with("SheetGateway"));
    }
}
