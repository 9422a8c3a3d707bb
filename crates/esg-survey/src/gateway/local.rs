use super::normalizer::normalize_rows;
use super::{GatewayError, SubmissionGateway};
use crate::survey::{Submission, SubmissionPayload};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug)]
enum Backing {
    Memory(Vec<Value>),
    File(PathBuf),
}

/// Stores rows the way the spreadsheet would, either in memory or in a JSON array file.
#[derive(Debug)]
pub struct LocalGateway {
    backing: Mutex<Backing>,
}

impl LocalGateway {
    pub fn in_memory() -> Self {
        Self {
            backing: Mutex::new(Backing::Memory(Vec::new())),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backing: Mutex::new(Backing::File(path.into())),
        }
    }

    /// Seeds raw rows, bypassing payload validation. Useful for replaying exported sheets.
    pub async fn insert_raw(&self, row: Value) -> Result<(), GatewayError> {
        let mut backing = self.backing.lock().await;
        match &mut *backing {
            Backing::Memory(rows) => rows.push(row),
            Backing::File(path) => {
                let mut rows = read_rows(path).await?;
                rows.push(row);
                write_rows(path, &rows).await?;
            }
        }
        Ok(())
    }

    pub async fn row_count(&self) -> Result<usize, GatewayError> {
        let backing = self.backing.lock().await;
        match &*backing {
            Backing::Memory(rows) => Ok(rows.len()),
            Backing::File(path) => Ok(read_rows(path).await?.len()),
        }
    }
}

async fn read_rows(path: &Path) -> Result<Vec<Value>, GatewayError> {
    match tokio::fs::read(path).await {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err.into()),
    }
}

async fn write_rows(path: &Path, rows: &[Value]) -> Result<(), GatewayError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let bytes = serde_json::to_vec_pretty(rows)?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

#[async_trait]
impl SubmissionGateway for LocalGateway {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), GatewayError> {
        let mut row = serde_json::to_value(payload)?;
        if let Value::Object(fields) = &mut row {
            fields.insert(
                "timestamp".to_string(),
                Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            );
        }
        debug!(participant = %payload.name, "storing submission locally");
        self.insert_raw(row).await
    }

    async fn fetch(&self) -> Result<Vec<Submission>, GatewayError> {
        let rows = {
            let backing = self.backing.lock().await;
            match &*backing {
                Backing::Memory(rows) => rows.clone(),
                Backing::File(path) => read_rows(path).await?,
            }
        };
        normalize_rows(Value::Array(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::{CategoryTotals, PayloadAnswer, QuestionId, Rating};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn payload() -> SubmissionPayload {
        let mut answers = BTreeMap::new();
        answers.insert(
            QuestionId::parse("E1-1").expect("id"),
            PayloadAnswer {
                rating: Rating::new(4).expect("rating"),
                details: BTreeMap::new(),
            },
        );
        SubmissionPayload {
            name: "박지성".to_string(),
            department: "시설관리팀".to_string(),
            answers,
            total_score: CategoryTotals {
                environment: 4,
                social: 0,
                governance: 0,
            },
        }
    }

    #[tokio::test]
    async fn memory_store_round_trips_with_timestamp() {
        let gateway = LocalGateway::in_memory();
        gateway.submit(&payload()).await.expect("submit");

        let submissions = gateway.fetch().await.expect("fetch");
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].name, "박지성");
        assert!(submissions[0].submitted_at().is_some());
        assert_eq!(submissions[0].total_score.environment, 4);
    }

    #[tokio::test]
    async fn raw_rows_go_through_the_normalizer() {
        let gateway = LocalGateway::in_memory();
        gateway
            .insert_raw(json!({ "name": "레거시", "answers": { "E1-1": 2, "E1-2": 9 } }))
            .await
            .expect("insert");

        let submissions = gateway.fetch().await.expect("fetch");
        assert_eq!(submissions[0].answers.len(), 1);
        assert_eq!(submissions[0].department, "");
        assert_eq!(gateway.row_count().await.expect("count"), 1);
    }
}
