use super::GatewayError;
use crate::survey::{CategoryTotals, QuestionId, StoredAnswerValue, Submission};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

/// Converts a fetched JSON array into submissions. Only a non-array body is an error;
/// problems inside a single row degrade that row.
pub fn normalize_rows(body: Value) -> Result<Vec<Submission>, GatewayError> {
    match body {
        Value::Array(rows) => Ok(rows.iter().map(normalize_row).collect()),
        other => Err(GatewayError::UnexpectedBody(value_kind(&other))),
    }
}

pub fn normalize_row(row: &Value) -> Submission {
    let empty = Map::new();
    let fields = row.as_object().unwrap_or(&empty);

    Submission {
        name: text_field(fields, "name"),
        department: text_field(fields, "department"),
        timestamp: text_field(fields, "timestamp"),
        answers: answers_field(fields),
        total_score: totals_field(fields.get("totalScore")),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

fn answers_field(fields: &Map<String, Value>) -> BTreeMap<QuestionId, crate::survey::NormalizedAnswer> {
    // Sheet exports may keep the answer document as text in a JSON_Data column.
    let raw = fields
        .get("JSON_Data")
        .filter(|value| matches!(value, Value::String(text) if !text.trim().is_empty()))
        .or_else(|| fields.get("answers"));

    let parsed;
    let entries = match raw {
        Some(Value::Object(entries)) => entries,
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(entries)) => {
                parsed = entries;
                &parsed
            }
            Ok(_) | Err(_) => {
                warn!(
                    name = %text_field(fields, "name"),
                    "failed to parse stored answers; treating record as unanswered"
                );
                return BTreeMap::new();
            }
        },
        _ => return BTreeMap::new(),
    };

    entries
        .iter()
        .filter_map(|(key, value)| {
            let Ok(question_id) = QuestionId::parse(key.trim()) else {
                warn!(key = %key, "dropping stored answer with an invalid question id");
                return None;
            };
            let stored = match serde_json::from_value::<StoredAnswerValue>(value.clone()) {
                Ok(stored) => stored,
                Err(err) => {
                    warn!(%question_id, error = %err, "dropping stored answer without a numeric rating");
                    return None;
                }
            };
            let answer = stored.normalize(&question_id)?;
            Some((question_id, answer))
        })
        .collect()
}

fn totals_field(value: Option<&Value>) -> CategoryTotals {
    let Some(Value::Object(fields)) = value else {
        return CategoryTotals::default();
    };
    let read = |key: &str| -> u32 {
        let number = match fields.get(key) {
            Some(Value::Number(number)) => number.as_f64(),
            Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        number
            .filter(|number| number.is_finite() && *number >= 0.0)
            .map_or(0, |number| number.round() as u32)
    };

    CategoryTotals {
        environment: read("E"),
        social: read("S"),
        governance: read("G"),
    }
}
