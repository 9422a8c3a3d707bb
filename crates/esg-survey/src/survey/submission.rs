use super::answers::{AnswerStore, DetailSelections};
use super::domain::{Category, DetailTag, QuestionId, Rating};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Sum of ratings per category prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotals {
    #[serde(rename = "E", default)]
    pub environment: u32,
    #[serde(rename = "S", default)]
    pub social: u32,
    #[serde(rename = "G", default)]
    pub governance: u32,
}

impl CategoryTotals {
    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Environment => self.environment,
            Category::Social => self.social,
            Category::Governance => self.governance,
        }
    }

    fn add(&mut self, category: Category, rating: Rating) {
        let slot = match category {
            Category::Environment => &mut self.environment,
            Category::Social => &mut self.social,
            Category::Governance => &mut self.governance,
        };
        *slot += u32::from(rating.value());
    }

    pub fn from_ratings<'a, I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = (&'a QuestionId, Rating)>,
    {
        let mut totals = Self::default();
        for (question_id, rating) in ratings {
            totals.add(question_id.category(), rating);
        }
        totals
    }

    pub fn from_store(store: &AnswerStore) -> Self {
        Self::from_ratings(store.rated())
    }
}

/// Answer as sent to the store: rating required, details omitted when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadAnswer {
    pub rating: Rating,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: DetailSelections,
}

/// Document handed to a submission gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub name: String,
    pub department: String,
    pub answers: BTreeMap<QuestionId, PayloadAnswer>,
    pub total_score: CategoryTotals,
}

/// Shapes an answer value may take in stored records.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StoredAnswerValue {
    /// Older records kept only the rating.
    Bare(f64),
    Detailed {
        rating: f64,
        /// Kept loose so a malformed details field cannot cost the rating.
        #[serde(default)]
        details: Option<Value>,
    },
}

impl StoredAnswerValue {
    pub fn rating(&self) -> f64 {
        match self {
            Self::Bare(rating) => *rating,
            Self::Detailed { rating, .. } => *rating,
        }
    }

    /// Converts to the current answer form. Unknown tags and non-numeric indexes are dropped.
    pub fn normalize(self, question_id: &QuestionId) -> Option<NormalizedAnswer> {
        let raw = self.rating();
        let rating = if raw.fract() == 0.0 {
            Rating::new(raw as i64).ok()
        } else {
            None
        };
        let Some(rating) = rating else {
            warn!(%question_id, rating = raw, "dropping stored answer with out-of-range rating");
            return None;
        };

        let details = match self {
            Self::Bare(_) | Self::Detailed { details: None, .. } => DetailSelections::new(),
            Self::Detailed {
                details: Some(details),
                ..
            } => normalize_details(question_id, details),
        };

        Some(NormalizedAnswer { rating, details })
    }
}

fn normalize_details(question_id: &QuestionId, details: Value) -> DetailSelections {
    let entries = match details {
        Value::Object(entries) => entries,
        Value::Null => return DetailSelections::new(),
        other => {
            warn!(%question_id, details = %other, "ignoring stored details that are not a map");
            return DetailSelections::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|(index, labels)| {
            let Ok(position) = index.trim().parse::<usize>() else {
                warn!(%question_id, %index, "ignoring stored details under a non-numeric index");
                return None;
            };
            let Value::Array(labels) = labels else {
                warn!(%question_id, index = position, "ignoring stored details that are not a list");
                return None;
            };
            let tags: Vec<DetailTag> = labels
                .iter()
                .filter_map(|label| {
                    let tag = label.as_str().and_then(DetailTag::from_label);
                    if tag.is_none() {
                        warn!(%question_id, index = position, %label, "ignoring unknown detail tag");
                    }
                    tag
                })
                .collect();
            Some((position, tags))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedAnswer {
    pub rating: Rating,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub details: DetailSelections,
}

/// One participant's finalized answers as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub name: String,
    /// Empty when the record carried no department.
    pub department: String,
    /// Raw timestamp text as stored; see [`Submission::submitted_at`].
    pub timestamp: String,
    pub answers: BTreeMap<QuestionId, NormalizedAnswer>,
    pub total_score: CategoryTotals,
}

impl Submission {
    pub fn submitted_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(self.timestamp.trim()).ok()
    }

    pub fn rating_for(&self, question_id: &QuestionId) -> Option<Rating> {
        self.answers.get(question_id).map(|answer| answer.rating)
    }
}
