use serde::{Deserialize, Serialize};
use std::fmt;

/// The three ESG pillars partitioning the question catalog by identifier prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "E")]
    Environment,
    #[serde(rename = "S")]
    Social,
    #[serde(rename = "G")]
    Governance,
}

impl Category {
    pub const fn ordered() -> [Self; 3] {
        [Self::Environment, Self::Social, Self::Governance]
    }

    pub const fn prefix(self) -> char {
        match self {
            Self::Environment => 'E',
            Self::Social => 'S',
            Self::Governance => 'G',
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Environment => "Environment (환경)",
            Self::Social => "Social (사회)",
            Self::Governance => "Governance (지배구조)",
        }
    }

    pub const fn short_label(self) -> &'static str {
        match self {
            Self::Environment => "환경 (E)",
            Self::Social => "사회 (S)",
            Self::Governance => "지배구조 (G)",
        }
    }

    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'E' => Some(Self::Environment),
            'S' => Some(Self::Social),
            'G' => Some(Self::Governance),
            _ => None,
        }
    }
}

/// Catalog identifier of the form `<CategoryLetter><N>-<M>`, e.g. `E1-1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionId(String);

impl QuestionId {
    pub fn parse(raw: &str) -> Result<Self, SurveyError> {
        let invalid = || SurveyError::InvalidQuestionId(raw.to_string());
        let mut chars = raw.chars();
        let prefix = chars.next().ok_or_else(invalid)?;
        Category::from_prefix(prefix).ok_or_else(invalid)?;

        let (group, item) = chars.as_str().split_once('-').ok_or_else(invalid)?;
        let is_number = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !is_number(group) || !is_number(item) {
            return Err(invalid());
        }

        Ok(Self(raw.to_string()))
    }

    pub fn category(&self) -> Category {
        // Validated on construction.
        self.0
            .chars()
            .next()
            .and_then(Category::from_prefix)
            .unwrap_or(Category::Environment)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for QuestionId {
    type Error = SurveyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<QuestionId> for String {
    fn from(value: QuestionId) -> Self {
        value.0
    }
}

/// Score for a single question: 4 is best ("우수"), 1 is worst ("미흡").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn new(value: i64) -> Result<Self, SurveyError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(SurveyError::InvalidRating(value))
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn label(self) -> &'static str {
        match self.0 {
            4 => "우수",
            3 => "양호",
            2 => "보통",
            _ => "미흡",
        }
    }
}

impl TryFrom<i64> for Rating {
    type Error = SurveyError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// Qualitative marks attached to a sub-check: two complementary pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetailTag {
    #[serde(rename = "알고 있음")]
    Aware,
    #[serde(rename = "알지 못함")]
    Unaware,
    #[serde(rename = "하고 있음")]
    Doing,
    #[serde(rename = "하지 않음")]
    NotDoing,
}

impl DetailTag {
    pub const fn ordered() -> [Self; 4] {
        [Self::Aware, Self::Unaware, Self::Doing, Self::NotDoing]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Aware => "알고 있음",
            Self::Unaware => "알지 못함",
            Self::Doing => "하고 있음",
            Self::NotDoing => "하지 않음",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|tag| tag.label() == label.trim())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: QuestionId,
    pub category: Category,
    pub sub_category: &'static str,
    pub indicator: &'static str,
    pub checks: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurveyError {
    #[error("participant {0} is required")]
    MissingParticipantField(&'static str),
    #[error("rating must be between 1 and 4, got {0}")]
    InvalidRating(i64),
    #[error("'{0}' is not a valid question identifier")]
    InvalidQuestionId(String),
    #[error("question {0} is not part of the catalog")]
    UnknownQuestion(QuestionId),
    #[error("question {question_id} has no sub-check at index {index}")]
    UnknownCheck { question_id: QuestionId, index: usize },
    #[error("question {0} must be rated before moving on")]
    Unrated(QuestionId),
    #[error("assessment incomplete: {answered} of {total} questions rated")]
    Incomplete { answered: usize, total: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_id_derives_category_from_prefix() {
        let id = QuestionId::parse("S2-1").expect("valid id");
        assert_eq!(id.category(), Category::Social);
        assert_eq!(id.as_str(), "S2-1");
    }

    #[test]
    fn question_id_rejects_malformed_values() {
        for raw in ["", "X1-1", "E1", "E-1", "E1-", "E1-a", "e1-1"] {
            assert!(
                QuestionId::parse(raw).is_err(),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn rating_accepts_only_one_through_four() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(5).is_err());
        assert_eq!(Rating::new(4).expect("valid").value(), 4);
        assert_eq!(Rating::new(1).expect("valid").label(), "미흡");
    }

    #[test]
    fn rating_deserializes_from_json_number() {
        let rating: Rating = serde_json::from_str("3").expect("valid rating");
        assert_eq!(rating.value(), 3);
        assert!(serde_json::from_str::<Rating>("7").is_err());
    }

    #[test]
    fn detail_tags_serialize_as_labels() {
        let json = serde_json::to_string(&DetailTag::Doing).expect("serializes");
        assert_eq!(json, "\"하고 있음\"");
        assert_eq!(DetailTag::from_label(" 알지 못함 "), Some(DetailTag::Unaware));
    }
}
