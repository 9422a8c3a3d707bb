use super::super::domain::{Category, QuestionId};
use super::super::submission::CategoryTotals;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CategoryAverageEntry {
    pub category: Category,
    pub label: &'static str,
    pub average: f64,
}

/// Per-category averages of one participant's answers (radar view).
#[derive(Debug, Clone, Serialize)]
pub struct CategoryProfile {
    pub entries: Vec<CategoryAverageEntry>,
}

impl CategoryProfile {
    pub fn average(&self, category: Category) -> f64 {
        self.entries
            .iter()
            .find(|entry| entry.category == category)
            .map_or(0.0, |entry| entry.average)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Adequate,
    NeedsImprovement,
}

impl ScoreBand {
    pub fn classify(average: f64) -> Self {
        if average >= 3.5 {
            Self::Excellent
        } else if average <= 2.5 {
            Self::NeedsImprovement
        } else {
            Self::Adequate
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "우수",
            Self::Adequate => "보통",
            Self::NeedsImprovement => "미흡",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemStatView {
    pub question_id: QuestionId,
    pub category: Category,
    pub sub_category: &'static str,
    pub indicator: &'static str,
    /// Rounded to two decimals.
    pub average: f64,
    pub responses: usize,
    pub band: ScoreBand,
    pub band_label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamStatView {
    pub department: String,
    pub participants: usize,
    pub environment: f64,
    pub social: f64,
    pub governance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantView {
    pub name: String,
    pub department: String,
    pub timestamp: String,
    pub total_score: CategoryTotals,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub participants: usize,
    pub category_averages: Vec<CategoryAverageEntry>,
    pub recent_participants: Vec<ParticipantView>,
    pub items: Vec<ItemStatView>,
    pub teams: Vec<TeamStatView>,
}

impl DashboardSummary {
    pub fn category_average(&self, category: Category) -> f64 {
        self.category_averages
            .iter()
            .find(|entry| entry.category == category)
            .map_or(0.0, |entry| entry.average)
    }
}
