use super::super::catalog::QuestionCatalog;
use super::super::domain::Category;
use super::super::submission::Submission;
use super::round_to;
use super::views::{
    CategoryAverageEntry, DashboardSummary, ItemStatView, ParticipantView, ScoreBand,
    TeamStatView,
};
use std::cmp::Ordering;

pub const UNSPECIFIED_DEPARTMENT: &str = "unspecified";

/// Mean category total across submissions, normalized by the catalog's question count.
pub fn category_average(
    submissions: &[Submission],
    catalog: &QuestionCatalog,
    category: Category,
) -> f64 {
    if submissions.is_empty() {
        return 0.0;
    }
    let questions = catalog.count_for(category);
    if questions == 0 {
        return 0.0;
    }

    let total_points: f64 = submissions
        .iter()
        .map(|submission| f64::from(submission.total_score.get(category)))
        .sum();
    let average_total = total_points / submissions.len() as f64;

    round_to(average_total / questions as f64, 2)
}

pub fn category_averages(
    submissions: &[Submission],
    catalog: &QuestionCatalog,
) -> Vec<CategoryAverageEntry> {
    Category::ordered()
        .into_iter()
        .map(|category| CategoryAverageEntry {
            category,
            label: category.short_label(),
            average: category_average(submissions, catalog, category),
        })
        .collect()
}

/// Per-question averages, highest first. Ties keep catalog order.
pub fn item_averages(submissions: &[Submission], catalog: &QuestionCatalog) -> Vec<ItemStatView> {
    let mut items: Vec<(f64, ItemStatView)> = catalog
        .questions()
        .iter()
        .map(|question| {
            let ratings: Vec<u8> = submissions
                .iter()
                .filter_map(|submission| submission.rating_for(&question.id))
                .map(|rating| rating.value())
                .collect();

            let average = if ratings.is_empty() {
                0.0
            } else {
                let sum: u32 = ratings.iter().copied().map(u32::from).sum();
                f64::from(sum) / ratings.len() as f64
            };
            let band = ScoreBand::classify(average);

            let view = ItemStatView {
                question_id: question.id.clone(),
                category: question.category,
                sub_category: question.sub_category,
                indicator: question.indicator,
                average: round_to(average, 2),
                responses: ratings.len(),
                band,
                band_label: band.label(),
            };
            (average, view)
        })
        .collect();

    items.sort_by(|(left, _), (right, _)| right.partial_cmp(left).unwrap_or(Ordering::Equal));
    items.into_iter().map(|(_, view)| view).collect()
}

#[derive(Debug, Default)]
struct TeamAccumulator {
    department: String,
    participants: usize,
    environment: f64,
    social: f64,
    governance: f64,
}

fn department_key(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        UNSPECIFIED_DEPARTMENT
    } else {
        trimmed
    }
}

/// Department rows in order of first appearance.
pub fn team_averages(submissions: &[Submission], catalog: &QuestionCatalog) -> Vec<TeamStatView> {
    let normalized = |submission: &Submission, category: Category| {
        let questions = catalog.count_for(category);
        if questions == 0 {
            0.0
        } else {
            f64::from(submission.total_score.get(category)) / questions as f64
        }
    };

    let mut teams: Vec<TeamAccumulator> = Vec::new();
    for submission in submissions {
        let key = department_key(&submission.department);
        let position = match teams.iter().position(|team| team.department == key) {
            Some(position) => position,
            None => {
                teams.push(TeamAccumulator {
                    department: key.to_string(),
                    ..TeamAccumulator::default()
                });
                teams.len() - 1
            }
        };

        let team = &mut teams[position];
        team.participants += 1;
        team.environment += normalized(submission, Category::Environment);
        team.social += normalized(submission, Category::Social);
        team.governance += normalized(submission, Category::Governance);
    }

    teams
        .into_iter()
        .map(|team| {
            let count = team.participants as f64;
            TeamStatView {
                department: team.department,
                participants: team.participants,
                environment: round_to(team.environment / count, 2),
                social: round_to(team.social / count, 2),
                governance: round_to(team.governance / count, 2),
            }
        })
        .collect()
}

/// Participants newest first; records without a parseable timestamp go last.
pub fn recent_participants(submissions: &[Submission]) -> Vec<ParticipantView> {
    let mut ordered: Vec<&Submission> = submissions.iter().collect();
    ordered.sort_by(|left, right| match (left.submitted_at(), right.submitted_at()) {
        (Some(left), Some(right)) => right.cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    ordered
        .into_iter()
        .map(|submission| ParticipantView {
            name: submission.name.clone(),
            department: department_key(&submission.department).to_string(),
            timestamp: submission.timestamp.clone(),
            total_score: submission.total_score,
        })
        .collect()
}

pub fn summarize(submissions: &[Submission], catalog: &QuestionCatalog) -> DashboardSummary {
    DashboardSummary {
        participants: submissions.len(),
        category_averages: category_averages(submissions, catalog),
        recent_participants: recent_participants(submissions),
        items: item_averages(submissions, catalog),
        teams: team_averages(submissions, catalog),
    }
}
