use clap::Args;
use esg_survey::config::AppConfig;
use esg_survey::error::AppError;
use esg_survey::gateway::{self, LocalGateway, SubmissionGateway};
use esg_survey::survey::scoring::{self, DashboardSummary};
use esg_survey::survey::{
    AdminGate, Category, DashboardSession, DetailTag, QuestionCatalog, Rating, SurveyError,
    SurveyService,
};
use std::path::PathBuf;
use std::sync::Arc;

const DEMO_DEPARTMENTS: [&str; 3] = ["기획운영지원팀", "지역복지팀", "사례관리팀"];

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Number of synthetic participants to submit
    #[arg(long, default_value_t = 6)]
    pub(crate) participants: usize,
    /// Persist demo submissions to this JSON file instead of memory
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DashboardArgs {
    /// Admin passcode
    #[arg(long)]
    pub(crate) passcode: String,
}

pub(crate) fn run_questions() -> Result<(), AppError> {
    let catalog = QuestionCatalog::standard();
    println!("ESG self-assessment ({} questions)", catalog.len());
    for category in Category::ordered() {
        println!("\n{}", category.label());
        for question in catalog.questions_for_category(category) {
            println!("  [{}] {} - {}", question.id, question.sub_category, question.indicator);
            for (index, check) in question.checks.iter().enumerate() {
                println!("      {}. {}", index + 1, check);
            }
        }
    }
    println!(
        "\nRatings: {}",
        (Rating::MIN..=Rating::MAX)
            .filter_map(|value| Rating::new(i64::from(value)).ok())
            .map(|rating| format!("{} {}", rating.value(), rating.label()))
            .collect::<Vec<_>>()
            .join(" / ")
    );
    Ok(())
}

pub(crate) async fn run_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let gateway = gateway::from_config(&config.gateway)?;
    let gate = AdminGate::new(config.admin.passcode.clone());
    let catalog = Arc::new(QuestionCatalog::standard());

    let mut session = DashboardSession::open(&gate, &args.passcode, gateway, catalog)?;
    session.refresh().await;
    if session.is_degraded() {
        println!("Submission store unreachable; showing an empty dashboard.");
    }
    render_summary(&session.summary());
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        participants,
        store,
    } = args;

    let local = match store {
        Some(path) => LocalGateway::file(path),
        None => LocalGateway::in_memory(),
    };
    let gateway: Arc<dyn SubmissionGateway> = Arc::new(local);
    let catalog = Arc::new(QuestionCatalog::standard());
    let service = SurveyService::new(Arc::clone(&catalog), Arc::clone(&gateway));

    println!("ESG survey demo");
    for participant in 0..participants {
        let name = format!("참여자 {:02}", participant + 1);
        let department = DEMO_DEPARTMENTS[participant % DEMO_DEPARTMENTS.len()];
        let mut session = service.start_session(&name, department)?;

        loop {
            let position = session.position();
            let rating = Rating::new(synthetic_rating(participant, position))?;
            session.rate_current(rating)?;
            if position % 3 == 0 {
                let tag = if rating.value() >= 3 {
                    DetailTag::Doing
                } else {
                    DetailTag::NotDoing
                };
                session.toggle_current_detail(0, tag)?;
            }
            if !session.advance()? {
                break;
            }
        }

        let profile = scoring::category_profile(session.answers());
        let entrant = session.participant();
        let label = format!("{} ({})", entrant.name, entrant.department);
        let delivered = service.submit(session).await?;
        println!(
            "  {label}: E {:.1} / S {:.1} / G {:.1}{}",
            profile.average(Category::Environment),
            profile.average(Category::Social),
            profile.average(Category::Governance),
            if delivered { "" } else { " [not delivered]" }
        );
    }

    let submissions = gateway.fetch().await?;
    println!();
    render_summary(&scoring::summarize(&submissions, &catalog));
    Ok(())
}

fn synthetic_rating(participant: usize, position: usize) -> i64 {
    let spread = (participant * 7 + position * 3 + participant * position) % 4;
    (spread as i64) + 1
}

fn render_summary(summary: &DashboardSummary) {
    println!("Dashboard ({} participants)", summary.participants);
    for entry in &summary.category_averages {
        println!("  {:<10} {:.2}", entry.label, entry.average);
    }

    if !summary.teams.is_empty() {
        println!("\nTeams");
        for team in &summary.teams {
            println!(
                "  {:<12} n={} E {:.2} / S {:.2} / G {:.2}",
                team.department, team.participants, team.environment, team.social, team.governance
            );
        }
    }

    if !summary.items.is_empty() {
        println!("\nItems (highest first)");
        for item in &summary.items {
            println!(
                "  {:<5} {:.2} {} ({} responses) {}",
                item.question_id, item.average, item.band_label, item.responses, item.indicator
            );
        }
    }

    if !summary.recent_participants.is_empty() {
        println!("\nRecent participants");
        for participant in summary.recent_participants.iter().take(5) {
            println!(
                "  {} · {} · {}",
                participant.timestamp, participant.name, participant.department
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_ratings_stay_in_range() -> Result<(), SurveyError> {
        for participant in 0..10 {
            for position in 0..QuestionCatalog::standard().len() {
                Rating::new(synthetic_rating(participant, position))?;
            }
        }
        Ok(())
    }

    #[tokio::test]
    async fn demo_runs_against_memory_store() {
        run_demo(DemoArgs {
            participants: 3,
            store: None,
        })
        .await
        .expect("demo runs");
    }
}
