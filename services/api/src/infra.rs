use esg_survey::config::AppConfig;
use esg_survey::error::AppError;
use esg_survey::gateway::{self, SubmissionGateway};
use esg_survey::narrative::NarrativeReporter;
use esg_survey::survey::{AdminGate, QuestionCatalog, SurveyService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) survey: SurveyService,
    pub(crate) narrative: NarrativeReporter,
    pub(crate) admin: AdminGate,
}

impl AppState {
    pub(crate) fn catalog(&self) -> &Arc<QuestionCatalog> {
        self.survey.catalog()
    }

    pub(crate) fn gateway(&self) -> Arc<dyn SubmissionGateway> {
        Arc::clone(self.survey.gateway())
    }
}

/// Survey collaborators wired from configuration.
pub(crate) struct SurveyComponents {
    pub(crate) survey: SurveyService,
    pub(crate) narrative: NarrativeReporter,
    pub(crate) admin: AdminGate,
}

impl SurveyComponents {
    pub(crate) fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let catalog = Arc::new(QuestionCatalog::standard());
        let gateway = gateway::from_config(&config.gateway)?;
        Ok(Self {
            survey: SurveyService::new(Arc::clone(&catalog), gateway),
            narrative: NarrativeReporter::from_config(&config.narrative, catalog),
            admin: AdminGate::new(config.admin.passcode.clone()),
        })
    }
}
