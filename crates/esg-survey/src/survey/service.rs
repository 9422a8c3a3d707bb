use super::catalog::QuestionCatalog;
use super::domain::SurveyError;
use super::session::{AssessmentSession, Participant};
use super::submission::SubmissionPayload;
use crate::gateway::SubmissionGateway;
use std::sync::Arc;
use tracing::{error, info};

/// Entry point for participants: opens sessions and delivers finished payloads.
#[derive(Debug, Clone)]
pub struct SurveyService {
    catalog: Arc<QuestionCatalog>,
    gateway: Arc<dyn SubmissionGateway>,
}

impl SurveyService {
    pub fn new(catalog: Arc<QuestionCatalog>, gateway: Arc<dyn SubmissionGateway>) -> Self {
        Self { catalog, gateway }
    }

    pub fn catalog(&self) -> &Arc<QuestionCatalog> {
        &self.catalog
    }

    pub fn gateway(&self) -> &Arc<dyn SubmissionGateway> {
        &self.gateway
    }

    pub fn start_session(&self, name: &str, department: &str) -> Result<AssessmentSession, SurveyError> {
        let participant = Participant::new(name, department)?;
        Ok(AssessmentSession::start(participant, Arc::clone(&self.catalog)))
    }

    /// Consumes a completed session. An incomplete session is rejected before any network call.
    pub async fn submit(&self, session: AssessmentSession) -> Result<bool, SurveyError> {
        let payload = session.to_payload()?;
        Ok(self.deliver(payload).await)
    }

    /// Hands a payload to the gateway. Transport failures are logged and reported as `false`;
    /// the payload is not retried.
    pub async fn deliver(&self, payload: SubmissionPayload) -> bool {
        match self.gateway.submit(&payload).await {
            Ok(()) => {
                info!(
                    participant = %payload.name,
                    department = %payload.department,
                    "submission delivered"
                );
                true
            }
            Err(err) => {
                error!(participant = %payload.name, error = %err, "submission delivery failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayError, LocalGateway};
    use crate::survey::{Rating, Submission};
    use async_trait::async_trait;

    #[derive(Debug)]
    struct Unreachable;

    #[async_trait]
    impl SubmissionGateway for Unreachable {
        async fn submit(&self, _payload: &SubmissionPayload) -> Result<(), GatewayError> {
            Err(GatewayError::UnexpectedBody("null"))
        }

        async fn fetch(&self) -> Result<Vec<Submission>, GatewayError> {
            Err(GatewayError::UnexpectedBody("null"))
        }
    }

    fn complete(service: &SurveyService) -> AssessmentSession {
        let mut session = service.start_session("정다은", "복지팀").expect("session");
        loop {
            session.rate_current(Rating::new(3).expect("rating")).expect("rate");
            if !session.advance().expect("advance") {
                break;
            }
        }
        session
    }

    #[tokio::test]
    async fn incomplete_session_never_reaches_gateway() {
        let gateway = Arc::new(LocalGateway::in_memory());
        let service = SurveyService::new(Arc::new(QuestionCatalog::standard()), gateway.clone());
        let session = service.start_session("정다은", "복지팀").expect("session");

        let error = service.submit(session).await.expect_err("incomplete");
        assert!(matches!(error, SurveyError::Incomplete { answered: 0, .. }));
        assert_eq!(gateway.row_count().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn transport_failure_reports_false() {
        let service = SurveyService::new(Arc::new(QuestionCatalog::standard()), Arc::new(Unreachable));
        let session = complete(&service);
        assert!(!service.submit(session).await.expect("payload built"));
    }

    #[tokio::test]
    async fn completed_session_is_delivered() {
        let gateway = Arc::new(LocalGateway::in_memory());
        let service = SurveyService::new(Arc::new(QuestionCatalog::standard()), gateway.clone());
        let session = complete(&service);
        assert!(service.submit(session).await.expect("submit"));
        assert_eq!(gateway.row_count().await.expect("count"), 1);
    }
}
