use esg_survey::gateway::{GatewayError, LocalGateway, SubmissionGateway};
use esg_survey::survey::{AdminGate, DashboardSession, QuestionCatalog, Rating, SurveyService};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

fn scratch_file(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("esg-survey-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir.join("submissions.json")
}

#[tokio::test]
async fn file_store_persists_across_gateways() {
    let path = scratch_file("persist");
    let catalog = Arc::new(QuestionCatalog::standard());

    {
        let service = SurveyService::new(catalog.clone(), Arc::new(LocalGateway::file(&path)));
        let mut session = service.start_session("이수진", "사례관리팀").expect("session");
        loop {
            session.rate_current(Rating::new(4).expect("rating")).expect("rate");
            if !session.advance().expect("advance") {
                break;
            }
        }
        assert!(service.submit(session).await.expect("submit"));
    }

    let reopened: Arc<dyn SubmissionGateway> = Arc::new(LocalGateway::file(&path));
    let mut dashboard =
        DashboardSession::open(&AdminGate::new("0741"), "0741", reopened, catalog.clone())
            .expect("unlocked");
    dashboard.refresh().await;

    let summary = dashboard.summary();
    assert_eq!(summary.participants, 1);
    assert!(summary
        .category_averages
        .iter()
        .all(|entry| entry.average == 4.0));
    assert_eq!(summary.teams[0].department, "사례관리팀");
}

#[tokio::test]
async fn corrupt_file_marks_dashboard_degraded() {
    let path = scratch_file("corrupt");
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(&path, "{ not an array").expect("write");

    let gateway = Arc::new(LocalGateway::file(&path));
    let error = gateway.fetch().await.expect_err("corrupt");
    assert!(matches!(error, GatewayError::Corrupt(_)));

    let mut dashboard = DashboardSession::open(
        &AdminGate::new("0741"),
        "0741",
        gateway,
        Arc::new(QuestionCatalog::standard()),
    )
    .expect("unlocked");
    assert!(dashboard.refresh().await.is_empty());
    assert!(dashboard.is_degraded());
    assert_eq!(dashboard.summary().participants, 0);
}

#[tokio::test]
async fn malformed_rows_do_not_hide_good_ones() {
    let gateway = LocalGateway::in_memory();
    gateway
        .insert_raw(json!({ "name": "A", "JSON_Data": "{broken", "totalScore": { "E": 4 } }))
        .await
        .expect("insert");
    gateway
        .insert_raw(json!("not even an object"))
        .await
        .expect("insert");
    gateway
        .insert_raw(json!({ "name": "B", "department": "팀", "answers": { "G1-1": 3, "bad": 2 } }))
        .await
        .expect("insert");

    let submissions = gateway.fetch().await.expect("fetch");
    assert_eq!(submissions.len(), 3);
    assert!(submissions[0].answers.is_empty());
    assert!(submissions[1].name.is_empty());
    assert_eq!(submissions[2].answers.len(), 1);
}
