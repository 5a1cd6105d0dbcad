//! Session persistence integration tests
//!
//! Mounts `SessionController` on a libSQL-backed `LabService`:
//! - End-to-end lab: attempt row, notebook rows, achievements, trail file
//! - Resume after remount
//! - Concurrent initialize resolves to one live attempt
//! - Store failures surface through the reporter only

use std::sync::Arc;

use chrono::Utc;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use lab_core::collaborators::AttemptStore;
use lab_core::entities::{AttemptKey, StepConfig};
use lab_core::enums::{AchievementKind, CollaboratorOp, EntityType, TrailOp};
use lab_db::service::LabService;
use lab_engine::dispatch::RecordingReporter;
use lab_engine::{SessionController, SessionOptions, SessionSetup};

fn setup() -> SessionSetup {
    SessionSetup::new(
        "stu-1",
        "water-synthesis",
        vec![
            StepConfig::new("intro", "Introduction"),
            StepConfig::new("work", "Experiment"),
            StepConfig::new("conclude", "Conclusion"),
        ],
        70,
    )
}

async fn mount(svc: &Arc<LabService>, options: SessionOptions) -> SessionController {
    SessionController::initialize(Arc::clone(svc), Arc::clone(svc), setup(), options)
        .await
        .unwrap()
}

#[tokio::test]
async fn completed_lab_is_persisted_with_trail() {
    let dir = TempDir::new().unwrap();
    let svc = Arc::new(
        LabService::new_local(":memory:", Some(dir.path().join("trail")))
            .await
            .unwrap(),
    );

    let mut session = mount(&svc, SessionOptions::default()).await;
    session.set_step("work").unwrap();
    session.add_note("Gas jar mists over", Some("work")).unwrap();
    session.set_step("conclude").unwrap();
    let outcome = session.complete_lab(85).unwrap();
    assert!(outcome.passed);
    session.flush().await;

    let stored = svc.get_attempt(&outcome.attempt_id).await.unwrap();
    assert_eq!(stored.score, Some(85));
    assert_eq!(stored.completed_at, session.attempt().completed_at);
    assert_eq!(stored.notebook_entries, session.notebook().entries());

    let achievements = svc.list_achievements("stu-1").await.unwrap();
    assert_eq!(achievements.len(), 1);
    assert_eq!(achievements[0].kind, AchievementKind::FirstCompletion);

    let trail = svc.trail().read(&outcome.attempt_id).unwrap();
    let ops: Vec<_> = trail.iter().map(|o| (o.op, o.entity)).collect();
    assert_eq!(
        ops,
        vec![
            (TrailOp::Create, EntityType::Attempt),
            (TrailOp::Append, EntityType::NotebookEntry),
            (TrailOp::Complete, EntityType::Attempt),
            (TrailOp::Award, EntityType::Achievement),
        ]
    );
}

#[tokio::test]
async fn remount_resumes_attempt_and_notebook() {
    let svc = Arc::new(LabService::new_local(":memory:", None).await.unwrap());

    let first_id = {
        let mut session = mount(&svc, SessionOptions::default()).await;
        session.add_note("Initial mass 12.0 g", None).unwrap();
        session.flush().await;
        session.attempt().id.clone()
    };

    let mut session = mount(&svc, SessionOptions::default()).await;
    assert_eq!(session.attempt().id, first_id);
    assert_eq!(session.notebook().entries()[0].text, "Initial mass 12.0 g");

    session.add_note("Final mass 10.4 g", None).unwrap();
    session.flush().await;
    let texts: Vec<_> = svc
        .list_notebook_entries(&first_id)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.text)
        .collect();
    assert_eq!(texts, vec!["Initial mass 12.0 g", "Final mass 10.4 g"]);
}

#[tokio::test]
async fn concurrent_initialize_yields_one_attempt() {
    let svc = LabService::new_local(":memory:", None).await.unwrap();
    let key = AttemptKey::new("stu-1", "ph");

    let (a, b) = tokio::join!(svc.initialize_attempt(&key), svc.initialize_attempt(&key));
    assert_eq!(a.unwrap().id, b.unwrap().id);
    assert_eq!(svc.list_attempts(Some("stu-1"), 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn completing_twice_through_the_store_is_reported() {
    let svc = Arc::new(LabService::new_local(":memory:", None).await.unwrap());
    let reporter = Arc::new(RecordingReporter::new());
    let options = SessionOptions::default().with_reporter(reporter.clone());

    let mut session = mount(&svc, options).await;
    // Another client finishes the attempt behind the session's back.
    svc.complete_live_attempt(&AttemptKey::new("stu-1", "water-synthesis"), 40, Utc::now())
        .await
        .unwrap();

    let outcome = session.complete_lab(90).unwrap();
    assert_eq!(outcome.score, 90);
    session.flush().await;

    let failures = reporter.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].operation, CollaboratorOp::CompleteAttempt);
    assert_eq!(svc.get_attempt(&outcome.attempt_id).await.unwrap().score, Some(40));
}
