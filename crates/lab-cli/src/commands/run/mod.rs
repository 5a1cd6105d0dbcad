//! `labrun run`: mount a session for a scripted learner and replay it.

mod script;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use lab_config::EngineConfig;
use lab_core::collaborators::{
    AchievementEvaluator, AttemptStore, CollaboratorFailure, ExerciseCatalog,
};
use lab_core::entities::{Achievement, AttemptRecord};
use lab_engine::dispatch::RecordingReporter;
use lab_engine::{LabOutcome, SessionController, SessionOptions, SessionSetup};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RunArgs;
use crate::context::AppContext;
use crate::output::output;

use script::{Script, ScriptAction};

/// What a replayed session left behind.
#[derive(Debug)]
pub struct Replay {
    /// `None` when the script never completes the lab.
    pub outcome: Option<LabOutcome>,
    pub attempt: AttemptRecord,
    pub failures: Vec<CollaboratorFailure>,
}

#[derive(Debug, Serialize)]
struct RunReport {
    outcome: Option<LabOutcome>,
    attempt: AttemptRecord,
    achievements: Vec<Achievement>,
    failures: Vec<CollaboratorFailure>,
}

/// Handle `labrun run`.
pub async fn handle(args: &RunArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let script = Script::from_path(Path::new(&args.script))?;
    let replay = replay_script(
        &script,
        Arc::clone(&ctx.service),
        Arc::clone(&ctx.service),
        &ctx.config.engine,
    )
    .await?;

    let achievements = ctx
        .service
        .list_achievements(&script.session.participant)
        .await?;

    output(
        &RunReport {
            outcome: replay.outcome,
            attempt: replay.attempt,
            achievements,
            failures: replay.failures,
        },
        flags.format,
    )
}

/// Mount a controller for the script's session and apply its actions in order.
///
/// All queued collaborator calls have finished when this returns, whether the
/// replay succeeded or not.
pub async fn replay_script<S, E>(
    script: &Script,
    store: Arc<S>,
    evaluator: Arc<E>,
    engine: &EngineConfig,
) -> anyhow::Result<Replay>
where
    S: AttemptStore + 'static,
    E: AchievementEvaluator + 'static,
{
    let session_script = &script.session;
    let exercise = script
        .catalog
        .get_by_id(&session_script.exercise)
        .with_context(|| format!("unknown exercise '{}'", session_script.exercise))?;

    let reporter = Arc::new(RecordingReporter::new());
    let options = SessionOptions::from_config(engine).with_reporter(reporter.clone());
    let setup = SessionSetup::from_exercise(
        &session_script.participant,
        &exercise,
        engine.default_passing_score,
    );

    let mut session = SessionController::initialize(store, evaluator, setup, options).await?;
    tracing::info!(
        attempt = %session.attempt().id,
        exercise = %exercise.id,
        actions = session_script.actions.len(),
        "run: session mounted"
    );

    let applied = apply_actions(&mut session, &session_script.actions);
    if !session.is_completed() {
        session.exit();
    }
    session.flush().await;

    Ok(Replay {
        outcome: applied?,
        attempt: session.attempt().clone(),
        failures: reporter.failures(),
    })
}

fn apply_actions(
    session: &mut SessionController,
    actions: &[ScriptAction],
) -> anyhow::Result<Option<LabOutcome>> {
    let mut outcome = None;
    for (index, action) in actions.iter().enumerate() {
        let result = match action {
            ScriptAction::Step { id } => session.set_step(id),
            ScriptAction::Note { text, tag } => session.add_note(text, tag.as_deref()).map(|_| ()),
            ScriptAction::Tick { count } => {
                for _ in 0..*count {
                    session.clock().tick();
                }
                Ok(())
            }
            ScriptAction::Complete { score } => {
                session.complete_lab(*score).map(|done| outcome = Some(done))
            }
        };
        result.with_context(|| format!("action {} ({}) failed", index + 1, action.kind()))?;
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use lab_core::enums::{AchievementKind, CollaboratorOp};
    use lab_engine::memory::{MemoryEvaluator, MemoryStore};
    use pretty_assertions::assert_eq;

    use super::*;

    const EXERCISES: &str = r#"
[[exercises]]
id = "titration"
title = "Acid-base titration"
step_policy = "forward_only"

[[exercises.steps]]
id = "setup"
label = "Set up the burette"

[[exercises.steps]]
id = "titrate"
label = "Titrate to the endpoint"

[[exercises.steps]]
id = "report"
label = "Report the concentration"
"#;

    fn script(session: &str) -> Script {
        Script::from_toml_str(&format!("{EXERCISES}\n{session}")).unwrap()
    }

    fn engine() -> EngineConfig {
        EngineConfig {
            tick_interval_ms: 60_000,
            ..EngineConfig::default()
        }
    }

    fn collaborators() -> (Arc<MemoryStore>, Arc<MemoryEvaluator>) {
        let store = Arc::new(MemoryStore::new());
        let evaluator = Arc::new(MemoryEvaluator::new(Arc::clone(&store)));
        (store, evaluator)
    }

    #[tokio::test]
    async fn full_script_completes_and_awards() {
        let script = script(
            r#"
[session]
participant = "stu-1"
exercise = "titration"

[[session.actions]]
type = "step"
id = "titrate"

[[session.actions]]
type = "note"
text = "Endpoint at 23.4 mL"
tag = "titrate"

[[session.actions]]
type = "tick"
count = 42

[[session.actions]]
type = "complete"
score = 100
"#,
        );
        let (store, evaluator) = collaborators();

        let replay = replay_script(&script, Arc::clone(&store), Arc::clone(&evaluator), &engine())
            .await
            .unwrap();

        let outcome = replay.outcome.unwrap();
        assert!(outcome.passed);
        assert_eq!(outcome.score, 100);
        assert_eq!(outcome.elapsed_ticks, 42);
        assert_eq!(replay.attempt.score, Some(100));
        assert_eq!(replay.attempt.notebook_entries.len(), 1);
        assert_eq!(
            replay.attempt.notebook_entries[0].context_tag.as_deref(),
            Some("titrate")
        );
        assert!(replay.failures.is_empty());

        assert_eq!(store.attempts()[0].score, Some(100));
        let kinds: Vec<_> = evaluator.awarded().iter().map(|a| a.kind).collect();
        assert!(kinds.contains(&AchievementKind::FirstCompletion));
        assert!(kinds.contains(&AchievementKind::PerfectScore));
    }

    #[tokio::test]
    async fn default_passing_score_applies_when_exercise_has_none() {
        let script = script(
            r#"
[session]
participant = "stu-1"
exercise = "titration"

[[session.actions]]
type = "complete"
score = 65
"#,
        );
        let (store, evaluator) = collaborators();
        let engine = EngineConfig {
            default_passing_score: 60,
            ..engine()
        };

        let replay = replay_script(&script, store, evaluator, &engine).await.unwrap();

        assert!(replay.outcome.unwrap().passed);
    }

    #[tokio::test]
    async fn script_without_completion_leaves_attempt_active() {
        let script = script(
            r#"
[session]
participant = "stu-1"
exercise = "titration"

[[session.actions]]
type = "note"
text = "Rinsed the burette"
"#,
        );
        let (store, evaluator) = collaborators();

        let replay = replay_script(&script, Arc::clone(&store), evaluator, &engine())
            .await
            .unwrap();

        assert!(replay.outcome.is_none());
        assert!(!replay.attempt.is_completed());
        assert_eq!(store.attempts()[0].notebook_entries.len(), 1);
    }

    #[tokio::test]
    async fn disallowed_step_names_the_failing_action() {
        let script = script(
            r#"
[session]
participant = "stu-1"
exercise = "titration"

[[session.actions]]
type = "step"
id = "report"

[[session.actions]]
type = "step"
id = "setup"
"#,
        );
        let (store, evaluator) = collaborators();

        let err = replay_script(&script, store, evaluator, &engine())
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("action 2 (step) failed"));
    }

    #[tokio::test]
    async fn unknown_exercise_is_rejected_before_mounting() {
        let script = script(
            r#"
[session]
participant = "stu-1"
exercise = "distillation"
"#,
        );
        let (store, evaluator) = collaborators();

        let err = replay_script(&script, Arc::clone(&store), evaluator, &engine())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("unknown exercise 'distillation'"));
        assert!(store.attempts().is_empty());
    }

    #[tokio::test]
    async fn store_failures_are_reported_not_fatal() {
        let script = script(
            r#"
[session]
participant = "stu-1"
exercise = "titration"

[[session.actions]]
type = "note"
text = "Lost to the store"

[[session.actions]]
type = "complete"
score = 80
"#,
        );
        let (store, evaluator) = collaborators();
        store.set_fail_writes(true);

        let replay = replay_script(&script, store, evaluator, &engine())
            .await
            .unwrap();

        assert!(replay.attempt.is_completed());
        let ops: Vec<_> = replay.failures.iter().map(|f| f.operation).collect();
        assert!(ops.contains(&CollaboratorOp::SaveNotebookEntry));
        assert!(ops.contains(&CollaboratorOp::CompleteAttempt));
    }
}
