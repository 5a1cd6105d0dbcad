use std::path::Path;

use lab_core::entities::ExerciseMetadata;
use lab_core::enums::StepPolicy;
use lab_engine::catalog::StaticCatalog;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ExerciseSummary<'a> {
    id: &'a str,
    title: &'a str,
    steps: Vec<&'a str>,
    passing_score: Option<u8>,
    step_policy: Option<StepPolicy>,
}

impl<'a> From<&'a ExerciseMetadata> for ExerciseSummary<'a> {
    fn from(exercise: &'a ExerciseMetadata) -> Self {
        Self {
            id: &exercise.id,
            title: &exercise.title,
            steps: exercise.steps.iter().map(|s| s.id.as_str()).collect(),
            passing_score: exercise.passing_score,
            step_policy: exercise.step_policy,
        }
    }
}

pub fn run(file: &str, flags: &GlobalFlags) -> anyhow::Result<()> {
    let catalog = StaticCatalog::from_path(Path::new(file))?;
    let limit = flags
        .limit
        .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
    let summaries: Vec<ExerciseSummary<'_>> = catalog
        .exercises()
        .iter()
        .take(limit)
        .map(ExerciseSummary::from)
        .collect();
    output(&summaries, flags.format)
}
