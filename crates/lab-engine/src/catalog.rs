//! Exercise catalog loaded from TOML.
//!
//! ```toml
//! [[exercises]]
//! id = "water-synthesis"
//! title = "Synthesis of water"
//! passing_score = 70
//!
//! [[exercises.steps]]
//! id = "intro"
//! label = "Introduction"
//! ```

use std::collections::HashSet;
use std::path::Path;

use lab_core::collaborators::ExerciseCatalog;
use lab_core::entities::ExerciseMetadata;
use serde::Deserialize;

use crate::error::EngineError;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    exercises: Vec<ExerciseMetadata>,
}

/// Fixed set of exercises held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    exercises: Vec<ExerciseMetadata>,
}

impl StaticCatalog {
    /// # Errors
    ///
    /// Returns `EngineError::Catalog` if two exercises share an id.
    pub fn new(exercises: Vec<ExerciseMetadata>) -> Result<Self, EngineError> {
        let mut seen = HashSet::new();
        for exercise in &exercises {
            if !seen.insert(exercise.id.as_str()) {
                return Err(EngineError::Catalog(format!(
                    "duplicate exercise id '{}'",
                    exercise.id
                )));
            }
        }
        Ok(Self { exercises })
    }

    /// # Errors
    ///
    /// Returns `EngineError::Catalog` for invalid TOML or duplicate ids.
    pub fn from_toml_str(source: &str) -> Result<Self, EngineError> {
        let file: CatalogFile =
            toml::from_str(source).map_err(|e| EngineError::Catalog(e.to_string()))?;
        Self::new(file.exercises)
    }

    /// # Errors
    ///
    /// Returns `EngineError::Catalog` if the file can't be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, EngineError> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Catalog(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    #[must_use]
    pub fn exercises(&self) -> &[ExerciseMetadata] {
        &self.exercises
    }
}

impl ExerciseCatalog for StaticCatalog {
    fn get_by_id(&self, exercise_id: &str) -> Option<ExerciseMetadata> {
        self.exercises.iter().find(|e| e.id == exercise_id).cloned()
    }
}
