//! Session scripts replayed by `labrun run`.
//!
//! ```toml
//! [[exercises]]
//! id = "titration"
//! title = "Acid-base titration"
//!
//! [[exercises.steps]]
//! id = "setup"
//! label = "Set up the burette"
//!
//! [session]
//! participant = "stu-1"
//! exercise = "titration"
//!
//! [[session.actions]]
//! type = "note"
//! text = "Burette filled to 0.0 mL"
//! tag = "setup"
//!
//! [[session.actions]]
//! type = "complete"
//! score = 85
//! ```

use std::path::Path;

use anyhow::Context;
use lab_engine::catalog::StaticCatalog;
use serde::Deserialize;

const fn one() -> u64 {
    1
}

/// One scripted learner interaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptAction {
    Step {
        id: String,
    },
    Note {
        text: String,
        #[serde(default)]
        tag: Option<String>,
    },
    /// Advance the elapsed counter without waiting for the ticker.
    Tick {
        #[serde(default = "one")]
        count: u64,
    },
    Complete {
        score: i64,
    },
}

impl ScriptAction {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Step { .. } => "step",
            Self::Note { .. } => "note",
            Self::Tick { .. } => "tick",
            Self::Complete { .. } => "complete",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionScript {
    pub participant: String,
    pub exercise: String,
    #[serde(default)]
    pub actions: Vec<ScriptAction>,
}

#[derive(Debug, Deserialize)]
struct ScriptFile {
    session: SessionScript,
}

/// A parsed script: the exercises it defines and the session to replay.
#[derive(Debug)]
pub struct Script {
    pub catalog: StaticCatalog,
    pub session: SessionScript,
}

impl Script {
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        let file: ScriptFile = toml::from_str(source).context("invalid session script")?;
        let catalog = StaticCatalog::from_toml_str(source)?;
        Ok(Self {
            catalog,
            session: file.session,
        })
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::from_toml_str(&source).with_context(|| format!("in script {}", path.display()))
    }
}
