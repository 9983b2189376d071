//! Replay scripts: timed commands played on a virtual clock.
//!
//! ```json
//! {
//!   "config": { "seed": 7 },
//!   "steps": [
//!     { "at": 0, "command": "start" },
//!     { "at": 120, "command": "moveLeft", "repeat": 2 },
//!     { "at": 400, "command": "hardDrop" }
//!   ],
//!   "until": 5000
//! }
//! ```
//!
//! `at` is milliseconds since the script began and must never decrease.
//! The run is fully deterministic: same script, same outcome.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, EngineConfig};
use crate::core::GameSnapshot;
use crate::engine::{Engine, EngineEvent};
use crate::types::{Command, GameOverSummary};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid script: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("step {index} at {at}ms comes before the previous step at {previous}ms")]
    OutOfOrder { index: usize, at: u64, previous: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub at: u64,
    pub command: Command,
    #[serde(default = "one")]
    pub repeat: u32,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub config: EngineConfig,
    pub steps: Vec<Step>,
    /// Clock value to run to after the last step
    #[serde(default)]
    pub until: Option<u64>,
}

impl Script {
    pub fn from_json(text: &str) -> Result<Self, ScriptError> {
        let script: Self = serde_json::from_str(text)?;
        script.validate()?;
        Ok(script)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ScriptError> {
        self.config.validate()?;
        let mut previous = 0;
        for (index, step) in self.steps.iter().enumerate() {
            if step.at < previous {
                return Err(ScriptError::OutOfOrder {
                    index,
                    at: step.at,
                    previous,
                });
            }
            previous = step.at;
        }
        Ok(())
    }

    /// Play the script on a fresh engine
    pub fn run(&self) -> Result<ReplayOutcome, ScriptError> {
        let mut engine = Engine::new(self.config.clone())?;
        let mut events = Vec::new();
        let mut applied = 0usize;

        for step in &self.steps {
            let wait = step.at.saturating_sub(engine.now_ms());
            engine.advance(wait);
            for _ in 0..step.repeat {
                if engine.apply(step.command) {
                    applied += 1;
                }
            }
            events.extend(engine.take_events());
        }

        if let Some(until) = self.until {
            engine.advance(until.saturating_sub(engine.now_ms()));
            events.extend(engine.take_events());
        }

        log::debug!(
            "replay finished at {}ms, {} of {} steps applied",
            engine.now_ms(),
            applied,
            self.steps.len()
        );

        Ok(ReplayOutcome {
            elapsed_ms: engine.now_ms(),
            applied,
            summary: engine.summary(),
            events,
            snapshot: engine.snapshot(),
        })
    }
}

/// Everything a replay produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayOutcome {
    pub elapsed_ms: u64,
    /// Commands that changed the game
    pub applied: usize,
    pub summary: Option<GameOverSummary>,
    pub events: Vec<EngineEvent>,
    pub snapshot: GameSnapshot,
}
