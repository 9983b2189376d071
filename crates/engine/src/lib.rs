//! Timing and orchestration around the core rules.
//!
//! - [`engine`]: the [`Engine`] controller (virtual clock, gravity, deferred
//!   clear completion, event queue)
//! - [`config`]: [`EngineConfig`] with env/JSON loading and validation
//! - [`runtime`]: tokio loop feeding wall-clock time into an engine
//! - [`script`]: deterministic replay of timed command scripts
//! - [`place`] and [`bot`]: placement planning and a greedy player

pub mod bot;
pub mod config;
pub mod engine;
pub mod place;
pub mod runtime;
pub mod script;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, EngineEvent};
pub use place::{apply_place, plan_place, PlaceError, PlacePlan};
pub use runtime::{spawn, RuntimeHandle};
pub use script::{ReplayOutcome, Script, ScriptError};
