//! Blockfall (workspace facade crate).
//!
//! Re-exports the member crates as `blockfall::{types, core, engine}` so the
//! binary, the integration tests and the benches share one import path.

pub use blockfall_core as core;
pub use blockfall_engine as engine;
pub use blockfall_types as types;
