//! Core rules of the falling-block puzzle - pure, deterministic, and testable
//!
//! This crate holds the playfield, piece geometry, the bag randomizer, the
//! scoring tables and the [`Session`] state machine that ties them together.
//! It performs no I/O and reads no clock: time enters only through
//! [`Session::tick`] and [`Session::finish_clear`], which the engine crate
//! calls on its own schedule.
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid with collision checks, placement and line clearing
//! - [`pieces`]: piece shapes, spawn transforms and SRS rotation with wall kicks
//! - [`rng`]: seeded LCG and the 7-bag piece queue
//! - [`scoring`]: line-clear points, combo bonus, levels and gravity speed
//! - [`session`]: the game state machine and its commands
//! - [`snapshot`]: read-only views for renderers and observers
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer**: every aligned group of seven pieces holds each kind once
//! - **SRS Rotation**: five kick tests per rotation for every piece except O
//! - **Hold**: one swap per lock; the swapped-in piece respawns at its spawn transform
//! - **Line Clears**: cleared rows stay visible for a short window, gravity paused
//! - **Scoring**: 100/300/500/800 times level, plus 50 times combo times level
//!
//! # Example
//!
//! ```
//! use blockfall_core::Session;
//! use blockfall_core::types::{Command, RunState};
//!
//! let mut game = Session::new(12345);
//! game.apply(Command::Start);
//!
//! game.apply(Command::MoveRight);
//! game.apply(Command::RotateCw);
//! game.apply(Command::HardDrop);
//!
//! assert_eq!(game.run_state(), RunState::Playing);
//! assert!(game.score() > 0); // hard drop awards points
//! ```

pub mod board;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, ClearedRows};
pub use pieces::{shape_of, spawn_position, try_rotate, wall_kick_offsets, Piece};
pub use rng::{PieceQueue, SimpleRng};
pub use scoring::{drop_interval_ms, drop_interval_with, level_from_total_lines, score_for_clear};
pub use session::{ClearTicket, LockEvent, PendingClear, Session};
pub use snapshot::{GameSnapshot, PieceSnapshot};
