//! Shared types and constants for the blockfall rules engine
//!
//! Everything here is plain data: piece kinds, rotation states, run states,
//! the command vocabulary accepted by the engine, and the rule constants.
//! The crate depends only on `serde` so every other crate (and any renderer
//! or input layer living outside this workspace) can share the same types.
//!
//! # Grid
//!
//! - **Width**: 10 columns (x in 0..10, left to right)
//! - **Height**: 20 rows (y in 0..20, row 0 is the top / spawn side)
//! - Pieces may sit partly above the grid (negative y) while spawning.
//!
//! # Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_DROP_INTERVAL_MS` | 1000 | Gravity period at level 1 |
//! | `MIN_DROP_INTERVAL_MS` | 50 | Gravity period floor |
//! | `DROP_INTERVAL_DECAY` | 0.85 | Per-level gravity multiplier |
//! | `LINE_CLEAR_DELAY_MS` | 300 | Clear-animation window |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Command, PieceKind, Rotation, GRID_HEIGHT, GRID_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
//!
//! assert_eq!(GRID_WIDTH, 10);
//! assert_eq!(GRID_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Grid width in cells
pub const GRID_WIDTH: u8 = 10;

/// Grid height in cells
pub const GRID_HEIGHT: u8 = 20;

/// Gravity period at level 1
pub const BASE_DROP_INTERVAL_MS: u32 = 1000;

/// Gravity period never drops below this
pub const MIN_DROP_INTERVAL_MS: u32 = 50;

/// Gravity period multiplier applied once per level above 1
pub const DROP_INTERVAL_DECAY: f64 = 0.85;

/// Real-time length of the line-clear window
pub const LINE_CLEAR_DELAY_MS: u32 = 300;

/// Number of upcoming pieces kept visible in the preview queue
pub const DEFAULT_LOOKAHEAD: usize = 4;

/// Shortest preview a game may be configured with
pub const MIN_LOOKAHEAD: usize = 3;

/// Largest preview the queue supports (one full bag)
pub const MAX_LOOKAHEAD: usize = 7;

/// Pieces per randomizer bag
pub const BAG_SIZE: usize = 7;

/// Lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Base points for clearing N lines in a single lock, before the level multiplier
///
/// Index 0 is unused (a lock that clears nothing scores nothing).
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Combo bonus per combo step, multiplied by level
pub const COMBO_BASE: u32 = 50;

/// Points per row fallen during a hard drop
pub const HARD_DROP_POINTS_PER_ROW: u32 = 2;

/// A cell on the grid: `None` is empty, `Some(kind)` is a locked block
pub type Cell = Option<PieceKind>;

/// The seven piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in canonical order (the unshuffled bag)
    pub const ALL: [PieceKind; BAG_SIZE] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("L"), Some(PieceKind::L));
    /// assert_eq!(PieceKind::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }
}

/// Rotation states following SRS naming
///
/// The cycle is North (spawn) → East → South → West → North; the numeric
/// state is 0..=3 in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotation state from an integer, taken mod 4
    ///
    /// ```
    /// use blockfall_types::Rotation;
    ///
    /// assert_eq!(Rotation::from_index(1), Rotation::East);
    /// assert_eq!(Rotation::from_index(5), Rotation::East);
    /// assert_eq!(Rotation::from_index(-1), Rotation::West);
    /// ```
    pub fn from_index(index: i32) -> Self {
        match index.rem_euclid(4) {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Rotate clockwise (90°)
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Target state for a rotation in `direction`: `(current + direction) mod 4`
    pub fn rotated(&self, direction: RotateDirection) -> Self {
        Self::from_index(self.index() as i32 + direction.delta() as i32)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// Direction of a rotate command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotateDirection {
    /// +1
    Cw,
    /// -1
    Ccw,
}

impl RotateDirection {
    /// Direction from a signed step; only +1 and -1 are meaningful
    pub fn from_delta(delta: i8) -> Option<Self> {
        match delta {
            1 => Some(RotateDirection::Cw),
            -1 => Some(RotateDirection::Ccw),
            _ => None,
        }
    }

    pub fn delta(&self) -> i8 {
        match self {
            RotateDirection::Cw => 1,
            RotateDirection::Ccw => -1,
        }
    }
}

/// Session run state
///
/// `Idle` is initial; `GameOver` is terminal until the next `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Idle,
    Playing,
    Paused,
    #[serde(rename = "gameover")]
    GameOver,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Playing => "playing",
            RunState::Paused => "paused",
            RunState::GameOver => "gameover",
        }
    }
}

/// Discrete commands accepted by the engine
///
/// These are what an input layer (keyboard, touch, bot) translates its raw
/// events into. `Tick` is the gravity step normally issued by the timing
/// driver rather than a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    /// Begin a fresh session (from any state)
    Start,
    /// playing → paused
    Pause,
    /// paused → playing
    Resume,
    /// Shift one cell left
    MoveLeft,
    /// Shift one cell right
    MoveRight,
    /// Move one cell down without locking
    SoftDrop,
    /// Drop to the ghost position and lock
    HardDrop,
    /// Rotate +1 with wall kicks
    RotateCw,
    /// Rotate -1 with wall kicks
    RotateCcw,
    /// Swap with the hold slot (once per lock)
    Hold,
    /// One gravity step
    Tick,
    /// Abandon the current session
    EndGame,
}

impl Command {
    /// Parse a command from its camelCase name (case-insensitive)
    ///
    /// ```
    /// use blockfall_types::Command;
    ///
    /// assert_eq!(Command::from_str("hardDrop"), Some(Command::HardDrop));
    /// assert_eq!(Command::from_str("ROTATECW"), Some(Command::RotateCw));
    /// assert_eq!(Command::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "start" => Some(Command::Start),
            "pause" => Some(Command::Pause),
            "resume" => Some(Command::Resume),
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "softdrop" => Some(Command::SoftDrop),
            "harddrop" => Some(Command::HardDrop),
            "rotatecw" => Some(Command::RotateCw),
            "rotateccw" => Some(Command::RotateCcw),
            "hold" => Some(Command::Hold),
            "tick" => Some(Command::Tick),
            "endgame" => Some(Command::EndGame),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::SoftDrop => "softDrop",
            Command::HardDrop => "hardDrop",
            Command::RotateCw => "rotateCw",
            Command::RotateCcw => "rotateCcw",
            Command::Hold => "hold",
            Command::Tick => "tick",
            Command::EndGame => "endGame",
        }
    }
}

/// Final result published when a session enters `GameOver`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameOverSummary {
    pub score: u32,
    pub level: u32,
    pub lines: u32,
}
