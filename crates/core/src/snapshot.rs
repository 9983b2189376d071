use arrayvec::ArrayVec;
use serde::Serialize;

use crate::board::BOARD_ROWS;
use crate::pieces::Piece;
use crate::types::{Cell, PieceKind, Rotation, RunState, GRID_HEIGHT, GRID_WIDTH, MAX_LOOKAHEAD};

/// A piece as shown to observers, with its absolute cells resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PieceSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    pub cells: [(i8, i8); 4],
}

impl From<Piece> for PieceSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
            cells: value.cells(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub run_state: RunState,
    pub generation: u64,
    pub board: [[Cell; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
    pub active: Option<PieceSnapshot>,
    pub ghost: Option<PieceSnapshot>,
    pub preview: ArrayVec<PieceKind, MAX_LOOKAHEAD>,
    pub hold: Option<PieceKind>,
    pub can_hold: bool,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub combo: u32,
    pub clearing: bool,
    pub clearing_rows: ArrayVec<usize, BOARD_ROWS>,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.run_state == RunState::Playing && !self.clearing
    }

    /// Board with the active piece drawn in, for text renderers
    pub fn composed_board(&self) -> [[Cell; GRID_WIDTH as usize]; GRID_HEIGHT as usize] {
        let mut board = self.board;
        if let Some(active) = self.active {
            for (x, y) in active.cells {
                if (0..GRID_WIDTH as i8).contains(&x) && (0..GRID_HEIGHT as i8).contains(&y) {
                    board[y as usize][x as usize] = Some(active.kind);
                }
            }
        }
        board
    }

    /// One line per row, `.` for empty cells
    pub fn render_text(&self) -> String {
        let board = self.composed_board();
        let mut out = String::with_capacity((GRID_WIDTH as usize + 1) * GRID_HEIGHT as usize);
        for row in board.iter() {
            for cell in row {
                out.push_str(cell.map(|k| k.as_str()).unwrap_or("."));
            }
            out.push('\n');
        }
        out
    }
}
