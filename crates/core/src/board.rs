//! Board module - the playfield and its pure rule functions
//!
//! The board is a 10x20 grid where each cell is empty or holds the kind of
//! the locked block occupying it. Storage is a flat row-major array.
//! Coordinates: (x, y) with x in 0..10 (left to right), y in 0..20 (top to
//! bottom). Row 0 is the spawn side.
//!
//! Placement and clearing return new boards and leave `self` untouched, so
//! the session can keep the pre-clear board visible while a clear plays out.

use arrayvec::ArrayVec;

use crate::pieces::Piece;
use crate::types::{Cell, PieceKind, GRID_HEIGHT, GRID_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = GRID_WIDTH as usize * GRID_HEIGHT as usize;

/// Number of rows, as a capacity for row-index buffers
pub const BOARD_ROWS: usize = GRID_HEIGHT as usize;

/// Indices of rows removed by one clear, top to bottom
pub type ClearedRows = ArrayVec<usize, BOARD_ROWS>;

/// The playfield - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= GRID_WIDTH as i8 || y < 0 || y >= GRID_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (GRID_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        GRID_WIDTH
    }

    pub fn height(&self) -> u8 {
        GRID_HEIGHT
    }

    /// Get cell at position (x, y); None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y); false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Whether a single mino may sit at (x, y)
    ///
    /// Columns outside the board and rows at or below the floor are walls.
    /// Rows above the board (y < 0) are open air and never collide.
    pub fn is_free(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= GRID_WIDTH as i8 || y >= GRID_HEIGHT as i8 {
            return false;
        }
        if y < 0 {
            return true;
        }
        matches!(self.get(x, y), Some(None))
    }

    /// Whether `piece`, shifted by `(dx, dy)`, fits on the board
    ///
    /// Every mino is checked; one blocked mino rejects the whole placement.
    pub fn is_valid_position(&self, piece: &Piece, dx: i8, dy: i8) -> bool {
        piece
            .cells()
            .iter()
            .all(|&(x, y)| self.is_free(x + dx, y + dy))
    }

    /// Copy of the board with `piece` stamped in; minos above the grid are dropped
    pub fn with_piece(&self, piece: &Piece) -> Board {
        let mut next = self.clone();
        for (x, y) in piece.cells() {
            if y < 0 {
                continue;
            }
            let stamped = next.set(x, y, Some(piece.kind));
            debug_assert!(stamped, "locked mino ({x}, {y}) outside the board");
        }
        next
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_ROWS {
            return false;
        }
        let start = y * GRID_WIDTH as usize;
        let end = start + GRID_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Remove every full row and drop the rows above
    ///
    /// Returns the resulting board and the removed row indices, top to
    /// bottom. With no full row the board comes back unchanged and the list
    /// is empty.
    pub fn clear_lines(&self) -> (Board, ClearedRows) {
        let cleared: ClearedRows = (0..BOARD_ROWS).filter(|&y| self.is_row_full(y)).collect();
        if cleared.is_empty() {
            return (self.clone(), cleared);
        }

        let width = GRID_WIDTH as usize;
        let mut next = Board::new();
        let mut write_y = BOARD_ROWS;

        // Copy surviving rows bottom-up; the rows left at the top stay empty.
        for read_y in (0..BOARD_ROWS).rev() {
            if cleared.contains(&read_y) {
                continue;
            }
            write_y -= 1;
            let src = read_y * width;
            let dst = write_y * width;
            next.cells[dst..dst + width].copy_from_slice(&self.cells[src..src + width]);
        }
        debug_assert_eq!(write_y, cleared.len());

        (next, cleared)
    }

    /// Where `piece` would come to rest if dropped straight down
    pub fn ghost_position(&self, piece: &Piece) -> Piece {
        let mut ghost = *piece;
        while self.is_valid_position(&ghost, 0, 1) {
            ghost.y += 1;
        }
        ghost
    }

    /// Number of occupied cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(GRID_WIDTH as usize)
    }

    /// Fill a whole row with `kind`, except for the listed holes
    pub fn fill_row(&mut self, y: i8, kind: PieceKind, holes: &[i8]) {
        for x in 0..GRID_WIDTH as i8 {
            let cell = if holes.contains(&x) { None } else { Some(kind) };
            self.set(x, y, cell);
        }
    }

    /// Build a board from rows of text, one string per row from the top
    ///
    /// `.` is empty, any piece letter fills the cell. Missing rows at the top
    /// are empty, so a short picture describes the bottom of the board.
    pub fn from_picture(rows: &[&str]) -> Self {
        assert!(rows.len() <= BOARD_ROWS, "picture taller than the board");
        let mut board = Board::new();
        let top = BOARD_ROWS - rows.len();
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), GRID_WIDTH as usize, "row {i} has the wrong width");
            for (x, ch) in row.chars().enumerate() {
                let cell = PieceKind::from_str(&ch.to_string());
                board.set(x as i8, (top + i) as i8, cell);
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
