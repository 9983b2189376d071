//! Pieces module - piece shapes, spawn transforms and SRS wall kicks
//!
//! All data here is static. Shapes are given as the four occupied cells of
//! the piece's bounding box (I is 4x4, O is 2x2, the rest are 3x3), matching
//! the standard SRS orientation for each rotation state.
//! Reference: https://tetris.wiki/SRS

use serde::{Deserialize, Serialize};

use crate::types::{PieceKind, RotateDirection, Rotation, GRID_WIDTH};

/// Offset of a single mino from the bounding-box top-left, `(dx, dy)` with y growing down
pub type MinoOffset = (i8, i8);

/// Shape of a piece - the 4 occupied cells of its bounding box
pub type PieceShape = [MinoOffset; 4];

/// Get the occupancy of a piece kind in a rotation state
pub fn shape_of(kind: PieceKind, rotation: Rotation) -> PieceShape {
    match kind {
        PieceKind::I => i_shape(rotation),
        PieceKind::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
        PieceKind::T => t_shape(rotation),
        PieceKind::S => s_shape(rotation),
        PieceKind::Z => z_shape(rotation),
        PieceKind::J => j_shape(rotation),
        PieceKind::L => l_shape(rotation),
    }
}

/// Side length of the piece's square bounding box
pub fn box_width(kind: PieceKind) -> i8 {
    match kind {
        PieceKind::I => 4,
        PieceKind::O => 2,
        _ => 3,
    }
}

fn i_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 1), (1, 1), (2, 1), (3, 1)],
        Rotation::East => [(2, 0), (2, 1), (2, 2), (2, 3)],
        Rotation::South => [(0, 2), (1, 2), (2, 2), (3, 2)],
        Rotation::West => [(1, 0), (1, 1), (1, 2), (1, 3)],
    }
}

fn t_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn s_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (2, 0), (0, 1), (1, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (2, 2)],
        Rotation::South => [(1, 1), (2, 1), (0, 2), (1, 2)],
        Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn z_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (1, 0), (1, 1), (2, 1)],
        Rotation::East => [(2, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (1, 2), (2, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
    }
}

fn j_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
        Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
    }
}

fn l_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
        Rotation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
    }
}

/// Spawn transform for a piece kind: rotation North, horizontally centered,
/// shifted up so the first occupied row sits on grid row 0
pub fn spawn_position(kind: PieceKind) -> (i8, i8) {
    let shape = shape_of(kind, Rotation::North);
    let top = shape.iter().map(|&(_, dy)| dy).min().unwrap_or(0);
    ((GRID_WIDTH as i8 - box_width(kind)) / 2, -top)
}

/// The active (falling) piece
///
/// `x`/`y` locate the top-left of the bounding box in grid coordinates;
/// `y` is negative while part of the box is above the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// Create a piece at its spawn transform
    pub fn spawn(kind: PieceKind) -> Self {
        let (x, y) = spawn_position(kind);
        Self {
            kind,
            rotation: Rotation::North,
            x,
            y,
        }
    }

    /// Occupancy for the current rotation
    pub fn shape(&self) -> PieceShape {
        shape_of(self.kind, self.rotation)
    }

    /// Absolute grid cells covered by the piece
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Copy of the piece shifted by `(dx, dy)`
    pub fn offset(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// One row of kick tests, zero offset first
pub type KickRow = [(i8, i8); 5];

// Tables are written in SRS notation (y grows upward); `wall_kick_offsets`
// flips y into grid space.

const JLSTZ_0_1: KickRow = [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)];
const JLSTZ_1_0: KickRow = [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)];
const JLSTZ_1_2: KickRow = [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)];
const JLSTZ_2_1: KickRow = [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)];
const JLSTZ_2_3: KickRow = [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)];
const JLSTZ_3_2: KickRow = [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)];
const JLSTZ_3_0: KickRow = [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)];
const JLSTZ_0_3: KickRow = [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)];

const I_0_1: KickRow = [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)];
const I_1_0: KickRow = [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)];
const I_1_2: KickRow = [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)];
const I_2_1: KickRow = [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)];
const I_2_3: KickRow = [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)];
const I_3_2: KickRow = [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)];
const I_3_0: KickRow = [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)];
const I_0_3: KickRow = [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)];

const fn to_grid_space(row: KickRow) -> KickRow {
    let mut out = row;
    let mut i = 0;
    while i < 5 {
        out[i].1 = -out[i].1;
        i += 1;
    }
    out
}

/// Grid-space kick table indexed `[from][to]`; non-adjacent pairs are empty
type KickTable = [[&'static [(i8, i8)]; 4]; 4];

const EMPTY: &[(i8, i8)] = &[];

const fn kick_table(rows: [KickRow; 8]) -> [[KickRow; 2]; 4] {
    // [from] -> [cw target, ccw target]
    [
        [to_grid_space(rows[0]), to_grid_space(rows[7])],
        [to_grid_space(rows[2]), to_grid_space(rows[1])],
        [to_grid_space(rows[4]), to_grid_space(rows[3])],
        [to_grid_space(rows[6]), to_grid_space(rows[5])],
    ]
}

// Row order: 0>1, 1>0, 1>2, 2>1, 2>3, 3>2, 3>0, 0>3
const JLSTZ_DIRECTIONAL: [[KickRow; 2]; 4] = kick_table([
    JLSTZ_0_1, JLSTZ_1_0, JLSTZ_1_2, JLSTZ_2_1, JLSTZ_2_3, JLSTZ_3_2, JLSTZ_3_0, JLSTZ_0_3,
]);

const I_DIRECTIONAL: [[KickRow; 2]; 4] = kick_table([
    I_0_1, I_1_0, I_1_2, I_2_1, I_2_3, I_3_2, I_3_0, I_0_3,
]);

const fn pair_table(d: &'static [[KickRow; 2]; 4]) -> KickTable {
    // to = from + 1 uses the cw row, to = from - 1 the ccw row
    [
        [EMPTY, &d[0][0], EMPTY, &d[0][1]],
        [&d[1][1], EMPTY, &d[1][0], EMPTY],
        [EMPTY, &d[2][1], EMPTY, &d[2][0]],
        [&d[3][0], EMPTY, &d[3][1], EMPTY],
    ]
}

static JLSTZ_KICKS: KickTable = pair_table(&JLSTZ_DIRECTIONAL);
static I_KICKS: KickTable = pair_table(&I_DIRECTIONAL);

/// Ordered wall-kick offsets (grid space) for rotating `kind` from `from` to `to`
///
/// O has no kicks. I uses its own table; J, L, S, T and Z share one. The
/// ordered pair matters: E→N and W→N, for example, use different sequences.
pub fn wall_kick_offsets(kind: PieceKind, from: Rotation, to: Rotation) -> &'static [(i8, i8)] {
    match kind {
        PieceKind::O => EMPTY,
        PieceKind::I => I_KICKS[from.index()][to.index()],
        PieceKind::T | PieceKind::S | PieceKind::Z | PieceKind::J | PieceKind::L => {
            JLSTZ_KICKS[from.index()][to.index()]
        }
    }
}

/// Try to rotate `piece` one step in `direction`, testing wall kicks in order
///
/// `fits` decides whether a candidate placement is legal. The zero offset is
/// tested first (O, which has no kick table, tests only that). Returns the
/// rotated piece and the kick that was used, or None if every test fails.
pub fn try_rotate(
    piece: &Piece,
    direction: RotateDirection,
    fits: impl Fn(&Piece) -> bool,
) -> Option<(Piece, (i8, i8))> {
    let to = piece.rotation.rotated(direction);
    let rotated = Piece {
        rotation: to,
        ..*piece
    };

    let kicks = wall_kick_offsets(piece.kind, piece.rotation, to);
    let tests: &[(i8, i8)] = if kicks.is_empty() { &[(0, 0)] } else { kicks };

    tests
        .iter()
        .map(|&(dx, dy)| (rotated.offset(dx, dy), (dx, dy)))
        .find(|(candidate, _)| fits(candidate))
}
