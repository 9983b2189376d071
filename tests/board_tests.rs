//! Board tests - grid rules through the public API

use blockfall::core::{Board, Piece};
use blockfall::types::{PieceKind, Rotation, GRID_HEIGHT, GRID_WIDTH};

const ROTATIONS: [Rotation; 4] = [
    Rotation::North,
    Rotation::East,
    Rotation::South,
    Rotation::West,
];

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), GRID_WIDTH);
    assert_eq!(board.height(), GRID_HEIGHT);
    assert_eq!(board.filled_count(), 0);

    for y in 0..GRID_HEIGHT as i8 {
        for x in 0..GRID_WIDTH as i8 {
            assert_eq!(board.get(x, y), Some(None), "cell ({}, {})", x, y);
        }
    }
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new();
    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(GRID_WIDTH as i8, 0), None);
    assert_eq!(board.get(0, GRID_HEIGHT as i8), None);
}

#[test]
fn test_board_set_and_get() {
    let mut board = Board::new();
    assert!(board.set(5, 10, Some(PieceKind::T)));
    assert_eq!(board.get(5, 10), Some(Some(PieceKind::T)));
    assert!(!board.set(10, 10, Some(PieceKind::T)));
}

/// Every valid placement keeps all cells inside the walls and above the floor
#[test]
fn test_valid_positions_stay_in_bounds() {
    let board = Board::new();
    for kind in PieceKind::ALL {
        for rotation in ROTATIONS {
            for x in -4..GRID_WIDTH as i8 + 4 {
                for y in -4..GRID_HEIGHT as i8 + 4 {
                    let piece = Piece { kind, rotation, x, y };
                    let valid = board.is_valid_position(&piece, 0, 0);
                    let in_bounds = piece.cells().iter().all(|&(cx, cy)| {
                        (0..GRID_WIDTH as i8).contains(&cx) && cy < GRID_HEIGHT as i8
                    });
                    assert_eq!(valid, in_bounds, "{:?} {:?} at ({}, {})", kind, rotation, x, y);
                }
            }
        }
    }
}

#[test]
fn test_any_overlap_rejects() {
    let mut board = Board::new();
    let piece = Piece::spawn(PieceKind::T).offset(0, 8);
    for (x, y) in piece.cells() {
        board.set(x, y, Some(PieceKind::O));
        assert!(!board.is_valid_position(&piece, 0, 0));
        board.set(x, y, None);
    }
    assert!(board.is_valid_position(&piece, 0, 0));
}

#[test]
fn test_clear_lines_no_full_rows() {
    let board = Board::from_picture(&[
        "IIIII.IIII",
        "T.T.T.T.T.",
    ]);
    let (after, rows) = board.clear_lines();
    assert!(rows.is_empty());
    assert_eq!(after, board);
}

#[test]
fn test_clear_lines_counts_zero_to_four() {
    for n in 0..=4usize {
        let mut board = Board::new();
        for y in (GRID_HEIGHT as usize - n)..GRID_HEIGHT as usize {
            board.fill_row(y as i8, PieceKind::L, &[]);
        }
        // A marker above the full rows must fall by n
        board.set(0, 10, Some(PieceKind::S));

        let (after, rows) = board.clear_lines();
        assert_eq!(rows.len(), n);
        assert_eq!(after.height(), GRID_HEIGHT);
        assert_eq!(after.cells().len(), GRID_WIDTH as usize * GRID_HEIGHT as usize);
        assert_eq!(after.get(0, 10 + n as i8), Some(Some(PieceKind::S)));
        assert_eq!(after.filled_count(), 1);
    }
}

#[test]
fn test_clear_lines_non_adjacent_rows() {
    let board = Board::from_picture(&[
        "OOOOOOOOOO",
        "Z.........",
        "OOOOOOOOOO",
        ".J........",
        "OOOOOOOOOO",
    ]);
    let (after, rows) = board.clear_lines();
    assert_eq!(rows.as_slice(), &[15, 17, 19]);
    // Survivors keep their order and settle at the bottom
    assert_eq!(after.get(0, 18), Some(Some(PieceKind::Z)));
    assert_eq!(after.get(1, 19), Some(Some(PieceKind::J)));
    assert_eq!(after.filled_count(), 2);
}

#[test]
fn test_with_piece_then_ghost() {
    let board = Board::from_picture(&["..........", "JJJ.......", "JJJ......."]);
    let piece = Piece::spawn(PieceKind::O).offset(-4, 0);
    let ghost = board.ghost_position(&piece);
    assert_eq!(ghost.y, 16);

    let placed = board.with_piece(&ghost);
    assert_eq!(placed.filled_count(), board.filled_count() + 4);
    assert!(board.is_valid_position(&ghost, 0, 0));
    assert!(!board.is_valid_position(&ghost, 0, 1));
}

#[test]
fn test_rows_iterator() {
    let board = Board::from_picture(&["T........."]);
    let rows: Vec<_> = board.rows().collect();
    assert_eq!(rows.len(), GRID_HEIGHT as usize);
    assert_eq!(rows[19][0], Some(PieceKind::T));
}
