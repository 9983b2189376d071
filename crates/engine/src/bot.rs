//! A small greedy player used by the demo runner and by tests that need
//! real line clears.
//!
//! Every reachable (hold, rotation, column) is planned on a clone and the
//! resulting board is scored with the usual four-feature heuristic:
//! aggregate height, completed lines, holes and bumpiness.

use crate::core::{Board, Session};
use crate::place::{plan_place, PlacePlan};
use crate::types::{Rotation, GRID_HEIGHT, GRID_WIDTH};

const HEIGHT_WEIGHT: f64 = -0.510066;
const LINES_WEIGHT: f64 = 0.760666;
const HOLES_WEIGHT: f64 = -0.35663;
const BUMPINESS_WEIGHT: f64 = -0.184483;

const ROTATIONS: [Rotation; 4] = [
    Rotation::North,
    Rotation::East,
    Rotation::South,
    Rotation::West,
];

#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub x: i8,
    pub rotation: Rotation,
    pub use_hold: bool,
    pub plan: PlacePlan,
    pub score: f64,
}

/// Best placement for the current piece, or None if nothing can be placed
pub fn choose(session: &Session) -> Option<Choice> {
    let holds: &[bool] = if session.can_hold() {
        &[false, true]
    } else {
        &[false]
    };

    let mut best: Option<Choice> = None;
    for &use_hold in holds {
        for rotation in ROTATIONS {
            for x in -3..GRID_WIDTH as i8 {
                let Ok(plan) = plan_place(session, x, rotation, use_hold) else {
                    continue;
                };
                let placed = session.board().with_piece(&plan.landing);
                let score = evaluate(&placed);
                if best.as_ref().map_or(true, |b| score > b.score) {
                    best = Some(Choice {
                        x,
                        rotation,
                        use_hold,
                        plan,
                        score,
                    });
                }
            }
        }
    }
    best
}

/// Heuristic value of a board right after a piece locked (higher is better)
pub fn evaluate(placed: &Board) -> f64 {
    let (board, cleared) = placed.clear_lines();
    let heights = column_heights(&board);

    let aggregate: u32 = heights.iter().sum();
    let bumpiness: u32 = heights.windows(2).map(|w| w[0].abs_diff(w[1])).sum();
    let holes = count_holes(&board, &heights);

    HEIGHT_WEIGHT * aggregate as f64
        + LINES_WEIGHT * cleared.len() as f64
        + HOLES_WEIGHT * holes as f64
        + BUMPINESS_WEIGHT * bumpiness as f64
}

fn column_heights(board: &Board) -> [u32; GRID_WIDTH as usize] {
    let mut heights = [0u32; GRID_WIDTH as usize];
    for (x, h) in heights.iter_mut().enumerate() {
        let top = (0..GRID_HEIGHT as i8).find(|&y| matches!(board.get(x as i8, y), Some(Some(_))));
        *h = top.map_or(0, |y| (GRID_HEIGHT as i8 - y) as u32);
    }
    heights
}

fn count_holes(board: &Board, heights: &[u32; GRID_WIDTH as usize]) -> u32 {
    let mut holes = 0;
    for (x, &h) in heights.iter().enumerate() {
        let top = GRID_HEIGHT as i8 - h as i8;
        holes += (top..GRID_HEIGHT as i8)
            .filter(|&y| matches!(board.get(x as i8, y), Some(None)))
            .count() as u32;
    }
    holes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    #[test]
    fn heights_and_holes() {
        let board = Board::from_picture(&[
            "T.........",
            "..........",
            "T.JJ......",
        ]);
        let heights = column_heights(&board);
        assert_eq!(heights[0], 3);
        assert_eq!(heights[1], 0);
        assert_eq!(heights[2], 1);
        assert_eq!(count_holes(&board, &heights), 1);
    }

    #[test]
    fn completed_lines_beat_stacking() {
        let flat = Board::from_picture(&["IIIIIIIII."]);
        let mut cleared = flat.clone();
        cleared.set(9, 19, Some(PieceKind::I));
        assert!(evaluate(&cleared) > evaluate(&flat));
    }

    #[test]
    fn choose_finds_a_placement() {
        let mut s = Session::new(8);
        s.start();
        let choice = choose(&s).unwrap();
        assert_eq!(choice.plan.commands.last(), Some(&crate::types::Command::HardDrop));
    }

    #[test]
    fn nothing_to_choose_when_idle() {
        assert!(choose(&Session::new(8)).is_none());
    }
}
