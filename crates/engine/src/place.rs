//! Placement planning: turn "put the piece at column x, rotation r" into
//! the command sequence that gets it there.
//!
//! Plans are computed on a clone of the session, so a failed plan never
//! touches the real game. [`apply_place`] replays a successful plan through
//! the engine so every command is observed like player input.

use thiserror::Error;

use crate::core::{Piece, Session};
use crate::engine::Engine;
use crate::types::{Command, RotateDirection, Rotation, GRID_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("hold requested when unavailable")]
    HoldUnavailable,
    #[error("could not rotate to target rotation")]
    RotationBlocked,
    #[error("target x would place piece out of bounds")]
    XOutOfBounds,
    #[error("could not move to target x due to collision")]
    XBlocked,
    #[error("game is not playable")]
    NotPlayable,
    #[error("no active piece")]
    NoActive,
}

/// Commands for one placement and where the piece will land
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacePlan {
    /// Ends with `HardDrop`
    pub commands: Vec<Command>,
    pub landing: Piece,
}

pub fn plan_place(
    session: &Session,
    target_x: i8,
    target_rot: Rotation,
    use_hold: bool,
) -> Result<PlacePlan, PlaceError> {
    if !session.is_playing() || session.is_clearing() {
        return Err(PlaceError::NotPlayable);
    }

    let mut sim = session.clone();
    let mut commands = Vec::with_capacity(12);

    if use_hold {
        if !sim.hold() {
            return Err(PlaceError::HoldUnavailable);
        }
        commands.push(Command::Hold);
        if !sim.is_playing() {
            return Err(PlaceError::NotPlayable);
        }
    }

    let Some(active0) = sim.active() else {
        return Err(PlaceError::NoActive);
    };

    // Try the shorter direction first; for 180 both take two steps.
    let cw = (target_rot.index() as i8 - active0.rotation.index() as i8).rem_euclid(4) as u8;
    let ccw = (4 - cw) % 4;
    let mut plans = [(RotateDirection::Cw, cw), (RotateDirection::Ccw, ccw)];
    if plans[1].1 < plans[0].1 {
        plans.swap(0, 1);
    }

    let base = sim.clone();
    let base_len = commands.len();
    let mut rotated = false;
    for (direction, steps) in plans {
        sim = base.clone();
        commands.truncate(base_len);
        let mut ok = true;
        for _ in 0..steps {
            if !sim.rotate(direction) {
                ok = false;
                break;
            }
            commands.push(match direction {
                RotateDirection::Cw => Command::RotateCw,
                RotateDirection::Ccw => Command::RotateCcw,
            });
        }
        if ok {
            rotated = true;
            break;
        }
    }
    if !rotated {
        return Err(PlaceError::RotationBlocked);
    }

    let Some(active) = sim.active() else {
        return Err(PlaceError::NoActive);
    };
    if active.rotation != target_rot {
        return Err(PlaceError::RotationBlocked);
    }

    // Validate x bounds based on the rotated shape.
    let shape = active.shape();
    let min_dx = shape.iter().map(|&(dx, _)| dx).min().unwrap_or(0);
    let max_dx = shape.iter().map(|&(dx, _)| dx).max().unwrap_or(0);
    if target_x + min_dx < 0 || target_x + max_dx >= GRID_WIDTH as i8 {
        return Err(PlaceError::XOutOfBounds);
    }

    let dx = target_x - active.x;
    let (step, command) = if dx > 0 {
        (1, Command::MoveRight)
    } else {
        (-1, Command::MoveLeft)
    };
    for _ in 0..dx.abs() {
        let moved = if step > 0 {
            sim.move_right()
        } else {
            sim.move_left()
        };
        if !moved {
            return Err(PlaceError::XBlocked);
        }
        commands.push(command);
    }

    let Some(landing) = sim.ghost() else {
        return Err(PlaceError::NoActive);
    };
    commands.push(Command::HardDrop);

    Ok(PlacePlan { commands, landing })
}

/// Plan a placement and play it on the engine
pub fn apply_place(
    engine: &mut Engine,
    target_x: i8,
    target_rot: Rotation,
    use_hold: bool,
) -> Result<PlacePlan, PlaceError> {
    let plan = plan_place(engine.session(), target_x, target_rot, use_hold)?;
    for &command in &plan.commands {
        let applied = engine.apply(command);
        debug_assert!(applied, "planned {:?} was rejected", command);
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PieceKind, RunState};

    fn started(seed: u32) -> Session {
        let mut s = Session::new(seed);
        s.start();
        s
    }

    #[test]
    fn place_rejected_when_paused() {
        let mut s = started(1);
        s.pause();
        let a = s.active().unwrap();
        let err = plan_place(&s, a.x, a.rotation, false).unwrap_err();
        assert_eq!(err, PlaceError::NotPlayable);
    }

    #[test]
    fn place_rejected_when_x_out_of_bounds() {
        let s = started(1);
        let a = s.active().unwrap();
        let err = plan_place(&s, -50, a.rotation, false).unwrap_err();
        assert_eq!(err, PlaceError::XOutOfBounds);
        assert_eq!(err.to_string(), "target x would place piece out of bounds");
    }

    #[test]
    fn hold_unavailable_after_hold() {
        let mut s = started(2);
        s.hold();
        let a = s.active().unwrap();
        let err = plan_place(&s, a.x, a.rotation, true).unwrap_err();
        assert_eq!(err, PlaceError::HoldUnavailable);
    }

    #[test]
    fn plan_leaves_session_untouched() {
        let s = started(4);
        let before = s.snapshot();
        let plan = plan_place(&s, 0, Rotation::East, false).unwrap();
        assert_eq!(s.snapshot(), before);
        assert_eq!(plan.commands.last(), Some(&Command::HardDrop));
        assert_eq!(plan.landing.rotation, Rotation::East);
    }

    #[test]
    fn plan_uses_shorter_rotation() {
        let s = started(6);
        let plan = plan_place(&s, 3, Rotation::West, false).unwrap();
        let rotations: Vec<_> = plan
            .commands
            .iter()
            .filter(|c| matches!(c, Command::RotateCw | Command::RotateCcw))
            .collect();
        assert_eq!(rotations, vec![&Command::RotateCcw]);
    }

    #[test]
    fn apply_place_lands_where_planned() {
        let mut engine = Engine::default();
        engine.apply(Command::Start);
        let kind = engine.session().active().unwrap().kind;

        let plan = apply_place(&mut engine, 0, Rotation::North, false).unwrap();
        assert_eq!(plan.landing.kind, kind);
        for (x, y) in plan.landing.cells() {
            assert_eq!(engine.session().board().get(x, y), Some(Some(kind)));
        }
        assert_eq!(engine.session().run_state(), RunState::Playing);
    }

    #[test]
    fn vertical_i_reaches_both_walls() {
        let s = (1..10_000)
            .map(started)
            .find(|s| s.active().map(|p| p.kind) == Some(PieceKind::I))
            .unwrap();
        // East occupies box column 2, so x = -2 is the left wall
        let left = plan_place(&s, -2, Rotation::East, false).unwrap();
        assert!(left.landing.cells().iter().all(|&(x, _)| x == 0));
        let right = plan_place(&s, 7, Rotation::East, false).unwrap();
        assert!(right.landing.cells().iter().all(|&(x, _)| x == 9));
    }
}
