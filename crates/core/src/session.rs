//! Session module - the authoritative game state and its transitions
//!
//! A [`Session`] owns the board, the active piece, the piece queue, the hold
//! slot and the score counters, and moves through
//! `Idle → Playing ⇄ Paused → GameOver`. Every player command and every
//! gravity tick is a method taking `&mut self`; commands that make no sense in
//! the current state are silent no-ops that return `false`.
//!
//! A lock that clears lines does not install the next piece right away. The
//! session parks the post-clear board and the next piece in a
//! [`PendingClear`] tagged with a [`ClearTicket`] and keeps the pre-clear
//! board visible with gravity gated off. Whoever drives time calls
//! [`Session::finish_clear`] with that ticket once the clear window has
//! elapsed. Tickets carry the session generation, so a completion left over
//! from a previous game is rejected.

use serde::{Deserialize, Serialize};

use crate::board::{Board, ClearedRows};
use crate::pieces::{try_rotate, Piece};
use crate::rng::{PieceQueue, SimpleRng};
use crate::scoring::{hard_drop_points, level_from_total_lines, score_for_clear};
use crate::snapshot::{GameSnapshot, PieceSnapshot};
use crate::types::{
    Command, GameOverSummary, PieceKind, RotateDirection, RunState, DEFAULT_LOOKAHEAD,
    GRID_HEIGHT, GRID_WIDTH, MAX_LOOKAHEAD, MIN_LOOKAHEAD,
};

/// Identifies one deferred line-clear completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClearTicket {
    /// Session generation (bumped by every `start`)
    pub generation: u64,
    /// Lock counter within the generation
    pub lock_seq: u64,
}

/// State parked while cleared rows are on display
#[derive(Debug, Clone, PartialEq)]
pub struct PendingClear {
    pub ticket: ClearTicket,
    pub rows: ClearedRows,
    board_after: Board,
    next_active: Piece,
}

/// What a single lock did (consumed by observers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockEvent {
    pub kind: PieceKind,
    pub lines_cleared: u32,
    /// Points from the clear itself (hard-drop points excluded)
    pub line_clear_score: u32,
    pub combo: u32,
    pub game_over: bool,
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct Session {
    run_state: RunState,
    board: Board,
    active: Option<Piece>,
    queue: Option<PieceQueue>,
    hold: Option<PieceKind>,
    can_hold: bool,
    score: u32,
    level: u32,
    lines: u32,
    combo: u32,
    clearing: Option<PendingClear>,
    /// Monotonic game id (increments on every start).
    generation: u64,
    /// Locks performed in the current generation.
    lock_seq: u64,
    lookahead: usize,
    /// Seeds each new game's piece queue.
    seeds: SimpleRng,
    last_lock: Option<LockEvent>,
}

impl Session {
    /// Create an idle session; `seed` determines every game's piece sequence
    pub fn new(seed: u32) -> Self {
        Self::with_lookahead(seed, DEFAULT_LOOKAHEAD)
    }

    /// Create an idle session with a custom preview length
    ///
    /// # Panics
    ///
    /// If `lookahead` is outside `MIN_LOOKAHEAD..=MAX_LOOKAHEAD`.
    pub fn with_lookahead(seed: u32, lookahead: usize) -> Self {
        assert!(
            (MIN_LOOKAHEAD..=MAX_LOOKAHEAD).contains(&lookahead),
            "lookahead must be in {MIN_LOOKAHEAD}..={MAX_LOOKAHEAD}, got {lookahead}"
        );
        Self {
            run_state: RunState::Idle,
            board: Board::new(),
            active: None,
            queue: None,
            hold: None,
            can_hold: true,
            score: 0,
            level: 1,
            lines: 0,
            combo: 0,
            clearing: None,
            generation: 0,
            lock_seq: 0,
            lookahead,
            seeds: SimpleRng::new(seed),
            last_lock: None,
        }
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_playing(&self) -> bool {
        self.run_state == RunState::Playing
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for setting up positions in tests
    #[cfg(feature = "test-support")]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    /// Upcoming piece kinds, soonest first (empty before the first start)
    pub fn preview(&self) -> &[PieceKind] {
        self.queue.as_ref().map(PieceQueue::preview).unwrap_or(&[])
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether gravity is gated by a line clear on display
    pub fn is_clearing(&self) -> bool {
        self.clearing.is_some()
    }

    /// Rows currently on display as clearing, top to bottom
    pub fn clearing_rows(&self) -> &[usize] {
        self.clearing.as_ref().map(|p| p.rows.as_slice()).unwrap_or(&[])
    }

    /// Ticket of the outstanding line-clear completion, if any
    pub fn pending_clear(&self) -> Option<ClearTicket> {
        self.clearing.as_ref().map(|p| p.ticket)
    }

    /// Landing position of the active piece
    pub fn ghost(&self) -> Option<Piece> {
        self.active.map(|p| self.board.ghost_position(&p))
    }

    /// Final result, available once the session is over
    pub fn summary(&self) -> Option<GameOverSummary> {
        (self.run_state == RunState::GameOver).then_some(GameOverSummary {
            score: self.score,
            level: self.level,
            lines: self.lines,
        })
    }

    /// Take and clear the last lock event.
    pub fn take_last_lock(&mut self) -> Option<LockEvent> {
        self.last_lock.take()
    }

    /// Begin a fresh game from any state
    ///
    /// Resets board, counters and hold, deals two bags, spawns the first
    /// piece and bumps the generation so any outstanding clear ticket goes
    /// stale.
    pub fn start(&mut self) -> bool {
        let (queue, first) = PieceQueue::new(self.seeds.next_u32(), self.lookahead);

        self.generation = self.generation.wrapping_add(1);
        self.lock_seq = 0;
        self.run_state = RunState::Playing;
        self.board = Board::new();
        self.active = Some(Piece::spawn(first));
        self.queue = Some(queue);
        self.hold = None;
        self.can_hold = true;
        self.score = 0;
        self.level = 1;
        self.lines = 0;
        self.combo = 0;
        self.clearing = None;
        self.last_lock = None;

        log::debug!("game {} started, first piece {:?}", self.generation, first);
        true
    }

    /// playing → paused
    pub fn pause(&mut self) -> bool {
        if self.run_state != RunState::Playing {
            return false;
        }
        self.run_state = RunState::Paused;
        true
    }

    /// paused → playing
    pub fn resume(&mut self) -> bool {
        if self.run_state != RunState::Paused {
            return false;
        }
        self.run_state = RunState::Playing;
        true
    }

    /// Abandon the running game; the board stays as it is
    pub fn end_game(&mut self) -> bool {
        if !matches!(self.run_state, RunState::Playing | RunState::Paused) {
            return false;
        }
        self.clearing = None;
        self.active = None;
        self.finish_game();
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(1, 0)
    }

    /// Move one row down; never locks
    pub fn soft_drop(&mut self) -> bool {
        self.shift(0, 1)
    }

    /// Drop to the ghost position (2 points per row) and lock
    pub fn hard_drop(&mut self) -> bool {
        let Some(active) = self.controllable() else {
            return false;
        };
        let ghost = self.board.ghost_position(&active);
        let rows = (ghost.y - active.y) as u32;
        self.score = self.score.saturating_add(hard_drop_points(rows));
        self.active = Some(ghost);
        self.lock_active();
        true
    }

    /// Rotate with SRS wall kicks; unchanged if every kick test fails
    pub fn rotate(&mut self, direction: RotateDirection) -> bool {
        let Some(active) = self.controllable() else {
            return false;
        };
        let board = &self.board;
        match try_rotate(&active, direction, |p| board.is_valid_position(p, 0, 0)) {
            Some((rotated, _kick)) => {
                self.active = Some(rotated);
                true
            }
            None => false,
        }
    }

    /// Swap the active piece with the hold slot (once per lock)
    ///
    /// An empty slot takes the active kind and the next queued piece spawns.
    /// An occupied slot swaps: the held kind spawns at its spawn transform.
    /// A held piece that cannot spawn ends the game.
    pub fn hold(&mut self) -> bool {
        if !self.can_hold {
            return false;
        }
        let Some(active) = self.controllable() else {
            return false;
        };

        let incoming = match self.hold.replace(active.kind) {
            Some(held) => held,
            None => self.queue_mut().take_next(),
        };
        self.can_hold = false;

        let piece = Piece::spawn(incoming);
        if !self.board.is_valid_position(&piece, 0, 0) {
            self.active = None;
            self.finish_game();
            return true;
        }
        self.active = Some(piece);
        true
    }

    /// One gravity step: fall a row, or lock if resting
    pub fn tick(&mut self) -> bool {
        if self.run_state != RunState::Playing || self.clearing.is_some() {
            return false;
        }
        debug_assert!(self.active.is_some(), "playing without an active piece");
        if self.shift(0, 1) {
            log::trace!("gravity step");
            return true;
        }
        self.lock_active();
        true
    }

    /// Install the parked post-clear board and next piece
    ///
    /// Returns false (and changes nothing) unless `ticket` names the clear
    /// that is outstanding right now. Runs whether or not the game is paused.
    pub fn finish_clear(&mut self, ticket: ClearTicket) -> bool {
        let Some(pending) = self.clearing.take() else {
            log::warn!("clear completion {:?} with nothing pending", ticket);
            return false;
        };
        if pending.ticket != ticket {
            log::warn!(
                "stale clear completion {:?} (pending {:?})",
                ticket,
                pending.ticket
            );
            self.clearing = Some(pending);
            return false;
        }

        self.board = pending.board_after;
        self.active = Some(pending.next_active);
        self.can_hold = true;
        true
    }

    /// Apply a command; returns whether it changed anything
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Start => self.start(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::SoftDrop => self.soft_drop(),
            Command::HardDrop => self.hard_drop(),
            Command::RotateCw => self.rotate(RotateDirection::Cw),
            Command::RotateCcw => self.rotate(RotateDirection::Ccw),
            Command::Hold => self.hold(),
            Command::Tick => self.tick(),
            Command::EndGame => self.end_game(),
        }
    }

    /// Read-only view for renderers and observers
    pub fn snapshot(&self) -> GameSnapshot {
        let mut board = [[None; GRID_WIDTH as usize]; GRID_HEIGHT as usize];
        for (dst, src) in board.iter_mut().zip(self.board.rows()) {
            dst.copy_from_slice(src);
        }

        GameSnapshot {
            run_state: self.run_state,
            generation: self.generation,
            board,
            active: self.active.map(PieceSnapshot::from),
            ghost: self.ghost().map(PieceSnapshot::from),
            preview: self.preview().iter().copied().collect(),
            hold: self.hold,
            can_hold: self.can_hold,
            score: self.score,
            level: self.level,
            lines: self.lines,
            combo: self.combo,
            clearing: self.is_clearing(),
            clearing_rows: self.clearing_rows().iter().copied().collect(),
        }
    }

    /// Active piece when player input may act on it
    fn controllable(&self) -> Option<Piece> {
        if self.run_state != RunState::Playing || self.clearing.is_some() {
            return None;
        }
        self.active
    }

    fn shift(&mut self, dx: i8, dy: i8) -> bool {
        let Some(active) = self.controllable() else {
            return false;
        };
        if !self.board.is_valid_position(&active, dx, dy) {
            return false;
        }
        self.active = Some(active.offset(dx, dy));
        true
    }

    fn queue_mut(&mut self) -> &mut PieceQueue {
        match self.queue.as_mut() {
            Some(queue) => queue,
            None => unreachable!("piece queue used before start"),
        }
    }

    /// Stamp, clear, score, then spawn (now or after the clear window)
    fn lock_active(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        self.lock_seq += 1;

        let stamped = self.board.with_piece(&piece);
        let (cleared_board, rows) = stamped.clear_lines();
        let n = rows.len();

        self.combo = if n > 0 { self.combo + 1 } else { 0 };
        let line_clear_score = score_for_clear(n, self.level, self.combo);
        self.score = self.score.saturating_add(line_clear_score);
        self.lines += n as u32;
        self.level = level_from_total_lines(self.lines);

        let next = Piece::spawn(self.queue_mut().take_next());
        let game_over = !cleared_board.is_valid_position(&next, 0, 0);

        self.last_lock = Some(LockEvent {
            kind: piece.kind,
            lines_cleared: n as u32,
            line_clear_score,
            combo: self.combo,
            game_over,
        });

        if game_over {
            // The pre-clear board is the final picture.
            self.board = stamped;
            self.finish_game();
            return;
        }

        if n > 0 {
            let ticket = ClearTicket {
                generation: self.generation,
                lock_seq: self.lock_seq,
            };
            log::debug!("cleared rows {:?}, combo {}", rows.as_slice(), self.combo);
            self.board = stamped;
            self.clearing = Some(PendingClear {
                ticket,
                rows,
                board_after: cleared_board,
                next_active: next,
            });
        } else {
            self.board = cleared_board;
            self.active = Some(next);
            self.can_hold = true;
        }
    }

    fn finish_game(&mut self) {
        self.run_state = RunState::GameOver;
        log::debug!(
            "game {} over: score {}, level {}, lines {}",
            self.generation,
            self.score,
            self.level,
            self.lines
        );
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(1)
    }
}
