//! Engine controller: owns a session and a millisecond clock.
//!
//! Time only moves through [`Engine::advance`]. Gravity accumulates while the
//! session is playing with no clear on display and fires one `tick` per
//! elapsed drop interval. A lock that clears lines is completed
//! `clear_delay_ms` after it happened, paused or not, and only if the ticket
//! still matches (a restart in between makes it stale).
//!
//! Observers either read [`Engine::snapshot`] or drain [`Engine::take_events`].

use std::collections::VecDeque;

use serde::Serialize;

use crate::config::{ConfigError, EngineConfig};
use crate::core::scoring::drop_interval_with;
use crate::core::{ClearTicket, GameSnapshot, LockEvent, Session};
use crate::types::{Command, GameOverSummary, RunState};

/// Something observers may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EngineEvent {
    Started { generation: u64 },
    Locked(LockEvent),
    ClearFinished { generation: u64 },
    LevelUp { level: u32 },
    Paused,
    Resumed,
    GameOver(GameOverSummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledClear {
    ticket: ClearTicket,
    due_ms: u64,
}

#[derive(Debug)]
pub struct Engine {
    session: Session,
    config: EngineConfig,
    now_ms: u64,
    /// Time accumulated toward the next gravity step.
    gravity_ms: u64,
    scheduled_clear: Option<ScheduledClear>,
    events: VecDeque<EngineEvent>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: EngineConfig) -> Self {
        Self {
            session: Session::with_lookahead(config.seed, config.lookahead),
            config,
            now_ms: 0,
            gravity_ms: 0,
            scheduled_clear: None,
            events: VecDeque::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Milliseconds advanced since construction
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.session.snapshot()
    }

    pub fn summary(&self) -> Option<GameOverSummary> {
        self.session.summary()
    }

    /// Gravity period at the current level
    pub fn drop_interval_ms(&self) -> u32 {
        drop_interval_with(
            self.session.level(),
            self.config.base_drop_ms,
            self.config.min_drop_ms,
        )
    }

    /// Drain queued events, oldest first
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain(..).collect()
    }

    /// Apply a player command now; returns whether it changed anything
    pub fn apply(&mut self, command: Command) -> bool {
        let prev_state = self.session.run_state();
        let prev_level = self.session.level();

        let changed = self.session.apply(command);
        if !changed {
            return false;
        }

        match command {
            Command::Start => {
                self.gravity_ms = 0;
                self.scheduled_clear = None;
                self.events.push_back(EngineEvent::Started {
                    generation: self.session.generation(),
                });
            }
            Command::Pause => self.events.push_back(EngineEvent::Paused),
            Command::Resume => {
                // Time spent paused never counts toward gravity.
                self.gravity_ms = 0;
                self.events.push_back(EngineEvent::Resumed);
            }
            _ => {}
        }

        self.observe_session(prev_state, prev_level);
        true
    }

    /// Move the clock forward, firing every gravity step and clear completion that falls due
    pub fn advance(&mut self, elapsed_ms: u64) {
        let target = self.now_ms.saturating_add(elapsed_ms);

        loop {
            let gravity_at = self.gravity_active().then(|| {
                let interval = u64::from(self.drop_interval_ms());
                self.now_ms + interval.saturating_sub(self.gravity_ms)
            });
            let clear_at = self.scheduled_clear.map(|c| c.due_ms);

            let Some(next) = [clear_at, gravity_at]
                .into_iter()
                .flatten()
                .min()
                .filter(|&t| t <= target)
            else {
                break;
            };

            self.step_clock(next);
            if clear_at == Some(next) {
                self.complete_clear();
            } else {
                self.gravity_step();
            }
        }

        self.step_clock(target);
    }

    fn gravity_active(&self) -> bool {
        self.session.run_state() == RunState::Playing && !self.session.is_clearing()
    }

    fn step_clock(&mut self, to_ms: u64) {
        debug_assert!(to_ms >= self.now_ms, "clock moved backwards");
        if self.gravity_active() {
            self.gravity_ms += to_ms - self.now_ms;
        }
        self.now_ms = to_ms;
    }

    fn gravity_step(&mut self) {
        let prev_state = self.session.run_state();
        let prev_level = self.session.level();
        self.gravity_ms = 0;
        self.session.tick();
        self.observe_session(prev_state, prev_level);
    }

    fn complete_clear(&mut self) {
        let Some(scheduled) = self.scheduled_clear.take() else {
            return;
        };
        if self.session.finish_clear(scheduled.ticket) {
            self.gravity_ms = 0;
            log::debug!("clear finished at {}ms", self.now_ms);
            self.events.push_back(EngineEvent::ClearFinished {
                generation: scheduled.ticket.generation,
            });
        }
    }

    /// Turn session changes into scheduled work and events
    fn observe_session(&mut self, prev_state: RunState, prev_level: u32) {
        if let Some(lock) = self.session.take_last_lock() {
            self.gravity_ms = 0;
            self.events.push_back(EngineEvent::Locked(lock));
        }

        if let Some(ticket) = self.session.pending_clear() {
            if self.scheduled_clear.map(|c| c.ticket) != Some(ticket) {
                let due_ms = self.now_ms + u64::from(self.config.clear_delay_ms);
                log::trace!("clear {:?} due at {}ms", ticket, due_ms);
                self.scheduled_clear = Some(ScheduledClear { ticket, due_ms });
            }
        }

        let level = self.session.level();
        if level > prev_level {
            self.events.push_back(EngineEvent::LevelUp { level });
        }

        if self.session.run_state() == RunState::GameOver && prev_state != RunState::GameOver {
            self.scheduled_clear = None;
            if let Some(summary) = self.session.summary() {
                log::info!(
                    "game over: score {}, level {}, lines {}",
                    summary.score,
                    summary.level,
                    summary.lines
                );
                self.events.push_back(EngineEvent::GameOver(summary));
            }
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_valid_config(EngineConfig::default())
    }
}
