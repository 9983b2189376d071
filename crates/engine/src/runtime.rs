//! Realtime runtime.
//!
//! Drives an [`Engine`] from the tokio clock on a single task. Commands come
//! in over an mpsc channel and are applied in arrival order; every frame the
//! engine is advanced by the wall-clock time that passed, the latest snapshot
//! is published on a watch channel, and engine events are forwarded.
//!
//! With autoplay enabled the loop also plays the greedy [`bot`](crate::bot)
//! itself, one placement per autoplay period.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::bot;
use crate::core::GameSnapshot;
use crate::engine::{Engine, EngineEvent};
use crate::place::apply_place;
use crate::types::Command;

/// Default frame period (about 60 Hz)
pub const FRAME: Duration = Duration::from_millis(16);

const COMMAND_BUFFER: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub frame: Duration,
    /// Let the built-in player place a piece this often
    pub autoplay_every: Option<Duration>,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            frame: FRAME,
            autoplay_every: None,
        }
    }
}

/// Handle to a running engine task
pub struct RuntimeHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<GameSnapshot>,
    events: mpsc::UnboundedReceiver<EngineEvent>,
    task: JoinHandle<Engine>,
}

impl RuntimeHandle {
    /// Queue a command; false once the runtime has stopped
    pub async fn send(&self, command: Command) -> bool {
        self.commands.send(command).await.is_ok()
    }

    pub fn commands(&self) -> mpsc::Sender<Command> {
        self.commands.clone()
    }

    pub fn snapshots(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshots.clone()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> GameSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Next engine event, or None once the runtime has stopped
    pub async fn next_event(&mut self) -> Option<EngineEvent> {
        self.events.recv().await
    }

    pub fn try_next_event(&mut self) -> Option<EngineEvent> {
        self.events.try_recv().ok()
    }

    /// Stop the loop and hand the engine back
    ///
    /// The loop stops once every command sender (including clones handed out
    /// by [`RuntimeHandle::commands`]) is dropped.
    pub async fn shutdown(self) -> Result<Engine, JoinError> {
        let Self { commands, task, .. } = self;
        drop(commands);
        task.await
    }
}

/// Spawn the engine loop on the current tokio runtime
pub fn spawn(engine: Engine, options: RuntimeOptions) -> RuntimeHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
    let (snap_tx, snap_rx) = watch::channel(engine.snapshot());
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let task = tokio::spawn(run(engine, options, cmd_rx, snap_tx, event_tx));

    RuntimeHandle {
        commands: cmd_tx,
        snapshots: snap_rx,
        events: event_rx,
        task,
    }
}

async fn run(
    mut engine: Engine,
    options: RuntimeOptions,
    mut cmd_rx: mpsc::Receiver<Command>,
    snap_tx: watch::Sender<GameSnapshot>,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
) -> Engine {
    let mut ticker = time::interval(options.frame);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();
    let mut next_autoplay = last;

    loop {
        tokio::select! {
            maybe = cmd_rx.recv() => {
                let Some(command) = maybe else {
                    break;
                };
                catch_up(&mut engine, &mut last);
                let applied = engine.apply(command);
                log::trace!("command {:?} applied={}", command, applied);
            }
            _ = ticker.tick() => {
                catch_up(&mut engine, &mut last);
                if let Some(every) = options.autoplay_every {
                    if last >= next_autoplay && autoplay(&mut engine) {
                        next_autoplay = last + every;
                    }
                }
            }
        }

        for event in engine.take_events() {
            // Nobody listening is fine.
            let _ = event_tx.send(event);
        }
        snap_tx.send_replace(engine.snapshot());
    }

    log::debug!("runtime stopped at {}ms", engine.now_ms());
    engine
}

/// Place one piece with the greedy player; false if it could not move
fn autoplay(engine: &mut Engine) -> bool {
    let session = engine.session();
    if !session.is_playing() || session.is_clearing() {
        return false;
    }
    let Some(choice) = bot::choose(session) else {
        return false;
    };
    match apply_place(engine, choice.x, choice.rotation, choice.use_hold) {
        Ok(_) => true,
        Err(err) => {
            log::warn!("autoplay placement failed: {}", err);
            false
        }
    }
}

/// Advance the engine by the whole milliseconds elapsed since `last`
fn catch_up(engine: &mut Engine, last: &mut Instant) {
    let now = Instant::now();
    let elapsed = now.duration_since(*last).as_millis() as u64;
    if elapsed == 0 {
        return;
    }
    *last += Duration::from_millis(elapsed);
    engine.advance(elapsed);
}
