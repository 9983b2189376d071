//! Replay scripts and the realtime runtime through the facade crate

use std::time::Duration;

use blockfall::engine::runtime::{self, RuntimeOptions};
use blockfall::engine::{Engine, EngineEvent, Script, ScriptError};
use blockfall::types::{Command, RunState};

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn test_replay_fixture() {
    let script = Script::from_file(fixture("opening.json")).unwrap();
    assert_eq!(script.config.lookahead, 5);

    let outcome = script.run().unwrap();
    assert_eq!(outcome.elapsed_ms, 12_000);
    assert_eq!(outcome.snapshot.run_state, RunState::Playing);
    assert_eq!(outcome.snapshot.preview.len(), 5);
    assert!(outcome.snapshot.hold.is_some());
    assert!(!outcome.snapshot.can_hold);
    assert!(outcome.summary.is_none());

    let locks = outcome
        .events
        .iter()
        .filter(|e| matches!(e, EngineEvent::Locked(_)))
        .count();
    assert_eq!(locks, 2);
    assert!(outcome.events.contains(&EngineEvent::Paused));
    assert!(outcome.events.contains(&EngineEvent::Resumed));

    // Same script, same game
    assert_eq!(script.run().unwrap(), outcome);
}

#[test]
fn test_replay_missing_file() {
    let err = Script::from_file(fixture("missing.json")).unwrap_err();
    assert!(matches!(err, ScriptError::Io { .. }));
    assert!(err.to_string().contains("missing.json"));
}

#[tokio::test(start_paused = true)]
async fn test_runtime_commands_and_gravity() {
    let mut handle = runtime::spawn(Engine::default(), RuntimeOptions::default());
    assert!(handle.send(Command::Start).await);
    tokio::time::sleep(Duration::from_millis(10)).await;
    let spawned = handle.snapshot().active.unwrap();

    assert!(handle.send(Command::Pause).await);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(handle.snapshot().active.unwrap().y, spawned.y);
    assert_eq!(handle.snapshot().run_state, RunState::Paused);

    assert!(handle.send(Command::Resume).await);
    tokio::time::sleep(Duration::from_millis(1_050)).await;
    assert_eq!(handle.snapshot().active.unwrap().y, spawned.y + 1);

    let mut seen = Vec::new();
    while let Some(event) = handle.try_next_event() {
        seen.push(event);
    }
    assert_eq!(
        seen,
        vec![
            EngineEvent::Started { generation: 1 },
            EngineEvent::Paused,
            EngineEvent::Resumed,
        ]
    );

    let engine = handle.shutdown().await.unwrap();
    assert_eq!(engine.session().run_state(), RunState::Playing);
}
