//! Replays the same recording through two independent controllers and
//! checks they agree bit-for-bit: equal fingerprints and byte-identical
//! final snapshots.

use match3_board::GameState;
use match3_core::{
    BombType, Command, CommandKind, CoverType, GroundType, InitialCell, LevelConfig, Position,
    SimulationConfig, TileType,
};
use match3_replay::{GameRecording, NullReplayCollector, ReplayController, ReplayState};
use match3_snapshot::SessionSnapshot;
use match3_spawn_model::DefaultSpawnModel;

fn cell(x: i32, y: i32, tile: TileType) -> InitialCell {
    InitialCell {
        pos: Position::new(x, y),
        tile,
        bomb: BombType::None,
        cover: CoverType::None,
        cover_health: 0,
        ground: GroundType::None,
        ground_health: 0,
    }
}

fn level() -> LevelConfig {
    LevelConfig {
        width: 7,
        height: 7,
        tile_types_count: 5,
        move_limit: 40,
        target_difficulty: 0.5,
        objectives: Vec::new(),
        initial_layout: vec![
            cell(0, 0, TileType::Red),
            cell(1, 0, TileType::Blue),
            cell(2, 2, TileType::Green),
            cell(2, 3, TileType::Yellow),
            cell(4, 4, TileType::Purple),
            cell(5, 4, TileType::Red),
            cell(5, 5, TileType::Blue),
        ],
        seed: 1337,
    }
}

fn recording() -> GameRecording {
    let level = level();
    let state = GameState::new(&level).expect("valid level");
    let snapshot = SessionSnapshot::capture(level, state);
    let commands = vec![
        Command {
            id: 1,
            issued_at_tick: 0,
            kind: CommandKind::Swap {
                from: Position::new(0, 0),
                to: Position::new(1, 0),
            },
        },
        Command {
            id: 2,
            issued_at_tick: 5,
            kind: CommandKind::Swap {
                from: Position::new(2, 2),
                to: Position::new(2, 3),
            },
        },
        Command {
            id: 3,
            issued_at_tick: 20,
            kind: CommandKind::Swap {
                from: Position::new(4, 4),
                to: Position::new(5, 4),
            },
        },
    ];
    GameRecording::new(snapshot, 1337, commands, 90, 0, 3)
}

/// Runs a fresh controller to completion and returns its fingerprint
/// plus a serialized snapshot of its final state.
fn play_to_completion(recording: GameRecording) -> (u64, Vec<u8>) {
    let mut controller = ReplayController::new(
        recording,
        SimulationConfig::default(),
        Box::new(DefaultSpawnModel::new()),
        Box::new(NullReplayCollector),
    );
    controller.play();
    while controller.state() == ReplayState::Playing {
        controller.tick(1.0 / 60.0);
    }
    assert_eq!(controller.state(), ReplayState::Completed);

    let engine = controller.engine().expect("completed controller keeps its engine");
    let snapshot = SessionSnapshot::capture(level(), engine.state_ref().clone());
    let bytes = snapshot.serialize().expect("snapshot serializes");
    (controller.fingerprint(), bytes)
}

#[test]
fn two_replays_of_the_same_recording_fingerprint_identically() {
    let (first_fingerprint, _) = play_to_completion(recording());
    let (second_fingerprint, _) = play_to_completion(recording());
    assert_eq!(first_fingerprint, second_fingerprint);
}

#[test]
fn two_replays_of_the_same_recording_end_in_the_same_state() {
    let (_, first_snapshot) = play_to_completion(recording());
    let (_, second_snapshot) = play_to_completion(recording());
    assert_eq!(first_snapshot, second_snapshot);
}

#[test]
fn two_replays_agree_on_both_fingerprint_and_final_state() {
    let (first_fingerprint, first_snapshot) = play_to_completion(recording());
    let (second_fingerprint, second_snapshot) = play_to_completion(recording());
    assert_eq!(first_fingerprint, second_fingerprint);
    assert_eq!(first_snapshot, second_snapshot);
}
