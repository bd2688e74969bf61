use std::process::Command;

use match3_board::GameState;
use match3_core::{
    BombType, Command as EngineCommand, CommandKind, CoverType, GroundType, InitialCell,
    LevelConfig, Position, TileType,
};
use match3_replay::GameRecording;
use match3_snapshot::SessionSnapshot;

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

fn sample_recording() -> GameRecording {
    let level = LevelConfig {
        width: 6,
        height: 6,
        tile_types_count: 6,
        move_limit: 20,
        target_difficulty: 0.5,
        objectives: Vec::new(),
        initial_layout: vec![
            cell(0, 0, TileType::Red),
            cell(1, 0, TileType::Blue),
            cell(2, 2, TileType::Green),
        ],
        seed: 7,
    };
    let state = GameState::new(&level).expect("valid level");
    let snapshot = SessionSnapshot::capture(level, state);
    let commands = vec![EngineCommand {
        id: 1,
        issued_at_tick: 0,
        kind: CommandKind::Swap {
            from: Position::new(0, 0),
            to: Position::new(1, 0),
        },
    }];
    GameRecording::new(snapshot, 7, commands, 30, 0, 1)
}

#[test]
fn binary_replays_a_recording_and_prints_a_summary() {
    let recording = sample_recording();
    let bytes = recording.serialize().expect("serializes");
    let path = std::env::temp_dir().join("match3_cli_test_recording.bin");
    std::fs::write(&path, &bytes).expect("writes fixture recording");

    let output = Command::new(env!("CARGO_BIN_EXE_match3-cli"))
        .args(["--recording", path.to_str().expect("utf8 path")])
        .output()
        .expect("failed to invoke match3-cli");

    std::fs::remove_file(&path).ok();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("status="), "stdout: {stdout}");
}

#[test]
fn binary_fails_cleanly_on_a_missing_recording() {
    let output = Command::new(env!("CARGO_BIN_EXE_match3-cli"))
        .args(["--recording", "/nonexistent/path/to/recording.bin"])
        .output()
        .expect("failed to invoke match3-cli");

    assert!(!output.status.success());
}
