//! Recording and playback of simulation sessions: `GameRecording` is
//! the command-stream format, `ReplayController` is the VCR-style
//! player built around a `match3-engine::Engine`.
#![deny(unsafe_code, missing_docs, unused_results, non_snake_case, unreachable_pub)]

mod controller;
mod fingerprint;
mod recording;

pub use controller::{
    NullReplayCollector, ReplayController, ReplayEvent, ReplayEventCollector, ReplayState,
};
pub use recording::GameRecording;

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use match3_board::GameState;
    use match3_core::{
        BombType, Command, CommandKind, CoverType, GroundType, InitialCell, LevelConfig, Position,
        SimulationConfig, TileType,
    };
    use match3_snapshot::SessionSnapshot;
    use match3_spawn_model::DefaultSpawnModel;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<ReplayEvent>>>);

    impl ReplayEventCollector for Recorder {
        fn emit(&mut self, event: ReplayEvent) {
            self.0.borrow_mut().push(event);
        }
    }

    fn level() -> LevelConfig {
        LevelConfig {
            width: 6,
            height: 6,
            tile_types_count: 6,
            move_limit: 50,
            target_difficulty: 0.5,
            objectives: Vec::new(),
            initial_layout: vec![
                cell(0, 0, TileType::Red),
                cell(1, 0, TileType::Blue),
                cell(2, 2, TileType::Green),
                cell(2, 3, TileType::Yellow),
            ],
            seed: 42,
        }
    }

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

    fn recording() -> GameRecording {
        let level = level();
        let state = GameState::new(&level).expect("valid level");
        let snapshot = SessionSnapshot::capture(level, state);
        let commands = vec![
            Command { id: 1, issued_at_tick: 0, kind: CommandKind::Swap { from: Position::new(0, 0), to: Position::new(1, 0) } },
            Command { id: 2, issued_at_tick: 10, kind: CommandKind::Swap { from: Position::new(2, 2), to: Position::new(2, 3) } },
        ];
        GameRecording::new(snapshot, 42, commands, 60, 0, 2)
    }

    fn controller() -> (ReplayController, Recorder) {
        let recorder = Recorder::default();
        let controller = ReplayController::new(
            recording(),
            SimulationConfig::default(),
            Box::new(DefaultSpawnModel::new()),
            Box::new(recorder.clone()),
        );
        (controller, recorder)
    }

    #[test]
    fn play_from_stopped_builds_engine_and_runs() {
        let (mut controller, _recorder) = controller();
        assert_eq!(controller.state(), ReplayState::Stopped);
        controller.play();
        assert_eq!(controller.state(), ReplayState::Playing);
        assert!(controller.engine().is_some());
    }

    #[test]
    fn tick_executes_due_commands_in_order() {
        let (mut controller, recorder) = controller();
        controller.play();
        for _ in 0..15 {
            controller.tick(1.0 / 60.0);
        }
        let executed: Vec<u64> = recorder
            .0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                ReplayEvent::CommandExecuted(c) => Some(c.id),
                ReplayEvent::PlaybackCompleted => None,
            })
            .collect();
        assert_eq!(executed, vec![1, 2]);
    }

    #[test]
    fn reaching_duration_emits_completed_once() {
        let (mut controller, recorder) = controller();
        controller.play();
        for _ in 0..120 {
            controller.tick(1.0 / 60.0);
        }
        assert_eq!(controller.state(), ReplayState::Completed);
        let completions = recorder
            .0
            .borrow()
            .iter()
            .filter(|e| matches!(e, ReplayEvent::PlaybackCompleted))
            .count();
        assert_eq!(completions, 1);
    }

    #[test]
    fn stop_resets_to_tick_zero() {
        let (mut controller, _recorder) = controller();
        controller.play();
        controller.tick(0.5);
        assert!(controller.current_tick() > 0);
        controller.stop();
        assert_eq!(controller.state(), ReplayState::Stopped);
        assert_eq!(controller.current_tick(), 0);
    }

    #[test]
    fn seek_forward_then_backward_replays_determinstically() {
        let (mut first, _) = controller();
        first.play();
        first.seek(1.0);
        let first_tick = first.current_tick();

        let (mut second, _) = controller();
        second.play();
        for _ in 0..60 {
            second.tick(1.0 / 60.0);
        }
        second.seek(0.2);
        second.seek(1.0);

        assert_eq!(first_tick, second.current_tick());
        assert_eq!(first.state(), ReplayState::Completed);
        assert_eq!(second.state(), ReplayState::Completed);
    }

    #[test]
    fn step_forward_executes_one_command_at_a_time() {
        let (mut controller, recorder) = controller();
        controller.step_forward();
        assert_eq!(controller.state(), ReplayState::Paused);
        assert_eq!(controller.current_tick(), 0);

        controller.step_forward();
        assert_eq!(controller.current_tick(), 10);

        let executed: Vec<u64> = recorder
            .0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                ReplayEvent::CommandExecuted(c) => Some(c.id),
                ReplayEvent::PlaybackCompleted => None,
            })
            .collect();
        assert_eq!(executed, vec![1, 2]);
    }

    #[test]
    fn dispose_is_terminal() {
        let (mut controller, _recorder) = controller();
        controller.play();
        controller.dispose();
        assert_eq!(controller.state(), ReplayState::Disposed);
        controller.play();
        assert_eq!(controller.state(), ReplayState::Disposed);
    }

    #[test]
    fn replaying_a_recording_twice_is_deterministic() {
        fn run_to_completion(recording: GameRecording) -> (i64, usize) {
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
            let score = controller.engine().map(|e| e.state_ref().score()).unwrap_or_default();
            let tick = controller.current_tick() as usize;
            (score, tick)
        }

        let first = run_to_completion(recording());
        let second = run_to_completion(recording());
        assert_eq!(first, second);
    }

    #[test]
    fn replaying_a_recording_twice_yields_identical_fingerprints() {
        fn fingerprint_of(recording: GameRecording) -> u64 {
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
            controller.fingerprint()
        }

        assert_eq!(fingerprint_of(recording()), fingerprint_of(recording()));
    }
}
