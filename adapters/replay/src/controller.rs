//! `ReplayController`: a VCR-style state machine that replays a
//! `GameRecording` through a sub-engine.

use match3_core::{Command, CommandKind, SimulationConfig, SpawnModel};
use match3_engine::Engine;

use crate::fingerprint::FingerprintCollector;
use crate::recording::GameRecording;

/// Lifecycle state of a `ReplayController`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayState {
    /// No engine built yet; `current_tick` is 0.
    Stopped,
    /// Advancing on every `tick` call.
    Playing,
    /// Engine exists but is not advancing.
    Paused,
    /// Reached `duration_ticks`; `play` is a no-op until `stop`/`seek`.
    Completed,
    /// Terminal. Every operation after `dispose` is a no-op.
    Disposed,
}

/// Events a `ReplayController` reports to its host.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayEvent {
    /// A recorded command was just executed against the sub-engine.
    CommandExecuted(Command),
    /// Playback reached `duration_ticks`.
    PlaybackCompleted,
}

/// Sink for `ReplayEvent`s, mirroring `match3_core::EventCollector`.
pub trait ReplayEventCollector {
    /// Called once per reported event, in order.
    fn emit(&mut self, event: ReplayEvent);
}

/// Discards every event.
pub struct NullReplayCollector;

impl ReplayEventCollector for NullReplayCollector {
    fn emit(&mut self, _event: ReplayEvent) {}
}

/// Drives a sub-engine through a recording's command stream, exposing
/// VCR-style transport controls.
pub struct ReplayController {
    recording: GameRecording,
    sim_config: SimulationConfig,
    spawn_model_template: Box<dyn SpawnModel>,
    events: Box<dyn ReplayEventCollector>,
    engine: Option<Engine>,
    state: ReplayState,
    current_tick: u64,
    next_command_index: usize,
    playback_speed: f32,
    fingerprint: FingerprintCollector,
}

impl ReplayController {
    /// Builds a controller in the `Stopped` state. `spawn_model` is
    /// cloned (via `SpawnModel::clone_box`) each time an engine is
    /// (re)built from the recording's initial snapshot.
    pub fn new(
        recording: GameRecording,
        sim_config: SimulationConfig,
        spawn_model: Box<dyn SpawnModel>,
        events: Box<dyn ReplayEventCollector>,
    ) -> Self {
        Self {
            recording,
            sim_config,
            spawn_model_template: spawn_model,
            events,
            engine: None,
            state: ReplayState::Stopped,
            current_tick: 0,
            next_command_index: 0,
            playback_speed: 1.0,
            fingerprint: FingerprintCollector::new(),
        }
    }

    /// A deterministic hash of every engine event emitted since the
    /// sub-engine was last (re)built from the initial snapshot. Two
    /// controllers replaying the same recording to the same tick
    /// produce the same fingerprint.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint.value()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ReplayState {
        self.state
    }

    /// Tick the controller has reached.
    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Playback speed multiplier applied to `tick`'s delta time.
    pub fn playback_speed(&self) -> f32 {
        self.playback_speed
    }

    /// Sets the playback speed multiplier. Negative values clamp to 0.
    pub fn set_playback_speed(&mut self, speed: f32) {
        self.playback_speed = speed.max(0.0);
    }

    /// Playback position in `[0, 1]`. 0 when `duration_ticks` is 0.
    pub fn progress(&self) -> f32 {
        if self.recording.duration_ticks == 0 {
            return 0.0;
        }
        ((self.current_tick as f64 / f64::from(self.recording.duration_ticks)) as f32).clamp(0.0, 1.0)
    }

    /// Read-only access to the underlying sub-engine, if one has been
    /// built (i.e. the controller is not `Stopped` or `Disposed`).
    pub fn engine(&self) -> Option<&Engine> {
        self.engine.as_ref()
    }

    fn build_engine_at_snapshot(&mut self) {
        let level = self.recording.initial_snapshot.level.clone();
        let state = self.recording.initial_snapshot.state.clone();
        self.fingerprint = FingerprintCollector::new();
        self.engine = Some(Engine::from_state(
            &level,
            state,
            self.sim_config,
            self.spawn_model_template.clone_box(),
            Box::new(self.fingerprint.clone()),
        ));
        self.current_tick = 0;
        self.next_command_index = 0;
    }

    /// Stopped builds an engine and starts playing; Paused resumes;
    /// Playing and Completed are no-ops.
    pub fn play(&mut self) {
        match self.state {
            ReplayState::Stopped => {
                self.build_engine_at_snapshot();
                self.state = ReplayState::Playing;
            }
            ReplayState::Paused => self.state = ReplayState::Playing,
            ReplayState::Playing | ReplayState::Completed | ReplayState::Disposed => {}
        }
    }

    /// Playing moves to Paused; otherwise a no-op.
    pub fn pause(&mut self) {
        if self.state == ReplayState::Playing {
            self.state = ReplayState::Paused;
        }
    }

    /// Swaps between Playing and Paused.
    pub fn toggle_pause(&mut self) {
        match self.state {
            ReplayState::Playing => self.pause(),
            ReplayState::Paused => self.play(),
            ReplayState::Stopped | ReplayState::Completed | ReplayState::Disposed => {}
        }
    }

    /// Disposes the engine and resets playback position to 0.
    pub fn stop(&mut self) {
        if self.state == ReplayState::Disposed {
            return;
        }
        self.engine = None;
        self.current_tick = 0;
        self.next_command_index = 0;
        self.state = ReplayState::Stopped;
    }

    /// Terminal shutdown. Every later call on this controller is a
    /// no-op.
    pub fn dispose(&mut self) {
        self.engine = None;
        self.state = ReplayState::Disposed;
    }

    /// Advances playback by `delta_time_seconds` of wall-clock time,
    /// scaled by `playback_speed` and the simulation's tick rate. A
    /// no-op unless `state` is `Playing`.
    pub fn tick(&mut self, delta_time_seconds: f32) {
        if self.state != ReplayState::Playing {
            return;
        }
        let exact_ticks = self.playback_speed * delta_time_seconds * self.sim_config.tick_rate_hz;
        let ticks_to_run = exact_ticks.round().max(0.0) as u64;
        for _ in 0..ticks_to_run {
            self.advance_one_tick();
            if self.state != ReplayState::Playing {
                break;
            }
        }
    }

    fn advance_one_tick(&mut self) {
        self.execute_due_commands();
        if let Some(engine) = self.engine.as_mut() {
            let _ = engine.tick(1.0 / self.sim_config.tick_rate_hz);
        }
        self.current_tick += 1;
        if self.current_tick >= u64::from(self.recording.duration_ticks) {
            self.events.emit(ReplayEvent::PlaybackCompleted);
            self.state = ReplayState::Completed;
        }
    }

    fn execute_due_commands(&mut self) {
        while self.next_command_index < self.recording.commands.len() {
            let command = self.recording.commands[self.next_command_index].clone();
            if command.issued_at_tick > self.current_tick {
                break;
            }
            self.execute_command(&command);
            self.next_command_index += 1;
        }
    }

    fn execute_command(&mut self, command: &Command) {
        if let Some(engine) = self.engine.as_mut() {
            if let CommandKind::Swap { from, to } = command.kind {
                let _ = engine.apply_move(from, to);
            }
        }
        self.events.emit(ReplayEvent::CommandExecuted(command.clone()));
    }

    /// Executes the next unexecuted command, pausing playback and
    /// jumping `current_tick` to that command's `issued_at_tick`. A
    /// no-op once every command has been executed, or after
    /// `Completed`/`Disposed`.
    pub fn step_forward(&mut self) {
        if self.state == ReplayState::Disposed || self.state == ReplayState::Completed {
            return;
        }
        if self.state == ReplayState::Stopped {
            self.build_engine_at_snapshot();
        }
        self.state = ReplayState::Paused;

        if self.next_command_index >= self.recording.commands.len() {
            return;
        }
        let command = self.recording.commands[self.next_command_index].clone();
        self.current_tick = command.issued_at_tick;
        if let Some(engine) = self.engine.as_mut() {
            while engine.current_tick() < self.current_tick {
                let _ = engine.tick(1.0 / self.sim_config.tick_rate_hz);
            }
        }
        self.execute_command(&command);
        self.next_command_index += 1;
    }

    /// Jumps to `progress` (clamped to `[0, 1]`). Rewinding rebuilds
    /// the sub-engine from the initial snapshot and replays every
    /// command up to the target tick; seeking forward continues from
    /// the current engine.
    pub fn seek(&mut self, progress: f32) {
        if self.state == ReplayState::Disposed {
            return;
        }
        let progress = progress.clamp(0.0, 1.0);
        let target_tick = (f64::from(progress) * f64::from(self.recording.duration_ticks)).round() as u64;

        if self.engine.is_none() || target_tick < self.current_tick {
            self.build_engine_at_snapshot();
        }

        let was_playing = self.state == ReplayState::Playing;
        self.state = ReplayState::Paused;

        while self.current_tick < target_tick && self.state != ReplayState::Completed {
            self.advance_one_tick();
        }

        if self.state != ReplayState::Completed && was_playing {
            self.state = ReplayState::Playing;
        }
    }
}
