//! Match loop
//!
//! `Game` owns the simulation state and everything around it: the seeded RNG,
//! the injected store and clock, the serve timer and the persisted
//! preferences. The host calls `on_frame` when the clock's frame fires and
//! `on_timer` when a timer fires; `Game` only requests the next frame while
//! the match is running.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::highscores::HighScore;
use crate::persistence::KvStore;
use crate::platform::{Clock, TimerId};
use crate::settings::{Settings, SpeedSetting};
use crate::sim::{
    BallState, CourtSize, GameEvent, GamePhase, GameState, MatchState, PaddleState, TickInput,
    advance, initial_velocity,
};
use crate::tuning::{Tuning, TuningError};

/// Read-only view of a match for rendering and UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub court: CourtSize,
    pub left: PaddleState,
    pub right: PaddleState,
    pub ball: BallState,
    pub score: MatchState,
    pub speed: SpeedSetting,
    pub high_score: u32,
}

/// Game instance holding all match state
pub struct Game<S: KvStore, C: Clock> {
    tuning: Tuning,
    state: GameState,
    settings: Settings,
    high_score: HighScore,
    rng: Pcg32,
    store: S,
    clock: C,
    /// Pending post-point serve
    serve_timer: Option<TimerId>,
    frame_requested: bool,
}

impl<S: KvStore, C: Clock> Game<S, C> {
    /// Create a game and initialize a fresh match (phase `Idle`)
    ///
    /// Settings and the high score are read from `store`.
    pub fn new(
        tuning: Tuning,
        court: CourtSize,
        store: S,
        clock: C,
        seed: u64,
    ) -> Result<Self, TuningError> {
        tuning.validate(court.height)?;

        let settings = Settings::load(&store);
        let high_score = HighScore::load(&store);
        let mut game = Self {
            state: GameState::new(court, &tuning),
            tuning,
            settings,
            high_score,
            rng: Pcg32::seed_from_u64(seed),
            store,
            clock,
            serve_timer: None,
            frame_requested: false,
        };
        game.initialize_game();
        log::info!("Game created with seed {seed}");
        Ok(game)
    }

    /// Start a fresh match: everything centred, scores zeroed, random serve
    pub fn initialize_game(&mut self) {
        self.stop_frames();
        self.cancel_serve();

        let court = self.state.court;
        self.state = GameState::new(court, &self.tuning);
        let speed = self.serve_speed();
        self.state.ball.velocity = initial_velocity(&mut self.rng, speed);
        log::info!(
            "Match initialized on {}x{} court ({} speed)",
            court.width,
            court.height,
            self.settings.speed.as_str()
        );
    }

    /// Abandon the current match and start over (phase `Idle`)
    pub fn reset(&mut self) {
        self.initialize_game();
    }

    /// Begin or resume play
    ///
    /// Returns true if the match is now running.
    pub fn start(&mut self) -> bool {
        match self.state.phase() {
            GamePhase::Idle | GamePhase::Paused => {
                self.state.score.phase = GamePhase::Running;
                self.request_frame();
                true
            }
            GamePhase::Running => true,
            GamePhase::PointScored | GamePhase::Finished => false,
        }
    }

    /// Pause play; a pending serve is cancelled and resumes straight into play
    pub fn pause(&mut self) {
        match self.state.phase() {
            GamePhase::Running => {
                self.stop_frames();
                self.state.score.phase = GamePhase::Paused;
            }
            GamePhase::PointScored => {
                self.cancel_serve();
                self.state.score.phase = GamePhase::Paused;
            }
            _ => {}
        }
    }

    /// Space bar behaviour; ignored once the match is finished
    pub fn toggle_pause(&mut self) {
        match self.state.phase() {
            GamePhase::Running | GamePhase::PointScored => self.pause(),
            GamePhase::Idle | GamePhase::Paused => {
                self.start();
            }
            GamePhase::Finished => {}
        }
    }

    /// Run one frame
    ///
    /// Call when the frame requested from the clock fires. Frames arriving
    /// while the match is not running are ignored.
    pub fn on_frame(&mut self, input: &TickInput) -> Option<GameEvent> {
        self.frame_requested = false;
        let event = advance(
            &mut self.state,
            input,
            &self.tuning,
            self.settings.speed,
            &mut self.rng,
        );

        match event {
            Some(GameEvent::PointScored { scorer }) => {
                log::info!(
                    "{} scores ({} - {})",
                    scorer.as_str(),
                    self.state.score.left_score,
                    self.state.score.right_score
                );
                self.cancel_serve();
                self.serve_timer = Some(self.clock.schedule_timer(self.tuning.serve_delay_ms));
            }
            Some(GameEvent::MatchWon { winner }) => {
                log::info!(
                    "{} wins {} - {}",
                    winner.as_str(),
                    self.state.score.left_score,
                    self.state.score.right_score
                );
                self.high_score
                    .record(self.state.score.total(), &mut self.store);
            }
            None => {}
        }

        if self.state.phase() == GamePhase::Running {
            self.request_frame();
        }
        event
    }

    /// Handle a fired timer
    ///
    /// Returns true if it was the pending serve and play resumed. Stale
    /// timers (from before a reset or pause) are ignored.
    pub fn on_timer(&mut self, id: TimerId) -> bool {
        if self.serve_timer != Some(id) {
            return false;
        }
        self.serve_timer = None;
        if self.state.phase() != GamePhase::PointScored {
            return false;
        }
        self.state.score.phase = GamePhase::Running;
        self.request_frame();
        true
    }

    /// Court geometry changed; positions are rescaled immediately
    pub fn resize(&mut self, court: CourtSize) {
        if !court.is_valid() {
            log::warn!("Ignoring resize to {}x{}", court.width, court.height);
            return;
        }
        self.state.rescale(court, &self.tuning);
    }

    /// Change and persist the speed preset
    ///
    /// While the match is not running, the waiting ball is sped up or slowed
    /// down to the new serve speed.
    pub fn set_speed(&mut self, speed: SpeedSetting) {
        if self.settings.speed == speed {
            return;
        }
        self.settings.speed = speed;
        self.settings.save(&mut self.store);

        if self.state.phase() != GamePhase::Running {
            let current = self.state.ball.speed();
            if current > 0.0 {
                let ratio = self.serve_speed() / current;
                self.state.ball.velocity *= ratio;
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            court: self.state.court,
            left: self.state.left,
            right: self.state.right,
            ball: self.state.ball,
            score: self.state.score,
            speed: self.settings.speed,
            high_score: self.high_score.value,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    /// Current ball velocity (units per tick)
    pub fn ball_velocity(&self) -> Vec2 {
        self.state.ball.velocity
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.value
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Whether a frame request is outstanding
    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// Serve speed for the active preset
    fn serve_speed(&self) -> f32 {
        self.settings.speed.ball_speed(&self.tuning)
    }

    fn request_frame(&mut self) {
        if !self.frame_requested {
            self.clock.request_frame();
            self.frame_requested = true;
        }
    }

    fn stop_frames(&mut self) {
        if self.frame_requested {
            self.clock.cancel_frame();
            self.frame_requested = false;
        }
    }

    fn cancel_serve(&mut self) {
        if let Some(id) = self.serve_timer.take() {
            self.clock.cancel_timer(id);
        }
    }
}
