//! Space Cat Pong - two cats bat a planet across the void
//!
//! Core modules:
//! - `sim`: Physics and per-tick match simulation (pure, seeded RNG only)
//! - `game`: Match loop driving the simulation through a `Clock`
//! - `persistence`: Key-value store capability and its backends
//! - `platform`: Frame/timer scheduling abstraction
//! - `settings`: Persisted speed preference
//! - `highscores`: Persisted best combined score
//! - `input`: Held keys to per-tick intents
//! - `tuning`: Data-driven match configuration
//! - `web`: Browser clock, keyboard listeners and the exported `WebGame`
//!   (wasm32 only)

pub mod game;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use game::{Game, Snapshot};
pub use highscores::HighScore;
pub use input::{KeyAction, KeyboardState};
pub use persistence::{KvStore, MemoryStore, StoreError};
pub use platform::{Clock, TimerBook, TimerId, VirtualClock};
pub use settings::{Settings, SpeedSetting};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Paddle (cat) dimensions
    pub const PADDLE_HEIGHT: f32 = 100.0;
    pub const PADDLE_WIDTH: f32 = 50.0;
    /// Gap between a paddle and its edge of the court
    pub const PADDLE_INSET: f32 = 10.0;
    /// Paddle travel per tick while a key is held
    pub const PADDLE_SPEED: f32 = 10.0;

    /// Ball (planet) bounding box edge length
    pub const BALL_SIZE: f32 = 40.0;
    /// Serve speed before the speed multiplier (units/tick)
    pub const BALL_BASE_SPEED: f32 = 3.0;
    /// Speed cap applied after every paddle bounce (units/tick)
    pub const BALL_MAX_SPEED: f32 = 12.0;

    /// First side to reach this wins
    pub const WINNING_SCORE: u32 = 10;
    /// Pause between a point and the next serve
    pub const SERVE_DELAY_MS: u32 = 1000;

    /// Court size used until the host reports a real one
    pub const DEFAULT_COURT_WIDTH: f32 = 800.0;
    pub const DEFAULT_COURT_HEIGHT: f32 = 600.0;

    /// Tilt applied to the paddle normal per unit of normalized hit offset
    pub const BOUNCE_TILT: f32 = 0.5;
}
