//! Match simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One tick per frame, fixed step order
//! - Seeded RNG only, passed in by the caller
//! - No rendering, storage or platform dependencies

pub mod physics;
pub mod state;
pub mod tick;

pub use physics::{
    Rect, calculate_bounce, check_collision, initial_velocity, paddle_normal, reflect_velocity,
    serve_velocity,
};
pub use state::{
    BallState, CourtSize, GameEvent, GamePhase, GameState, MatchState, PaddleState, Side,
};
pub use tick::{TickInput, advance};
