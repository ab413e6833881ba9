//! Match state and core simulation types
//!
//! Everything the renderer needs to draw a frame lives here and is
//! serializable, so a snapshot can be handed to the host as-is.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::Rect;
use crate::tuning::Tuning;

/// Court side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Fresh match, waiting for the first start
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Paused by the player
    Paused,
    /// Ball recentred after a point, waiting for the serve timer
    PointScored,
    /// A side reached the winning score
    Finished,
}

/// Court dimensions in abstract units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourtSize {
    pub width: f32,
    pub height: f32,
}

impl CourtSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both dimensions strictly positive
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

impl Default for CourtSize {
    fn default() -> Self {
        use crate::consts::{DEFAULT_COURT_HEIGHT, DEFAULT_COURT_WIDTH};
        Self::new(DEFAULT_COURT_WIDTH, DEFAULT_COURT_HEIGHT)
    }
}

/// One cat paddle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PaddleState {
    /// Distance from the top of the court to the top of the paddle
    pub offset: f32,
}

impl PaddleState {
    /// Paddle centred vertically
    pub fn centered(court: CourtSize, tuning: &Tuning) -> Self {
        Self {
            offset: (court.height - tuning.paddle_height) / 2.0,
        }
    }

    /// Lowest legal offset for the given court
    #[inline]
    pub fn max_offset(court: CourtSize, tuning: &Tuning) -> f32 {
        (court.height - tuning.paddle_height).max(0.0)
    }

    /// Move up by `step`, stopping at the top wall
    pub fn move_up(&mut self, step: f32) {
        self.offset = (self.offset - step).max(0.0);
    }

    /// Move down by `step`, stopping at the bottom wall
    pub fn move_down(&mut self, step: f32, max_offset: f32) {
        self.offset = (self.offset + step).min(max_offset);
    }

    pub fn clamp(&mut self, max_offset: f32) {
        self.offset = self.offset.clamp(0.0, max_offset);
    }

    /// Collision box for the paddle on `side`
    pub fn rect(&self, side: Side, court: CourtSize, tuning: &Tuning) -> Rect {
        let x = match side {
            Side::Left => tuning.paddle_inset,
            Side::Right => court.width - tuning.paddle_inset - tuning.paddle_width,
        };
        Rect::new(x, self.offset, tuning.paddle_width, tuning.paddle_height)
    }
}

/// The planet
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BallState {
    /// Top-left corner of the bounding box
    pub position: Vec2,
    /// Units per tick
    pub velocity: Vec2,
}

impl BallState {
    /// Top-left position that centres the ball in the court
    pub fn center_position(court: CourtSize, tuning: &Tuning) -> Vec2 {
        Vec2::new(
            (court.width - tuning.ball_size) / 2.0,
            (court.height - tuning.ball_size) / 2.0,
        )
    }

    pub fn rect(&self, tuning: &Tuning) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            tuning.ball_size,
            tuning.ball_size,
        )
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Scores, winner and phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchState {
    pub left_score: u32,
    pub right_score: u32,
    /// Only set once `phase == Finished`
    pub winner: Option<Side>,
    pub phase: GamePhase,
}

impl MatchState {
    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left_score,
            Side::Right => self.right_score,
        }
    }

    /// Add a point and return the new score for that side
    pub fn award_point(&mut self, side: Side) -> u32 {
        let score = match side {
            Side::Left => &mut self.left_score,
            Side::Right => &mut self.right_score,
        };
        *score += 1;
        *score
    }

    /// Combined score of both sides (what the high score tracks)
    pub fn total(&self) -> u32 {
        self.left_score + self.right_score
    }
}

/// Notable outcome of a tick, for the match loop and the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// `scorer` won the point; the ball is recentred and waiting to serve
    PointScored { scorer: Side },
    /// `winner` reached the winning score
    MatchWon { winner: Side },
}

/// Complete simulation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub court: CourtSize,
    pub left: PaddleState,
    pub right: PaddleState,
    pub ball: BallState,
    pub score: MatchState,
    /// Ticks advanced since the match was initialized
    pub time_ticks: u64,
}

impl GameState {
    /// Fresh match: paddles and ball centred, ball at rest, scores zeroed
    pub fn new(court: CourtSize, tuning: &Tuning) -> Self {
        Self {
            court,
            left: PaddleState::centered(court, tuning),
            right: PaddleState::centered(court, tuning),
            ball: BallState {
                position: BallState::center_position(court, tuning),
                velocity: Vec2::ZERO,
            },
            score: MatchState::default(),
            time_ticks: 0,
        }
    }

    pub fn paddle(&self, side: Side) -> &PaddleState {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut PaddleState {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.score.phase
    }

    /// Put the ball back in the middle of the court
    pub fn recenter_ball(&mut self, tuning: &Tuning) {
        self.ball.position = BallState::center_position(self.court, tuning);
    }

    /// Rescale positions to a new court size
    ///
    /// Positions keep their proportion of the court (`new = old * new_dim /
    /// old_dim`); paddles are then clamped to the new bounds. Invalid sizes on
    /// either side are ignored.
    pub fn rescale(&mut self, court: CourtSize, tuning: &Tuning) {
        if !court.is_valid() || !self.court.is_valid() {
            return;
        }
        let width_ratio = court.width / self.court.width;
        let height_ratio = court.height / self.court.height;

        self.court = court;
        let max_offset = PaddleState::max_offset(court, tuning);
        for paddle in [&mut self.left, &mut self.right] {
            paddle.offset *= height_ratio;
            paddle.clamp(max_offset);
        }
        self.ball.position.x *= width_ratio;
        self.ball.position.y *= height_ratio;
    }
}
