//! Data-driven match configuration
//!
//! Defaults come from `crate::consts`; hosts may override any value as long
//! as it passes `Tuning::validate`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected configuration values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("winning score must be at least 1")]
    ZeroWinningScore,
    #[error("paddle height {paddle} does not fit a court of height {court}")]
    PaddleTallerThanCourt { paddle: f32, court: f32 },
}

/// Match tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub paddle_height: f32,
    pub paddle_width: f32,
    pub paddle_inset: f32,
    pub paddle_speed: f32,
    pub ball_size: f32,
    pub base_ball_speed: f32,
    pub max_ball_speed: f32,
    pub winning_score: u32,
    pub serve_delay_ms: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            paddle_height: PADDLE_HEIGHT,
            paddle_width: PADDLE_WIDTH,
            paddle_inset: PADDLE_INSET,
            paddle_speed: PADDLE_SPEED,
            ball_size: BALL_SIZE,
            base_ball_speed: BALL_BASE_SPEED,
            max_ball_speed: BALL_MAX_SPEED,
            winning_score: WINNING_SCORE,
            serve_delay_ms: SERVE_DELAY_MS,
        }
    }
}

impl Tuning {
    /// Check that the values describe a playable match on a court `court_height` tall
    pub fn validate(&self, court_height: f32) -> Result<(), TuningError> {
        let positive = [
            ("paddle_height", self.paddle_height),
            ("paddle_width", self.paddle_width),
            ("paddle_speed", self.paddle_speed),
            ("ball_size", self.ball_size),
            ("base_ball_speed", self.base_ball_speed),
            ("max_ball_speed", self.max_ball_speed),
        ];
        for (field, value) in positive {
            // Written so NaN fails too
            if !(value > 0.0) {
                return Err(TuningError::NonPositive { field, value });
            }
        }
        if self.winning_score == 0 {
            return Err(TuningError::ZeroWinningScore);
        }
        if self.paddle_height > court_height {
            return Err(TuningError::PaddleTallerThanCourt {
                paddle: self.paddle_height,
                court: court_height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(Tuning::default().validate(DEFAULT_COURT_HEIGHT), Ok(()));
    }

    #[test]
    fn test_zero_paddle_height_rejected() {
        let tuning = Tuning {
            paddle_height: 0.0,
            ..Default::default()
        };
        assert_eq!(
            tuning.validate(600.0),
            Err(TuningError::NonPositive {
                field: "paddle_height",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_nan_rejected() {
        let tuning = Tuning {
            max_ball_speed: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(600.0),
            Err(TuningError::NonPositive {
                field: "max_ball_speed",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_winning_score_rejected() {
        let tuning = Tuning {
            winning_score: 0,
            ..Default::default()
        };
        assert_eq!(tuning.validate(600.0), Err(TuningError::ZeroWinningScore));
    }

    #[test]
    fn test_paddle_must_fit_court() {
        let err = Tuning::default().validate(80.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "paddle height 100 does not fit a court of height 80"
        );
    }

    #[test]
    fn test_roundtrips_through_json() {
        let json = serde_json::to_string(&Tuning::default()).unwrap();
        let back: Tuning = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Tuning::default());
    }
}
