//! Per-frame simulation tick
//!
//! Advances the match by one frame. Steps run in a fixed order every tick:
//! paddles, ball integration, walls, paddles vs ball, scoring. Scoring reads
//! the post-collision position, so the order must not change.

use glam::Vec2;
use rand::Rng;

use super::physics::{calculate_bounce, check_collision, paddle_normal, serve_velocity};
use super::state::{GameEvent, GamePhase, GameState, PaddleState, Side};
use crate::settings::SpeedSetting;
use crate::tuning::Tuning;

/// Paddle intents for a single tick
///
/// Built once per frame by the host from whatever input it has (see
/// `crate::input::KeyboardState`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left_up: bool,
    pub left_down: bool,
    pub right_up: bool,
    pub right_down: bool,
}

impl TickInput {
    fn intents(&self, side: Side) -> (bool, bool) {
        match side {
            Side::Left => (self.left_up, self.left_down),
            Side::Right => (self.right_up, self.right_down),
        }
    }
}

/// Advance the match by one tick
///
/// Does nothing unless the phase is `Running`. Returns the scoring event, if
/// the tick produced one; the caller owns the serve timer and high score.
pub fn advance<R: Rng>(
    state: &mut GameState,
    input: &TickInput,
    tuning: &Tuning,
    speed: SpeedSetting,
    rng: &mut R,
) -> Option<GameEvent> {
    if state.phase() != GamePhase::Running {
        return None;
    }
    state.time_ticks += 1;

    move_paddles(state, input, tuning);

    // Explicit Euler, no sub-stepping: a fast ball can tunnel through a paddle
    state.ball.position += state.ball.velocity;

    bounce_off_walls(state, tuning);

    // Both paddles test against the direction the ball had coming in
    let incoming = state.ball.velocity;
    for side in [Side::Left, Side::Right] {
        bounce_off_paddle(state, side, incoming, tuning, speed);
    }

    check_scoring(state, tuning, speed, rng)
}

/// Up is applied before down, each clamped; holding both cancels out
fn move_paddles(state: &mut GameState, input: &TickInput, tuning: &Tuning) {
    let max_offset = PaddleState::max_offset(state.court, tuning);
    for side in [Side::Left, Side::Right] {
        let (up, down) = input.intents(side);
        let paddle = state.paddle_mut(side);
        if up {
            paddle.move_up(tuning.paddle_speed);
        }
        if down {
            paddle.move_down(tuning.paddle_speed, max_offset);
        }
    }
}

/// Elastic bounce off top and bottom; no position correction
fn bounce_off_walls(state: &mut GameState, tuning: &Tuning) {
    let y = state.ball.position.y;
    if y <= 0.0 || y + tuning.ball_size >= state.court.height {
        state.ball.velocity.y = -state.ball.velocity.y;
    }
}

fn bounce_off_paddle(
    state: &mut GameState,
    side: Side,
    incoming: Vec2,
    tuning: &Tuning,
    speed: SpeedSetting,
) {
    // Only a ball heading toward the paddle can hit it, so a ball still
    // overlapping after a bounce is not bounced back again
    let approaching = match side {
        Side::Left => incoming.x < 0.0,
        Side::Right => incoming.x > 0.0,
    };
    if !approaching {
        return;
    }

    let ball = state.ball.rect(tuning);
    let paddle = state.paddle(side).rect(side, state.court, tuning);
    if !check_collision(&ball, &paddle) {
        return;
    }

    let hit_position = ball.center_y() - paddle.center_y();
    let normalized_hit = hit_position / (tuning.paddle_height / 2.0);
    state.ball.velocity = calculate_bounce(
        state.ball.velocity,
        paddle_normal(side, normalized_hit),
        speed.bounce_increase(),
        tuning.max_ball_speed,
    );
    log::debug!(
        "{} paddle hit at {:.2}, speed now {:.2}",
        side.as_str(),
        normalized_hit,
        state.ball.speed()
    );
}

fn check_scoring<R: Rng>(
    state: &mut GameState,
    tuning: &Tuning,
    speed: SpeedSetting,
    rng: &mut R,
) -> Option<GameEvent> {
    let x = state.ball.position.x;
    let scorer = if x < 0.0 {
        Side::Right
    } else if x + tuning.ball_size > state.court.width {
        Side::Left
    } else {
        return None;
    };

    let new_score = state.score.award_point(scorer);
    state.recenter_ball(tuning);

    if new_score >= tuning.winning_score {
        state.score.phase = GamePhase::Finished;
        state.score.winner = Some(scorer);
        state.ball.velocity = Vec2::ZERO;
        return Some(GameEvent::MatchWon { winner: scorer });
    }

    let direction = match scorer {
        Side::Left => -1.0,
        Side::Right => 1.0,
    };
    state.ball.velocity = serve_velocity(rng, speed.ball_speed(tuning), direction);
    state.score.phase = GamePhase::PointScored;
    Some(GameEvent::PointScored { scorer })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::CourtSize;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn running_state() -> (GameState, Tuning) {
        let tuning = Tuning::default();
        let mut state = GameState::new(CourtSize::new(800.0, 600.0), &tuning);
        state.score.phase = GamePhase::Running;
        (state, tuning)
    }

    fn step(state: &mut GameState, tuning: &Tuning, input: &TickInput) -> Option<GameEvent> {
        let mut rng = Pcg32::seed_from_u64(12345);
        advance(state, input, tuning, SpeedSetting::Normal, &mut rng)
    }

    #[test]
    fn test_no_tick_unless_running() {
        let (mut state, tuning) = running_state();
        state.ball.velocity = Vec2::new(3.0, 0.0);
        for phase in [
            GamePhase::Idle,
            GamePhase::Paused,
            GamePhase::PointScored,
            GamePhase::Finished,
        ] {
            state.score.phase = phase;
            let before = state.clone();
            assert_eq!(step(&mut state, &tuning, &TickInput::default()), None);
            assert_eq!(state, before);
        }
    }

    #[test]
    fn test_paddles_follow_intents() {
        let (mut state, tuning) = running_state();
        let input = TickInput {
            left_up: true,
            right_down: true,
            ..Default::default()
        };
        step(&mut state, &tuning, &input);
        assert_eq!(state.left.offset, 240.0);
        assert_eq!(state.right.offset, 260.0);
    }

    #[test]
    fn test_paddles_clamp_at_walls() {
        let (mut state, tuning) = running_state();
        state.left.offset = 4.0;
        state.right.offset = 497.0;
        let input = TickInput {
            left_up: true,
            right_down: true,
            ..Default::default()
        };
        step(&mut state, &tuning, &input);
        assert_eq!(state.left.offset, 0.0);
        assert_eq!(state.right.offset, 500.0);
    }

    #[test]
    fn test_both_intents_apply_up_then_down() {
        let (mut state, tuning) = running_state();
        let both = TickInput {
            left_up: true,
            left_down: true,
            ..Default::default()
        };
        step(&mut state, &tuning, &both);
        assert_eq!(state.left.offset, 250.0);

        // At the top the up step is clamped away, so down wins
        state.left.offset = 0.0;
        step(&mut state, &tuning, &both);
        assert_eq!(state.left.offset, 10.0);
    }

    #[test]
    fn test_ball_integrates_velocity() {
        let (mut state, tuning) = running_state();
        state.ball.velocity = Vec2::new(2.0, -1.5);
        step(&mut state, &tuning, &TickInput::default());
        assert_eq!(state.ball.position, Vec2::new(382.0, 278.5));
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_top_wall_inverts_vertical_velocity() {
        let (mut state, tuning) = running_state();
        state.ball.position = Vec2::new(400.0, 2.0);
        state.ball.velocity = Vec2::new(1.0, -3.0);
        step(&mut state, &tuning, &TickInput::default());
        assert_eq!(state.ball.velocity, Vec2::new(1.0, 3.0));
        // No position correction
        assert_eq!(state.ball.position.y, -1.0);
    }

    #[test]
    fn test_bottom_wall_inverts_vertical_velocity() {
        let (mut state, tuning) = running_state();
        state.ball.position = Vec2::new(400.0, 557.0);
        state.ball.velocity = Vec2::new(1.0, 3.0);
        step(&mut state, &tuning, &TickInput::default());
        assert_eq!(state.ball.velocity.y, -3.0);
    }

    #[test]
    fn test_left_paddle_dead_center_hit() {
        let (mut state, tuning) = running_state();
        // Paddle spans y 250..350 (center 300), x 10..60
        state.ball.position = Vec2::new(64.0, 280.0);
        state.ball.velocity = Vec2::new(-5.0, 0.0);
        step(&mut state, &tuning, &TickInput::default());
        assert!(state.ball.velocity.x > 0.0);
        assert_eq!(state.ball.velocity.y, 0.0);
        assert!((state.ball.velocity.x - 5.0 * SpeedSetting::Normal.bounce_increase()).abs() < 1e-4);
    }

    #[test]
    fn test_right_paddle_upper_edge_hit_deflects_up() {
        let (mut state, tuning) = running_state();
        // Right paddle x 740..790; ball center ends near the top of the paddle
        state.ball.position = Vec2::new(697.0, 215.0);
        state.ball.velocity = Vec2::new(5.0, 0.0);
        step(&mut state, &tuning, &TickInput::default());
        assert!(state.ball.velocity.x < 0.0);
        assert!(state.ball.velocity.y < 0.0);
    }

    #[test]
    fn test_receding_ball_is_not_rebounced() {
        let (mut state, tuning) = running_state();
        // Overlapping the left paddle but already moving away
        state.ball.position = Vec2::new(40.0, 280.0);
        state.ball.velocity = Vec2::new(4.0, 0.0);
        step(&mut state, &tuning, &TickInput::default());
        assert_eq!(state.ball.velocity, Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_overlapping_both_paddles_bounces_once() {
        let tuning = Tuning::default();
        // Left paddle x 10..60, right paddle x 40..90
        let mut state = GameState::new(CourtSize::new(100.0, 600.0), &tuning);
        state.score.phase = GamePhase::Running;
        state.ball.position = Vec2::new(30.0, 280.0);
        state.ball.velocity = Vec2::new(-5.0, 0.0);

        assert_eq!(step(&mut state, &tuning, &TickInput::default()), None);
        // The left bounce stands; the right paddle saw a ball moving away
        let expected = 5.0 * SpeedSetting::Normal.bounce_increase();
        assert!((state.ball.velocity.x - expected).abs() < 1e-4);
        assert_eq!(state.ball.velocity.y, 0.0);
    }

    #[test]
    fn test_ball_out_left_scores_right() {
        let (mut state, tuning) = running_state();
        state.score.left_score = 3;
        // Far from the paddle vertically so nothing deflects it
        state.ball.position = Vec2::new(0.0, 20.0);
        state.ball.velocity = Vec2::new(-1.0, 0.0);

        let event = step(&mut state, &tuning, &TickInput::default());
        assert_eq!(event, Some(GameEvent::PointScored { scorer: Side::Right }));
        assert_eq!(state.score.right_score, 1);
        assert_eq!(state.score.left_score, 3);
        assert_eq!(state.phase(), GamePhase::PointScored);
        assert_eq!(state.ball.position, Vec2::new(380.0, 280.0));
        // Serve heads right after a right-side point
        assert!(state.ball.velocity.x > 0.0);
    }

    #[test]
    fn test_ball_out_right_scores_left_and_serves_left() {
        let (mut state, tuning) = running_state();
        state.ball.position = Vec2::new(759.0, 20.0);
        state.ball.velocity = Vec2::new(2.0, 0.0);

        let event = step(&mut state, &tuning, &TickInput::default());
        assert_eq!(event, Some(GameEvent::PointScored { scorer: Side::Left }));
        assert_eq!(state.score.left_score, 1);
        assert!(state.ball.velocity.x < 0.0);
        let speed = SpeedSetting::Normal.ball_speed(&tuning);
        assert!((state.ball.speed() - speed).abs() < 1e-4);
    }

    #[test]
    fn test_winning_point_finishes_match() {
        let (mut state, tuning) = running_state();
        state.score.left_score = 9;
        state.score.right_score = 8;
        state.ball.position = Vec2::new(759.0, 20.0);
        state.ball.velocity = Vec2::new(2.0, 0.0);

        let event = step(&mut state, &tuning, &TickInput::default());
        assert_eq!(event, Some(GameEvent::MatchWon { winner: Side::Left }));
        assert_eq!(state.score.left_score, 10);
        assert_eq!(state.score.winner, Some(Side::Left));
        assert_eq!(state.phase(), GamePhase::Finished);

        // Finished halts further ticks, so the score can't pass the target
        state.ball.position = Vec2::new(790.0, 20.0);
        state.ball.velocity = Vec2::new(2.0, 0.0);
        assert_eq!(step(&mut state, &tuning, &TickInput::default()), None);
        assert_eq!(state.score.left_score, 10);
    }
}
