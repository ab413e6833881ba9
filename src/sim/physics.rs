//! Collision detection and bounce response
//!
//! Everything here is a pure function of its inputs. The serve helpers take
//! the RNG explicitly so a seeded run reproduces the same velocities.

use std::f32::consts::{FRAC_PI_3, FRAC_PI_6, FRAC_PI_8};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Side;
use crate::consts::BOUNCE_TILT;

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Vertical center line
    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// Check whether two rectangles overlap
///
/// Strict comparisons: rectangles sharing only an edge do not collide.
pub fn check_collision(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Bounce a velocity off a (possibly tilted) normal
///
/// The reflection is scaled by `speed_increase` and then capped at
/// `max_speed`, keeping direction. `normal` is not normalized on purpose: the
/// paddle passes a tilted pseudo-normal to steer the ball.
pub fn calculate_bounce(velocity: Vec2, normal: Vec2, speed_increase: f32, max_speed: f32) -> Vec2 {
    let bounced = reflect_velocity(velocity, normal) * speed_increase;
    let speed = bounced.length();
    if speed > max_speed {
        bounced * (max_speed / speed)
    } else {
        bounced
    }
}

/// Tilted normal for a paddle hit
///
/// `normalized_hit` is the ball center's offset from the paddle center in
/// half-paddle units (-1 top edge, 1 bottom edge). The x component points
/// into the court.
pub fn paddle_normal(side: Side, normalized_hit: f32) -> Vec2 {
    let x = match side {
        Side::Left => 1.0,
        Side::Right => -1.0,
    };
    Vec2::new(x, normalized_hit * BOUNCE_TILT)
}

/// Random opening velocity
///
/// Angle from horizontal is drawn from [30°, 60°] so the first rally is never
/// nearly flat; both horizontal and vertical directions are coin flips.
pub fn initial_velocity<R: Rng>(rng: &mut R, speed: f32) -> Vec2 {
    let angle = rng.random_range(FRAC_PI_6..=FRAC_PI_3);
    let h_dir = random_sign(rng);
    let v_dir = random_sign(rng);
    Vec2::new(angle.cos() * speed * h_dir, angle.sin() * speed * v_dir)
}

/// Serve velocity after a point
///
/// Angle within ±22.5° of horizontal, heading in `direction` (-1 left, 1 right).
pub fn serve_velocity<R: Rng>(rng: &mut R, speed: f32, direction: f32) -> Vec2 {
    let angle = rng.random_range(-FRAC_PI_8..=FRAC_PI_8);
    let v_dir = random_sign(rng);
    Vec2::new(angle.cos() * speed * direction, angle.sin() * speed * v_dir)
}

fn random_sign<R: Rng>(rng: &mut R) -> f32 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}
