//! Ball entity: one disc on the table
//!
//! A single record for every ball; cue-only behavior (hit, reset) is
//! dispatched on `BallKind` instead of living in a separate type.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::table::{Pocket, Rect};
use crate::consts::*;
use crate::polar_to_cartesian;

/// Object ball group a player must clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Solid,
    Stripe,
}

impl Suit {
    pub fn opposite(self) -> Self {
        match self {
            Suit::Solid => Suit::Stripe,
            Suit::Stripe => Suit::Solid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Suit::Solid => "solids",
            Suit::Stripe => "stripes",
        }
    }
}

/// Ball type, derived from the ball number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallKind {
    Cue,
    Eight,
    Solid,
    Stripe,
}

impl BallKind {
    /// 0 = cue, 8 = eight, 1-7 = solid, 9-15 = stripe
    pub fn from_number(number: u8) -> Self {
        match number {
            0 => BallKind::Cue,
            8 => BallKind::Eight,
            1..=7 => BallKind::Solid,
            _ => BallKind::Stripe,
        }
    }

    /// Suit of an object ball (None for cue and eight)
    pub fn suit(&self) -> Option<Suit> {
        match self {
            BallKind::Solid => Some(Suit::Solid),
            BallKind::Stripe => Some(Suit::Stripe),
            BallKind::Cue | BallKind::Eight => None,
        }
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub number: u8,
    pub kind: BallKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Velocity retained per frame
    pub friction: f32,
    /// Potted balls are skipped by integration, collision and rendering
    pub potted: bool,
    /// Where the ball was racked (cue ball resets here)
    pub spawn: Vec2,
}

impl Ball {
    pub fn new(number: u8, pos: Vec2) -> Self {
        Self {
            number,
            kind: BallKind::from_number(number),
            pos,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            friction: BALL_FRICTION,
            potted: false,
            spawn: pos,
        }
    }

    pub fn is_cue(&self) -> bool {
        self.kind == BallKind::Cue
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// True while the ball is on the table and has non-zero velocity
    pub fn is_moving(&self) -> bool {
        !self.potted && self.vel != Vec2::ZERO
    }

    /// Move by a fraction of one frame's velocity
    pub fn advance(&mut self, dt_fraction: f32) {
        if self.potted {
            return;
        }
        self.pos += self.vel * dt_fraction;
    }

    /// Decay velocity, snapping to rest below `rest_speed`
    ///
    /// `exponent` is the number of frames the decay covers (1.0 for a full
    /// frame, 1/N when applied per sub-step).
    pub fn apply_friction(&mut self, exponent: f32, rest_speed: f32) {
        if self.potted {
            return;
        }
        if self.vel.length() < rest_speed {
            self.vel = Vec2::ZERO;
        } else {
            self.vel *= self.friction.powf(exponent);
        }
    }

    /// Single full-frame update without sub-stepping
    pub fn update(&mut self) {
        self.advance(1.0);
        self.apply_friction(1.0, REST_SPEED);
    }

    /// Clamp the ball inside `bounds`, inverting and damping the velocity
    /// component of each axis it crossed. Returns whether any cushion was hit.
    pub fn check_wall_collision(&mut self, bounds: &Rect, restitution: f32) -> bool {
        if self.potted {
            return false;
        }

        let mut collided = false;
        if self.pos.x - self.radius < bounds.left {
            self.pos.x = bounds.left + self.radius;
            self.vel.x *= -restitution;
            collided = true;
        } else if self.pos.x + self.radius > bounds.right {
            self.pos.x = bounds.right - self.radius;
            self.vel.x *= -restitution;
            collided = true;
        }

        if self.pos.y - self.radius < bounds.top {
            self.pos.y = bounds.top + self.radius;
            self.vel.y *= -restitution;
            collided = true;
        } else if self.pos.y + self.radius > bounds.bottom {
            self.pos.y = bounds.bottom - self.radius;
            self.vel.y *= -restitution;
            collided = true;
        }

        collided
    }

    /// Pot the ball if its center lies inside a pocket. The first pocket in
    /// list order wins; returns its index.
    pub fn check_pocket_collision(&mut self, pockets: &[Pocket]) -> Option<usize> {
        if self.potted {
            return None;
        }
        let index = pockets.iter().position(|p| p.captures(self.pos))?;
        self.potted = true;
        self.vel = Vec2::ZERO;
        Some(index)
    }

    /// Add a cue impulse. Callers clamp `force`; only the cue ball accepts hits.
    pub fn hit(&mut self, force: f32, angle: f32) -> bool {
        match self.kind {
            BallKind::Cue => {
                self.vel += polar_to_cartesian(force, angle);
                true
            }
            _ => {
                log::warn!("Ignoring hit on object ball {}", self.number);
                false
            }
        }
    }

    /// Return the cue ball to its break position at rest
    pub fn reset(&mut self) -> bool {
        match self.kind {
            BallKind::Cue => {
                self.pos = self.spawn;
                self.vel = Vec2::ZERO;
                self.potted = false;
                true
            }
            _ => {
                log::warn!("Object ball {} cannot be reset", self.number);
                false
            }
        }
    }
}
