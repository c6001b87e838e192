//! Cue aiming and power controller
//!
//! `Aiming` tracks the pointer around the cue ball. A primary press starts
//! `Charging`: the aim locks and power follows how far the pointer has been
//! dragged from where the press happened. A second primary press fires, a
//! secondary press cancels. Power is zero whenever the cue is aiming.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use crate::consts::*;
use crate::normalize_angle;

/// Cue controller state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CueState {
    Aiming,
    /// Power is being charged; `anchor` is the pointer position at the press
    Charging { anchor: Vec2 },
}

/// A fired shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    /// Cue power at release, in `[MIN_CHARGE_POWER, max_power]`
    pub power: f32,
    /// Impulse applied to the cue ball
    pub force: f32,
    pub angle: f32,
}

/// The cue stick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cue {
    /// Aim direction (radians, from cue ball toward the pointer)
    pub angle: f32,
    pub power: f32,
    pub state: CueState,
    /// Higher sensitivity builds power over a shorter drag
    pub sensitivity: f32,
    pub max_power: f32,
    /// Drag distance absorbed before power builds
    pub dead_zone: f32,
    /// Drag distance per unit of power at sensitivity 1.0
    pub base_scale: f32,
    /// Power to impulse conversion
    pub shot_scale: f32,
}

impl Default for Cue {
    fn default() -> Self {
        Self::new(1.0, MAX_POWER)
    }
}

impl Cue {
    pub fn new(sensitivity: f32, max_power: f32) -> Self {
        let mut cue = Self {
            angle: 0.0,
            power: 0.0,
            state: CueState::Aiming,
            sensitivity: 1.0,
            max_power: MAX_POWER,
            dead_zone: POWER_DEAD_ZONE,
            base_scale: POWER_BASE_SCALE,
            shot_scale: SHOT_SCALE,
        };
        cue.configure(sensitivity, max_power);
        cue
    }

    /// Apply settings values, falling back to defaults for unusable input
    pub fn configure(&mut self, sensitivity: f32, max_power: f32) {
        self.sensitivity = if sensitivity.is_finite() && sensitivity > 0.0 {
            sensitivity
        } else {
            1.0
        };
        self.max_power = if max_power.is_finite() && max_power >= MIN_CHARGE_POWER {
            max_power
        } else {
            MAX_POWER
        };
    }

    pub fn is_charging(&self) -> bool {
        matches!(self.state, CueState::Charging { .. })
    }

    /// Aiming is only available while the ball is on the table and at rest
    pub fn can_aim(ball: &Ball) -> bool {
        !ball.potted && ball.vel == Vec2::ZERO
    }

    /// Power for a given drag distance
    pub fn power_for_drag(&self, drag: f32) -> f32 {
        let scale = self.base_scale / self.sensitivity;
        ((drag - self.dead_zone) / scale).clamp(MIN_CHARGE_POWER, self.max_power)
    }

    /// Track the pointer. Does nothing while the target ball is moving or potted.
    pub fn update(&mut self, pointer: Vec2, ball: &Ball) {
        if !Self::can_aim(ball) || !pointer.is_finite() {
            return;
        }
        match self.state {
            CueState::Aiming => {
                if let Some(dir) = (pointer - ball.pos).try_normalize() {
                    self.angle = normalize_angle(dir.y.atan2(dir.x));
                }
                self.power = 0.0;
            }
            CueState::Charging { anchor } => {
                self.power = self.power_for_drag(anchor.distance(pointer));
            }
        }
    }

    /// Primary button press: start charging, or fire if already charging
    pub fn press_primary(&mut self, pointer: Vec2, ball: &mut Ball) -> Option<Shot> {
        if !Self::can_aim(ball) {
            return None;
        }
        match self.state {
            CueState::Aiming => {
                if pointer.is_finite() {
                    self.state = CueState::Charging { anchor: pointer };
                    self.power = MIN_CHARGE_POWER;
                }
                None
            }
            CueState::Charging { .. } => self.shoot(ball),
        }
    }

    /// Secondary button press: cancel a charge without shooting
    pub fn press_secondary(&mut self) -> bool {
        if !self.is_charging() {
            return false;
        }
        self.state = CueState::Aiming;
        self.power = 0.0;
        true
    }

    /// Convert the charged power into an impulse on the cue ball
    pub fn shoot(&mut self, ball: &mut Ball) -> Option<Shot> {
        if !self.is_charging() {
            return None;
        }
        let power = self.power.clamp(MIN_CHARGE_POWER, self.max_power);
        let force = power * self.shot_scale;
        self.state = CueState::Aiming;
        self.power = 0.0;

        if !ball.hit(force, self.angle) {
            return None;
        }
        log::debug!("Shot fired: power {:.1}, angle {:.3}", power, self.angle);
        Some(Shot {
            power,
            force,
            angle: self.angle,
        })
    }

    /// Drop any charge (table reset, turn change)
    pub fn reset(&mut self) {
        self.state = CueState::Aiming;
        self.power = 0.0;
    }
}
