//! Eight Ball - a real-time 2D billiards simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball physics, collisions, shot prediction, rules)
//! - `app`: Screen state machine wrapping a match
//! - `settings`: Player preferences (cue sensitivity, max power, volume)
//! - `leaderboard`: Win counts keyed by player name
//! - `persistence`: JSON load/save shared by settings and leaderboard
//! - `audio`: Mapping from frame events to sound cues

pub mod app;
pub mod audio;
pub mod leaderboard;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use app::{App, Screen, ScreenEvent};
pub use leaderboard::Leaderboard;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Target frame rate of the external frame clock
    pub const FRAME_RATE: f32 = 60.0;
    /// Duration of one frame (velocities are expressed in units per frame)
    pub const FRAME_DT: f32 = 1.0 / FRAME_RATE;
    /// Largest frame a single step will integrate (prevents huge jumps after a stall)
    pub const MAX_FRAME_SCALE: f32 = 4.0;
    /// Integration sub-steps per frame (prevents tunneling through cushions/pockets)
    pub const SUBSTEPS: u32 = 10;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 12.0;
    /// Velocity retained per frame
    pub const BALL_FRICTION: f32 = 0.99;
    /// Below this speed a ball snaps to rest
    pub const REST_SPEED: f32 = 0.05;
    /// Velocity retained (and inverted) on a cushion bounce
    pub const WALL_RESTITUTION: f32 = 0.9;
    /// Substitute distance for coincident ball centers
    pub const COLLISION_EPSILON: f32 = 1.0e-4;

    /// Table play area (ball centers live inside this rectangle inset by the radius)
    pub const TABLE_X: f32 = 80.0;
    pub const TABLE_Y: f32 = 80.0;
    pub const TABLE_WIDTH: f32 = 800.0;
    pub const TABLE_HEIGHT: f32 = 480.0;
    /// Cushion thickness (cosmetic only)
    pub const CUSHION_SIZE: f32 = 20.0;
    /// Pocket capture radius
    pub const POCKET_RADIUS: f32 = 22.0;
    /// Mid-rail pockets sit slightly outside the rail
    pub const SIDE_POCKET_OFFSET: f32 = 5.0;

    /// Break spot and rack apex as fractions of the play-area width
    pub const CUE_SPOT_FRACTION: f32 = 0.2;
    pub const FOOT_SPOT_FRACTION: f32 = 0.7;
    /// Cue ball break position on the standard table
    pub const CUE_START_X: f32 = TABLE_X + TABLE_WIDTH * CUE_SPOT_FRACTION;
    pub const CUE_START_Y: f32 = TABLE_Y + TABLE_HEIGHT / 2.0;
    /// Rack apex (foot spot) on the standard table
    pub const RACK_X: f32 = TABLE_X + TABLE_WIDTH * FOOT_SPOT_FRACTION;
    pub const RACK_Y: f32 = TABLE_Y + TABLE_HEIGHT / 2.0;
    /// Gap between racked balls
    pub const RACK_GAP: f32 = 1.0;

    /// Cue power limits
    pub const MAX_POWER: f32 = 40.0;
    pub const MIN_CHARGE_POWER: f32 = 1.0;
    /// Drag distance ignored before power starts building
    pub const POWER_DEAD_ZONE: f32 = 50.0;
    /// Drag distance per unit of power at sensitivity 1.0
    pub const POWER_BASE_SCALE: f32 = 5.0;
    /// Power to impulse conversion
    pub const SHOT_SCALE: f32 = 0.5;

    /// How long match messages stay on screen (frames)
    pub const MESSAGE_FRAMES: u32 = 120;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
