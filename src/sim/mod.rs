//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-scaled integration with a fixed number of sub-steps
//! - Seeded RNG only
//! - Stable iteration order (by ball index, ascending pairs)
//! - No rendering, audio or platform dependencies

pub mod ball;
pub mod collision;
pub mod cue;
pub mod physics;
pub mod rack;
pub mod raycast;
pub mod rules;
pub mod state;
pub mod table;

pub use ball::{Ball, BallKind, Suit};
pub use collision::{Contact, resolve, resolve_pairs};
pub use cue::{Cue, CueState, Shot};
pub use physics::{BoundaryOrder, FrictionModel, PhysicsConfig, PhysicsEvent, StepReport};
pub use rack::{RackLayout, build_rack, rack_for, rack_positions, standard_rack};
pub use raycast::{RayHit, ShotPrediction, cast, predict_shot, wall_intercept};
pub use rules::{FoulKind, Player, PotOutcome, Rules, TurnOutcome};
pub use state::{
    BallView, CueView, FrameEvents, FrameInput, GameEvent, GamePhase, GameState, MatchMessage,
    Snapshot,
};
pub use table::{Pocket, Rect, Table};
