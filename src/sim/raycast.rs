//! Shot prediction by ray casting from the cue ball
//!
//! The ray is the cue ball's path. A target qualifies when the path passes
//! within one ball diameter (caster radius + target radius) of its center,
//! which is exactly when the moving cue ball would touch it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::table::Rect;
use crate::polar_to_cartesian;

/// First ball struck along a ray
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// Index of the struck ball in the candidate slice
    pub index: usize,
    /// Contact point on the struck ball's surface
    pub impact: Vec2,
    /// Cue ball center at the moment of contact
    pub ghost: Vec2,
    /// Distance from the origin to the ghost ball center along the ray
    pub distance: f32,
}

/// Aim line and deflection lines for rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotPrediction {
    pub origin: Vec2,
    /// Where the aim line stops: the ghost ball, or the cushion intercept
    pub end: Vec2,
    pub hit: Option<RayHit>,
    /// Direction the struck ball will travel
    pub target_dir: Option<Vec2>,
    /// Direction the cue ball deflects to after contact
    pub cue_dir: Option<Vec2>,
}

/// Find the nearest ball along a ray
///
/// `caster` is excluded (pass the cue ball's index); potted balls and balls
/// behind the origin are ignored. Exact distance ties keep the lower index.
pub fn cast(
    origin: Vec2,
    direction: Vec2,
    caster_radius: f32,
    balls: &[Ball],
    caster: Option<usize>,
) -> Option<RayHit> {
    let dir = direction.try_normalize()?;

    let mut best: Option<RayHit> = None;
    for (index, ball) in balls.iter().enumerate() {
        if ball.potted || Some(index) == caster {
            continue;
        }

        let to_center = ball.pos - origin;
        let projection = to_center.dot(dir);
        if projection < 0.0 {
            continue;
        }

        let closest = origin + dir * projection;
        let perp = ball.pos.distance(closest);
        let margin = caster_radius + ball.radius;
        if perp > margin {
            continue;
        }

        let back_off = (margin * margin - perp * perp).max(0.0).sqrt();
        let distance = (projection - back_off).max(0.0);
        let ghost = origin + dir * distance;
        let impact = ball.pos + (ghost - ball.pos).normalize_or(-dir) * ball.radius;

        if best.is_none_or(|b| distance < b.distance) {
            best = Some(RayHit {
                index,
                impact,
                ghost,
                distance,
            });
        }
    }
    best
}

/// Point where a ball of `radius` travelling along the ray meets a cushion
///
/// Returns `origin` for a zero-length direction.
pub fn wall_intercept(origin: Vec2, direction: Vec2, bounds: &Rect, radius: f32) -> Vec2 {
    let Some(dir) = direction.try_normalize() else {
        return origin;
    };
    let inner = bounds.inset(radius);

    let mut t = f32::INFINITY;
    if dir.x > 0.0 {
        t = t.min((inner.right - origin.x) / dir.x);
    } else if dir.x < 0.0 {
        t = t.min((inner.left - origin.x) / dir.x);
    }
    if dir.y > 0.0 {
        t = t.min((inner.bottom - origin.y) / dir.y);
    } else if dir.y < 0.0 {
        t = t.min((inner.top - origin.y) / dir.y);
    }

    origin + dir * t.max(0.0)
}

/// Predict the shot of the ball at `cue_index` fired along `angle`
pub fn predict_shot(balls: &[Ball], cue_index: usize, angle: f32, bounds: &Rect) -> Option<ShotPrediction> {
    let cue = balls.get(cue_index).filter(|b| !b.potted)?;
    let origin = cue.pos;
    let dir = polar_to_cartesian(1.0, angle);

    let Some(hit) = cast(origin, dir, cue.radius, balls, Some(cue_index)) else {
        return Some(ShotPrediction {
            origin,
            end: wall_intercept(origin, dir, bounds, cue.radius),
            hit: None,
            target_dir: None,
            cue_dir: None,
        });
    };

    // Struck ball leaves along the line of centers; the cue ball keeps the
    // tangential part of its motion
    let target_dir = (balls[hit.index].pos - hit.ghost).normalize_or(dir);
    let tangential = dir - target_dir * dir.dot(target_dir);
    let cue_dir = tangential.try_normalize();

    Some(ShotPrediction {
        origin,
        end: hit.ghost,
        hit: Some(hit),
        target_dir: Some(target_dir),
        cue_dir,
    })
}
