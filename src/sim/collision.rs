//! Ball-ball collision detection and response
//!
//! Equal-mass, perfectly elastic discs: the velocity components along the
//! contact normal are exchanged and the tangential components are kept.
//! Mass, size variation and spin are not modeled.

use glam::Vec2;

use super::ball::Ball;
use crate::consts::COLLISION_EPSILON;

/// Result of a collision check
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Whether the balls overlapped
    pub hit: bool,
    /// Contact point on the second ball's surface (after separation)
    pub point: Vec2,
    /// Unit normal pointing from the second ball toward the first
    pub normal: Vec2,
    /// Overlap depth before separation
    pub penetration: f32,
    /// Closing speed along the normal (0 if the balls were already separating)
    pub impact_speed: f32,
}

impl Contact {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
            impact_speed: 0.0,
        }
    }
}

/// Resolve a collision between two balls in place
///
/// Returns a miss if either ball is potted or the discs do not overlap.
/// Overlapping balls are pushed apart by half the overlap each so they do not
/// stick at low relative speed.
pub fn resolve(a: &mut Ball, b: &mut Ball) -> Contact {
    if a.potted || b.potted {
        return Contact::miss();
    }

    let delta = a.pos - b.pos;
    let distance = delta.length();
    let min_distance = a.radius + b.radius;
    if distance >= min_distance {
        return Contact::miss();
    }

    // Coincident centers: pick an arbitrary but fixed normal
    let (normal, distance) = if distance < COLLISION_EPSILON {
        (Vec2::X, COLLISION_EPSILON)
    } else {
        (delta / distance, distance)
    };
    let tangent = Vec2::new(-normal.y, normal.x);

    let v1n = a.vel.dot(normal);
    let v1t = a.vel.dot(tangent);
    let v2n = b.vel.dot(normal);
    let v2t = b.vel.dot(tangent);

    // Negative closing velocity means the balls approach each other
    let closing = v1n - v2n;
    if closing < 0.0 {
        a.vel = normal * v2n + tangent * v1t;
        b.vel = normal * v1n + tangent * v2t;
    }

    let penetration = min_distance - distance;
    let correction = normal * (penetration / 2.0);
    a.pos += correction;
    b.pos -= correction;

    Contact {
        hit: true,
        point: b.pos + normal * b.radius,
        normal,
        penetration,
        impact_speed: (-closing).max(0.0),
    }
}

/// Resolve every unordered pair once, in ascending index order
///
/// Returns the index pairs that collided along with their contact info.
pub fn resolve_pairs(balls: &mut [Ball]) -> Vec<(usize, usize, Contact)> {
    let mut contacts = Vec::new();
    for i in 0..balls.len() {
        let (head, tail) = balls.split_at_mut(i + 1);
        let a = &mut head[i];
        for (offset, b) in tail.iter_mut().enumerate() {
            let contact = resolve(a, b);
            if contact.hit {
                contacts.push((i, i + 1 + offset, contact));
            }
        }
    }
    contacts
}
