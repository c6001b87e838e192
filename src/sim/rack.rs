//! Rack setup: triangle formation and cue ball spot

use glam::Vec2;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::table::Table;
use crate::consts::*;

/// How object balls are arranged in the triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RackLayout {
    /// Fixed arrangement
    #[default]
    Standard,
    /// Seeded shuffle; the 8 stays in the middle and the back corners hold one
    /// ball of each suit
    Shuffled { seed: u64 },
}

/// Slot holding the 8 (center of the third row)
const EIGHT_SLOT: usize = 4;
/// Back row corners
const CORNER_SLOTS: [usize; 2] = [10, 14];

/// Ball numbers per slot, row by row from the apex
///
/// ```text
///  1
///  9  2
///  3  8 10
/// 11  4  5 12
///  6 13 14  7 15
/// ```
const STANDARD_ORDER: [u8; 15] = [1, 9, 2, 3, 8, 10, 11, 4, 5, 12, 6, 13, 14, 7, 15];

/// Slot centers, row by row. The apex sits at `apex` and rows extend toward +x.
pub fn rack_positions(apex: Vec2, ball_radius: f32) -> [Vec2; 15] {
    let gap = ball_radius * 2.0 + RACK_GAP;
    let row_offset = gap * 0.866; // sqrt(3)/2 for equilateral triangle

    let mut positions = [Vec2::ZERO; 15];
    let mut slot = 0;
    for row in 0..5 {
        for i in 0..=row {
            let v_offset = i as f32 - row as f32 / 2.0;
            positions[slot] = Vec2::new(apex.x + row as f32 * row_offset, apex.y + v_offset * gap);
            slot += 1;
        }
    }
    positions
}

/// Ball number for each slot
pub fn rack_order(layout: RackLayout) -> [u8; 15] {
    match layout {
        RackLayout::Standard => STANDARD_ORDER,
        RackLayout::Shuffled { seed } => shuffled_order(seed),
    }
}

fn shuffled_order(seed: u64) -> [u8; 15] {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut others: Vec<u8> = (1..=15u8).filter(|&n| n != 8).collect();
    others.shuffle(&mut rng);

    let mut order = [0u8; 15];
    let mut rest = others.into_iter();
    for (slot, number) in order.iter_mut().enumerate() {
        *number = if slot == EIGHT_SLOT {
            8
        } else {
            rest.next().unwrap_or(8)
        };
    }

    // Back corners must hold one solid and one stripe
    let is_solid = |n: u8| n < 8;
    let [a, b] = CORNER_SLOTS;
    if is_solid(order[a]) == is_solid(order[b]) {
        let wanted = !is_solid(order[a]);
        if let Some(swap) = (0..15)
            .filter(|s| *s != EIGHT_SLOT && !CORNER_SLOTS.contains(s))
            .find(|&s| is_solid(order[s]) == wanted)
        {
            order.swap(b, swap);
        }
    }
    order
}

/// Build all 16 balls; the result is indexed by ball number (cue ball first)
pub fn build_rack(layout: RackLayout, cue_spot: Vec2, apex: Vec2) -> Vec<Ball> {
    let positions = rack_positions(apex, BALL_RADIUS);
    let order = rack_order(layout);

    let mut balls = Vec::with_capacity(16);
    balls.push(Ball::new(0, cue_spot));
    for (slot, &number) in order.iter().enumerate() {
        balls.push(Ball::new(number, positions[slot]));
    }
    balls.sort_by_key(|b| b.number);
    balls
}

/// Rack on the spots of `table`
pub fn rack_for(layout: RackLayout, table: &Table) -> Vec<Ball> {
    build_rack(layout, table.cue_spot(), table.foot_spot())
}

/// Standard rack on the standard table
pub fn standard_rack(layout: RackLayout) -> Vec<Ball> {
    rack_for(layout, &Table::standard())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ball::BallKind;

    #[test]
    fn test_standard_rack_indexed_by_number() {
        let balls = standard_rack(RackLayout::Standard);
        assert_eq!(balls.len(), 16);
        for (i, ball) in balls.iter().enumerate() {
            assert_eq!(ball.number as usize, i);
        }
        assert_eq!(balls[0].kind, BallKind::Cue);
        assert_eq!(balls[0].pos, Vec2::new(CUE_START_X, CUE_START_Y));
    }

    #[test]
    fn test_eight_in_center_of_third_row() {
        let balls = standard_rack(RackLayout::Standard);
        let positions = rack_positions(Vec2::new(RACK_X, RACK_Y), BALL_RADIUS);
        assert_eq!(balls[8].pos, positions[EIGHT_SLOT]);
        assert!((balls[8].pos.y - RACK_Y).abs() < 1e-4);
        assert_eq!(balls[1].pos, Vec2::new(RACK_X, RACK_Y));
    }

    #[test]
    fn test_rack_has_no_overlap() {
        let balls = standard_rack(RackLayout::Standard);
        for i in 0..balls.len() {
            for j in (i + 1)..balls.len() {
                let d = balls[i].pos.distance(balls[j].pos);
                assert!(d >= balls[i].radius + balls[j].radius, "{} and {} overlap", i, j);
            }
        }
    }

    #[test]
    fn test_shuffled_rack_deterministic() {
        let a = rack_order(RackLayout::Shuffled { seed: 42 });
        let b = rack_order(RackLayout::Shuffled { seed: 42 });
        assert_eq!(a, b);
        assert_eq!(a[EIGHT_SLOT], 8);

        let mut sorted = a;
        sorted.sort_unstable();
        let expected: Vec<u8> = (1..=15).collect();
        assert_eq!(sorted.to_vec(), expected);
    }

    #[test]
    fn test_shuffled_corners_mixed() {
        for seed in 0..50 {
            let order = rack_order(RackLayout::Shuffled { seed });
            let [a, b] = CORNER_SLOTS;
            assert_ne!(order[a] < 8, order[b] < 8, "seed {}", seed);
        }
    }
}
