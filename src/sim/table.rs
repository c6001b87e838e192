//! Static table geometry: play area, cushions and pockets

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Axis-aligned rectangle (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Shrink every side by `amount`
    pub fn inset(&self, amount: f32) -> Self {
        Self::new(
            self.left + amount,
            self.top + amount,
            self.right - amount,
            self.bottom - amount,
        )
    }

    /// Whether a ball of `radius` centered at `pos` lies fully inside
    pub fn contains_ball(&self, pos: Vec2, radius: f32) -> bool {
        pos.x >= self.left + radius
            && pos.x <= self.right - radius
            && pos.y >= self.top + radius
            && pos.y <= self.bottom - radius
    }
}

/// A pocket: capture circle around its center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pocket {
    pub center: Vec2,
    pub radius: f32,
}

impl Pocket {
    pub fn new(center: Vec2, radius: f32) -> Self {
        // Capture radius must stay positive
        Self {
            center,
            radius: radius.max(f32::EPSILON),
        }
    }

    /// A ball is captured when its center is strictly inside the capture radius
    #[inline]
    pub fn captures(&self, pos: Vec2) -> bool {
        pos.distance(self.center) < self.radius
    }
}

/// The pool table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Play area the ball edges are confined to
    pub bounds: Rect,
    /// Cushion thickness drawn around the play area (cosmetic)
    pub cushion: f32,
    /// Corner and mid-rail pockets, checked in this order
    pub pockets: Vec<Pocket>,
}

impl Default for Table {
    fn default() -> Self {
        Self::standard()
    }
}

impl Table {
    /// Play area with six pockets: four corners and two mid-rail
    pub fn new(bounds: Rect, cushion: f32, pocket_radius: f32) -> Self {
        let mid_x = (bounds.left + bounds.right) / 2.0;
        let pockets = vec![
            Pocket::new(Vec2::new(bounds.left, bounds.top), pocket_radius),
            Pocket::new(Vec2::new(mid_x, bounds.top - SIDE_POCKET_OFFSET), pocket_radius),
            Pocket::new(Vec2::new(bounds.right, bounds.top), pocket_radius),
            Pocket::new(Vec2::new(bounds.left, bounds.bottom), pocket_radius),
            Pocket::new(Vec2::new(mid_x, bounds.bottom + SIDE_POCKET_OFFSET), pocket_radius),
            Pocket::new(Vec2::new(bounds.right, bounds.bottom), pocket_radius),
        ];
        Self {
            bounds,
            cushion,
            pockets,
        }
    }

    /// Standard 800x480 table
    pub fn standard() -> Self {
        Self::new(
            Rect::new(
                TABLE_X,
                TABLE_Y,
                TABLE_X + TABLE_WIDTH,
                TABLE_Y + TABLE_HEIGHT,
            ),
            CUSHION_SIZE,
            POCKET_RADIUS,
        )
    }

    /// Table with no pockets (practice / testing)
    pub fn without_pockets(bounds: Rect) -> Self {
        Self {
            bounds,
            cushion: CUSHION_SIZE,
            pockets: Vec::new(),
        }
    }

    /// Outer rectangle including the cushion
    pub fn outer_bounds(&self) -> Rect {
        self.bounds.inset(-self.cushion)
    }

    /// Where the cue ball breaks from (and respots after a scratch)
    pub fn cue_spot(&self) -> Vec2 {
        self.spot(CUE_SPOT_FRACTION)
    }

    /// Apex of the rack
    pub fn foot_spot(&self) -> Vec2 {
        self.spot(FOOT_SPOT_FRACTION)
    }

    fn spot(&self, fraction: f32) -> Vec2 {
        Vec2::new(
            self.bounds.left + self.bounds.width() * fraction,
            self.bounds.top + self.bounds.height() / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_pockets() {
        let table = Table::standard();
        assert_eq!(table.pockets.len(), 6);
        assert_eq!(table.pockets[0].center, Vec2::new(TABLE_X, TABLE_Y));
        assert_eq!(
            table.pockets[4].center,
            Vec2::new(TABLE_X + TABLE_WIDTH / 2.0, TABLE_Y + TABLE_HEIGHT + SIDE_POCKET_OFFSET)
        );
        assert!(table.pockets.iter().all(|p| p.radius > 0.0));
    }

    #[test]
    fn test_spots() {
        let table = Table::standard();
        assert_eq!(table.cue_spot(), Vec2::new(CUE_START_X, CUE_START_Y));
        assert_eq!(table.foot_spot(), Vec2::new(RACK_X, RACK_Y));

        let small = Table::without_pockets(Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(small.cue_spot(), Vec2::new(20.0, 25.0));
        assert_eq!(small.foot_spot(), Vec2::new(70.0, 25.0));
    }

    #[test]
    fn test_pocket_captures() {
        let pocket = Pocket::new(Vec2::new(10.0, 10.0), 5.0);
        assert!(pocket.captures(Vec2::new(10.0, 10.0)));
        assert!(pocket.captures(Vec2::new(13.0, 10.0)));
        assert!(!pocket.captures(Vec2::new(15.0, 10.0)));
    }

    #[test]
    fn test_rect_helpers() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(rect.width(), 100.0);
        assert_eq!(rect.height(), 50.0);
        assert_eq!(rect.center(), Vec2::new(50.0, 25.0));
        assert!(rect.contains_ball(Vec2::new(50.0, 25.0), 10.0));
        assert!(!rect.contains_ball(Vec2::new(5.0, 25.0), 10.0));
        let outer = rect.inset(-10.0);
        assert_eq!(outer.left, -10.0);
        assert_eq!(outer.bottom, 60.0);
    }
}
