//! Geometry of the virtual writing surface above the sensor.

use super::sample::Vec3;
use crate::raster::BoardPoint;

/// Default surface width/height in millimetres.
pub const DEFAULT_SURFACE_SIZE: u32 = 400;

/// Default pen radius in millimetres (and board cells).
pub const DEFAULT_PEN_RADIUS: u32 = 7;

/// Largest accepted surface size in millimetres.
pub const MAX_SURFACE_SIZE: u32 = 10_000;

/// Default minimum writing height above the sensor in millimetres.
pub const DEFAULT_V_SHIFT: f32 = 50.0;

/// A square writing area standing upright above the sensor.
///
/// The area spans `x` in `(-size/2, size/2)` and `y` in `(v_shift, v_shift + size)`.
/// One board cell is one millimetre; the board adds a `pen_radius` margin on every side
/// so a pen disk at the edge of the area stays on the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WritingSurface {
    size: u32,
    pen_radius: u32,
    v_shift: f32,
}

impl Default for WritingSurface {
    fn default() -> Self {
        Self::new(DEFAULT_SURFACE_SIZE, DEFAULT_PEN_RADIUS, DEFAULT_V_SHIFT)
    }
}

impl WritingSurface {
    pub fn new(size: u32, pen_radius: u32, v_shift: f32) -> Self {
        Self {
            size,
            pen_radius,
            v_shift,
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn pen_radius(&self) -> usize {
        self.pen_radius as usize
    }

    pub fn v_shift(&self) -> f32 {
        self.v_shift
    }

    /// Side of the raster board: surface size plus the pen margin on both sides.
    pub fn board_side(&self) -> usize {
        self.size as usize + 2 * self.pen_radius as usize
    }

    /// Whether a fingertip is over the active writing area.
    pub fn contains(&self, tip: &Vec3) -> bool {
        let half = self.size as f32 / 2.0;
        tip.is_finite()
            && tip.x.abs() < half
            && tip.y > self.v_shift
            && tip.y < self.v_shift + self.size as f32
    }

    /// Project a fingertip onto the board, or `None` if it is off the writing area.
    ///
    /// Row 0 is the top of the area, so a rising finger moves toward row 0.
    pub fn project(&self, tip: &Vec3) -> Option<BoardPoint> {
        if !self.contains(tip) {
            return None;
        }
        let size = self.size as f32;
        let margin = self.pen_radius as f32;
        let col = (tip.x + size / 2.0 + margin).floor();
        let row = (self.v_shift + size - tip.y + margin).floor();

        let max = (self.board_side() - 1) as f32;
        Some(BoardPoint {
            col: col.clamp(0.0, max) as usize,
            row: row.clamp(0.0, max) as usize,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_side_includes_margin() {
        assert_eq!(WritingSurface::default().board_side(), 414);
    }

    #[test]
    fn test_board_side_with_extreme_radius() {
        let s = WritingSurface::new(1, u32::MAX, 0.0);
        assert_eq!(s.board_side(), 1 + 2 * u32::MAX as usize);
    }

    #[test]
    fn test_contains_bounds() {
        let s = WritingSurface::default();
        assert!(s.contains(&Vec3::new(0.0, 250.0, 0.0)));
        assert!(s.contains(&Vec3::new(-199.0, 51.0, 30.0)));
        assert!(!s.contains(&Vec3::new(200.0, 250.0, 0.0)));
        assert!(!s.contains(&Vec3::new(0.0, 50.0, 0.0)));
        assert!(!s.contains(&Vec3::new(0.0, 450.0, 0.0)));
        assert!(!s.contains(&Vec3::new(f32::NAN, 250.0, 0.0)));
    }

    #[test]
    fn test_project_center() {
        let s = WritingSurface::default();
        let p = s.project(&Vec3::new(0.0, 250.0, 0.0)).unwrap();
        assert_eq!(p, BoardPoint { col: 207, row: 207 });
    }

    #[test]
    fn test_project_flips_vertical_axis() {
        let s = WritingSurface::default();
        let high = s.project(&Vec3::new(0.0, 440.0, 0.0)).unwrap();
        let low = s.project(&Vec3::new(0.0, 60.0, 0.0)).unwrap();
        assert!(high.row < low.row);
        assert_eq!(high.row, 17);
        assert_eq!(low.row, 397);
    }

    #[test]
    fn test_project_outside_is_none() {
        let s = WritingSurface::default();
        assert!(s.project(&Vec3::new(250.0, 250.0, 0.0)).is_none());
    }

    #[test]
    fn test_project_stays_on_board_near_edges() {
        let s = WritingSurface::new(40, 3, 10.0);
        let p = s.project(&Vec3::new(19.99, 10.01, 0.0)).unwrap();
        assert!(p.col < s.board_side());
        assert!(p.row < s.board_side());
    }
}
