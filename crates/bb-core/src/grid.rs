//! Grid geometry: pixel ↔ cell conversion and footprint constants.
//!
//! Components live on integer grid cells; everything drawn on the board
//! (pins, wires, custom points) is in absolute pixels.

use serde::{Deserialize, Serialize};

/// Size of one grid cell in pixels.
pub const GRID_SIZE: i32 = 20;

/// Fixed component footprint width in pixels.
pub const COMPONENT_WIDTH: i32 = 66;

/// Fixed component footprint height in pixels.
pub const COMPONENT_HEIGHT: i32 = 50;

/// Diameter of a rendered connection-point dot in pixels.
pub const DOT_SIZE: i32 = 10;

/// Default board extent used by renderers (pixels).
pub const BOARD_WIDTH: i32 = 800;
pub const BOARD_HEIGHT: i32 = 400;

/// An integer grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell containing the pixel `(px, py)` (floor division, so negative
    /// coordinates land in negative cells).
    pub fn containing(px: f64, py: f64) -> Self {
        Self {
            x: floor_div(px),
            y: floor_div(py),
        }
    }

    /// Top-left pixel of this cell. Saturates at the `i32` range.
    pub fn origin(self) -> Point {
        Point::new(
            self.x.saturating_mul(GRID_SIZE),
            self.y.saturating_mul(GRID_SIZE),
        )
    }
}

/// An absolute or relative pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Snap `(px, py)` down to the nearest grid line on each axis.
    pub fn snapped(px: f64, py: f64) -> Self {
        Self {
            x: floor_div(px).saturating_mul(GRID_SIZE),
            y: floor_div(py).saturating_mul(GRID_SIZE),
        }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        self.offset(rhs.x, rhs.y)
    }
}

fn floor_div(px: f64) -> i32 {
    (px / f64::from(GRID_SIZE)).floor() as i32
}

/// Axis-aligned pixel rectangle used for hit targets and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Inclusive containment test for a (possibly fractional) pixel.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        let (x, y) = (f64::from(self.x), f64::from(self.y));
        px >= x
            && px <= x + f64::from(self.width)
            && py >= y
            && py <= y + f64::from(self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y).offset(self.width / 2, self.height / 2)
    }
}

/// Hit box of the rendered dot for a connection point anchored at `anchor`.
/// The dot sits half a dot to the right of and above the anchor.
pub fn dot_rect(anchor: Point) -> Rect {
    let corner = anchor.offset(DOT_SIZE / 2, -DOT_SIZE / 2);
    Rect::new(corner.x, corner.y, DOT_SIZE, DOT_SIZE)
}

/// Footprint rectangle of a component placed at `cell`.
pub fn footprint(cell: Cell) -> Rect {
    let o = cell.origin();
    Rect::new(o.x, o.y, COMPONENT_WIDTH, COMPONENT_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_containing_floors() {
        assert_eq!(Cell::containing(47.0, 83.0), Cell::new(2, 4));
        assert_eq!(Cell::containing(0.0, 19.9), Cell::new(0, 0));
        assert_eq!(Cell::containing(-1.0, -20.0), Cell::new(-1, -1));
    }

    #[test]
    fn snapped_point_lands_on_grid_line() {
        assert_eq!(Point::snapped(47.0, 83.0), Point::new(40, 80));
        assert_eq!(Point::snapped(20.0, 39.99), Point::new(20, 20));
    }

    #[test]
    fn cell_origin_scales_by_grid() {
        assert_eq!(Cell::new(2, 3).origin(), Point::new(40, 60));
    }

    #[test]
    fn dot_rect_center_is_one_dot_right_of_anchor() {
        let r = dot_rect(Point::new(100, 50));
        assert_eq!(r, Rect::new(105, 45, 10, 10));
        assert_eq!(r.center(), Point::new(110, 50));
    }

    #[test]
    fn far_off_cells_saturate() {
        let far = Cell::new(200_000_000, -200_000_000).origin();
        assert_eq!(far, Point::new(i32::MAX, i32::MIN));
        assert_eq!(Point::snapped(1e12, -1e12), Point::new(i32::MAX, i32::MIN));
        assert_eq!(far.offset(66, 25).x, i32::MAX);
        assert!(footprint(Cell::new(i32::MAX, 0)).contains(f64::from(i32::MAX) + 10.0, 20.0));
    }

    #[test]
    fn rect_contains_edges() {
        let r = footprint(Cell::new(1, 1));
        assert!(r.contains(20.0, 20.0));
        assert!(r.contains(86.0, 70.0));
        assert!(!r.contains(86.5, 70.0));
    }
}
