//! Scanline edges.
//!
//! An `Edge` is one clipped, monotonic-in-y piece of a shape outline, stored
//! as a line equation `x = slope·y + intercept` over the pixel rows
//! `[y_top, y_bottom)`. Rows are sampled at their centers.

use core::cmp::Ordering;

use crate::basics::iround;

/// One line segment ready for the scanline sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// First covered row.
    pub y_top: i32,
    /// One past the last covered row.
    pub y_bottom: i32,
    /// dx/dy of the line.
    pub slope: f64,
    /// x where the line crosses `y = 0`.
    pub intercept: f64,
    /// +1 if the source segment went down the screen, -1 if it went up.
    pub orientation: i32,
}

impl Edge {
    pub fn new(y_top: i32, y_bottom: i32, slope: f64, intercept: f64, orientation: i32) -> Self {
        debug_assert!(y_top <= y_bottom);
        debug_assert!(orientation == 1 || orientation == -1);
        Self {
            y_top,
            y_bottom,
            slope,
            intercept,
            orientation,
        }
    }

    /// Vertical edge at a fixed column.
    pub fn wall(y_top: i32, y_bottom: i32, x: f64, orientation: i32) -> Self {
        Self::new(y_top, y_bottom, 0.0, x, orientation)
    }

    /// Pixel column where the edge crosses the center of row `y`.
    #[inline]
    pub fn x_at(&self, y: i32) -> i32 {
        iround(self.slope * (y as f64 + 0.5) + self.intercept)
    }

    /// Whether row `y` is sampled by this edge.
    #[inline]
    pub fn covers(&self, y: i32) -> bool {
        self.y_top <= y && y < self.y_bottom
    }

    /// Sweep order: by `y_top`, then x at `y_top`, then slope.
    pub fn sweep_order(a: &Edge, b: &Edge) -> Ordering {
        a.y_top
            .cmp(&b.y_top)
            .then_with(|| a.x_at(a.y_top).cmp(&b.x_at(b.y_top)))
            .then_with(|| a.slope.total_cmp(&b.slope))
    }
}

/// Sort an edge list into sweep order.
pub fn sort_edges(edges: &mut [Edge]) {
    edges.sort_by(Edge::sweep_order);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_at_samples_row_center() {
        // x = y, so row 3 samples x = 3.5 which rounds up
        let e = Edge::new(0, 10, 1.0, 0.0, 1);
        assert_eq!(e.x_at(3), 4);
        assert_eq!(e.x_at(0), 1);
        let w = Edge::wall(0, 10, 7.0, -1);
        assert_eq!(w.x_at(5), 7);
    }

    #[test]
    fn test_covers_half_open() {
        let e = Edge::new(2, 5, 0.0, 0.0, 1);
        assert!(!e.covers(1));
        assert!(e.covers(2));
        assert!(e.covers(4));
        assert!(!e.covers(5));
    }

    #[test]
    fn test_sweep_order() {
        let mut edges = vec![
            Edge::new(5, 9, 0.0, 1.0, 1),
            Edge::new(0, 9, 0.0, 8.0, 1),
            Edge::new(0, 9, 1.0, 2.0, -1),
            Edge::new(0, 9, -1.0, 3.0, 1),
        ];
        sort_edges(&mut edges);
        assert_eq!(edges[0].intercept, 3.0); // x_at(0) = round(2.5) = 3, slope -1
        assert_eq!(edges[1].intercept, 2.0); // x_at(0) = round(2.5) = 3, slope 1
        assert_eq!(edges[2].intercept, 8.0);
        assert_eq!(edges[3].y_top, 5);
    }
}
