//! Edge builder — device-space segments to clipped edges.
//!
//! Every segment, whether an original line or a chord of a flattened curve,
//! goes through [`EdgeBuilder::add_line`], which:
//!
//! 1. drops segments that cover no pixel row inside the clip box,
//! 2. puts the endpoints in top-to-bottom order and derives the line
//!    equation from the exact coordinates,
//! 3. clamps the row range to the clip box vertically,
//! 4. replaces the parts left of `left` or right of `right` with vertical
//!    "wall" edges on the boundary, keeping the winding contribution.
//!
//! Walls matter for nonzero fills: a shape partly off screen still opens and
//! closes its spans at the boundary.

use crate::basics::{iround, Point};
use crate::curves::{cubic_segment_count, eval_cubic, eval_quad, quad_segment_count};
use crate::edge::Edge;

/// Clips segments to an integer box and emits edges.
#[derive(Debug, Clone, Copy)]
pub struct EdgeBuilder {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl EdgeBuilder {
    /// Builder for the clip box `[left, right] × [top, bottom]`.
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        assert!(left <= right, "clip left {} > right {}", left, right);
        assert!(top <= bottom, "clip top {} > bottom {}", top, bottom);
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Builder clipping to a `width × height` device.
    pub fn for_device(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    // ====================================================================
    // Lines
    // ====================================================================

    /// Clip the segment `p1 → p2` and push the resulting edges.
    pub fn add_line(&self, p1: Point, p2: Point, edges: &mut Vec<Edge>) {
        if !(p1.x.is_finite() && p1.y.is_finite() && p2.x.is_finite() && p2.y.is_finite()) {
            log::trace!("skipping non-finite segment {:?} -> {:?}", p1, p2);
            return;
        }

        let y1 = iround(p1.y);
        let y2 = iround(p2.y);
        if y1 == y2 {
            return;
        }
        let orientation = if y2 > y1 { 1 } else { -1 };

        // Canonical order makes a shared edge produce the same equation
        // whichever way it is walked.
        let (top_pt, bot_pt, mut y_top, mut y_bottom) = if y1 < y2 {
            (p1, p2, y1, y2)
        } else {
            (p2, p1, y2, y1)
        };
        if y_bottom < self.top || y_top > self.bottom {
            return;
        }

        let slope = (bot_pt.x - top_pt.x) / (bot_pt.y - top_pt.y);
        let intercept = top_pt.x - slope * top_pt.y;

        y_top = y_top.max(self.top);
        y_bottom = y_bottom.min(self.bottom);
        if y_top >= y_bottom {
            return;
        }

        self.clip_horizontal(y_top, y_bottom, slope, intercept, orientation, edges);
    }

    fn clip_horizontal(
        &self,
        mut y_top: i32,
        mut y_bottom: i32,
        slope: f64,
        intercept: f64,
        orientation: i32,
        edges: &mut Vec<Edge>,
    ) {
        let left = self.left as f64;
        let right = self.right as f64;
        let x_top = slope * y_top as f64 + intercept;
        let x_bot = slope * y_bottom as f64 + intercept;

        if x_top >= right && x_bot >= right {
            push(edges, Edge::wall(y_top, y_bottom, right, orientation));
            return;
        }
        if x_top <= left && x_bot <= left {
            push(edges, Edge::wall(y_top, y_bottom, left, orientation));
            return;
        }

        // Row where the line reaches `boundary`, kept inside the current range.
        let crossing = |boundary: f64, lo: i32, hi: i32| -> i32 {
            iround((boundary - intercept) / slope).clamp(lo, hi)
        };

        if x_top > right || x_top < left {
            let wall_x = if x_top > right { right } else { left };
            let y_c = crossing(wall_x, y_top, y_bottom);
            push(edges, Edge::wall(y_top, y_c, wall_x, orientation));
            y_top = y_c;
        }
        if x_bot > right || x_bot < left {
            let wall_x = if x_bot > right { right } else { left };
            let y_c = crossing(wall_x, y_top, y_bottom);
            push(edges, Edge::wall(y_c, y_bottom, wall_x, orientation));
            y_bottom = y_c;
        }

        push(edges, Edge::new(y_top, y_bottom, slope, intercept, orientation));
    }

    // ====================================================================
    // Curves
    // ====================================================================

    /// Flatten the quadratic `a, b, c` into chords within `tolerance` and
    /// add each one.
    pub fn add_quad(&self, a: Point, b: Point, c: Point, tolerance: f64, edges: &mut Vec<Edge>) {
        let count = quad_segment_count(a, b, c, tolerance);
        self.add_chords(a, c, count, |t| eval_quad(a, b, c, t), edges);
    }

    /// Flatten the cubic `a, b, c, d` into chords within `tolerance` and add
    /// each one.
    pub fn add_cubic(
        &self,
        a: Point,
        b: Point,
        c: Point,
        d: Point,
        tolerance: f64,
        edges: &mut Vec<Edge>,
    ) {
        let count = cubic_segment_count(a, b, c, d, tolerance);
        self.add_chords(a, d, count, |t| eval_cubic(a, b, c, d, t), edges);
    }

    /// Walk `count` equal parameter steps; the last chord ends exactly at
    /// `end`.
    fn add_chords(
        &self,
        start: Point,
        end: Point,
        count: usize,
        eval: impl Fn(f64) -> Point,
        edges: &mut Vec<Edge>,
    ) {
        let dt = 1.0 / count as f64;
        let mut prev = start;
        for i in 1..count {
            let cur = eval(i as f64 * dt);
            self.add_line(prev, cur, edges);
            prev = cur;
        }
        self.add_line(prev, end, edges);
    }
}

#[inline]
fn push(edges: &mut Vec<Edge>, e: Edge) {
    if e.y_top < e.y_bottom {
        edges.push(e);
    }
}

// ============================================================================
// Tests
// ============================================================================
