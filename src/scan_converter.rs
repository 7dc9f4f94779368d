//! Scanline sweep — sorted edges to horizontal spans.
//!
//! Two fill modes are supported:
//!
//! - [`FillMode::Convex`]: exactly two edges are live on every row. When one
//!   runs out the next edge in sweep order replaces it. Cheap, and correct
//!   for any convex outline.
//! - [`FillMode::NonZero`]: an active edge table is advanced row by row.
//!   Live edges are sorted by x and walked left to right while their
//!   orientations are summed; a span runs wherever the sum is non-zero.
//!
//! Spans are clamped to `[0, width)` before they reach the sink.

use crate::edge::{sort_edges, Edge};

// ============================================================================
// FillMode
// ============================================================================

/// Interior rule used by [`ScanConverter::convert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    /// Two live edges per row.
    Convex,
    /// Nonzero winding rule.
    #[default]
    NonZero,
}

// ============================================================================
// SpanSink — the interface that the sweep feeds spans into
// ============================================================================

/// Receiver of interior spans, in row order.
pub trait SpanSink {
    /// Pixels `[x_start, x_end)` of row `y` are inside the shape.
    fn span(&mut self, y: i32, x_start: i32, x_end: i32);
}

impl<F: FnMut(i32, i32, i32)> SpanSink for F {
    fn span(&mut self, y: i32, x_start: i32, x_end: i32) {
        self(y, x_start, x_end)
    }
}

// ============================================================================
// ScanConverter
// ============================================================================

/// Turns an edge list into spans for a device `width` pixels wide.
///
/// The converter keeps its scratch buffers between calls, so one instance
/// can serve many draws.
pub struct ScanConverter {
    width: i32,
    active: Vec<Edge>,
    crossings: Vec<(i32, i32)>,
}

impl ScanConverter {
    pub fn new(width: u32) -> Self {
        Self {
            width: width as i32,
            active: Vec::new(),
            crossings: Vec::new(),
        }
    }

    /// Sort `edges` into sweep order and emit every interior span.
    pub fn convert<S: SpanSink + ?Sized>(&mut self, edges: &mut [Edge], mode: FillMode, sink: &mut S) {
        if edges.len() < 2 {
            log::trace!("{} edge(s), nothing to fill", edges.len());
            return;
        }
        sort_edges(edges);
        match mode {
            FillMode::Convex => self.sweep_convex(edges, sink),
            FillMode::NonZero => self.sweep_nonzero(edges, sink),
        }
    }

    #[inline]
    fn emit<S: SpanSink + ?Sized>(&self, y: i32, x0: i32, x1: i32, sink: &mut S) {
        let x0 = x0.max(0);
        let x1 = x1.min(self.width);
        if x0 < x1 {
            sink.span(y, x0, x1);
        }
    }

    fn sweep_convex<S: SpanSink + ?Sized>(&self, edges: &[Edge], sink: &mut S) {
        let mut a = 0;
        let mut b = 1;
        let mut next = 2;
        let mut y = edges[0].y_top;

        loop {
            while y >= edges[a].y_bottom {
                if next >= edges.len() {
                    return;
                }
                a = next;
                next += 1;
            }
            while y >= edges[b].y_bottom {
                if next >= edges.len() {
                    return;
                }
                b = next;
                next += 1;
            }
            // A replacement edge may start below the current row.
            y = y.max(edges[a].y_top).max(edges[b].y_top);
            if y >= edges[a].y_bottom || y >= edges[b].y_bottom {
                continue;
            }

            let xa = edges[a].x_at(y);
            let xb = edges[b].x_at(y);
            self.emit(y, xa.min(xb), xa.max(xb), sink);
            y += 1;
        }
    }

    fn sweep_nonzero<S: SpanSink + ?Sized>(&mut self, edges: &[Edge], sink: &mut S) {
        let y_start = edges[0].y_top;
        let y_end = edges.iter().map(|e| e.y_bottom).max().unwrap_or(y_start);

        self.active.clear();
        let mut next = 0;
        for y in y_start..y_end {
            while next < edges.len() && edges[next].y_top <= y {
                self.active.push(edges[next]);
                next += 1;
            }
            self.active.retain(|e| e.y_bottom > y);

            self.crossings.clear();
            self.crossings
                .extend(self.active.iter().map(|e| (e.x_at(y), e.orientation)));
            self.crossings.sort_unstable_by_key(|&(x, _)| x);

            let mut winding = 0;
            let mut left = 0;
            for i in 0..self.crossings.len() {
                let (x, orientation) = self.crossings[i];
                if winding == 0 {
                    left = x;
                }
                winding += orientation;
                if winding == 0 {
                    self.emit(y, left, x, sink);
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::Point;
    use crate::edge_builder::EdgeBuilder;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn polygon_edges(builder: &EdgeBuilder, pts: &[Point], edges: &mut Vec<Edge>) {
        for i in 0..pts.len() {
            builder.add_line(pts[i], pts[(i + 1) % pts.len()], edges);
        }
    }

    fn collect(width: u32, edges: &mut Vec<Edge>, mode: FillMode) -> Vec<(i32, i32, i32)> {
        let mut spans = Vec::new();
        let mut sc = ScanConverter::new(width);
        sc.convert(edges, mode, &mut |y, x0, x1| spans.push((y, x0, x1)));
        spans
    }

    fn covered(spans: &[(i32, i32, i32)], x: i32, y: i32) -> bool {
        spans.iter().any(|&(sy, x0, x1)| sy == y && x0 <= x && x < x1)
    }

    #[test]
    fn test_fewer_than_two_edges_yields_nothing() {
        let mut edges = vec![Edge::new(0, 10, 0.0, 5.0, 1)];
        assert!(collect(100, &mut edges, FillMode::NonZero).is_empty());
        let mut none = Vec::new();
        assert!(collect(100, &mut none, FillMode::Convex).is_empty());
    }

    #[test]
    fn test_rect_both_modes() {
        let b = EdgeBuilder::for_device(100, 100);
        let rect = [p(10.0, 10.0), p(50.0, 10.0), p(50.0, 50.0), p(10.0, 50.0)];
        for mode in [FillMode::Convex, FillMode::NonZero] {
            let mut edges = Vec::new();
            polygon_edges(&b, &rect, &mut edges);
            let spans = collect(100, &mut edges, mode);
            assert_eq!(spans.len(), 40, "{:?}", mode);
            for (i, &(y, x0, x1)) in spans.iter().enumerate() {
                assert_eq!((y, x0, x1), (10 + i as i32, 10, 50));
            }
        }
    }

    #[test]
    fn test_convex_triangle_pixel_centers() {
        let b = EdgeBuilder::for_device(32, 32);
        let tri = [p(0.0, 0.0), p(20.0, 0.0), p(0.0, 20.0)];
        let mut edges = Vec::new();
        polygon_edges(&b, &tri, &mut edges);
        let spans = collect(32, &mut edges, FillMode::Convex);
        assert_eq!(spans.len(), 20);
        // row y samples x + y < 20 at y + 0.5, so the right end is round(19.5 - y)
        for &(y, x0, x1) in &spans {
            assert_eq!(x0, 0);
            assert_eq!(x1, crate::basics::iround(19.5 - y as f64));
        }
    }

    #[test]
    fn test_spans_clamped_to_width() {
        let b = EdgeBuilder::new(0, 0, 20, 20);
        let rect = [p(-10.0, 2.0), p(40.0, 2.0), p(40.0, 6.0), p(-10.0, 6.0)];
        for mode in [FillMode::Convex, FillMode::NonZero] {
            let mut edges = Vec::new();
            polygon_edges(&b, &rect, &mut edges);
            let spans = collect(20, &mut edges, mode);
            assert_eq!(spans, vec![(2, 0, 20), (3, 0, 20), (4, 0, 20), (5, 0, 20)]);
        }
    }

    #[test]
    fn test_star_center_filled_under_nonzero() {
        let b = EdgeBuilder::for_device(200, 200);
        let (cx, cy, r) = (100.0, 100.0, 90.0);
        // five points visited in star order (every second vertex)
        let star: Vec<Point> = (0..5)
            .map(|i| {
                let a = -std::f64::consts::FRAC_PI_2 + i as f64 * 4.0 * std::f64::consts::PI / 5.0;
                p(cx + r * a.cos(), cy + r * a.sin())
            })
            .collect();
        let mut edges = Vec::new();
        polygon_edges(&b, &star, &mut edges);
        let spans = collect(200, &mut edges, FillMode::NonZero);
        assert!(covered(&spans, 100, 100));
        assert!(covered(&spans, 100, 110));
        // tip of the top arm
        assert!(covered(&spans, 100, 20));
        // between two arms
        assert!(!covered(&spans, 40, 40));
    }

    #[test]
    fn test_opposite_contour_makes_hole() {
        let b = EdgeBuilder::for_device(100, 100);
        let outer = [p(10.0, 10.0), p(90.0, 10.0), p(90.0, 90.0), p(10.0, 90.0)];
        let inner = [p(30.0, 30.0), p(30.0, 70.0), p(70.0, 70.0), p(70.0, 30.0)];
        let mut edges = Vec::new();
        polygon_edges(&b, &outer, &mut edges);
        polygon_edges(&b, &inner, &mut edges);
        let spans = collect(100, &mut edges, FillMode::NonZero);
        assert!(covered(&spans, 20, 50));
        assert!(!covered(&spans, 50, 50));
        assert!(covered(&spans, 80, 50));

        // same direction: the inner square adds winding, no hole
        let same = [p(30.0, 30.0), p(70.0, 30.0), p(70.0, 70.0), p(30.0, 70.0)];
        let mut edges = Vec::new();
        polygon_edges(&b, &outer, &mut edges);
        polygon_edges(&b, &same, &mut edges);
        let spans = collect(100, &mut edges, FillMode::NonZero);
        assert!(covered(&spans, 50, 50));
    }

    #[test]
    fn test_closure_sink() {
        struct Count(usize);
        impl SpanSink for Count {
            fn span(&mut self, _y: i32, x0: i32, x1: i32) {
                self.0 += (x1 - x0) as usize;
            }
        }
        let b = EdgeBuilder::for_device(10, 10);
        let mut edges = Vec::new();
        polygon_edges(&b, &[p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)], &mut edges);
        let mut count = Count(0);
        ScanConverter::new(10).convert(&mut edges, FillMode::NonZero, &mut count);
        assert_eq!(count.0, 100);
    }
}
