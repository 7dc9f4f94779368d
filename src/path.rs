//! Path storage — contours of line, quadratic and cubic segments.
//!
//! Points and verbs are stored in two parallel `Vec`s. Consumers never walk
//! the verbs directly: [`Path::segments`] yields a lazy sequence of
//! [`Segment`]s with every contour closed implicitly, which is exactly what
//! the fill pipeline wants.

use crate::basics::{Point, Rect};
use crate::trans_affine::TransAffine;

/// Control-point offset that makes four cubics approximate a circle.
const CIRCLE_OFFSET: f64 = 0.55191502449351;

// ============================================================================
// Verbs, directions and segments
// ============================================================================

/// Path command. Each verb consumes a fixed number of points:
/// `Move` 1, `Line` 1, `Quad` 2, `Cubic` 3, `Close` 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Move,
    Line,
    Quad,
    Cubic,
    Close,
}

impl Verb {
    fn point_count(self) -> usize {
        match self {
            Verb::Move | Verb::Line => 1,
            Verb::Quad => 2,
            Verb::Cubic => 3,
            Verb::Close => 0,
        }
    }
}

/// Winding direction for the shape helpers, as seen on screen (y down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Cw,
    Ccw,
}

/// One drawable piece of a contour, with absolute endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line(Point, Point),
    Quad(Point, Point, Point),
    Cubic(Point, Point, Point, Point),
}

// ============================================================================
// Path
// ============================================================================

/// An ordered list of contours.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pts: Vec<Point>,
    verbs: Vec<Verb>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.pts
    }

    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    /// Remove all contours, keeping the allocations.
    pub fn reset(&mut self) {
        self.pts.clear();
        self.verbs.clear();
    }

    // ---------------------------------------------------------------
    // Path construction
    // ---------------------------------------------------------------

    /// Start a new contour at `p`.
    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.verbs.push(Verb::Move);
        self.pts.push(p);
        self
    }

    /// A drawing verb with no contour open starts one at the last point
    /// (or the origin for an empty path).
    fn ensure_contour(&mut self) {
        if self.verbs.is_empty() {
            self.move_to(Point::default());
        } else if self.verbs.last() == Some(&Verb::Close) {
            let start = self.contour_start();
            self.move_to(start);
        }
    }

    /// First point of the most recent contour.
    fn contour_start(&self) -> Point {
        let mut idx = self.pts.len();
        for v in self.verbs.iter().rev() {
            idx -= v.point_count();
            if *v == Verb::Move {
                return self.pts[idx];
            }
        }
        Point::default()
    }

    pub fn line_to(&mut self, p: Point) -> &mut Self {
        self.ensure_contour();
        self.verbs.push(Verb::Line);
        self.pts.push(p);
        self
    }

    pub fn quad_to(&mut self, ctrl: Point, to: Point) -> &mut Self {
        self.ensure_contour();
        self.verbs.push(Verb::Quad);
        self.pts.extend_from_slice(&[ctrl, to]);
        self
    }

    pub fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) -> &mut Self {
        self.ensure_contour();
        self.verbs.push(Verb::Cubic);
        self.pts.extend_from_slice(&[ctrl1, ctrl2, to]);
        self
    }

    /// Close the current contour. Contours are closed implicitly when
    /// iterated, so this only matters for `line_to` after it.
    pub fn close(&mut self) -> &mut Self {
        if matches!(self.verbs.last(), Some(v) if *v != Verb::Close) {
            self.verbs.push(Verb::Close);
        }
        self
    }

    // ---------------------------------------------------------------
    // Shapes
    // ---------------------------------------------------------------

    /// Add `r` as a closed four-point contour starting at its left/top corner.
    pub fn add_rect(&mut self, r: &Rect, dir: Direction) -> &mut Self {
        self.move_to(Point::new(r.x1, r.y1));
        match dir {
            Direction::Cw => {
                self.line_to(Point::new(r.x2, r.y1));
                self.line_to(Point::new(r.x2, r.y2));
                self.line_to(Point::new(r.x1, r.y2));
            }
            Direction::Ccw => {
                self.line_to(Point::new(r.x1, r.y2));
                self.line_to(Point::new(r.x2, r.y2));
                self.line_to(Point::new(r.x2, r.y1));
            }
        }
        self
    }

    /// Add a contour through `pts`. Empty input adds nothing.
    pub fn add_polygon(&mut self, pts: &[Point]) -> &mut Self {
        if let Some((first, rest)) = pts.split_first() {
            self.move_to(*first);
            for p in rest {
                self.line_to(*p);
            }
        }
        self
    }

    /// Add a circle as four cubics, starting at the top.
    pub fn add_circle(&mut self, center: Point, radius: f64, dir: Direction) -> &mut Self {
        let (cx, cy) = (center.x, center.y);
        let r = radius;
        let k = radius * CIRCLE_OFFSET;

        let top = Point::new(cx, cy - r);
        let right = Point::new(cx + r, cy);
        let bottom = Point::new(cx, cy + r);
        let left = Point::new(cx - r, cy);

        self.move_to(top);
        match dir {
            Direction::Cw => {
                self.cubic_to(Point::new(cx + k, cy - r), Point::new(cx + r, cy - k), right);
                self.cubic_to(Point::new(cx + r, cy + k), Point::new(cx + k, cy + r), bottom);
                self.cubic_to(Point::new(cx - k, cy + r), Point::new(cx - r, cy + k), left);
                self.cubic_to(Point::new(cx - r, cy - k), Point::new(cx - k, cy - r), top);
            }
            Direction::Ccw => {
                self.cubic_to(Point::new(cx - k, cy - r), Point::new(cx - r, cy - k), left);
                self.cubic_to(Point::new(cx - r, cy + k), Point::new(cx - k, cy + r), bottom);
                self.cubic_to(Point::new(cx + k, cy + r), Point::new(cx + r, cy + k), right);
                self.cubic_to(Point::new(cx + r, cy - k), Point::new(cx + k, cy - r), top);
            }
        }
        self
    }

    // ---------------------------------------------------------------
    // Queries and transforms
    // ---------------------------------------------------------------

    /// Bounding box of every stored point, control points included.
    /// An empty path has an all-zero box.
    pub fn bounds(&self) -> Rect {
        let mut it = self.pts.iter();
        let Some(first) = it.next() else {
            return Rect::default();
        };
        let mut r = Rect::new(first.x, first.y, first.x, first.y);
        for p in it {
            r.add_point(*p);
        }
        r
    }

    /// Map every point through `m` in place.
    pub fn transform(&mut self, m: &TransAffine) {
        for p in &mut self.pts {
            *p = m.transform(*p);
        }
    }

    /// Copy of the path mapped through `m`.
    pub fn transformed(&self, m: &TransAffine) -> Path {
        let mut out = self.clone();
        out.transform(m);
        out
    }

    /// Lazy segment sequence with every contour closed.
    pub fn segments(&self) -> Segments<'_> {
        Segments {
            path: self,
            verb_idx: 0,
            pt_idx: 0,
            start: Point::default(),
            last: Point::default(),
            open: false,
        }
    }
}

// ============================================================================
// Segment iterator
// ============================================================================

/// Iterator returned by [`Path::segments`].
pub struct Segments<'a> {
    path: &'a Path,
    verb_idx: usize,
    pt_idx: usize,
    start: Point,
    last: Point,
    open: bool,
}

impl<'a> Segments<'a> {
    /// Line back to the contour start, if the contour is open and not
    /// already there.
    fn close_contour(&mut self) -> Option<Segment> {
        if !self.open {
            return None;
        }
        self.open = false;
        let seg = (self.last != self.start).then(|| Segment::Line(self.last, self.start));
        self.last = self.start;
        seg
    }

    fn take(&mut self, n: usize) -> &'a [Point] {
        let path: &'a Path = self.path;
        let s = &path.pts[self.pt_idx..self.pt_idx + n];
        self.pt_idx += n;
        s
    }
}

impl Iterator for Segments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        loop {
            let Some(&verb) = self.path.verbs.get(self.verb_idx) else {
                return self.close_contour();
            };
            self.verb_idx += 1;
            let from = self.last;
            match verb {
                Verb::Move => {
                    let closing = self.close_contour();
                    let p = self.take(1)[0];
                    self.start = p;
                    self.last = p;
                    self.open = true;
                    if closing.is_some() {
                        return closing;
                    }
                }
                Verb::Close => {
                    if let Some(seg) = self.close_contour() {
                        return Some(seg);
                    }
                }
                Verb::Line => {
                    let p = self.take(1)[0];
                    self.last = p;
                    self.open = true;
                    return Some(Segment::Line(from, p));
                }
                Verb::Quad => {
                    let (b, c) = {
                        let s = self.take(2);
                        (s[0], s[1])
                    };
                    self.last = c;
                    self.open = true;
                    return Some(Segment::Quad(from, b, c));
                }
                Verb::Cubic => {
                    let (b, c, d) = {
                        let s = self.take(3);
                        (s[0], s[1], s[2])
                    };
                    self.last = d;
                    self.open = true;
                    return Some(Segment::Cubic(from, b, c, d));
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

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_empty_path_has_no_segments() {
        let path = Path::new();
        assert!(path.is_empty());
        assert_eq!(path.segments().count(), 0);
        assert_eq!(path.bounds(), Rect::default());
    }

    #[test]
    fn test_triangle_closes_implicitly() {
        let mut path = Path::new();
        path.move_to(p(0.0, 0.0)).line_to(p(10.0, 0.0)).line_to(p(0.0, 10.0));
        let segs: Vec<Segment> = path.segments().collect();
        assert_eq!(
            segs,
            vec![
                Segment::Line(p(0.0, 0.0), p(10.0, 0.0)),
                Segment::Line(p(10.0, 0.0), p(0.0, 10.0)),
                Segment::Line(p(0.0, 10.0), p(0.0, 0.0)),
            ]
        );
    }

    #[test]
    fn test_explicit_close_is_not_doubled() {
        let mut path = Path::new();
        path.move_to(p(0.0, 0.0))
            .line_to(p(10.0, 0.0))
            .line_to(p(0.0, 10.0))
            .close();
        assert_eq!(path.segments().count(), 3);
    }

    #[test]
    fn test_two_contours_each_closed() {
        let mut path = Path::new();
        path.add_polygon(&[p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0)]);
        path.add_polygon(&[p(10.0, 10.0), p(14.0, 10.0), p(14.0, 14.0)]);
        let segs: Vec<Segment> = path.segments().collect();
        assert_eq!(segs.len(), 6);
        assert_eq!(segs[2], Segment::Line(p(4.0, 4.0), p(0.0, 0.0)));
        assert_eq!(segs[3], Segment::Line(p(10.0, 10.0), p(14.0, 10.0)));
        assert_eq!(segs[5], Segment::Line(p(14.0, 14.0), p(10.0, 10.0)));
    }

    #[test]
    fn test_curves_carry_start_point() {
        let mut path = Path::new();
        path.move_to(p(0.0, 0.0))
            .quad_to(p(5.0, 10.0), p(10.0, 0.0))
            .cubic_to(p(10.0, 5.0), p(5.0, 5.0), p(0.0, 0.0));
        let segs: Vec<Segment> = path.segments().collect();
        assert_eq!(
            segs,
            vec![
                Segment::Quad(p(0.0, 0.0), p(5.0, 10.0), p(10.0, 0.0)),
                Segment::Cubic(p(10.0, 0.0), p(10.0, 5.0), p(5.0, 5.0), p(0.0, 0.0)),
            ]
        );
    }

    #[test]
    fn test_line_after_close_starts_at_contour_start() {
        let mut path = Path::new();
        path.move_to(p(1.0, 1.0)).line_to(p(5.0, 1.0)).close();
        path.line_to(p(1.0, 5.0));
        let segs: Vec<Segment> = path.segments().collect();
        assert_eq!(segs[2], Segment::Line(p(1.0, 1.0), p(1.0, 5.0)));
    }

    #[test]
    fn test_add_rect_directions() {
        let r = Rect::new(1.0, 2.0, 5.0, 6.0);
        let mut cw = Path::new();
        cw.add_rect(&r, Direction::Cw);
        assert_eq!(cw.points(), &[p(1.0, 2.0), p(5.0, 2.0), p(5.0, 6.0), p(1.0, 6.0)]);
        let mut ccw = Path::new();
        ccw.add_rect(&r, Direction::Ccw);
        assert_eq!(ccw.points(), &[p(1.0, 2.0), p(1.0, 6.0), p(5.0, 6.0), p(5.0, 2.0)]);
    }

    #[test]
    fn test_add_circle_bounds() {
        let mut path = Path::new();
        path.add_circle(p(50.0, 40.0), 10.0, Direction::Ccw);
        assert_eq!(path.verbs().len(), 5);
        assert_eq!(path.bounds(), Rect::new(40.0, 30.0, 60.0, 50.0));
        let segs: Vec<Segment> = path.segments().collect();
        assert_eq!(segs.len(), 4);
        assert!(matches!(segs[0], Segment::Cubic(a, _, _, d) if a == p(50.0, 30.0) && d == p(40.0, 40.0)));
    }

    #[test]
    fn test_transform() {
        let mut path = Path::new();
        path.add_polygon(&[p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)]);
        let moved = path.transformed(&TransAffine::new_translation(10.0, 20.0));
        assert_eq!(moved.bounds(), Rect::new(10.0, 20.0, 11.0, 21.0));
        path.transform(&TransAffine::new_scaling(3.0, 2.0));
        assert_eq!(path.bounds(), Rect::new(0.0, 0.0, 3.0, 2.0));
    }
}
