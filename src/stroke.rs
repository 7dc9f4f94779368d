//! Stroking straight lines into fillable outlines.
//!
//! A stroked line is a rectangle `width` wide centered on the segment, plus
//! an optional cap at each end. Every generated contour winds the same way as
//! the body, so the result fills correctly under the nonzero rule even where
//! caps of neighbouring segments overlap.

use crate::basics::Point;
use crate::path::{Direction, Path};

/// Shape of a stroke's ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    /// Ends flush with the endpoints.
    #[default]
    Butt,
    /// Extends half the width past each endpoint.
    Square,
    /// Half-disc of radius `width / 2` around each endpoint.
    Round,
}

/// Append the outline of segment `p0`–`p1` stroked `width` wide to `path`.
pub fn add_line(path: &mut Path, p0: Point, p1: Point, width: f64, cap: LineCap) {
    let half = width * 0.5;
    if half <= 0.0 || half.is_nan() {
        log::trace!("stroke width {} draws nothing", width);
        return;
    }

    let v = p1 - p0;
    let len = v.length();
    if len == 0.0 || !len.is_finite() {
        add_point_cap(path, p0, half, cap);
        return;
    }

    let scale = half / len;
    // perpendicular offset and the offset along the segment, both `half` long
    let u = Point::new(-v.y * scale, v.x * scale);
    let along = v * scale;

    path.add_polygon(&[p0 + u, p1 + u, p1 - u, p0 - u]);

    match cap {
        LineCap::Butt => {}
        LineCap::Square => {
            path.add_polygon(&[p0 + u - along, p0 + u, p0 - u, p0 - u - along]);
            path.add_polygon(&[p1 + u, p1 + u + along, p1 - u + along, p1 - u]);
        }
        LineCap::Round => {
            // `u` is `along` turned a quarter clockwise, so the body always
            // runs counter-clockwise on screen
            path.add_circle(p0, half, Direction::Ccw);
            path.add_circle(p1, half, Direction::Ccw);
        }
    }
}

/// Stroke every segment of the open polyline `pts` with `cap` at both ends
/// of each segment. Round caps double as round joins.
pub fn add_polyline(path: &mut Path, pts: &[Point], width: f64, cap: LineCap) {
    for pair in pts.windows(2) {
        add_line(path, pair[0], pair[1], width, cap);
    }
}

/// Cap for a zero-length segment: a disc or an axis-aligned square.
fn add_point_cap(path: &mut Path, p: Point, half: f64, cap: LineCap) {
    match cap {
        LineCap::Butt => log::trace!("zero-length butt stroke draws nothing"),
        LineCap::Square => {
            path.add_polygon(&[
                Point::new(p.x - half, p.y - half),
                Point::new(p.x - half, p.y + half),
                Point::new(p.x + half, p.y + half),
                Point::new(p.x + half, p.y - half),
            ]);
        }
        LineCap::Round => {
            path.add_circle(p, half, Direction::Ccw);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
