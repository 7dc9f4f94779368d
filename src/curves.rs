//! Bezier curve evaluation, flattening counts and subdivision.
//!
//! Curves are flattened in closed form: the number of chords is computed up
//! front from the curve's second differences and the tolerance, then the
//! curve is walked in equal parameter steps. No recursion is involved.
//!
//! Also provides de Casteljau splitting: `chop_quad_at`, `chop_cubic_at`.

use crate::basics::Point;

// ============================================================================
// Constants
// ============================================================================

/// Upper bound on the number of chords a single curve may produce.
pub const MAX_CURVE_SEGMENTS: usize = 4096;

// ============================================================================
// Evaluation
// ============================================================================

/// Point on the quadratic `a, b, c` at parameter `t`, Horner form.
#[inline]
pub fn eval_quad(a: Point, b: Point, c: Point, t: f64) -> Point {
    let ka = a - b * 2.0 + c;
    let kb = (b - a) * 2.0;
    (ka * t + kb) * t + a
}

/// Point on the cubic `a, b, c, d` at parameter `t`, Horner form.
#[inline]
pub fn eval_cubic(a: Point, b: Point, c: Point, d: Point, t: f64) -> Point {
    let ka = (b - c) * 3.0 + d - a;
    let kb = (c - b * 2.0 + a) * 3.0;
    let kc = (b - a) * 3.0;
    ((ka * t + kb) * t + kc) * t + a
}

// ============================================================================
// Segment counts
// ============================================================================

fn clamp_count(n: f64) -> usize {
    if n.is_nan() || n > MAX_CURVE_SEGMENTS as f64 {
        MAX_CURVE_SEGMENTS
    } else if n < 1.0 {
        1
    } else {
        n as usize
    }
}

/// Chords needed so a quadratic stays within `tolerance` of its polyline:
/// `ceil(sqrt(|a - 2b + c| / tolerance))`, in `1..=MAX_CURVE_SEGMENTS`.
pub fn quad_segment_count(a: Point, b: Point, c: Point, tolerance: f64) -> usize {
    if tolerance <= 0.0 {
        return MAX_CURVE_SEGMENTS;
    }
    let dd = (a - b * 2.0 + c).length();
    clamp_count((dd / tolerance).sqrt().ceil())
}

/// Chords needed for a cubic:
/// `ceil(sqrt(3·max(|a - 2b + c|, |b - 2c + d|) / (4·tolerance)))`.
pub fn cubic_segment_count(a: Point, b: Point, c: Point, d: Point, tolerance: f64) -> usize {
    if tolerance <= 0.0 {
        return MAX_CURVE_SEGMENTS;
    }
    let d0 = (a - b * 2.0 + c).length();
    let d1 = (b - c * 2.0 + d).length();
    clamp_count((3.0 * d0.max(d1) / (4.0 * tolerance)).sqrt().ceil())
}

// ============================================================================
// Subdivision
// ============================================================================

/// Split a quadratic at `t`. The result holds the two halves sharing the
/// middle point: `[a, ab, mid, bc, c]`.
pub fn chop_quad_at(src: &[Point; 3], t: f64) -> [Point; 5] {
    let [a, b, c] = *src;
    let ab = a.lerp(b, t);
    let bc = b.lerp(c, t);
    let mid = ab.lerp(bc, t);
    [a, ab, mid, bc, c]
}

/// Split a cubic at `t` into two cubics sharing the middle point:
/// `[a, ab, abc, mid, bcd, cd, d]`.
pub fn chop_cubic_at(src: &[Point; 4], t: f64) -> [Point; 7] {
    let [a, b, c, d] = *src;
    let ab = a.lerp(b, t);
    let bc = b.lerp(c, t);
    let cd = c.lerp(d, t);
    let abc = ab.lerp(bc, t);
    let bcd = bc.lerp(cd, t);
    let mid = abc.lerp(bcd, t);
    [a, ab, abc, mid, bcd, cd, d]
}

// ============================================================================
// Tests
// ============================================================================
