//! Affine transformation matrix.
//!
//! A 2×3 matrix mapping user space to device space. The canvas keeps a stack
//! of these; shaders invert the composed matrix to map device pixels back
//! into their own parameter space.

use crate::basics::Point;

/// Epsilon for affine matrix comparisons.
pub const AFFINE_EPSILON: f64 = 1e-14;

/// 2D affine transformation matrix.
///
/// Stores six components `[sx, shy, shx, sy, tx, ty]` representing:
///
/// ```text
///   | sx  shx tx |
///   | shy  sy ty |
///   |  0    0  1 |
/// ```
///
/// Transform: `x' = x*sx + y*shx + tx`, `y' = x*shy + y*sy + ty`.
#[derive(Debug, Clone, Copy)]
pub struct TransAffine {
    pub sx: f64,
    pub shy: f64,
    pub shx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl TransAffine {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Identity matrix.
    pub const fn new() -> Self {
        Self {
            sx: 1.0,
            shy: 0.0,
            shx: 0.0,
            sy: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Custom matrix from six components.
    pub const fn new_custom(sx: f64, shy: f64, shx: f64, sy: f64, tx: f64, ty: f64) -> Self {
        Self {
            sx,
            shy,
            shx,
            sy,
            tx,
            ty,
        }
    }

    /// Matrix whose columns are the images of the x axis, the y axis and the
    /// origin: maps `(1,0)` to `origin + u`, `(0,1)` to `origin + v`.
    pub fn from_basis(u: Point, v: Point, origin: Point) -> Self {
        Self::new_custom(u.x, u.y, v.x, v.y, origin.x, origin.y)
    }

    /// Translation matrix.
    pub fn new_translation(x: f64, y: f64) -> Self {
        Self::new_custom(1.0, 0.0, 0.0, 1.0, x, y)
    }

    /// Non-uniform scaling matrix.
    pub fn new_scaling(x: f64, y: f64) -> Self {
        Self::new_custom(x, 0.0, 0.0, y, 0.0, 0.0)
    }

    /// Rotation matrix (radians, y axis pointing down rotates clockwise).
    pub fn new_rotation(a: f64) -> Self {
        let (sa, ca) = a.sin_cos();
        Self::new_custom(ca, sa, -sa, ca, 0.0, 0.0)
    }

    // ====================================================================
    // Composition
    // ====================================================================

    /// `self ∘ m`: the result applies `m` first, then `self`.
    pub fn concat(&self, m: &TransAffine) -> TransAffine {
        TransAffine {
            sx: self.sx * m.sx + self.shx * m.shy,
            shx: self.sx * m.shx + self.shx * m.sy,
            tx: self.sx * m.tx + self.shx * m.ty + self.tx,
            shy: self.shy * m.sx + self.sy * m.shy,
            sy: self.shy * m.shx + self.sy * m.sy,
            ty: self.shy * m.tx + self.sy * m.ty + self.ty,
        }
    }

    /// Inverse matrix, or `None` when the determinant is zero (or not finite).
    pub fn invert(&self) -> Option<TransAffine> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let d = 1.0 / det;
        Some(TransAffine {
            sx: self.sy * d,
            shx: -self.shx * d,
            tx: (self.shx * self.ty - self.tx * self.sy) * d,
            shy: -self.shy * d,
            sy: self.sx * d,
            ty: (self.tx * self.shy - self.sx * self.ty) * d,
        })
    }

    // ====================================================================
    // Transformations
    // ====================================================================

    /// Map a single point.
    #[inline]
    pub fn transform(&self, p: Point) -> Point {
        Point::new(
            p.x * self.sx + p.y * self.shx + self.tx,
            p.x * self.shy + p.y * self.sy + self.ty,
        )
    }

    /// Map `src` into `dst` point by point. Both slices must have the same
    /// length.
    pub fn map_points(&self, dst: &mut [Point], src: &[Point]) {
        assert_eq!(dst.len(), src.len(), "map_points length mismatch");
        for (d, s) in dst.iter_mut().zip(src) {
            *d = self.transform(*s);
        }
    }

    // ====================================================================
    // Auxiliary
    // ====================================================================

    /// Determinant of the 2x2 portion.
    #[inline]
    pub fn determinant(&self) -> f64 {
        self.sx * self.sy - self.shy * self.shx
    }

    /// Check if this is an identity matrix.
    pub fn is_identity(&self, epsilon: f64) -> bool {
        self.is_equal(&TransAffine::new(), epsilon)
    }

    /// Check if two matrices are equal within an absolute epsilon.
    pub fn is_equal(&self, m: &TransAffine, epsilon: f64) -> bool {
        (self.sx - m.sx).abs() <= epsilon
            && (self.shy - m.shy).abs() <= epsilon
            && (self.shx - m.shx).abs() <= epsilon
            && (self.sy - m.sy).abs() <= epsilon
            && (self.tx - m.tx).abs() <= epsilon
            && (self.ty - m.ty).abs() <= epsilon
    }
}

impl Default for TransAffine {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for TransAffine {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other, AFFINE_EPSILON)
    }
}

/// `a * b` is `a.concat(&b)`: `b` is applied first.
impl core::ops::Mul for TransAffine {
    type Output = TransAffine;
    fn mul(self, rhs: TransAffine) -> TransAffine {
        self.concat(&rhs)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-10;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn test_identity() {
        let m = TransAffine::new();
        assert!(m.is_identity(AFFINE_EPSILON));
        assert_eq!(m.determinant(), 1.0);
        assert_eq!(m.transform(Point::new(3.0, 4.0)), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_translation_and_scaling() {
        let t = TransAffine::new_translation(10.0, 20.0);
        assert!(close(t.transform(Point::new(5.0, 3.0)), Point::new(15.0, 23.0)));
        let s = TransAffine::new_scaling(2.0, 3.0);
        assert!(close(s.transform(Point::new(5.0, 4.0)), Point::new(10.0, 12.0)));
    }

    #[test]
    fn test_rotation_90() {
        let m = TransAffine::new_rotation(PI / 2.0);
        assert!(close(m.transform(Point::new(1.0, 0.0)), Point::new(0.0, 1.0)));
    }

    #[test]
    fn test_concat_applies_right_operand_first() {
        let t = TransAffine::new_translation(10.0, 0.0);
        let s = TransAffine::new_scaling(2.0, 2.0);
        // scale first, then translate
        let ts = t.concat(&s);
        assert!(close(ts.transform(Point::new(1.0, 1.0)), Point::new(12.0, 2.0)));
        // translate first, then scale
        let st = s * t;
        assert!(close(st.transform(Point::new(1.0, 1.0)), Point::new(22.0, 2.0)));
    }

    #[test]
    fn test_invert_roundtrip() {
        let m = TransAffine::new_translation(7.0, -3.0)
            * TransAffine::new_rotation(0.3)
            * TransAffine::new_scaling(2.0, 0.5);
        let inv = m.invert().unwrap();
        let p = Point::new(12.5, -4.25);
        assert!(close(inv.transform(m.transform(p)), p));
        assert!((m * inv).is_identity(1e-12));
    }

    #[test]
    fn test_invert_degenerate() {
        assert!(TransAffine::new_scaling(0.0, 1.0).invert().is_none());
        let collapsed = TransAffine::new_custom(1.0, 2.0, 2.0, 4.0, 0.0, 0.0);
        assert!(collapsed.invert().is_none());
    }

    #[test]
    fn test_from_basis() {
        let m = TransAffine::from_basis(
            Point::new(10.0, 0.0),
            Point::new(0.0, 5.0),
            Point::new(1.0, 2.0),
        );
        assert!(close(m.transform(Point::new(1.0, 0.0)), Point::new(11.0, 2.0)));
        assert!(close(m.transform(Point::new(0.0, 1.0)), Point::new(1.0, 7.0)));
    }

    #[test]
    fn test_map_points() {
        let m = TransAffine::new_translation(1.0, 1.0);
        let src = [Point::new(0.0, 0.0), Point::new(2.0, 3.0)];
        let mut dst = [Point::default(); 2];
        m.map_points(&mut dst, &src);
        assert_eq!(dst, [Point::new(1.0, 1.0), Point::new(3.0, 4.0)]);
    }
}
