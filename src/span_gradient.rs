//! Gradient shader.
//!
//! Colors are evenly spaced stops. The local frame puts `p0` at the origin
//! and `p1` at `(1, 0)`; a shape function reduces a point in that frame to a
//! scalar `t`, the tile mode folds `t` into `[0, 1]`, and `t` picks the color
//! by interpolating the two nearest stops.

use core::f64::consts::PI;

use crate::basics::{ifloor, Point};
use crate::color::{Color, Pixel};
use crate::shader::{pixel_center, TileMode};
use crate::trans_affine::TransAffine;

// ============================================================================
// Gradient shape functions
// ============================================================================

/// How a point in the gradient frame maps to the color parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientShape {
    /// Distance along `p0 → p1`.
    #[default]
    Linear,
    /// Distance from `p0`, in units of `|p1 - p0|`.
    Radial,
    /// Angle around `p0`, normalized to `[0, 1)`.
    Sweep,
}

impl GradientShape {
    #[inline]
    pub fn calculate(self, x: f64, y: f64) -> f64 {
        match self {
            GradientShape::Linear => x,
            GradientShape::Radial => (x * x + y * y).sqrt(),
            GradientShape::Sweep => (x.atan2(y) + PI) / (2.0 * PI),
        }
    }
}

// ============================================================================
// GradientShader
// ============================================================================

/// Evenly spaced color stops between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientShader {
    pub colors: Vec<Color>,
    pub tile: TileMode,
    pub shape: GradientShape,
    /// Gradient frame to user space.
    pub local: TransAffine,
}

impl GradientShader {
    pub fn new(p0: Point, p1: Point, colors: &[Color], tile: TileMode, shape: GradientShape) -> Self {
        let d = p1 - p0;
        // x axis along p0 → p1, y axis perpendicular with the same length
        let local = TransAffine::new_custom(d.x, d.y, d.y, -d.x, p0.x, p0.y);
        Self {
            colors: colors.to_vec(),
            tile,
            shape,
            local,
        }
    }

    pub fn is_opaque(&self) -> bool {
        !self.colors.is_empty() && self.colors.iter().all(Color::is_opaque)
    }

    pub fn set_context(&self, ctm: &TransAffine) -> Option<GradientContext<'_>> {
        let inverse = ctm.concat(&self.local).invert()?;
        Some(GradientContext {
            shader: self,
            inverse,
        })
    }

    /// Color for parameter `t`, before tiling.
    pub fn color_at(&self, t: f64) -> Color {
        let n = self.colors.len();
        match n {
            0 => return Color::TRANSPARENT,
            1 => return self.colors[0],
            _ => {}
        }
        let t = self.tile.apply(t);
        if t <= 0.0 || t.is_nan() {
            return self.colors[0];
        }
        if t >= 1.0 {
            return self.colors[n - 1];
        }
        let loc = t * (n - 1) as f64;
        let index = (ifloor(loc).max(0) as usize).min(n - 2);
        let w = loc - index as f64;
        self.colors[index].lerp(&self.colors[index + 1], w)
    }
}

// ============================================================================
// GradientContext
// ============================================================================

#[derive(Debug)]
pub struct GradientContext<'s> {
    shader: &'s GradientShader,
    /// Device space to gradient frame.
    inverse: TransAffine,
}

impl GradientContext<'_> {
    pub fn is_opaque(&self) -> bool {
        self.shader.is_opaque()
    }

    pub fn shade_row(&mut self, x: i32, y: i32, row: &mut [Pixel]) {
        let shape = self.shader.shape;
        for (i, out) in row.iter_mut().enumerate() {
            let q = self.inverse.transform(pixel_center(x, i, y));
            let t = shape.calculate(q.x, q.y);
            *out = self.shader.color_at(t).to_pixel();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;
    const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_shape_functions() {
        assert_eq!(GradientShape::Linear.calculate(0.3, 9.0), 0.3);
        assert!((GradientShape::Radial.calculate(3.0, 4.0) - 5.0).abs() < EPS);
        assert!((GradientShape::Sweep.calculate(0.0, 1.0) - 0.5).abs() < EPS);
        let s = GradientShape::Sweep.calculate(1.0, 0.0);
        assert!((s - 0.75).abs() < EPS);
    }

    #[test]
    fn test_local_frame_maps_p1_to_unit_x() {
        let g = GradientShader::new(p(10.0, 20.0), p(30.0, 20.0), &[RED, BLUE], TileMode::Clamp, GradientShape::Linear);
        let inv = g.local.invert().unwrap();
        let q = inv.transform(p(30.0, 20.0));
        assert!((q.x - 1.0).abs() < EPS && q.y.abs() < EPS);
        let q = inv.transform(p(20.0, 20.0));
        assert!((q.x - 0.5).abs() < EPS);
    }

    #[test]
    fn test_color_at_stops() {
        let g = GradientShader::new(p(0.0, 0.0), p(1.0, 0.0), &[RED, Color::WHITE, BLUE], TileMode::Clamp, GradientShape::Linear);
        assert_eq!(g.color_at(-1.0), RED);
        assert_eq!(g.color_at(0.0), RED);
        assert_eq!(g.color_at(0.5), Color::WHITE);
        assert_eq!(g.color_at(1.0), BLUE);
        assert_eq!(g.color_at(7.0), BLUE);
        let c = g.color_at(0.25);
        assert!((c.r - 1.0).abs() < EPS && (c.g - 0.5).abs() < EPS);
    }

    #[test]
    fn test_color_at_repeat_and_mirror() {
        let rep = GradientShader::new(p(0.0, 0.0), p(1.0, 0.0), &[RED, BLUE], TileMode::Repeat, GradientShape::Linear);
        let c = rep.color_at(1.25);
        assert!((c.r - 0.75).abs() < EPS);
        let mir = GradientShader::new(p(0.0, 0.0), p(1.0, 0.0), &[RED, BLUE], TileMode::Mirror, GradientShape::Linear);
        let c = mir.color_at(1.25);
        assert!((c.b - 0.75).abs() < EPS);
    }

    #[test]
    fn test_zero_and_one_stop() {
        let none = GradientShader::new(p(0.0, 0.0), p(1.0, 0.0), &[], TileMode::Clamp, GradientShape::Linear);
        assert_eq!(none.color_at(0.5), Color::TRANSPARENT);
        assert!(!none.is_opaque());
        let one = GradientShader::new(p(0.0, 0.0), p(1.0, 0.0), &[BLUE], TileMode::Clamp, GradientShape::Radial);
        assert_eq!(one.color_at(0.5), BLUE);
        assert!(one.is_opaque());
    }

    #[test]
    fn test_degenerate_points_have_no_context() {
        let g = GradientShader::new(p(5.0, 5.0), p(5.0, 5.0), &[RED, BLUE], TileMode::Clamp, GradientShape::Linear);
        assert!(g.set_context(&TransAffine::new()).is_none());
    }

    #[test]
    fn test_shade_row_linear() {
        let g = GradientShader::new(p(0.0, 0.0), p(10.0, 0.0), &[RED, BLUE], TileMode::Clamp, GradientShape::Linear);
        let mut ctx = g.set_context(&TransAffine::new()).unwrap();
        let mut row = [Pixel::TRANSPARENT; 12];
        ctx.shade_row(0, 3, &mut row);
        // pixel 0 samples t = 0.05
        assert_eq!(row[0], Color::rgb(0.95, 0.0, 0.05).to_pixel());
        assert_eq!(row[10], BLUE.to_pixel());
        assert_eq!(row[11], BLUE.to_pixel());
        assert!(row.iter().all(|px| px.is_opaque()));
    }

    #[test]
    fn test_shade_row_follows_ctm() {
        let g = GradientShader::new(p(0.0, 0.0), p(10.0, 0.0), &[RED, BLUE], TileMode::Clamp, GradientShape::Linear);
        let ctm = TransAffine::new_scaling(2.0, 2.0);
        let mut ctx = g.set_context(&ctm).unwrap();
        let mut row = [Pixel::TRANSPARENT; 1];
        // device x 10.5 is user x 5.25
        ctx.shade_row(10, 0, &mut row);
        assert_eq!(row[0], RED.lerp(&BLUE, 0.525).to_pixel());
    }

    #[test]
    fn test_radial_shade() {
        let g = GradientShader::new(p(50.0, 50.0), p(60.0, 50.0), &[Color::WHITE, Color::BLACK], TileMode::Clamp, GradientShape::Radial);
        let mut ctx = g.set_context(&TransAffine::new()).unwrap();
        let mut row = [Pixel::TRANSPARENT; 1];
        ctx.shade_row(49, 49, &mut row);
        // sample (49.5, 49.5) is about 0.07 from the center
        assert!(row[0].r() > 230);
        ctx.shade_row(70, 49, &mut row);
        assert_eq!(row[0], Color::BLACK.to_pixel());
    }
}
