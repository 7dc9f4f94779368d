//! Color sources.
//!
//! A [`Shader`] describes where colors come from: a bitmap, a gradient, the
//! vertex colors of a triangle, a texture mapped onto a triangle, or the
//! product of two other shaders. It is immutable; before a draw the canvas
//! calls [`Shader::set_context`] with the current transform, which inverts
//! the combined matrix once and returns a [`ShaderContext`] that shades
//! device rows.
//!
//! Composed and texture shaders borrow their inputs, so the inputs always
//! outlive them.

use crate::basics::Point;
use crate::bitmap::Bitmap;
use crate::color::{div255, Color, Pixel};
use crate::span_gouraud::{TriColorContext, TriColorShader};
use crate::span_gradient::{GradientContext, GradientShader, GradientShape};
use crate::span_image::{BitmapContext, BitmapShader, FilterMode};
use crate::trans_affine::TransAffine;

// ============================================================================
// TileMode
// ============================================================================

/// How a shader extends beyond its unit domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileMode {
    /// Repeat the edge value.
    #[default]
    Clamp,
    /// Wrap around.
    Repeat,
    /// Wrap around, reversing every other period.
    Mirror,
}

impl TileMode {
    /// Fold a continuous parameter into `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        match self {
            TileMode::Clamp => t.clamp(0.0, 1.0),
            TileMode::Repeat => t - t.floor(),
            TileMode::Mirror => {
                let half = t * 0.5;
                let f = (half - half.floor()) * 2.0;
                if f > 1.0 {
                    2.0 - f
                } else {
                    f
                }
            }
        }
    }

    /// Texel index in `0..n` for the image-space coordinate `v`. The fold
    /// happens before the conversion to an integer, so any finite `v` is
    /// safe. NaN maps to texel 0. `n` must be positive.
    pub fn texel(self, v: f64, n: i32) -> i32 {
        debug_assert!(n > 0);
        let last = (n - 1) as f64;
        let f = v.floor();
        let folded = match self {
            TileMode::Clamp => f.clamp(0.0, last),
            TileMode::Repeat => f.rem_euclid(n as f64),
            TileMode::Mirror => {
                let p = f.rem_euclid(2.0 * n as f64);
                if p > last {
                    2.0 * last + 1.0 - p
                } else {
                    p
                }
            }
        };
        (folded as i32).clamp(0, n - 1)
    }
}

/// Device coordinate of the center of pixel `x + i` in row `y`.
#[inline]
pub(crate) fn pixel_center(x: i32, i: usize, y: i32) -> Point {
    Point::new(x as f64 + i as f64 + 0.5, y as f64 + 0.5)
}

// ============================================================================
// TriTextureShader
// ============================================================================

/// Maps the texture triangle `texs` onto the device triangle `pts` and
/// samples a borrowed shader through that mapping.
#[derive(Debug, Clone)]
pub struct TriTextureShader<'a> {
    pub inner: &'a Shader<'a>,
    /// `P ∘ T⁻¹`, or `None` when the texture triangle is degenerate.
    pub local: Option<TransAffine>,
}

impl<'a> TriTextureShader<'a> {
    pub fn new(inner: &'a Shader<'a>, pts: [Point; 3], texs: [Point; 3]) -> Self {
        let p = triangle_basis(pts);
        let local = triangle_basis(texs).invert().map(|t_inv| p.concat(&t_inv));
        Self { inner, local }
    }
}

/// Matrix mapping the unit triangle `(0,0) (1,0) (0,1)` onto `pts`.
pub fn triangle_basis(pts: [Point; 3]) -> TransAffine {
    TransAffine::from_basis(pts[1] - pts[0], pts[2] - pts[0], pts[0])
}

// ============================================================================
// Shader
// ============================================================================

/// A color source for fills.
#[derive(Debug, Clone)]
pub enum Shader<'a> {
    Bitmap(BitmapShader<'a>),
    Gradient(GradientShader),
    TriColor(TriColorShader),
    TriTexture(TriTextureShader<'a>),
    /// Channel-wise product of two shaders.
    Composed(&'a Shader<'a>, &'a Shader<'a>),
}

impl<'a> Shader<'a> {
    // ---------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------

    /// Sample `bitmap`, with its pixel grid mapped through `local` onto the
    /// rectangle `[0, width] × [0, height]`.
    pub fn bitmap(bitmap: &'a Bitmap, local: TransAffine, tile: TileMode, filter: FilterMode) -> Self {
        Shader::Bitmap(BitmapShader::new(bitmap, local, tile, filter))
    }

    /// Colors evenly spaced from `p0` to `p1`.
    pub fn linear_gradient(p0: Point, p1: Point, colors: &[Color], tile: TileMode) -> Self {
        Shader::Gradient(GradientShader::new(p0, p1, colors, tile, GradientShape::Linear))
    }

    /// Colors running outward from `center`, reaching the last stop at
    /// `radius`.
    pub fn radial_gradient(center: Point, radius: f64, colors: &[Color], tile: TileMode) -> Self {
        let p1 = center + Point::new(radius, 0.0);
        Shader::Gradient(GradientShader::new(center, p1, colors, tile, GradientShape::Radial))
    }

    /// Colors swept around `center`, starting from the direction of `p1`.
    pub fn sweep_gradient(center: Point, p1: Point, colors: &[Color], tile: TileMode) -> Self {
        Shader::Gradient(GradientShader::new(center, p1, colors, tile, GradientShape::Sweep))
    }

    /// Barycentric blend of three vertex colors.
    pub fn tri_color(pts: [Point; 3], colors: [Color; 3]) -> Self {
        Shader::TriColor(TriColorShader::new(pts, colors))
    }

    /// `inner` sampled through the texture coordinates of a triangle.
    pub fn tri_texture(inner: &'a Shader<'a>, pts: [Point; 3], texs: [Point; 3]) -> Self {
        Shader::TriTexture(TriTextureShader::new(inner, pts, texs))
    }

    /// Product of two shaders.
    pub fn composed(a: &'a Shader<'a>, b: &'a Shader<'a>) -> Self {
        Shader::Composed(a, b)
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// True when every pixel this shader produces has full alpha.
    pub fn is_opaque(&self) -> bool {
        match self {
            Shader::Bitmap(s) => s.is_opaque(),
            Shader::Gradient(s) => s.is_opaque(),
            Shader::TriColor(s) => s.is_opaque(),
            Shader::TriTexture(s) => s.inner.is_opaque(),
            Shader::Composed(a, b) => a.is_opaque() && b.is_opaque(),
        }
    }

    /// Prepare to shade under the transform `ctm`. Returns `None` when the
    /// combined matrix cannot be inverted.
    pub fn set_context(&self, ctm: &TransAffine) -> Option<ShaderContext<'_>> {
        match self {
            Shader::Bitmap(s) => s.set_context(ctm).map(ShaderContext::Bitmap),
            Shader::Gradient(s) => s.set_context(ctm).map(ShaderContext::Gradient),
            Shader::TriColor(s) => s.set_context(ctm).map(ShaderContext::TriColor),
            Shader::TriTexture(s) => {
                let local = s.local?;
                s.inner.set_context(&ctm.concat(&local))
            }
            Shader::Composed(a, b) => {
                let ca = a.set_context(ctm)?;
                let cb = b.set_context(ctm)?;
                Some(ShaderContext::Composed(Box::new(ComposedContext {
                    a: ca,
                    b: cb,
                    scratch: Vec::new(),
                })))
            }
        }
    }
}

// ============================================================================
// ShaderContext
// ============================================================================

/// A shader bound to a transform, ready to fill device rows.
#[derive(Debug)]
pub enum ShaderContext<'s> {
    Bitmap(BitmapContext<'s>),
    Gradient(GradientContext<'s>),
    TriColor(TriColorContext),
    Composed(Box<ComposedContext<'s>>),
}

impl ShaderContext<'_> {
    /// Shade `row.len()` pixels of device row `y`, starting at column `x`.
    /// Pixel `i` samples the device point `(x + i + 0.5, y + 0.5)`.
    pub fn shade_row(&mut self, x: i32, y: i32, row: &mut [Pixel]) {
        match self {
            ShaderContext::Bitmap(c) => c.shade_row(x, y, row),
            ShaderContext::Gradient(c) => c.shade_row(x, y, row),
            ShaderContext::TriColor(c) => c.shade_row(x, y, row),
            ShaderContext::Composed(c) => c.shade_row(x, y, row),
        }
    }

    pub fn is_opaque(&self) -> bool {
        match self {
            ShaderContext::Bitmap(c) => c.is_opaque(),
            ShaderContext::Gradient(c) => c.is_opaque(),
            ShaderContext::TriColor(c) => c.is_opaque(),
            ShaderContext::Composed(c) => c.a.is_opaque() && c.b.is_opaque(),
        }
    }
}

/// Context of a composed shader. Keeps a scratch row for the second input.
#[derive(Debug)]
pub struct ComposedContext<'s> {
    a: ShaderContext<'s>,
    b: ShaderContext<'s>,
    scratch: Vec<Pixel>,
}

impl ComposedContext<'_> {
    fn shade_row(&mut self, x: i32, y: i32, row: &mut [Pixel]) {
        self.a.shade_row(x, y, row);
        self.scratch.resize(row.len(), Pixel::TRANSPARENT);
        self.b.shade_row(x, y, &mut self.scratch);
        for (out, other) in row.iter_mut().zip(&self.scratch) {
            *out = modulate(*out, *other);
        }
    }
}

/// Channel-wise product of two premultiplied pixels.
#[inline]
pub fn modulate(a: Pixel, b: Pixel) -> Pixel {
    Pixel::pack_argb(
        div255(a.a() * b.a()),
        div255(a.r() * b.r()),
        div255(a.g() * b.g()),
        div255(a.b() * b.b()),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_tile_apply() {
        assert_eq!(TileMode::Clamp.apply(-0.5), 0.0);
        assert_eq!(TileMode::Clamp.apply(1.5), 1.0);
        assert!((TileMode::Repeat.apply(1.25) - 0.25).abs() < EPS);
        assert!((TileMode::Repeat.apply(-0.25) - 0.75).abs() < EPS);
        assert!((TileMode::Mirror.apply(0.25) - 0.25).abs() < EPS);
        assert!((TileMode::Mirror.apply(1.25) - 0.75).abs() < EPS);
        assert!((TileMode::Mirror.apply(-0.25) - 0.25).abs() < EPS);
    }

    #[test]
    fn test_tile_texel() {
        assert_eq!(TileMode::Clamp.texel(-3.0, 4), 0);
        assert_eq!(TileMode::Clamp.texel(9.5, 4), 3);
        assert_eq!(TileMode::Clamp.texel(2.99, 4), 2);
        assert_eq!(TileMode::Repeat.texel(5.0, 4), 1);
        assert_eq!(TileMode::Repeat.texel(-1.0, 4), 3);
        assert_eq!(TileMode::Repeat.texel(-0.25, 4), 3);
        assert_eq!(TileMode::Mirror.texel(4.0, 4), 3);
        assert_eq!(TileMode::Mirror.texel(7.0, 4), 0);
        assert_eq!(TileMode::Mirror.texel(8.0, 4), 0);
        assert_eq!(TileMode::Mirror.texel(-1.0, 4), 0);
        assert_eq!(TileMode::Mirror.texel(-5.0, 4), 3);
    }

    #[test]
    fn test_tile_texel_far_outside_i32() {
        // well beyond i32 range, still folded into the image
        for &v in &[1.0e10, -1.0e10, 3.0e15, -7.5e18, f64::MAX, f64::MIN] {
            for &tile in &[TileMode::Clamp, TileMode::Repeat, TileMode::Mirror] {
                let i = tile.texel(v, 3);
                assert!((0..3).contains(&i), "{:?} {} -> {}", tile, v, i);
            }
        }
        assert_eq!(TileMode::Clamp.texel(1.0e10, 3), 2);
        assert_eq!(TileMode::Clamp.texel(-1.0e10, 3), 0);
        // 1e10 = 3 * 3333333333 + 1
        assert_eq!(TileMode::Repeat.texel(1.0e10, 3), 1);
        assert_eq!(TileMode::Repeat.texel(-1.0e10, 3), 2);
        assert_eq!(TileMode::Clamp.texel(f64::NAN, 3), 0);
    }

    #[test]
    fn test_modulate() {
        let white = Pixel(0xFFFF_FFFF);
        let red = Pixel(0xFFFF_0000);
        assert_eq!(modulate(white, red), red);
        assert_eq!(modulate(red, Pixel::TRANSPARENT), Pixel::TRANSPARENT);
        let half = Pixel::pack_argb(128, 128, 128, 128);
        assert_eq!(modulate(half, white), half);
    }

    #[test]
    fn test_composed_context() {
        let pts = [p(0.0, 0.0), p(10.0, 0.0), p(0.0, 10.0)];
        let white = Shader::tri_color(pts, [Color::WHITE; 3]);
        let red = Shader::tri_color(pts, [Color::rgb(1.0, 0.0, 0.0); 3]);
        let both = Shader::composed(&white, &red);
        assert!(both.is_opaque());
        let mut ctx = both.set_context(&TransAffine::new()).unwrap();
        assert!(ctx.is_opaque());
        let mut row = [Pixel::TRANSPARENT; 3];
        ctx.shade_row(1, 1, &mut row);
        assert!(row.iter().all(|&px| px == Pixel(0xFFFF_0000)));
    }

    #[test]
    fn test_composed_needs_both_contexts() {
        let good = Shader::tri_color([p(0.0, 0.0), p(10.0, 0.0), p(0.0, 10.0)], [Color::WHITE; 3]);
        let flat = Shader::tri_color([p(0.0, 0.0), p(10.0, 0.0), p(20.0, 0.0)], [Color::WHITE; 3]);
        assert!(Shader::composed(&good, &flat).set_context(&TransAffine::new()).is_none());
        assert!(Shader::composed(&flat, &good).set_context(&TransAffine::new()).is_none());
    }

    #[test]
    fn test_tri_texture_maps_texture_onto_triangle() {
        // texture: a red-to-blue linear gradient over x in [0, 4]
        let grad = Shader::linear_gradient(
            p(0.0, 0.0),
            p(4.0, 0.0),
            &[Color::rgb(1.0, 0.0, 0.0), Color::rgb(0.0, 0.0, 1.0)],
            TileMode::Clamp,
        );
        // texture triangle is scaled by 25 onto the device triangle
        let tex = Shader::tri_texture(
            &grad,
            [p(0.0, 0.0), p(100.0, 0.0), p(0.0, 100.0)],
            [p(0.0, 0.0), p(4.0, 0.0), p(0.0, 4.0)],
        );
        let mut ctx = tex.set_context(&TransAffine::new()).unwrap();
        let mut row = [Pixel::TRANSPARENT; 100];
        ctx.shade_row(0, 10, &mut row);
        assert_eq!(row[0].r(), 255 - 1); // t = 0.5 / 100
        assert!(row[99].b() >= 254);
        assert!(row[50].r() > 120 && row[50].r() < 135);
    }

    #[test]
    fn test_tri_texture_degenerate_texture() {
        let grad = Shader::linear_gradient(p(0.0, 0.0), p(4.0, 0.0), &[Color::WHITE], TileMode::Clamp);
        let tex = Shader::tri_texture(
            &grad,
            [p(0.0, 0.0), p(100.0, 0.0), p(0.0, 100.0)],
            [p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0)],
        );
        assert!(tex.set_context(&TransAffine::new()).is_none());
    }
}
