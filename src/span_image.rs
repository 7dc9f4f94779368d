//! Bitmap shader.
//!
//! The bitmap's pixel grid is mapped through a local matrix into user space.
//! Device pixels are mapped back into the unit square of the image, folded
//! by the tile mode and then sampled, either from the nearest texel or
//! bilinearly from the four surrounding ones.

use crate::basics::iround;
use crate::bitmap::Bitmap;
use crate::color::Pixel;
use crate::shader::{pixel_center, TileMode};
use crate::trans_affine::TransAffine;

/// Texel filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    Nearest,
    Bilinear,
}

// ============================================================================
// BitmapShader
// ============================================================================

#[derive(Debug, Clone)]
pub struct BitmapShader<'a> {
    pub bitmap: &'a Bitmap,
    /// Image pixel space to user space.
    pub local: TransAffine,
    pub tile: TileMode,
    pub filter: FilterMode,
    opaque: bool,
}

impl<'a> BitmapShader<'a> {
    pub fn new(bitmap: &'a Bitmap, local: TransAffine, tile: TileMode, filter: FilterMode) -> Self {
        Self {
            bitmap,
            local,
            tile,
            filter,
            opaque: bitmap.is_opaque(),
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.opaque
    }

    /// Bind to `ctm`. Fails for an empty bitmap or a singular matrix.
    pub fn set_context(&self, ctm: &TransAffine) -> Option<BitmapContext<'_>> {
        let w = self.bitmap.width() as f64;
        let h = self.bitmap.height() as f64;
        let to_device = ctm
            .concat(&self.local)
            .concat(&TransAffine::new_scaling(w, h));
        let inverse = to_device.invert()?;
        Some(BitmapContext {
            shader: self,
            inverse,
        })
    }
}

// ============================================================================
// BitmapContext
// ============================================================================

#[derive(Debug)]
pub struct BitmapContext<'s> {
    shader: &'s BitmapShader<'s>,
    /// Device space to the image's unit square.
    inverse: TransAffine,
}

impl BitmapContext<'_> {
    pub fn is_opaque(&self) -> bool {
        self.shader.opaque
    }

    pub fn shade_row(&mut self, x: i32, y: i32, row: &mut [Pixel]) {
        let bm = self.shader.bitmap;
        let w = bm.width() as f64;
        let h = bm.height() as f64;
        for (i, out) in row.iter_mut().enumerate() {
            let q = self.inverse.transform(pixel_center(x, i, y));
            *out = match self.shader.filter {
                FilterMode::Nearest => self.sample_nearest(q.x * w, q.y * h),
                FilterMode::Bilinear => self.sample_bilinear(q.x * w - 0.5, q.y * h - 0.5),
            };
        }
    }

    /// Texel under the image-space point `(px, py)`.
    fn sample_nearest(&self, px: f64, py: f64) -> Pixel {
        let bm = self.shader.bitmap;
        let tile = self.shader.tile;
        let ix = tile.texel(px, bm.width() as i32);
        let iy = tile.texel(py, bm.height() as i32);
        bm.pixel(ix as u32, iy as u32)
    }

    /// Weighted average of the four texels around `(px, py)`, where texel
    /// centers sit on integer coordinates.
    fn sample_bilinear(&self, px: f64, py: f64) -> Pixel {
        let bm = self.shader.bitmap;
        let tile = self.shader.tile;
        let (w, h) = (bm.width() as i32, bm.height() as i32);

        let x0 = px.floor();
        let y0 = py.floor();
        let fx = px - x0;
        let fy = py - y0;

        let xa = tile.texel(x0, w) as u32;
        let xb = tile.texel(x0 + 1.0, w) as u32;
        let ya = tile.texel(y0, h) as u32;
        let yb = tile.texel(y0 + 1.0, h) as u32;

        let taps = [
            (bm.pixel(xa, ya), (1.0 - fx) * (1.0 - fy)),
            (bm.pixel(xb, ya), fx * (1.0 - fy)),
            (bm.pixel(xa, yb), (1.0 - fx) * fy),
            (bm.pixel(xb, yb), fx * fy),
        ];
        let mix = |ch: fn(Pixel) -> u32| -> u32 {
            let v: f64 = taps.iter().map(|&(p, k)| ch(p) as f64 * k).sum();
            iround(v).clamp(0, 255) as u32
        };
        Pixel::pack_argb(mix(Pixel::a), mix(Pixel::r), mix(Pixel::g), mix(Pixel::b))
    }
}

// ============================================================================
// Tests
// ============================================================================
