//! Compositor — spans to pixels.
//!
//! Wraps the destination bitmap together with a resolved blend function and
//! a color source. Every span the scan converter emits is clipped to the
//! bitmap, colored, and blended into the destination row.

use crate::bitmap::Bitmap;
use crate::blend::{blend_fn, resolve_for_opaque, BlendFn, BlendMode};
use crate::color::Pixel;
use crate::scan_converter::SpanSink;
use crate::shader::ShaderContext;

// ============================================================================
// ColorSource
// ============================================================================

/// Where span colors come from.
#[derive(Debug)]
pub enum ColorSource<'s> {
    /// One premultiplied pixel for every covered pixel.
    Solid(Pixel),
    /// A shader bound to the current transform.
    Shader(ShaderContext<'s>),
}

impl ColorSource<'_> {
    pub fn is_opaque(&self) -> bool {
        match self {
            ColorSource::Solid(p) => p.is_opaque(),
            ColorSource::Shader(ctx) => ctx.is_opaque(),
        }
    }
}

// ============================================================================
// Compositor
// ============================================================================

/// Blends a color source into a bitmap, one span at a time.
pub struct Compositor<'d, 's> {
    dst: &'d mut Bitmap,
    mode: BlendMode,
    blend: BlendFn,
    source: ColorSource<'s>,
    row: Vec<Pixel>,
}

impl<'d, 's> Compositor<'d, 's> {
    /// Resolve `mode` against the source once; an opaque source turns
    /// src-over into src.
    pub fn new(dst: &'d mut Bitmap, mode: BlendMode, source: ColorSource<'s>) -> Self {
        let mode = resolve_for_opaque(mode, source.is_opaque());
        Self {
            dst,
            mode,
            blend: blend_fn(mode),
            source,
            row: Vec::new(),
        }
    }

    /// The mode actually used for blending.
    pub fn mode(&self) -> BlendMode {
        self.mode
    }

    /// True when blending cannot change the destination.
    pub fn is_noop(&self) -> bool {
        self.mode == BlendMode::Dst
    }

    /// Blend pixels `[x_start, x_end)` of row `y`. Parts outside the bitmap
    /// are clipped away.
    pub fn blit(&mut self, x_start: i32, x_end: i32, y: i32) {
        if self.is_noop() || y < 0 || y >= self.dst.height() as i32 {
            return;
        }
        let x0 = x_start.max(0);
        let x1 = x_end.min(self.dst.width() as i32);
        if x0 >= x1 {
            return;
        }
        let blend = self.blend;
        let dst_row = &mut self.dst.row_mut(y as u32)[x0 as usize..x1 as usize];

        match &mut self.source {
            ColorSource::Solid(src) => {
                let src = *src;
                for d in dst_row.iter_mut() {
                    *d = blend(src, *d);
                }
            }
            ColorSource::Shader(ctx) => {
                self.row.resize(dst_row.len(), Pixel::TRANSPARENT);
                ctx.shade_row(x0, y, &mut self.row);
                for (d, s) in dst_row.iter_mut().zip(&self.row) {
                    *d = blend(*s, *d);
                }
            }
        }
    }

    /// Blend every row of the destination.
    pub fn fill_all(&mut self) {
        let (w, h) = (self.dst.width() as i32, self.dst.height() as i32);
        for y in 0..h {
            self.blit(0, w, y);
        }
    }
}

impl SpanSink for Compositor<'_, '_> {
    fn span(&mut self, y: i32, x_start: i32, x_end: i32) {
        self.blit(x_start, x_end, y);
    }
}

// ============================================================================
// Tests
// ============================================================================
