//! Porter-Duff blend modes on premultiplied pixels.
//!
//! Each operator is a pure `fn(src, dst) -> Pixel` working on 8-bit
//! premultiplied channels with integer math and [`div255`]. The same formula
//! applies to all four channels, alpha included. A draw call resolves its
//! mode to a [`BlendFn`] once and calls it for every pixel.

use crate::color::{div255, Pixel};

// ============================================================================
// BlendMode enum — the 12 Porter-Duff operators
// ============================================================================

/// Pixel compositing rule.
///
/// `S` is the source pixel, `D` the destination, `Sa`/`Da` their alphas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BlendMode {
    /// 0
    Clear = 0,
    /// S
    Src = 1,
    /// D
    Dst = 2,
    /// S + (1 - Sa)·D
    SrcOver = 3,
    /// D + (1 - Da)·S
    DstOver = 4,
    /// Da·S
    SrcIn = 5,
    /// Sa·D
    DstIn = 6,
    /// (1 - Da)·S
    SrcOut = 7,
    /// (1 - Sa)·D
    DstOut = 8,
    /// Da·S + (1 - Sa)·D
    SrcATop = 9,
    /// Sa·D + (1 - Da)·S
    DstATop = 10,
    /// (1 - Sa)·D + (1 - Da)·S
    Xor = 11,
}

impl Default for BlendMode {
    fn default() -> Self {
        BlendMode::SrcOver
    }
}

impl BlendMode {
    /// Every mode, in code order.
    pub const ALL: [BlendMode; 12] = [
        BlendMode::Clear,
        BlendMode::Src,
        BlendMode::Dst,
        BlendMode::SrcOver,
        BlendMode::DstOver,
        BlendMode::SrcIn,
        BlendMode::DstIn,
        BlendMode::SrcOut,
        BlendMode::DstOut,
        BlendMode::SrcATop,
        BlendMode::DstATop,
        BlendMode::Xor,
    ];

    /// Decode a numeric mode code. Unknown codes fall back to `Src`.
    pub fn from_raw(code: u32) -> BlendMode {
        match Self::ALL.get(code as usize) {
            Some(&mode) => mode,
            None => {
                log::warn!("unknown blend mode code {}, using src", code);
                BlendMode::Src
            }
        }
    }

    /// Lower-case name as used by the demos (`"src-over"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            BlendMode::Clear => "clear",
            BlendMode::Src => "src",
            BlendMode::Dst => "dst",
            BlendMode::SrcOver => "src-over",
            BlendMode::DstOver => "dst-over",
            BlendMode::SrcIn => "src-in",
            BlendMode::DstIn => "dst-in",
            BlendMode::SrcOut => "src-out",
            BlendMode::DstOut => "dst-out",
            BlendMode::SrcATop => "src-atop",
            BlendMode::DstATop => "dst-atop",
            BlendMode::Xor => "xor",
        }
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// A resolved blend operator.
pub type BlendFn = fn(Pixel, Pixel) -> Pixel;

/// Function pointer for `mode`.
pub fn blend_fn(mode: BlendMode) -> BlendFn {
    match mode {
        BlendMode::Clear => blend_clear,
        BlendMode::Src => blend_src,
        BlendMode::Dst => blend_dst,
        BlendMode::SrcOver => blend_src_over,
        BlendMode::DstOver => blend_dst_over,
        BlendMode::SrcIn => blend_src_in,
        BlendMode::DstIn => blend_dst_in,
        BlendMode::SrcOut => blend_src_out,
        BlendMode::DstOut => blend_dst_out,
        BlendMode::SrcATop => blend_src_atop,
        BlendMode::DstATop => blend_dst_atop,
        BlendMode::Xor => blend_xor,
    }
}

/// Simplify `mode` for a source known to be fully opaque: src-over then
/// behaves exactly like src.
pub fn resolve_for_opaque(mode: BlendMode, src_opaque: bool) -> BlendMode {
    if src_opaque && mode == BlendMode::SrcOver {
        BlendMode::Src
    } else {
        mode
    }
}

/// Apply `f` to the four channel pairs.
#[inline]
fn per_channel(s: Pixel, d: Pixel, f: impl Fn(u32, u32) -> u32) -> Pixel {
    Pixel::pack_argb(f(s.a(), d.a()), f(s.r(), d.r()), f(s.g(), d.g()), f(s.b(), d.b()))
}

// ============================================================================
// Per-operator blend functions
// ============================================================================

// ---- Clear: 0
pub fn blend_clear(_s: Pixel, _d: Pixel) -> Pixel {
    Pixel::TRANSPARENT
}

// ---- Src: S
pub fn blend_src(s: Pixel, _d: Pixel) -> Pixel {
    s
}

// ---- Dst: D
pub fn blend_dst(_s: Pixel, d: Pixel) -> Pixel {
    d
}

// ---- SrcOver: S + div255((255 - Sa)·D)
pub fn blend_src_over(s: Pixel, d: Pixel) -> Pixel {
    let isa = 255 - s.a();
    per_channel(s, d, |sc, dc| sc + div255(isa * dc))
}

// ---- DstOver: D + div255((255 - Da)·S)
pub fn blend_dst_over(s: Pixel, d: Pixel) -> Pixel {
    let ida = 255 - d.a();
    per_channel(s, d, |sc, dc| dc + div255(ida * sc))
}

// ---- SrcIn: div255(Da·S)
pub fn blend_src_in(s: Pixel, d: Pixel) -> Pixel {
    let da = d.a();
    per_channel(s, d, |sc, _| div255(da * sc))
}

// ---- DstIn: div255(Sa·D)
pub fn blend_dst_in(s: Pixel, d: Pixel) -> Pixel {
    let sa = s.a();
    per_channel(s, d, |_, dc| div255(sa * dc))
}

// ---- SrcOut: div255((255 - Da)·S)
pub fn blend_src_out(s: Pixel, d: Pixel) -> Pixel {
    let ida = 255 - d.a();
    per_channel(s, d, |sc, _| div255(ida * sc))
}

// ---- DstOut: div255((255 - Sa)·D)
pub fn blend_dst_out(s: Pixel, d: Pixel) -> Pixel {
    let isa = 255 - s.a();
    per_channel(s, d, |_, dc| div255(isa * dc))
}

// ---- SrcATop: div255(Da·S + (255 - Sa)·D)
pub fn blend_src_atop(s: Pixel, d: Pixel) -> Pixel {
    let da = d.a();
    let isa = 255 - s.a();
    per_channel(s, d, |sc, dc| div255(da * sc + isa * dc))
}

// ---- DstATop: div255(Sa·D + (255 - Da)·S)
pub fn blend_dst_atop(s: Pixel, d: Pixel) -> Pixel {
    let sa = s.a();
    let ida = 255 - d.a();
    per_channel(s, d, |sc, dc| div255(sa * dc + ida * sc))
}

// ---- Xor: div255((255 - Sa)·D + (255 - Da)·S)
pub fn blend_xor(s: Pixel, d: Pixel) -> Pixel {
    let isa = 255 - s.a();
    let ida = 255 - d.a();
    per_channel(s, d, |sc, dc| div255(isa * dc + ida * sc))
}

// ============================================================================
// Tests
// ============================================================================
