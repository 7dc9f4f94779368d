//! Color types and operations.
//!
//! Two representations are used throughout the crate:
//! - `Color` — unpremultiplied f64 RGBA, the user-facing paint color
//! - `Pixel` — 32-bit premultiplied ARGB, the only thing compositing sees
//!
//! Conversion from `Color` to `Pixel` happens once per solid fill or once per
//! shaded sample.

use crate::basics::iround;

// ============================================================================
// Integer helpers
// ============================================================================

/// Divide by 255 with rounding, exact for every product of two bytes.
///
/// `n` is expected in `0..=255*255`.
#[inline]
pub fn div255(n: u32) -> u32 {
    let n = n + 128;
    (n + (n >> 8)) >> 8
}

// ============================================================================
// Color — unpremultiplied f64 RGBA
// ============================================================================

/// Unpremultiplied RGBA color with f64 components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Clamp every channel into `[0, 1]`.
    pub fn pin_to_unit(&self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    /// Channel-wise interpolation, `t = 0` gives `self`.
    pub fn lerp(&self, other: &Color, t: f64) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// Premultiply and pack. Channels are pinned to the unit range first, so
    /// out-of-range input can never overflow a byte.
    pub fn to_pixel(&self) -> Pixel {
        let c = self.pin_to_unit();
        let a = iround(c.a * 255.0) as u32;
        let r = iround(c.r * c.a * 255.0) as u32;
        let g = iround(c.g * c.a * 255.0) as u32;
        let b = iround(c.b * c.a * 255.0) as u32;
        Pixel::pack_argb(a, r, g, b)
    }
}

impl core::ops::Add for Color {
    type Output = Color;
    fn add(self, o: Color) -> Color {
        Color::rgba(self.r + o.r, self.g + o.g, self.b + o.b, self.a + o.a)
    }
}

impl core::ops::Mul<f64> for Color {
    type Output = Color;
    fn mul(self, k: f64) -> Color {
        Color::rgba(self.r * k, self.g * k, self.b * k, self.a * k)
    }
}

// ============================================================================
// Pixel — premultiplied ARGB packed in a u32
// ============================================================================

/// Premultiplied 32-bit pixel, alpha in the top byte (`0xAARRGGBB`).
///
/// Every color channel is `<=` alpha for pixels produced by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Pixel(pub u32);

impl Pixel {
    pub const TRANSPARENT: Pixel = Pixel(0);

    /// Pack four channels, each expected in `0..=255`.
    #[inline]
    pub const fn pack_argb(a: u32, r: u32, g: u32, b: u32) -> Pixel {
        Pixel((a << 24) | (r << 16) | (g << 8) | b)
    }

    #[inline]
    pub const fn a(self) -> u32 {
        self.0 >> 24
    }

    #[inline]
    pub const fn r(self) -> u32 {
        (self.0 >> 16) & 0xFF
    }

    #[inline]
    pub const fn g(self) -> u32 {
        (self.0 >> 8) & 0xFF
    }

    #[inline]
    pub const fn b(self) -> u32 {
        self.0 & 0xFF
    }

    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.a() == 255
    }

    /// Unpremultiplied 8-bit RGBA, the byte order image files and canvases
    /// expect.
    pub fn to_rgba8(self) -> [u8; 4] {
        let a = self.a();
        if a == 0 {
            return [0, 0, 0, 0];
        }
        let un = |c: u32| ((c * 255 + a / 2) / a).min(255) as u8;
        [un(self.r()), un(self.g()), un(self.b()), a as u8]
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_div255_exact_on_byte_products() {
        for a in 0..=255u32 {
            for b in [0u32, 1, 127, 128, 200, 255] {
                let exact = ((a * b) as f64 / 255.0).round() as u32;
                assert_eq!(div255(a * b), exact, "a={a} b={b}");
            }
        }
        assert_eq!(div255(255 * 255), 255);
        assert_eq!(div255(0), 0);
    }

    #[test]
    fn test_pack_and_unpack() {
        let p = Pixel::pack_argb(0x80, 0x40, 0x20, 0x10);
        assert_eq!(p.0, 0x8040_2010);
        assert_eq!(p.a(), 0x80);
        assert_eq!(p.r(), 0x40);
        assert_eq!(p.g(), 0x20);
        assert_eq!(p.b(), 0x10);
        assert!(!p.is_opaque());
    }

    #[test]
    fn test_to_pixel_opaque_red() {
        assert_eq!(Color::rgb(1.0, 0.0, 0.0).to_pixel(), Pixel(0xFFFF_0000));
        assert!(Color::rgb(1.0, 0.0, 0.0).to_pixel().is_opaque());
    }

    #[test]
    fn test_to_pixel_premultiplies() {
        let p = Color::rgba(1.0, 0.5, 0.0, 0.5).to_pixel();
        // a = round(127.5) = 128, r = round(127.5) = 128, g = round(63.75) = 64
        assert_eq!(p.a(), 128);
        assert_eq!(p.r(), 128);
        assert_eq!(p.g(), 64);
        assert_eq!(p.b(), 0);
        assert_eq!(Color::TRANSPARENT.to_pixel(), Pixel::TRANSPARENT);
    }

    #[test]
    fn test_to_pixel_pins_out_of_range() {
        let p = Color::rgba(2.0, -1.0, 0.5, 3.0).to_pixel();
        assert_eq!(p.a(), 255);
        assert_eq!(p.r(), 255);
        assert_eq!(p.g(), 0);
        assert_eq!(p.b(), 128);
    }

    #[test]
    fn test_lerp_and_pin() {
        let c = Color::BLACK.lerp(&Color::WHITE, 0.25);
        assert!((c.r - 0.25).abs() < EPS);
        assert!((c.a - 1.0).abs() < EPS);
        let pinned = Color::rgba(1.5, -0.5, 0.5, 1.0).pin_to_unit();
        assert_eq!(pinned, Color::rgba(1.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn test_to_rgba8_unpremultiplies() {
        assert_eq!(Pixel(0xFFFF_0000).to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(Pixel::pack_argb(128, 128, 64, 0).to_rgba8(), [255, 128, 0, 128]);
        assert_eq!(Pixel::TRANSPARENT.to_rgba8(), [0, 0, 0, 0]);
    }
}
