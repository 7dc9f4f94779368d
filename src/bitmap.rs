//! Destination and source pixel storage.
//!
//! A `Bitmap` is a width × height grid of premultiplied pixels in row-major
//! order, top row first. It is never resized once created.

use crate::color::Pixel;

/// Owned grid of premultiplied ARGB pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl Bitmap {
    /// Allocate a transparent bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Pixel::TRANSPARENT; width as usize * height as usize],
        }
    }

    /// Wrap existing pixel data. `pixels.len()` must equal `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Pixel>) -> Self {
        assert_eq!(
            pixels.len(),
            width as usize * height as usize,
            "pixel count does not match {}x{}",
            width,
            height
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) out of range for {}x{}",
            x,
            y,
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        self.pixels[self.index(x, y)]
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut Pixel {
        let i = self.index(x, y);
        &mut self.pixels[i]
    }

    /// One row of pixels.
    pub fn row(&self, y: u32) -> &[Pixel] {
        assert!(y < self.height, "row {} out of range", y);
        let w = self.width as usize;
        let start = y as usize * w;
        &self.pixels[start..start + w]
    }

    /// Mutable row of pixels.
    pub fn row_mut(&mut self, y: u32) -> &mut [Pixel] {
        assert!(y < self.height, "row {} out of range", y);
        let w = self.width as usize;
        let start = y as usize * w;
        &mut self.pixels[start..start + w]
    }

    /// Overwrite every pixel.
    pub fn fill(&mut self, p: Pixel) {
        self.pixels.fill(p);
    }

    /// True when every pixel has full alpha.
    pub fn is_opaque(&self) -> bool {
        self.pixels.iter().all(|p| p.is_opaque())
    }
}
