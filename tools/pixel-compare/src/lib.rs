//! Pixel comparison for edgefill renders.
//!
//! Demo renders come back as straight RGBA bytes. This crate compares two
//! such buffers channel by channel, builds diff and side-by-side images for
//! inspection, and reads and writes them as 32-bit BMP files.

use std::path::{Path, PathBuf};

use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Errors from loading, saving or comparing images.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("not a BMP file")]
    NotBmp,

    #[error("unsupported BMP depth: {0} bits per pixel")]
    UnsupportedDepth(u16),

    #[error("image data truncated: expected {expected} bytes, got {got}")]
    Truncated { expected: usize, got: usize },

    #[error("unsupported image format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("image sizes differ: {a_width}x{a_height} vs {b_width}x{b_height}")]
    SizeMismatch {
        a_width: u32,
        a_height: u32,
        b_width: u32,
        b_height: u32,
    },
}

pub type Result<T> = std::result::Result<T, ImageError>;

// ============================================================================
// Pixel Buffer
// ============================================================================

/// Straight RGBA bytes, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap RGBA bytes, as returned by `edgefill_wasm::render_demo`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = byte_len(width, height);
        if data.len() != expected {
            return Err(ImageError::Truncated {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Pixels in scan order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data.chunks_exact(4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * 4;
        &self.data[y as usize * stride..][..stride]
    }
}

fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

// ============================================================================
// Comparison
// ============================================================================

/// First pixel, in scan order, where the two images disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffInfo {
    pub x: u32,
    pub y: u32,
    pub pixel_a: [u8; 4],
    pub pixel_b: [u8; 4],
}

/// Channel statistics of a comparison.
#[derive(Debug, Clone)]
pub struct CompareResult {
    pub total_pixels: u64,
    /// Pixels with at least one differing channel.
    pub different_pixels: u64,
    pub max_channel_diff: u8,
    pub first_diff: Option<DiffInfo>,
    /// `histogram[d]` counts channels that differ by exactly `d`. Index 0 is
    /// unused.
    pub histogram: [u64; 256],
}

impl CompareResult {
    pub fn identical(&self) -> bool {
        self.different_pixels == 0
    }

    /// True when no channel differs by more than `tolerance`.
    pub fn within(&self, tolerance: u8) -> bool {
        self.max_channel_diff <= tolerance
    }

    /// Mean difference over the channels that differ at all.
    pub fn mean_channel_diff(&self) -> f64 {
        let (sum, count) = self
            .histogram
            .iter()
            .enumerate()
            .skip(1)
            .fold((0u64, 0u64), |(s, c), (d, &n)| (s + d as u64 * n, c + n));
        if count == 0 {
            0.0
        } else {
            sum as f64 / count as f64
        }
    }

    /// Nonzero histogram buckets, smallest difference first.
    pub fn nonzero_buckets(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        (1..=255u8).map(|d| (d, self.histogram[d as usize])).filter(|&(_, n)| n > 0)
    }
}

impl std::fmt::Display for CompareResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.identical() {
            return write!(f, "IDENTICAL: {} pixels", self.total_pixels);
        }
        let percent = self.different_pixels as f64 * 100.0 / self.total_pixels as f64;
        write!(
            f,
            "DIFFERENT: {} of {} pixels ({:.2}%), max channel diff {}, mean {:.3}",
            self.different_pixels,
            self.total_pixels,
            percent,
            self.max_channel_diff,
            self.mean_channel_diff(),
        )?;
        if let Some(d) = &self.first_diff {
            write!(f, "\n  first at ({}, {}): {:?} vs {:?}", d.x, d.y, d.pixel_a, d.pixel_b)?;
        }
        Ok(())
    }
}

fn check_same_size(a: &PixelBuffer, b: &PixelBuffer) -> Result<()> {
    if a.size() != b.size() || a.data.len() != b.data.len() {
        return Err(ImageError::SizeMismatch {
            a_width: a.width,
            a_height: a.height,
            b_width: b.width,
            b_height: b.height,
        });
    }
    Ok(())
}

/// Per-channel absolute differences of two pixels.
fn channel_diffs(pa: [u8; 4], pb: [u8; 4]) -> [u8; 4] {
    [0, 1, 2, 3].map(|c| pa[c].abs_diff(pb[c]))
}

/// Compare two buffers of the same size channel by channel.
pub fn compare_buffers(a: &PixelBuffer, b: &PixelBuffer) -> Result<CompareResult> {
    check_same_size(a, b)?;

    let mut result = CompareResult {
        total_pixels: a.width as u64 * a.height as u64,
        different_pixels: 0,
        max_channel_diff: 0,
        first_diff: None,
        histogram: [0; 256],
    };

    for (i, (pa, pb)) in a.pixels().zip(b.pixels()).enumerate() {
        let diffs = channel_diffs(pa, pb);
        if diffs == [0; 4] {
            continue;
        }
        for d in diffs.into_iter().filter(|&d| d > 0) {
            result.histogram[d as usize] += 1;
            result.max_channel_diff = result.max_channel_diff.max(d);
        }
        result.different_pixels += 1;
        if result.first_diff.is_none() {
            let i = i as u32;
            result.first_diff = Some(DiffInfo {
                x: i % a.width,
                y: i / a.width,
                pixel_a: pa,
                pixel_b: pb,
            });
        }
    }
    Ok(result)
}

/// Diff image: matching pixels dark gray, others red scaled by ten times
/// their largest channel difference. Alpha counts as a channel, so coverage
/// gaps show up even where colors agree.
pub fn generate_diff_image(a: &PixelBuffer, b: &PixelBuffer) -> Result<PixelBuffer> {
    check_same_size(a, b)?;
    let data = a
        .pixels()
        .zip(b.pixels())
        .flat_map(|(pa, pb)| {
            let worst = channel_diffs(pa, pb).into_iter().max().unwrap_or(0);
            if worst == 0 {
                [40, 40, 40, 255]
            } else {
                [worst.saturating_mul(10), 0, 0, 255]
            }
        })
        .collect();
    Ok(PixelBuffer {
        width: a.width,
        height: a.height,
        data,
    })
}

/// Three panels in one image: `a`, the diff, `b`.
pub fn generate_sidebyside(a: &PixelBuffer, b: &PixelBuffer) -> Result<PixelBuffer> {
    let diff = generate_diff_image(a, b)?;
    let mut data = Vec::with_capacity(byte_len(a.width * 3, a.height));
    for y in 0..a.height {
        for panel in [a, &diff, b] {
            data.extend_from_slice(panel.row(y));
        }
    }
    Ok(PixelBuffer {
        width: a.width * 3,
        height: a.height,
        data,
    })
}

// ============================================================================
// BMP codec
// ============================================================================

const FILE_HEADER_LEN: u32 = 14;
const INFO_HEADER_LEN: u32 = 40;

/// Encode as an uncompressed 32-bit top-down BMP.
pub fn encode_bmp(buf: &PixelBuffer) -> Vec<u8> {
    let image_len = buf.data.len() as u32;
    let offset = FILE_HEADER_LEN + INFO_HEADER_LEN;
    let mut out = Vec::with_capacity((offset + image_len) as usize);

    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(offset + image_len).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&offset.to_le_bytes());

    out.extend_from_slice(&INFO_HEADER_LEN.to_le_bytes());
    out.extend_from_slice(&(buf.width as i32).to_le_bytes());
    // negative height: rows stored top first
    out.extend_from_slice(&(-(buf.height as i32)).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&32u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&image_len.to_le_bytes());
    out.extend_from_slice(&[0u8; 16]);

    for [r, g, b, a] in buf.pixels() {
        out.extend_from_slice(&[b, g, r, a]);
    }
    out
}

fn le_u32(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

/// Decode an in-memory BMP: 24 or 32 bits per pixel, either row order.
pub fn decode_bmp(data: &[u8]) -> Result<PixelBuffer> {
    if data.len() < (FILE_HEADER_LEN + INFO_HEADER_LEN) as usize || !data.starts_with(b"BM") {
        return Err(ImageError::NotBmp);
    }

    let offset = le_u32(data, 10) as usize;
    let w = le_u32(data, 18) as i32;
    let h = le_u32(data, 22) as i32;
    let bpp = u16::from_le_bytes([data[28], data[29]]);
    let depth = match bpp {
        24 => 3,
        32 => 4,
        _ => return Err(ImageError::UnsupportedDepth(bpp)),
    };

    let (width, height) = (w.unsigned_abs(), h.unsigned_abs());
    if width == 0 || height == 0 {
        return Ok(PixelBuffer {
            width,
            height,
            data: Vec::new(),
        });
    }
    let stride = (width as usize * depth + 3) & !3;
    let expected = offset + stride * height as usize;
    if data.len() < expected {
        return Err(ImageError::Truncated {
            expected,
            got: data.len(),
        });
    }

    let mut rows: Vec<&[u8]> = data[offset..expected].chunks_exact(stride).collect();
    if h > 0 {
        rows.reverse();
    }
    let mut out = Vec::with_capacity(byte_len(width, height));
    for row in rows {
        for px in row[..width as usize * depth].chunks_exact(depth) {
            let alpha = if depth == 4 { px[3] } else { 255 };
            out.extend_from_slice(&[px[2], px[1], px[0], alpha]);
        }
    }
    PixelBuffer::from_rgba(width, height, out)
}

fn check_bmp_path(path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("bmp") => Ok(()),
        _ => Err(ImageError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Load a `.bmp` file.
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    check_bmp_path(path)?;
    log::debug!("loading {}", path.display());
    decode_bmp(&std::fs::read(path)?)
}

/// Save to a `.bmp` file.
pub fn save_image(path: &Path, buf: &PixelBuffer) -> Result<()> {
    check_bmp_path(path)?;
    log::debug!("saving {}x{} to {}", buf.width, buf.height, path.display());
    std::fs::write(path, encode_bmp(buf))?;
    Ok(())
}

// ============================================================================
// Demo rendering
// ============================================================================

/// Names of the demos `render_demo` knows.
pub fn available_demos() -> Vec<String> {
    edgefill_wasm::demo_names().split(',').map(str::to_string).collect()
}

/// Render a demo by name. `None` for an unknown name.
pub fn render_demo(name: &str, width: u32, height: u32, params: &[f64]) -> Option<PixelBuffer> {
    if !available_demos().iter().any(|d| d == name) {
        return None;
    }
    let data = edgefill_wasm::render_demo(name, width, height, params);
    PixelBuffer::from_rgba(width, height, data).ok()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> PixelBuffer {
        let data = rgba.iter().copied().cycle().take(byte_len(width, height)).collect();
        PixelBuffer { width, height, data }
    }

    #[test]
    fn test_identical_buffers() {
        let a = solid(4, 3, [10, 20, 30, 255]);
        let r = compare_buffers(&a, &a.clone()).unwrap();
        assert!(r.identical());
        assert_eq!(r.total_pixels, 12);
        assert!(r.first_diff.is_none());
        assert_eq!(r.mean_channel_diff(), 0.0);
    }

    #[test]
    fn test_difference_is_located() {
        let a = solid(4, 3, [10, 20, 30, 255]);
        let mut b = a.clone();
        let i = ((2 * 4 + 1) * 4) as usize;
        b.data[i + 1] = 23;
        b.data[i + 3] = 254;
        let r = compare_buffers(&a, &b).unwrap();
        assert!(!r.identical());
        assert_eq!(r.different_pixels, 1);
        assert_eq!(r.max_channel_diff, 3);
        assert!(r.within(3) && !r.within(2));
        assert!((r.mean_channel_diff() - 2.0).abs() < 1e-12);
        assert_eq!(r.nonzero_buckets().collect::<Vec<_>>(), vec![(1, 1), (3, 1)]);
        let d = r.first_diff.unwrap();
        assert_eq!((d.x, d.y), (1, 2));
        assert_eq!(d.pixel_b, [10, 23, 30, 254]);
    }

    #[test]
    fn test_size_mismatch_is_error() {
        let a = solid(4, 3, [0; 4]);
        let b = solid(3, 4, [0; 4]);
        assert!(matches!(compare_buffers(&a, &b), Err(ImageError::SizeMismatch { .. })));
        assert!(generate_diff_image(&a, &b).is_err());
    }

    #[test]
    fn test_diff_and_sidebyside_layout() {
        let a = solid(2, 2, [0, 0, 0, 255]);
        let mut b = a.clone();
        b.data[3] = 250; // alpha of pixel (0, 0)
        let diff = generate_diff_image(&a, &b).unwrap();
        assert_eq!(diff.pixel(0, 0), [50, 0, 0, 255]);
        assert_eq!(diff.pixel(1, 1), [40, 40, 40, 255]);

        let sbs = generate_sidebyside(&a, &b).unwrap();
        assert_eq!(sbs.size(), (6, 2));
        assert_eq!(sbs.pixel(0, 0), a.pixel(0, 0));
        assert_eq!(sbs.pixel(2, 0), diff.pixel(0, 0));
        assert_eq!(sbs.pixel(4, 0), b.pixel(0, 0));
        assert_eq!(sbs.pixel(3, 1), diff.pixel(1, 1));
    }

    #[test]
    fn test_bmp_encode_decode() {
        let mut a = solid(3, 2, [200, 100, 50, 255]);
        a.data[0] = 7;
        a.data[7] = 128;
        let bytes = encode_bmp(&a);
        assert_eq!(bytes.len(), 54 + 3 * 2 * 4);
        assert_eq!(decode_bmp(&bytes).unwrap(), a);
    }

    #[test]
    fn test_decode_bottom_up_24_bit() {
        // 1x2 image, bottom row first, rows padded to 4 bytes
        let mut bytes = vec![0u8; 54];
        bytes[..2].copy_from_slice(b"BM");
        bytes[10..14].copy_from_slice(&54u32.to_le_bytes());
        bytes[18..22].copy_from_slice(&1i32.to_le_bytes());
        bytes[22..26].copy_from_slice(&2i32.to_le_bytes());
        bytes[28..30].copy_from_slice(&24u16.to_le_bytes());
        bytes.extend_from_slice(&[255, 0, 0, 0]); // bottom: blue
        bytes.extend_from_slice(&[0, 0, 255, 0]); // top: red
        let buf = decode_bmp(&bytes).unwrap();
        assert_eq!(buf.pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(buf.pixel(0, 1), [0, 0, 255, 255]);

        bytes.truncate(60);
        assert!(matches!(decode_bmp(&bytes), Err(ImageError::Truncated { .. })));
    }

    #[test]
    fn test_file_round_trip() {
        let a = solid(5, 4, [1, 2, 3, 4]);
        let path = std::env::temp_dir().join(format!("pixel-compare-{}.bmp", std::process::id()));
        save_image(&path, &a).unwrap();
        let b = load_image(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_bmp(b"PNG not a bitmap"), Err(ImageError::NotBmp)));
        assert!(matches!(
            load_image(Path::new("image.gif")),
            Err(ImageError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_render_known_demo() {
        let buf = render_demo("star", 32, 24, &[]).unwrap();
        assert_eq!(buf.data.len(), 32 * 24 * 4);
        assert!(render_demo("no-such-demo", 8, 8, &[]).is_none());
    }
}
