//! Demo render functions.
//!
//! Each function renders a specific demo into an RGBA pixel buffer.
//! The buffer is width * height * 4 bytes (RGBA order, not premultiplied).

use std::f64::consts::PI;

use edgefill::stroke::{add_line, add_polyline};
use edgefill::{
    Bitmap, BlendMode, Canvas, Color, Direction, FilterMode, LineCap, Paint, Path, Point,
    Rect, Shader, TileMode, TransAffine,
};

const BACKGROUND: Color = Color::rgb(0.96, 0.96, 0.94);

/// Unpremultiplied RGBA bytes of `bitmap`.
pub fn to_rgba(bitmap: &Bitmap) -> Vec<u8> {
    bitmap.pixels().iter().flat_map(|p| p.to_rgba8()).collect()
}

/// New bitmap cleared to the demo background.
fn background(width: u32, height: u32) -> Bitmap {
    let mut bm = Bitmap::new(width, height);
    bm.fill(BACKGROUND.to_pixel());
    bm
}

fn param(params: &[f64], i: usize, default: f64) -> f64 {
    params.get(i).copied().filter(|v| v.is_finite()).unwrap_or(default)
}

/// Points of a five-pointed star drawn as one self-intersecting contour.
fn star_points(center: Point, radius: f64, rotation: f64) -> Vec<Point> {
    (0..5)
        .map(|k| {
            let a = rotation - PI / 2.0 + k as f64 * 4.0 * PI / 5.0;
            Point::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect()
}

/// Hue wheel color at `t` in [0, 1).
fn hue(t: f64) -> Color {
    let h = (t.rem_euclid(1.0)) * 6.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    match h as u32 {
        0 => Color::rgb(1.0, x, 0.0),
        1 => Color::rgb(x, 1.0, 0.0),
        2 => Color::rgb(0.0, 1.0, x),
        3 => Color::rgb(0.0, x, 1.0),
        4 => Color::rgb(x, 0.0, 1.0),
        _ => Color::rgb(1.0, 0.0, x),
    }
}

// ============================================================================
// Fallback
// ============================================================================

pub fn fallback(width: u32, height: u32) -> Vec<u8> {
    let mut bm = Bitmap::new(width, height);
    bm.fill(Color::rgb(40.0 / 255.0, 40.0 / 255.0, 80.0 / 255.0).to_pixel());
    to_rgba(&bm)
}

// ============================================================================
// Shapes
// ============================================================================

/// Rectangles, convex polygons and circles under a rotating transform.
///
/// params[0] = number of shapes (default 12)
/// params[1] = rotation in degrees (default 0)
pub fn shapes(width: u32, height: u32, params: &[f64]) -> Vec<u8> {
    let count = param(params, 0, 12.0).clamp(1.0, 200.0) as usize;
    let angle = param(params, 1, 0.0).to_radians();

    let mut bm = background(width, height);
    let mut canvas = Canvas::new(&mut bm);
    let (w, h) = (width as f64, height as f64);
    let cell = (w.min(h) / 5.0).max(4.0);

    for i in 0..count {
        let t = i as f64 / count as f64;
        let cx = w * (0.15 + 0.7 * ((i * 7 % count) as f64 / count as f64));
        let cy = h * (0.15 + 0.7 * t);
        let paint = Paint::new(Color { a: 0.7, ..hue(t) });

        canvas.save();
        canvas.translate(cx, cy);
        canvas.rotate(angle + t * PI);
        match i % 3 {
            0 => canvas.draw_rect(&Rect::new(-cell / 2.0, -cell / 3.0, cell / 2.0, cell / 3.0), &paint),
            1 => {
                let hex: Vec<Point> = (0..6)
                    .map(|k| {
                        let a = k as f64 * PI / 3.0;
                        Point::new(cell / 2.0 * a.cos(), cell / 2.0 * a.sin())
                    })
                    .collect();
                canvas.draw_convex_polygon(&hex, &paint);
            }
            _ => {
                let mut path = Path::new();
                path.add_circle(Point::new(0.0, 0.0), cell / 2.5, Direction::Cw);
                canvas.draw_path(&path, &paint);
            }
        }
        canvas.restore();
    }
    to_rgba(&bm)
}

// ============================================================================
// Star
// ============================================================================

/// Self-intersecting star filled under the nonzero rule, beside a ring whose
/// inner contour runs the other way.
///
/// params[0] = rotation in degrees (default 0)
pub fn star(width: u32, height: u32, params: &[f64]) -> Vec<u8> {
    let rotation = param(params, 0, 0.0).to_radians();
    let (w, h) = (width as f64, height as f64);
    let r = w.min(h) * 0.22;

    let mut bm = background(width, height);
    let mut canvas = Canvas::new(&mut bm);

    let mut star = Path::new();
    star.add_polygon(&star_points(Point::new(w * 0.3, h * 0.5), r, rotation));
    canvas.draw_path(&star, &Paint::new(Color::rgb(0.85, 0.2, 0.15)));

    let mut ring = Path::new();
    let c = Point::new(w * 0.72, h * 0.5);
    ring.add_circle(c, r, Direction::Cw);
    ring.add_circle(c, r * 0.55, Direction::Ccw);
    canvas.draw_path(&ring, &Paint::new(Color::rgb(0.15, 0.35, 0.8)));

    to_rgba(&bm)
}

// ============================================================================
// Gradients
// ============================================================================

/// Linear, radial and sweep gradients in three bands.
///
/// params[0] = tile mode: 0 clamp, 1 repeat, 2 mirror (default 0)
pub fn gradients(width: u32, height: u32, params: &[f64]) -> Vec<u8> {
    let tile = match param(params, 0, 0.0) as i32 {
        1 => TileMode::Repeat,
        2 => TileMode::Mirror,
        _ => TileMode::Clamp,
    };
    let (w, h) = (width as f64, height as f64);
    let band = h / 3.0;
    let stops = [
        Color::rgb(0.9, 0.1, 0.2),
        Color::rgb(1.0, 0.8, 0.1),
        Color::rgb(0.1, 0.6, 0.9),
    ];

    let linear = Shader::linear_gradient(Point::new(w * 0.2, 0.0), Point::new(w * 0.5, 0.0), &stops, tile);
    let radial = Shader::radial_gradient(Point::new(w / 2.0, band * 1.5), band * 0.4, &stops, tile);
    let sweep = Shader::sweep_gradient(
        Point::new(w / 2.0, band * 2.5),
        Point::new(w / 2.0 + 1.0, band * 2.5),
        &stops,
        tile,
    );

    let mut bm = background(width, height);
    let mut canvas = Canvas::new(&mut bm);
    for (i, shader) in [&linear, &radial, &sweep].into_iter().enumerate() {
        let rect = Rect::new(0.0, band * i as f64, w, band * (i + 1) as f64);
        canvas.draw_rect(&rect, &Paint::from_shader(shader));
    }
    to_rgba(&bm)
}

// ============================================================================
// Bitmap
// ============================================================================

/// Checkerboard texture with the given number of squares per side.
fn checkerboard(squares: u32, size: u32) -> Bitmap {
    let n = squares * size;
    let dark = Color::rgb(0.2, 0.25, 0.3).to_pixel();
    let light = Color::rgb(0.95, 0.9, 0.8).to_pixel();
    let pixels = (0..n * n)
        .map(|i| {
            let (x, y) = (i % n / size, i / n / size);
            if (x + y) % 2 == 0 {
                dark
            } else {
                light
            }
        })
        .collect();
    Bitmap::from_pixels(n, n, pixels)
}

/// A rotated, scaled bitmap fill.
///
/// params[0] = rotation in degrees (default 20)
/// params[1] = scale (default 4)
/// params[2] = filter: 0 nearest, 1 bilinear (default 0)
/// params[3] = tile mode: 0 clamp, 1 repeat, 2 mirror (default 1)
pub fn bitmap(width: u32, height: u32, params: &[f64]) -> Vec<u8> {
    let angle = param(params, 0, 20.0).to_radians();
    let scale = param(params, 1, 4.0).max(0.1);
    let filter = if param(params, 2, 0.0) >= 1.0 {
        FilterMode::Bilinear
    } else {
        FilterMode::Nearest
    };
    let tile = match param(params, 3, 1.0) as i32 {
        0 => TileMode::Clamp,
        2 => TileMode::Mirror,
        _ => TileMode::Repeat,
    };

    let texture = checkerboard(4, 4);
    let local = TransAffine::new_rotation(angle) * TransAffine::new_scaling(scale, scale);
    let shader = Shader::bitmap(&texture, local, tile, filter);

    let (w, h) = (width as f64, height as f64);
    let mut bm = background(width, height);
    let mut canvas = Canvas::new(&mut bm);
    canvas.translate(w / 2.0, h / 2.0);
    canvas.draw_rect(&Rect::new(-w * 0.4, -h * 0.4, w * 0.4, h * 0.4), &Paint::from_shader(&shader));
    to_rgba(&bm)
}

// ============================================================================
// Mesh
// ============================================================================

/// A quad with vertex colors, tessellated, and a second one texture mapped
/// and tinted.
///
/// params[0] = tessellation level (default 4)
pub fn mesh(width: u32, height: u32, params: &[f64]) -> Vec<u8> {
    let level = param(params, 0, 4.0).clamp(0.0, 64.0) as u32;
    let (w, h) = (width as f64, height as f64);

    let mut bm = background(width, height);
    let mut canvas = Canvas::new(&mut bm);

    let left = [
        Point::new(w * 0.05, h * 0.15),
        Point::new(w * 0.45, h * 0.05),
        Point::new(w * 0.42, h * 0.9),
        Point::new(w * 0.08, h * 0.8),
    ];
    let colors = [
        Color::rgb(1.0, 0.2, 0.2),
        Color::rgb(0.2, 1.0, 0.2),
        Color::rgb(0.2, 0.2, 1.0),
        Color::rgb(1.0, 1.0, 0.2),
    ];
    canvas.draw_quad(&left, Some(&colors), None, level, &Paint::default());

    let texture = checkerboard(8, 8);
    let shader = Shader::bitmap(&texture, TransAffine::new(), TileMode::Clamp, FilterMode::Bilinear);
    let n = texture.width() as f64;
    let right = [
        Point::new(w * 0.55, h * 0.1),
        Point::new(w * 0.95, h * 0.2),
        Point::new(w * 0.9, h * 0.85),
        Point::new(w * 0.6, h * 0.95),
    ];
    let texs = [
        Point::new(0.0, 0.0),
        Point::new(n, 0.0),
        Point::new(n, n),
        Point::new(0.0, n),
    ];
    let tint = [Color::WHITE, Color::rgb(1.0, 0.7, 0.7), Color::WHITE, Color::rgb(0.7, 0.7, 1.0)];
    canvas.draw_quad(&right, Some(&tint), Some(&texs), level, &Paint::from_shader(&shader));

    to_rgba(&bm)
}

// ============================================================================
// Blend modes
// ============================================================================

/// Every blend mode on a grid: a blue square under a translucent red disc.
pub fn blend_modes(width: u32, height: u32, _params: &[f64]) -> Vec<u8> {
    let cols = 4usize;
    let rows = (BlendMode::ALL.len() + cols - 1) / cols;
    let (w, h) = (width as f64, height as f64);
    let (cw, ch) = (w / cols as f64, h / rows as f64);
    let s = cw.min(ch);

    let mut bm = background(width, height);
    let mut canvas = Canvas::new(&mut bm);
    for (i, mode) in BlendMode::ALL.iter().enumerate() {
        let (x0, y0) = ((i % cols) as f64 * cw, (i / cols) as f64 * ch);

        canvas.save();
        canvas.translate(x0, y0);
        canvas.draw_rect(
            &Rect::new(s * 0.15, s * 0.15, s * 0.6, s * 0.6),
            &Paint::new(Color::rgb(0.1, 0.3, 0.9)),
        );
        let mut disc = Path::new();
        disc.add_circle(Point::new(s * 0.6, s * 0.6), s * 0.28, Direction::Cw);
        let paint = Paint::new(Color::rgba(0.9, 0.1, 0.1, 0.75)).with_blend_mode(*mode);
        canvas.draw_path(&disc, &paint);
        canvas.restore();
    }
    to_rgba(&bm)
}

// ============================================================================
// Strokes
// ============================================================================

/// Stroked lines with each cap, and a stroked zigzag polyline.
///
/// params[0] = stroke width (default 12)
pub fn strokes(width: u32, height: u32, params: &[f64]) -> Vec<u8> {
    let stroke_width = param(params, 0, 12.0).max(0.5);
    let (w, h) = (width as f64, height as f64);

    let mut bm = background(width, height);
    let mut canvas = Canvas::new(&mut bm);

    let caps = [LineCap::Butt, LineCap::Square, LineCap::Round];
    for (i, cap) in caps.iter().enumerate() {
        let y = h * (0.15 + 0.15 * i as f64);
        let mut path = Path::new();
        add_line(&mut path, Point::new(w * 0.2, y), Point::new(w * 0.8, y), stroke_width, *cap);
        canvas.draw_path(&path, &Paint::new(Color::rgb(0.15, 0.15, 0.2)));

        // guides at the true endpoints
        let mut guide = Path::new();
        add_line(&mut guide, Point::new(w * 0.2, y - stroke_width), Point::new(w * 0.2, y + stroke_width), 1.0, LineCap::Butt);
        add_line(&mut guide, Point::new(w * 0.8, y - stroke_width), Point::new(w * 0.8, y + stroke_width), 1.0, LineCap::Butt);
        canvas.draw_path(&guide, &Paint::new(Color::rgb(0.9, 0.2, 0.2)));
    }

    let zigzag: Vec<Point> = (0..8)
        .map(|k| Point::new(w * (0.1 + 0.8 * k as f64 / 7.0), h * if k % 2 == 0 { 0.7 } else { 0.9 }))
        .collect();
    let mut path = Path::new();
    add_polyline(&mut path, &zigzag, stroke_width, LineCap::Round);
    canvas.draw_path(&path, &Paint::new(Color::rgba(0.1, 0.5, 0.3, 0.8)));

    to_rgba(&bm)
}
