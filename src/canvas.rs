//! Canvas — the drawing API.
//!
//! A `Canvas` borrows a destination [`Bitmap`] and owns a transform stack.
//! Every draw call maps its geometry into device space, builds clipped edges,
//! sweeps them into spans and composites the spans with the paint. Nothing
//! but the transform stack survives between calls.

use crate::basics::{Point, Rect, DEFAULT_TOLERANCE};
use crate::bitmap::Bitmap;
use crate::blend::BlendMode;
use crate::color::Color;
use crate::compositor::{ColorSource, Compositor};
use crate::edge::Edge;
use crate::edge_builder::EdgeBuilder;
use crate::paint::Paint;
use crate::path::{Path, Segment};
use crate::scan_converter::{FillMode, ScanConverter};
use crate::shader::Shader;
use crate::trans_affine::TransAffine;

// ============================================================================
// CanvasOptions
// ============================================================================

/// Rendering knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasOptions {
    /// Maximum distance, in device pixels, between a curve and the chords
    /// that replace it.
    pub tolerance: f64,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

// ============================================================================
// Canvas
// ============================================================================

pub struct Canvas<'a> {
    device: &'a mut Bitmap,
    stack: Vec<TransAffine>,
    options: CanvasOptions,
    builder: EdgeBuilder,
    converter: ScanConverter,
    edges: Vec<Edge>,
}

impl<'a> Canvas<'a> {
    pub fn new(device: &'a mut Bitmap) -> Self {
        Self::with_options(device, CanvasOptions::default())
    }

    pub fn with_options(device: &'a mut Bitmap, options: CanvasOptions) -> Self {
        let (w, h) = (device.width(), device.height());
        Self {
            device,
            stack: vec![TransAffine::new()],
            options,
            builder: EdgeBuilder::for_device(w, h),
            converter: ScanConverter::new(w),
            edges: Vec::new(),
        }
    }

    pub fn options(&self) -> &CanvasOptions {
        &self.options
    }

    pub fn device(&self) -> &Bitmap {
        &*self.device
    }

    // ---------------------------------------------------------------
    // Transform stack
    // ---------------------------------------------------------------

    /// Current transform.
    pub fn ctm(&self) -> TransAffine {
        self.stack.last().copied().unwrap_or_default()
    }

    /// Number of saved states above the base entry.
    pub fn save_count(&self) -> usize {
        self.stack.len() - 1
    }

    /// Push a copy of the current transform.
    pub fn save(&mut self) {
        let top = self.ctm();
        self.stack.push(top);
    }

    /// Pop back to the last `save`. The base entry is never removed.
    pub fn restore(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        } else {
            log::debug!("restore without matching save ignored");
        }
    }

    /// Pre-apply `m`: geometry is mapped by `m` first, then by the previous
    /// transform.
    pub fn concat(&mut self, m: &TransAffine) {
        if let Some(top) = self.stack.last_mut() {
            *top = top.concat(m);
        }
    }

    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.concat(&TransAffine::new_translation(tx, ty));
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.concat(&TransAffine::new_scaling(sx, sy));
    }

    /// Rotate by `radians`.
    pub fn rotate(&mut self, radians: f64) {
        self.concat(&TransAffine::new_rotation(radians));
    }

    // ---------------------------------------------------------------
    // Drawing
    // ---------------------------------------------------------------

    /// Fill the whole device.
    pub fn draw_paint(&mut self, paint: &Paint) {
        let ctm = self.ctm();
        if let Some(mut compositor) = compositor_for(self.device, &ctm, paint) {
            compositor.fill_all();
        }
    }

    /// Fill `rect`, mapped through the current transform.
    pub fn draw_rect(&mut self, rect: &Rect, paint: &Paint) {
        let corners = [
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x1, rect.y2),
            Point::new(rect.x2, rect.y2),
            Point::new(rect.x2, rect.y1),
        ];
        self.draw_convex_polygon(&corners, paint);
    }

    /// Fill a convex polygon. Fewer than three points draws nothing.
    pub fn draw_convex_polygon(&mut self, points: &[Point], paint: &Paint) {
        if points.len() < 3 {
            log::trace!("convex polygon with {} point(s) skipped", points.len());
            return;
        }
        let ctm = self.ctm();
        let device: Vec<Point> = points.iter().map(|p| ctm.transform(*p)).collect();

        self.edges.clear();
        for (i, &p) in device.iter().enumerate() {
            let next = device[(i + 1) % device.len()];
            self.builder.add_line(p, next, &mut self.edges);
        }
        self.fill_edges(FillMode::Convex, paint);
    }

    /// Fill `path` under the nonzero winding rule.
    pub fn draw_path(&mut self, path: &Path, paint: &Paint) {
        let device = path.transformed(&self.ctm());
        let tolerance = self.options.tolerance;

        self.edges.clear();
        for seg in device.segments() {
            match seg {
                Segment::Line(a, b) => self.builder.add_line(a, b, &mut self.edges),
                Segment::Quad(a, b, c) => self.builder.add_quad(a, b, c, tolerance, &mut self.edges),
                Segment::Cubic(a, b, c, d) => {
                    self.builder.add_cubic(a, b, c, d, tolerance, &mut self.edges)
                }
            }
        }
        self.fill_edges(FillMode::NonZero, paint);
    }

    /// Fill a triangle mesh. `indices` holds three vertex indices per
    /// triangle. Each triangle is shaded by its vertex `colors`, by the
    /// paint's shader sampled through `texs`, or by the product of both;
    /// with neither it uses the paint as is.
    ///
    /// Panics if `colors` or `texs` do not match `verts` in length, if
    /// `indices` is not a multiple of three, or if `texs` is given without a
    /// paint shader.
    pub fn draw_mesh(
        &mut self,
        verts: &[Point],
        colors: Option<&[Color]>,
        texs: Option<&[Point]>,
        indices: &[usize],
        paint: &Paint,
    ) {
        assert!(indices.len() % 3 == 0, "mesh index count {} is not a multiple of 3", indices.len());
        if let Some(colors) = colors {
            assert_eq!(colors.len(), verts.len(), "mesh colors do not match vertices");
        }
        if let Some(texs) = texs {
            assert_eq!(texs.len(), verts.len(), "mesh texture coordinates do not match vertices");
            assert!(paint.shader.is_some(), "mesh texture coordinates need a paint shader");
        }

        for tri in indices.chunks_exact(3) {
            let [i0, i1, i2] = [tri[0], tri[1], tri[2]];
            let pts = [verts[i0], verts[i1], verts[i2]];

            let color_shader = colors.map(|c| Shader::tri_color(pts, [c[i0], c[i1], c[i2]]));
            let texture_shader = match (texs, paint.shader) {
                (Some(t), Some(inner)) => Some(Shader::tri_texture(inner, pts, [t[i0], t[i1], t[i2]])),
                _ => None,
            };

            let composed;
            let shader = match (&texture_shader, &color_shader) {
                (Some(t), Some(c)) => {
                    composed = Shader::composed(t, c);
                    Some(&composed)
                }
                (Some(t), None) => Some(t),
                (None, Some(c)) => Some(c),
                (None, None) => paint.shader,
            };

            let tri_paint = Paint {
                color: paint.color,
                shader,
                blend_mode: paint.blend_mode,
            };
            self.fill_triangle(pts, &tri_paint);
        }
    }

    /// Tessellate the quad `verts` (corners in order) into a
    /// `(level + 2) × (level + 2)` vertex grid by bilinear interpolation and
    /// draw the resulting `(level + 1)² · 2` triangles as a mesh.
    pub fn draw_quad(
        &mut self,
        verts: &[Point; 4],
        colors: Option<&[Color; 4]>,
        texs: Option<&[Point; 4]>,
        level: u32,
        paint: &Paint,
    ) {
        let n = level as usize + 2;
        let step = 1.0 / (level as f64 + 1.0);
        let param = |i: usize| if i == n - 1 { 1.0 } else { i as f64 * step };

        let mut grid_verts = Vec::with_capacity(n * n);
        let mut grid_colors = Vec::with_capacity(if colors.is_some() { n * n } else { 0 });
        let mut grid_texs = Vec::with_capacity(if texs.is_some() { n * n } else { 0 });
        for i in 0..n {
            let u = param(i);
            for j in 0..n {
                let v = param(j);
                grid_verts.push(bilerp_point(verts, u, v));
                if let Some(c) = colors {
                    grid_colors.push(bilerp_color(c, u, v));
                }
                if let Some(t) = texs {
                    grid_texs.push(bilerp_point(t, u, v));
                }
            }
        }

        let cells = n - 1;
        let mut indices = Vec::with_capacity(cells * cells * 6);
        let at = |i: usize, j: usize| i * n + j;
        for i in 0..cells {
            for j in 0..cells {
                indices.extend_from_slice(&[at(i, j), at(i + 1, j), at(i, j + 1)]);
                indices.extend_from_slice(&[at(i + 1, j + 1), at(i + 1, j), at(i, j + 1)]);
            }
        }

        self.draw_mesh(
            &grid_verts,
            colors.map(|_| grid_colors.as_slice()),
            texs.map(|_| grid_texs.as_slice()),
            &indices,
            paint,
        );
    }

    // ---------------------------------------------------------------
    // Pipeline
    // ---------------------------------------------------------------

    fn fill_triangle(&mut self, pts: [Point; 3], paint: &Paint) {
        let ctm = self.ctm();
        let d = pts.map(|p| ctm.transform(p));
        self.edges.clear();
        for i in 0..3 {
            self.builder.add_line(d[i], d[(i + 1) % 3], &mut self.edges);
        }
        self.fill_edges(FillMode::NonZero, paint);
    }

    fn fill_edges(&mut self, mode: FillMode, paint: &Paint) {
        if self.edges.len() < 2 {
            log::trace!("degenerate geometry, {} edge(s)", self.edges.len());
            return;
        }
        let ctm = self.ctm();
        if let Some(mut compositor) = compositor_for(self.device, &ctm, paint) {
            self.converter.convert(&mut self.edges, mode, &mut compositor);
        }
    }
}

/// Compositor for `paint`, or `None` when the draw cannot change any pixel
/// or the shader cannot be bound to `ctm`.
fn compositor_for<'d, 's>(
    device: &'d mut Bitmap,
    ctm: &TransAffine,
    paint: &Paint<'s>,
) -> Option<Compositor<'d, 's>> {
    if paint.blend_mode == BlendMode::Dst {
        log::trace!("dst blend mode, draw skipped");
        return None;
    }
    let source = match paint.shader {
        None => ColorSource::Solid(paint.color.to_pixel()),
        Some(shader) => match shader.set_context(ctm) {
            Some(ctx) => ColorSource::Shader(ctx),
            None => {
                log::debug!("shader transform is not invertible, draw skipped");
                return None;
            }
        },
    };
    Some(Compositor::new(device, paint.blend_mode, source))
}

/// Point at `(u, v)` on the bilinear patch through `q`: `u` runs from `q[0]`
/// to `q[1]` (and `q[3]` to `q[2]`), `v` across.
fn bilerp_point(q: &[Point; 4], u: f64, v: f64) -> Point {
    q[0].lerp(q[1], u).lerp(q[3].lerp(q[2], u), v)
}

fn bilerp_color(q: &[Color; 4], u: f64, v: f64) -> Color {
    q[0].lerp(&q[1], u).lerp(&q[3].lerp(&q[2], u), v)
}

// ============================================================================
// Tests
// ============================================================================
