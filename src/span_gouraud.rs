//! Gouraud triangle shader.
//!
//! Interpolates three vertex colors across a triangle. The triangle's basis
//! matrix maps the unit triangle onto the vertices, so its inverse gives the
//! barycentric weights `(u, v)` of any device point directly:
//! `color = (1 - u - v)·c0 + u·c1 + v·c2`.

use crate::basics::Point;
use crate::color::{Color, Pixel};
use crate::shader::{pixel_center, triangle_basis};
use crate::trans_affine::TransAffine;

#[derive(Debug, Clone, PartialEq)]
pub struct TriColorShader {
    pub colors: [Color; 3],
    /// Unit triangle to user space.
    pub local: TransAffine,
}

impl TriColorShader {
    pub fn new(pts: [Point; 3], colors: [Color; 3]) -> Self {
        Self {
            colors,
            local: triangle_basis(pts),
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.colors.iter().all(Color::is_opaque)
    }

    /// Bind to `ctm`. Fails when the triangle is degenerate on screen.
    pub fn set_context(&self, ctm: &TransAffine) -> Option<TriColorContext> {
        let inverse = ctm.concat(&self.local).invert()?;
        Some(TriColorContext {
            colors: self.colors,
            inverse,
            opaque: self.is_opaque(),
        })
    }
}

#[derive(Debug)]
pub struct TriColorContext {
    colors: [Color; 3],
    inverse: TransAffine,
    opaque: bool,
}

impl TriColorContext {
    pub fn is_opaque(&self) -> bool {
        self.opaque
    }

    pub fn shade_row(&mut self, x: i32, y: i32, row: &mut [Pixel]) {
        let [c0, c1, c2] = self.colors;
        for (i, out) in row.iter_mut().enumerate() {
            let q = self.inverse.transform(pixel_center(x, i, y));
            let (u, v) = (q.x, q.y);
            let c = c1 * u + c2 * v + c0 * (1.0 - u - v);
            *out = c.pin_to_unit().to_pixel();
        }
    }
}
