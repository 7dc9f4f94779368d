//! Paint — how a draw call colors the pixels it covers.

use crate::blend::BlendMode;
use crate::color::Color;
use crate::shader::Shader;

/// Color, optional shader and blend mode for one draw call.
///
/// When a shader is set it replaces the color.
#[derive(Debug, Clone, Copy)]
pub struct Paint<'a> {
    pub color: Color,
    pub shader: Option<&'a Shader<'a>>,
    pub blend_mode: BlendMode,
}

impl<'a> Paint<'a> {
    /// Solid color, src-over.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            shader: None,
            blend_mode: BlendMode::SrcOver,
        }
    }

    /// Shaded, src-over.
    pub fn from_shader(shader: &'a Shader<'a>) -> Self {
        Self {
            color: Color::BLACK,
            shader: Some(shader),
            blend_mode: BlendMode::SrcOver,
        }
    }

    pub fn with_blend_mode(mut self, mode: BlendMode) -> Self {
        self.blend_mode = mode;
        self
    }

    pub fn with_shader(mut self, shader: &'a Shader<'a>) -> Self {
        self.shader = Some(shader);
        self
    }
}

impl Default for Paint<'_> {
    fn default() -> Self {
        Self::new(Color::BLACK)
    }
}
