//! # edgefill
//!
//! CPU scanline fill engine for 2D vector graphics.
//!
//! Draw calls go through a four-stage pipeline:
//!
//! 1. **Canvas** — maps geometry through the current transform
//! 2. **Edge Builder** — flattens curves, clips to the device and emits edges
//! 3. **Scan Converter** — sweeps the edges row by row into interior spans
//! 4. **Compositor** — shades each span and blends it into the bitmap
//!
//! Pixels are premultiplied ARGB packed into a `u32`. Coverage is binary:
//! a pixel is inside when its center is.
//!
//! ```
//! use edgefill::{Bitmap, Canvas, Color, Paint, Rect};
//!
//! let mut bitmap = Bitmap::new(100, 100);
//! let mut canvas = Canvas::new(&mut bitmap);
//! canvas.draw_rect(&Rect::new(10.0, 10.0, 50.0, 50.0), &Paint::new(Color::rgb(1.0, 0.0, 0.0)));
//! assert_eq!(bitmap.pixel(10, 10).0, 0xFFFF_0000);
//! ```

// Foundation types & math
pub mod basics;
pub mod color;
pub mod curves;
pub mod trans_affine;

// Geometry
pub mod path;
pub mod stroke;

// Scan conversion
pub mod edge;
pub mod edge_builder;
pub mod scan_converter;

// Pixels & compositing
pub mod bitmap;
pub mod blend;
pub mod compositor;

// Shaders
pub mod shader;
pub mod span_gouraud;
pub mod span_gradient;
pub mod span_image;

// Drawing API
pub mod canvas;
pub mod paint;

pub use basics::{Point, Rect};
pub use bitmap::Bitmap;
pub use blend::BlendMode;
pub use canvas::{Canvas, CanvasOptions};
pub use color::{Color, Pixel};
pub use paint::Paint;
pub use path::{Direction, Path};
pub use scan_converter::FillMode;
pub use shader::{Shader, TileMode};
pub use span_image::FilterMode;
pub use stroke::LineCap;
pub use trans_affine::TransAffine;
