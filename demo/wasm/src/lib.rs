use wasm_bindgen::prelude::*;

mod render;

pub use render::to_rgba;

/// Render a named demo into an RGBA pixel buffer.
///
/// Returns a `Vec<u8>` of RGBA pixel data (width * height * 4 bytes).
/// The TypeScript frontend copies this into an ImageData for canvas display.
#[wasm_bindgen]
pub fn render_demo(name: &str, width: u32, height: u32, params: &[f64]) -> Vec<u8> {
    match name {
        "shapes" => render::shapes(width, height, params),
        "star" => render::star(width, height, params),
        "gradients" => render::gradients(width, height, params),
        "bitmap" => render::bitmap(width, height, params),
        "mesh" => render::mesh(width, height, params),
        "blend_modes" => render::blend_modes(width, height, params),
        "strokes" => render::strokes(width, height, params),
        _ => render::fallback(width, height),
    }
}

/// Get the library version string.
#[wasm_bindgen]
pub fn version() -> String {
    format!("edgefill {}", env!("CARGO_PKG_VERSION"))
}

/// Get list of available demo names.
#[wasm_bindgen]
pub fn demo_names() -> String {
    "shapes,star,gradients,bitmap,mesh,blend_modes,strokes".to_string()
}
