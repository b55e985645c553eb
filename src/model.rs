use image::RgbaImage;

use crate::error::{TilemarkError, TilemarkResult};

/// One explicit parameter set per render, constructed by the caller.
///
/// Geometry is expressed in canvas pixels. `scale` multiplies the native
/// glyph cell size, `glyph_spacing` is the horizontal gap between glyphs
/// inside one strip, and `tile_spacing_x`/`tile_spacing_y` pad the repeating
/// grid between stamped strips.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WatermarkParameters {
    pub text: String,
    pub scale: f32,
    pub rotation_degrees: f32,
    pub glyph_spacing: f32,
    pub tile_spacing_x: f32,
    pub tile_spacing_y: f32,
    /// Global alpha multiplier for the watermark layer, in `[0, 1]`.
    pub opacity: f32,
    /// Optional recolor applied to the layer before blending (RGB).
    pub tint: Option<[u8; 3]>,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl Default for WatermarkParameters {
    fn default() -> Self {
        Self {
            text: String::new(),
            scale: 1.0,
            rotation_degrees: -30.0,
            glyph_spacing: 8.0,
            tile_spacing_x: 48.0,
            tile_spacing_y: 48.0,
            opacity: 0.4,
            tint: None,
            canvas_width: 1200,
            canvas_height: 800,
        }
    }
}

impl WatermarkParameters {
    pub fn validate(&self) -> TilemarkResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(TilemarkError::configuration("scale must be finite and > 0"));
        }
        if !self.rotation_degrees.is_finite() {
            return Err(TilemarkError::configuration("rotation_degrees must be finite"));
        }
        if !self.glyph_spacing.is_finite() || self.glyph_spacing < 0.0 {
            return Err(TilemarkError::configuration(
                "glyph_spacing must be finite and >= 0",
            ));
        }
        if !self.tile_spacing_x.is_finite()
            || !self.tile_spacing_y.is_finite()
            || self.tile_spacing_x < 0.0
            || self.tile_spacing_y < 0.0
        {
            return Err(TilemarkError::configuration(
                "tile_spacing_x/y must be finite and >= 0",
            ));
        }
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(TilemarkError::configuration("opacity must be in [0, 1]"));
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(TilemarkError::configuration("canvas width/height must be > 0"));
        }
        Ok(())
    }
}

/// Background the watermark layer is previewed or composited against.
///
/// `TransparentGrid` is a checkerboard rendered purely for visualization of
/// transparency; exporting the true transparent layer goes through
/// [`RenderResult::layer`] instead.
#[derive(Clone, Debug)]
pub enum Backdrop {
    Gray,
    Black,
    White,
    TransparentGrid,
    Photo(RgbaImage),
}

/// Output of one render call. Both buffers are immutable results; `layer`
/// is the standalone watermark (post tint/opacity, transparent background).
#[derive(Clone, Debug)]
pub struct RenderResult {
    pub image: RgbaImage,
    pub layer: RgbaImage,
}

/// Parses `RRGGBB` or `#RRGGBB` into an RGB triple.
pub fn parse_tint(s: &str) -> TilemarkResult<[u8; 3]> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(TilemarkError::configuration(format!(
            "tint must be RRGGBB hex, got '{s}'"
        )));
    }
    let channel = |i: usize| -> TilemarkResult<u8> {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| TilemarkError::configuration(format!("bad tint component in '{s}'")))
    };
    Ok([channel(0)?, channel(2)?, channel(4)?])
}
