use image::{RgbaImage, imageops};

use crate::{
    composite::stamp,
    error::{TilemarkError, TilemarkResult},
    glyphs::GlyphStore,
};

/// One composed instance of the watermark text: glyphs placed left to right
/// on a shared top edge, separated by a uniform gap.
#[derive(Clone, Debug)]
pub struct GlyphStrip {
    pub image: RgbaImage,
    pub width: u32,
    pub height: u32,
}

/// Composes `text` into a single strip image.
///
/// Each glyph is scaled by `scale` (bilinear) and advances the cursor by its
/// scaled width plus `spacing` pixels; the trailing gap is not part of the
/// strip width. Empty text renders a single marker glyph so the watermark is
/// never degenerate. Layout is integer-pixel: scaled dimensions and the gap
/// round to the nearest pixel, with a 1px floor on glyph dimensions.
pub fn render_strip(
    text: &str,
    store: &GlyphStore,
    scale: f32,
    spacing: f32,
) -> TilemarkResult<GlyphStrip> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(TilemarkError::configuration("strip scale must be finite and > 0"));
    }
    if !spacing.is_finite() || spacing < 0.0 {
        return Err(TilemarkError::configuration(
            "glyph spacing must be finite and >= 0",
        ));
    }

    let glyphs: Vec<&RgbaImage> = if text.is_empty() {
        vec![store.marker()]
    } else {
        text.chars().map(|ch| store.lookup(ch)).collect()
    };

    let scaled: Vec<RgbaImage> = glyphs
        .iter()
        .map(|glyph| scale_glyph(glyph, scale))
        .collect();

    let gap = spacing.round() as u32;
    let width: u32 =
        scaled.iter().map(|g| g.width()).sum::<u32>() + gap * (scaled.len() as u32 - 1);
    let height = scaled.iter().map(|g| g.height()).max().unwrap_or(1);

    let mut image = RgbaImage::new(width, height);
    let mut cursor: i64 = 0;
    for glyph in &scaled {
        stamp(&mut image, glyph, cursor, 0);
        cursor += i64::from(glyph.width()) + i64::from(gap);
    }

    Ok(GlyphStrip { image, width, height })
}

fn scale_glyph(glyph: &RgbaImage, scale: f32) -> RgbaImage {
    let (w, h) = glyph.dimensions();
    let scaled_w = ((w as f32) * scale).round().max(1.0) as u32;
    let scaled_h = ((h as f32) * scale).round().max(1.0) as u32;
    if (scaled_w, scaled_h) == (w, h) {
        return glyph.clone();
    }
    imageops::resize(glyph, scaled_w, scaled_h, imageops::FilterType::Triangle)
}
