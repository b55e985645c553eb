use image::RgbaImage;

use crate::{
    composite::{apply_opacity, backdrop_canvas, stamp, tint_layer},
    error::TilemarkResult,
    glyphs::GlyphStore,
    model::{Backdrop, RenderResult, WatermarkParameters},
    strip::render_strip,
    tile::tile,
};

/// Renders the standalone watermark layer: strip layout, tiling, then tint
/// and opacity. No backdrop is involved; callers that only export the
/// transparent layer stop here.
#[tracing::instrument(skip(params, store), fields(text = %params.text))]
pub fn render_layer(
    params: &WatermarkParameters,
    store: &GlyphStore,
) -> TilemarkResult<RgbaImage> {
    params.validate()?;

    let strip = render_strip(&params.text, store, params.scale, params.glyph_spacing)?;
    let layer = tile(
        &strip,
        params.rotation_degrees,
        params.tile_spacing_x,
        params.tile_spacing_y,
        params.canvas_width,
        params.canvas_height,
    )?;

    let layer = match params.tint {
        Some(rgb) => tint_layer(&layer, rgb),
        None => layer,
    };
    Ok(apply_opacity(&layer, params.opacity))
}

/// Runs one full render: [`render_layer`] plus compositing over `backdrop`.
///
/// Pure function boundary for the surrounding shell: no UI awareness, no
/// shared mutable state, synchronous to completion. The glyph store is
/// read-only and reusable across calls; everything else is per-call.
#[tracing::instrument(skip(params, store, backdrop), fields(text = %params.text))]
pub fn generate(
    params: &WatermarkParameters,
    store: &GlyphStore,
    backdrop: &Backdrop,
) -> TilemarkResult<RenderResult> {
    let layer = render_layer(params, store)?;

    let mut image = backdrop_canvas(backdrop, params.canvas_width, params.canvas_height);
    stamp(&mut image, &layer, 0, 0);

    Ok(RenderResult { image, layer })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TilemarkError;

    #[test]
    fn generate_produces_canvas_sized_outputs() {
        let store = GlyphStore::load("/no/such/folder");
        let params = WatermarkParameters {
            text: "WM".to_string(),
            canvas_width: 120,
            canvas_height: 90,
            ..Default::default()
        };
        let result = generate(&params, &store, &Backdrop::Gray).unwrap();
        assert_eq!(result.image.dimensions(), (120, 90));
        assert_eq!(result.layer.dimensions(), (120, 90));
    }

    #[test]
    fn invalid_params_abort_before_rendering() {
        let store = GlyphStore::load("/no/such/folder");
        let params = WatermarkParameters {
            opacity: 7.0,
            ..Default::default()
        };
        let err = generate(&params, &store, &Backdrop::Gray).unwrap_err();
        assert!(matches!(err, TilemarkError::Configuration(_)));
    }

    #[test]
    fn render_layer_matches_the_layer_generate_returns() {
        let store = GlyphStore::load("/no/such/folder");
        let params = WatermarkParameters {
            text: "R2".to_string(),
            tint: Some([30, 60, 90]),
            opacity: 0.7,
            canvas_width: 80,
            canvas_height: 60,
            ..Default::default()
        };
        let layer = render_layer(&params, &store).unwrap();
        let result = generate(&params, &store, &Backdrop::Gray).unwrap();
        assert_eq!(layer, result.layer);
    }

    #[test]
    fn tint_flows_through_to_layer() {
        let store = GlyphStore::load("/no/such/folder");
        let params = WatermarkParameters {
            tint: Some([200, 10, 10]),
            opacity: 1.0,
            rotation_degrees: 0.0,
            canvas_width: 100,
            canvas_height: 100,
            ..Default::default()
        };
        let result = generate(&params, &store, &Backdrop::White).unwrap();
        let covered = result
            .layer
            .pixels()
            .filter(|p| p.0[3] > 0)
            .collect::<Vec<_>>();
        assert!(!covered.is_empty());
        assert!(covered.iter().all(|p| p.0[..3] == [200, 10, 10]));
    }
}
