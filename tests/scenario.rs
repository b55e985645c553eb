//! End-to-end render: marker-fallback text, unrotated grid, gray backdrop.

use tilemark::{Backdrop, GlyphStore, WatermarkParameters, generate};

fn empty_store() -> GlyphStore {
    let dir = tempfile::tempdir().unwrap();
    GlyphStore::load(dir.path())
}

fn scenario_params() -> WatermarkParameters {
    WatermarkParameters {
        text: "AB12".to_string(),
        scale: 1.0,
        rotation_degrees: 0.0,
        glyph_spacing: 4.0,
        tile_spacing_x: 20.0,
        tile_spacing_y: 20.0,
        opacity: 0.5,
        tint: None,
        canvas_width: 200,
        canvas_height: 200,
    }
}

// Geometry with the 64px builtin marker: strip = 4*64 + 3*4 = 268x64,
// pitch = 288x84, stamps visible at x=0 and y in {0, 84, 168}.
const GLYPH: u32 = 64;
const GAP: u32 = 4;
const PITCH_Y: u32 = 84;

#[test]
fn produces_canvas_sized_semi_transparent_grid() {
    let store = empty_store();
    assert!(store.is_empty());

    let result = generate(&scenario_params(), &store, &Backdrop::Gray).unwrap();
    assert_eq!(result.image.dimensions(), (200, 200));
    assert_eq!(result.layer.dimensions(), (200, 200));

    // Composited over an opaque backdrop: fully opaque everywhere.
    assert!(result.image.pixels().all(|p| p.0[3] == 255));

    // A pixel on the marker ring carries exactly half the layer's alpha.
    let ring = result.layer.get_pixel(31, 10).0;
    assert_eq!(ring[3], 128);
    assert_eq!(&ring[..3], &[40, 40, 40]);

    // Inter-glyph gap and inter-tile gutter are untouched backdrop.
    assert_eq!(result.layer.get_pixel(66, 10).0[3], 0);
    assert_eq!(result.image.get_pixel(66, 70).0, [128, 128, 128, 255]);

    // Watermark pixels blend toward the marker color, between the two.
    let blended = result.image.get_pixel(31, 10).0;
    assert!(blended[0] > 40 && blended[0] < 128);
}

#[test]
fn strip_spans_marker_glyphs_with_fixed_gaps() {
    let store = empty_store();
    let result = generate(&scenario_params(), &store, &Backdrop::Gray).unwrap();

    // Glyph k starts at k * (glyph + gap); the 4th falls off the 200px canvas.
    for k in 0..3u32 {
        let x0 = k * (GLYPH + GAP);
        assert!(
            result.layer.get_pixel(x0 + 31, 10).0[3] > 0,
            "glyph {k} missing at column {x0}"
        );
        if k > 0 {
            let gap_x = x0 - GAP / 2;
            assert_eq!(result.layer.get_pixel(gap_x, 10).0[3], 0, "gap before glyph {k}");
        }
    }
}

#[test]
fn tiles_repeat_on_exact_vertical_pitch() {
    let store = empty_store();
    let result = generate(&scenario_params(), &store, &Backdrop::Gray).unwrap();

    for y in (0..GLYPH).step_by(5) {
        for x in (0..200u32).step_by(7) {
            assert_eq!(
                result.layer.get_pixel(x, y),
                result.layer.get_pixel(x, y + PITCH_Y),
                "pattern mismatch at ({x},{y})"
            );
        }
    }

    // Gutter rows between stamped rows are fully transparent.
    for y in GLYPH..PITCH_Y {
        for x in 0..200u32 {
            assert_eq!(result.layer.get_pixel(x, y).0[3], 0);
        }
    }
}
