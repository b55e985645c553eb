use tilemark::{Backdrop, GlyphStore, WatermarkParameters, export::export_png, generate};

#[test]
fn exported_layer_reloads_byte_exact() {
    let glyphs = tempfile::tempdir().unwrap();
    let store = GlyphStore::load(glyphs.path());
    let params = WatermarkParameters {
        text: "XY".to_string(),
        rotation_degrees: 17.0,
        opacity: 0.65,
        tint: Some([0, 80, 160]),
        canvas_width: 96,
        canvas_height: 96,
        ..Default::default()
    };

    let result = generate(&params, &store, &Backdrop::TransparentGrid).unwrap();

    let out = tempfile::tempdir().unwrap();
    let path = out.path().join("layer.png");
    export_png(&result.layer, &path).unwrap();

    // PNG is lossless: the reloaded buffer matches the original exactly,
    // alpha included, and carries no checkerboard pixels.
    let reloaded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(reloaded, result.layer);
    assert!(reloaded.pixels().any(|p| p.0[3] == 0));
}

#[test]
fn exported_composite_is_opaque() {
    let glyphs = tempfile::tempdir().unwrap();
    let store = GlyphStore::load(glyphs.path());
    let params = WatermarkParameters {
        canvas_width: 48,
        canvas_height: 48,
        ..Default::default()
    };

    let result = generate(&params, &store, &Backdrop::White).unwrap();

    let out = tempfile::tempdir().unwrap();
    let path = out.path().join("composite.png");
    export_png(&result.image, &path).unwrap();

    let reloaded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(reloaded, result.image);
    assert!(reloaded.pixels().all(|p| p.0[3] == 255));
}
