use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::{
    composite::stamp,
    error::{TilemarkError, TilemarkResult},
    strip::GlyphStrip,
};

/// Replicates the strip across a `canvas_width x canvas_height` transparent
/// canvas on a regular grid.
///
/// The strip is first rotated (bilinear, expanded bounding box), then
/// stamped at `(i * pitch_x, j * pitch_y)` starting one pitch before the
/// origin, so partial tiles flow in from every edge and the pattern has no
/// seam at canvas boundaries. Later stamps blend over earlier ones with
/// standard alpha-over.
pub fn tile(
    strip: &GlyphStrip,
    rotation_degrees: f32,
    tile_spacing_x: f32,
    tile_spacing_y: f32,
    canvas_width: u32,
    canvas_height: u32,
) -> TilemarkResult<RgbaImage> {
    if canvas_width == 0 || canvas_height == 0 {
        return Err(TilemarkError::configuration("canvas width/height must be > 0"));
    }

    let rotated = rotate_rgba(&strip.image, rotation_degrees);

    let pitch_x = rotated.width() as f32 + tile_spacing_x;
    let pitch_y = rotated.height() as f32 + tile_spacing_y;
    if !pitch_x.is_finite() || !pitch_y.is_finite() || pitch_x <= 0.0 || pitch_y <= 0.0 {
        return Err(TilemarkError::configuration(format!(
            "tile pitch must be > 0 in both axes (got {pitch_x} x {pitch_y})"
        )));
    }
    let pitch_x = (pitch_x.round() as i64).max(1);
    let pitch_y = (pitch_y.round() as i64).max(1);

    let mut layer = RgbaImage::new(canvas_width, canvas_height);
    let mut stamps = 0u32;

    let mut y = -pitch_y;
    while y < i64::from(canvas_height) {
        let mut x = -pitch_x;
        while x < i64::from(canvas_width) {
            stamp(&mut layer, &rotated, x, y);
            stamps += 1;
            x += pitch_x;
        }
        y += pitch_y;
    }

    debug!(stamps, pitch_x, pitch_y, "tiled watermark layer");
    Ok(layer)
}

/// Rotates an RGBA image about its center, expanding the canvas to the
/// rotated bounding box with transparent padding.
///
/// Resampling is inverse-mapped bilinear with alpha-weighted color
/// accumulation, so transparent texels never bleed color into the result.
/// A rotation that is a multiple of 360 degrees is an exact pass-through.
pub fn rotate_rgba(image: &RgbaImage, degrees: f32) -> RgbaImage {
    let turns = degrees.rem_euclid(360.0);
    if turns == 0.0 {
        return image.clone();
    }

    let theta = f64::from(turns).to_radians();
    let (mut sin, mut cos) = theta.sin_cos();
    // Snap to exact axis alignment so 90/180/270 degree turns keep crisp
    // dimensions instead of growing by a residue pixel.
    if sin.abs() < 1e-12 {
        sin = 0.0;
    }
    if cos.abs() < 1e-12 {
        cos = 0.0;
    }
    let (w, h) = image.dimensions();
    let (wf, hf) = (f64::from(w), f64::from(h));

    let out_w = (wf * cos.abs() + hf * sin.abs()).ceil() as u32;
    let out_h = (wf * sin.abs() + hf * cos.abs()).ceil() as u32;

    let src_cx = wf / 2.0;
    let src_cy = hf / 2.0;
    let dst_cx = f64::from(out_w) / 2.0;
    let dst_cy = f64::from(out_h) / 2.0;

    RgbaImage::from_fn(out_w, out_h, |x, y| {
        // Inverse rotation of the destination pixel center.
        let dx = f64::from(x) + 0.5 - dst_cx;
        let dy = f64::from(y) + 0.5 - dst_cy;
        let sx = dx * cos + dy * sin + src_cx - 0.5;
        let sy = -dx * sin + dy * cos + src_cy - 0.5;
        sample_bilinear(image, sx, sy)
    })
}

fn sample_bilinear(image: &RgbaImage, sx: f64, sy: f64) -> Rgba<u8> {
    let x0 = sx.floor();
    let y0 = sy.floor();
    let fx = sx - x0;
    let fy = sy - y0;

    let weights = [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x0 + 1.0, y0, fx * (1.0 - fy)),
        (x0, y0 + 1.0, (1.0 - fx) * fy),
        (x0 + 1.0, y0 + 1.0, fx * fy),
    ];

    let mut alpha_acc = 0.0f64;
    let mut color_acc = [0.0f64; 3];
    for (px, py, weight) in weights {
        if weight <= 0.0 || px < 0.0 || py < 0.0 {
            continue;
        }
        let (px, py) = (px as u32, py as u32);
        if px >= image.width() || py >= image.height() {
            continue;
        }
        let texel = image.get_pixel(px, py).0;
        let a = weight * f64::from(texel[3]);
        alpha_acc += a;
        for (acc, &c) in color_acc.iter_mut().zip(&texel[..3]) {
            *acc += a * f64::from(c);
        }
    }

    if alpha_acc <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let alpha = alpha_acc.round().clamp(0.0, 255.0) as u8;
    let channel = |i: usize| (color_acc[i] / alpha_acc).round().clamp(0.0, 255.0) as u8;
    Rgba([channel(0), channel(1), channel(2), alpha])
}
