use image::{Rgba, RgbaImage, imageops};

use crate::model::{Backdrop, RenderResult};

pub type StraightRgba8 = [u8; 4];

const GRID_CELL: u32 = 8;
const GRID_LIGHT: u8 = 240;
const GRID_DARK: u8 = 200;
const GRAY_FILL: u8 = 128;

/// Blends the watermark layer over a backdrop.
///
/// Order of operations: optional recolor tint (alpha untouched), then the
/// global opacity multiplier on alpha, then straight-alpha "over" onto the
/// backdrop. Inputs are never mutated; the returned [`RenderResult`] carries
/// both the composited image and the standalone post-tint/opacity layer.
pub fn composite(
    layer: &RgbaImage,
    backdrop: &Backdrop,
    opacity: f32,
    tint: Option<[u8; 3]>,
) -> RenderResult {
    let tinted = match tint {
        Some(rgb) => tint_layer(layer, rgb),
        None => layer.clone(),
    };
    let layer = apply_opacity(&tinted, opacity);

    let mut image = backdrop_canvas(backdrop, layer.width(), layer.height());
    stamp(&mut image, &layer, 0, 0);

    RenderResult { image, layer }
}

/// Straight-alpha "over": `src` on top of `dst`, integer math, exact noops
/// for fully transparent or fully opaque sources.
pub fn over(dst: StraightRgba8, src: StraightRgba8) -> StraightRgba8 {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let da = u32::from(dst[3]);
    let inv = 255 - sa;
    let dst_weight = (da * inv + 127) / 255;
    let out_a = sa + dst_weight;
    if out_a == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    out[3] = out_a as u8;
    for i in 0..3 {
        let num = u32::from(src[i]) * sa + u32::from(dst[i]) * dst_weight;
        out[i] = ((num + out_a / 2) / out_a) as u8;
    }
    out
}

/// Alpha-over stamps `src` onto `dst` at `(x, y)`; offsets may be negative
/// and the source is clipped to the destination bounds.
pub fn stamp(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    let (dst_w, dst_h) = (i64::from(dst.width()), i64::from(dst.height()));
    for sy in 0..src.height() {
        let dy = y + i64::from(sy);
        if dy < 0 {
            continue;
        }
        if dy >= dst_h {
            break;
        }
        for sx in 0..src.width() {
            let dx = x + i64::from(sx);
            if dx < 0 {
                continue;
            }
            if dx >= dst_w {
                break;
            }
            let blended = over(
                dst.get_pixel(dx as u32, dy as u32).0,
                src.get_pixel(sx, sy).0,
            );
            dst.put_pixel(dx as u32, dy as u32, Rgba(blended));
        }
    }
}

/// Replaces RGB with `rgb` wherever the layer has any coverage, preserving
/// alpha exactly (recoloring, not re-blending).
pub fn tint_layer(layer: &RgbaImage, rgb: [u8; 3]) -> RgbaImage {
    RgbaImage::from_fn(layer.width(), layer.height(), |x, y| {
        let px = layer.get_pixel(x, y).0;
        if px[3] > 0 {
            Rgba([rgb[0], rgb[1], rgb[2], px[3]])
        } else {
            Rgba(px)
        }
    })
}

/// Multiplies every alpha value by `opacity`, clamped to `[0, 1]`.
pub fn apply_opacity(layer: &RgbaImage, opacity: f32) -> RgbaImage {
    let opacity = opacity.clamp(0.0, 1.0);
    RgbaImage::from_fn(layer.width(), layer.height(), |x, y| {
        let mut px = layer.get_pixel(x, y).0;
        px[3] = ((px[3] as f32) * opacity).round() as u8;
        Rgba(px)
    })
}

/// Produces the background canvas for a backdrop mode.
///
/// The checkerboard exists only to visualize transparency in previews; the
/// true transparent output is [`RenderResult::layer`]. A photo backdrop is
/// scaled to the canvas (bilinear) when its dimensions differ.
pub fn backdrop_canvas(backdrop: &Backdrop, width: u32, height: u32) -> RgbaImage {
    match backdrop {
        Backdrop::Gray => solid(width, height, [GRAY_FILL, GRAY_FILL, GRAY_FILL, 255]),
        Backdrop::Black => solid(width, height, [0, 0, 0, 255]),
        Backdrop::White => solid(width, height, [255, 255, 255, 255]),
        Backdrop::TransparentGrid => RgbaImage::from_fn(width, height, |x, y| {
            let v = if (x / GRID_CELL + y / GRID_CELL) % 2 == 0 {
                GRID_LIGHT
            } else {
                GRID_DARK
            };
            Rgba([v, v, v, 255])
        }),
        Backdrop::Photo(photo) => {
            if photo.dimensions() == (width, height) {
                photo.clone()
            } else {
                imageops::resize(photo, width, height, imageops::FilterType::Triangle)
            }
        }
    }
}

fn solid(width: u32, height: u32, px: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(px))
}
