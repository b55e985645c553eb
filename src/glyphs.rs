use std::{collections::HashMap, path::Path};

use image::{Rgba, RgbaImage, imageops};
use tracing::{debug, warn};

/// Side of the builtin marker, which also fixes the glyph cell height.
const MARKER_SIZE: u32 = 64;

/// Immutable per-character raster assets plus the fallback marker.
///
/// Loaded once per glyphs-folder selection and shared across renders.
/// Lookups never fail: any character without a custom asset resolves to the
/// marker, so unsupported input degrades instead of aborting a render.
#[derive(Clone, Debug)]
pub struct GlyphStore {
    glyphs: HashMap<char, RgbaImage>,
    marker: RgbaImage,
}

impl GlyphStore {
    /// Scans `folder` for PNG files whose stem is a single ASCII
    /// alphanumeric character. A missing or empty folder yields an empty
    /// store; unreadable files are skipped with a warning.
    pub fn load(folder: impl AsRef<Path>) -> Self {
        Self::load_with_marker(folder, None::<&Path>)
    }

    /// Like [`GlyphStore::load`], with an on-disk replacement for the
    /// default marker (`origin.png`). Falls back to the builtin marker if
    /// the replacement cannot be read.
    pub fn load_with_marker(folder: impl AsRef<Path>, marker: Option<impl AsRef<Path>>) -> Self {
        let marker = match marker {
            Some(path) => {
                let path = path.as_ref();
                match image::open(path) {
                    Ok(img) => img.to_rgba8(),
                    Err(err) => {
                        warn!(path = %path.display(), %err, "marker unreadable, using builtin");
                        builtin_marker()
                    }
                }
            }
            None => builtin_marker(),
        };

        let cell_height = marker.height();
        let mut glyphs = HashMap::new();
        let folder = folder.as_ref();

        let entries = match std::fs::read_dir(folder) {
            Ok(entries) => entries,
            Err(_) => {
                debug!(folder = %folder.display(), "glyphs folder missing, store is empty");
                return Self { glyphs, marker };
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let Some(ch) = glyph_key(&path) else {
                continue;
            };
            match image::open(&path) {
                Ok(img) => {
                    let normalized = normalize_cell_height(img.to_rgba8(), cell_height);
                    glyphs.insert(ch, normalized);
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "glyph unreadable, skipped");
                }
            }
        }

        debug!(count = glyphs.len(), folder = %folder.display(), "glyph store loaded");
        Self { glyphs, marker }
    }

    /// Resolves `ch` to its custom glyph image, or the marker when no asset
    /// matches (unsupported characters included).
    pub fn lookup(&self, ch: char) -> &RgbaImage {
        self.glyphs.get(&ch).unwrap_or(&self.marker)
    }

    pub fn has_glyph(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }

    pub fn marker(&self) -> &RgbaImage {
        &self.marker
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Accepts `a.png`..`z.png`, `A.png`..`Z.png`, `0.png`..`9.png`.
fn glyph_key(path: &Path) -> Option<char> {
    let ext = path.extension()?.to_str()?;
    if !ext.eq_ignore_ascii_case("png") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let mut chars = stem.chars();
    let ch = chars.next()?;
    if chars.next().is_some() || !ch.is_ascii_alphanumeric() {
        return None;
    }
    Some(ch)
}

fn normalize_cell_height(img: RgbaImage, cell_height: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    if h == cell_height || h == 0 || w == 0 {
        return img;
    }
    let scaled_w = ((w as f32) * (cell_height as f32) / (h as f32)).round().max(1.0) as u32;
    imageops::resize(&img, scaled_w, cell_height, imageops::FilterType::Triangle)
}

/// The always-present fallback glyph: an opaque dark ring with a soft edge,
/// drawn procedurally so lookups can never fail on a missing asset file.
fn builtin_marker() -> RgbaImage {
    let size = MARKER_SIZE;
    let center = (size as f32 - 1.0) / 2.0;
    let outer = size as f32 * 0.42;
    let inner = size as f32 * 0.26;

    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        let dist = (dx * dx + dy * dy).sqrt();
        // 1px soft edge on both ring boundaries.
        let coverage = (outer - dist).clamp(0.0, 1.0) * (dist - inner).clamp(0.0, 1.0);
        let alpha = (coverage * 255.0).round() as u8;
        Rgba([40, 40, 40, alpha])
    })
}
