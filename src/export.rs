use std::path::Path;

use image::RgbaImage;
use tracing::debug;

use crate::error::{TilemarkError, TilemarkResult};

/// Writes `image` as a PNG (alpha preserved) at `path`.
///
/// Parent directories are created as needed. The encode goes to a temporary
/// file in the destination directory which is then atomically renamed into
/// place, so a failed export never leaves a partial file behind.
pub fn export_png(image: &RgbaImage, path: impl AsRef<Path>) -> TilemarkResult<()> {
    let path = path.as_ref();
    if image.width() == 0 || image.height() == 0 {
        return Err(TilemarkError::Io(std::io::Error::other(
            "png forbids zero-sized images",
        )));
    }
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            parent
        }
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    image
        .write_to(tmp.as_file_mut(), image::ImageFormat::Png)
        .map_err(|err| {
            TilemarkError::Io(std::io::Error::other(format!(
                "encode png '{}': {err}",
                path.display()
            )))
        })?;
    tmp.persist(path).map_err(|err| TilemarkError::Io(err.error))?;

    debug!(path = %path.display(), "exported png");
    Ok(())
}
