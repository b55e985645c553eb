pub type TilemarkResult<T> = Result<T, TilemarkError>;

#[derive(thiserror::Error, Debug)]
pub enum TilemarkError {
    /// A glyph or marker file could not be read or decoded. Recovered
    /// locally by falling back to the default marker; never aborts a render.
    #[error("asset load error: {0}")]
    AssetLoad(String),

    /// Degenerate or out-of-range watermark parameters. Aborts the render.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TilemarkError {
    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            TilemarkError::asset_load("x")
                .to_string()
                .contains("asset load error:")
        );
        assert!(
            TilemarkError::configuration("x")
                .to_string()
                .contains("configuration error:")
        );
    }

    #[test]
    fn io_preserves_source_message() {
        let base = std::io::Error::other("boom");
        let err = TilemarkError::from(base);
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn other_is_transparent() {
        let err = TilemarkError::Other(anyhow::anyhow!("deep failure"));
        assert!(err.to_string().contains("deep failure"));
    }
}
