#![forbid(unsafe_code)]

pub mod composite;
pub mod error;
pub mod export;
pub mod glyphs;
pub mod model;
pub mod pipeline;
pub mod strip;
pub mod tile;

pub use composite::composite;
pub use error::{TilemarkError, TilemarkResult};
pub use glyphs::GlyphStore;
pub use model::{Backdrop, RenderResult, WatermarkParameters};
pub use pipeline::{generate, render_layer};
pub use strip::{GlyphStrip, render_strip};
pub use tile::tile;
