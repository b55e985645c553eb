use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tilemark::{Backdrop, GlyphStore, WatermarkParameters, model::parse_tint};

#[derive(Parser, Debug)]
#[command(name = "tilemark", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite the watermark over a backdrop or photo and write a PNG.
    Generate(GenerateArgs),
    /// Write the standalone watermark layer as a transparent PNG.
    Layer(LayerArgs),
}

#[derive(Args, Debug)]
struct PatternArgs {
    /// JSON parameters file; individual flags override its values.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Watermark text (empty renders a single marker glyph).
    #[arg(long)]
    text: Option<String>,

    /// Folder of single-character glyph PNGs (a.png, B.png, 7.png, ...).
    #[arg(long, default_value = "glyphs")]
    glyphs: PathBuf,

    /// Marker PNG used when a character has no glyph asset.
    #[arg(long)]
    marker: Option<PathBuf>,

    /// Uniform glyph scale (> 0).
    #[arg(long)]
    scale: Option<f32>,

    /// Strip rotation in degrees.
    #[arg(long)]
    rotation: Option<f32>,

    /// Horizontal gap between glyphs inside one strip, in pixels.
    #[arg(long)]
    glyph_spacing: Option<f32>,

    /// Horizontal gap between tiled strips, in pixels.
    #[arg(long)]
    tile_spacing_x: Option<f32>,

    /// Vertical gap between tiled strips, in pixels.
    #[arg(long)]
    tile_spacing_y: Option<f32>,

    /// Watermark opacity in [0, 1].
    #[arg(long)]
    opacity: Option<f32>,

    /// Recolor the watermark with an RRGGBB hex tint.
    #[arg(long)]
    tint: Option<String>,

    #[arg(long)]
    canvas_width: Option<u32>,

    #[arg(long)]
    canvas_height: Option<u32>,
}

impl PatternArgs {
    fn resolve(&self) -> anyhow::Result<WatermarkParameters> {
        let mut params = match &self.params {
            Some(path) => {
                let f = File::open(path)
                    .with_context(|| format!("open parameters '{}'", path.display()))?;
                serde_json::from_reader(BufReader::new(f)).context("parse parameters JSON")?
            }
            None => WatermarkParameters::default(),
        };

        if let Some(text) = &self.text {
            params.text = text.clone();
        }
        if let Some(scale) = self.scale {
            params.scale = scale;
        }
        if let Some(rotation) = self.rotation {
            params.rotation_degrees = rotation;
        }
        if let Some(spacing) = self.glyph_spacing {
            params.glyph_spacing = spacing;
        }
        if let Some(spacing) = self.tile_spacing_x {
            params.tile_spacing_x = spacing;
        }
        if let Some(spacing) = self.tile_spacing_y {
            params.tile_spacing_y = spacing;
        }
        if let Some(opacity) = self.opacity {
            params.opacity = opacity;
        }
        if let Some(tint) = &self.tint {
            params.tint = Some(parse_tint(tint)?);
        }
        if let Some(width) = self.canvas_width {
            params.canvas_width = width;
        }
        if let Some(height) = self.canvas_height {
            params.canvas_height = height;
        }

        Ok(params)
    }

    fn store(&self) -> GlyphStore {
        GlyphStore::load_with_marker(&self.glyphs, self.marker.as_deref())
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    pattern: PatternArgs,

    /// Solid backdrop color (ignored when --photo is given). The
    /// transparency checkerboard is a preview-only mode and is never
    /// exported; use the `layer` subcommand for true transparency.
    #[arg(long, value_enum, default_value_t = BackdropChoice::Gray)]
    backdrop: BackdropChoice,

    /// Photo to composite over; the canvas takes its size unless
    /// --canvas-width/--canvas-height override it.
    #[arg(long)]
    photo: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct LayerArgs {
    #[command(flatten)]
    pattern: PatternArgs,

    /// Output PNG path (transparent background, alpha preserved).
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackdropChoice {
    Gray,
    Black,
    White,
}

impl From<BackdropChoice> for Backdrop {
    fn from(choice: BackdropChoice) -> Self {
        match choice {
            BackdropChoice::Gray => Backdrop::Gray,
            BackdropChoice::Black => Backdrop::Black,
            BackdropChoice::White => Backdrop::White,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Layer(args) => cmd_layer(args),
    }
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut params = args.pattern.resolve()?;

    let backdrop = match &args.photo {
        Some(path) => {
            let photo = image::open(path)
                .with_context(|| format!("open photo '{}'", path.display()))?
                .to_rgba8();
            if args.pattern.canvas_width.is_none() {
                params.canvas_width = photo.width();
            }
            if args.pattern.canvas_height.is_none() {
                params.canvas_height = photo.height();
            }
            Backdrop::Photo(photo)
        }
        None => args.backdrop.into(),
    };

    let store = args.pattern.store();
    let result = tilemark::generate(&params, &store, &backdrop)?;
    tilemark::export::export_png(&result.image, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_layer(args: LayerArgs) -> anyhow::Result<()> {
    let params = args.pattern.resolve()?;
    let store = args.pattern.store();

    let layer = tilemark::render_layer(&params, &store)?;
    tilemark::export::export_png(&layer, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
