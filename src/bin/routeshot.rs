use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use routeshot::{
    Canvas, DEFAULT_EXPORT_FILE_NAME, DEFAULT_OVERLAY_OPACITY, DEFAULT_OVERLAY_SIZE,
    ExportOptions, OverlaySession, OverlayTransform, RasterOptions, RouteStyle, Size, Vec2,
    rasterize_route, write_png,
};

#[derive(Parser, Debug)]
#[command(name = "routeshot", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rasterize a track to a transparent route PNG.
    Route(RouteArgs),
    /// Compose a track over a background photo and export a PNG.
    Compose(ComposeArgs),
}

#[derive(Parser, Debug)]
struct RouteArgs {
    /// Input GPX track.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Route canvas width in pixels.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Route canvas height in pixels.
    #[arg(long, default_value_t = 600)]
    height: u32,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input GPX track.
    #[arg(long)]
    gpx: PathBuf,

    /// Background photo (any format the decoder understands).
    #[arg(long)]
    background: PathBuf,

    /// Output PNG path.
    #[arg(long, default_value = DEFAULT_EXPORT_FILE_NAME)]
    out: PathBuf,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 800)]
    viewport_width: u32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 500)]
    viewport_height: u32,

    /// Output pixels per viewport pixel.
    #[arg(long, default_value_t = 2.0)]
    pixel_ratio: f64,

    /// Overlay placement as JSON, overriding the individual flags below.
    #[arg(long)]
    transform: Option<PathBuf>,

    /// Overlay left edge in viewport pixels.
    #[arg(long, default_value_t = 0.0)]
    pos_x: f64,

    /// Overlay top edge in viewport pixels.
    #[arg(long, default_value_t = 0.0)]
    pos_y: f64,

    /// Overlay box size (square) in viewport pixels.
    #[arg(long, default_value_t = DEFAULT_OVERLAY_SIZE)]
    size: f64,

    /// Overlay opacity in [0, 1].
    #[arg(long, default_value_t = DEFAULT_OVERLAY_OPACITY)]
    opacity: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Route(args) => cmd_route(args),
        Command::Compose(args) => cmd_compose(args),
    }
}

fn cmd_route(args: RouteArgs) -> anyhow::Result<()> {
    let points = routeshot::parse_track_file(&args.in_path)?;
    let opts = RasterOptions {
        canvas: Canvas {
            width: args.width,
            height: args.height,
        },
        ..RasterOptions::default()
    };
    let raster = rasterize_route(&points, opts, RouteStyle::default())?;

    let frame = routeshot::FrameRgba {
        width: raster.width,
        height: raster.height,
        data: raster.rgba8_premul.as_ref().clone(),
    };
    write_png(&frame, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let transform = match &args.transform {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read transform '{}'", path.display()))?;
            serde_json::from_str::<OverlayTransform>(&json)
                .with_context(|| format!("parse transform '{}'", path.display()))?
        }
        None => OverlayTransform {
            position: Vec2::new(args.pos_x, args.pos_y),
            size: Size::new(args.size, args.size),
            opacity: args.opacity,
        },
    };

    let mut session = OverlaySession::new();
    session.load_track(&args.gpx)?;
    session.load_background_file(&args.background)?;
    session.controller_mut().set_transform(transform);

    let frame = session.export(ExportOptions {
        viewport: Canvas {
            width: args.viewport_width,
            height: args.viewport_height,
        },
        pixel_ratio: args.pixel_ratio,
    })?;
    write_png(&frame, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
