// What you SEE:
// • The image you passed in, with the object's box drawn in its color.
// • If a mask was given, the masked pixels carry a translucent tint.
// • F filters the mask (stray dots vanish), S saves overlay.png, ESC quits.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::{error, info};

use scribble_overlay::draw::Drawer;
use scribble_overlay::{
    AnnotatedObject, Alpha, BoundingBox, Error, FilterConfig, FrameBuffer, ObjectMap, OverlayConfig,
    OverlayRenderer, Rgb, Rounding,
};

/// Preview the overlay of one annotated object
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Image being annotated
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// Object bounding box as X,Y,W,H in image pixels
    #[arg(long, value_parser = parse_bbox)]
    bbox: BoundingBox,

    /// Scribble mask (grayscale, same size as the box; non-zero = object)
    #[arg(short, long)]
    mask: Option<PathBuf>,

    /// Object color as RRGGBB hex
    #[arg(short, long, default_value = "FF0000", value_parser = parse_color)]
    color: Rgb,

    /// Tint opacity in [0, 1] [default: 120/255]
    #[arg(short, long)]
    alpha: Option<f32>,

    /// Channel rounding after blending
    #[arg(long, value_enum, default_value_t = CliRounding::HalfUp)]
    rounding: CliRounding,

    /// Bounding box stroke width in pixels
    #[arg(long, default_value_t = 1)]
    outline: u32,

    /// Minimum set neighbours (of 8) a mask cell needs to survive filtering
    #[arg(long, default_value_t = 2)]
    min_neighbors: u8,

    /// Enable verbose logging (-v: DEBUG, -vv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliRounding {
    HalfUp,
    Floor,
}

impl From<CliRounding> for Rounding {
    fn from(r: CliRounding) -> Self {
        match r {
            CliRounding::HalfUp => Rounding::HalfUp,
            CliRounding::Floor => Rounding::Floor,
        }
    }
}

fn parse_bbox(s: &str) -> Result<BoundingBox, String> {
    let parts: Vec<u32> = s
        .split(',')
        .map(|p| p.trim().parse::<u32>().map_err(|e| format!("'{p}': {e}")))
        .collect::<Result<_, _>>()?;
    let [x, y, w, h] = parts[..] else {
        return Err(format!("expected X,Y,W,H, got '{s}'"));
    };
    BoundingBox::new(x, y, w, h).map_err(|e| e.to_string())
}

fn parse_color(s: &str) -> Result<Rgb, String> {
    let hex = s.trim_start_matches('#');
    if hex.len() != 6 {
        return Err(format!("expected RRGGBB, got '{s}'"));
    }
    let v = u32::from_str_radix(hex, 16).map_err(|e| e.to_string())?;
    Ok(Rgb::from_u32(v))
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_secs()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    /* --- Config from the command line --- */
    let config = OverlayConfig {
        alpha: match cli.alpha {
            Some(a) => Alpha::new(a)?,
            None => Alpha::DEFAULT,
        },
        rounding: cli.rounding.into(),
        outline_thickness: cli.outline,
        filter: FilterConfig { min_neighbors: cli.min_neighbors, ..FilterConfig::default() },
    };
    let renderer = OverlayRenderer::new(config);

    /* --- Original image (read-only) + work buffer (what you see) --- */
    let original = FrameBuffer::from_rgb_image(&image::open(&cli.image)?.to_rgb8());
    let mut work = original.clone();
    info!("loaded {} ({}x{})", cli.image.display(), original.width, original.height);

    if !cli.bbox.fits_in(&original) {
        return Err(Error::BoxOutsideImage {
            x: cli.bbox.x,
            y: cli.bbox.y,
            width: cli.bbox.width,
            height: cli.bbox.height,
            image_w: original.width as u32,
            image_h: original.height as u32,
        });
    }

    /* --- The object: scribbled if a mask was given, a plain box otherwise --- */
    let mut object = match &cli.mask {
        Some(path) => {
            let map = ObjectMap::from_luma(&image::open(path)?.to_luma8());
            if map.width() != cli.bbox.width || map.height() != cli.bbox.height {
                return Err(Error::DimensionMismatch {
                    what: "mask vs bounding box",
                    expected_w: cli.bbox.width,
                    expected_h: cli.bbox.height,
                    got_w: map.width(),
                    got_h: map.height(),
                });
            }
            info!("mask {}: {} of {} cells set", path.display(), map.count_set(), map.cells().len());
            AnnotatedObject::ScribbleBox { bbox: cli.bbox, color: cli.color, map }
        }
        None => AnnotatedObject::PlainBox { bbox: cli.bbox, color: cli.color },
    };

    let mut drawer = Drawer::new("Scribble Overlay  |  F: filter  S: save  ESC: quit", original.width, original.height)?;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        // Reset to the untouched image, then draw the overlay on top (once per frame)
        work.copy_from(&original)?;
        if drawer.f_pressed_once() {
            let stats = renderer.filter_and_refresh(&mut object, &original, &mut work)?;
            info!("filter: removed {} cells, filled {}", stats.removed, stats.filled);
        } else {
            renderer.render(&object, &original, &mut work)?;
        }

        if drawer.s_pressed_once() {
            work.to_rgb_image().save("overlay.png")?;
            info!("saved overlay.png");
        }

        drawer.present(&work)?;
    }

    Ok(())
}
