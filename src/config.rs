// Viewer settings: command line, brush limits, defaults.

use crate::mode::RenderMode;
use crate::stereo::DEFAULT_MAX_DISPARITY;
use clap::Parser;
use std::path::{Path, PathBuf};

pub const DEFAULT_BRUSH_RADIUS: u32 = 30;
pub const DEFAULT_BRUSH_STRENGTH: f64 = 25.0;
pub const MIN_BRUSH_RADIUS: u32 = 1;
pub const MAX_BRUSH_RADIUS: u32 = 100;
pub const BRUSH_RADIUS_STEP: i32 = 5; // per mouse-wheel notch

/// Paint depth, see it in red/cyan 3D.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Args {
    /// Colour image
    pub image: PathBuf,

    /// Depth map (default: `<image stem>_depth.<ext>` next to the image)
    #[arg(short, long)]
    pub depth: Option<PathBuf>,

    /// Render mode: a, b, c, d or its name (sorted-log, depth-test-log, ...)
    #[arg(short, long, default_value = "a")]
    pub mode: RenderMode,

    /// Shift in pixels at the deepest depth
    #[arg(long, default_value_t = DEFAULT_MAX_DISPARITY)]
    pub max_disparity: f64,

    /// Blur radius to use instead of the mode's own
    #[arg(long)]
    pub blur: Option<u32>,

    /// Initial brush radius in pixels
    #[arg(short, long, default_value_t = DEFAULT_BRUSH_RADIUS)]
    pub radius: u32,

    /// Depth change per brush dab
    #[arg(short, long, default_value_t = DEFAULT_BRUSH_STRENGTH)]
    pub strength: f64,

    /// Render the anaglyph to this file and exit instead of opening a window
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Brush state the viewer carries between frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Brush {
    pub radius: u32,
    pub strength: f64,
}

impl Brush {
    pub fn new(radius: u32, strength: f64) -> Self {
        Self {
            radius: radius.clamp(MIN_BRUSH_RADIUS, MAX_BRUSH_RADIUS),
            strength: strength.abs(),
        }
    }

    /// Grow (positive) or shrink (negative) by whole wheel notches, within limits.
    pub fn scroll(&mut self, notches: i32) {
        let r = self.radius as i64 + notches as i64 * BRUSH_RADIUS_STEP as i64;
        self.radius = r.clamp(MIN_BRUSH_RADIUS as i64, MAX_BRUSH_RADIUS as i64) as u32;
    }
}

impl Default for Brush {
    fn default() -> Self {
        Brush::new(DEFAULT_BRUSH_RADIUS, DEFAULT_BRUSH_STRENGTH)
    }
}

/// Everything the viewer needs, resolved from [`Args`].
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub image_path: PathBuf,
    pub depth_path: PathBuf,
    pub mode: RenderMode,
    pub max_disparity: f64,
    pub blur_override: Option<u32>,
    pub brush: Brush,
    pub output: Option<PathBuf>,
}

impl From<Args> for ViewerConfig {
    fn from(args: Args) -> Self {
        let depth_path = args.depth.unwrap_or_else(|| default_depth_path(&args.image));
        ViewerConfig {
            image_path: args.image,
            depth_path,
            mode: args.mode,
            max_disparity: args.max_disparity,
            blur_override: args.blur,
            brush: Brush::new(args.radius, args.strength),
            output: args.output,
        }
    }
}

/// `photos/mountain.jpg` -> `photos/mountain_depth.jpg`
pub fn default_depth_path(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match image.extension() {
        Some(ext) => format!("{stem}_depth.{}", ext.to_string_lossy()),
        None => format!("{stem}_depth"),
    };
    image.with_file_name(name)
}
