//! Command-line arguments.
//!
//! Short flags match the renderer's own conventions (`-W`/`-H` for pixel
//! size, `-m` for iterations). Range checks are left to
//! [`SupervisorConfig::validate`] so every invalid value is reported the
//! same way.

use std::path::PathBuf;

use clap::Parser;
use mandelmovie_core::config::{
    DEFAULT_CENTER, DEFAULT_EXT, DEFAULT_FRAMES, DEFAULT_HEIGHT, DEFAULT_MAXITER,
    DEFAULT_OUTPREFIX, DEFAULT_START_SCALE, DEFAULT_WIDTH, DEFAULT_ZOOM,
};
use mandelmovie_core::SupervisorConfig;

/// Default renderer location, relative to the current directory.
pub const DEFAULT_RENDERER: &str = "./mandel";

const EXAMPLE: &str = "Example:
  mandelmovie -n 5 -f 50 -x -0.5 -y 0 -s 4 -z 0.97 -W 1000 -H 1000 -m 1000 -o mandel

Frame i is rendered at scale = start_scale * zoom^i into <prefix><i>.<ext>.";

/// mandelmovie - render a zooming Mandelbrot movie with a bounded pool of renderers
#[derive(Parser, Debug, Clone)]
#[command(name = "mandelmovie")]
#[command(version, about, long_about = None, after_help = EXAMPLE)]
pub struct Args {
    /// Number of renderer processes to run at once (required, > 0)
    #[arg(short = 'n', long = "children")]
    pub num_children: u32,

    /// Number of frames to make
    #[arg(short = 'f', long, default_value_t = DEFAULT_FRAMES)]
    pub frames: u32,

    /// X center
    #[arg(short = 'x', long, default_value_t = DEFAULT_CENTER, allow_negative_numbers = true)]
    pub xcenter: f64,

    /// Y center
    #[arg(short = 'y', long, default_value_t = DEFAULT_CENTER, allow_negative_numbers = true)]
    pub ycenter: f64,

    /// Starting scale (view width in Mandelbrot coordinates)
    #[arg(short = 's', long = "scale", default_value_t = DEFAULT_START_SCALE)]
    pub start_scale: f64,

    /// Zoom multiplier per frame
    #[arg(short = 'z', long, default_value_t = DEFAULT_ZOOM)]
    pub zoom: f64,

    /// Image width in pixels
    #[arg(short = 'W', long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Image height in pixels
    #[arg(short = 'H', long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Max iterations
    #[arg(short = 'm', long, default_value_t = DEFAULT_MAXITER)]
    pub maxiter: u32,

    /// Output prefix
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPREFIX)]
    pub outprefix: String,

    /// Image extension for output names
    #[arg(long, default_value = DEFAULT_EXT)]
    pub ext: String,

    /// Path to the single-frame renderer executable
    #[arg(long, env = "MANDELMOVIE_RENDERER", default_value = DEFAULT_RENDERER)]
    pub renderer: PathBuf,

    /// Working directory for renderer processes (default: current directory)
    #[arg(long)]
    pub workdir: Option<PathBuf>,

    /// Print the run summary as JSON on stdout when finished
    #[arg(long)]
    pub summary_json: bool,

    /// Log level used when `RUST_LOG` is not set (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Supervisor configuration described by these arguments. Not validated.
    pub fn to_config(&self) -> SupervisorConfig {
        SupervisorConfig {
            num_children: self.num_children,
            frames: self.frames,
            xcenter: self.xcenter,
            ycenter: self.ycenter,
            start_scale: self.start_scale,
            zoom: self.zoom,
            width: self.width,
            height: self.height,
            maxiter: self.maxiter,
            outprefix: self.outprefix.clone(),
            ext: self.ext.clone(),
        }
    }

    /// Default `tracing` filter directive for this binary and the core crate.
    pub fn filter_directive(&self) -> String {
        format!(
            "mandelmovie={level},mandelmovie_core={level}",
            level = self.log_level
        )
    }
}
