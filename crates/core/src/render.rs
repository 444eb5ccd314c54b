//! Per-frame render parameters and the renderer argument contract.
//!
//! Everything here is pure: the parameters for frame `i` are recomputed from
//! the configuration whenever a worker is launched and never cached.
//!
//! Renderer invocation:
//!
//! ```text
//! <renderer> -x <xcenter> -y <ycenter> -s <scale> -W <width> -H <height> -m <maxiter> -o <output>
//! ```

use crate::config::SupervisorConfig;

/// Fully resolved parameters for a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameParams {
    /// Zero-based frame index.
    pub frame: u32,
    pub xcenter: f64,
    pub ycenter: f64,
    /// Width of the view in Mandelbrot coordinates for this frame.
    pub scale: f64,
    pub width: u32,
    pub height: u32,
    pub maxiter: u32,
    /// Output filename, `<prefix><frame>.<ext>`.
    pub output: String,
}

/// Scale for a frame: `start_scale * zoom^frame`.
pub fn scale_for_frame(start_scale: f64, zoom: f64, frame: u32) -> f64 {
    start_scale * zoom.powf(f64::from(frame))
}

/// Deterministic output filename for a frame.
///
/// # Examples
///
/// ```
/// use mandelmovie_core::render::output_name;
///
/// assert_eq!(output_name("mandel", 0, "jpg"), "mandel0.jpg");
/// assert_eq!(output_name("out/zoom_", 12, "png"), "out/zoom_12.png");
/// ```
pub fn output_name(prefix: &str, frame: u32, ext: &str) -> String {
    format!("{prefix}{frame}.{ext}")
}

impl FrameParams {
    /// Resolve the parameters for `frame` from the run configuration.
    pub fn for_frame(config: &SupervisorConfig, frame: u32) -> Self {
        Self {
            frame,
            xcenter: config.xcenter,
            ycenter: config.ycenter,
            scale: scale_for_frame(config.start_scale, config.zoom, frame),
            width: config.width,
            height: config.height,
            maxiter: config.maxiter,
            output: output_name(&config.outprefix, frame, &config.ext),
        }
    }

    /// Renderer arguments, excluding the program itself.
    ///
    /// Floats use `Display`, which prints the shortest decimal that
    /// round-trips to the same `f64`.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "-x".to_string(),
            self.xcenter.to_string(),
            "-y".to_string(),
            self.ycenter.to_string(),
            "-s".to_string(),
            self.scale.to_string(),
            "-W".to_string(),
            self.width.to_string(),
            "-H".to_string(),
            self.height.to_string(),
            "-m".to_string(),
            self.maxiter.to_string(),
            "-o".to_string(),
            self.output.clone(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
