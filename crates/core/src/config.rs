//! Run configuration, defaults, and startup validation.
//!
//! Invalid values are rejected before the supervisor starts; nothing in the
//! control loop re-checks them.

use crate::error::ConfigError;
use crate::render::scale_for_frame;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_FRAMES: u32 = 50;
pub const DEFAULT_CENTER: f64 = 0.0;
pub const DEFAULT_START_SCALE: f64 = 4.0;
pub const DEFAULT_ZOOM: f64 = 0.97;
pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 1000;
pub const DEFAULT_MAXITER: u32 = 1000;
pub const DEFAULT_OUTPREFIX: &str = "mandel";
pub const DEFAULT_EXT: &str = "jpg";

/// Maximum length of the output prefix in bytes.
const MAX_PREFIX_LEN: usize = 255;

/// Maximum length of the image extension.
const MAX_EXT_LEN: usize = 16;

/// Everything the supervisor needs to schedule a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SupervisorConfig {
    /// Concurrency ceiling: maximum number of renderers alive at once.
    pub num_children: u32,
    /// Total number of frames to produce.
    pub frames: u32,
    pub xcenter: f64,
    pub ycenter: f64,
    /// Scale of frame 0.
    pub start_scale: f64,
    /// Per-frame scale multiplier.
    pub zoom: f64,
    pub width: u32,
    pub height: u32,
    pub maxiter: u32,
    pub outprefix: String,
    /// Image extension appended to every output name (no leading dot).
    pub ext: String,
}

impl SupervisorConfig {
    /// Configuration with the given ceiling and every other field defaulted.
    pub fn new(num_children: u32) -> Self {
        Self {
            num_children,
            frames: DEFAULT_FRAMES,
            xcenter: DEFAULT_CENTER,
            ycenter: DEFAULT_CENTER,
            start_scale: DEFAULT_START_SCALE,
            zoom: DEFAULT_ZOOM,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            maxiter: DEFAULT_MAXITER,
            outprefix: DEFAULT_OUTPREFIX.to_string(),
            ext: DEFAULT_EXT.to_string(),
        }
    }

    /// Validate every field.
    ///
    /// Rules:
    /// - `num_children`, `frames`, `width`, `height`, `maxiter` must be > 0.
    /// - `start_scale` and `zoom` must be finite and > 0.
    /// - The scale of the last frame must stay finite and > 0.
    /// - `xcenter` and `ycenter` must be finite.
    /// - `outprefix` must not exceed 255 bytes or contain NUL.
    /// - `ext` must be 1..=16 ASCII alphanumeric characters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_nonzero("num_children", self.num_children)?;
        validate_nonzero("frames", self.frames)?;
        validate_nonzero("width", self.width)?;
        validate_nonzero("height", self.height)?;
        validate_nonzero("maxiter", self.maxiter)?;
        validate_positive_finite("start_scale", self.start_scale)?;
        validate_positive_finite("zoom", self.zoom)?;
        validate_finite("xcenter", self.xcenter)?;
        validate_finite("ycenter", self.ycenter)?;
        validate_final_scale(self.start_scale, self.zoom, self.frames)?;
        validate_prefix(&self.outprefix)?;
        validate_ext(&self.ext)?;
        Ok(())
    }
}

fn validate_nonzero(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::invalid(field, "must be > 0"));
    }
    Ok(())
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::invalid(
            field,
            format!("must be a finite number (got {value})"),
        ));
    }
    Ok(())
}

fn validate_positive_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    validate_finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::invalid(
            field,
            format!("must be > 0 (got {value})"),
        ));
    }
    Ok(())
}

/// Scales form a geometric sequence, so checking the last frame covers all
/// of them. `frames` must already be known to be nonzero.
fn validate_final_scale(start_scale: f64, zoom: f64, frames: u32) -> Result<(), ConfigError> {
    let last = frames - 1;
    let scale = scale_for_frame(start_scale, zoom, last);
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ConfigError::invalid(
            "zoom",
            format!("gives scale {scale} at frame {last}"),
        ));
    }
    Ok(())
}

/// Path separators are allowed so frames can land in a subdirectory.
fn validate_prefix(prefix: &str) -> Result<(), ConfigError> {
    if prefix.len() > MAX_PREFIX_LEN {
        return Err(ConfigError::invalid(
            "outprefix",
            format!("must not exceed {MAX_PREFIX_LEN} bytes"),
        ));
    }
    if prefix.contains('\0') {
        return Err(ConfigError::invalid("outprefix", "must not contain NUL"));
    }
    Ok(())
}

fn validate_ext(ext: &str) -> Result<(), ConfigError> {
    if ext.is_empty() || ext.len() > MAX_EXT_LEN {
        return Err(ConfigError::invalid(
            "ext",
            format!("must be 1 to {MAX_EXT_LEN} characters"),
        ));
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::invalid(
            "ext",
            "may only contain ASCII alphanumeric characters",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
