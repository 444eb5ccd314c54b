//! Classification of how a worker ended.

use std::fmt;
use std::process::ExitStatus;

use serde::Serialize;

/// How a reaped worker terminated.
///
/// Reporting only: an outcome never influences scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The worker exited normally with `code`.
    Exited { code: i32 },
    /// The worker was terminated by `signal`.
    Signaled { signal: i32 },
    /// The worker was reaped but no usable status was available.
    Indeterminate,
}

impl Outcome {
    /// Classify an OS exit status.
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::Exited { code };
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self::Signaled { signal };
            }
        }
        Self::Indeterminate
    }

    /// `true` only for a normal exit with code 0.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Exited { code: 0 })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exited { code } => write!(f, "exited with status {code}"),
            Self::Signaled { signal } => write!(f, "killed by signal {signal}"),
            Self::Indeterminate => write!(f, "ended"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
