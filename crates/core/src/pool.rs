//! Worker pool capability used by the supervisor.
//!
//! Defines [`WorkerPool`], the seam between the scheduling loop and whatever
//! actually runs renderers, along with [`WorkerHandle`], [`Reaped`],
//! [`LaunchError`], and [`ReapError`].

use std::time::Duration;

use serde::Serialize;

use crate::outcome::Outcome;
use crate::render::FrameParams;

/// Identity of a launched worker. Used for logging, never for scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct WorkerHandle {
    /// OS process id (`0` if the pool has no process ids).
    pub pid: u32,
    /// Frame the worker was assigned.
    pub frame: u32,
}

/// A worker observed to have terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reaped {
    pub handle: WorkerHandle,
    pub outcome: Outcome,
    /// Wall-clock time between launch and reap.
    pub elapsed: Duration,
}

/// A new worker could not be started.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("failed to start renderer for frame {frame}: {source}")]
    Spawn {
        frame: u32,
        #[source]
        source: std::io::Error,
    },

    /// The concurrency ceiling is already reached.
    #[error("cannot launch frame {frame}: {running} of {ceiling} workers already running")]
    AtCapacity {
        frame: u32,
        running: u32,
        ceiling: u32,
    },

    /// Every frame has already been assigned.
    #[error("all {frames} frames have already been launched")]
    Exhausted { frames: u32 },
}

impl LaunchError {
    /// Frame whose launch failed (the frame count once all are assigned).
    pub fn frame(&self) -> u32 {
        match self {
            Self::Spawn { frame, .. } | Self::AtCapacity { frame, .. } => *frame,
            Self::Exhausted { frames } => *frames,
        }
    }
}

/// Nothing could be waited on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReapError {
    #[error("no running workers to wait on")]
    NoChildren,
}

/// Launch and reap capability.
///
/// `spawn` starts one independent worker for a frame and returns
/// immediately. `reap_any` suspends until *any* live worker terminates, in
/// whatever order they finish.
pub trait WorkerPool: Send {
    /// Start a renderer for `params`.
    fn spawn(&mut self, params: &FrameParams) -> Result<WorkerHandle, LaunchError>;

    /// Wait for the first live worker to terminate.
    fn reap_any(
        &mut self,
    ) -> impl std::future::Future<Output = Result<Reaped, ReapError>> + Send;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
