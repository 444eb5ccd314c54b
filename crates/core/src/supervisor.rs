//! Bounded-concurrency job supervisor.
//!
//! [`Supervisor`] owns the frame cursor and the running count and drives a
//! [`WorkerPool`] until every frame has been launched and every launched
//! worker has been reaped. The running count is a credit pool: each launch
//! consumes one credit and each reap returns one. No more than
//! `num_children` workers are ever tracked as running.
//!
//! Launches happen in strict frame order. Completions are observed in
//! whatever order the pool reports them. A failed frame is logged and never
//! relaunched.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::SupervisorConfig;
use crate::error::ConfigError;
use crate::outcome::Outcome;
use crate::pool::{LaunchError, ReapError, Reaped, WorkerHandle, WorkerPool};
use crate::render::FrameParams;

/// Fatal supervisor errors. Everything else is absorbed into logging.
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    #[error("cannot launch frame {frame} and no workers are running: {source}")]
    LaunchStalled {
        frame: u32,
        #[source]
        source: LaunchError,
    },
}

/// Counters collected over one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Frames requested by the configuration.
    pub frames: u32,
    /// Workers successfully started.
    pub launched: u32,
    /// Workers observed to terminate.
    pub reaped: u32,
    /// Workers that exited with status 0.
    pub succeeded: u32,
    /// Workers that exited with a non-zero status.
    pub failed: u32,
    pub signaled: u32,
    pub indeterminate: u32,
    /// Launch attempts the pool refused.
    pub launch_failures: u32,
    /// Times the running count was forced to zero because nothing could be
    /// waited on.
    pub resyncs: u32,
    /// Highest running count observed.
    pub peak_running: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunSummary {
    fn record(&mut self, outcome: Outcome) {
        self.reaped += 1;
        match outcome {
            Outcome::Exited { code: 0 } => self.succeeded += 1,
            Outcome::Exited { .. } => self.failed += 1,
            Outcome::Signaled { .. } => self.signaled += 1,
            Outcome::Indeterminate => self.indeterminate += 1,
        }
    }

    /// `true` when every frame was launched and exited with status 0.
    pub fn all_succeeded(&self) -> bool {
        self.launched == self.frames && self.succeeded == self.frames
    }
}

/// Drives the launch/reap loop over a [`WorkerPool`].
pub struct Supervisor<P> {
    config: SupervisorConfig,
    pool: P,
    /// Next unassigned frame index.
    next_frame: u32,
    /// Workers believed alive.
    running: u32,
    summary: RunSummary,
}

impl<P: WorkerPool> Supervisor<P> {
    /// Validate `config` and build a supervisor over `pool`.
    pub fn new(config: SupervisorConfig, pool: P) -> Result<Self, ConfigError> {
        config.validate()?;
        let summary = RunSummary {
            frames: config.frames,
            ..RunSummary::default()
        };
        Ok(Self {
            config,
            pool,
            next_frame: 0,
            running: 0,
            summary,
        })
    }

    pub fn running(&self) -> u32 {
        self.running
    }

    pub fn next_frame(&self) -> u32 {
        self.next_frame
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn pool(&self) -> &P {
        &self.pool
    }

    /// Start a worker for the next unassigned frame.
    ///
    /// Refused without touching the pool when the ceiling is reached or every
    /// frame is already assigned. On success both `running` and the frame
    /// cursor advance. On failure neither changes.
    pub fn launch(&mut self) -> Result<WorkerHandle, LaunchError> {
        let frame = self.next_frame;
        if frame >= self.config.frames {
            return Err(LaunchError::Exhausted {
                frames: self.config.frames,
            });
        }
        if self.running >= self.config.num_children {
            return Err(LaunchError::AtCapacity {
                frame,
                running: self.running,
                ceiling: self.config.num_children,
            });
        }

        let params = FrameParams::for_frame(&self.config, frame);
        let handle = match self.pool.spawn(&params) {
            Ok(handle) => handle,
            Err(e) => {
                self.summary.launch_failures += 1;
                return Err(e);
            }
        };

        self.running += 1;
        self.next_frame = frame + 1;
        self.summary.launched += 1;
        self.summary.peak_running = self.summary.peak_running.max(self.running);

        tracing::info!(
            pid = handle.pid,
            frame,
            scale = params.scale,
            output = %params.output,
            running = self.running,
            "Started worker",
        );

        Ok(handle)
    }

    /// Block until any worker terminates and classify how it ended.
    ///
    /// If the pool has nothing to wait on, the running count is reset to
    /// zero and [`ReapError::NoChildren`] is returned.
    pub async fn reap_one(&mut self) -> Result<Reaped, ReapError> {
        match self.pool.reap_any().await {
            Ok(reaped) => {
                self.running = self.running.saturating_sub(1);
                self.summary.record(reaped.outcome);
                log_reaped(&reaped, self.running);
                Ok(reaped)
            }
            Err(ReapError::NoChildren) => {
                // Can under-count real workers if the signal is spurious.
                tracing::warn!(
                    running = self.running,
                    "No workers left to wait on; resetting running count to 0",
                );
                self.running = 0;
                self.summary.resyncs += 1;
                Err(ReapError::NoChildren)
            }
        }
    }

    /// Run until every frame has been launched and every worker reaped.
    ///
    /// Worker failures never stop the run. The only fatal condition is a
    /// launch failure while no workers are running.
    pub async fn run(&mut self) -> Result<RunSummary, SupervisorError> {
        let frames = self.config.frames;
        let ceiling = self.config.num_children;

        self.summary.started_at = Some(Utc::now());

        while self.next_frame < frames || self.running > 0 {
            while self.running < ceiling && self.next_frame < frames {
                let frame = self.next_frame;
                if let Err(e) = self.launch() {
                    if self.running == 0 {
                        tracing::error!(
                            frame,
                            error = %e,
                            "Cannot launch worker with none running",
                        );
                        return Err(SupervisorError::LaunchStalled { frame, source: e });
                    }
                    tracing::warn!(
                        frame,
                        running = self.running,
                        error = %e,
                        "Launch failed; waiting for a worker to finish before retrying",
                    );
                    // Outcome and resync are recorded inside reap_one.
                    let _ = self.reap_one().await;
                }
            }

            let at_capacity = self.running >= ceiling;
            let draining = self.next_frame >= frames && self.running > 0;
            if at_capacity || draining {
                let _ = self.reap_one().await;
            }

            debug_assert!(self.running <= ceiling);
        }

        self.summary.finished_at = Some(Utc::now());

        tracing::info!(
            launched = self.summary.launched,
            succeeded = self.summary.succeeded,
            failed = self.summary.failed,
            signaled = self.summary.signaled,
            "All frames spawned and children completed",
        );

        Ok(self.summary.clone())
    }
}

fn log_reaped(reaped: &Reaped, running: u32) {
    let Reaped {
        handle,
        outcome,
        elapsed,
    } = reaped;
    let elapsed_ms = elapsed.as_millis() as u64;

    if outcome.is_success() {
        tracing::info!(
            pid = handle.pid,
            frame = handle.frame,
            elapsed_ms,
            running,
            "Worker {outcome}",
        );
    } else {
        tracing::warn!(
            pid = handle.pid,
            frame = handle.frame,
            elapsed_ms,
            running,
            "Worker {outcome}",
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
