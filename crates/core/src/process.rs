//! Process-backed [`WorkerPool`].
//!
//! Each renderer runs as an independent child process that inherits the
//! supervisor's stdout/stderr. The wait future for every child is pushed
//! into a [`FuturesUnordered`], so [`ProcessPool::reap_any`] yields workers in
//! completion order rather than launch order.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use tokio::process::Command;

use crate::outcome::Outcome;
use crate::pool::{LaunchError, ReapError, Reaped, WorkerHandle, WorkerPool};
use crate::render::FrameParams;

type WorkerWait = BoxFuture<'static, (WorkerHandle, Duration, io::Result<ExitStatus>)>;

/// Runs the renderer as OS child processes.
pub struct ProcessPool {
    program: OsString,
    /// Arguments placed before the frame arguments (e.g. `-c <script>` for `sh`).
    leading_args: Vec<OsString>,
    /// Working directory for every worker (inherits the supervisor's if `None`).
    working_directory: Option<PathBuf>,
    in_flight: FuturesUnordered<WorkerWait>,
}

impl ProcessPool {
    /// Pool that invokes `program` once per frame.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            working_directory: None,
            in_flight: FuturesUnordered::new(),
        }
    }

    /// Arguments inserted between the program and the frame arguments.
    pub fn leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Run every worker in `dir`. Relative output names resolve against it.
    pub fn working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    /// Number of children that have been spawned but not yet reaped.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

impl WorkerPool for ProcessPool {
    fn spawn(&mut self, params: &FrameParams) -> Result<WorkerHandle, LaunchError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args)
            .args(params.to_args())
            .stdin(Stdio::null())
            .kill_on_drop(false);

        if let Some(dir) = &self.working_directory {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|source| LaunchError::Spawn {
            frame: params.frame,
            source,
        })?;

        // `id()` is only `None` once the child has been waited on.
        let handle = WorkerHandle {
            pid: child.id().unwrap_or_default(),
            frame: params.frame,
        };
        let started = Instant::now();

        self.in_flight.push(
            async move {
                let status = child.wait().await;
                (handle, started.elapsed(), status)
            }
            .boxed(),
        );

        Ok(handle)
    }

    async fn reap_any(&mut self) -> Result<Reaped, ReapError> {
        let (handle, elapsed, status) = self
            .in_flight
            .next()
            .await
            .ok_or(ReapError::NoChildren)?;

        let outcome = match status {
            Ok(status) => Outcome::from_status(status),
            Err(e) => {
                tracing::warn!(
                    pid = handle.pid,
                    frame = handle.frame,
                    error = %e,
                    "Failed to read worker exit status",
                );
                Outcome::Indeterminate
            }
        };

        Ok(Reaped {
            handle,
            outcome,
            elapsed,
        })
    }
}
