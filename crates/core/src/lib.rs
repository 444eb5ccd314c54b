//! `mandelmovie-core` -- bounded-concurrency frame render supervisor.
//!
//! Renders a zooming Mandelbrot sequence by launching one external renderer
//! process per frame, never keeping more than `num_children` alive at once.
//! Pure parameter math lives in [`render`], process handling in [`process`],
//! and the launch/reap control loop in [`supervisor`].

pub mod config;
pub mod error;
pub mod outcome;
pub mod pool;
pub mod process;
pub mod render;
pub mod supervisor;

pub use config::SupervisorConfig;
pub use outcome::Outcome;
pub use pool::{LaunchError, ReapError, Reaped, WorkerHandle, WorkerPool};
pub use process::ProcessPool;
pub use supervisor::{RunSummary, Supervisor, SupervisorError};

#[cfg(test)]
pub(crate) mod test_helpers;
