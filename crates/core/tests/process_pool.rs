//! Integration tests for the process-backed worker pool.
//!
//! The renderer is stood in for by `sh -c <script>`, so the frame arguments
//! arrive as `$@` exactly as the real renderer would receive them. Every
//! test runs its workers inside its own temporary directory.

#![cfg(unix)]

use std::path::Path;

use assert_matches::assert_matches;
use mandelmovie_core::render::FrameParams;
use mandelmovie_core::{
    LaunchError, Outcome, ProcessPool, ReapError, Supervisor, SupervisorConfig, SupervisorError,
    WorkerPool,
};
use tempfile::TempDir;

/// Writes its full argument list into the file named by `-o`.
const WRITE_ARGS: &str = r#"
out=""
for arg in "$@"; do
  if [ "$prev" = "-o" ]; then out="$arg"; fi
  prev="$arg"
done
printf '%s\n' "$*" > "$out"
"#;

fn sh_pool(script: &str, dir: &Path) -> ProcessPool {
    ProcessPool::new("sh")
        .leading_args(["-c", script, "renderer"])
        .working_directory(dir)
}

fn config(num_children: u32, frames: u32) -> SupervisorConfig {
    SupervisorConfig {
        frames,
        ..SupervisorConfig::new(num_children)
    }
}

// ---------------------------------------------------------------------------
// Test: full runs
// ---------------------------------------------------------------------------

/// Every frame gets its own output file and every worker exits cleanly.
#[tokio::test]
async fn full_run_writes_every_frame() {
    let dir = TempDir::new().expect("tempdir");
    let pool = sh_pool(WRITE_ARGS, dir.path());

    let mut sup = Supervisor::new(config(3, 6), pool).expect("valid config");
    let summary = sup.run().await.expect("run succeeds");

    assert_eq!(summary.launched, 6);
    assert_eq!(summary.reaped, 6);
    assert!(summary.all_succeeded());
    assert!(summary.peak_running <= 3);
    assert_eq!(sup.pool().in_flight(), 0);

    for frame in 0..6 {
        let path = dir.path().join(format!("mandel{frame}.jpg"));
        assert!(path.exists(), "missing output for frame {frame}");
    }
}

/// The renderer receives the documented flag/value pairs.
#[tokio::test]
async fn renderer_receives_frame_arguments() {
    let dir = TempDir::new().expect("tempdir");
    let cfg = SupervisorConfig {
        xcenter: -0.5,
        ycenter: 0.1,
        width: 320,
        height: 200,
        maxiter: 64,
        outprefix: "zoom".to_string(),
        ext: "png".to_string(),
        ..config(2, 3)
    };

    let mut sup = Supervisor::new(cfg.clone(), sh_pool(WRITE_ARGS, dir.path())).expect("valid");
    sup.run().await.expect("run");

    let written = std::fs::read_to_string(dir.path().join("zoom2.png")).expect("frame 2 output");
    let expected = FrameParams::for_frame(&cfg, 2).to_args().join(" ");
    assert_eq!(written.trim_end(), expected);
    assert!(expected.starts_with("-x -0.5 -y 0.1 -s "));
    assert!(expected.ends_with("-W 320 -H 200 -m 64 -o zoom2.png"));
}

/// Non-zero exits are recorded; the run still completes without relaunching.
#[tokio::test]
async fn failing_renderer_does_not_stop_the_run() {
    let dir = TempDir::new().expect("tempdir");
    let mut sup =
        Supervisor::new(config(2, 4), sh_pool("exit 3", dir.path())).expect("valid config");

    let summary = sup.run().await.expect("run completes");
    assert_eq!(summary.launched, 4);
    assert_eq!(summary.failed, 4);
    assert_eq!(summary.succeeded, 0);
    assert_eq!(summary.reaped, 4);
}

/// A missing renderer with nothing running is fatal at frame 0.
#[tokio::test]
async fn missing_renderer_is_fatal() {
    let pool = ProcessPool::new("/nonexistent/mandel-renderer");
    let mut sup = Supervisor::new(config(2, 3), pool).expect("valid config");

    let err = sup.run().await.unwrap_err();
    assert_matches!(err, SupervisorError::LaunchStalled { frame: 0, .. });
    assert_eq!(sup.summary().launched, 0);
}

// ---------------------------------------------------------------------------
// Test: pool primitives
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reap_on_empty_pool_reports_no_children() {
    let mut pool = ProcessPool::new("sh");
    assert_matches!(pool.reap_any().await, Err(ReapError::NoChildren));
}

#[tokio::test]
async fn spawn_failure_carries_frame() {
    let mut pool = ProcessPool::new("/nonexistent/mandel-renderer");
    let params = FrameParams::for_frame(&config(1, 10), 7);

    let err = pool.spawn(&params).unwrap_err();
    assert_matches!(err, LaunchError::Spawn { frame: 7, .. });
    assert_eq!(pool.in_flight(), 0);
}

#[tokio::test]
async fn signal_termination_is_classified() {
    let dir = TempDir::new().expect("tempdir");
    let mut pool = sh_pool("kill -TERM $$", dir.path());
    let params = FrameParams::for_frame(&config(1, 1), 0);

    let handle = pool.spawn(&params).expect("spawn");
    assert!(handle.pid > 0);

    let reaped = pool.reap_any().await.expect("reap");
    assert_eq!(reaped.handle, handle);
    assert_eq!(
        reaped.outcome,
        Outcome::Signaled {
            signal: libc::SIGTERM
        }
    );
}

/// A short worker launched after a long one is reaped first.
#[tokio::test]
async fn reap_follows_completion_order() {
    let dir = TempDir::new().expect("tempdir");
    let mut slow = sh_pool("sleep 1", dir.path());
    let cfg = config(2, 2);

    let first = slow.spawn(&FrameParams::for_frame(&cfg, 0)).expect("spawn slow");
    let mut pool = slow.leading_args(["-c", "exit 0", "renderer"]);
    let second = pool.spawn(&FrameParams::for_frame(&cfg, 1)).expect("spawn fast");

    let reaped = pool.reap_any().await.expect("reap");
    assert_eq!(reaped.handle, second);
    let reaped = pool.reap_any().await.expect("reap");
    assert_eq!(reaped.handle, first);
}
