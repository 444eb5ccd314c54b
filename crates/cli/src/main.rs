//! `mandelmovie` -- bounded-concurrency Mandelbrot movie renderer.
//!
//! Launches one external renderer process per frame, keeping at most
//! `-n` of them alive at once, and reports how each one ended.
//!
//! Logs go to stderr. stdout carries only the `--summary-json` document.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default    | Description                       |
//! |------------------------|----------|------------|-----------------------------------|
//! | `MANDELMOVIE_RENDERER` | no       | `./mandel` | Renderer executable (`--renderer`)|
//! | `RUST_LOG`             | no       | --         | Overrides `--log-level`           |

use std::io::IsTerminal;

use anyhow::Context;
use clap::Parser;
use mandelmovie::args::Args;
use mandelmovie::preflight;
use mandelmovie_core::{ProcessPool, Supervisor};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.filter_directive().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .init();

    if let Err(e) = run(args).await {
        tracing::error!("mandelmovie failed: {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = args.to_config();
    config.validate().context("invalid configuration")?;

    let renderer = preflight::check_renderer(&args.renderer)
        .await
        .context("renderer preflight failed")?;

    tracing::info!(
        num_children = config.num_children,
        frames = config.frames,
        renderer = %renderer.display(),
        "mandelmovie: spawning {} children to create {} frames",
        config.num_children,
        config.frames,
    );
    tracing::info!(
        xcenter = config.xcenter,
        ycenter = config.ycenter,
        start_scale = config.start_scale,
        zoom = config.zoom,
        width = config.width,
        height = config.height,
        maxiter = config.maxiter,
        outprefix = %config.outprefix,
        ext = %config.ext,
        "Render settings",
    );

    let mut pool = ProcessPool::new(renderer);
    if let Some(dir) = &args.workdir {
        pool = pool.working_directory(dir);
    }

    let mut supervisor = Supervisor::new(config, pool)?;
    let summary = supervisor.run().await?;

    if args.summary_json {
        let json = serde_json::to_string_pretty(&summary).context("serialize run summary")?;
        println!("{json}");
    }

    Ok(())
}
