//! retro-input-worker: hosts the input side of one play session.
//!
//! # Usage
//!
//! ```text
//! retro-input-worker [CONFIG] [--port <PORT>]
//! ```
//!
//! | Source                 | Meaning                                      |
//! |------------------------|----------------------------------------------|
//! | `CONFIG`               | Path to the TOML config file                 |
//! | `RETRO_INPUT_CONFIG`   | Used when `CONFIG` is not given              |
//! | `--port`               | Overrides `network.input_port`               |
//! | `RUST_LOG`             | Log filter; falls back to `worker.log_level` |
//!
//! # What happens at startup
//!
//! 1. The config file is loaded (missing file → defaults).
//! 2. `tracing_subscriber` is initialised.
//! 3. One [`InputSession`] is created and shared by the intake server and the
//!    frame clock.
//! 4. A Ctrl+C handler clears the shared `running` flag.
//! 5. The frame clock runs in its own task, polling the session every
//!    `poll_interval_ms` the way an emulation core's input callback would.
//! 6. The intake server accepts input sources until shutdown.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace};
use tracing_subscriber::EnvFilter;

use retro_input_core::InputSession;
use retro_input_worker::application::intake::{InputIntake, InputSink};
use retro_input_worker::application::poll::PollAdapter;
use retro_input_worker::infrastructure::config::{load_config, WorkerConfig};
use retro_input_worker::infrastructure::network::server::run_intake_server;

/// Frames between two intake statistics log lines (~10 s at 60 Hz).
const STATS_EVERY_FRAMES: u64 = 600;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Streaming worker input intake.
#[derive(Debug, Parser)]
#[command(
    name = "retro-input-worker",
    about = "Network input intake and poll loop for a libretro streaming worker",
    version
)]
struct Cli {
    /// Path to the TOML config file.  A missing file means defaults.
    #[arg(env = "RETRO_INPUT_CONFIG")]
    config: Option<PathBuf>,

    /// TCP port for input sources, overriding the config file.
    #[arg(long)]
    port: Option<u16>,
}

impl Cli {
    /// Loads the config file and applies command-line overrides.
    fn into_worker_config(self) -> anyhow::Result<WorkerConfig> {
        let mut config = load_config(self.config.as_deref()).with_context(|| {
            format!(
                "failed to load config from {}",
                self.config
                    .as_deref()
                    .map_or_else(|| "<none>".into(), |p| p.display().to_string())
            )
        })?;
        if let Some(port) = self.port {
            config.network.input_port = port;
        }
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_worker_config()?;

    // `RUST_LOG` wins; otherwise use the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.worker.log_level)),
        )
        .init();

    let session = Arc::new(InputSession::new());
    let intake = Arc::new(InputIntake::new(Arc::clone(&session) as Arc<dyn InputSink>));

    info!(
        session = %session.id(),
        active_ports = config.active_ports(),
        poll_interval_ms = config.poll_interval().as_millis() as u64,
        "retro-input worker starting"
    );

    // ── Graceful shutdown flag ─────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    // ── Frame clock ───────────────────────────────────────────────────────────
    let clock = tokio::spawn(frame_clock(
        PollAdapter::new(Arc::clone(&session)),
        Arc::clone(&intake),
        config.poll_interval(),
        config.active_ports(),
        Arc::clone(&running),
    ));

    // ── Intake server ─────────────────────────────────────────────────────────
    let served = run_intake_server(&config, intake, Arc::clone(&running)).await;

    // Stop the clock even when the server failed to start.
    running.store(false, Ordering::Relaxed);
    clock.await.context("frame clock task failed")?;
    served?;

    info!("retro-input worker stopped");
    Ok(())
}

/// Polls the session once per tick until `running` is cleared.
///
/// Stands in for the emulation core's input callback: each tick performs the
/// full per-frame read pattern through the [`PollAdapter`].
async fn frame_clock(
    adapter: PollAdapter,
    intake: Arc<InputIntake>,
    period: Duration,
    active_ports: usize,
    running: Arc<AtomicBool>,
) {
    let mut ticker = tokio::time::interval(period);
    // A late frame is dropped, not replayed in a burst.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut frame_no: u64 = 0;
    while running.load(Ordering::Relaxed) {
        ticker.tick().await;
        frame_no += 1;

        let frame = adapter.sample_frame(active_ports);
        if frame.has_activity() {
            trace!(
                frame_no,
                buttons = ?frame.buttons,
                dx = frame.mouse_dx,
                dy = frame.mouse_dy,
                mouse = frame.mouse_buttons,
                "poll"
            );
        }

        if frame_no % STATS_EVERY_FRAMES == 0 {
            let stats = intake.stats().snapshot();
            debug!(
                frame_no,
                accepted = stats.accepted,
                rejected = stats.rejected,
                "intake stats"
            );
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
