//! Intake server: accept loop and per-connection tasks.
//!
//! Each input source (a browser tab, a gamepad relay) opens one TCP
//! connection.  Every connection runs in its own Tokio task, so the
//! connections are the concurrent writers of the session's input state.
//!
//! When a connection ends, for whatever reason, the task releases what that
//! source is still holding: its buttons, sticks, mouse buttons and keys.
//! A source that drops mid-press must not leave a button held, and it must
//! not release input that another source on the same port still holds.
//!
//! Shutdown is triggered by the shared `running` flag, which the accept loop
//! checks every 200 ms.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use tokio::io::AsyncRead;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::application::held::HeldInput;
use crate::application::intake::InputIntake;
use crate::infrastructure::config::WorkerConfig;
use crate::infrastructure::network::framing::{read_frame, FrameError};

const ACCEPT_POLL: Duration = Duration::from_millis(200);

// ── Public API ────────────────────────────────────────────────────────────────

/// Binds the configured intake address and serves it until `running` is
/// set to `false`.
///
/// # Errors
///
/// Returns an error if the bind address is invalid or the listener cannot
/// be bound.
pub async fn run_intake_server(
    config: &WorkerConfig,
    intake: Arc<InputIntake>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr().context("invalid intake address")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind intake listener on {addr}"))?;

    info!("input intake listening on {addr}");
    serve_listener(listener, intake, running).await
}

/// Runs the accept loop on an already bound listener.
///
/// Accept errors are logged and the loop continues.
pub async fn serve_listener(
    listener: TcpListener,
    intake: Arc<InputIntake>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping intake accept loop");
            break;
        }

        match timeout(ACCEPT_POLL, listener.accept()).await {
            Ok(Ok((stream, peer_addr))) => {
                let intake = Arc::clone(&intake);
                let span = info_span!("conn", id = %Uuid::new_v4(), peer = %peer_addr);
                tokio::spawn(handle_connection(stream, peer_addr, intake).instrument(span));
            }
            Ok(Err(e)) => {
                // Transient accept error (e.g., too many open file descriptors).
                error!("accept error: {e}");
            }
            Err(_) => {
                // Timeout: loop back to check the `running` flag.
            }
        }
    }

    Ok(())
}

// ── Per-connection handler ────────────────────────────────────────────────────

async fn handle_connection(
    mut stream: TcpStream,
    peer_addr: SocketAddr,
    intake: Arc<InputIntake>,
) {
    info!("input source connected from {peer_addr}");
    if let Err(e) = stream.set_nodelay(true) {
        debug!("set_nodelay failed: {e}");
    }

    let mut held = HeldInput::default();
    let outcome = pump_frames(&mut stream, &intake, &mut held).await;
    intake.release(&held);

    match outcome {
        Ok(()) => info!("input source {peer_addr} disconnected"),
        Err(e) => warn!("input source {peer_addr} closed with error: {e}"),
    }
}

/// Reads frames until the stream ends or fails, dispatching each one.
///
/// Rejected events and unknown frame kinds are skipped; only stream-level
/// failures end the loop.
pub(crate) async fn pump_frames<R>(
    reader: &mut R,
    intake: &InputIntake,
    held: &mut HeldInput,
) -> Result<(), FrameError>
where
    R: AsyncRead + Unpin,
{
    loop {
        let frame = match read_frame(reader).await {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(()),
            Err(e) if e.is_recoverable() => {
                debug!("skipping frame: {e}");
                continue;
            }
            Err(e) => return Err(e),
        };

        if intake.dispatch(&frame).is_ok() {
            held.record(&frame);
        }
    }
}
