//! holdrec: drive a press-and-hold record control from the terminal
//!
//! Reads one command per line from stdin:
//! - `down` / `press`: pointer down
//! - `up` / `release`: pointer up
//! - `status`: print the current state
//! - `quit`: exit
//!
//! Every control event is printed to stdout as one JSON object per line.
//! Logs go to stderr.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::{info, trace, warn};
use tracing_subscriber::EnvFilter;

use holdrec::lifecycle::ShutdownSignal;
use holdrec::presentation::ButtonGeometry;
use holdrec::{ControlEvent, Controller, ControllerHandle, InteractionConfig, TimedPresentation};

/// Width of the simulated button, in logical pixels
const BUTTON_WIDTH: f32 = 160.0;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "holdrec starting");

    // Load configuration
    let config = InteractionConfig::from_env()?;
    info!(
        min_record_ms = config.min_record_ms(),
        max_record_ms = config.max_record_ms(),
        "configuration loaded"
    );

    let shutdown = ShutdownSignal::new();

    // Controller -> stdout printer
    let (event_tx, event_rx) = broadcast::channel::<ControlEvent>(64);

    let presentation = TimedPresentation::new(&config, ButtonGeometry::for_width(BUTTON_WIDTH));
    let mut frames = presentation.subscribe();

    let (controller, handle) = Controller::new(config, presentation, event_tx);
    let controller_task = tokio::spawn(controller.run());
    let printer_task = tokio::spawn(print_events(event_rx));

    tokio::spawn(async move {
        while frames.changed().await.is_ok() {
            let frame = *frames.borrow_and_update();
            trace!(
                outer = frame.radii.outer,
                inner = frame.radii.inner,
                sweep = frame.sweep_degrees,
                "frame"
            );
        }
    });

    info!("ready, reading commands from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let signal = shutdown.wait();
    tokio::pin!(signal);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if !run_command(&handle, line.trim())? {
                            break;
                        }
                    }
                    None => {
                        info!("stdin closed");
                        break;
                    }
                }
            }

            reason = &mut signal => {
                let reason = reason?;
                info!(%reason, "shutdown signal received");
                break;
            }
        }
    }

    info!("shutting down...");

    drop(handle);
    controller_task.await?;
    printer_task.await?;

    info!("holdrec stopped");

    Ok(())
}

/// Execute one stdin command; returns false when the host should exit
fn run_command(handle: &ControllerHandle, command: &str) -> Result<bool> {
    match command {
        "" => {}
        "down" | "press" => handle.press_start()?,
        "up" | "release" => handle.press_end()?,
        "status" => {
            let status = serde_json::json!({ "type": "status", "state": handle.state() });
            println!("{status}");
        }
        "quit" | "exit" => return Ok(false),
        other => warn!(command = other, "unknown command"),
    }

    Ok(true)
}

async fn print_events(mut rx: broadcast::Receiver<ControlEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => println!("{json}"),
                Err(e) => warn!(?e, "failed to encode event"),
            },
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(skipped = n, "event receiver lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
