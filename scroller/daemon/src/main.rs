//! Scroller Daemon
//!
//! Standalone process that drives an LED string through a Fadecandy-style
//! controller. It connects once at startup, runs the animation engine as a
//! background task, and accepts live configuration updates over a local
//! control socket until the process is terminated.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: controller at localhost:7890, 40 LEDs, control on 127.0.0.1:8080
//! scroller-daemon
//!
//! # Explicit everything
//! scroller-daemon --controller 10.0.0.5:7890 --leds 64 --listen 0.0.0.0:9000
//!
//! # With verbose logging
//! RUST_LOG=debug scroller-daemon
//! ```
//!
//! # Environment Variables
//!
//! - `SCROLLER_CONTROLLER`: controller `host:port`
//! - `SCROLLER_LISTEN`: control listener bind address
//! - `SCROLLER_LEDS`: LED string length
//! - `RUST_LOG`: log level (trace, debug, info, warn, error)
//!
//! # Control protocol
//!
//! One JSON object per line, e.g.
//!
//! ```json
//! {"delay": 50, "trainLength": 3, "random": false, "color": {"r": 0, "g": 128, "b": 255}}
//! ```
//!
//! Each line is answered with `ok`, `dropped`, or `error: <reason>`.

mod listener;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use scroller_core::{AnimationEngine, ConfigMailbox, OpcClient, StringGeometry};

use crate::listener::ControlListener;

/// Command-line parameters.
#[derive(Debug, Parser)]
#[command(
    name = "scroller-daemon",
    about = "Drive an LED string over Open Pixel Control"
)]
struct Args {
    /// Controller host:port to connect to
    #[arg(long, env = "SCROLLER_CONTROLLER", default_value = "localhost:7890")]
    controller: String,

    /// Address the control listener binds to
    #[arg(long, env = "SCROLLER_LISTEN", default_value = "127.0.0.1:8080")]
    listen: String,

    /// Number of LEDs in the string
    #[arg(long, env = "SCROLLER_LEDS", default_value_t = 40)]
    leds: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("scroller_daemon=info".parse()?)
                .add_directive("scroller_core=info".parse()?),
        )
        .with_target(true)
        .init();

    let args = Args::parse();

    info!("Starting scroller daemon");
    info!(
        controller = %args.controller,
        leds = args.leds,
        "string geometry"
    );

    let geometry = StringGeometry::new(&args.controller, args.leds)
        .context("invalid LED string geometry")?;

    // The one unrecoverable failure: no controller, no point running.
    let client = OpcClient::connect(geometry.controller_addr())
        .await
        .with_context(|| format!("controller at {} is unreachable", args.controller))?;

    let mailbox = ConfigMailbox::new();
    let engine = AnimationEngine::new(geometry, mailbox.clone(), client);
    tokio::spawn(engine.run());

    let control = ControlListener::bind(&args.listen, mailbox)
        .await
        .with_context(|| format!("could not bind control listener on {}", args.listen))?;
    info!(listen = %args.listen, "control listener ready");

    tokio::select! {
        result = control.run() => {
            if let Err(e) = result {
                error!(error = %e, "control listener stopped");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    Ok(())
}
