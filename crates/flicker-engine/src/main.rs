//! # Flicker Engine
//!
//! Main entry point for Project Flicker, a cursor trail and click burst
//! particle effect rendered into an off-screen canvas.
//!
//! This crate ties together:
//! - Kernel: particles, particle types and the canvas they draw into
//! - Common: colors, bounds and shared errors
//!
//! Usage: `flicker [CONFIG.toml]`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod input;
mod timing;


use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::app::App;
use crate::config::EngineConfig;

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("flicker=info".parse()?))
        .init();

    info!("Project Flicker starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };
    config.validate();

    let mut app = App::new(config)?;
    let summary = app.run()?;

    info!(
        "Ran {} frames, peak {} particles, {} frames captured",
        app.frame(),
        summary.peak_particles,
        summary.captured
    );
    info!("Project Flicker shutdown complete");
    Ok(())
}
