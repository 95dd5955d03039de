pub mod config;

use crate::config::AppConfig;
use crate::simulation::SimulationEngine;
use anyhow::Context;
use chrono::Utc;
use log::{debug, error, info};
use std::time::Duration;

mod dashboard;
pub mod models;
pub mod simulation;
mod utils;

pub async fn run() -> anyhow::Result<()> {
    info!("Starting application");

    tokio::select! {
        result = main_loop() => {
            match result {
                Ok(_) => info!("Application completed successfully"),
                Err(e) => {
                    error!("Application error: {e:#}");
                    // Print chain of error causes
                    let mut source = e.source();
                    while let Some(e) = source {
                        error!("Caused by: {e}");
                        source = e.source();
                    }
                    return Err(e).context("Application failed to run");
                }
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
        }
    }

    Ok(())
}

async fn main_loop() -> anyhow::Result<()> {
    debug!("Loading configuration");
    let config = AppConfig::new().context("Failed to load configuration")?;

    let mut engine = match config.simulation.seed {
        Some(seed) => SimulationEngine::with_seed(simulation::default_fleet(), seed),
        None => SimulationEngine::new(simulation::default_fleet()),
    };
    if !config.simulation.autostart {
        engine.stop();
    }
    info!(
        "Simulating {} sensors (running: {})",
        engine.sensors().len(),
        engine.is_running()
    );

    let mut interval = tokio::time::interval(Duration::from_secs(config.dashboard.refresh.max(1)));
    loop {
        interval.tick().await; // Wait for the next tick

        if !config.dashboard.enabled {
            continue;
        }

        let snapshot = engine.sensors();
        let now = Utc::now();
        for line in dashboard::render_lines(&snapshot, now) {
            info!("{line}");
        }
    }
}
