//! Smart Meter Digital Twin - Headless Runner
//!
//! Control lines on stdin, one JSON frame per line on stdout, logs on stderr.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};

use meter_twin_core::constants;
use meter_twin_core::logic::analysis_loop;
use meter_twin_core::logic::config::TwinConfig;
use meter_twin_core::logic::control::ControlCommand;
use meter_twin_core::logic::engine::TwinEngine;
use meter_twin_core::logic::{feed, model};
use meter_twin_core::logic::telemetry::SourceMode;

/// Initial source when `TWIN_INITIAL_MODE` is unset
const DEFAULT_INITIAL_MODE: &str = "manual 230 5";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", constants::APP_NAME, constants::APP_VERSION);

    let config = TwinConfig::from_env();
    if let Err(e) = config.validate() {
        log::error!("Invalid configuration: {}", e);
        std::process::exit(2);
    }

    let model = model::load(&config.model);
    let engine = Arc::new(TwinEngine::new(&config, model, feed::global_state()));

    let initial = initial_mode();
    let (control_tx, control_rx) = mpsc::channel::<ControlCommand>(32);

    // Frame printer
    let mut frames = engine.publisher().subscribe_frames();
    tokio::spawn(async move {
        loop {
            match frames.recv().await {
                Ok(frame) => match serde_json::to_string(&frame) {
                    Ok(line) => println!("{}", line),
                    Err(e) => log::warn!("Frame serialization failed: {}", e),
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("Frame printer fell behind, {} frames skipped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Control panel
    let stdin_tx = control_tx.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => match line.parse::<ControlCommand>() {
                    Ok(command) => {
                        if stdin_tx.send(command).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => log::warn!("Ignoring control '{}': {}", line.trim(), e),
                },
                Ok(None) => {
                    log::info!("Control input closed");
                    break;
                }
                Err(e) => {
                    log::warn!("Control input failed: {}", e);
                    break;
                }
            }
        }
    });

    // Held so a closed stdin does not stop remote refreshes
    let _control_tx = control_tx;

    tokio::select! {
        _ = analysis_loop::run(Arc::clone(&engine), initial, control_rx) => {}
        _ = tokio::signal::ctrl_c() => {
            log::info!("Shutdown requested after {} ticks", engine.tick_count());
        }
    }
}

fn initial_mode() -> SourceMode {
    let raw = constants::env_string("TWIN_INITIAL_MODE", DEFAULT_INITIAL_MODE);
    match raw.parse::<ControlCommand>() {
        Ok(ControlCommand::SetMode(mode)) => mode,
        Ok(ControlCommand::Refresh) => SourceMode::default(),
        Err(e) => {
            log::warn!("TWIN_INITIAL_MODE '{}' ignored: {}", raw, e);
            SourceMode::default()
        }
    }
}
