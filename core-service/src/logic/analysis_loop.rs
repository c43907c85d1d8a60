//! Orchestration Loop
//!
//! Cooperative driver for the engine:
//! - every control change ticks once with the new source
//! - in remote mode the loop re-arms itself every `refresh_interval`
//! - ends when the control channel closes

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::logic::control::ControlCommand;
use crate::logic::engine::TwinEngine;
use crate::logic::telemetry::SourceMode;

pub async fn run(engine: Arc<TwinEngine>, initial: SourceMode, mut controls: mpsc::Receiver<ControlCommand>) {
    log::info!("Analysis loop started (source: {})", initial.label());

    let mut mode = initial;
    engine.tick(&mode);

    loop {
        tokio::select! {
            command = controls.recv() => match command {
                Some(ControlCommand::SetMode(next)) => {
                    if next.label() != mode.label() {
                        log::info!("Source switched: {} -> {}", mode.label(), next.label());
                    }
                    mode = next;
                    engine.tick(&mode);
                }
                Some(ControlCommand::Refresh) => {
                    engine.tick(&mode);
                }
                None => break,
            },
            _ = tokio::time::sleep(engine.refresh_interval()), if mode.is_remote() => {
                engine.tick(&mode);
            }
        }
    }

    log::info!("Analysis loop stopped after {} ticks", engine.tick_count());
}
