//! Hyper-space tic-tac-toe GUI

use std::process::ExitCode;
use std::sync::Arc;

use hyperspace::config::load_config;
use hyperspace::ui::{HyperspaceApp, Session};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("hyperspace: {e}");
            return ExitCode::FAILURE;
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let session = match config
        .registry()
        .map(Arc::new)
        .and_then(|registry| {
            info!(
                boards = registry.board_count(),
                lines = registry.all_lines().len(),
                "winning lines generated"
            );
            Session::new(&config, registry)
        }) {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "failed to start game");
            return ExitCode::FAILURE;
        }
    };
    let labels = config.boards.iter().map(|b| b.label.clone()).collect();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 820.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Hyper-Space Tic-Tac-Toe"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "hyperspace",
        options,
        Box::new(move |cc| Ok(Box::new(HyperspaceApp::new(cc, session, labels)))),
    );
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "GUI exited with an error");
            ExitCode::FAILURE
        }
    }
}
