//! Glucorisk: diabetes risk scoring in the terminal.
//!
//! Main entry point for the terminal application.

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use glucorisk::adapters::sanitize::SanitizingMakeWriter;
use glucorisk::adapters::LogisticModel;
use glucorisk::application::RiskClassifier;
use glucorisk::config::AppConfig;
use glucorisk::tui::App;

fn main() -> Result<()> {
    // Writing logs to the terminal would corrupt the TUI (alternate screen).
    // Interactive TTY logs to a file, non-interactive to stdout.
    let log_mode = std::env::var("RISKSCORE_LOG_MODE").unwrap_or_else(|_| "auto".to_string());

    let interactive = std::io::stdout().is_terminal();
    let use_file = match log_mode.as_str() {
        "file" => true,
        "stdout" => false,
        // auto
        _ => interactive,
    };

    let (writer, _guard) = if use_file {
        let log_file = std::env::var("RISKSCORE_LOG_FILE")
            .unwrap_or_else(|_| "glucorisk.log".to_string());

        if let Some(parent) = std::path::Path::new(&log_file).parent() {
            // Best-effort: the open below reports the real error.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .with_context(|| format!("Failed to open log file {log_file}"))?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting Glucorisk...");

    // Refuse to start on invalid thresholds or an unloadable model.
    let config = AppConfig::from_env().context("Invalid configuration")?;
    let model = LogisticModel::load(&config.model_path).with_context(|| {
        format!(
            "Failed to load model from {:?}. Set RISKSCORE_MODEL_PATH to a model JSON file.",
            config.model_path
        )
    })?;

    let classifier = RiskClassifier::new(Arc::new(model), config.thresholds);
    let mut app = App::new(classifier, config.threshold_source);
    app.run()?;

    tracing::info!("Glucorisk shutdown complete.");
    Ok(())
}
