//! Sentiment Pipeline - interactive, concurrent sentiment scoring
//!
//! Main entry point for the console application.
//!
//! # Overview
//!
//! The operator picks a text file, a lexicon and a stopword list from a
//! numbered menu, then queues any number of analyses. Each analysis runs on
//! its own tokio task while the menu stays responsive.
//!
//! The application uses a hybrid threading model:
//! - **Menu thread**: dedicated std::thread reading stdin (blocking)
//! - **Tokio workers**: dispatcher loop, analysis tasks, per-line tokenizer tasks
//! - **Reporter task**: prints finished scores and errors to stderr
//!
//! # Execution Flow
//!
//! 1. Load settings from `config/settings.yaml` and `SENTIMENT_*` variables
//! 2. Initialize logging → `<log_dir>/sentiment.<date>`
//! 3. Create the tokio runtime
//! 4. Seed the shared path store from settings
//! 5. Start the dispatcher and the reporter on the runtime
//! 6. Run the menu on its own thread until Quit, end of input or Ctrl-C
//! 7. Drain in-flight analyses, log metrics, exit

use anyhow::{Context, Result};
use sentiment_pipeline::dispatch::{Dispatcher, EventBus, RequestQueue};
use sentiment_pipeline::metrics::Metrics;
use sentiment_pipeline::services::{AnalysisOptions, FileSink};
use sentiment_pipeline::state::{ConfigStore, ShutdownSignal, input_lock};
use sentiment_pipeline::ui::{MenuLoop, spawn_reporter};
use sentiment_pipeline::{APP_NAME, ConfigManager, VERSION};
use std::io;
use std::sync::Arc;

fn main() -> Result<()> {
    let config_manager = ConfigManager::new("config")?;
    if config_manager.ensure_settings_file()? {
        eprintln!(
            "Wrote default settings to {}",
            config_manager.settings_path()
        );
    }
    let settings = config_manager.load_settings()?;

    let _log_guard = sentiment_pipeline::logging::setup_logging(
        &settings.log_dir,
        "sentiment",
        settings.debug_mode,
        settings.console_logging,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    tracing::debug!("Settings: {:?}", settings);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(settings.worker_threads.max(1))
        .thread_name("sentiment-worker")
        .build()
        .context("Failed to build tokio runtime")?;

    tracing::info!(
        "Tokio runtime initialized with {} worker threads",
        settings.worker_threads.max(1)
    );

    let config = ConfigStore::from_settings(&settings);
    let shutdown = ShutdownSignal::new();
    let input_lock = input_lock();
    let events = EventBus::new();
    let metrics = Arc::new(Metrics::new());
    let (requests, receiver) = RequestQueue::new();

    let dispatcher = Dispatcher::new(
        receiver,
        config.clone(),
        input_lock.clone(),
        shutdown.clone(),
        Arc::new(FileSink::new(settings.output_path.as_str())),
    )
    .with_events(events.clone())
    .with_metrics(Arc::clone(&metrics))
    .with_options(AnalysisOptions::from(&settings))
    .with_policy(settings.snapshot_policy);

    let dispatcher_handle = runtime.spawn(dispatcher.run());
    let reporter_handle = {
        let _runtime_guard = runtime.enter();
        spawn_reporter(&events, io::stderr())
    };
    drop(events);

    let ctrl_c_shutdown = shutdown.clone();
    runtime.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Ctrl-C received");
            ctrl_c_shutdown.trigger();
        }
    });

    let menu_shutdown = shutdown.clone();
    let policy = settings.snapshot_policy;
    let menu_thread = std::thread::Builder::new()
        .name("sentiment-menu".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            let stdout = io::stdout();
            let mut menu = MenuLoop::new(
                stdin.lock(),
                stdout.lock(),
                config,
                requests,
                input_lock,
                menu_shutdown.clone(),
            )
            .with_policy(policy);

            if let Err(e) = menu.run() {
                tracing::error!("Menu loop failed: {}", e);
                menu_shutdown.trigger();
            }
        })
        .context("Failed to spawn menu thread")?;

    let summary = runtime
        .block_on(dispatcher_handle)
        .context("Dispatcher task failed")?;
    // stderr: the menu thread may still hold the stdout lock
    eprintln!("Done - {} analyses completed", summary.completed);

    // The reporter ends once the dispatcher and all analysis tasks are gone
    if let Err(e) = runtime.block_on(reporter_handle) {
        tracing::warn!("Reporter task failed: {}", e);
    }

    // After Ctrl-C the menu thread may still be blocked on stdin
    if menu_thread.is_finished() {
        if menu_thread.join().is_err() {
            tracing::error!("Menu thread panicked");
        }
    } else {
        tracing::info!("Menu thread still waiting for input, not joining");
    }

    metrics.log_summary();
    runtime.shutdown_timeout(std::time::Duration::from_secs(5));

    tracing::info!("Application shutdown complete");
    Ok(())
}
