// Sentiment Pipeline - interactive, concurrent lexicon-based sentiment scoring
//
// This is the library crate containing the pipeline components.
// The binary crate (main.rs) wires them to stdin/stdout.

pub mod config;
pub mod dispatch;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use dispatch::{AnalysisEvent, Dispatcher, EventBus, RequestQueue};
pub use models::{ConfigSnapshot, PathField, ScoreRecord, Settings, SnapshotPolicy};
pub use state::{ConfigStore, ShutdownSignal};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
