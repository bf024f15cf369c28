//! Data models for the sentiment pipeline.
//!
//! - [`Configuration`] / [`ConfigSnapshot`]: the operator's three input paths
//! - [`PathField`]: names one of those paths
//! - [`AnalysisRequest`]: the signal carried by the request queue
//! - [`ScoreRecord`]: the result of one finished analysis
//! - [`Settings`]: runtime settings loaded by [`ConfigManager`](crate::config::ConfigManager)
//!
//! The path triple is only mutated through [`ConfigStore`](crate::state::ConfigStore);
//! every other component works on cloned snapshots.

pub mod config;
pub mod paths;
pub mod record;

pub use config::{Settings, SnapshotPolicy};
pub use paths::{ConfigSnapshot, Configuration, PathField};
pub use record::{AnalysisRequest, ScoreRecord};
