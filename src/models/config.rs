use serde::{Deserialize, Serialize};
use std::time::Duration;

/// When the dispatcher resolves the path triple for a queued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotPolicy {
    /// Re-read the shared paths when the dispatcher dequeues the request.
    /// A path changed in between silently wins.
    #[default]
    AtDispatch,

    /// Capture the paths when the operator picks "run analysis" and carry
    /// them in the request.
    AtEnqueue,
}

/// Runtime settings loaded from `settings.yaml` and `SENTIMENT_*` variables.
///
/// Every field has a default so a partial (or missing) file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Initial text corpus path, empty when unset
    pub text_path: String,

    /// Initial lexicon path, empty when unset
    pub lexicon_path: String,

    /// Initial stopword list path, empty when unset
    pub stopword_path: String,

    /// Append-only file receiving one line per finished analysis
    pub output_path: String,

    /// Artificial pause after each scoring token, in milliseconds (0 = off)
    pub token_delay_ms: u64,

    pub snapshot_policy: SnapshotPolicy,

    /// Tokio worker threads
    pub worker_threads: usize,

    pub log_dir: String,
    pub debug_mode: bool,

    /// Mirror log output to stderr
    pub console_logging: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            text_path: String::new(),
            lexicon_path: String::new(),
            stopword_path: String::new(),
            output_path: "Output/out.txt".to_string(),
            token_delay_ms: 0,
            snapshot_policy: SnapshotPolicy::AtDispatch,
            worker_threads: 4,
            log_dir: "logs".to_string(),
            debug_mode: false,
            console_logging: false,
        }
    }
}

impl Settings {
    /// The per-token scoring delay, or `None` when disabled.
    pub fn token_delay(&self) -> Option<Duration> {
        (self.token_delay_ms > 0).then(|| Duration::from_millis(self.token_delay_ms))
    }
}
