use super::paths::ConfigSnapshot;

/// A queued "run analysis now" signal.
///
/// By default `snapshot` is `None` and the dispatcher reads the shared paths
/// when it dequeues. It is only filled in at enqueue time under the opt-in
/// [`SnapshotPolicy::AtEnqueue`](crate::models::SnapshotPolicy::AtEnqueue).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub id: u64,
    pub snapshot: Option<ConfigSnapshot>,
}

/// The outcome of one completed analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub total_score: f64,
    pub text_path: String,
    pub lexicon_path: String,
    pub stopword_path: String,
}

impl ScoreRecord {
    pub fn new(total_score: f64, snapshot: &ConfigSnapshot) -> Self {
        Self {
            total_score,
            text_path: snapshot.text_path.clone(),
            lexicon_path: snapshot.lexicon_path.clone(),
            stopword_path: snapshot.stopword_path.clone(),
        }
    }

    /// The line appended to the result file.
    pub fn to_line(&self) -> String {
        format!(
            "Total score: {:.2} ({}, {}, {})",
            self.total_score, self.text_path, self.lexicon_path, self.stopword_path
        )
    }
}
