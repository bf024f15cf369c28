use crate::models::{ConfigSnapshot, PathField, ScoreRecord};
use crate::services::MalformedLine;
use tokio::sync::broadcast;

/// Outcome notifications for analysis requests
///
/// Emitted by the dispatcher and its analysis tasks so the operator can be
/// told about results and failures without going through the menu's input
/// lock.
#[derive(Clone, Debug, PartialEq)]
pub enum AnalysisEvent {
    /// A request passed validation and its analysis task was launched
    Dispatched { id: u64, snapshot: ConfigSnapshot },

    /// An analysis finished and its record was appended to the sink.
    /// Lexicon lines skipped while loading are carried along.
    Completed {
        id: u64,
        record: ScoreRecord,
        malformed_lines: Vec<MalformedLine>,
    },

    /// A request was skipped because some paths were not configured
    Rejected { id: u64, missing: Vec<PathField> },

    /// An analysis was aborted
    Failed { id: u64, error: String },
}

impl AnalysisEvent {
    pub fn id(&self) -> u64 {
        match self {
            AnalysisEvent::Dispatched { id, .. }
            | AnalysisEvent::Completed { id, .. }
            | AnalysisEvent::Rejected { id, .. }
            | AnalysisEvent::Failed { id, .. } => *id,
        }
    }

    /// Message for the operator. One line, except that a completed run adds
    /// a line per skipped lexicon entry.
    pub fn describe(&self) -> String {
        match self {
            AnalysisEvent::Dispatched { id, snapshot } => {
                format!("[#{id}] Analysing {}", snapshot.text_path)
            }
            AnalysisEvent::Completed {
                id,
                record,
                malformed_lines,
            } => {
                let mut message = format!("[#{id}] {}", record.to_line());
                for line in malformed_lines {
                    message.push_str(&format!(
                        "\n[#{id}] Invalid line format at line {}: {}",
                        line.line_number, line.content
                    ));
                }
                message
            }
            AnalysisEvent::Rejected { id, missing } => format!(
                "[#{id}] Please ensure all file paths are specified (missing: {})",
                missing
                    .iter()
                    .map(|field| field.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            AnalysisEvent::Failed { id, error } => format!("[#{id}] Analysis failed: {error}"),
        }
    }
}

/// Broadcast channel for [`AnalysisEvent`]s
///
/// Sending never fails from the caller's point of view; events are simply
/// dropped when nobody is subscribed.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AnalysisEvent>,
}

impl EventBus {
    /// Create a bus with a buffer of 100 events per subscriber
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self { tx }
    }

    pub fn emit(&self, event: AnalysisEvent) {
        // Ignore send errors - it's OK if no one is listening
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AnalysisEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
