use crate::dispatch::{AnalysisEvent, EventBus};
use std::io::Write;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Print analysis outcomes to `writer` as they happen.
///
/// The binary passes stderr so reports never need the menu's input lock and
/// never wait for the operator to finish typing. The task ends once every
/// [`EventBus`] clone has been dropped.
pub fn spawn_reporter<W>(events: &EventBus, mut writer: W) -> JoinHandle<()>
where
    W: Write + Send + 'static,
{
    let mut rx = events.subscribe();

    tokio::spawn(async move {
        tracing::debug!("Reporter task started");

        loop {
            match rx.recv().await {
                Ok(event) => {
                    // Dispatch notices are logged, not shown
                    if matches!(event, AnalysisEvent::Dispatched { .. }) {
                        tracing::trace!("{}", event.describe());
                        continue;
                    }
                    if let Err(e) = writeln!(writer, "\n{}", event.describe()) {
                        tracing::warn!("Failed to report analysis event: {}", e);
                    }
                }
                Err(RecvError::Closed) => break,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Reporter lagged - {} analysis events were skipped", skipped);
                }
            }
        }

        tracing::debug!("Reporter task terminated");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConfigSnapshot, PathField, ScoreRecord};
    use crate::services::MalformedLine;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_reporter_prints_outcomes() {
        let events = EventBus::new();
        let buf = SharedBuf::default();
        let handle = spawn_reporter(&events, buf.clone());

        let snapshot = ConfigSnapshot {
            text_path: "t.txt".to_string(),
            lexicon_path: "l.txt".to_string(),
            stopword_path: "s.txt".to_string(),
        };
        events.emit(AnalysisEvent::Dispatched {
            id: 1,
            snapshot: snapshot.clone(),
        });
        events.emit(AnalysisEvent::Completed {
            id: 1,
            record: ScoreRecord::new(3.0, &snapshot),
            malformed_lines: Vec::new(),
        });
        events.emit(AnalysisEvent::Rejected {
            id: 2,
            missing: vec![PathField::Text],
        });
        drop(events);

        handle.await.unwrap();

        let output = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("[#1] Total score: 3.00 (t.txt, l.txt, s.txt)"));
        assert!(output.contains("[#2] Please ensure all file paths are specified"));
        assert!(!output.contains("Analysing"));
    }

    #[tokio::test]
    async fn test_reporter_prints_invalid_lexicon_lines() {
        let events = EventBus::new();
        let buf = SharedBuf::default();
        let handle = spawn_reporter(&events, buf.clone());

        let snapshot = ConfigSnapshot {
            text_path: "t.txt".to_string(),
            lexicon_path: "l.txt".to_string(),
            stopword_path: "s.txt".to_string(),
        };
        events.emit(AnalysisEvent::Completed {
            id: 5,
            record: ScoreRecord::new(2.0, &snapshot),
            malformed_lines: vec![
                MalformedLine {
                    line_number: 2,
                    content: "nocomma".to_string(),
                },
                MalformedLine {
                    line_number: 4,
                    content: "bad,x".to_string(),
                },
            ],
        });
        drop(events);

        handle.await.unwrap();

        let output = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("[#5] Total score: 2.00 (t.txt, l.txt, s.txt)"));
        assert!(output.contains("[#5] Invalid line format at line 2: nocomma"));
        assert!(output.contains("[#5] Invalid line format at line 4: bad,x"));
    }
}
