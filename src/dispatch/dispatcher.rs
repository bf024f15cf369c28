use super::events::{AnalysisEvent, EventBus};
use super::queue::RequestReceiver;
use crate::metrics::Metrics;
use crate::models::{AnalysisRequest, ConfigSnapshot, SnapshotPolicy};
use crate::services::{AnalysisError, AnalysisOptions, ResultSink, analyze_and_record};
use crate::state::{ConfigStore, InputLock, ShutdownSignal};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Counts reported by [`Dispatcher::run`] once it has shut down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub dispatched: usize,
    pub rejected: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Consumer loop that turns queued requests into independent analysis tasks
///
/// Each accepted request gets its own tokio task; the dispatcher never waits
/// for one analysis before launching the next. Tasks are tracked in a
/// `JoinSet` only to report their outcome and to drain them on shutdown;
/// results themselves leave through the [`ResultSink`].
pub struct Dispatcher {
    receiver: RequestReceiver,
    config: ConfigStore,
    input_lock: InputLock,
    shutdown: ShutdownSignal,
    sink: Arc<dyn ResultSink>,
    events: EventBus,
    metrics: Arc<Metrics>,
    options: AnalysisOptions,
    policy: SnapshotPolicy,
}

impl Dispatcher {
    pub fn new(
        receiver: RequestReceiver,
        config: ConfigStore,
        input_lock: InputLock,
        shutdown: ShutdownSignal,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            receiver,
            config,
            input_lock,
            shutdown,
            sink,
            events: EventBus::new(),
            metrics: Arc::new(Metrics::new()),
            options: AnalysisOptions::default(),
            policy: SnapshotPolicy::default(),
        }
    }

    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_policy(mut self, policy: SnapshotPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run until shutdown is requested or every request sender is dropped.
    ///
    /// On shutdown the queue stops accepting requests, but every request
    /// already queued is still dispatched. Analyses in flight run to
    /// completion before this returns.
    pub async fn run(mut self) -> DispatchSummary {
        tracing::info!("Dispatcher started (snapshot policy: {:?})", self.policy);

        let mut summary = DispatchSummary::default();
        let mut tasks: JoinSet<bool> = JoinSet::new();
        let mut shutdown_rx = self.shutdown.subscribe();

        loop {
            if *shutdown_rx.borrow_and_update() {
                break;
            }

            tokio::select! {
                biased;

                _ = shutdown_rx.changed() => {
                    // Re-checked at the top of the loop
                }

                Some(finished) = tasks.join_next(), if !tasks.is_empty() => {
                    Self::tally(&mut summary, finished);
                }

                request = self.receiver.dequeue() => {
                    match request {
                        Some(request) => self.dispatch(request, &mut tasks, &mut summary).await,
                        None => {
                            tracing::info!("Request queue closed");
                            break;
                        }
                    }
                }
            }
        }

        self.receiver.close();
        let mut late = 0;
        while let Some(request) = self.receiver.try_dequeue() {
            late += 1;
            self.dispatch(request, &mut tasks, &mut summary).await;
        }
        if late > 0 {
            tracing::info!("Handled {} requests queued before shutdown", late);
        }

        if !tasks.is_empty() {
            tracing::info!("Waiting for {} in-flight analyses to finish", tasks.len());
        }
        while let Some(finished) = tasks.join_next().await {
            Self::tally(&mut summary, finished);
        }

        tracing::info!("Dispatcher stopped: {:?}", summary);
        summary
    }

    async fn dispatch(
        &self,
        request: AnalysisRequest,
        tasks: &mut JoinSet<bool>,
        summary: &mut DispatchSummary,
    ) {
        let id = request.id;
        let snapshot = self.resolve_snapshot(request).await;

        let missing = snapshot.missing_fields();
        if !missing.is_empty() {
            let err = AnalysisError::ConfigurationIncomplete {
                missing: missing.clone(),
            };
            tracing::warn!("Rejecting analysis request #{}: {}", id, err);
            self.metrics.record_rejected();
            self.events.emit(AnalysisEvent::Rejected { id, missing });
            summary.rejected += 1;
            return;
        }

        tracing::info!(
            "Dispatching analysis #{} (text={}, lexicon={}, stopwords={})",
            id,
            snapshot.text_path,
            snapshot.lexicon_path,
            snapshot.stopword_path
        );
        self.metrics.record_dispatched();
        self.events.emit(AnalysisEvent::Dispatched {
            id,
            snapshot: snapshot.clone(),
        });
        summary.dispatched += 1;

        let sink = Arc::clone(&self.sink);
        let events = self.events.clone();
        let metrics = Arc::clone(&self.metrics);
        let options = self.options;

        tasks.spawn(async move {
            match analyze_and_record(&snapshot, options, sink).await {
                Ok(report) => {
                    metrics.record_completed(report.tokens, report.duration);
                    events.emit(AnalysisEvent::Completed {
                        id,
                        record: report.record,
                        malformed_lines: report.malformed_lines,
                    });
                    true
                }
                Err(e) => {
                    tracing::error!("Analysis #{} failed: {}", id, e);
                    metrics.record_failed();
                    events.emit(AnalysisEvent::Failed {
                        id,
                        error: e.to_string(),
                    });
                    false
                }
            }
        });
    }

    /// Paths captured at enqueue time win; otherwise read the store now.
    async fn resolve_snapshot(&self, request: AnalysisRequest) -> ConfigSnapshot {
        if let Some(snapshot) = request.snapshot {
            return snapshot;
        }

        match self.policy {
            SnapshotPolicy::AtDispatch => {
                // Wait out any path the operator is still typing, unless
                // shutdown means that entry may never finish
                let _input = tokio::select! {
                    guard = self.input_lock.lock() => Some(guard),
                    _ = self.shutdown.wait() => self.input_lock.try_lock().ok(),
                };
                self.config.snapshot()
            }
            SnapshotPolicy::AtEnqueue => self.config.snapshot(),
        }
    }

    fn tally(summary: &mut DispatchSummary, finished: Result<bool, tokio::task::JoinError>) {
        match finished {
            Ok(true) => summary.completed += 1,
            Ok(false) => summary.failed += 1,
            Err(e) => {
                tracing::error!("Analysis task panicked: {}", e);
                summary.failed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::RequestQueue;
    use crate::models::{PathField, ScoreRecord};
    use crate::services::SinkError;
    use crate::state::input_lock;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        records: Mutex<Vec<ScoreRecord>>,
    }

    impl ResultSink for RecordingSink {
        fn append(&self, record: &ScoreRecord) -> Result<(), SinkError> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_incomplete_request_is_rejected() {
        let (sender, receiver) = RequestQueue::new();
        let sink = Arc::new(RecordingSink::default());
        let events = EventBus::new();
        let mut rx = events.subscribe();

        let dispatcher = Dispatcher::new(
            receiver,
            ConfigStore::new(),
            input_lock(),
            ShutdownSignal::new(),
            sink.clone(),
        )
        .with_events(events);

        sender.enqueue(None);
        drop(sender);

        let summary = dispatcher.run().await;

        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.dispatched, 0);
        assert!(sink.records.lock().unwrap().is_empty());
        assert!(matches!(
            rx.try_recv().unwrap(),
            AnalysisEvent::Rejected { id: 1, ref missing } if missing.len() == 3
        ));
    }

    #[tokio::test]
    async fn test_missing_file_reports_failure() {
        let (sender, receiver) = RequestQueue::new();
        let config = ConfigStore::new();
        config.set(PathField::Text, "/nonexistent/text.txt");
        config.set(PathField::Lexicon, "/nonexistent/lexicon.txt");
        config.set(PathField::Stopwords, "/nonexistent/stop.txt");

        let sink = Arc::new(RecordingSink::default());
        let dispatcher = Dispatcher::new(
            receiver,
            config,
            input_lock(),
            ShutdownSignal::new(),
            sink.clone(),
        );

        sender.enqueue(None);
        drop(sender);

        let summary = dispatcher.run().await;
        assert_eq!(summary.dispatched, 1);
        assert_eq!(summary.failed, 1);
        assert!(sink.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_stops_loop() {
        let (sender, receiver) = RequestQueue::new();
        let shutdown = ShutdownSignal::new();
        let dispatcher = Dispatcher::new(
            receiver,
            ConfigStore::new(),
            input_lock(),
            shutdown.clone(),
            Arc::new(RecordingSink::default()),
        );

        let handle = tokio::spawn(dispatcher.run());
        shutdown.trigger();

        let summary = tokio::time::timeout(std::time::Duration::from_secs(1), handle)
            .await
            .expect("dispatcher did not observe shutdown")
            .unwrap();
        assert_eq!(summary, DispatchSummary::default());
        assert!(sender.enqueue(None).is_none());
    }

    #[tokio::test]
    async fn test_requests_queued_before_shutdown_are_handled() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = camino::Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        std::fs::write(root.join("text.txt"), "good day\n").unwrap();
        std::fs::write(root.join("lexicon.txt"), "good,2\n").unwrap();
        std::fs::write(root.join("stop.txt"), "").unwrap();

        let config = ConfigStore::new();
        config.set(PathField::Text, root.join("text.txt").as_str());
        config.set(PathField::Lexicon, root.join("lexicon.txt").as_str());
        config.set(PathField::Stopwords, root.join("stop.txt").as_str());

        let (sender, receiver) = RequestQueue::new();
        let shutdown = ShutdownSignal::new();
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = Dispatcher::new(
            receiver,
            config,
            input_lock(),
            shutdown.clone(),
            sink.clone(),
        );

        sender.enqueue(None);
        sender.enqueue(None);
        shutdown.trigger();

        let summary = dispatcher.run().await;

        assert_eq!(summary.dispatched, 2);
        assert_eq!(summary.completed, 2);
        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|record| record.total_score == 2.0));
        drop(records);
        assert!(sender.enqueue(None).is_none());
    }
}
