use super::error::AnalysisError;
use super::lexicon::{MalformedLine, load_lexicon, load_stopwords};
use super::scorer::Scorer;
use super::sink::ResultSink;
use super::tokenizer::tokenize;
use crate::models::{ConfigSnapshot, ScoreRecord, Settings};
use camino::Utf8PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Per-run knobs taken from [`Settings`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub token_delay: Option<Duration>,
}

impl From<&Settings> for AnalysisOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            token_delay: settings.token_delay(),
        }
    }
}

/// Everything one finished run produced
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub record: ScoreRecord,
    pub tokens: usize,
    /// Lexicon lines that were skipped
    pub malformed_lines: Vec<MalformedLine>,
    pub duration: Duration,
}

/// Score the text file named in `snapshot` without recording the result.
///
/// The lexicon, stopword set and token pool are built fresh for this call.
/// Loading happens on a blocking thread while the text file is tokenized
/// concurrently; scoring runs on a blocking thread because of the optional
/// per-token delay.
///
/// # Errors
///
/// - [`AnalysisError::ConfigurationIncomplete`] if any path is empty
/// - [`AnalysisError::Read`] if an input file cannot be read
/// - [`AnalysisError::Task`] if an internal task panicked
pub async fn analyze(
    snapshot: &ConfigSnapshot,
    options: AnalysisOptions,
) -> Result<AnalysisReport, AnalysisError> {
    let missing = snapshot.missing_fields();
    if !missing.is_empty() {
        return Err(AnalysisError::ConfigurationIncomplete { missing });
    }

    let start = Instant::now();

    let lexicon_path = Utf8PathBuf::from(&snapshot.lexicon_path);
    let stopword_path = Utf8PathBuf::from(&snapshot.stopword_path);
    let text_path = Utf8PathBuf::from(&snapshot.text_path);

    let loaders = tokio::task::spawn_blocking(move || {
        let lexicon = load_lexicon(&lexicon_path)?;
        let stopwords = load_stopwords(&stopword_path)?;
        Ok::<_, AnalysisError>((lexicon, stopwords))
    });

    let pool = tokenize(&text_path).await?;
    let (lexicon, stopwords) = loaders.await.map_err(join_error)??;

    let malformed_lines = lexicon.malformed_lines().to_vec();
    let tokens = pool.len();
    let scorer = Scorer::new(lexicon, stopwords).with_token_delay(options.token_delay);

    let total_score = tokio::task::spawn_blocking(move || scorer.score_pool(&pool))
        .await
        .map_err(join_error)?;

    let duration = start.elapsed();
    tracing::info!(
        "Scored {} ({} tokens) in {:.2}s: {:.2}",
        snapshot.text_path,
        tokens,
        duration.as_secs_f32(),
        total_score
    );

    Ok(AnalysisReport {
        record: ScoreRecord::new(total_score, snapshot),
        tokens,
        malformed_lines,
        duration,
    })
}

/// Score `snapshot` and hand the record to `sink`.
///
/// # Errors
///
/// Any error from [`analyze`], or [`AnalysisError::Sink`] if the record could
/// not be appended.
pub async fn analyze_and_record(
    snapshot: &ConfigSnapshot,
    options: AnalysisOptions,
    sink: Arc<dyn ResultSink>,
) -> Result<AnalysisReport, AnalysisError> {
    let report = analyze(snapshot, options).await?;

    let record = report.record.clone();
    tokio::task::spawn_blocking(move || sink.append(&record))
        .await
        .map_err(join_error)??;

    Ok(report)
}

fn join_error(e: tokio::task::JoinError) -> AnalysisError {
    AnalysisError::Task(e.to_string())
}
