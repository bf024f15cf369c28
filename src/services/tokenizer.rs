use super::error::{AnalysisError, ReadError};
use camino::Utf8Path;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

/// Unordered multiset of tokens that any number of tasks can append to.
///
/// Appends touch a single shard of the concurrent map plus one atomic
/// counter; there is no pool-wide lock.
#[derive(Debug, Default)]
pub struct TokenPool {
    counts: DashMap<String, AtomicUsize>,
    total: AtomicUsize,
}

impl TokenPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, token: impl Into<String>) {
        self.counts
            .entry(token.into())
            .or_insert_with(|| AtomicUsize::new(0))
            .fetch_add(1, Ordering::Relaxed);
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    /// Lowercase `line`, split it on whitespace and append every token.
    pub fn push_line(&self, line: &str) {
        for token in line.to_lowercase().split_whitespace() {
            self.push(token);
        }
    }

    /// Total number of token occurrences
    pub fn len(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct tokens
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn count(&self, token: &str) -> usize {
        self.counts
            .get(token)
            .map(|count| count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Snapshot of `(token, occurrences)` pairs in no particular order
    pub fn counts(&self) -> Vec<(String, usize)> {
        self.counts
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Relaxed)))
            .collect()
    }

    /// Expand the pool into a flat token list in no particular order
    pub fn into_tokens(self) -> Vec<String> {
        let mut tokens = Vec::with_capacity(self.len());
        for (token, count) in self.counts {
            let count = count.into_inner();
            tokens.extend(std::iter::repeat_n(token, count));
        }
        tokens
    }
}

/// Tokenize `path` by spawning one task per line.
///
/// Returns only after every line task has finished appending to the pool.
///
/// # Errors
///
/// - [`AnalysisError::Read`] if the file cannot be opened or read
/// - [`AnalysisError::Task`] if a line task panicked
pub async fn tokenize(path: &Utf8Path) -> Result<TokenPool, AnalysisError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| ReadError::new(path, e))?;
    let mut lines = BufReader::new(file).lines();

    let pool = Arc::new(TokenPool::new());
    let mut tasks = JoinSet::new();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| ReadError::new(path, e))?
    {
        let pool = Arc::clone(&pool);
        tasks.spawn(async move {
            pool.push_line(&line);
        });
    }

    let line_count = tasks.len();

    // Join-all barrier
    while let Some(result) = tasks.join_next().await {
        result.map_err(|e| AnalysisError::Task(format!("line tokenizer task failed: {e}")))?;
    }

    tracing::debug!(
        "Tokenized {} lines from {} into {} tokens",
        line_count,
        path,
        pool.len()
    );

    // Every clone moved into a task has been dropped by now
    Arc::try_unwrap(pool)
        .map_err(|_| AnalysisError::Task("token pool still shared after join".to_string()))
}
