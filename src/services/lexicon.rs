//! Lexicon and stopword loading.
//!
//! Both loaders are plain synchronous functions over line-oriented files. They
//! only fail when the file itself cannot be opened or read; a malformed lexicon
//! line is logged, recorded on the [`Lexicon`] and skipped.

use super::error::ReadError;
use camino::Utf8Path;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};

/// A lexicon line that could not be parsed as `token,weight`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based line number
    pub line_number: usize,
    pub content: String,
}

/// Lowercase token → integer sentiment weight
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    weights: IndexMap<String, i32>,
    malformed: Vec<MalformedLine>,
}

impl Lexicon {
    /// Build a lexicon from in-memory pairs. Later duplicates win.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: AsRef<str>,
    {
        let weights = pairs
            .into_iter()
            .map(|(token, weight)| (token.as_ref().to_lowercase(), weight))
            .collect();
        Self {
            weights,
            malformed: Vec::new(),
        }
    }

    pub fn weight(&self, token: &str) -> Option<i32> {
        self.weights.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Lines skipped while loading, in file order
    pub fn malformed_lines(&self) -> &[MalformedLine] {
        &self.malformed
    }

    /// Entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.weights.iter().map(|(token, weight)| (token.as_str(), *weight))
    }
}

/// Lowercase tokens that never contribute to a score
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|word| word.as_ref().trim().to_lowercase())
                .filter(|word| !word.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Parse one `token,weight` line. Fields past the second are ignored.
fn parse_lexicon_line(line: &str) -> Option<(String, i32)> {
    let mut parts = line.split(',');
    let token = parts.next()?.trim();
    let weight = parts.next()?.trim().parse::<i32>().ok()?;

    if token.is_empty() {
        return None;
    }

    Some((token.to_lowercase(), weight))
}

/// Load a lexicon file of `token,weight` lines.
///
/// # Errors
///
/// Returns [`ReadError`] if the file cannot be opened or a line cannot be read.
pub fn load_lexicon(path: &Utf8Path) -> Result<Lexicon, ReadError> {
    let file = File::open(path).map_err(|e| ReadError::new(path, e))?;
    let reader = BufReader::new(file);

    let mut lexicon = Lexicon::default();

    for (index, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|e| ReadError::new(path, e))?;

        if line.trim().is_empty() {
            continue;
        }

        match parse_lexicon_line(&line) {
            Some((token, weight)) => {
                lexicon.weights.insert(token, weight);
            }
            None => {
                tracing::warn!("Invalid lexicon line {} in {}: {:?}", index + 1, path, line);
                lexicon.malformed.push(MalformedLine {
                    line_number: index + 1,
                    content: line,
                });
            }
        }
    }

    tracing::debug!(
        "Loaded lexicon from {}: {} entries, {} malformed lines",
        path,
        lexicon.len(),
        lexicon.malformed.len()
    );

    Ok(lexicon)
}

/// Load a stopword file with one token per line.
///
/// # Errors
///
/// Returns [`ReadError`] if the file cannot be opened or a line cannot be read.
pub fn load_stopwords(path: &Utf8Path) -> Result<StopwordSet, ReadError> {
    let file = File::open(path).map_err(|e| ReadError::new(path, e))?;
    let reader = BufReader::new(file);

    let lines = reader
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ReadError::new(path, e))?;

    let stopwords = StopwordSet::from_words(lines);
    tracing::debug!("Loaded {} stopwords from {}", stopwords.len(), path);

    Ok(stopwords)
}
