use super::lexicon::{Lexicon, StopwordSet};
use super::tokenizer::TokenPool;
use std::time::Duration;

/// Sums lexicon weights over tokens, ignoring stopwords and unknown tokens
///
/// Weights are accumulated as integers so the total does not depend on the
/// order tokens arrive in.
#[derive(Debug, Clone)]
pub struct Scorer {
    lexicon: Lexicon,
    stopwords: StopwordSet,
    token_delay: Option<Duration>,
}

impl Scorer {
    pub fn new(lexicon: Lexicon, stopwords: StopwordSet) -> Self {
        Self {
            lexicon,
            stopwords,
            token_delay: None,
        }
    }

    /// Sleep for `delay` after every token that contributes a weight.
    ///
    /// This throttles scoring to make concurrent runs observable. It blocks
    /// the calling thread, so delayed scoring belongs on a blocking thread.
    pub fn with_token_delay(mut self, delay: Option<Duration>) -> Self {
        self.token_delay = delay;
        self
    }

    /// Weight of a single token; 0 for stopwords and unknown tokens.
    pub fn token_weight(&self, token: &str) -> i64 {
        self.lookup(token).unwrap_or(0)
    }

    /// `None` unless the token is a non-stopword lexicon entry
    fn lookup(&self, token: &str) -> Option<i64> {
        let token = token.to_lowercase();
        if self.stopwords.contains(&token) {
            return None;
        }
        self.lexicon.weight(&token).map(i64::from)
    }

    /// Total score of a flat token sequence
    pub fn score<I, S>(&self, tokens: I) -> f64
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let total: i64 = tokens
            .into_iter()
            .map(|token| self.contribution(token.as_ref(), 1))
            .sum();
        total as f64
    }

    /// Total score of a token pool, weighting each distinct token by its count
    pub fn score_pool(&self, pool: &TokenPool) -> f64 {
        let total: i64 = pool
            .counts()
            .into_iter()
            .map(|(token, count)| self.contribution(&token, count))
            .sum();
        total as f64
    }

    /// Split each unit on whitespace and sum the per-unit scores
    pub fn score_units<S: AsRef<str>>(&self, units: &[S]) -> f64 {
        units
            .iter()
            .map(|unit| self.score(unit.as_ref().split_whitespace()))
            .sum()
    }

    fn contribution(&self, token: &str, occurrences: usize) -> i64 {
        let Some(weight) = self.lookup(token) else {
            return 0;
        };

        if let Some(delay) = self.token_delay {
            for _ in 0..occurrences {
                std::thread::sleep(delay);
            }
        }

        weight * occurrences as i64
    }
}
