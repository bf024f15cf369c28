//! Property tests for tokenizing and scoring
//!
//! These tests verify:
//! - The score does not depend on token order
//! - Stopwords never contribute, even when they are lexicon entries
//! - Pool-based and flat scoring agree
//! - The token pool holds exactly the tokens of the file, every time

use camino::Utf8PathBuf;
use proptest::prelude::*;
use sentiment_pipeline::services::{Lexicon, Scorer, StopwordSet, TokenPool, tokenize};
use std::io::Write;
use tempfile::NamedTempFile;

const WORDS: [&str; 8] = ["good", "bad", "great", "awful", "the", "a", "day", "meh"];

fn scorer() -> Scorer {
    Scorer::new(
        Lexicon::from_pairs([
            ("good", 2),
            ("bad", -1),
            ("great", 3),
            ("awful", -4),
            ("the", 100),
        ]),
        StopwordSet::from_words(["the", "a"]),
    )
}

fn token_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(WORDS.to_vec()), 0..64)
        .prop_map(|words| words.into_iter().map(str::to_string).collect())
}

proptest! {
    #[test]
    fn prop_score_is_order_independent(
        (original, shuffled) in token_strategy()
            .prop_flat_map(|tokens| (Just(tokens.clone()), Just(tokens).prop_shuffle()))
    ) {
        let scorer = scorer();
        prop_assert_eq!(scorer.score(&original), scorer.score(&shuffled));
    }

    #[test]
    fn prop_stopwords_never_contribute(tokens in token_strategy(), extra in 0usize..20) {
        let scorer = scorer();
        let base = scorer.score(&tokens);

        let mut padded = tokens.clone();
        padded.extend(std::iter::repeat_n("the".to_string(), extra));
        padded.extend(std::iter::repeat_n("A".to_string(), extra));

        prop_assert_eq!(scorer.score(&padded), base);
    }

    #[test]
    fn prop_pool_score_matches_flat_score(tokens in token_strategy()) {
        let scorer = scorer();
        let pool = TokenPool::new();
        for token in &tokens {
            pool.push(token.clone());
        }

        prop_assert_eq!(pool.len(), tokens.len());
        prop_assert_eq!(scorer.score_pool(&pool), scorer.score(&tokens));
    }
}

#[test]
fn test_worked_example() {
    let scorer = scorer();
    assert_eq!(scorer.score_units(&["the good day", "bad good"]), 3.0);
    assert_eq!(scorer.token_weight("the"), 0);
    assert_eq!(scorer.token_weight("meh"), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_tokenize_is_deterministic_for_many_lines() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let mut expected = 0;
    for i in 0..2_000 {
        let line: Vec<&str> = WORDS.iter().copied().cycle().skip(i % 8).take(1 + i % 5).collect();
        expected += line.len();
        writeln!(temp_file, "{}", line.join(" ")).unwrap();
    }
    temp_file.flush().unwrap();

    let path = Utf8PathBuf::try_from(temp_file.path().to_path_buf()).unwrap();
    let scorer = scorer();

    let first = tokenize(&path).await.unwrap();
    let first_score = scorer.score_pool(&first);
    for _ in 0..5 {
        let pool = tokenize(&path).await.unwrap();
        assert_eq!(pool.len(), expected);
        assert_eq!(scorer.score_pool(&pool), first_score);
    }
}
