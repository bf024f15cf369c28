//! Services module - the analysis pipeline behind one "run analysis" request.
//!
//! The services know nothing about the menu, the queue or the dispatcher; every
//! input is an explicit parameter, which keeps them testable on their own.
//!
//! # Components
//!
//! - [`load_lexicon`] / [`load_stopwords`]: parse the lexicon (`token,weight`
//!   lines) and stopword (one token per line) files
//! - [`tokenize`]: fans a text file out into one task per line and collects
//!   every token into a shared [`TokenPool`], returning only once all line
//!   tasks are done
//! - [`Scorer`]: sums lexicon weights over tokens, skipping stopwords
//! - [`ResultSink`] / [`FileSink`]: serialized, append-only destination for
//!   finished [`ScoreRecord`](crate::models::ScoreRecord)s
//! - [`analyze`] / [`analyze_and_record`]: one complete run
//!
//! # Usage Example
//!
//! ```ignore
//! use sentiment_pipeline::services::{analyze_and_record, AnalysisOptions, FileSink};
//!
//! let sink = Arc::new(FileSink::new("Output/out.txt"));
//! let report = analyze_and_record(&snapshot, AnalysisOptions::default(), sink).await?;
//! println!("{}", report.record.to_line());
//! ```

pub mod analysis;
pub mod error;
pub mod lexicon;
pub mod scorer;
pub mod sink;
pub mod tokenizer;

pub use analysis::{AnalysisOptions, AnalysisReport, analyze, analyze_and_record};
pub use error::{AnalysisError, ReadError, SinkError};
pub use lexicon::{Lexicon, MalformedLine, StopwordSet, load_lexicon, load_stopwords};
pub use scorer::Scorer;
pub use sink::{FileSink, ResultSink};
pub use tokenizer::{TokenPool, tokenize};
