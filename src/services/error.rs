use crate::models::PathField;
use camino::Utf8PathBuf;
use thiserror::Error;

/// An input file could not be opened or read
#[derive(Error, Debug)]
#[error("Failed to read {path}: {source}")]
pub struct ReadError {
    pub path: Utf8PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl ReadError {
    pub fn new(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// The result sink rejected a record
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to append to {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort a single analysis attempt
///
/// None of these are fatal to the menu or the dispatcher; other analyses
/// running at the same time are unaffected.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Configuration incomplete, please specify: {}", join_fields(.missing))]
    ConfigurationIncomplete { missing: Vec<PathField> },

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("Analysis task failed: {0}")]
    Task(String),
}

fn join_fields(fields: &[PathField]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_message_lists_fields() {
        let err = AnalysisError::ConfigurationIncomplete {
            missing: vec![PathField::Text, PathField::Stopwords],
        };
        assert_eq!(
            err.to_string(),
            "Configuration incomplete, please specify: text file, stopwords file"
        );
    }

    #[test]
    fn test_read_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AnalysisError = ReadError::new("nope.txt", io).into();

        assert!(matches!(err, AnalysisError::Read(_)));
        assert!(err.to_string().contains("nope.txt"));
    }
}
