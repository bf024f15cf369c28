use super::error::SinkError;
use crate::models::ScoreRecord;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Destination for finished score records
///
/// Implementations must serialize writes: two concurrent `append` calls may
/// never interleave their output. `append` is synchronous and may block, so
/// async callers should run it on a blocking thread.
pub trait ResultSink: Send + Sync {
    fn append(&self, record: &ScoreRecord) -> Result<(), SinkError>;
}

/// Appends one line per record to a text file
///
/// The file is opened in append mode for every record and closed again, so
/// external tools can rotate or tail it while the program runs.
pub struct FileSink {
    path: Utf8PathBuf,
    write_lock: Mutex<()>,
}

impl FileSink {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ResultSink for FileSink {
    fn append(&self, record: &ScoreRecord) -> Result<(), SinkError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = self.path.parent() {
            if !parent.as_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        writeln!(file, "{}", record.to_line()).map_err(|e| self.io_error(e))?;
        file.flush().map_err(|e| self.io_error(e))?;

        tracing::debug!("Appended score record to {}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConfigSnapshot;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn record(score: f64) -> ScoreRecord {
        let snapshot = ConfigSnapshot {
            text_path: "t.txt".to_string(),
            lexicon_path: "l.txt".to_string(),
            stopword_path: "s.txt".to_string(),
        };
        ScoreRecord::new(score, &snapshot)
    }

    fn sink_in(temp_dir: &TempDir) -> FileSink {
        let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        FileSink::new(dir.join("Output").join("out.txt"))
    }

    #[test]
    fn test_append_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let sink = sink_in(&temp_dir);

        sink.append(&record(3.0)).unwrap();

        let contents = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(contents, "Total score: 3.00 (t.txt, l.txt, s.txt)\n");
    }

    #[test]
    fn test_append_keeps_existing_lines() {
        let temp_dir = TempDir::new().unwrap();
        let sink = sink_in(&temp_dir);

        sink.append(&record(1.0)).unwrap();
        sink.append(&record(-2.0)).unwrap();

        let contents = fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("Total score: -2.00"));
    }

    #[test]
    fn test_concurrent_appends_do_not_interleave() {
        let temp_dir = TempDir::new().unwrap();
        let sink = Arc::new(sink_in(&temp_dir));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || sink.append(&record(i as f64)).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let contents = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(contents.lines().count(), 16);
        assert!(
            contents
                .lines()
                .all(|line| line.starts_with("Total score: ") && line.ends_with("s.txt)"))
        );
    }

    #[test]
    fn test_unwritable_target_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        // The target is a directory, so opening it for append fails
        let sink = FileSink::new(dir);

        let err = sink.append(&record(0.0)).unwrap_err();
        assert!(matches!(err, SinkError::Io { .. }));
    }
}
