//! Per-file read-and-parse with results collected into a batch report.
//!
//! One file failing (missing, undecodable, unreadable) never stops the
//! others; its error is recorded in its [`FileReport`].

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use qaextract_shared::{ParseOutcome, QaExtractError, QaPair, Result};

use crate::pipeline::ProgressReporter;

/// Per-file counts kept after the pairs move into the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSummary {
    pub pairs: usize,
    pub invalid_blocks: usize,
}

/// What happened to one input file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: Result<FileSummary>,
}

/// All file results plus the aggregated pairs in file order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    pub pairs: Vec<QaPair>,
}

impl BatchReport {
    /// Record one file's result, appending its pairs to the aggregate.
    pub fn push(&mut self, path: PathBuf, outcome: Result<ParseOutcome>) {
        let result = outcome.map(|outcome| {
            let summary = FileSummary {
                pairs: outcome.pairs.len(),
                invalid_blocks: outcome.invalid_blocks,
            };
            self.pairs.extend(outcome.pairs);
            summary
        });
        self.files.push(FileReport { path, result });
    }

    pub fn total_pairs(&self) -> usize {
        self.pairs.len()
    }

    pub fn invalid_blocks(&self) -> usize {
        self.summaries().map(|s| s.invalid_blocks).sum()
    }

    /// Files that were read and parsed, whatever they yielded.
    pub fn processed(&self) -> usize {
        self.summaries().count()
    }

    /// Files skipped because of an error.
    pub fn failed(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.result.is_err())
    }

    fn summaries(&self) -> impl Iterator<Item = &FileSummary> {
        self.files.iter().filter_map(|f| f.result.as_ref().ok())
    }
}

/// Read a file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => QaExtractError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => QaExtractError::io(path, e),
    })?;

    String::from_utf8(bytes).map_err(|e| QaExtractError::Decode {
        path: path.to_path_buf(),
        valid_up_to: e.utf8_error().valid_up_to(),
    })
}

/// Read and parse a single file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn process_file(path: &Path) -> Result<ParseOutcome> {
    let text = read_text(path)?;
    let outcome = qaextract_parser::parse(&text);
    debug!(
        pairs = outcome.pairs.len(),
        invalid_blocks = outcome.invalid_blocks,
        "file parsed"
    );
    Ok(outcome)
}

/// Process every file in order, collecting results.
#[instrument(skip_all, fields(files = files.len()))]
pub fn run_batch(files: &[PathBuf], progress: &dyn ProgressReporter) -> BatchReport {
    let mut report = BatchReport::default();

    for (idx, path) in files.iter().enumerate() {
        progress.file_started(path, idx + 1, files.len());

        let outcome = process_file(path);
        match &outcome {
            Ok(parsed) => progress.file_parsed(path, parsed),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "skipping file");
                progress.file_failed(path, e);
            }
        }

        report.push(path.clone(), outcome);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SilentProgress;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "qaextract-batch-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn read_text_rejects_invalid_utf8() {
        let tmp = temp_dir();
        let file = tmp.join("bad.txt");
        std::fs::write(&file, b"Q?\n\xff\xfeA\n").unwrap();

        let err = read_text(&file).unwrap_err();
        assert!(matches!(err, QaExtractError::Decode { valid_up_to: 3, .. }));

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn process_missing_file_is_input_not_found() {
        let tmp = temp_dir();
        let err = process_file(&tmp.join("gone.txt")).unwrap_err();
        assert!(matches!(err, QaExtractError::InputNotFound { .. }));
        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn batch_skips_undecodable_file() {
        let tmp = temp_dir();
        let a = tmp.join("a.txt");
        let b = tmp.join("b.txt");
        let c = tmp.join("c.txt");
        std::fs::write(&a, "First?\nOne.\n").unwrap();
        std::fs::write(&b, b"Broken?\n\xc3\x28\n").unwrap();
        std::fs::write(&c, "Second?\nTwo.\nThird?\nThree.\n").unwrap();

        let report = run_batch(&[a, b.clone(), c], &SilentProgress);

        assert_eq!(report.files.len(), 3);
        assert_eq!(report.processed(), 2);
        assert_eq!(report.total_pairs(), 3);
        let questions: Vec<&str> = report.pairs.iter().map(|p| p.question()).collect();
        assert_eq!(questions, vec!["First?", "Second?", "Third?"]);

        let failed: Vec<&FileReport> = report.failed().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].path, b);
        assert!(failed[0].result.as_ref().unwrap_err().is_decode());

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn batch_counts_invalid_blocks_across_files() {
        let mut report = BatchReport::default();
        report.push(
            "one.txt".into(),
            Ok(ParseOutcome {
                pairs: vec![QaPair::new("Q?", "A").unwrap()],
                invalid_blocks: 2,
            }),
        );
        report.push(
            "two.txt".into(),
            Ok(ParseOutcome {
                pairs: vec![],
                invalid_blocks: 1,
            }),
        );

        assert_eq!(report.invalid_blocks(), 3);
        assert_eq!(report.total_pairs(), 1);
        assert_eq!(report.processed(), 2);
        assert_eq!(report.failed().count(), 0);
    }
}
