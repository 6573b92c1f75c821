//! End-to-end `convert` pipeline: path → input files → parse → aggregate → JSONL.

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use qaextract_shared::{ConvertConfig, ParseOutcome, QaExtractError, Result};

use crate::batch::{self, BatchReport};
use crate::inputs::{self, InputMode};
use crate::output::{self, OutputMeta};

/// Result of the `convert` pipeline.
#[derive(Debug)]
pub struct ConvertResult {
    /// Whether a single file or a directory was processed.
    pub mode: InputMode,
    /// Per-file outcomes and the aggregated pairs that were written.
    pub report: BatchReport,
    /// The written dataset file.
    pub output: OutputMeta,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before a file is read.
    fn file_started(&self, path: &Path, current: usize, total: usize);
    /// Called when a file was read and parsed.
    fn file_parsed(&self, path: &Path, outcome: &ParseOutcome);
    /// Called when a file is skipped because of an error.
    fn file_failed(&self, path: &Path, error: &QaExtractError);
    /// Called when the pipeline completes.
    fn done(&self, result: &ConvertResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn file_started(&self, _path: &Path, _current: usize, _total: usize) {}
    fn file_parsed(&self, _path: &Path, _outcome: &ParseOutcome) {}
    fn file_failed(&self, _path: &Path, _error: &QaExtractError) {}
    fn done(&self, _result: &ConvertResult) {}
}

/// Run the full `convert` pipeline.
///
/// 1. Resolve the input path into files
/// 2. Read and parse each file, skipping failures
/// 3. Fail if no pair was found anywhere
/// 4. Write all pairs to `<output_dir>/<output_file_name>`
#[instrument(skip_all, fields(input = %config.input.display()))]
pub fn convert(config: &ConvertConfig, progress: &dyn ProgressReporter) -> Result<ConvertResult> {
    let start = Instant::now();

    progress.phase("Collecting input files");
    let inputs = inputs::collect_inputs(
        &config.input,
        &config.extensions,
        &config.output_file_name,
    )?;

    info!(
        mode = inputs.mode.as_str(),
        files = inputs.files.len(),
        "starting convert pipeline"
    );

    progress.phase("Parsing");
    let report = batch::run_batch(&inputs.files, progress);

    if report.total_pairs() == 0 {
        return Err(QaExtractError::NoContent {
            files: inputs.files.len(),
        });
    }

    progress.phase("Writing records");
    let target = inputs.output_dir.join(&config.output_file_name);
    let output = output::write_jsonl(&target, &report.pairs, &config.system_prompt)?;

    let result = ConvertResult {
        mode: inputs.mode,
        report,
        output,
        elapsed: start.elapsed(),
    };

    info!(
        records = result.output.records,
        invalid_blocks = result.report.invalid_blocks(),
        skipped = result.report.failed().count(),
        "convert pipeline complete"
    );

    progress.done(&result);
    Ok(result)
}
