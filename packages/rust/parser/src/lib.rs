//! Block parser: turns loosely formatted Q&A notes into question/answer pairs.
//!
//! # Format
//! ```text
//! Is this correct?
//! Yes it is.
//! -----
//! سوال: ownership چیست؟
//! هر مقدار یک مالک دارد.
//! و با خروج مالک از scope آزاد می‌شود.
//! ```
//!
//! A line opens a block when it ends with `?`, contains `؟`, or starts with
//! `سوال`. Following lines form the answer until the next question or end of
//! input. Lines of three or more `-`/`=` are dropped and never split a block.
//! Blank lines are ignored.

mod block;
mod classify;
mod cleanup;

use tracing::{debug, instrument};

use qaextract_shared::ParseOutcome;

use block::Accumulator;

/// Parse raw text into pairs plus a count of blocks that had no usable answer.
///
/// Never fails: any input, including the empty string, yields an outcome.
#[instrument(skip_all, fields(bytes = text.len()))]
pub fn parse(text: &str) -> ParseOutcome {
    let text = cleanup::normalize_line_endings(cleanup::strip_bom(text));

    let outcome = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(classify::classify)
        .fold(Accumulator::default(), Accumulator::feed)
        .finish();

    debug!(
        pairs = outcome.pairs.len(),
        invalid_blocks = outcome.invalid_blocks,
        "parse complete"
    );

    outcome
}
