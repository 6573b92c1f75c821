//! Block accumulator: a two-state machine folded over classified lines.

use tracing::trace;

use qaextract_shared::{ParseOutcome, QaPair};

use crate::classify::Line;
use crate::cleanup::clean_answer;

#[derive(Debug, Default)]
enum State {
    /// No question seen since the last flush; text lines are dropped.
    #[default]
    AwaitingQuestion,
    /// A question is open and answer lines are being collected.
    AccumulatingAnswer {
        question: String,
        answer: Vec<String>,
    },
}

/// Parser state plus everything emitted so far.
///
/// An answer buffer only exists inside `AccumulatingAnswer`, so orphaned
/// answer lines without a question cannot be represented.
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    state: State,
    outcome: ParseOutcome,
}

impl Accumulator {
    /// Advance by one line. Shaped for `Iterator::fold`.
    pub(crate) fn feed(self, line: Line<'_>) -> Self {
        match line {
            Line::Question(text) => self.on_question(text),
            Line::Separator => self,
            Line::Text(text) => self.on_text(text),
        }
    }

    /// Flush the open block and hand back the outcome.
    pub(crate) fn finish(mut self) -> ParseOutcome {
        self.flush();
        self.outcome
    }

    fn on_question(mut self, text: &str) -> Self {
        self.flush();
        self.state = State::AccumulatingAnswer {
            question: text.to_string(),
            answer: Vec::new(),
        };
        self
    }

    fn on_text(mut self, text: &str) -> Self {
        match &mut self.state {
            State::AwaitingQuestion => trace!(line = text, "dropping text before first question"),
            State::AccumulatingAnswer { answer, .. } => answer.push(text.to_string()),
        }
        self
    }

    fn flush(&mut self) {
        let State::AccumulatingAnswer { question, answer } = std::mem::take(&mut self.state)
        else {
            return;
        };

        if answer.is_empty() {
            trace!(%question, "question without answer");
            self.outcome.invalid_blocks += 1;
            return;
        }

        match QaPair::new(&question, clean_answer(&answer)) {
            Ok(pair) => self.outcome.pairs.push(pair),
            Err(e) => {
                trace!(%question, error = %e, "block dropped after cleanup");
                self.outcome.invalid_blocks += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(lines: &[Line<'_>]) -> ParseOutcome {
        lines
            .iter()
            .copied()
            .fold(Accumulator::default(), Accumulator::feed)
            .finish()
    }

    #[test]
    fn empty_sequence_yields_nothing() {
        assert_eq!(run(&[]), ParseOutcome::default());
    }

    #[test]
    fn question_then_text_emits_pair() {
        let outcome = run(&[Line::Question("Q?"), Line::Text("A")]);
        assert_eq!(outcome.pairs, vec![QaPair::new("Q?", "A").unwrap()]);
        assert_eq!(outcome.invalid_blocks, 0);
    }

    #[test]
    fn text_before_question_is_dropped() {
        let outcome = run(&[Line::Text("preamble"), Line::Question("Q?"), Line::Text("A")]);
        assert_eq!(outcome.pairs.len(), 1);
        assert_eq!(outcome.pairs[0].answer(), "A");
        assert_eq!(outcome.invalid_blocks, 0);
    }

    #[test]
    fn separator_does_not_close_block() {
        let outcome = run(&[
            Line::Question("Q?"),
            Line::Text("one"),
            Line::Separator,
            Line::Text("two"),
        ]);
        assert_eq!(outcome.pairs.len(), 1);
        assert_eq!(outcome.pairs[0].answer(), "one\ntwo");
    }

    #[test]
    fn standalone_separator_is_ignored() {
        let outcome = run(&[Line::Separator, Line::Separator]);
        assert_eq!(outcome, ParseOutcome::default());
    }

    #[test]
    fn question_without_answer_counts_invalid() {
        let outcome = run(&[Line::Question("Q1?"), Line::Question("Q2?"), Line::Text("A2")]);
        assert_eq!(outcome.pairs.len(), 1);
        assert_eq!(outcome.pairs[0].question(), "Q2?");
        assert_eq!(outcome.invalid_blocks, 1);
    }
}
