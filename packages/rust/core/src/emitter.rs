//! Record emitter: one JSON chat record per pair, one record per line.

use std::io::Write;

use tracing::{debug, instrument};

use qaextract_shared::{ChatRecord, QaExtractError, QaPair, Result};

/// Write every pair to `sink` as a JSONL record, in order.
///
/// Each record is serialized in full and handed to the sink as one whole
/// line. On a write error the returned [`QaExtractError::Emit`] counts only
/// the records that were completely written; the sink may still hold part of
/// the failing line. Nothing is rolled back here.
#[instrument(skip_all, fields(pairs = pairs.len()))]
pub fn emit<W: Write>(pairs: &[QaPair], system_prompt: &str, sink: &mut W) -> Result<usize> {
    for (written, pair) in pairs.iter().enumerate() {
        let record = ChatRecord::from_pair(pair, system_prompt);
        let mut line = serde_json::to_vec(&record)
            .map_err(|e| QaExtractError::Serialize(e.to_string()))?;
        line.push(b'\n');

        sink.write_all(&line)
            .map_err(|source| QaExtractError::Emit { written, source })?;
    }

    debug!(records = pairs.len(), "records emitted");
    Ok(pairs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qaextract_shared::{DEFAULT_SYSTEM_PROMPT, Role};
    use std::io;

    /// Sink that accepts a fixed number of writes, then fails.
    struct FailAfter {
        writes_left: usize,
        buf: Vec<u8>,
    }

    impl Write for FailAfter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            if self.writes_left == 0 {
                return Err(io::Error::other("sink closed"));
            }
            self.writes_left -= 1;
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn pairs() -> Vec<QaPair> {
        vec![
            QaPair::new("Is this correct?", "Yes it is.").unwrap(),
            QaPair::new("What about this?", "Also yes.").unwrap(),
            QaPair::new("And this?", "Line one\nLine two").unwrap(),
        ]
    }

    #[test]
    fn emit_writes_one_line_per_pair() {
        let mut sink = Vec::new();
        let count = emit(&pairs(), "sys", &mut sink).unwrap();
        assert_eq!(count, 3);

        let text = String::from_utf8(sink).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn emit_escapes_embedded_newlines() {
        let mut sink = Vec::new();
        emit(&pairs()[2..], "sys", &mut sink).unwrap();
        let text = String::from_utf8(sink).unwrap();
        assert_eq!(text.matches('\n').count(), 1);
        assert!(text.contains(r#""content":"Line one\nLine two""#));
    }

    #[test]
    fn emit_preserves_order_and_roles() {
        let mut sink = Vec::new();
        emit(&pairs(), "sys", &mut sink).unwrap();
        let text = String::from_utf8(sink).unwrap();

        let records: Vec<ChatRecord> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(records[0].messages[1].content, "Is this correct?");
        assert_eq!(records[1].messages[1].content, "What about this?");
        for record in &records {
            let roles: Vec<Role> = record.messages.iter().map(|m| m.role).collect();
            assert_eq!(roles, [Role::System, Role::User, Role::Assistant]);
            assert_eq!(record.messages[0].content, "sys");
        }
    }

    #[test]
    fn non_ascii_round_trips_unescaped() {
        let pair = QaPair::new("سوال: چرا Rust؟", "چون امن است.\nو سریع").unwrap();
        let mut sink = Vec::new();
        emit(std::slice::from_ref(&pair), DEFAULT_SYSTEM_PROMPT, &mut sink).unwrap();

        let text = String::from_utf8(sink).unwrap();
        assert!(text.contains("سوال: چرا Rust؟"));
        assert!(text.contains(DEFAULT_SYSTEM_PROMPT));
        assert!(!text.contains("\\u"));

        let record: ChatRecord = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(QaPair::try_from(record).unwrap(), pair);
    }

    #[test]
    fn emit_empty_writes_nothing() {
        let mut sink = Vec::new();
        assert_eq!(emit(&[], "sys", &mut sink).unwrap(), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn write_failure_reports_records_already_written() {
        let mut sink = FailAfter {
            writes_left: 2,
            buf: Vec::new(),
        };
        let err = emit(&pairs(), "sys", &mut sink).unwrap_err();
        assert!(matches!(err, QaExtractError::Emit { written: 2, .. }));

        // Records written before the failure stay intact.
        let text = String::from_utf8(sink.buf).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with('\n'));
    }

    /// Sink that accepts at most `capacity` bytes, taking short writes.
    struct ByteLimit {
        capacity: usize,
        buf: Vec<u8>,
    }

    impl Write for ByteLimit {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            let room = self.capacity - self.buf.len();
            if room == 0 {
                return Err(io::Error::other("disk full"));
            }
            let n = room.min(data.len());
            self.buf.extend_from_slice(&data[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failure_mid_line_counts_only_complete_records() {
        let mut full = Vec::new();
        emit(&pairs()[..1], "sys", &mut full).unwrap();

        let mut sink = ByteLimit {
            capacity: full.len() + 10,
            buf: Vec::new(),
        };
        let err = emit(&pairs(), "sys", &mut sink).unwrap_err();
        assert!(matches!(err, QaExtractError::Emit { written: 1, .. }));

        // First record whole, then a fragment of the second.
        assert_eq!(&sink.buf[..full.len()], &full[..]);
        assert_eq!(sink.buf.len(), full.len() + 10);
        assert!(!sink.buf.ends_with(b"\n"));
    }
}
