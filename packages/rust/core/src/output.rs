//! Output file writer.
//!
//! Records go to a hidden temp file beside the target and are renamed into
//! place only after every record is written and flushed. A failed run leaves
//! any previous output untouched.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use qaextract_shared::{QaExtractError, QaPair, Result};

use crate::emitter;

/// Metadata for a written dataset file.
#[derive(Debug, Clone)]
pub struct OutputMeta {
    pub path: PathBuf,
    pub records: usize,
    pub size_bytes: usize,
    pub sha256: String,
}

/// Emit `pairs` into `target` as JSONL, replacing it atomically.
#[instrument(skip_all, fields(target = %target.display(), pairs = pairs.len()))]
pub fn write_jsonl(target: &Path, pairs: &[QaPair], system_prompt: &str) -> Result<OutputMeta> {
    let file_name = target
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            QaExtractError::validation(format!("invalid output path '{}'", target.display()))
        })?;
    let temp = target.with_file_name(format!(".{file_name}.tmp"));

    let written = match write_temp(&temp, pairs, system_prompt) {
        Ok(written) => written,
        Err(e) => {
            discard(&temp);
            return Err(e);
        }
    };

    if let Err(e) = std::fs::rename(&temp, target) {
        discard(&temp);
        return Err(QaExtractError::io(target, e));
    }

    let meta = OutputMeta {
        path: target.to_path_buf(),
        records: written.records,
        size_bytes: written.size_bytes,
        sha256: written.sha256,
    };

    info!(
        records = meta.records,
        size_bytes = meta.size_bytes,
        sha256 = %meta.sha256,
        "dataset written"
    );

    Ok(meta)
}

struct Written {
    records: usize,
    size_bytes: usize,
    sha256: String,
}

fn write_temp(temp: &Path, pairs: &[QaPair], system_prompt: &str) -> Result<Written> {
    let file = File::create(temp).map_err(|e| QaExtractError::io(temp, e))?;
    let mut writer = HashingWriter::new(BufWriter::new(file));

    let records = emitter::emit(pairs, system_prompt, &mut writer)?;
    writer.flush().map_err(|e| QaExtractError::io(temp, e))?;

    let HashingWriter {
        inner,
        hasher,
        bytes,
    } = writer;
    let file = inner
        .into_inner()
        .map_err(|e| QaExtractError::io(temp, e.into_error()))?;
    file.sync_all().map_err(|e| QaExtractError::io(temp, e))?;

    debug!(path = %temp.display(), bytes, "temp file complete");

    Ok(Written {
        records,
        size_bytes: bytes,
        sha256: format!("{:x}", hasher.finalize()),
    })
}

fn discard(temp: &Path) {
    if let Err(e) = std::fs::remove_file(temp) {
        if e.kind() != io::ErrorKind::NotFound {
            debug!(path = %temp.display(), error = %e, "could not remove temp file");
        }
    }
}

/// Pass-through writer that hashes and counts accepted bytes.
struct HashingWriter<W> {
    inner: W,
    hasher: Sha256,
    bytes: usize,
}

impl<W: Write> HashingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
            bytes: 0,
        }
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.bytes += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
