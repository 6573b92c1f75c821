//! Input discovery: resolve a file or directory argument into text files.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use qaextract_shared::{QaExtractError, Result};

/// How the input argument was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    SingleFile,
    Directory,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleFile => "file",
            Self::Directory => "directory",
        }
    }
}

/// Files to process plus the folder the dataset is written to.
#[derive(Debug, Clone)]
pub struct InputSet {
    pub mode: InputMode,
    /// Sorted by file name in directory mode.
    pub files: Vec<PathBuf>,
    pub output_dir: PathBuf,
}

/// Resolve `path` into the set of files to parse.
///
/// A file is taken as-is regardless of extension. A directory contributes
/// its direct children whose extension is in `extensions`
/// (case-insensitive), minus any file named `output_file_name`.
#[instrument(skip(extensions))]
pub fn collect_inputs(
    path: &Path,
    extensions: &[String],
    output_file_name: &str,
) -> Result<InputSet> {
    if !path.exists() {
        return Err(QaExtractError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    if path.is_file() {
        let output_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        return Ok(InputSet {
            mode: InputMode::SingleFile,
            files: vec![path.to_path_buf()],
            output_dir,
        });
    }

    let entries = std::fs::read_dir(path).map_err(|e| QaExtractError::io(path, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %path.display(), error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        let file_path = entry.path();

        if !file_path.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy() == output_file_name {
            debug!(path = %file_path.display(), "skipping previous output file");
            continue;
        }
        if has_extension(&file_path, extensions) {
            files.push(file_path);
        }
    }

    if files.is_empty() {
        return Err(QaExtractError::NoInputFiles {
            dir: path.to_path_buf(),
        });
    }

    files.sort();
    debug!(count = files.len(), "collected input files");

    Ok(InputSet {
        mode: InputMode::Directory,
        files,
        output_dir: path.to_path_buf(),
    })
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.iter().any(|allowed| *allowed == ext))
}
