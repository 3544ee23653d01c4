use std::path::{Path, PathBuf};

use crate::error::ScanError;

/// Extension of the audio files included in the feed, matched case-insensitively
pub const AUDIO_EXTENSION: &str = "mp3";

/// MIME type of the audio files included in the feed
pub const AUDIO_MIME_TYPE: &str = "audio/mpeg";

/// Check whether a path names a recognized audio file
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(AUDIO_EXTENSION))
}

/// List the audio files directly inside the input directory
///
/// Entries are sorted by file name (byte order) before filtering, so the
/// result order is stable across runs. Subdirectories are not descended into.
pub fn scan_input_dir(input_dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    match std::fs::metadata(input_dir) {
        Ok(meta) if !meta.is_dir() => {
            return Err(ScanError::NotADirectory(input_dir.to_path_buf()));
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ScanError::DirectoryNotFound(input_dir.to_path_buf()));
        }
        Err(e) => {
            return Err(ScanError::ReadDirectoryFailed {
                path: input_dir.to_path_buf(),
                source: e,
            });
        }
        Ok(_) => {}
    }

    let entries = std::fs::read_dir(input_dir).map_err(|e| ScanError::ReadDirectoryFailed {
        path: input_dir.to_path_buf(),
        source: e,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ScanError::ReadDirectoryFailed {
            path: input_dir.to_path_buf(),
            source: e,
        })?;
        names.push(entry.file_name());
    }
    names.sort();

    let files: Vec<PathBuf> = names
        .into_iter()
        .map(|name| input_dir.join(name))
        .filter(|path| is_audio_file(path))
        .collect();

    tracing::debug!(
        dir = %input_dir.display(),
        count = files.len(),
        "Scanned input directory"
    );

    Ok(files)
}
