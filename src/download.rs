// Saving generated archives to disk. Bytes go through a named temporary file
// that is persisted into place by rename, so an interrupted save never leaves
// a half-written archive behind and the temporary file is removed on every
// other path.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::disposition::DEFAULT_ARCHIVE_NAME;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("download directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Writes a generated archive into the download directory.
pub struct ArchiveWriter {
    dir: PathBuf,
}

impl ArchiveWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Write `bytes` to `{dir}/{name}`, replacing an existing file of the
    /// same name, and return the final path. The name is reduced to its last
    /// path component first; a response header cannot steer the save outside
    /// the download directory.
    pub fn write(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError> {
        ensure_download_dir(&self.dir)?;

        let target = self.dir.join(safe_file_name(name));
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| DownloadError::Io(e.error))?;
        Ok(target)
    }
}

/// Ensure the download directory exists; create it if missing.
fn ensure_download_dir(dir: &Path) -> Result<(), DownloadError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| DownloadError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(DownloadError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| DownloadError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Last path component of a server-suggested name, or the default archive
/// name when nothing usable remains.
fn safe_file_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string())
}
