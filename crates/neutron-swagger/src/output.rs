//! Persistence of the merged document.
//!
//! # Design
//! - Creates the output directory when needed.
//! - Writes to a sibling staging file and renames it into place, so a failed
//!   write never leaves a truncated document behind.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MergeError, Result};

const STAGING_SUFFIX: &str = ".tmp";

/// Write `rendered` to `path`, replacing any previous file.
///
/// # Errors
///
/// Returns [`MergeError::CreateDir`] if the parent directory cannot be created
/// and [`MergeError::WriteOutput`] if the staging write or the final rename fails.
pub fn persist(path: &Path, rendered: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| MergeError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let staging = staging_path(path);
    fs::write(&staging, rendered.as_bytes()).map_err(|source| MergeError::WriteOutput {
        path: staging.clone(),
        source,
    })?;
    fs::rename(&staging, path).map_err(|source| {
        let _ = fs::remove_file(&staging);
        MergeError::WriteOutput {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsStr::to_os_string)
        .unwrap_or_default();
    name.push(STAGING_SUFFIX);
    path.with_file_name(name)
}
