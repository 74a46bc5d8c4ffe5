//! Version discovery from the project manifest (`go.mod`).

use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{MergeError, Result};

/// Prefix of the manifest line that carries the module path.
pub const MODULE_PREFIX: &str = "module";

/// Short project name written to `info.version` of the merged document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VersionToken(String);

impl VersionToken {
    /// Borrow the token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VersionToken {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Derive the version token from manifest text.
///
/// The first line starting with [`MODULE_PREFIX`] decides: its last
/// `/`-separated segment, trimmed, is the token. Later `module` lines are not
/// consulted, so a first match that trims to nothing yields `None`.
#[must_use]
pub fn extract_version(manifest: &str) -> Option<VersionToken> {
    let line = manifest
        .lines()
        .find(|line| line.starts_with(MODULE_PREFIX))?;
    line.rsplit('/')
        .next()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| VersionToken(token.to_string()))
}

/// Read the manifest at `path` and derive its version token.
///
/// # Errors
///
/// Returns [`MergeError::ManifestRead`] if the file cannot be read and
/// [`MergeError::VersionNotFound`] if no usable `module` line exists.
pub fn read_version(path: &Path) -> Result<VersionToken> {
    let raw = fs::read_to_string(path).map_err(|source| MergeError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    extract_version(&raw).ok_or_else(|| MergeError::VersionNotFound {
        path: path.to_path_buf(),
    })
}
