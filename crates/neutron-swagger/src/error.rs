//! Error types for swagger merge operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for merge operations.
pub type Result<T> = std::result::Result<T, MergeError>;

/// Errors raised while building the merged document.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The manifest has no usable `module` line.
    #[error("could not find version in {}", .path.display())]
    VersionNotFound {
        /// Manifest path.
        path: PathBuf,
    },
    /// Failed to read the manifest.
    #[error("failed to read manifest {}", .path.display())]
    ManifestRead {
        /// Manifest path.
        path: PathBuf,
        /// IO error.
        source: io::Error,
    },
    /// The fragment directory does not exist.
    #[error("fragment directory {} missing", .path.display())]
    InputDirMissing {
        /// Fragment directory path.
        path: PathBuf,
    },
    /// Listing the fragment directory failed.
    #[error("failed to list fragment directory {}", .path.display())]
    InputDirRead {
        /// Fragment directory path.
        path: PathBuf,
        /// Directory walk error.
        source: walkdir::Error,
    },
    /// Failed to read a fragment file.
    #[error("failed to read fragment {}", .path.display())]
    FragmentRead {
        /// Fragment path.
        path: PathBuf,
        /// IO error.
        source: io::Error,
    },
    /// A fragment was not valid JSON.
    #[error("fragment {} is not valid json", .path.display())]
    FragmentParse {
        /// Fragment path.
        path: PathBuf,
        /// JSON parse error.
        source: serde_json::Error,
    },
    /// A fragment parsed but a section was not a JSON object.
    #[error("fragment {} has a non-object `{}`", .path.display(), .section)]
    FragmentShape {
        /// Fragment path.
        path: PathBuf,
        /// Offending section (`root`, `paths` or `definitions`).
        section: &'static str,
    },
    /// Failed to serialise the merged document.
    #[error("failed to serialise merged document")]
    Serialize {
        /// JSON error.
        source: serde_json::Error,
    },
    /// Failed to create the output directory.
    #[error("failed to create output directory {}", .path.display())]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// IO error.
        source: io::Error,
    },
    /// Failed to write the merged document.
    #[error("failed to write merged document {}", .path.display())]
    WriteOutput {
        /// Output path.
        path: PathBuf,
        /// IO error.
        source: io::Error,
    },
}

/// Coarse classification used to pick a process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The manifest did not yield a version token.
    Configuration,
    /// A file or directory could not be read or written.
    Filesystem,
    /// A fragment could not be interpreted.
    MalformedInput,
}

impl ErrorKind {
    /// Process exit code reported for this class of failure.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Configuration => 1,
            Self::Filesystem => 2,
            Self::MalformedInput => 3,
        }
    }
}

impl MergeError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::VersionNotFound { .. } => ErrorKind::Configuration,
            Self::ManifestRead { .. }
            | Self::InputDirMissing { .. }
            | Self::InputDirRead { .. }
            | Self::FragmentRead { .. }
            | Self::CreateDir { .. }
            | Self::WriteOutput { .. } => ErrorKind::Filesystem,
            Self::FragmentParse { .. } | Self::FragmentShape { .. } | Self::Serialize { .. } => {
                ErrorKind::MalformedInput
            }
        }
    }
}
