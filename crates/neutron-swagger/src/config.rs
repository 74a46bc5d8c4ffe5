//! Merge configuration and the default project layout.

use std::path::{Path, PathBuf};

use crate::document::Scaffold;
use crate::operation_id::OperationIdPolicy;

/// Manifest file name relative to the project root.
pub const DEFAULT_MANIFEST: &str = "go.mod";
/// Directory holding generated swagger output, relative to the project root.
pub const SWAGGER_GEN_DIR: &str = "tmp-swagger-gen";
/// Fragment directory name inside [`SWAGGER_GEN_DIR`].
pub const FRAGMENT_DIR: &str = "_all";
/// Merged document file name inside [`SWAGGER_GEN_DIR`].
pub const OUTPUT_FILE: &str = "FINAL.json";

/// Everything a merge run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    /// Manifest the version token is read from.
    pub manifest: PathBuf,
    /// Directory scanned for `*.json` fragments.
    pub input_dir: PathBuf,
    /// Destination of the merged document.
    pub output: PathBuf,
    /// Fixed document metadata.
    pub scaffold: Scaffold,
    /// Treatment of `operationId` fields.
    pub operation_ids: OperationIdPolicy,
}

impl MergeConfig {
    /// Default layout under `root`: `go.mod`, `tmp-swagger-gen/_all` and
    /// `tmp-swagger-gen/FINAL.json`.
    #[must_use]
    pub fn for_project_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let generated = root.join(SWAGGER_GEN_DIR);
        Self {
            manifest: root.join(DEFAULT_MANIFEST),
            input_dir: generated.join(FRAGMENT_DIR),
            output: generated.join(OUTPUT_FILE),
            scaffold: Scaffold::NEUTRON,
            operation_ids: OperationIdPolicy::default(),
        }
    }
}
