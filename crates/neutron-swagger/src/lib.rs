#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Swagger fragment merger: folds the per-module Swagger 2.0 documents produced
//! by the protobuf generator into the single API document served by the docs site.
//!
//! # Design
//! - Pure library surface (`run`) used by the thin `swagger-merger` binary.
//! - Single pass, no IO outside the configured manifest, fragment directory and output.
//! - Fragments are absorbed in file name order; later fragments win on key collisions.
//!
//! Layout: `manifest.rs` (version token), `fragment.rs` (discovery/parsing),
//! `document.rs` (scaffold, merge, rendering), `operation_id.rs` (post-processing),
//! `output.rs` (persistence), `config.rs` (layout), `cli.rs` (argument parsing).

use std::path::PathBuf;

use tracing::{debug, info};

pub mod config;
pub mod document;
pub mod error;
pub mod fragment;
pub mod manifest;
pub mod operation_id;
pub mod output;

pub(crate) mod cli;

pub use cli::run_cli;
pub use config::MergeConfig;
pub use document::{MergedDocument, Scaffold, merge_fragments};
pub use error::{ErrorKind, MergeError, Result};
pub use fragment::{Fragment, discover_fragments, load_fragment};
pub use manifest::{VersionToken, extract_version, read_version};
pub use operation_id::{OperationIdPass, OperationIdPolicy, apply_operation_ids};
pub use output::persist;

/// Summary of a completed merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Version token written to `info.version`.
    pub version: VersionToken,
    /// Number of fragment files merged.
    pub fragments: usize,
    /// Number of distinct paths in the output.
    pub paths: usize,
    /// Number of distinct definitions in the output.
    pub definitions: usize,
    /// Keys replaced by a later fragment.
    pub overwritten: usize,
    /// Number of operations carrying an `operationId`.
    pub operations: usize,
    /// Operation ids used by more than one operation.
    pub duplicate_operation_ids: Vec<String>,
    /// Location of the merged document.
    pub output: PathBuf,
}

/// Merge every fragment described by `config` and write the consolidated document.
///
/// Nothing is written unless the manifest and every fragment were read successfully.
///
/// # Errors
///
/// Returns an error if the version token cannot be derived, a fragment cannot
/// be read or parsed, or the output cannot be written.
pub fn run(config: &MergeConfig) -> Result<MergeReport> {
    let version = read_version(&config.manifest)?;
    debug!(manifest = %config.manifest.display(), version = %version, "resolved version");

    let sources = discover_fragments(&config.input_dir)?;
    let mut fragments = Vec::with_capacity(sources.len());
    for source in &sources {
        let fragment = load_fragment(source)?;
        debug!(
            fragment = %source.display(),
            paths = fragment.paths.len(),
            definitions = fragment.definitions.len(),
            "loaded fragment"
        );
        fragments.push(fragment);
    }

    let (mut document, overwritten) = merge_fragments(&config.scaffold, &version, fragments);

    let pass = apply_operation_ids(document.paths_mut(), config.operation_ids);
    let rendered = document.render()?;
    persist(&config.output, &rendered)?;

    let report = MergeReport {
        version,
        fragments: sources.len(),
        paths: document.paths().len(),
        definitions: document.definitions().len(),
        overwritten,
        operations: pass.operations,
        duplicate_operation_ids: pass.duplicates,
        output: config.output.clone(),
    };
    info!(
        version = %report.version,
        fragments = report.fragments,
        paths = report.paths,
        definitions = report.definitions,
        overwritten = report.overwritten,
        operations = report.operations,
        duplicate_operation_ids = report.duplicate_operation_ids.len(),
        output = %report.output.display(),
        "merged swagger document"
    );
    Ok(report)
}
