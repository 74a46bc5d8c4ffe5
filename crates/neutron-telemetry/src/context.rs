//! Span helpers for a single tool invocation.

use tracing::span::EnteredSpan;

use crate::init::build_sha;

/// Guard that keeps the run-level span entered until it is dropped.
pub struct RunSpanGuard {
    _span: EnteredSpan,
}

impl RunSpanGuard {
    /// Enter a span tagged with the tool name, tool version and build SHA.
    #[must_use]
    pub fn new(tool: &str, version: &str) -> Self {
        let span = tracing::info_span!(
            "run",
            tool = %tool,
            version = %version,
            build_sha = %build_sha()
        );
        Self {
            _span: span.entered(),
        }
    }
}
