//! Temporary project trees laid out the way the swagger merger expects them.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tempfile::TempDir;

/// A throwaway project root holding a `go.mod` manifest and a
/// `tmp-swagger-gen/_all` fragment directory.
///
/// The directory is removed when the fixture is dropped.
pub struct ProjectFixture {
    root: TempDir,
}

impl ProjectFixture {
    /// Create an empty project root with the fragment directory in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> Result<Self> {
        let root = tempfile::Builder::new()
            .prefix("neutron-swagger-")
            .tempdir()
            .context("failed to create fixture root")?;
        let fixture = Self { root };
        fs::create_dir_all(fixture.input_dir()).context("failed to create fragment directory")?;
        Ok(fixture)
    }

    /// Create a project root whose manifest declares `module <module_path>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture or its manifest cannot be written.
    pub fn with_module(module_path: &str) -> Result<Self> {
        let fixture = Self::new()?;
        fixture.write_manifest(&format!("module {module_path}\n\ngo 1.22\n"))?;
        Ok(fixture)
    }

    /// Project root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Location of the `go.mod` manifest.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.root().join("go.mod")
    }

    /// Directory holding the fragment files.
    #[must_use]
    pub fn input_dir(&self) -> PathBuf {
        self.root().join("tmp-swagger-gen").join("_all")
    }

    /// Location of the merged document.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.root().join("tmp-swagger-gen").join("FINAL.json")
    }

    /// Overwrite the manifest with raw contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be written.
    pub fn write_manifest(&self, contents: &str) -> Result<()> {
        fs::write(self.manifest_path(), contents).context("failed to write manifest")
    }

    /// Write a fragment document into the fragment directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialised or written.
    pub fn write_fragment(&self, name: &str, document: &Value) -> Result<PathBuf> {
        let raw = serde_json::to_string_pretty(document).context("failed to encode fragment")?;
        self.write_raw_fragment(name, &raw)
    }

    /// Write arbitrary bytes into the fragment directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_raw_fragment(&self, name: &str, contents: impl AsRef<[u8]>) -> Result<PathBuf> {
        let path = self.input_dir().join(name);
        fs::write(&path, contents)
            .with_context(|| format!("failed to write fragment {}", path.display()))?;
        Ok(path)
    }

    /// Read the merged document back as raw text.
    ///
    /// # Errors
    ///
    /// Returns an error if the output file is missing or unreadable.
    pub fn read_output_raw(&self) -> Result<String> {
        let path = self.output_path();
        fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))
    }

    /// Read and parse the merged document.
    ///
    /// # Errors
    ///
    /// Returns an error if the output file is missing or is not valid JSON.
    pub fn read_output(&self) -> Result<Value> {
        let raw = self.read_output_raw()?;
        serde_json::from_str(&raw).context("merged document is not valid json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fixture_lays_out_project_tree() -> Result<()> {
        let fixture = ProjectFixture::with_module("github.com/neutron-org/neutron/v9")?;
        assert!(fixture.input_dir().is_dir());
        let manifest = fs::read_to_string(fixture.manifest_path())?;
        assert!(manifest.starts_with("module github.com/neutron-org/neutron/v9"));
        assert!(!fixture.output_path().exists());
        Ok(())
    }

    #[test]
    fn write_fragment_lands_in_input_dir() -> Result<()> {
        let fixture = ProjectFixture::new()?;
        let path = fixture.write_fragment("cron.json", &json!({"paths": {}}))?;
        assert_eq!(path.parent(), Some(fixture.input_dir().as_path()));
        let stored: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
        assert_eq!(stored, json!({"paths": {}}));
        Ok(())
    }

    #[test]
    fn fixture_root_is_removed_on_drop() -> Result<()> {
        let fixture = ProjectFixture::new()?;
        let root = fixture.root().to_path_buf();
        drop(fixture);
        assert!(!root.exists());
        Ok(())
    }
}
