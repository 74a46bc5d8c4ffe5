//! Fragment discovery and loading.
//!
//! # Design
//! - Only direct children of the fragment directory are considered.
//! - Discovery order is the byte-wise file name order; collisions are resolved by it.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use walkdir::WalkDir;

use crate::error::{MergeError, Result};

const FRAGMENT_EXTENSION: &str = ".json";

/// `paths` and `definitions` sections lifted out of one fragment file.
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    /// Source file of the fragment.
    pub source: PathBuf,
    /// Path template → path item.
    pub paths: Map<String, Value>,
    /// Schema name → schema object.
    pub definitions: Map<String, Value>,
}

/// List the fragment files in `dir`, sorted by file name.
///
/// # Errors
///
/// Returns [`MergeError::InputDirMissing`] when `dir` is not a directory and
/// [`MergeError::InputDirRead`] when listing it fails.
pub fn discover_fragments(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(MergeError::InputDirMissing {
            path: dir.to_path_buf(),
        });
    }

    let mut fragments = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| MergeError::InputDirRead {
            path: dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !entry
            .file_name()
            .to_string_lossy()
            .ends_with(FRAGMENT_EXTENSION)
        {
            continue;
        }
        fragments.push(entry.into_path());
    }

    Ok(fragments)
}

/// Read and parse the fragment at `path`.
///
/// # Errors
///
/// Returns [`MergeError::FragmentRead`] if the file cannot be read, and the
/// errors of [`parse_fragment`] otherwise.
pub fn load_fragment(path: &Path) -> Result<Fragment> {
    let raw = fs::read(path).map_err(|source| MergeError::FragmentRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_fragment(path, &raw)
}

/// Parse raw fragment bytes. `path` is only used for diagnostics.
///
/// Missing `paths` or `definitions` sections are treated as empty.
///
/// # Errors
///
/// Returns [`MergeError::FragmentParse`] for invalid JSON (including bytes
/// that are not UTF-8) and [`MergeError::FragmentShape`] when the root or a
/// section is not an object.
pub fn parse_fragment(path: &Path, raw: &[u8]) -> Result<Fragment> {
    let value: Value = serde_json::from_slice(raw).map_err(|source| MergeError::FragmentParse {
        path: path.to_path_buf(),
        source,
    })?;
    let Value::Object(mut root) = value else {
        return Err(MergeError::FragmentShape {
            path: path.to_path_buf(),
            section: "root",
        });
    };

    Ok(Fragment {
        paths: take_section(&mut root, "paths", path)?,
        definitions: take_section(&mut root, "definitions", path)?,
        source: path.to_path_buf(),
    })
}

fn take_section(
    root: &mut Map<String, Value>,
    section: &'static str,
    path: &Path,
) -> Result<Map<String, Value>> {
    match root.remove(section) {
        None => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(MergeError::FragmentShape {
            path: path.to_path_buf(),
            section,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::error::Error;

    type TestResult = std::result::Result<(), Box<dyn Error>>;

    fn file_names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn discover_fragments_sorts_and_filters() -> TestResult {
        let dir = tempfile::tempdir()?;
        for name in ["b.json", "a.json", "C.json", "notes.txt", "a.json.bak"] {
            fs::write(dir.path().join(name), "{}")?;
        }
        fs::create_dir(dir.path().join("nested.json"))?;
        fs::write(dir.path().join("nested.json").join("inner.json"), "{}")?;

        let found = discover_fragments(dir.path())?;
        assert_eq!(file_names(&found), vec!["C.json", "a.json", "b.json"]);
        Ok(())
    }

    #[test]
    fn discover_fragments_accepts_empty_directory() -> TestResult {
        let dir = tempfile::tempdir()?;
        assert!(discover_fragments(dir.path())?.is_empty());
        Ok(())
    }

    #[test]
    fn discover_fragments_reports_missing_directory() -> TestResult {
        let dir = tempfile::tempdir()?;
        let Err(err) = discover_fragments(&dir.path().join("_all")) else {
            return Err(std::io::Error::other("expected missing dir error").into());
        };
        assert!(matches!(err, MergeError::InputDirMissing { .. }));
        Ok(())
    }

    #[test]
    fn parse_fragment_extracts_sections() -> TestResult {
        let raw = json!({
            "swagger": "2.0",
            "paths": {"/neutron/cron/params": {"get": {"operationId": "Params"}}},
            "definitions": {"Params": {"type": "object"}}
        })
        .to_string();

        let fragment = parse_fragment(Path::new("cron.json"), raw.as_bytes())?;
        assert_eq!(fragment.source, PathBuf::from("cron.json"));
        assert_eq!(fragment.paths.len(), 1);
        assert_eq!(fragment.definitions["Params"], json!({"type": "object"}));
        Ok(())
    }

    #[test]
    fn parse_fragment_defaults_missing_sections() -> TestResult {
        let fragment = parse_fragment(Path::new("empty.json"), br#"{"swagger": "2.0"}"#)?;
        assert!(fragment.paths.is_empty());
        assert!(fragment.definitions.is_empty());
        Ok(())
    }

    #[test]
    fn parse_fragment_rejects_invalid_json() -> TestResult {
        let Err(err) = parse_fragment(Path::new("broken.json"), b"{\"paths\": ") else {
            return Err(std::io::Error::other("expected parse failure").into());
        };
        assert!(matches!(err, MergeError::FragmentParse { .. }));
        Ok(())
    }

    #[test]
    fn parse_fragment_rejects_non_object_sections() -> TestResult {
        let Err(err) = parse_fragment(Path::new("list.json"), b"[]") else {
            return Err(std::io::Error::other("expected root shape failure").into());
        };
        assert!(matches!(
            err,
            MergeError::FragmentShape {
                section: "root",
                ..
            }
        ));

        let Err(err) = parse_fragment(Path::new("defs.json"), br#"{"definitions": []}"#) else {
            return Err(std::io::Error::other("expected section shape failure").into());
        };
        assert!(matches!(
            err,
            MergeError::FragmentShape {
                section: "definitions",
                ..
            }
        ));
        Ok(())
    }

    #[test]
    fn load_fragment_rejects_non_utf8_bytes_as_malformed() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("latin1.json");
        fs::write(&path, [b'{', 0xff, b'}'])?;

        let Err(err) = load_fragment(&path) else {
            return Err(std::io::Error::other("expected parse failure").into());
        };
        assert!(matches!(err, MergeError::FragmentParse { .. }));
        assert_eq!(err.kind(), crate::error::ErrorKind::MalformedInput);
        Ok(())
    }

    #[test]
    fn load_fragment_reports_unreadable_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let Err(err) = load_fragment(&dir.path().join("missing.json")) else {
            return Err(std::io::Error::other("expected read failure").into());
        };
        assert!(matches!(err, MergeError::FragmentRead { .. }));
        Ok(())
    }
}
