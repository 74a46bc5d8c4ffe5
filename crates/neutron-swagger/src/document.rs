//! The merged Swagger document and its fixed scaffold.
//!
//! # Design
//! - The scaffold is an immutable value; only `paths` and `definitions` grow.
//! - Absorbing a fragment replaces colliding keys wholesale; nested objects are never merged.
//! - Rendering sorts keys at every depth so output does not depend on map ordering features.
//! - Rendered text is pure ASCII; other characters are `\uXXXX`-escaped.

use std::borrow::Cow;
use std::io;

use serde::Serialize;
use serde::ser::Error as _;
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{MergeError, Result};
use crate::fragment::Fragment;
use crate::manifest::VersionToken;

/// Swagger specification version emitted in every document.
pub const SWAGGER_VERSION: &str = "2.0";
/// Title used when none is configured.
pub const DEFAULT_TITLE: &str = "Neutron";
/// Media type listed under `consumes` and `produces`.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Fixed metadata present in every merged document regardless of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffold {
    /// `swagger` field.
    pub swagger: &'static str,
    /// `info.title` field.
    pub title: Cow<'static, str>,
    /// `consumes` media types.
    pub consumes: &'static [&'static str],
    /// `produces` media types.
    pub produces: &'static [&'static str],
}

impl Scaffold {
    /// Scaffold of the Neutron API document.
    pub const NEUTRON: Self = Self {
        swagger: SWAGGER_VERSION,
        title: Cow::Borrowed(DEFAULT_TITLE),
        consumes: &[JSON_MEDIA_TYPE],
        produces: &[JSON_MEDIA_TYPE],
    };

    /// Same scaffold under a different `info.title`.
    #[must_use]
    pub fn with_title(title: impl Into<Cow<'static, str>>) -> Self {
        Self {
            title: title.into(),
            ..Self::NEUTRON
        }
    }
}

impl Default for Scaffold {
    fn default() -> Self {
        Self::NEUTRON
    }
}

/// `info` block of the merged document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Info {
    /// Document title.
    pub title: String,
    /// Version token taken from the manifest.
    pub version: VersionToken,
}

/// Accumulator for the consolidated document.
#[derive(Debug, Clone, Serialize)]
pub struct MergedDocument {
    swagger: String,
    info: Info,
    consumes: Vec<String>,
    produces: Vec<String>,
    paths: Map<String, Value>,
    definitions: Map<String, Value>,
}

impl MergedDocument {
    /// Start a document from the scaffold with empty `paths` and `definitions`.
    #[must_use]
    pub fn new(scaffold: &Scaffold, version: &VersionToken) -> Self {
        Self {
            swagger: scaffold.swagger.to_string(),
            info: Info {
                title: scaffold.title.clone().into_owned(),
                version: version.clone(),
            },
            consumes: scaffold.consumes.iter().map(ToString::to_string).collect(),
            produces: scaffold.produces.iter().map(ToString::to_string).collect(),
            paths: Map::new(),
            definitions: Map::new(),
        }
    }

    /// Copy the fragment's `paths` and `definitions` into the document.
    ///
    /// Existing keys are overwritten by the fragment's values. Returns how many
    /// keys were overwritten.
    pub fn absorb(&mut self, fragment: Fragment) -> usize {
        let Fragment {
            source,
            paths,
            definitions,
        } = fragment;
        let mut overwritten = 0;
        for (section, target, incoming) in [
            ("paths", &mut self.paths, paths),
            ("definitions", &mut self.definitions, definitions),
        ] {
            for (key, value) in incoming {
                if target.insert(key.clone(), value).is_some() {
                    debug!(
                        fragment = %source.display(),
                        section,
                        key = %key,
                        "fragment overrides earlier entry"
                    );
                    overwritten += 1;
                }
            }
        }
        overwritten
    }

    /// Merged `paths`.
    #[must_use]
    pub const fn paths(&self) -> &Map<String, Value> {
        &self.paths
    }

    /// Mutable access to merged `paths` for post-processing passes.
    pub const fn paths_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.paths
    }

    /// Merged `definitions`.
    #[must_use]
    pub const fn definitions(&self) -> &Map<String, Value> {
        &self.definitions
    }

    /// Convert into a JSON value with keys sorted at every level.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::Serialize`] if the document cannot be encoded.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self)
            .map(sort_keys)
            .map_err(|source| MergeError::Serialize { source })
    }

    /// Render as two-space indented JSON with sorted keys. Characters outside
    /// printable ASCII are written as `\uXXXX` escapes.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::Serialize`] if the document cannot be encoded.
    pub fn render(&self) -> Result<String> {
        let value = self.to_value()?;
        let mut out = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut out, AsciiFormatter::new());
        value
            .serialize(&mut serializer)
            .map_err(|source| MergeError::Serialize { source })?;
        String::from_utf8(out).map_err(|err| MergeError::Serialize {
            source: serde_json::Error::custom(err),
        })
    }
}

/// Build a document by absorbing `fragments` in iteration order.
///
/// Returns the document and the number of keys a later fragment overwrote.
#[must_use]
pub fn merge_fragments<I>(
    scaffold: &Scaffold,
    version: &VersionToken,
    fragments: I,
) -> (MergedDocument, usize)
where
    I: IntoIterator<Item = Fragment>,
{
    let mut document = MergedDocument::new(scaffold, version);
    let mut overwritten = 0;
    for fragment in fragments {
        overwritten += document.absorb(fragment);
    }
    (document, overwritten)
}

/// Two-space pretty printer that escapes everything outside `' '..='~'`,
/// using UTF-16 surrogate pairs above the basic multilingual plane.
struct AsciiFormatter<'a> {
    pretty: PrettyFormatter<'a>,
}

impl AsciiFormatter<'_> {
    fn new() -> Self {
        Self {
            pretty: PrettyFormatter::with_indent(b"  "),
        }
    }
}

impl Formatter for AsciiFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if (' '..='~').contains(&ch) {
                continue;
            }
            writer.write_all(fragment[start..index].as_bytes())?;
            let mut units = [0_u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = index + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(left, _), (right, _)| left.cmp(right));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
