//! Gallery catalog document
//!
//! The catalog is a JSON object whose `panels` array holds one object per
//! gallery entry. Only `panels` is interpreted; every other key, and every
//! panel field the registry does not track, is carried through unchanged
//! and in its original position.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::{Map, Value};

use crate::constants::fields;
use crate::error::{MetadataError, Result};

/// One gallery entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Panel(Map<String, Value>);

impl Panel {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Relative image path, if the panel has a string `image` field
    pub fn image(&self) -> Option<&str> {
        self.0.get(fields::IMAGE).and_then(Value::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Tracked fields that are absent or null
    pub fn missing_fields<'a, I>(&self, tracked: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        tracked
            .into_iter()
            .filter(|name| self.0.get(*name).map_or(true, Value::is_null))
            .collect()
    }

    /// True if any tracked field is absent or null
    pub fn needs_update<'a, I>(&self, tracked: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        !self.missing_fields(tracked).is_empty()
    }

    /// Overwrite or append each field of `record`
    ///
    /// Existing keys keep their position; new keys are appended.
    pub fn merge(&mut self, record: Map<String, Value>) {
        for (key, value) in record {
            self.0.insert(key, value);
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// A loaded catalog, bound to the file it came from
#[derive(Debug, Clone)]
pub struct Catalog {
    path: PathBuf,
    root: Map<String, Value>,
    panels: Vec<Panel>,
}

impl Catalog {
    /// Read and parse the catalog at `path`
    ///
    /// # Errors
    ///
    /// - `CatalogNotFound` if the file does not exist
    /// - `CatalogIo` if it cannot be read
    /// - `CatalogParse` if it is not JSON
    /// - `InvalidCatalog` if the root is not an object or `panels` is not an
    ///   array of objects
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MetadataError::CatalogNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path).map_err(|e| MetadataError::catalog_io(path, e))?;
        Self::from_json_str(path, &text)
    }

    /// Parse catalog text that will later be saved to `path`
    pub fn from_json_str(path: &Path, text: &str) -> Result<Self> {
        let root = match serde_json::from_str::<Value>(text)? {
            Value::Object(map) => map,
            other => {
                return Err(MetadataError::InvalidCatalog {
                    reason: format!("expected an object at the top level, found {}", kind_of(&other)),
                })
            }
        };

        // No `panels` key means an empty gallery
        let panels = match root.get(fields::PANELS) {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(idx, item)| match item {
                    Value::Object(map) => Ok(Panel(map.clone())),
                    other => Err(MetadataError::InvalidCatalog {
                        reason: format!("panel {} is {}, expected an object", idx, kind_of(other)),
                    }),
                })
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(MetadataError::InvalidCatalog {
                    reason: format!("`panels` is {}, expected an array", kind_of(other)),
                })
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            root,
            panels,
        })
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panels_mut(&mut self) -> &mut [Panel] {
        &mut self.panels
    }

    /// Serialize with 2-space indentation and a trailing newline
    ///
    /// Output is pure ASCII: anything outside it is written as `\uXXXX`
    /// escapes, with surrogate pairs above the BMP.
    pub fn to_json_string(&self) -> Result<String> {
        let mut root = self.root.clone();
        if root.contains_key(fields::PANELS) || !self.panels.is_empty() {
            root.insert(fields::PANELS.to_string(), serde_json::to_value(&self.panels)?);
        }

        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, AsciiFormatter::new());
        Value::Object(root).serialize(&mut ser)?;

        let mut text = String::from_utf8(buf)
            .map_err(|e| MetadataError::Processing(format!("catalog serialization: {}", e)))?;
        text.push('\n');
        Ok(text)
    }

    /// Overwrite the catalog file with the current contents
    pub fn save(&self) -> Result<()> {
        let text = self.to_json_string()?;
        fs::write(&self.path, text).map_err(|e| MetadataError::catalog_io(&self.path, e))
    }
}

/// Pretty printer that escapes every non-ASCII character
struct AsciiFormatter {
    inner: PrettyFormatter<'static>,
}

impl AsciiFormatter {
    fn new() -> Self {
        Self {
            inner: PrettyFormatter::new(),
        }
    }
}

impl Formatter for AsciiFormatter {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + io::Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        let mut start = 0;
        for (idx, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..idx])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = idx + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
