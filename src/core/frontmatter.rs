//! Structured front matter mapping
//!
//! [`Frontmatter`] owns the parsed metadata block as an insertion-ordered YAML
//! mapping. It is parsed once per document, mutated in place by the
//! transformation engine, and serialized once.

use crate::error::{MattershiftError, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// An ordered mapping from keys to YAML values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frontmatter {
    map: Mapping,
}

impl Frontmatter {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing YAML mapping
    pub fn from_mapping(map: Mapping) -> Self {
        Self { map }
    }

    /// Parse block text that did not come from a file
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_at(text, Path::new("<input>"))
    }

    /// Parse block text, attributing failures to `path`
    ///
    /// A block holding nothing but whitespace and comments is an empty
    /// mapping. Anything else must have a mapping at its root.
    pub fn parse_at(text: &str, path: &Path) -> Result<Self> {
        if is_blank_block(text) {
            return Ok(Self::new());
        }

        let value: Value = serde_yaml::from_str(text)
            .map_err(|e| MattershiftError::invalid_front_matter(path, e.to_string()))?;

        match value {
            Value::Mapping(map) => Ok(Self { map }),
            other => Err(MattershiftError::invalid_front_matter(
                path,
                format!("expected a mapping, found {}", describe(&other)),
            )),
        }
    }

    /// Serialize to block text (no delimiters, trailing newline included)
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.map)?)
    }

    /// Borrow the underlying mapping
    pub fn as_mapping(&self) -> &Mapping {
        &self.map
    }

    /// Consume into the underlying mapping
    pub fn into_mapping(self) -> Mapping {
        self.map
    }

    /// Number of top-level keys
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the mapping has no keys
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Whether `key` is present at the top level
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Borrow the value under `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    /// Mutably borrow the value under `key`
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.map.get_mut(key)
    }

    /// Set `key`, keeping its position if it already exists
    pub fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        self.map.insert(Value::String(key.to_owned()), value)
    }

    /// Set an entry whose key may be any YAML value
    pub fn insert_entry(&mut self, key: Value, value: Value) -> Option<Value> {
        self.map.insert(key, value)
    }

    /// Remove `key`, preserving the order of the remaining keys
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.map.shift_remove(key)
    }

    /// Iterate keys in their current order
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.map.iter().map(|(k, _)| k)
    }
}

impl From<Mapping> for Frontmatter {
    fn from(map: Mapping) -> Self {
        Self::from_mapping(map)
    }
}

fn is_blank_block(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
