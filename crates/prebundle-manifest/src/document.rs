//! Parsed manifest document.
//!
//! A `ManifestDocument` is the raw key-value tree behind an entrypoint. It
//! keeps keys in file order so rewriting a manifest only changes the keys that
//! were actually edited.

use crate::error::ManifestError;
use serde_json::{Map, Value};
use std::path::Path;

/// Key of the tool-private config section inside a manifest.
pub const CONFIG_SECTION: &str = "prebundle";

/// File name of the manifest inside a package or entrypoint directory.
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// Ordered JSON object backing one manifest file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestDocument {
    root: Map<String, Value>,
}

impl ManifestDocument {
    /// Parse manifest text that did not come from a known path.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        parse_with_origin("<inline>", text)
    }

    /// Parse manifest text read from `path`; errors name the path.
    pub fn parse_at(path: &Path, text: &str) -> Result<Self, ManifestError> {
        parse_with_origin(&path.display().to_string(), text)
    }

    pub fn from_map(root: Map<String, Value>) -> Self {
        Self { root }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.root
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.root.contains_key(key)
    }

    /// Insert or replace a top-level key. Returns the previous value.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Option<Value> {
        self.root.insert(key.to_string(), value.into())
    }

    /// Remove a top-level key, keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.root.shift_remove(key)
    }

    /// `Some` sets the key, `None` removes it.
    pub fn set_or_remove(&mut self, key: &str, value: Option<Value>) -> Option<Value> {
        match value {
            Some(value) => self.set(key, value),
            None => self.remove(key),
        }
    }

    /// Raw tool-private config section, whatever its type.
    pub fn config(&self) -> Option<&Value> {
        self.root.get(CONFIG_SECTION)
    }

    /// One key of the config section. `None` when the section or the key is
    /// missing, or when the section is not an object.
    pub fn config_value(&self, key: &str) -> Option<&Value> {
        self.config()
            .and_then(Value::as_object)
            .and_then(|section| section.get(key))
    }

    /// Set one key of the config section, creating the section on demand.
    pub fn set_config_key(
        &mut self,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, ManifestError> {
        let section = self.root.entry(CONFIG_SECTION).or_insert(Value::Null);
        // A null section reads as absent, so it is replaced like a missing one.
        if section.is_null() {
            *section = Value::Object(Map::new());
        }
        match section {
            Value::Object(map) => Ok(map.insert(key.to_string(), value.into())),
            other => Err(ManifestError::InvalidConfigSection {
                section: CONFIG_SECTION,
                found: value_kind(other),
            }),
        }
    }

    /// Set a config key, or clear it when `value` is `None`.
    ///
    /// Clearing the last key removes the config section itself, so a manifest
    /// never carries an empty `"prebundle": {}` object.
    pub fn set_or_clear_config_key(
        &mut self,
        key: &str,
        value: Option<Value>,
    ) -> Result<Option<Value>, ManifestError> {
        if let Some(value) = value {
            return self.set_config_key(key, value);
        }

        if matches!(self.config(), Some(Value::Null)) {
            self.root.shift_remove(CONFIG_SECTION);
            return Ok(None);
        }
        let Some(section) = self.root.get_mut(CONFIG_SECTION) else {
            return Ok(None);
        };
        let map = match section {
            Value::Object(map) => map,
            other => {
                return Err(ManifestError::InvalidConfigSection {
                    section: CONFIG_SECTION,
                    found: value_kind(other),
                });
            }
        };
        let previous = map.shift_remove(key);
        if map.is_empty() {
            self.root.shift_remove(CONFIG_SECTION);
        }
        Ok(previous)
    }

    /// Serialize as two-space pretty JSON with a trailing newline.
    pub fn to_text(&self) -> Result<String, ManifestError> {
        let mut text = serde_json::to_string_pretty(&self.root)
            .map_err(|e| ManifestError::Serialize(e.to_string()))?;
        text.push('\n');
        Ok(text)
    }
}

fn parse_with_origin(origin: &str, text: &str) -> Result<ManifestDocument, ManifestError> {
    let value: Value = serde_json::from_str(text).map_err(|e| ManifestError::Malformed {
        origin: origin.to_string(),
        message: e.to_string(),
    })?;
    match value {
        Value::Object(root) => Ok(ManifestDocument { root }),
        other => Err(ManifestError::Malformed {
            origin: origin.to_string(),
            message: format!("expected a JSON object, found {}", value_kind(&other)),
        }),
    }
}

/// Human-readable name of a JSON value's type, for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
