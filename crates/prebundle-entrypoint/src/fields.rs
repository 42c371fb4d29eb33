//! Field shapes and the typed read boundary.
//!
//! Every typed accessor on `Entrypoint` goes through one of the readers here,
//! so shape checking happens in exactly one place. JSON `null` reads the same
//! as an absent key; any other mismatch is a `ShapeError`.

use prebundle_manifest::{CONFIG_SECTION, ManifestDocument, value_kind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

pub const MAIN_KEY: &str = "main";
pub const MODULE_KEY: &str = "module";
pub const BROWSER_KEY: &str = "browser";
pub const REACT_NATIVE_KEY: &str = "react-native";
pub const UMD_MAIN_KEY: &str = "umd:main";

/// Config-section key holding the source entry path.
pub const SOURCE_KEY: &str = "source";
/// Config-section key holding the UMD global name.
pub const UMD_NAME_KEY: &str = "umdName";

pub const DEFAULT_SOURCE_ENTRY: &str = "src/index.js";

/// Declared type contract of a stored field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    String,
    StringOrStringMap,
    Object,
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "a string"),
            Self::StringOrStringMap => write!(f, "a string or an object of strings"),
            Self::Object => write!(f, "an object"),
        }
    }
}

/// A stored value does not match its field's declared shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid `{key}` field: expected {expected}, found {found}")]
pub struct ShapeError {
    pub key: String,
    pub expected: Shape,
    pub found: &'static str,
}

impl ShapeError {
    fn new(key: &str, expected: Shape, value: &Value) -> Self {
        Self {
            key: key.to_string(),
            expected,
            found: value_kind(value),
        }
    }
}

/// Value of `browser` / `react-native`: a replacement entry file, or a map of
/// per-file replacements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlatformOverride {
    Path(String),
    Mapping(BTreeMap<String, String>),
}

impl From<&str> for PlatformOverride {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<PlatformOverride> for Value {
    fn from(option: PlatformOverride) -> Self {
        match option {
            PlatformOverride::Path(path) => Value::String(path),
            PlatformOverride::Mapping(mapping) => Value::Object(
                mapping
                    .into_iter()
                    .map(|(from, to)| (from, Value::String(to)))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

pub(crate) fn optional_string<'a>(
    value: Option<&'a Value>,
    key: &str,
) -> Result<Option<&'a str>, ShapeError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.as_str())),
        Some(other) => Err(ShapeError::new(key, Shape::String, other)),
    }
}

pub(crate) fn optional_platform_override(
    value: Option<&Value>,
    key: &str,
) -> Result<Option<PlatformOverride>, ShapeError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(path)) => Ok(Some(PlatformOverride::Path(path.clone()))),
        Some(Value::Object(entries)) => {
            let mut mapping = BTreeMap::new();
            for (from, to) in entries {
                let Value::String(to) = to else {
                    return Err(ShapeError::new(key, Shape::StringOrStringMap, to));
                };
                mapping.insert(from.clone(), to.clone());
            }
            Ok(Some(PlatformOverride::Mapping(mapping)))
        }
        Some(other) => Err(ShapeError::new(key, Shape::StringOrStringMap, other)),
    }
}

/// Read one key of the tool-private config section.
///
/// A missing or `null` section reads as empty; any other non-object section
/// is a shape error on the section itself.
pub(crate) fn config_value<'a>(
    document: &'a ManifestDocument,
    key: &str,
) -> Result<Option<&'a Value>, ShapeError> {
    match document.config() {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(section)) => Ok(section.get(key)),
        Some(other) => Err(ShapeError::new(CONFIG_SECTION, Shape::Object, other)),
    }
}

/// Dotted key used in errors for config-section fields, e.g. `prebundle.umdName`.
pub(crate) fn config_key_path(key: &str) -> String {
    format!("{CONFIG_SECTION}.{key}")
}
