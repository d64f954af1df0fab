//! In-memory model of a nested values document

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt;
use std::path::Path;

use crate::error::{CoreError, Result};

/// Character wrapped around a key on both ends to pin it (e.g. `^key^`)
pub const PIN_MARKER: char = '^';

/// Mapping level of a [`ValueTree`]
///
/// Keys keep their insertion order so that pins can be resolved in the order
/// they were written. Encoding sorts keys itself and never relies on this order.
pub type Mapping = IndexMap<String, ValueTree>;

/// A nested configuration document: scalars, sequences and mappings
///
/// Deserialization goes through [`serde_yaml::Value`], so any YAML or JSON
/// document loads: scalar mapping keys (`80:`, `true:`) become their string
/// form and non-finite numbers (`.nan`, `.inf`) are kept as strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ValueTree {
    Scalar(Scalar),
    Sequence(Vec<ValueTree>),
    Mapping(Mapping),
}

/// Leaf value, keeping the type it had in its source document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Key present with an empty value
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

impl ValueTree {
    /// Empty mapping
    pub fn new() -> Self {
        ValueTree::Mapping(Mapping::new())
    }

    /// Null scalar
    pub fn null() -> Self {
        ValueTree::Scalar(Scalar::Null)
    }

    /// Parse a tree from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(ValueTree::null());
        }
        let tree: Option<ValueTree> = serde_yaml::from_str(yaml)?;
        Ok(tree.unwrap_or_else(ValueTree::null))
    }

    /// Parse a tree from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a tree from a YAML (or JSON, which is valid YAML) file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Serialize to YAML text
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            ValueTree::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Take the mapping out of this tree, failing with an override-group error
    /// naming `group` when the root is anything else
    pub fn into_mapping(self, group: &str) -> Result<Mapping> {
        match self {
            ValueTree::Mapping(map) => Ok(map),
            ValueTree::Scalar(Scalar::Null) => Ok(Mapping::new()),
            ValueTree::Scalar(scalar) => Err(CoreError::InvalidOverrideGroup {
                group: group.to_string(),
                message: format!("expected key/value pairs, found the bare value '{}'", scalar),
            }),
            ValueTree::Sequence(_) => Err(CoreError::InvalidOverrideGroup {
                group: group.to_string(),
                message: "expected key/value pairs, found a list".to_string(),
            }),
        }
    }

    /// Get a value by key path, one key per level
    pub fn get(&self, path: &[&str]) -> Option<&ValueTree> {
        match path.split_first() {
            None => Some(self),
            Some((key, rest)) => self.as_mapping()?.get(*key)?.get(rest),
        }
    }

    /// Check if the tree holds nothing to encode
    pub fn is_empty(&self) -> bool {
        match self {
            ValueTree::Mapping(map) => map.is_empty(),
            ValueTree::Sequence(items) => items.is_empty(),
            ValueTree::Scalar(Scalar::Null) => true,
            ValueTree::Scalar(_) => false,
        }
    }
}

impl<'de> Deserialize<'de> for ValueTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = serde_yaml::Value::deserialize(deserializer)?;
        from_yaml_value(value).map_err(de::Error::custom)
    }
}

fn from_yaml_value(value: serde_yaml::Value) -> std::result::Result<ValueTree, String> {
    use serde_yaml::Value;

    Ok(match value {
        Value::Null => ValueTree::null(),
        Value::Bool(b) => ValueTree::from(b),
        Value::Number(n) => ValueTree::Scalar(number(&n)),
        Value::String(s) => ValueTree::from(s),
        Value::Sequence(items) => ValueTree::Sequence(
            items
                .into_iter()
                .map(from_yaml_value)
                .collect::<std::result::Result<_, _>>()?,
        ),
        Value::Mapping(entries) => {
            let mut map = Mapping::with_capacity(entries.len());
            for (key, value) in entries {
                let key = mapping_key(key)?;
                let value = from_yaml_value(value).map_err(|e| format!("{}: {}", key, e))?;
                map.insert(key, value);
            }
            ValueTree::Mapping(map)
        }
        Value::Tagged(tagged) => from_yaml_value(tagged.value)?,
    })
}

fn number(n: &serde_yaml::Number) -> Scalar {
    let json = if let Some(i) = n.as_i64() {
        Some(i.into())
    } else if let Some(u) = n.as_u64() {
        Some(u.into())
    } else {
        n.as_f64().and_then(serde_json::Number::from_f64)
    };
    match json {
        Some(json) => Scalar::Number(json),
        None => Scalar::String(n.to_string()),
    }
}

fn mapping_key(key: serde_yaml::Value) -> std::result::Result<String, String> {
    use serde_yaml::Value;

    match key {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok("null".to_string()),
        Value::Tagged(tagged) => mapping_key(tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => {
            Err("mapping keys must be scalars, found a list or mapping key".to_string())
        }
    }
}

impl Default for ValueTree {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ValueTree {
    fn from(s: &str) -> Self {
        ValueTree::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for ValueTree {
    fn from(s: String) -> Self {
        ValueTree::Scalar(Scalar::String(s))
    }
}

impl From<bool> for ValueTree {
    fn from(b: bool) -> Self {
        ValueTree::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for ValueTree {
    fn from(n: i64) -> Self {
        ValueTree::Scalar(Scalar::Number(n.into()))
    }
}

impl From<Vec<ValueTree>> for ValueTree {
    fn from(items: Vec<ValueTree>) -> Self {
        ValueTree::Sequence(items)
    }
}

impl From<Mapping> for ValueTree {
    fn from(map: Mapping) -> Self {
        ValueTree::Mapping(map)
    }
}

impl<K: Into<String>, V: Into<ValueTree>> FromIterator<(K, V)> for ValueTree {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ValueTree::Mapping(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Strip the pin markers from a key, or `None` if the key is not pinned
///
/// All leading and trailing markers are removed, so a normalized key is never
/// pinned again. A key made only of markers is not pinned.
pub fn unpin(key: &str) -> Option<&str> {
    if key.len() < 2 || !key.starts_with(PIN_MARKER) || !key.ends_with(PIN_MARKER) {
        return None;
    }
    let inner = key.trim_matches(PIN_MARKER);
    (!inner.is_empty()).then_some(inner)
}

pub fn is_pinned(key: &str) -> bool {
    unpin(key).is_some()
}
