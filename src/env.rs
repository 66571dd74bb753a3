use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A value injected into the build through `env`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum EnvValue {
    Str(String),
    Number(i64),
    Bool(bool),
}

impl EnvValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            EnvValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for EnvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvValue::Str(s) => f.write_str(s),
            EnvValue::Number(n) => write!(f, "{n}"),
            EnvValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<String> for EnvValue {
    fn from(s: String) -> Self {
        EnvValue::Str(s)
    }
}

impl From<&str> for EnvValue {
    fn from(s: &str) -> Self {
        EnvValue::Str(s.to_string())
    }
}

impl From<i64> for EnvValue {
    fn from(n: i64) -> Self {
        EnvValue::Number(n)
    }
}

impl From<bool> for EnvValue {
    fn from(b: bool) -> Self {
        EnvValue::Bool(b)
    }
}

/// The exported `env` mapping.
///
/// A key can be declared without a value (an undefined passthrough). Such
/// entries are kept so callers can tell "declared but unset" from "unknown
/// key", and are left out when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportedEnv {
    entries: BTreeMap<String, Option<EnvValue>>,
}

impl ExportedEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&mut self, key: &str, value: impl Into<EnvValue>) {
        self.entries.insert(key.to_string(), Some(value.into()));
    }

    pub(crate) fn set_opt(&mut self, key: &str, value: Option<&str>) {
        self.entries
            .insert(key.to_string(), value.map(EnvValue::from));
    }

    /// Defined value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&EnvValue> {
        self.entries.get(key).and_then(Option::as_ref)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(EnvValue::as_str)
    }

    pub fn is_declared(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of declared entries, undefined ones included.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// All declared entries, undefined ones included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&EnvValue>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Only entries carrying a value.
    pub fn defined(&self) -> impl Iterator<Item = (&str, &EnvValue)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.as_str(), v)))
    }
}

impl Serialize for ExportedEnv {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let defined: Vec<_> = self.defined().collect();
        let mut map = serializer.serialize_map(Some(defined.len()))?;
        for (k, v) in defined {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
