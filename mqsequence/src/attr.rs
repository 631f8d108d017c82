//! Attribute values with lenient coercion.
//!
//! Template attributes and user settings arrive as loosely typed JSON
//! scalars. Consumers always ask for a concrete type with a fallback
//! default, so a `"3"` stored where a count is expected still works,
//! and garbage degrades to the default instead of failing the run.

use serde::{Deserialize, Serialize};

/// A loosely typed attribute or setting value.
///
/// Deserializes from plain JSON scalars (untagged), so a template can
/// write `"count": 2`, `"play3D": true` or `"source": "dir"` without
/// any wrapper syntax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<String>),
}

impl AttrValue {
    /// Coerce to bool. Only a true bool or the lowercase string
    /// `"true"` count as true; a non-empty other string is false and
    /// anything else falls back to `default`.
    pub fn as_bool(&self, default: bool) -> bool {
        match self {
            AttrValue::Bool(b) => *b,
            AttrValue::Str(s) if s.is_empty() => default,
            AttrValue::Str(s) => s == "true",
            _ => default,
        }
    }

    /// Coerce to integer, going through float parsing so `"3.0"`
    /// yields 3. Empty or unparseable values yield `default`.
    pub fn as_int(&self, default: i64) -> i64 {
        match self {
            AttrValue::Int(i) => *i,
            AttrValue::Float(f) => *f as i64,
            AttrValue::Str(s) if s.is_empty() => default,
            AttrValue::Str(s) => s.parse::<f64>().map(|f| f as i64).unwrap_or(default),
            _ => default,
        }
    }

    /// Coerce to float. Empty or unparseable values yield `default`.
    pub fn as_f64(&self, default: f64) -> f64 {
        match self {
            AttrValue::Int(i) => *i as f64,
            AttrValue::Float(f) => *f,
            AttrValue::Str(s) if s.is_empty() => default,
            AttrValue::Str(s) => s.parse::<f64>().unwrap_or(default),
            _ => default,
        }
    }

    /// Coerce to string. Numbers and bools render themselves; an empty
    /// string or a list yields `default`.
    pub fn as_str(&self, default: &str) -> String {
        match self {
            AttrValue::Str(s) if s.is_empty() => default.to_string(),
            AttrValue::Str(s) => s.clone(),
            AttrValue::Bool(b) => b.to_string(),
            AttrValue::Int(i) => i.to_string(),
            AttrValue::Float(f) => f.to_string(),
            AttrValue::List(_) => default.to_string(),
        }
    }

    /// Coerce to a list of strings. A plain string splits on commas;
    /// anything else yields `default`.
    pub fn as_list(&self, default: &[String]) -> Vec<String> {
        match self {
            AttrValue::List(l) => l.clone(),
            AttrValue::Str(s) if s.is_empty() => default.to_vec(),
            AttrValue::Str(s) => s.split(',').map(|p| p.trim().to_string()).collect(),
            _ => default.to_vec(),
        }
    }
}
