//! Route values: template defaults and the values resolved by a match.
//!
//! Keys are case-insensitive (`Id` and `id` name the same value); they are
//! stored lower-cased and iterate in key order.

use std::collections::BTreeMap;

/// A single route value.
///
/// `Optional` marks a parameter that may be left out of the URI entirely.
/// When it is left out, the parameter does not appear in the resolved values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteValue {
    Optional,
    Value(String),
}

impl RouteValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Value(value) => Some(value),
            Self::Optional => None,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional)
    }
}

impl From<&str> for RouteValue {
    fn from(value: &str) -> Self {
        Self::Value(value.to_owned())
    }
}

impl From<String> for RouteValue {
    fn from(value: String) -> Self {
        Self::Value(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteValueDictionary {
    values: BTreeMap<String, RouteValue>,
}

fn normalize(name: &str) -> String {
    name.to_ascii_lowercase()
}

impl RouteValueDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for declaring defaults inline.
    pub fn with(mut self, name: &str, value: impl Into<RouteValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<RouteValue>) -> Option<RouteValue> {
        self.values.insert(normalize(name), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&RouteValue> {
        self.values.get(&normalize(name))
    }

    /// Returns the concrete value for `name`; `Optional` markers read as absent.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(RouteValue::as_str)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.values.contains_key(&normalize(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<RouteValue> {
        self.values.remove(&normalize(name))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RouteValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for RouteValueDictionary
where
    K: AsRef<str>,
    V: Into<RouteValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (name, value) in iter {
            values.insert(name.as_ref(), value);
        }
        values
    }
}
