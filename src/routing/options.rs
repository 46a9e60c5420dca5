//! Per-route option bags and the capability traits that expose them.
//!
//! A router may or may not be able to answer "what options does route X
//! carry?". That ability is modelled as an optional interface: a
//! [`RouteResolver`] hands out a [`RouteOptionsProvider`] only when it has
//! one. Consumers treat `None` as "capability not supported".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Option consulted by the CSRF guard.
pub const CSRF_PROTECT: &str = "csrf_protect";

/// A single option value as written in the route configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl OptionValue {
    /// Loose truthiness: `false`, zero, `""` and `"0"` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            OptionValue::Bool(b) => *b,
            OptionValue::Integer(i) => *i != 0,
            OptionValue::Float(f) => *f != 0.0,
            OptionValue::String(s) => !(s.is_empty() || s == "0"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Integer(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Float(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::String(value)
    }
}

/// Option name to value, scoped to one route.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RouteOptions(BTreeMap<String, OptionValue>);

impl RouteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// True when the named option is present and truthy.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(OptionValue::is_truthy)
    }

    /// Whether requests to this route must carry a valid CSRF token.
    pub fn csrf_protect(&self) -> bool {
        self.flag(CSRF_PROTECT)
    }
}

impl<K, V> FromIterator<(K, V)> for RouteOptions
where
    K: Into<String>,
    V: Into<OptionValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Capability: answers per-route option lookups.
pub trait RouteOptionsProvider: Send + Sync {
    /// Options for `route_id`, or `None` when the route is unknown.
    fn route_options(&self, route_id: &str) -> Option<&RouteOptions>;
}

/// A route table as seen by request-interception stages.
pub trait RouteResolver: Send + Sync {
    /// Per-route option lookups, when this resolver supports them.
    fn options_provider(&self) -> Option<&dyn RouteOptionsProvider> {
        None
    }
}
