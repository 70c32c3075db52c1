//! Runtime context delivered by the hosting page.
//!
//! A context is an arbitrary string-keyed map of scalar values carried
//! in a runtime message. Condition evaluation and template resolution
//! both read from it; neither ever writes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single context value. Messages arrive as JSON, so values may be
/// strings, numbers, or booleans; everything downstream works on the
/// stringified form unless a numeric comparison asks otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    String(String),
    Number(f64),
    Bool(bool),
}

impl ContextValue {
    /// Stringified form, as the page's scripting layer would produce it.
    pub fn to_display_string(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Number(n) => {
                // Integral numbers print without a trailing ".0"; the
                // integer path only covers exactly-representable
                // magnitudes so the cast cannot saturate
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 9_007_199_254_740_992.0 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Self::Bool(b) => b.to_string(),
        }
    }

    /// Numeric coercion; strings parse as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::String(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for ContextValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Key-value context from a runtime message payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuntimeContext(pub HashMap<String, ContextValue>);

impl RuntimeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.0.get(key)
    }

    /// Stringified value for a key, or `None` if absent.
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.0.get(key).map(ContextValue::to_display_string)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        self.0.insert(key.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<ContextValue>> FromIterator<(K, V)> for RuntimeContext {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mixed_payload() {
        let ctx: RuntimeContext = serde_json::from_str(
            r#"{"experienceLink": "https://host", "count": 10, "beta": true}"#,
        )
        .unwrap();

        assert_eq!(ctx.get_str("experienceLink").as_deref(), Some("https://host"));
        assert_eq!(ctx.get_str("count").as_deref(), Some("10"));
        assert_eq!(ctx.get_str("beta").as_deref(), Some("true"));
        assert!(ctx.get("missing").is_none());
    }

    #[test]
    fn test_numeric_coercion_from_string() {
        let ctx: RuntimeContext = [("count", "10")].into_iter().collect();
        assert_eq!(ctx.get("count").unwrap().as_f64(), Some(10.0));

        let ctx: RuntimeContext = [("name", "Bob")].into_iter().collect();
        assert_eq!(ctx.get("name").unwrap().as_f64(), None);
    }

    #[test]
    fn test_integral_numbers_stringify_without_fraction() {
        let v = ContextValue::Number(42.0);
        assert_eq!(v.to_display_string(), "42");
        let v = ContextValue::Number(4.5);
        assert_eq!(v.to_display_string(), "4.5");
    }

    #[test]
    fn test_huge_integral_numbers_do_not_saturate() {
        let v = ContextValue::Number(1e20);
        assert_eq!(v.to_display_string(), "100000000000000000000");
        let v = ContextValue::Number(-1e20);
        assert_eq!(v.to_display_string(), "-100000000000000000000");
    }
}
