//! Flat parameter mapping with typed, validating readers.
//!
//! [`ParameterMap`] is the boundary between loosely typed parameter sources
//! and the strongly typed pipeline configuration. Every reader either
//! returns a value of the requested semantic type or a [`ConfigError`]
//! naming the key; nothing is coerced silently except integer → float.

use super::value::ParamValue;
use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt::Display;
use std::str::FromStr;

/// Flat mapping of parameter names to scalar values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterMap {
    values: BTreeMap<String, ParamValue>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.values.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ParamValue> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overlay `other` on top of this map; keys in `other` win.
    pub fn merge(&mut self, other: ParameterMap) {
        self.values.extend(other.values);
    }

    // ==================== Typed Readers ====================

    /// Look up a required key.
    pub fn require(&self, key: &str) -> Result<&ParamValue, ConfigError> {
        self.values.get(key).ok_or_else(|| ConfigError::missing(key))
    }

    pub fn bool(&self, key: &str) -> Result<bool, ConfigError> {
        let value = self.require(key)?;
        value
            .as_bool()
            .ok_or_else(|| ConfigError::invalid_type(key, "a boolean", value.type_name()))
    }

    /// Optional boolean. Absence yields `default`; a present value of the
    /// wrong type is still an error.
    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        if self.contains_key(key) {
            self.bool(key)
        } else {
            Ok(default)
        }
    }

    fn int(&self, key: &str) -> Result<i64, ConfigError> {
        let value = self.require(key)?;
        value
            .as_int()
            .ok_or_else(|| ConfigError::invalid_type(key, "an integer", value.type_name()))
    }

    /// Strictly positive integer (sizes, counts, kernel dimensions).
    pub fn positive_int(&self, key: &str) -> Result<u32, ConfigError> {
        let raw = self.int(key)?;
        if raw <= 0 {
            return Err(ConfigError::invalid_value(
                key,
                format!("must be a positive integer, got {}", raw),
            ));
        }
        u32::try_from(raw)
            .map_err(|_| ConfigError::invalid_value(key, format!("{} is out of range", raw)))
    }

    /// Integer that may be zero (minimum region sizes).
    pub fn non_negative_int(&self, key: &str) -> Result<u32, ConfigError> {
        let raw = self.int(key)?;
        if raw < 0 {
            return Err(ConfigError::invalid_value(
                key,
                format!("must be zero or greater, got {}", raw),
            ));
        }
        u32::try_from(raw)
            .map_err(|_| ConfigError::invalid_value(key, format!("{} is out of range", raw)))
    }

    /// Finite number; integers are accepted and widened.
    pub fn number(&self, key: &str) -> Result<f64, ConfigError> {
        let value = self.require(key)?;
        let number = value
            .as_number()
            .ok_or_else(|| ConfigError::invalid_type(key, "a number", value.type_name()))?;
        if !number.is_finite() {
            return Err(ConfigError::invalid_value(key, "must be a finite number"));
        }
        Ok(number)
    }

    /// Number that must satisfy `accept`; `requirement` completes the
    /// sentence "must be ..." in the error message.
    pub fn number_where(
        &self,
        key: &str,
        requirement: &str,
        accept: impl Fn(f64) -> bool,
    ) -> Result<f64, ConfigError> {
        let number = self.number(key)?;
        if accept(number) {
            Ok(number)
        } else {
            Err(ConfigError::invalid_value(
                key,
                format!("must be {}, got {}", requirement, number),
            ))
        }
    }

    /// Non-empty string.
    pub fn string(&self, key: &str) -> Result<&str, ConfigError> {
        let value = self.require(key)?;
        let s = value
            .as_str()
            .ok_or_else(|| ConfigError::invalid_type(key, "a string", value.type_name()))?;
        if s.trim().is_empty() {
            return Err(ConfigError::invalid_value(key, "must not be empty"));
        }
        Ok(s)
    }

    /// String parsed into a closed set of values via [`FromStr`].
    pub fn parse<T>(&self, key: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.string(key)?
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid_value(key, e.to_string()))
    }
}

impl From<BTreeMap<String, ParamValue>> for ParameterMap {
    fn from(values: BTreeMap<String, ParamValue>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ParameterMap {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
