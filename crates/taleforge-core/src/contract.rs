//! Field-level inspection of untrusted JSON payloads.
//!
//! Generation services are schema-constrained upstream, but nothing they send
//! is trusted until it passes through these accessors. Every failure names the
//! offending field by its full path (e.g. `options[1].check.dc`).

use serde_json::{Map, Value};

use crate::error::DomainError;

/// A JSON object under inspection, remembering where it sits in the payload.
#[derive(Debug, Clone)]
pub struct PayloadObject<'a> {
    map: &'a Map<String, Value>,
    path: String,
}

impl<'a> PayloadObject<'a> {
    /// Inspects the top level of a payload.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Contract` on `payload` if `value` is not an object.
    pub fn root(value: &'a Value) -> Result<Self, DomainError> {
        Self::at(value, "")
    }

    /// Inspects an object nested at `path`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Contract` on `path` if `value` is not an object.
    pub fn at(value: &'a Value, path: impl Into<String>) -> Result<Self, DomainError> {
        let path = path.into();
        let map = value.as_object().ok_or_else(|| {
            let field = if path.is_empty() { "payload" } else { path.as_str() };
            DomainError::contract(field, format!("expected an object, found {}", kind(value)))
        })?;
        Ok(Self { map, path })
    }

    /// Full path of `key` within the payload.
    #[must_use]
    pub fn path_of(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_owned()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    /// Returns the value at `key`, which must be present.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Contract` if `key` is absent.
    pub fn value(&self, key: &str) -> Result<&'a Value, DomainError> {
        self.map
            .get(key)
            .ok_or_else(|| DomainError::contract(self.path_of(key), "missing"))
    }

    /// Returns the value at `key`, treating absence and `null` alike.
    #[must_use]
    pub fn optional(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|value| !value.is_null())
    }

    /// Returns the string at `key`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Contract` if `key` is absent or not a string.
    pub fn string(&self, key: &str) -> Result<&'a str, DomainError> {
        let value = self.value(key)?;
        value.as_str().ok_or_else(|| self.mistyped(key, "a string", value))
    }

    /// Returns the string at `key`, which must contain non-whitespace text.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Contract` if `key` is absent, not a string, or blank.
    pub fn non_empty_string(&self, key: &str) -> Result<&'a str, DomainError> {
        let text = self.string(key)?;
        if text.trim().is_empty() {
            return Err(DomainError::contract(self.path_of(key), "must not be empty"));
        }
        Ok(text)
    }

    /// Returns the boolean at `key`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Contract` if `key` is absent or not a boolean.
    pub fn boolean(&self, key: &str) -> Result<bool, DomainError> {
        let value = self.value(key)?;
        value
            .as_bool()
            .ok_or_else(|| self.mistyped(key, "a boolean", value))
    }

    /// Returns the integer at `key`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Contract` if `key` is absent, not an integer, or
    /// outside the `i32` range.
    pub fn integer(&self, key: &str) -> Result<i32, DomainError> {
        let value = self.value(key)?;
        value
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| self.mistyped(key, "an integer", value))
    }

    /// Returns the array at `key`; an empty array is accepted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Contract` if `key` is absent or not an array.
    pub fn array(&self, key: &str) -> Result<&'a [Value], DomainError> {
        let value = self.value(key)?;
        value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| self.mistyped(key, "an array", value))
    }

    /// Returns the array of strings at `key`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Contract` naming the first non-string element, or
    /// the array itself if it is absent or mistyped.
    pub fn string_array(&self, key: &str) -> Result<Vec<String>, DomainError> {
        self.array(key)?
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.as_str().map(str::to_owned).ok_or_else(|| {
                    DomainError::contract(
                        format!("{}[{index}]", self.path_of(key)),
                        format!("expected a string, found {}", kind(item)),
                    )
                })
            })
            .collect()
    }

    /// Returns the array of integers at `key`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Contract` naming the first non-integer element, or
    /// the array itself if it is absent or mistyped.
    pub fn integer_array(&self, key: &str) -> Result<Vec<i32>, DomainError> {
        self.array(key)?
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.as_i64()
                    .and_then(|n| i32::try_from(n).ok())
                    .ok_or_else(|| {
                        DomainError::contract(
                            format!("{}[{index}]", self.path_of(key)),
                            format!("expected an integer, found {}", kind(item)),
                        )
                    })
            })
            .collect()
    }

    fn mistyped(&self, key: &str, expected: &str, found: &Value) -> DomainError {
        DomainError::contract(
            self.path_of(key),
            format!("expected {expected}, found {}", kind(found)),
        )
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
