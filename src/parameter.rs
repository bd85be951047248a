//! Single parameter values and named parameters.
//!
//! Parameter names and values are both percent encoded per
//! [RFC 5849 section 3.6](https://tools.ietf.org/html/rfc5849#section-3.6),
//! which leaves only the RFC 3986 unreserved characters untouched.

use std::borrow::Cow;
use std::fmt;
use std::str;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{ParameterError, ParameterResult};

/// Everything outside `A-Za-z0-9 - . _ ~` is encoded, with uppercase hex.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a string on the OAuth encode set.
pub fn percent_encode(input: &str) -> Cow<'_, str> {
    utf8_percent_encode(input, OAUTH_ENCODE_SET).into()
}

/// Strict RFC 3986 percent-decoding. `+` stays a literal plus; use the
/// query-string parsers for `application/x-www-form-urlencoded` content.
pub fn percent_decode(input: &str) -> Cow<'_, str> {
    percent_decode_str(input).decode_utf8_lossy()
}

/// Source encoding declared for raw parameter bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Iso8859_1,
}

/// A single scalar parameter value.
///
/// The percent-encoded form is computed whenever the raw value is set, so
/// it can never go stale against the raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    raw: String,
    encoded: String,
}

impl Value {
    pub fn new<T: Into<String>>(raw: T) -> Self {
        let mut value = Value {
            raw: String::new(),
            encoded: String::new(),
        };
        value.set(raw);
        value
    }

    /// Replace the raw value, recomputing the encoded form.
    pub fn set<T: Into<String>>(&mut self, raw: T) {
        self.raw = raw.into();
        self.encoded = percent_encode(&self.raw).into_owned();
    }

    /// Build a value from a float. NaN and infinities have no query-string
    /// representation and are rejected.
    pub fn from_float(raw: f64) -> ParameterResult<Self> {
        if raw.is_finite() {
            Ok(Value::new(raw.to_string()))
        } else {
            Err(ParameterError::InvalidValueKind("a non-finite float"))
        }
    }

    /// Build a value from raw bytes in a declared source encoding,
    /// converting to UTF-8.
    pub fn from_encoded_bytes(bytes: &[u8], encoding: Encoding) -> ParameterResult<Self> {
        match encoding {
            Encoding::Utf8 => str::from_utf8(bytes)
                .map(Value::new)
                .map_err(|_| ParameterError::EncodingConversion("UTF-8")),
            Encoding::Iso8859_1 => Ok(Value::new(
                bytes.iter().map(|&b| b as char).collect::<String>(),
            )),
        }
    }

    /// The raw (UTF-8) value.
    pub fn get(&self) -> &str {
        &self.raw
    }

    /// The RFC 3986 percent-encoded form.
    pub fn percent_encoded(&self) -> &str {
        &self.encoded
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for Value {
    fn from(raw: &str) -> Self {
        Value::new(raw)
    }
}

impl From<String> for Value {
    fn from(raw: String) -> Self {
        Value::new(raw)
    }
}

impl From<bool> for Value {
    fn from(raw: bool) -> Self {
        Value::new(if raw { "true" } else { "false" })
    }
}

macro_rules! value_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(raw: $t) -> Self {
                    Value::new(raw.to_string())
                }
            }
        )*
    };
}

value_from_integer!(i32, i64, u32, u64);

/// A parameter name bound to one or more values.
///
/// The name is a [`Value`] itself, since names are percent encoded too.
/// The value list is never empty; an empty string is a valid value.
#[derive(Debug, Clone)]
pub struct Parameter {
    name: Value,
    values: Vec<Value>,
}

impl Parameter {
    pub fn new<V: Into<Value>>(name: &str, value: V) -> Self {
        Parameter {
            name: Value::new(name),
            values: vec![value.into()],
        }
    }

    pub fn with_values<I, V>(name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut parameter = Parameter {
            name: Value::new(name),
            values: Vec::new(),
        };
        parameter.add_values(values);
        debug_assert!(!parameter.values.is_empty());
        parameter
    }

    pub fn name(&self) -> &Value {
        &self.name
    }

    /// Append a value without removing existing ones. Duplicates produce
    /// repeated `name=value` pairs in the normalized form.
    pub fn add_value<V: Into<Value>>(&mut self, value: V) {
        self.values.push(value.into());
    }

    pub fn add_values<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.values.extend(values.into_iter().map(Into::into));
    }

    /// Discard all existing values and set exactly one.
    pub fn reset<V: Into<Value>>(&mut self, value: V) {
        self.values.clear();
        self.values.push(value.into());
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn first_value(&self) -> &Value {
        &self.values[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// `name=value` pairs joined with `&`, values sorted ascending by
    /// their percent-encoded byte representation. The sort is stable, so
    /// equal values keep insertion order.
    pub fn normalized(&self) -> String {
        let name = self.name.percent_encoded();
        let mut encoded: Vec<&str> = self.values.iter().map(|v| v.percent_encoded()).collect();
        encoded.sort();
        encoded
            .iter()
            .map(|value| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<'a> IntoIterator for &'a Parameter {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
