//! Collections of named parameters and the parsers that build them.

use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::error::{ParameterError, ParameterResult};
use crate::parameter::{percent_decode, percent_encode, Parameter, Value};
use crate::REALM_KEY;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// A set of [`Parameter`]s, one per name.
///
/// Internally keyed by the percent-encoded name, so iteration always runs
/// in normalization order. Sorting raw names would be wrong: `%` sorts
/// below several unreserved bytes, so e.g. `c%40` must precede `c2`.
#[derive(Debug, Clone, Default)]
pub struct ParameterCollection {
    parameters: BTreeMap<String, Parameter>,
}

impl ParameterCollection {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Add a value for `name`, merging into the existing [`Parameter`]
    /// when the name has been seen before.
    pub fn add<V: Into<Value>>(&mut self, name: &str, value: V) -> ParameterResult<()> {
        self.add_values(name, Some(value))
    }

    pub fn add_values<I, V>(&mut self, name: &str, values: I) -> ParameterResult<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if name.is_empty() {
            return Err(ParameterError::EmptyParameterName);
        }
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Ok(());
        }
        let key = percent_encode(name).into_owned();
        match self.parameters.get_mut(&key) {
            Some(parameter) => parameter.add_values(values),
            None => {
                self.parameters
                    .insert(key, Parameter::with_values(name, values));
            }
        }
        Ok(())
    }

    /// Replace any existing values for `name` with exactly one value.
    pub fn reset<V: Into<Value>>(&mut self, name: &str, value: V) -> ParameterResult<()> {
        if name.is_empty() {
            return Err(ParameterError::EmptyParameterName);
        }
        let key = percent_encode(name).into_owned();
        match self.parameters.get_mut(&key) {
            Some(parameter) => parameter.reset(value),
            None => {
                self.parameters.insert(key, Parameter::new(name, value));
            }
        }
        Ok(())
    }

    pub fn exists(&self, name: &str) -> bool {
        self.parameters.contains_key(percent_encode(name).as_ref())
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(percent_encode(name).as_ref())
    }

    pub fn remove(&mut self, name: &str) -> Option<Parameter> {
        self.parameters.remove(percent_encode(name).as_ref())
    }

    /// Raw parameter names, ascending by percent-encoded byte value.
    pub fn names(&self) -> Vec<&str> {
        self.parameters.values().map(|p| p.name().get()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.values()
    }

    /// Append every value of `other` into this collection. Coinciding
    /// names concatenate value lists, never overwrite.
    pub fn absorb(&mut self, other: &ParameterCollection) {
        for parameter in other.iter() {
            let values = parameter.values().iter().cloned();
            // names in an existing collection are never empty
            let _ = self.add_values(parameter.name().get(), values);
        }
    }

    /// Merge any number of optional collections into a new one, in order.
    /// `None` sources are skipped; no sources at all yields an empty
    /// collection.
    pub fn merge<'a, I>(sources: I) -> ParameterCollection
    where
        I: IntoIterator<Item = Option<&'a ParameterCollection>>,
    {
        let mut merged = ParameterCollection::new();
        for source in sources.into_iter().flatten() {
            merged.absorb(source);
        }
        merged
    }

    /// Parse an `application/x-www-form-urlencoded` query string: pairs
    /// split on `&` then the first `=`, `+` decoding to a space.
    /// Duplicate names accumulate in occurrence order; pairs with an
    /// empty name are dropped.
    pub fn from_query_string(query: &str) -> ParameterCollection {
        let mut collection = ParameterCollection::new();
        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            if name.is_empty() {
                continue;
            }
            let _ = collection.add(name.as_ref(), value.into_owned());
        }
        collection
    }

    /// Parse an `Authorization: OAuth ...` header. Values are strictly
    /// percent-decoded (a `+` stays a plus here) and the `realm`
    /// parameter is always discarded.
    pub fn from_authorization_header(header: &str) -> ParameterCollection {
        let mut collection = ParameterCollection::new();
        let header = header.trim();
        let parts = header
            .strip_prefix("OAuth")
            .map(str::trim_start)
            .unwrap_or(header);
        for part in parts.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let mut pair = part.splitn(2, '=');
            let name = pair.next().unwrap_or_default().trim();
            let value = pair.next().unwrap_or_default().trim().trim_matches('"');
            if name.is_empty() || name.eq_ignore_ascii_case(REALM_KEY) {
                continue;
            }
            let _ = collection.add(name, percent_decode(value).into_owned());
        }
        collection
    }

    /// Parse a request entity body. Anything other than form-urlencoded
    /// content yields an empty collection.
    pub fn from_entity_body(body: &str, content_type: &str) -> ParameterCollection {
        if content_type == FORM_URLENCODED {
            Self::from_query_string(body)
        } else {
            ParameterCollection::new()
        }
    }

    /// The normalized parameter string per RFC 5849 section 3.4.1.3.2:
    /// parameters ascending by percent-encoded name, each contributing
    /// its own normalized `name=value` pairs, joined with `&`.
    pub fn normalized(&self) -> String {
        self.parameters
            .values()
            .map(Parameter::normalized)
            .collect::<Vec<_>>()
            .join("&")
    }
}
