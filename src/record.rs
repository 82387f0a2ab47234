//! Insertion-ordered field storage shared by [`Document`](crate::Document) and
//! [`Sentence`](crate::Sentence).
//!
//! Fields are plain JSON values keyed by name. A field keeps the slot it was first
//! assigned in for the lifetime of the record, so iteration and serialization come out
//! in the same order no matter how often values are overwritten. A field holding `null`
//! is declared but unset.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Returns `true` unless the value is `null`, an empty array or an empty object.
///
/// This is the filter used to build presentable mappings: the wire format is sparse and
/// an absent key means "not computed".
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
        _ => true,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedRecord {
    fields: Map<String, Value>,
}

impl OrderedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record whose fields are declared, unset, in the given order.
    pub fn with_declared(names: &[&str]) -> Self {
        let mut record = Self::new();
        for name in names {
            record.set(*name, Value::Null);
        }
        record
    }

    /// Assigns a field. New names go to the end of the order; known names are updated in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Resets a field to unset without giving up its slot.
    pub fn unset(&mut self, name: &str) {
        if let Some(value) = self.fields.get_mut(name) {
            *value = Value::Null;
        }
    }

    /// Returns the field value, or `None` when the field was never assigned or is unset.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).filter(|value| !value.is_null())
    }

    /// Decodes a field into `T`. Unset fields and values of another shape yield `None`.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.get(name)
            .and_then(|value| <T as Deserialize<'_>>::deserialize(value).ok())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterates `(name, value)` pairs in first-assignment order, unset fields included.
    ///
    /// The iterator borrows the live record; call again for a fresh pass.
    pub fn ordered_fields(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys().map(String::as_str)
    }

    /// Copies the fields accepted by `keep` into a new mapping, preserving order.
    pub fn to_ordered_mapping<F>(&self, keep: F) -> Map<String, Value>
    where
        F: Fn(&Value) -> bool,
    {
        self.ordered_fields()
            .filter(|&(_, value)| keep(value))
            .map(|(name, value)| (name.to_owned(), value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Generates `Option<T>` getters that decode the same-named field of `self.record`.
macro_rules! typed_accessors {
    ($($(#[$meta:meta])* $name:ident: $ty:ty;)*) => {
        $(
            $(#[$meta])*
            pub fn $name(&self) -> Option<$ty> {
                self.record.get_as(stringify!($name))
            }
        )*
    };
}

pub(crate) use typed_accessors;
