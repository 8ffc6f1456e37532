//! Key/value argument lists
//!
//! A key/value list is a flat sequence `k1, v1, k2, v2, ...`. Keys equal to
//! [`ID_KEY`] or [`LABEL_KEY`] carry the element identity and label; every
//! other key becomes a property. [`KeyValues`] builds such a list
//! explicitly, [`decode`] turns one into its parts.

use super::element::{ID_KEY, LABEL_KEY};
use super::property::{PropertyMap, PropertyValue};
use super::types::Id;
use crate::error::{DriverError, DriverResult};

/// Result of decoding a key/value list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded {
    pub id: Option<Id>,
    pub label: Option<String>,
    pub properties: PropertyMap,
}

/// Decode a flat key/value list.
///
/// Duplicate keys are last-write-wins, for the markers as well as for
/// properties. Scalar keys (string, integer, float, boolean, null) are
/// keyed by their string form; array and map keys fail with `Argument`.
pub fn decode(key_values: &[PropertyValue]) -> DriverResult<Decoded> {
    if key_values.len() % 2 != 0 {
        return Err(DriverError::Argument("argument count must be even".to_string()));
    }

    let mut decoded = Decoded::default();
    for pair in key_values.chunks_exact(2) {
        let (key, value) = (&pair[0], &pair[1]);
        let key = key_name(key)?;
        match key.as_str() {
            ID_KEY => {
                let id = value.as_id().ok_or_else(|| {
                    DriverError::Argument(format!(
                        "id must be a string or an integer, but got: {}",
                        value
                    ))
                })?;
                decoded.id = Some(id);
            }
            LABEL_KEY => {
                let label = value.as_string().ok_or_else(|| {
                    DriverError::Argument(format!("label must be a string, but got: {}", value))
                })?;
                decoded.label = Some(label.to_string());
            }
            _ => {
                decoded.properties.insert(key, value.clone());
            }
        }
    }
    Ok(decoded)
}

// String form of a scalar key
fn key_name(key: &PropertyValue) -> DriverResult<String> {
    match key {
        PropertyValue::String(s) => Ok(s.clone()),
        PropertyValue::Array(_) | PropertyValue::Map(_) => Err(DriverError::Argument(format!(
            "key must be a scalar, but got {}: {}",
            key.type_name(),
            key
        ))),
        scalar => Ok(scalar.to_string()),
    }
}

/// Builder for key/value lists
///
/// ```rust
/// use graph_driver::KeyValues;
///
/// let decoded = KeyValues::new()
///     .label("person")
///     .property("name", "marko")
///     .property("age", 29)
///     .decode()
///     .unwrap();
/// assert_eq!(decoded.label.as_deref(), Some("person"));
/// assert_eq!(decoded.properties.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyValues {
    items: Vec<PropertyValue>,
}

impl KeyValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(self, id: impl Into<Id>) -> Self {
        self.pair(ID_KEY, id.into())
    }

    pub fn label(self, label: impl Into<String>) -> Self {
        self.pair(LABEL_KEY, label.into())
    }

    pub fn property(self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.pair(key.into(), value)
    }

    /// Append a raw key/value pair
    pub fn pair(mut self, key: impl Into<PropertyValue>, value: impl Into<PropertyValue>) -> Self {
        self.items.push(key.into());
        self.items.push(value.into());
        self
    }

    pub fn as_slice(&self) -> &[PropertyValue] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn decode(&self) -> DriverResult<Decoded> {
        decode(&self.items)
    }
}

impl From<Vec<PropertyValue>> for KeyValues {
    fn from(items: Vec<PropertyValue>) -> Self {
        KeyValues { items }
    }
}
