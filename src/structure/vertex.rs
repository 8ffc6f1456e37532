//! Vertex: local mirror of a server-side vertex

use serde::{Deserialize, Serialize};

use crate::driver::manager::GraphManager;
use crate::error::{DriverError, DriverResult};

use super::element::{check_property_key, deserialize_properties, Attachment, GraphElement};
use super::property::{PropertyMap, PropertyValue};
use super::types::Id;

/// A vertex of the remote graph
///
/// A vertex is built locally (optionally with a custom id), sent to the
/// server through a [`GraphManager`], and from then on mirrors the
/// server-side record. Vertices returned by the manager are attached and can
/// update their own properties with [`Vertex::append_property`] and
/// [`Vertex::eliminate_property`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<Id>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,

    #[serde(default, deserialize_with = "deserialize_properties")]
    properties: PropertyMap,

    /// Set once the vertex is known to exist on the server
    #[serde(skip_serializing, default = "from_server")]
    created: bool,

    #[serde(skip)]
    attachment: Attachment,
}

// Vertices only get deserialized from server answers
fn from_server() -> bool {
    true
}

impl Vertex {
    /// Create a new vertex with a label and no id
    pub fn new(label: impl Into<String>) -> Self {
        Vertex {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn id(&self) -> Option<&Id> {
        self.id.as_ref()
    }

    /// Set a custom id before creation. An id can't be changed once set.
    pub fn set_id(&mut self, id: impl Into<Id>) -> DriverResult<()> {
        let id = id.into();
        match &self.id {
            Some(current) if *current != id => Err(DriverError::InvalidOperation(format!(
                "vertex id is already set to '{}'",
                current
            ))),
            _ => {
                self.id = Some(id);
                Ok(())
            }
        }
    }

    /// Record the id the server assigned on creation
    pub(crate) fn assign_id(&mut self, id: Id) {
        self.id = Some(id);
        self.created = true;
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Change the label of a vertex that hasn't been created yet
    pub fn set_label(&mut self, label: impl Into<String>) -> DriverResult<()> {
        if self.created || self.attachment.is_attached() {
            return Err(DriverError::InvalidOperation(
                "label of a created vertex can't be changed".to_string(),
            ));
        }
        self.label = Some(label.into());
        Ok(())
    }

    /// Set a property value locally
    pub fn set_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> DriverResult<Option<PropertyValue>> {
        let key = key.into();
        check_property_key(&key)?;
        Ok(self.properties.insert(key, value.into()))
    }

    /// Remove a property locally
    pub fn remove_property(&mut self, key: &str) -> Option<PropertyValue> {
        self.properties.shift_remove(key)
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub(crate) fn set_properties(&mut self, properties: PropertyMap) {
        self.properties = properties;
    }

    pub(crate) fn properties_mut(&mut self) -> &mut PropertyMap {
        &mut self.properties
    }

    /// Copy without the back-reference
    pub(crate) fn detached(&self) -> Vertex {
        Vertex {
            id: self.id.clone(),
            label: self.label.clone(),
            properties: self.properties.clone(),
            created: self.created,
            attachment: Attachment::default(),
        }
    }

    /// Append (add or overwrite) one property on the server and refresh
    /// the local properties from the server's answer
    pub fn append_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> DriverResult<()> {
        let manager = self.attachment.manager("vertex")?;
        let mut update = self.update_shell()?;
        update.set_property(key, value)?;
        let updated = manager.append_vertex_property(&update)?;
        self.properties = updated.properties;
        Ok(())
    }

    /// Remove one property on the server and refresh the local properties
    pub fn eliminate_property(&mut self, key: &str) -> DriverResult<()> {
        let manager = self.attachment.manager("vertex")?;
        let value = self.properties.get(key).cloned().unwrap_or(PropertyValue::Null);
        let mut update = self.update_shell()?;
        update.set_property(key, value)?;
        let updated = manager.eliminate_vertex_property(&update)?;
        self.properties = updated.properties;
        Ok(())
    }

    // Same identity and label, no properties
    fn update_shell(&self) -> DriverResult<Vertex> {
        let id = self.id.clone().ok_or_else(|| {
            DriverError::InvalidOperation("vertex has no id, create it first".to_string())
        })?;
        Ok(Vertex {
            id: Some(id),
            label: self.label.clone(),
            ..Default::default()
        })
    }
}

impl GraphElement for Vertex {
    fn kind(&self) -> &'static str {
        "vertex"
    }

    fn attach(&mut self, manager: &GraphManager) {
        self.attachment = Attachment::to(manager);
    }

    fn is_attached(&self) -> bool {
        self.attachment.is_attached()
    }

    fn properties(&self) -> &PropertyMap {
        &self.properties
    }
}

// The attachment is a lookup handle, not part of the value
impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.label == other.label && self.properties == other.properties
    }
}
