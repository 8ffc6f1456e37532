//! Edge: local mirror of a server-side edge

use serde::{Deserialize, Serialize};

use crate::driver::manager::GraphManager;
use crate::error::{DriverError, DriverResult};

use super::element::{check_property_key, deserialize_properties, Attachment, GraphElement};
use super::property::{PropertyMap, PropertyValue};
use super::types::Id;

/// A directed edge of the remote graph
///
/// Edge ids are always assigned by the server. The label is fixed when the
/// edge is constructed; source and target are set before creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    label: String,

    /// Source vertex (edge goes FROM this vertex)
    #[serde(rename = "outV", default, skip_serializing_if = "Option::is_none")]
    source: Option<Id>,

    #[serde(rename = "outVLabel", default, skip_serializing_if = "Option::is_none")]
    source_label: Option<String>,

    /// Target vertex (edge goes TO this vertex)
    #[serde(rename = "inV", default, skip_serializing_if = "Option::is_none")]
    target: Option<Id>,

    #[serde(rename = "inVLabel", default, skip_serializing_if = "Option::is_none")]
    target_label: Option<String>,

    #[serde(default, deserialize_with = "deserialize_properties")]
    properties: PropertyMap,

    #[serde(skip)]
    attachment: Attachment,
}

impl Edge {
    pub fn new(label: impl Into<String>) -> Self {
        Edge {
            id: None,
            label: label.into(),
            source: None,
            source_label: None,
            target: None,
            target_label: None,
            properties: PropertyMap::new(),
            attachment: Attachment::default(),
        }
    }

    /// Create an edge between two vertex ids
    pub fn between(source: impl Into<Id>, label: impl Into<String>, target: impl Into<Id>) -> Self {
        let mut edge = Edge::new(label);
        edge.source = Some(source.into());
        edge.target = Some(target.into());
        edge
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Set the id of an edge. Only edges read back from the server carry
    /// one; creating an edge with an id set is rejected by the manager.
    pub fn set_id(&mut self, id: impl Into<String>) -> DriverResult<()> {
        let id = id.into();
        match &self.id {
            Some(current) if *current != id => Err(DriverError::InvalidOperation(format!(
                "edge id is already set to '{}'",
                current
            ))),
            _ => {
                self.id = Some(id);
                Ok(())
            }
        }
    }

    pub(crate) fn assign_id(&mut self, id: String) {
        self.id = Some(id);
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self) -> Option<&Id> {
        self.source.as_ref()
    }

    pub fn set_source(&mut self, source: impl Into<Id>) {
        self.source = Some(source.into());
    }

    pub fn source_label(&self) -> Option<&str> {
        self.source_label.as_deref()
    }

    pub fn set_source_label(&mut self, label: impl Into<String>) {
        self.source_label = Some(label.into());
    }

    pub fn target(&self) -> Option<&Id> {
        self.target.as_ref()
    }

    pub fn set_target(&mut self, target: impl Into<Id>) {
        self.target = Some(target.into());
    }

    pub fn target_label(&self) -> Option<&str> {
        self.target_label.as_deref()
    }

    pub fn set_target_label(&mut self, label: impl Into<String>) {
        self.target_label = Some(label.into());
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
    pub(crate) fn detached(&self) -> Edge {
        Edge {
            attachment: Attachment::default(),
            ..self.clone()
        }
    }

    /// Append one property on the server and refresh the local properties
    pub fn append_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> DriverResult<()> {
        let manager = self.attachment.manager("edge")?;
        let mut update = self.update_shell()?;
        update.set_property(key, value)?;
        let updated = manager.append_edge_property(&update)?;
        self.properties = updated.properties;
        Ok(())
    }

    /// Remove one property on the server and refresh the local properties
    pub fn eliminate_property(&mut self, key: &str) -> DriverResult<()> {
        let manager = self.attachment.manager("edge")?;
        let value = self.properties.get(key).cloned().unwrap_or(PropertyValue::Null);
        let mut update = self.update_shell()?;
        update.set_property(key, value)?;
        let updated = manager.eliminate_edge_property(&update)?;
        self.properties = updated.properties;
        Ok(())
    }

    fn update_shell(&self) -> DriverResult<Edge> {
        let id = self.id.clone().ok_or_else(|| {
            DriverError::InvalidOperation("edge has no id, create it first".to_string())
        })?;
        let mut shell = Edge::new(self.label.clone());
        shell.id = Some(id);
        shell.source = self.source.clone();
        shell.target = self.target.clone();
        Ok(shell)
    }
}

impl GraphElement for Edge {
    fn kind(&self) -> &'static str {
        "edge"
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

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.label == other.label
            && self.source == other.source
            && self.target == other.target
            && self.properties == other.properties
    }
}
