//! Behaviour shared by vertices and edges
//!
//! Every element returned by a [`GraphManager`] carries an [`Attachment`]:
//! a weak, lookup-only handle back to that manager. The handle never keeps
//! the manager alive; it only lets the element route further updates on
//! itself to the server it came from.

use serde::de::{Deserialize, Deserializer, Error as _};
use std::fmt;
use std::sync::Weak;

use crate::driver::manager::{GraphManager, ManagerInner};
use crate::error::{DriverError, DriverResult};

use super::property::{PropertyMap, PropertyValue};

/// Identity key marker in key/value argument lists
pub const ID_KEY: &str = "~id";

/// Label key marker in key/value argument lists
pub const LABEL_KEY: &str = "~label";

/// Non-owning back-reference from an element to its manager
#[derive(Clone, Default)]
pub struct Attachment(Option<Weak<ManagerInner>>);

impl Attachment {
    pub(crate) fn to(manager: &GraphManager) -> Self {
        Attachment(Some(manager.downgrade()))
    }

    pub fn is_attached(&self) -> bool {
        self.0.is_some()
    }

    /// Resolve the manager this element was attached to
    pub(crate) fn manager(&self, kind: &str) -> DriverResult<GraphManager> {
        let weak = self.0.as_ref().ok_or_else(|| {
            DriverError::InvalidOperation(format!(
                "{} is not attached to a graph manager",
                kind
            ))
        })?;
        weak.upgrade().map(GraphManager::from_inner).ok_or_else(|| {
            DriverError::Protocol(format!("graph manager of this {} has been dropped", kind))
        })
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(_) => f.write_str("Attached"),
            None => f.write_str("Detached"),
        }
    }
}

/// Common interface of [`Vertex`](super::Vertex) and [`Edge`](super::Edge)
pub trait GraphElement {
    /// Element kind, `"vertex"` or `"edge"`
    fn kind(&self) -> &'static str;

    /// Bind this element to `manager`. Idempotent; re-attaching replaces the handle.
    fn attach(&mut self, manager: &GraphManager);

    fn is_attached(&self) -> bool;

    fn properties(&self) -> &PropertyMap;

    fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties().get(key)
    }
}

/// Reject keys reserved for the identity and label markers
pub(crate) fn check_property_key(key: &str) -> DriverResult<()> {
    if key == ID_KEY || key == LABEL_KEY {
        return Err(DriverError::Argument(format!(
            "'{}' is reserved and can't be used as a property key",
            key
        )));
    }
    Ok(())
}

/// Deserialize a property map, refusing the reserved marker keys
pub(crate) fn deserialize_properties<'de, D>(deserializer: D) -> Result<PropertyMap, D::Error>
where
    D: Deserializer<'de>,
{
    let properties = PropertyMap::deserialize(deserializer)?;
    if let Some(key) = properties.keys().find(|k| check_property_key(k).is_err()) {
        return Err(D::Error::custom(format!(
            "'{}' is reserved and can't be used as a property key",
            key
        )));
    }
    Ok(properties)
}
