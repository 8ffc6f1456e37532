//! Graph element model
//!
//! This module implements the client-side data model:
//! - Vertices with an optional custom id, a label and properties
//! - Directed edges with server-assigned ids
//! - Property values in insertion order
//! - Key/value argument lists decoded into ids, labels and properties

pub mod edge;
pub mod element;
pub mod keyvalues;
pub mod property;
pub mod types;
pub mod vertex;

// Re-export main types
pub use edge::Edge;
pub use element::{Attachment, GraphElement, ID_KEY, LABEL_KEY};
pub use keyvalues::{decode, Decoded, KeyValues};
pub use property::{PropertyMap, PropertyValue};
pub use types::{Direction, Id};
pub use vertex::Vertex;
