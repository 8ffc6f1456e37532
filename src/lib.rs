//! Graph Driver: client library for a remote property-graph server
//!
//! The driver mirrors server-side vertices and edges as local values and
//! routes every mutation through a [`GraphManager`]:
//!
//! - **Name validation** ([`util::check_name`]) for graph and schema names
//! - **Property codec** ([`KeyValues`], [`structure::decode`]) turning flat
//!   key/value argument lists into id, label and properties
//! - **Entity model** ([`Vertex`], [`Edge`]) with a weak back-reference to
//!   the manager that returned them
//! - **Paginated iteration** ([`GraphIterator`]) fetching one page at a time
//!
//! Two resource backends ship with the driver: the REST collaborators
//! ([`api::VertexApi`], [`api::EdgeApi`]) for a running server, and
//! [`MemoryGraph`] for in-process use.
//!
//! ## Example Usage
//!
//! ```rust
//! use graph_driver::{GraphManager, KeyValues, VertexQuery};
//!
//! let manager = GraphManager::in_memory();
//!
//! let marko = manager
//!     .add_vertex_with(KeyValues::new().label("person").property("name", "marko"))
//!     .unwrap();
//! let josh = manager
//!     .add_vertex_with(KeyValues::new().label("person").property("name", "josh"))
//!     .unwrap();
//! manager
//!     .add_edge_between(&marko, "knows", &josh, KeyValues::new().property("weight", 1.0))
//!     .unwrap();
//!
//! let people: Vec<_> = manager
//!     .iterate_vertices(&VertexQuery::new().label("person"), 1)
//!     .unwrap()
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(people.len(), 2);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod config;
pub mod driver;
pub mod error;
pub mod structure;
pub mod util;

// Re-export main types for convenience
pub use api::{EdgeQuery, EdgeResource, MemoryGraph, Page, VertexQuery, VertexResource};

pub use config::ClientConfig;

pub use driver::{EdgePages, GraphIterator, GraphManager, PageFetcher, VertexPages};

pub use error::{DriverError, DriverResult};

pub use structure::{
    Direction, Edge, GraphElement, Id, KeyValues, PropertyMap, PropertyValue, Vertex, ID_KEY,
    LABEL_KEY,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
