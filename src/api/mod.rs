//! Resource collaborators
//!
//! A resource collaborator performs the I/O for one element kind. The
//! [`GraphManager`](crate::GraphManager) only talks to the
//! [`VertexResource`] and [`EdgeResource`] traits; two implementations ship
//! with the driver:
//!
//! - **REST** ([`VertexApi`], [`EdgeApi`]) talks to a graph server over HTTP
//! - **In-memory** ([`MemoryGraph`]) keeps the graph in process, for
//!   tests and embedded use
//!
//! # Paging
//!
//! `list` takes a `page` argument: `None` requests a bounded, unpaged
//! listing, `Some("")` the first page of a paged listing and `Some(token)`
//! the page a previous answer pointed to. A paged answer carries the token
//! of the following page, or `None` once there is nothing left.

pub mod edge;
pub mod memory;
pub mod rest;
pub mod vertex;

pub use edge::EdgeApi;
pub use memory::MemoryGraph;
pub use rest::RestClient;
pub use vertex::VertexApi;

use crate::error::DriverResult;
use crate::structure::{Direction, Edge, Id, PropertyMap, PropertyValue, Vertex};

/// One page of a listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub results: Vec<T>,
    /// Token of the next page, `None` when no further page exists
    pub page: Option<String>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, page: Option<String>) -> Self {
        Page { results, page }
    }

    pub fn last(results: Vec<T>) -> Self {
        Page { results, page: None }
    }
}

/// Filter for vertex listings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexQuery {
    pub label: Option<String>,
    /// Property equality constraints, all of which must match
    pub properties: PropertyMap,
    /// Maximum number of results; `None` means all. Ignored by iteration.
    pub limit: Option<usize>,
}

impl VertexQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `vertex` satisfies the label and property filters
    pub fn matches(&self, vertex: &Vertex) -> bool {
        if let Some(label) = &self.label {
            if vertex.label() != Some(label.as_str()) {
                return false;
            }
        }
        properties_match(&self.properties, vertex)
    }
}

/// Filter for edge listings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeQuery {
    /// Restrict to edges incident on this vertex
    pub vertex_id: Option<Id>,
    /// Direction relative to `vertex_id`, `Both` when unset
    pub direction: Option<Direction>,
    pub label: Option<String>,
    pub properties: PropertyMap,
    pub limit: Option<usize>,
}

impl EdgeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Edges incident on `vertex_id` in any direction
    pub fn of_vertex(vertex_id: impl Into<Id>) -> Self {
        EdgeQuery {
            vertex_id: Some(vertex_id.into()),
            ..Default::default()
        }
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Direction to send to the server: only meaningful with a vertex
    pub fn effective_direction(&self) -> Option<Direction> {
        self.vertex_id
            .as_ref()
            .map(|_| self.direction.unwrap_or_default())
    }

    pub fn matches(&self, edge: &Edge) -> bool {
        if let Some(vertex_id) = &self.vertex_id {
            let out = edge.source() == Some(vertex_id);
            let inc = edge.target() == Some(vertex_id);
            let incident = match self.effective_direction().unwrap_or_default() {
                Direction::Out => out,
                Direction::In => inc,
                Direction::Both => out || inc,
            };
            if !incident {
                return false;
            }
        }
        if let Some(label) = &self.label {
            if edge.label() != label {
                return false;
            }
        }
        properties_match(&self.properties, edge)
    }
}

fn properties_match(expected: &PropertyMap, element: &impl crate::structure::GraphElement) -> bool {
    expected
        .iter()
        .all(|(key, value)| element.property(key) == Some(value))
}

/// Vertex resource collaborator
pub trait VertexResource: Send + Sync {
    /// Create one vertex; the answer carries its id
    fn create(&self, vertex: &Vertex) -> DriverResult<Vertex>;

    /// Create many vertices; one id per input, in input order
    fn create_batch(&self, vertices: &[Vertex]) -> DriverResult<Vec<Id>>;

    fn get(&self, id: &Id) -> DriverResult<Vertex>;

    fn list(
        &self,
        query: &VertexQuery,
        page: Option<&str>,
        limit: Option<usize>,
    ) -> DriverResult<Page<Vertex>>;

    fn delete(&self, id: &Id) -> DriverResult<()>;

    /// Add or overwrite the properties present on `vertex`
    fn append(&self, vertex: &Vertex) -> DriverResult<Vertex>;

    /// Remove the properties named on `vertex`
    fn eliminate(&self, vertex: &Vertex) -> DriverResult<Vertex>;
}

/// Edge resource collaborator
pub trait EdgeResource: Send + Sync {
    fn create(&self, edge: &Edge) -> DriverResult<Edge>;

    /// Create many edges; with `check_vertex` the server verifies that both
    /// endpoints of every edge exist
    fn create_batch(&self, edges: &[Edge], check_vertex: bool) -> DriverResult<Vec<String>>;

    fn get(&self, id: &str) -> DriverResult<Edge>;

    fn list(
        &self,
        query: &EdgeQuery,
        page: Option<&str>,
        limit: Option<usize>,
    ) -> DriverResult<Page<Edge>>;

    fn delete(&self, id: &str) -> DriverResult<()>;

    fn append(&self, edge: &Edge) -> DriverResult<Edge>;

    fn eliminate(&self, edge: &Edge) -> DriverResult<Edge>;
}
