//! Vertex and edge facade over the resource collaborators
//!
//! The manager owns one vertex and one edge resource collaborator and
//! attaches itself to every element it hands out, so that returned elements
//! can keep updating themselves on the server they came from.

use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, info};

use super::iterator::{EdgePages, GraphIterator, VertexPages};
use crate::api::{
    EdgeApi, EdgeQuery, EdgeResource, MemoryGraph, RestClient, VertexApi, VertexQuery,
    VertexResource,
};
use crate::config::ClientConfig;
use crate::error::{DriverError, DriverResult};
use crate::structure::{Direction, Edge, GraphElement, Id, KeyValues, Vertex};

pub(crate) struct ManagerInner {
    vertices: Arc<dyn VertexResource>,
    edges: Arc<dyn EdgeResource>,
    page_size: usize,
}

/// Facade over the vertex and edge resources of one graph
///
/// Cloning is cheap and clones share the same collaborators. Elements only
/// keep a weak handle to the manager: once every clone is dropped, attached
/// elements can no longer update themselves.
///
/// ```rust
/// use graph_driver::{GraphManager, KeyValues, VertexQuery};
///
/// let manager = GraphManager::in_memory();
/// let marko = manager
///     .add_vertex_with(KeyValues::new().label("person").property("name", "marko"))
///     .unwrap();
/// assert!(marko.id().is_some());
///
/// let people = manager.list_vertices(&VertexQuery::new().label("person")).unwrap();
/// assert_eq!(people.len(), 1);
/// ```
#[derive(Clone)]
pub struct GraphManager {
    inner: Arc<ManagerInner>,
}

impl fmt::Debug for GraphManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphManager")
            .field("page_size", &self.inner.page_size)
            .finish_non_exhaustive()
    }
}

impl GraphManager {
    /// Create a manager over the given collaborators
    pub fn new(vertices: Arc<dyn VertexResource>, edges: Arc<dyn EdgeResource>) -> Self {
        Self::with_page_size(vertices, edges, ClientConfig::default().page_size)
    }

    pub fn with_page_size(
        vertices: Arc<dyn VertexResource>,
        edges: Arc<dyn EdgeResource>,
        page_size: usize,
    ) -> Self {
        GraphManager {
            inner: Arc::new(ManagerInner {
                vertices,
                edges,
                page_size,
            }),
        }
    }

    /// Connect to the graph described by `config` over HTTP
    pub fn connect(config: &ClientConfig) -> DriverResult<Self> {
        config.validate()?;
        let client = Arc::new(RestClient::from_config(config)?);
        info!("Connected graph manager to {} (graph '{}')", config.url, config.graph);
        Ok(Self::with_page_size(
            Arc::new(VertexApi::new(Arc::clone(&client), &config.graph)),
            Arc::new(EdgeApi::new(client, &config.graph)),
            config.page_size,
        ))
    }

    /// Manager over a fresh in-process [`MemoryGraph`]
    pub fn in_memory() -> Self {
        let graph = Arc::new(MemoryGraph::new());
        Self::new(graph.clone(), graph)
    }

    /// Configured default page size for iteration
    pub fn page_size(&self) -> usize {
        self.inner.page_size
    }

    pub(crate) fn downgrade(&self) -> Weak<ManagerInner> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn from_inner(inner: Arc<ManagerInner>) -> Self {
        GraphManager { inner }
    }

    fn attach<T: GraphElement>(&self, mut element: T) -> T {
        element.attach(self);
        element
    }

    fn attach_all<T: GraphElement>(&self, elements: Vec<T>) -> Vec<T> {
        elements.into_iter().map(|e| self.attach(e)).collect()
    }

    // ============================================================
    // Vertices
    // ============================================================

    /// Create a vertex; the server assigns the id unless one is set
    pub fn add_vertex(&self, vertex: Vertex) -> DriverResult<Vertex> {
        let created = self.inner.vertices.create(&vertex)?;
        debug!("Added vertex {:?}", created.id());
        Ok(self.attach(created))
    }

    /// Create a vertex from a key/value list
    pub fn add_vertex_with(&self, key_values: impl Into<KeyValues>) -> DriverResult<Vertex> {
        let decoded = key_values.into().decode()?;
        let mut vertex = Vertex::default();
        if let Some(label) = decoded.label {
            vertex.set_label(label)?;
        }
        if let Some(id) = decoded.id {
            vertex.set_id(id)?;
        }
        vertex.set_properties(decoded.properties);
        self.add_vertex(vertex)
    }

    /// Create many vertices; ids are filled in request order
    pub fn add_vertices(&self, mut vertices: Vec<Vertex>) -> DriverResult<Vec<Vertex>> {
        let ids = self.inner.vertices.create_batch(&vertices)?;
        if ids.len() != vertices.len() {
            return Err(DriverError::Protocol(format!(
                "expected {} vertex ids, server returned {}",
                vertices.len(),
                ids.len()
            )));
        }
        for (vertex, id) in vertices.iter_mut().zip(ids) {
            vertex.assign_id(id);
            vertex.attach(self);
        }
        debug!("Added {} vertices", vertices.len());
        Ok(vertices)
    }

    pub fn get_vertex(&self, id: &Id) -> DriverResult<Vertex> {
        let vertex = self.inner.vertices.get(id)?;
        Ok(self.attach(vertex))
    }

    /// List vertices in one request, honoring `query.limit`
    pub fn list_vertices(&self, query: &VertexQuery) -> DriverResult<Vec<Vertex>> {
        let page = self.inner.vertices.list(query, None, query.limit)?;
        Ok(self.attach_all(page.results))
    }

    /// Iterate over matching vertices, `page_size` at a time. `query.limit`
    /// is ignored.
    pub fn iterate_vertices(
        &self,
        query: &VertexQuery,
        page_size: usize,
    ) -> DriverResult<GraphIterator<VertexPages>> {
        check_page_size(page_size)?;
        let fetcher = VertexPages::new(Arc::clone(&self.inner.vertices), query.clone(), page_size);
        Ok(GraphIterator::new(self.clone(), fetcher))
    }

    pub fn remove_vertex(&self, id: &Id) -> DriverResult<()> {
        self.inner.vertices.delete(id)?;
        debug!("Removed vertex {}", id);
        Ok(())
    }

    /// Add or overwrite the properties carried by `vertex` on the server
    pub fn append_vertex_property(&self, vertex: &Vertex) -> DriverResult<Vertex> {
        require_id(vertex.id().is_some(), "vertex")?;
        let updated = self.inner.vertices.append(vertex)?;
        Ok(self.attach(updated))
    }

    /// Remove the properties named by `vertex` on the server
    pub fn eliminate_vertex_property(&self, vertex: &Vertex) -> DriverResult<Vertex> {
        require_id(vertex.id().is_some(), "vertex")?;
        let updated = self.inner.vertices.eliminate(vertex)?;
        Ok(self.attach(updated))
    }

    // ============================================================
    // Edges
    // ============================================================

    /// Create an edge. Edge ids are always assigned by the server.
    pub fn add_edge(&self, edge: Edge) -> DriverResult<Edge> {
        reject_edge_id(&edge)?;
        let created = self.inner.edges.create(&edge)?;
        debug!("Added edge {:?}", created.id());
        Ok(self.attach(created))
    }

    /// Create an edge between two vertex ids with properties from a
    /// key/value list
    pub fn add_edge_with(
        &self,
        source: impl Into<Id>,
        label: impl Into<String>,
        target: impl Into<Id>,
        properties: impl Into<KeyValues>,
    ) -> DriverResult<Edge> {
        let label = label.into();
        let decoded = properties.into().decode()?;
        check_edge_label(decoded.label.as_deref(), &label)?;
        let mut edge = Edge::between(source, label, target);
        if let Some(id) = decoded.id {
            edge.set_id(id.to_string())?;
        }
        edge.set_properties(decoded.properties);
        self.add_edge(edge)
    }

    /// Create an edge between two created vertices, carrying their labels
    pub fn add_edge_between(
        &self,
        source: &Vertex,
        label: impl Into<String>,
        target: &Vertex,
        properties: impl Into<KeyValues>,
    ) -> DriverResult<Edge> {
        let (source_id, target_id) = match (source.id(), target.id()) {
            (Some(s), Some(t)) => (s.clone(), t.clone()),
            _ => {
                return Err(DriverError::InvalidOperation(
                    "both endpoints must be created before linking them".to_string(),
                ))
            }
        };
        let label = label.into();
        let decoded = properties.into().decode()?;
        check_edge_label(decoded.label.as_deref(), &label)?;
        let mut edge = Edge::between(source_id, label, target_id);
        if let Some(label) = source.label() {
            edge.set_source_label(label);
        }
        if let Some(label) = target.label() {
            edge.set_target_label(label);
        }
        if let Some(id) = decoded.id {
            edge.set_id(id.to_string())?;
        }
        edge.set_properties(decoded.properties);
        self.add_edge(edge)
    }

    /// Create many edges; ids are filled in request order
    pub fn add_edges(&self, mut edges: Vec<Edge>, check_vertex: bool) -> DriverResult<Vec<Edge>> {
        for edge in &edges {
            reject_edge_id(edge)?;
        }
        let ids = self.inner.edges.create_batch(&edges, check_vertex)?;
        if ids.len() != edges.len() {
            return Err(DriverError::Protocol(format!(
                "expected {} edge ids, server returned {}",
                edges.len(),
                ids.len()
            )));
        }
        for (edge, id) in edges.iter_mut().zip(ids) {
            edge.assign_id(id);
            edge.attach(self);
        }
        debug!("Added {} edges", edges.len());
        Ok(edges)
    }

    pub fn get_edge(&self, id: &str) -> DriverResult<Edge> {
        let edge = self.inner.edges.get(id)?;
        Ok(self.attach(edge))
    }

    /// List edges in one request, honoring `query.limit`. Without a vertex
    /// the listing is global and the direction is ignored.
    pub fn list_edges(&self, query: &EdgeQuery) -> DriverResult<Vec<Edge>> {
        let page = self.inner.edges.list(query, None, query.limit)?;
        Ok(self.attach_all(page.results))
    }

    /// Edges incident on `vertex_id` in `direction`
    pub fn get_edges(
        &self,
        vertex_id: impl Into<Id>,
        direction: Direction,
    ) -> DriverResult<Vec<Edge>> {
        self.list_edges(&EdgeQuery::of_vertex(vertex_id).direction(direction))
    }

    pub fn iterate_edges(
        &self,
        query: &EdgeQuery,
        page_size: usize,
    ) -> DriverResult<GraphIterator<EdgePages>> {
        check_page_size(page_size)?;
        let fetcher = EdgePages::new(Arc::clone(&self.inner.edges), query.clone(), page_size);
        Ok(GraphIterator::new(self.clone(), fetcher))
    }

    pub fn remove_edge(&self, id: &str) -> DriverResult<()> {
        self.inner.edges.delete(id)?;
        debug!("Removed edge {}", id);
        Ok(())
    }

    pub fn append_edge_property(&self, edge: &Edge) -> DriverResult<Edge> {
        require_id(edge.id().is_some(), "edge")?;
        let updated = self.inner.edges.append(edge)?;
        Ok(self.attach(updated))
    }

    pub fn eliminate_edge_property(&self, edge: &Edge) -> DriverResult<Edge> {
        require_id(edge.id().is_some(), "edge")?;
        let updated = self.inner.edges.eliminate(edge)?;
        Ok(self.attach(updated))
    }
}

fn require_id(has_id: bool, kind: &str) -> DriverResult<()> {
    if has_id {
        Ok(())
    } else {
        Err(DriverError::InvalidOperation(format!(
            "{} has no id, create it before updating its properties",
            kind
        )))
    }
}

fn reject_edge_id(edge: &Edge) -> DriverResult<()> {
    match edge.id() {
        Some(id) => Err(DriverError::InvalidOperation(format!(
            "not allowed to custom id for edge: '{}'",
            id
        ))),
        None => Ok(()),
    }
}

// A `~label` in the key/value list may only repeat the explicit label
fn check_edge_label(decoded: Option<&str>, label: &str) -> DriverResult<()> {
    match decoded {
        Some(other) if other != label => Err(DriverError::Argument(format!(
            "edge label is '{}', but the key/value list names '{}'",
            label, other
        ))),
        _ => Ok(()),
    }
}

fn check_page_size(page_size: usize) -> DriverResult<()> {
    if page_size == 0 {
        return Err(DriverError::Argument("page size must be positive".to_string()));
    }
    Ok(())
}
