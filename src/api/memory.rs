//! MemoryGraph: in-process vertex and edge resources
//!
//! Behaves like a graph server without any network: numeric ids are
//! assigned on creation, listings page through results with opaque tokens
//! and removing a vertex removes its edges. Ideal for tests, examples and
//! embedded use.

use indexmap::IndexMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use super::{EdgeQuery, EdgeResource, Page, VertexQuery, VertexResource};
use crate::error::{DriverError, DriverResult};
use crate::structure::{Edge, GraphElement, Id, Vertex};

#[derive(Debug, Default)]
struct State {
    vertices: IndexMap<Id, Vertex>,
    edges: IndexMap<String, Edge>,
    next_vertex_id: i64,
    next_edge_id: u64,
}

impl State {
    fn next_vertex_id(&mut self) -> Id {
        loop {
            self.next_vertex_id += 1;
            let id = Id::Number(self.next_vertex_id);
            if !self.vertices.contains_key(&id) {
                return id;
            }
        }
    }

    fn vertex(&self, id: &Id) -> DriverResult<&Vertex> {
        self.vertices
            .get(id)
            .ok_or_else(|| DriverError::NotFound(format!("vertex '{}' does not exist", id)))
    }

    fn vertex_mut(&mut self, id: &Id) -> DriverResult<&mut Vertex> {
        self.vertices
            .get_mut(id)
            .ok_or_else(|| DriverError::NotFound(format!("vertex '{}' does not exist", id)))
    }

    fn edge_mut(&mut self, id: &str) -> DriverResult<&mut Edge> {
        self.edges
            .get_mut(id)
            .ok_or_else(|| DriverError::NotFound(format!("edge '{}' does not exist", id)))
    }

    fn check_vertex(vertex: &Vertex) -> DriverResult<()> {
        if vertex.label().is_none() {
            return Err(bad_request("vertex label can't be null"));
        }
        Ok(())
    }

    fn insert_vertex(&mut self, vertex: &Vertex) -> Id {
        let mut stored = vertex.detached();
        let id = match vertex.id() {
            Some(id) => id.clone(),
            None => self.next_vertex_id(),
        };
        stored.assign_id(id.clone());
        // Custom ids overwrite an existing vertex
        self.vertices.insert(id.clone(), stored);
        id
    }

    // Validate endpoints; fills in their labels when `check_vertex` is set
    fn prepare_edge(&self, edge: &Edge, check_vertex: bool) -> DriverResult<Edge> {
        if edge.id().is_some() {
            return Err(bad_request("edge id is assigned by the server"));
        }
        let (source, target) = match (edge.source(), edge.target()) {
            (Some(source), Some(target)) => (source, target),
            _ => return Err(bad_request("edge source and target can't be null")),
        };
        let mut prepared = edge.detached();
        if check_vertex {
            let source_label = self.vertex(source)?.label().map(str::to_string);
            let target_label = self.vertex(target)?.label().map(str::to_string);
            if let Some(label) = source_label {
                prepared.set_source_label(label);
            }
            if let Some(label) = target_label {
                prepared.set_target_label(label);
            }
        }
        Ok(prepared)
    }

    fn insert_edge(&mut self, mut edge: Edge) -> String {
        self.next_edge_id += 1;
        let id = format!("E{}", self.next_edge_id);
        edge.assign_id(id.clone());
        self.edges.insert(id.clone(), edge);
        id
    }
}

fn bad_request(message: &str) -> DriverError {
    DriverError::Server {
        status: 400,
        message: message.to_string(),
    }
}

/// Slice `matching` according to the paging arguments
fn paginate<T: Clone>(matching: Vec<&T>, page: Option<&str>, limit: Option<usize>) -> DriverResult<Page<T>> {
    let Some(token) = page else {
        let take = limit.unwrap_or(matching.len());
        return Ok(Page::last(matching.into_iter().take(take).cloned().collect()));
    };

    let offset = if token.is_empty() {
        0
    } else {
        token
            .parse::<usize>()
            .map_err(|_| bad_request(&format!("invalid page token '{}'", token)))?
    };
    let size = limit.unwrap_or(matching.len()).max(1);
    let end = offset.saturating_add(size).min(matching.len());
    let results: Vec<T> = matching
        .get(offset..end)
        .unwrap_or_default()
        .iter()
        .map(|item| (*item).clone())
        .collect();
    let next = (end < matching.len()).then(|| end.to_string());
    Ok(Page::new(results, next))
}

/// In-process graph implementing both resource traits
#[derive(Debug, Default)]
pub struct MemoryGraph {
    state: RwLock<State>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> DriverResult<usize> {
        Ok(self.read()?.vertices.len())
    }

    pub fn edge_count(&self) -> DriverResult<usize> {
        Ok(self.read()?.edges.len())
    }

    fn read(&self) -> DriverResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| DriverError::Protocol("memory graph lock poisoned".to_string()))
    }

    fn write(&self) -> DriverResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| DriverError::Protocol("memory graph lock poisoned".to_string()))
    }
}

impl VertexResource for MemoryGraph {
    fn create(&self, vertex: &Vertex) -> DriverResult<Vertex> {
        State::check_vertex(vertex)?;
        let mut state = self.write()?;
        let id = state.insert_vertex(vertex);
        debug!("Created vertex {}", id);
        Ok(state.vertex(&id)?.clone())
    }

    fn create_batch(&self, vertices: &[Vertex]) -> DriverResult<Vec<Id>> {
        for vertex in vertices {
            State::check_vertex(vertex)?;
        }
        let mut state = self.write()?;
        let ids: Vec<Id> = vertices.iter().map(|v| state.insert_vertex(v)).collect();
        debug!("Created {} vertices", ids.len());
        Ok(ids)
    }

    fn get(&self, id: &Id) -> DriverResult<Vertex> {
        Ok(self.read()?.vertex(id)?.clone())
    }

    fn list(
        &self,
        query: &VertexQuery,
        page: Option<&str>,
        limit: Option<usize>,
    ) -> DriverResult<Page<Vertex>> {
        let state = self.read()?;
        let matching: Vec<&Vertex> = state.vertices.values().filter(|v| query.matches(v)).collect();
        paginate(matching, page, limit)
    }

    fn delete(&self, id: &Id) -> DriverResult<()> {
        let mut state = self.write()?;
        state
            .vertices
            .shift_remove(id)
            .ok_or_else(|| DriverError::NotFound(format!("vertex '{}' does not exist", id)))?;
        state
            .edges
            .retain(|_, edge| edge.source() != Some(id) && edge.target() != Some(id));
        debug!("Removed vertex {}", id);
        Ok(())
    }

    fn append(&self, vertex: &Vertex) -> DriverResult<Vertex> {
        let id = vertex
            .id()
            .ok_or_else(|| bad_request("vertex id can't be null"))?;
        let mut state = self.write()?;
        let stored = state.vertex_mut(id)?;
        for (key, value) in vertex.properties() {
            stored.properties_mut().insert(key.clone(), value.clone());
        }
        Ok(stored.clone())
    }

    fn eliminate(&self, vertex: &Vertex) -> DriverResult<Vertex> {
        let id = vertex
            .id()
            .ok_or_else(|| bad_request("vertex id can't be null"))?;
        let mut state = self.write()?;
        let stored = state.vertex_mut(id)?;
        for key in vertex.properties().keys() {
            stored.properties_mut().shift_remove(key);
        }
        Ok(stored.clone())
    }
}

impl EdgeResource for MemoryGraph {
    fn create(&self, edge: &Edge) -> DriverResult<Edge> {
        let mut state = self.write()?;
        let prepared = state.prepare_edge(edge, true)?;
        let id = state.insert_edge(prepared);
        debug!("Created edge {}", id);
        state
            .edges
            .get(&id)
            .cloned()
            .ok_or_else(|| DriverError::NotFound(format!("edge '{}' does not exist", id)))
    }

    fn create_batch(&self, edges: &[Edge], check_vertex: bool) -> DriverResult<Vec<String>> {
        let mut state = self.write()?;
        let prepared = edges
            .iter()
            .map(|edge| state.prepare_edge(edge, check_vertex))
            .collect::<DriverResult<Vec<Edge>>>()?;
        let ids: Vec<String> = prepared.into_iter().map(|e| state.insert_edge(e)).collect();
        debug!("Created {} edges", ids.len());
        Ok(ids)
    }

    fn get(&self, id: &str) -> DriverResult<Edge> {
        self.read()?
            .edges
            .get(id)
            .cloned()
            .ok_or_else(|| DriverError::NotFound(format!("edge '{}' does not exist", id)))
    }

    fn list(
        &self,
        query: &EdgeQuery,
        page: Option<&str>,
        limit: Option<usize>,
    ) -> DriverResult<Page<Edge>> {
        let state = self.read()?;
        let matching: Vec<&Edge> = state.edges.values().filter(|e| query.matches(e)).collect();
        paginate(matching, page, limit)
    }

    fn delete(&self, id: &str) -> DriverResult<()> {
        self.write()?
            .edges
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| DriverError::NotFound(format!("edge '{}' does not exist", id)))
    }

    fn append(&self, edge: &Edge) -> DriverResult<Edge> {
        let id = edge.id().ok_or_else(|| bad_request("edge id can't be null"))?;
        let mut state = self.write()?;
        let stored = state.edge_mut(id)?;
        for (key, value) in edge.properties() {
            stored.properties_mut().insert(key.clone(), value.clone());
        }
        Ok(stored.clone())
    }

    fn eliminate(&self, edge: &Edge) -> DriverResult<Edge> {
        let id = edge.id().ok_or_else(|| bad_request("edge id can't be null"))?;
        let mut state = self.write()?;
        let stored = state.edge_mut(id)?;
        for key in edge.properties().keys() {
            stored.properties_mut().shift_remove(key);
        }
        Ok(stored.clone())
    }
}
