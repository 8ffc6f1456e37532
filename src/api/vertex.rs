//! VertexApi: vertex resource over the REST transport

use serde::Deserialize;
use std::sync::Arc;

use super::rest::{encode_segment, RestClient};
use super::{Page, VertexQuery, VertexResource};
use crate::error::{DriverError, DriverResult};
use crate::structure::{Id, PropertyMap, Vertex};

/// Vertex endpoints of one graph: `graphs/{graph}/graph/vertices`
#[derive(Debug, Clone)]
pub struct VertexApi {
    client: Arc<RestClient>,
    path: String,
}

#[derive(Deserialize)]
struct VertexPage {
    vertices: Vec<Vertex>,
    #[serde(default)]
    page: Option<String>,
}

impl VertexApi {
    pub fn new(client: Arc<RestClient>, graph: &str) -> Self {
        Self {
            client,
            path: format!("graphs/{}/graph/vertices", graph),
        }
    }

    fn id_path(&self, id: &Id) -> String {
        format!("{}/{}", self.path, encode_segment(&id.to_json()))
    }

    fn update(&self, vertex: &Vertex, action: &str) -> DriverResult<Vertex> {
        let id = vertex.id().ok_or_else(|| {
            DriverError::InvalidOperation(format!(
                "can't {} properties of a vertex without id",
                action
            ))
        })?;
        self.client
            .put(&self.id_path(id), &[("action", action.to_string())], vertex)
    }
}

/// Query parameters shared by the vertex and edge listings
pub(crate) fn list_params(
    label: Option<&str>,
    properties: &PropertyMap,
    page: Option<&str>,
    limit: Option<usize>,
) -> DriverResult<Vec<(&'static str, String)>> {
    let mut params = Vec::new();
    if let Some(label) = label {
        params.push(("label", label.to_string()));
    }
    if !properties.is_empty() {
        params.push(("properties", serde_json::to_string(properties)?));
    }
    if let Some(page) = page {
        params.push(("page", page.to_string()));
    }
    let limit = limit.map(|l| l as i64).unwrap_or(-1);
    params.push(("limit", limit.to_string()));
    Ok(params)
}

impl VertexResource for VertexApi {
    fn create(&self, vertex: &Vertex) -> DriverResult<Vertex> {
        self.client.post(&self.path, &[], vertex)
    }

    fn create_batch(&self, vertices: &[Vertex]) -> DriverResult<Vec<Id>> {
        let path = format!("{}/batch", self.path);
        self.client.post(&path, &[], vertices)
    }

    fn get(&self, id: &Id) -> DriverResult<Vertex> {
        self.client.get(&self.id_path(id), &[])
    }

    fn list(
        &self,
        query: &VertexQuery,
        page: Option<&str>,
        limit: Option<usize>,
    ) -> DriverResult<Page<Vertex>> {
        let params = list_params(query.label.as_deref(), &query.properties, page, limit)?;
        let answer: VertexPage = self.client.get(&self.path, &params)?;
        Ok(Page::new(answer.vertices, answer.page))
    }

    fn delete(&self, id: &Id) -> DriverResult<()> {
        self.client.delete(&self.id_path(id), &[])
    }

    fn append(&self, vertex: &Vertex) -> DriverResult<Vertex> {
        self.update(vertex, "append")
    }

    fn eliminate(&self, vertex: &Vertex) -> DriverResult<Vertex> {
        self.update(vertex, "eliminate")
    }
}
