//! EdgeApi: edge resource over the REST transport

use serde::Deserialize;
use std::sync::Arc;

use super::rest::{encode_segment, RestClient};
use super::vertex::list_params;
use super::{EdgeQuery, EdgeResource, Page};
use crate::error::{DriverError, DriverResult};
use crate::structure::Edge;

/// Edge endpoints of one graph: `graphs/{graph}/graph/edges`
#[derive(Debug, Clone)]
pub struct EdgeApi {
    client: Arc<RestClient>,
    path: String,
}

#[derive(Deserialize)]
struct EdgePage {
    edges: Vec<Edge>,
    #[serde(default)]
    page: Option<String>,
}

impl EdgeApi {
    pub fn new(client: Arc<RestClient>, graph: &str) -> Self {
        Self {
            client,
            path: format!("graphs/{}/graph/edges", graph),
        }
    }

    fn id_path(&self, id: &str) -> String {
        format!("{}/{}", self.path, encode_segment(id))
    }

    fn update(&self, edge: &Edge, action: &str) -> DriverResult<Edge> {
        let id = edge.id().ok_or_else(|| {
            DriverError::InvalidOperation(format!(
                "can't {} properties of an edge without id",
                action
            ))
        })?;
        self.client
            .put(&self.id_path(id), &[("action", action.to_string())], edge)
    }
}

impl EdgeResource for EdgeApi {
    fn create(&self, edge: &Edge) -> DriverResult<Edge> {
        self.client.post(&self.path, &[], edge)
    }

    fn create_batch(&self, edges: &[Edge], check_vertex: bool) -> DriverResult<Vec<String>> {
        let path = format!("{}/batch", self.path);
        self.client
            .post(&path, &[("check_vertex", check_vertex.to_string())], edges)
    }

    fn get(&self, id: &str) -> DriverResult<Edge> {
        self.client.get(&self.id_path(id), &[])
    }

    fn list(
        &self,
        query: &EdgeQuery,
        page: Option<&str>,
        limit: Option<usize>,
    ) -> DriverResult<Page<Edge>> {
        let mut params = Vec::new();
        if let Some(vertex_id) = &query.vertex_id {
            params.push(("vertex_id", vertex_id.to_json()));
        }
        if let Some(direction) = query.effective_direction() {
            params.push(("direction", direction.as_str().to_string()));
        }
        params.extend(list_params(query.label.as_deref(), &query.properties, page, limit)?);

        let answer: EdgePage = self.client.get(&self.path, &params)?;
        Ok(Page::new(answer.edges, answer.page))
    }

    fn delete(&self, id: &str) -> DriverResult<()> {
        self.client.delete(&self.id_path(id), &[])
    }

    fn append(&self, edge: &Edge) -> DriverResult<Edge> {
        self.update(edge, "append")
    }

    fn eliminate(&self, edge: &Edge) -> DriverResult<Edge> {
        self.update(edge, "eliminate")
    }
}
