//! Lazy page-by-page iteration over a remote listing
//!
//! [`GraphIterator`] is a small state machine: the token of the next page,
//! a buffer of fetched but not yet yielded elements and an `exhausted`
//! flag. It fetches a page only when the buffer runs dry, so a caller can
//! walk an arbitrarily large result set holding one page at a time.
//!
//! Iteration is single-pass. Building a new iterator re-issues the query
//! from the first page.

use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

use super::manager::GraphManager;
use crate::api::{EdgeQuery, EdgeResource, Page, VertexQuery, VertexResource};
use crate::error::DriverResult;
use crate::structure::{Edge, GraphElement, Vertex};

/// Source of pages for a [`GraphIterator`]
pub trait PageFetcher {
    type Item;

    /// Fetch the page identified by `page`; `None` requests the first page
    fn fetch_page(&mut self, page: Option<&str>) -> DriverResult<Page<Self::Item>>;
}

/// Iterator over the elements of a paged listing
///
/// Yields `Err` once if a page fetch fails and ends afterwards. The server
/// decides when the sequence ends: a page without a next token is the last
/// one, and the iterator imposes no limit of its own.
pub struct GraphIterator<F: PageFetcher> {
    manager: GraphManager,
    fetcher: F,
    page: Option<String>,
    buffer: VecDeque<F::Item>,
    exhausted: bool,
}

impl<F: PageFetcher> GraphIterator<F> {
    pub fn new(manager: GraphManager, fetcher: F) -> Self {
        Self {
            manager,
            fetcher,
            page: None,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Fetch pages until one yields elements or the listing ends
    fn fill(&mut self) -> DriverResult<()> {
        while self.buffer.is_empty() && !self.exhausted {
            let Page { results, page } = self.fetcher.fetch_page(self.page.as_deref())?;
            debug!(
                "Fetched page {:?}: {} elements, next {:?}",
                self.page,
                results.len(),
                page
            );
            self.exhausted = page.is_none();
            self.page = page;
            self.buffer.extend(results);
        }
        Ok(())
    }
}

impl<F> Iterator for GraphIterator<F>
where
    F: PageFetcher,
    F::Item: GraphElement,
{
    type Item = DriverResult<F::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(e) = self.fill() {
            // State after a failed fetch is unknown, stop here
            self.exhausted = true;
            self.buffer.clear();
            return Some(Err(e));
        }
        let mut element = self.buffer.pop_front()?;
        element.attach(&self.manager);
        Some(Ok(element))
    }
}

/// Pages of a vertex listing
pub struct VertexPages {
    resource: Arc<dyn VertexResource>,
    query: VertexQuery,
    page_size: usize,
}

impl VertexPages {
    pub fn new(resource: Arc<dyn VertexResource>, query: VertexQuery, page_size: usize) -> Self {
        Self {
            resource,
            query,
            page_size,
        }
    }
}

impl PageFetcher for VertexPages {
    type Item = Vertex;

    fn fetch_page(&mut self, page: Option<&str>) -> DriverResult<Page<Vertex>> {
        self.resource
            .list(&self.query, Some(page.unwrap_or("")), Some(self.page_size))
    }
}

/// Pages of an edge listing
pub struct EdgePages {
    resource: Arc<dyn EdgeResource>,
    query: EdgeQuery,
    page_size: usize,
}

impl EdgePages {
    pub fn new(resource: Arc<dyn EdgeResource>, query: EdgeQuery, page_size: usize) -> Self {
        Self {
            resource,
            query,
            page_size,
        }
    }
}

impl PageFetcher for EdgePages {
    type Item = Edge;

    fn fetch_page(&mut self, page: Option<&str>) -> DriverResult<Page<Edge>> {
        self.resource
            .list(&self.query, Some(page.unwrap_or("")), Some(self.page_size))
    }
}
