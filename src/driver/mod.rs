//! Graph manager and paginated iteration

pub mod iterator;
pub mod manager;

pub use iterator::{EdgePages, GraphIterator, PageFetcher, VertexPages};
pub use manager::GraphManager;
