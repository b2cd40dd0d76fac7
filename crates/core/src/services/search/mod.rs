//! Search backend integration (Elasticsearch).

mod client;
mod indexer;
pub mod mappings;
mod scroll;

pub use client::{ElasticsearchClient, SearchClient, SearchClientService, SearchRequest};
pub use indexer::SearchIndexer;
pub use mappings::{FieldType, Mapping};
pub use scroll::Scroll;
