use async_trait::async_trait;

use crate::types::{SearchQuery, SearchResultItem};
use crate::Result;

#[async_trait]
pub trait NewsSearch: Send + Sync {
    /// Run one search call and return its items in upstream order
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResultItem>>;
}
