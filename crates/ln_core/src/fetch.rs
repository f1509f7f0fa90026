use async_trait::async_trait;

use crate::Result;

#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    /// Download the page at `url` and return its cleaned, single-line body text
    async fn fetch_and_clean(&self, url: &str) -> Result<String>;
}
