use async_trait::async_trait;
use ln_core::{ArticleFetcher, CleaningRules, Error, Result};
use tracing::{debug, info};

use crate::cleaner::ArticleCleaner;

/// Downloads article pages and runs them through an [`ArticleCleaner`].
#[derive(Debug, Clone)]
pub struct ArticleScraper {
    client: reqwest::Client,
    cleaner: ArticleCleaner,
}

impl ArticleScraper {
    pub fn new(client: reqwest::Client, rules: &CleaningRules) -> Result<Self> {
        Ok(Self {
            client,
            cleaner: ArticleCleaner::new(rules)?,
        })
    }

    pub fn cleaner(&self) -> &ArticleCleaner {
        &self.cleaner
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let fetch_error = |reason: String| Error::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}", status)));
        }

        response.text().await.map_err(|e| fetch_error(e.to_string()))
    }
}

#[async_trait]
impl ArticleFetcher for ArticleScraper {
    async fn fetch_and_clean(&self, url: &str) -> Result<String> {
        debug!(%url, "fetching article");
        let html = self.fetch_html(url).await?;
        let text = self.cleaner.clean(&html);
        info!(%url, html_bytes = html.len(), text_chars = text.chars().count(), "cleaned article");
        Ok(text)
    }
}
