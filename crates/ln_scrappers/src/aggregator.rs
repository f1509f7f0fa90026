use std::sync::Arc;

use ln_core::{
    ArticleFetcher, ArticleRecord, FetchFailurePolicy, ItemOutcome, NewsSearch, Pacer, Result,
    SearchQuery, SearchResultItem,
};
use tracing::{error, info, warn};

use crate::cleaner::clean_title;

/// Number of articles the `/last-news` endpoint asks for.
pub const DEFAULT_RECENT_COUNT: u32 = 5;

/// Runs one search and scrapes every hit, strictly one after another.
///
/// Fetches are never issued concurrently: each one is followed by a
/// [`Pacer::wait`] before the next begins, which keeps the load on the
/// publisher's site low.
pub struct NewsAggregator {
    search: Arc<dyn NewsSearch>,
    fetcher: Arc<dyn ArticleFetcher>,
    pacer: Arc<dyn Pacer>,
    policy: FetchFailurePolicy,
}

impl NewsAggregator {
    pub fn new(
        search: Arc<dyn NewsSearch>,
        fetcher: Arc<dyn ArticleFetcher>,
        pacer: Arc<dyn Pacer>,
    ) -> Self {
        Self {
            search,
            fetcher,
            pacer,
            policy: FetchFailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FetchFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FetchFailurePolicy {
        self.policy
    }

    async fn search_recent(&self, query: &str, n: u32) -> Result<Vec<SearchResultItem>> {
        let query = SearchQuery::recent(query, n)?;
        let items = self.search.search(&query).await?;
        info!("🔍 Found {} articles for {:?}", items.len(), query.query());
        Ok(items)
    }

    async fn scrape_item(&self, item: &SearchResultItem) -> Result<ArticleRecord> {
        let content = self.fetcher.fetch_and_clean(&item.link).await?;
        self.pacer.wait().await;
        Ok(ArticleRecord {
            title: clean_title(&item.title),
            link: item.link.clone(),
            content,
        })
    }

    /// The `n` most recent articles for `query`, in search-result order.
    ///
    /// A failed article is handled according to the configured
    /// [`FetchFailurePolicy`]; with `Abort` the first failure is returned and
    /// the remaining articles are not fetched.
    pub async fn recent_news(&self, query: &str, n: u32) -> Result<Vec<ArticleRecord>> {
        let items = self.search_recent(query, n).await?;
        let total = items.len();
        let mut records = Vec::with_capacity(total);

        for (i, item) in items.iter().enumerate() {
            match self.scrape_item(item).await {
                Ok(record) => {
                    info!("📰 [{}/{}] {}", i + 1, total, record.title);
                    records.push(record);
                }
                Err(e) => match self.policy {
                    FetchFailurePolicy::Abort => {
                        error!(link = %item.link, error = %e, "article fetch failed, aborting batch");
                        return Err(e);
                    }
                    FetchFailurePolicy::Skip => {
                        warn!(link = %item.link, error = %e, "article fetch failed, skipping");
                        self.pacer.wait().await;
                    }
                    FetchFailurePolicy::Empty => {
                        warn!(link = %item.link, error = %e, "article fetch failed, keeping empty content");
                        self.pacer.wait().await;
                        records.push(ArticleRecord {
                            title: clean_title(&item.title),
                            link: item.link.clone(),
                            content: String::new(),
                        });
                    }
                },
            }
        }

        Ok(records)
    }

    /// Like [`recent_news`](Self::recent_news) but reports every article's
    /// result instead of applying the failure policy. Only a failed search is
    /// an error here.
    pub async fn collect_outcomes(&self, query: &str, n: u32) -> Result<Vec<ItemOutcome>> {
        let items = self.search_recent(query, n).await?;
        let mut outcomes = Vec::with_capacity(items.len());

        for item in &items {
            let outcome = match self.scrape_item(item).await {
                Ok(record) => ItemOutcome::Fetched(record),
                Err(e) => {
                    warn!(link = %item.link, error = %e, "article fetch failed");
                    self.pacer.wait().await;
                    ItemOutcome::Failed {
                        title: clean_title(&item.title),
                        link: item.link.clone(),
                        reason: e.to_string(),
                    }
                }
            };
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}
