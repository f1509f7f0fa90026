pub mod aggregator;
pub mod cleaner;
pub mod fetcher;

pub use aggregator::{NewsAggregator, DEFAULT_RECENT_COUNT};
pub use cleaner::{clean_title, ArticleCleaner};
pub use fetcher::ArticleScraper;

pub mod prelude {
    pub use super::{clean_title, ArticleCleaner, ArticleScraper, NewsAggregator};
    pub use ln_core::{ArticleRecord, Error, Result};
}
