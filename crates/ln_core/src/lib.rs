pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod pacing;
pub mod search;
pub mod types;

pub use config::{CleaningRules, Credentials, FetchFailurePolicy, Settings};
pub use error::{Error, Result, SearchErrorCode};
pub use fetch::ArticleFetcher;
pub use pacing::{NoDelay, Pacer, RandomDelay};
pub use search::NewsSearch;
pub use types::{ArticleRecord, ItemOutcome, SearchQuery, SearchResponse, SearchResultItem, SearchSort};
