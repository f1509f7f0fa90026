use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const MAX_DISPLAY: u32 = 100;
pub const MAX_START: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchSort {
    #[serde(rename = "sim")]
    Relevance,
    #[serde(rename = "date")]
    Date,
}

impl SearchSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchSort::Relevance => "sim",
            SearchSort::Date => "date",
        }
    }
}

/// Parameters of one news search call. Only constructible within the
/// bounds the upstream API accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    query: String,
    display: u32,
    start: u32,
    sort: SearchSort,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>, display: u32, start: u32, sort: SearchSort) -> Result<Self> {
        if !(1..=MAX_DISPLAY).contains(&display) {
            return Err(Error::InvalidQuery(format!(
                "display must be between 1 and {}, got {}",
                MAX_DISPLAY, display
            )));
        }
        if !(1..=MAX_START).contains(&start) {
            return Err(Error::InvalidQuery(format!(
                "start must be between 1 and {}, got {}",
                MAX_START, start
            )));
        }
        Ok(Self {
            query: query.into(),
            display,
            start,
            sort,
        })
    }

    /// The `n` most recent results for `query`.
    pub fn recent(query: impl Into<String>, n: u32) -> Result<Self> {
        Self::new(query, n, 1, SearchSort::Date)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn display(&self) -> u32 {
        self.display
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn sort(&self) -> SearchSort {
        self.sort
    }

    pub fn to_params(&self) -> [(&'static str, String); 4] {
        [
            ("query", self.query.clone()),
            ("display", self.display.to_string()),
            ("start", self.start.to_string()),
            ("sort", self.sort.as_str().to_string()),
        ]
    }
}

/// One entry of the upstream `items` array. `title` still carries HTML
/// entities and highlight markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub title: String,
    pub link: String,
    #[serde(default, rename = "originallink")]
    pub original_link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "pubDate")]
    pub pub_date: Option<String>,
}

impl SearchResultItem {
    pub fn published_at(&self) -> Option<DateTime<FixedOffset>> {
        self.pub_date
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc2822(d).ok())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, rename = "lastBuildDate")]
    pub last_build_date: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub start: Option<u32>,
    #[serde(default)]
    pub display: Option<u32>,
    #[serde(default)]
    pub items: Vec<SearchResultItem>,
}

/// What the endpoint returns for each article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub link: String,
    pub content: String,
}

/// Result of processing a single search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Fetched(ArticleRecord),
    Failed {
        title: String,
        link: String,
        reason: String,
    },
}

impl ItemOutcome {
    pub fn link(&self) -> &str {
        match self {
            ItemOutcome::Fetched(record) => &record.link,
            ItemOutcome::Failed { link, .. } => link,
        }
    }

    pub fn is_fetched(&self) -> bool {
        matches!(self, ItemOutcome::Fetched(_))
    }
}
