use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    #[error("Upstream search failed with HTTP {status}{}: {message}", code_suffix(.code))]
    UpstreamSearch {
        status: u16,
        code: Option<SearchErrorCode>,
        message: String,
    },

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn code_suffix(code: &Option<SearchErrorCode>) -> String {
    code.as_ref().map(|c| format!(" ({})", c)).unwrap_or_default()
}

/// Machine-readable error codes returned by the Naver search API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SearchErrorCode {
    /// SE01, HTTP 400
    InvalidQuery,
    /// SE02, HTTP 400
    InvalidDisplay,
    /// SE03, HTTP 400
    InvalidStart,
    /// SE04, HTTP 400
    InvalidSort,
    /// SE05, HTTP 404
    UnknownApi,
    /// SE06, HTTP 400
    MalformedEncoding,
    /// SE99, HTTP 500
    SystemError,
    Other(String),
}

impl SearchErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            SearchErrorCode::InvalidQuery => "SE01",
            SearchErrorCode::InvalidDisplay => "SE02",
            SearchErrorCode::InvalidStart => "SE03",
            SearchErrorCode::InvalidSort => "SE04",
            SearchErrorCode::UnknownApi => "SE05",
            SearchErrorCode::MalformedEncoding => "SE06",
            SearchErrorCode::SystemError => "SE99",
            SearchErrorCode::Other(code) => code,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            SearchErrorCode::InvalidQuery => "incorrect query request",
            SearchErrorCode::InvalidDisplay => "invalid display value",
            SearchErrorCode::InvalidStart => "invalid start value",
            SearchErrorCode::InvalidSort => "invalid sort value",
            SearchErrorCode::UnknownApi => "search api does not exist",
            SearchErrorCode::MalformedEncoding => "malformed encoding",
            SearchErrorCode::SystemError => "system error",
            SearchErrorCode::Other(_) => "unrecognized upstream error",
        }
    }
}

impl From<String> for SearchErrorCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "SE01" => SearchErrorCode::InvalidQuery,
            "SE02" => SearchErrorCode::InvalidDisplay,
            "SE03" => SearchErrorCode::InvalidStart,
            "SE04" => SearchErrorCode::InvalidSort,
            "SE05" => SearchErrorCode::UnknownApi,
            "SE06" => SearchErrorCode::MalformedEncoding,
            "SE99" => SearchErrorCode::SystemError,
            _ => SearchErrorCode::Other(code),
        }
    }
}

impl From<SearchErrorCode> for String {
    fn from(code: SearchErrorCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for SearchErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
