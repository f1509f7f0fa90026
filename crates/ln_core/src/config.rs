use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::pacing::RandomDelay;
use crate::{Error, Result};

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://openapi.naver.com/v1/search/news.json";
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Structural heuristics used to pull article text out of a news page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningRules {
    /// CSS selector of the element holding the article body
    pub container: String,
    /// CSS selectors of subtrees dropped from inside the container
    pub noise: Vec<String>,
    /// Regex matched against each trimmed line; matching lines are blanked
    pub byline: String,
}

impl Default for CleaningRules {
    fn default() -> Self {
        Self {
            container: "div#newsct_article".to_string(),
            noise: vec![
                ".media_end_head".to_string(),
                ".ad".to_string(),
                ".end_photo_org".to_string(),
                "script".to_string(),
                "style".to_string(),
            ],
            byline: "기자$".to_string(),
        }
    }
}

/// What the aggregator does when a single article cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FetchFailurePolicy {
    /// Fail the whole batch
    #[default]
    Abort,
    /// Leave the article out
    Skip,
    /// Keep the article with empty content
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingSettings {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            min_delay_ms: 200,
            max_delay_ms: 2000,
        }
    }
}

impl PacingSettings {
    pub fn random_delay(&self) -> Result<RandomDelay> {
        RandomDelay::new(
            Duration::from_millis(self.min_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub naver_client_id: Option<String>,
    pub naver_client_secret: Option<String>,
    pub search_endpoint: String,
    pub bind: String,
    pub on_fetch_error: FetchFailurePolicy,
    pub pacing: PacingSettings,
    pub cleaning: CleaningRules,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            naver_client_id: None,
            naver_client_secret: None,
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            bind: DEFAULT_BIND.to_string(),
            on_fetch_error: FetchFailurePolicy::default(),
            pacing: PacingSettings::default(),
            cleaning: CleaningRules::default(),
        }
    }
}

impl Settings {
    /// Read settings from a YAML file, or start from defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("cannot read settings file {}: {}", path.display(), e))
                })?;
                let settings = Self::from_yaml_str(&raw)?;
                tracing::debug!(path = %path.display(), "loaded settings file");
                Ok(settings)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw).map_err(|e| Error::Config(format!("invalid settings: {}", e)))
    }

    /// Values given on the command line or in the environment win over the file.
    pub fn with_credentials(mut self, client_id: Option<String>, client_secret: Option<String>) -> Self {
        if client_id.is_some() {
            self.naver_client_id = client_id;
        }
        if client_secret.is_some() {
            self.naver_client_secret = client_secret;
        }
        self
    }

    pub fn credentials(&self) -> Result<Credentials> {
        let client_id = required(&self.naver_client_id, "NAVER_CLIENT_ID")?;
        let client_secret = required(&self.naver_client_secret, "NAVER_CLIENT_SECRET")?;
        Ok(Credentials {
            client_id,
            client_secret,
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.credentials()?;
        self.pacing.random_delay()?;
        if self.search_endpoint.trim().is_empty() {
            return Err(Error::Config("search_endpoint must not be empty".to_string()));
        }
        Ok(())
    }
}

fn required(value: &Option<String>, name: &str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(Error::Config(format!("missing required setting {}", name))),
    }
}
