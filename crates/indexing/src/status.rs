//! Status endpoint of the search indexer

use async_trait::async_trait;
use peex_common::IndexingConfig;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::error::{IndexingError, IndexingResult};

/// Longest slice of a response body kept in error messages
pub const DIAGNOSTIC_LEN: usize = 200;

/// Identifier returned by a write, used to follow its indexing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read `field` from a write response; strings and integers are accepted
    pub fn extract(response: &Value, field: &str) -> IndexingResult<Self> {
        match response.get(field) {
            Some(Value::String(s)) if !s.is_empty() => Ok(Self(s.clone())),
            Some(Value::Number(n)) if n.is_u64() || n.is_i64() => Ok(Self(n.to_string())),
            _ => Err(IndexingError::MissingCorrelationId {
                field: field.to_string(),
                response: truncate(&response.to_string()),
            }),
        }
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Indexing state of one index touched by the write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub name: String,
    pub status: String,
}

/// One answer of the status endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub entries: Vec<StatusEntry>,
    /// Raw body, kept for diagnostics
    pub raw: String,
}

impl StatusReport {
    /// Parse `{"entries": [...]}`, or a bare `{"status": ...}` as one entry
    pub fn parse(raw: &str) -> IndexingResult<Self> {
        #[derive(Deserialize)]
        struct Body {
            #[serde(default)]
            entries: Option<Vec<StatusEntry>>,
            #[serde(default)]
            status: Option<String>,
        }

        let body: Body = serde_json::from_str(raw)?;
        let entries = match (body.entries, body.status) {
            (Some(entries), _) => entries,
            (None, Some(status)) => vec![StatusEntry {
                name: "task".to_string(),
                status,
            }],
            (None, None) => Vec::new(),
        };

        Ok(Self {
            entries,
            raw: raw.to_string(),
        })
    }

    /// True when there is at least one entry and all report `success`
    pub fn all_succeeded(&self, success: &str) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(|e| e.status == success)
    }

    pub fn pending(&self, success: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.status != success)
            .map(|e| e.name.as_str())
            .collect()
    }
}

/// Something that reports indexing status for a correlation id
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self, id: &CorrelationId) -> IndexingResult<StatusReport>;
}

/// Status endpoint over HTTP
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    client: reqwest::Client,
    base_url: Url,
    status_path: String,
    app_id: Option<String>,
    api_key: Option<String>,
}

impl HttpStatusSource {
    pub fn new(config: &IndexingConfig) -> IndexingResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| IndexingError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(IndexingError::InvalidUrl(config.base_url.clone()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            status_path: config.status_path.clone(),
            app_id: config.app_id.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Status URL for `id`; the id is percent-encoded as a single segment
    pub fn status_url(&self, id: &CorrelationId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            for part in self.status_path.split('/').filter(|p| !p.is_empty()) {
                segments.push(&part.replace("{id}", id.as_str()));
            }
        }
        url
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch(&self, id: &CorrelationId) -> IndexingResult<StatusReport> {
        let url = self.status_url(id);
        debug!("GET {}", url);

        let mut request = self.client.get(url);
        if let Some(app_id) = &self.app_id {
            request = request.header("X-Peex-Application-Id", app_id.as_str());
        }
        if let Some(api_key) = &self.api_key {
            request = request.header("X-Peex-API-Key", api_key.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(IndexingError::Status {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        StatusReport::parse(&body)
    }
}

/// First [`DIAGNOSTIC_LEN`] characters of `text`
pub fn truncate(text: &str) -> String {
    text.chars().take(DIAGNOSTIC_LEN).collect()
}
