//! Fixed-budget polling until a write is indexed

use peex_common::IndexingConfig;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::{IndexingError, IndexingResult};
use crate::status::{truncate, CorrelationId, HttpStatusSource, StatusSource};

/// Attempt budget and pause between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(1),
        }
    }
}

impl From<&IndexingConfig> for PollPolicy {
    fn from(config: &IndexingConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            interval: Duration::from_millis(config.interval_ms),
        }
    }
}

/// Runs writes and blocks until the indexer reports them published
pub struct IndexingWaiter<S> {
    source: S,
    policy: PollPolicy,
    correlation_field: String,
    success_status: String,
}

impl IndexingWaiter<HttpStatusSource> {
    /// Waiter over the configured HTTP status endpoint
    pub fn from_config(config: &IndexingConfig) -> IndexingResult<Self> {
        Ok(Self::new(HttpStatusSource::new(config)?, config))
    }
}

impl<S: StatusSource> IndexingWaiter<S> {
    pub fn new(source: S, config: &IndexingConfig) -> Self {
        Self {
            source,
            policy: PollPolicy::from(config),
            correlation_field: config.correlation_field.clone(),
            success_status: config.success_status.clone(),
        }
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Run `op`, then wait for the correlation id in its response.
    ///
    /// Returns the operation's response unchanged.
    pub async fn after<F, Fut, E>(&self, op: F) -> IndexingResult<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let response = op()
            .await
            .map_err(|e| IndexingError::Operation(Box::new(e)))?;
        let id = CorrelationId::extract(&response, &self.correlation_field)?;
        self.wait_for(&id).await?;
        Ok(response)
    }

    /// Poll until every entry for `id` succeeded.
    ///
    /// Returns the attempt that saw success. Status endpoint errors are not
    /// retried.
    pub async fn wait_for(&self, id: &CorrelationId) -> IndexingResult<u32> {
        let mut last_response = String::new();

        for attempt in 1..=self.policy.max_attempts {
            let report = self.source.fetch(id).await?;

            if report.all_succeeded(&self.success_status) {
                info!("{} indexed after {} attempt(s)", id, attempt);
                return Ok(attempt);
            }

            debug!(
                "{} attempt {}/{}: pending {:?}",
                id,
                attempt,
                self.policy.max_attempts,
                report.pending(&self.success_status)
            );
            last_response = report.raw;

            if attempt < self.policy.max_attempts {
                sleep(self.policy.interval).await;
            }
        }

        warn!(
            "{} still not indexed after {} attempts",
            id, self.policy.max_attempts
        );
        Err(IndexingError::NotIndexed {
            id: id.to_string(),
            attempts: self.policy.max_attempts,
            last_response: truncate(&last_response),
        })
    }
}
