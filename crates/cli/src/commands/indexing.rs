//! Wait for a write to reach the search index

use anyhow::Result;
use clap::Args;
use peex_common::IndexingConfig;
use peex_indexing::{CorrelationId, IndexingWaiter, PollPolicy};
use std::time::Duration;

use crate::output::{print_serialized, print_success, OutputFormat};

#[derive(Args)]
pub struct WaitIndexedArgs {
    /// Correlation id returned by the write (task id)
    pub id: String,

    /// Override the configured attempt budget
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Override the configured pause between attempts
    #[arg(long)]
    pub interval_ms: Option<u64>,
}

pub fn policy(args: &WaitIndexedArgs, config: &IndexingConfig) -> PollPolicy {
    let base = PollPolicy::from(config);
    PollPolicy {
        max_attempts: args.attempts.unwrap_or(base.max_attempts).max(1),
        interval: args
            .interval_ms
            .map(Duration::from_millis)
            .unwrap_or(base.interval),
    }
}

pub async fn execute(
    args: WaitIndexedArgs,
    config: &IndexingConfig,
    format: OutputFormat,
) -> Result<()> {
    let waiter = IndexingWaiter::from_config(config)?.with_policy(policy(&args, config));
    let id = CorrelationId::new(args.id);
    let attempt = waiter.wait_for(&id).await?;

    match format {
        OutputFormat::Table => print_success(&format!("{id} indexed after {attempt} attempt(s)")),
        _ => print_serialized(
            &serde_json::json!({ "id": id.as_str(), "attempts": attempt }),
            format,
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_overrides() {
        let config = IndexingConfig::default();
        let args = WaitIndexedArgs {
            id: "1".to_string(),
            attempts: Some(0),
            interval_ms: Some(50),
        };
        let policy = policy(&args, &config);
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.interval, Duration::from_millis(50));

        let args = WaitIndexedArgs {
            id: "1".to_string(),
            attempts: None,
            interval_ms: None,
        };
        assert_eq!(super::policy(&args, &config), PollPolicy::default());
    }
}
