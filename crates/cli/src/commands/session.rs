//! Session planning and smoke-opening

use anyhow::Result;
use clap::Args;
use peex_driver::{DriverFactory, DriverResult, ExecutionMode, Session, Target};
use tracing::info;

use crate::output::{print_serialized, print_success, OutputFormat};

#[derive(Args)]
pub struct PlanArgs {
    /// Target platform (chrome, android, ios)
    #[arg(short, long, default_value = "chrome")]
    pub target: String,

    /// Execution mode (local, remote, cloud)
    #[arg(short, long, default_value = "local")]
    pub mode: String,
}

impl PlanArgs {
    fn parse(&self) -> Result<(Target, ExecutionMode)> {
        Ok((self.target.parse()?, self.mode.parse()?))
    }
}

#[derive(Args)]
pub struct SessionArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    /// Page to open once the session is up (web only)
    #[arg(long)]
    pub url: Option<String>,
}

/// Print the session plan without connecting
pub fn capabilities(args: PlanArgs, factory: &DriverFactory, format: OutputFormat) -> Result<()> {
    let (target, mode) = args.parse()?;
    let plan = factory.plan(target, mode)?;
    print_serialized(&plan.redacted(), format);
    Ok(())
}

/// Open a session, optionally load a page, and close it again
pub async fn execute(args: SessionArgs, factory: &DriverFactory, format: OutputFormat) -> Result<()> {
    let (target, mode) = args.plan.parse()?;
    let session = factory.create(target, mode).await?;
    info!("Session {} opened", session.id());

    let visited = match &args.url {
        Some(url) => visit(&session, url).await.map(Some),
        None => Ok(None),
    };

    let id = session.id().to_string();
    session.quit().await?;
    let current_url = visited?;

    match format {
        OutputFormat::Table => {
            print_success(&format!("Session {id} opened and closed ({target}/{mode})"));
            if let Some(url) = current_url {
                println!("Loaded {url}");
            }
        }
        _ => print_serialized(
            &serde_json::json!({
                "session_id": id,
                "target": target.as_str(),
                "mode": mode.as_str(),
                "current_url": current_url,
            }),
            format,
        ),
    }
    Ok(())
}

async fn visit(session: &Session, url: &str) -> DriverResult<String> {
    session.navigate(url).await?;
    session.current_url().await
}
