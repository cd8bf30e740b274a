//! Peex CLI - Main Entry Point
//!
//! Generates test fixtures, inspects and opens driver sessions, and waits
//! on the search indexer from the command line.

use clap::{Parser, Subcommand};
use peex_common::TestConfig;
use peex_driver::DriverFactory;
use std::path::PathBuf;

mod commands;
mod output;

use commands::{address, candidate, indexing, session};

/// Peex UI test toolkit
#[derive(Parser)]
#[command(name = "peex")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file; defaults apply when it does not exist
    #[arg(long, default_value = peex_common::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a candidate fixture
    Candidate(candidate::CandidateArgs),

    /// Show canned addresses
    Address(address::AddressArgs),

    /// Print the session plan for a target and mode without connecting
    Capabilities(session::PlanArgs),

    /// Open a driver session, optionally load a page, then close it
    Session(session::SessionArgs),

    /// Wait until a write is published by the search indexer
    WaitIndexed(indexing::WaitIndexedArgs),

    /// Show the effective configuration
    Config,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match TestConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            output::print_error(&format!("{}: {}", cli.config.display(), e));
            std::process::exit(2);
        }
    };

    let log_level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    peex_common::logging::init(log_level);

    match cli.command {
        Commands::Candidate(args) => candidate::execute(args, &config.environment, cli.format)?,
        Commands::Address(args) => address::execute(args, cli.format)?,
        Commands::Capabilities(args) => {
            let factory = DriverFactory::new(config.webdriver, config.device_lab);
            session::capabilities(args, &factory, cli.format)?
        }
        Commands::Session(args) => {
            let factory = DriverFactory::new(config.webdriver, config.device_lab);
            session::execute(args, &factory, cli.format).await?
        }
        Commands::WaitIndexed(args) => {
            indexing::execute(args, &config.indexing, cli.format).await?
        }
        Commands::Config => output::print_serialized(&redacted(config), cli.format),
        Commands::Version => {
            println!("peex {}", peex_common::VERSION);
        }
    }

    Ok(())
}

/// Configuration with secrets masked
fn redacted(mut config: TestConfig) -> TestConfig {
    let mask = |secret: &mut Option<String>| {
        if secret.is_some() {
            *secret = Some("****".to_string());
        }
    };
    mask(&mut config.device_lab.access_key);
    mask(&mut config.indexing.api_key);
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_repeated_contracts() {
        let cli = Cli::try_parse_from([
            "peex", "candidate", "--contract", "cdd", "-c", "interim", "--gender", "M",
        ])
        .unwrap();
        match cli.command {
            Commands::Candidate(args) => {
                assert_eq!(args.contracts, vec!["cdd", "interim"]);
                assert_eq!(args.gender.as_deref(), Some("M"));
            }
            _ => panic!("expected candidate"),
        }
    }

    #[test]
    fn test_config_secrets_are_masked() {
        let mut config = TestConfig::default();
        config.device_lab.access_key = Some("lab-secret".to_string());
        let shown = redacted(config);
        assert_eq!(shown.device_lab.access_key.as_deref(), Some("****"));
        assert_eq!(shown.indexing.api_key, None);
    }

    #[test]
    fn test_address_all_conflicts_with_preset() {
        assert!(Cli::try_parse_from(["peex", "address", "valid", "--all"]).is_err());
    }
}
