//! Monzo Webhook Deletion Tool
//!
//! Lists every account of the token owner and deletes every webhook
//! registered against each of them.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MONZO_ACCESS_TOKEN` | - | Monzo API access token (required) |
//! | `MONZO_API_BASE_URL` | `https://api.monzo.com` | API base URL |
//! | `MONZO_REQUEST_TIMEOUT_SECS` | `30` | Per-request timeout |
//! | `MONZO_CONNECT_TIMEOUT_SECS` | `10` | Connect timeout |
//! | `MONZO_CONFIG_FILE` | - | Optional TOML settings file |
//! | `RUST_LOG` | `info` | Log level (logs go to stderr) |

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use mh_config::{ConfigError, MonzoConfig};
use mh_workflow::DeletionWorkflow;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Delete all webhooks for all accounts of the currently logged-in Monzo user
#[derive(Parser, Debug)]
#[command(name = "delete_webhooks", version)]
struct Args {}

#[tokio::main]
async fn main() -> ExitCode {
    let _args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = report(&e, &mut std::io::stderr());
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = MonzoConfig::from_env()?;
    info!(api_base_url = %config.api_base_url, "Starting webhook deletion");
    let workflow = DeletionWorkflow::from_config(config).context("Failed to create Monzo API client")?;

    let mut stdout = std::io::stdout();
    workflow.run(&mut stdout).await?;
    Ok(())
}

/// Print a fatal error, plus setup instructions for configuration errors
fn report<W: Write>(err: &anyhow::Error, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Error: {:#}", err)?;
    if let Some(hint) = err.downcast_ref::<ConfigError>().and_then(ConfigError::remediation) {
        writeln!(out, "\n{}", hint)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(err: anyhow::Error) -> String {
        let mut out = Vec::new();
        report(&err, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_missing_token_prints_remediation() {
        let err = MonzoConfig::from_lookup(|_| None).unwrap_err();
        let output = rendered(err.into());

        assert!(output.starts_with("Error: MONZO_ACCESS_TOKEN environment variable is not set\n"));
        assert!(output.contains("Please set your Monzo access token:\n  export MONZO_ACCESS_TOKEN=your_token_here"));
    }

    #[test]
    fn test_other_errors_have_no_remediation() {
        let output = rendered(anyhow::anyhow!("connection refused").context("Failed to create Monzo API client"));

        assert_eq!(output, "Error: Failed to create Monzo API client: connection refused\n");
    }
}
