//! This module implements the CLI for r2-cache-upload: argument parsing, the
//! interactive session, and mapping pipeline failures to user-visible messages.
//!
//! All pipeline logic (validation, pre-flight, the upload loop, the summary)
//! lives in [`r2-cache-upload-core`]. This module is glue.
//!
//! ## How To Use
//! - From a terminal: run `r2-cache-upload` in the directory holding
//!   `test-with-cache.json` and `test-without-cache.json` and answer the prompts.
//! - Non-interactively: pass `--access-key-id`, `--secret-access-key`,
//!   `--endpoint-url` (or the `R2_*` environment variables) and one
//!   `--bucket REGION=NAME` per region.
//! - Programmatically: call [`run_with_io`] with a constructed [`Cli`].
//!
//! [`r2-cache-upload-core`]: ../../r2-cache-upload-core/
use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use r2_cache_upload_core::config::Region;
use r2_cache_upload_core::error::{ConfigError, RunError};
use r2_cache_upload_core::files::DEFAULT_FILES;
use r2_cache_upload_core::pipeline::execute;
use r2_cache_upload_core::report::{render_summary, UploadReport};

use crate::client::R2Client;
use crate::console::{print_banner, ConsoleProgress};
use crate::prompt::{collect_config, Prefilled};

/// Upload CDN cache-control test files to one R2 bucket per region.
#[derive(Parser, Debug, Default)]
#[clap(
    name = "r2-cache-upload",
    version,
    about = "Upload cache-control test files to Cloudflare R2 buckets in every region"
)]
pub struct Cli {
    /// R2 access key ID (prompted when absent)
    #[clap(long, env = "R2_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key_id: Option<String>,

    /// R2 secret access key (prompted when absent)
    #[clap(long, env = "R2_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_access_key: Option<String>,

    /// Account endpoint, e.g. https://<account-id>.r2.cloudflarestorage.com
    #[clap(long, env = "R2_ENDPOINT")]
    pub endpoint_url: Option<String>,

    /// Bucket for a region as REGION=NAME; repeatable. Skips the bucket prompts.
    #[clap(long = "bucket", value_name = "REGION=NAME", value_parser = parse_bucket_arg)]
    pub buckets: Vec<(Region, String)>,

    /// Directory containing the test files
    #[clap(long, default_value = ".")]
    pub dir: PathBuf,

    /// Log verbosity on stderr (-v info, -vv debug)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn parse_bucket_arg(raw: &str) -> Result<(Region, String), String> {
    let (region, bucket) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected REGION=NAME, got '{raw}'"))?;
    let region = region.parse::<Region>().map_err(|e| e.to_string())?;
    Ok((region, bucket.trim().to_string()))
}

impl Cli {
    fn prefilled(&self) -> Prefilled {
        Prefilled {
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
            endpoint_url: self.endpoint_url.clone(),
            buckets: self.buckets.clone(),
        }
    }
}

/// The message shown to the user when the run aborts.
pub fn abort_message(err: &RunError) -> String {
    match err {
        RunError::Config(ConfigError::MissingCredentials { .. }) => {
            "Error: Missing required credentials. Exiting...".to_string()
        }
        RunError::Config(ConfigError::NoBuckets) => {
            "Error: No bucket names provided. Exiting...".to_string()
        }
        RunError::ClientConstruction { message } => {
            format!("Error creating R2 client: {message}\nFailed to create R2 client. Exiting...")
        }
        RunError::MissingLocalFile { .. } => format!("Error: {err}"),
    }
}

/// Runs one full session against the process's stdin and stdout.
pub async fn run(cli: Cli) -> Result<UploadReport> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout();
    run_with_io(cli, &mut input, &mut out).await
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run_with_io<R, W>(cli: Cli, input: &mut R, out: &mut W) -> Result<UploadReport>
where
    R: BufRead,
    W: Write,
{
    tracing::info!("trace_initialised");

    print_banner(out)?;
    let config = collect_config(input, out, cli.prefilled())
        .context("Failed to read configuration input")?;

    let result = {
        let mut progress = ConsoleProgress::new(&mut *out);
        execute(&config, &DEFAULT_FILES, &cli.dir, R2Client::new, &mut progress).await
    };

    match result {
        Ok(report) => {
            write!(out, "{}", render_summary(&report, &DEFAULT_FILES))?;
            out.flush()?;
            tracing::info!(
                attempted = report.attempted(),
                succeeded = report.succeeded(),
                failed = report.failed(),
                "Run complete"
            );
            Ok(report)
        }
        Err(e) => {
            writeln!(out, "{}", abort_message(&e))?;
            out.flush()?;
            tracing::error!(error = %e, "Run aborted");
            Err(e.into())
        }
    }
}
