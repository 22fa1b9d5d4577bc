//! Input collector: asks for whatever the command line did not already supply.
//!
//! Reads from any `BufRead` and writes prompts to any `Write`, so tests can
//! drive it with in-memory buffers. End of input counts as an empty answer.

use std::io::{self, BufRead, Write};

use r2_cache_upload_core::config::{Credentials, Region, RegionBuckets, UploadConfig};
use tracing::{info, warn};

/// Values supplied up front through flags or environment variables.
#[derive(Debug, Clone, Default)]
pub struct Prefilled {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub endpoint_url: Option<String>,
    /// When non-empty, no bucket prompts are shown.
    pub buckets: Vec<(Region, String)>,
}

fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> io::Result<String> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn ask_unless<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prefilled: Option<String>,
    prompt: &str,
) -> io::Result<String> {
    match prefilled {
        Some(value) => Ok(value.trim().to_string()),
        None => ask(input, out, prompt),
    }
}

/// Collects credentials, endpoint and one bucket per region.
///
/// Nothing is validated here beyond trimming: blank regions are left out of
/// the mapping with a warning, blank credentials are passed through for the
/// pipeline to reject.
pub fn collect_config<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prefilled: Prefilled,
) -> io::Result<UploadConfig> {
    writeln!(out, "Cloudflare R2 Upload Configuration")?;
    writeln!(out, "{}", "=".repeat(40))?;

    let access_key_id = ask_unless(
        input,
        out,
        prefilled.access_key_id,
        "Enter your Cloudflare R2 Access Key ID: ",
    )?;
    let secret_access_key = ask_unless(
        input,
        out,
        prefilled.secret_access_key,
        "Enter your Cloudflare R2 Secret Access Key: ",
    )?;
    let endpoint_url = match prefilled.endpoint_url {
        Some(url) => url.trim().to_string(),
        None => {
            writeln!(
                out,
                "\nYour R2 endpoint should look like: https://[account-id].r2.cloudflarestorage.com"
            )?;
            ask(input, out, "Enter your Cloudflare R2 Endpoint URL: ")?
        }
    };

    let mut buckets = RegionBuckets::new();
    if prefilled.buckets.is_empty() {
        writeln!(out, "\nEnter bucket names for each region:")?;
        writeln!(out, "{}", "-".repeat(40))?;
        for region in Region::ALL {
            let name = ask(input, out, &format!("Bucket name for {}: ", region.label()))?;
            if !buckets.insert(region, &name) {
                warn!(region = region.code(), "No bucket name provided, skipping region");
                writeln!(
                    out,
                    "Warning: No bucket name provided for {}, skipping...",
                    region.label()
                )?;
            }
        }
    } else {
        for (region, name) in prefilled.buckets {
            if !buckets.insert(region, &name) {
                warn!(region = region.code(), "Empty bucket name on command line, skipping region");
            }
        }
    }

    info!(buckets = buckets.len(), "Input collected");
    Ok(UploadConfig {
        credentials: Credentials {
            access_key_id,
            secret_access_key,
            endpoint_url,
        },
        buckets,
    })
}
