//! Terminal rendering of run progress.

use std::io::Write;

use r2_cache_upload_core::config::Region;
use r2_cache_upload_core::files::FileDescriptor;
use r2_cache_upload_core::report::UploadRecord;
use r2_cache_upload_core::upload::{UploadOutcome, UploadProgress};

pub fn print_banner<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Cloudflare R2 Test File Upload Script")?;
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out, "This script will upload test files to multiple R2 buckets")?;
    writeln!(out, "with different cache control headers.\n")
}

/// Echoes each stage and each result as soon as it is known.
///
/// Progress callbacks cannot fail, so write errors on the terminal are dropped.
pub struct ConsoleProgress<W: Write> {
    out: W,
}

impl<W: Write> ConsoleProgress<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> UploadProgress for ConsoleProgress<W> {
    fn on_connect(&mut self) {
        let _ = writeln!(self.out, "\nConnecting to Cloudflare R2...");
    }

    fn on_start(&mut self, bucket_count: usize) {
        let _ = writeln!(self.out, "\nStarting upload to {bucket_count} buckets...");
        let _ = writeln!(self.out, "{}", "-".repeat(50));
    }

    fn on_bucket(&mut self, region: Region, bucket: &str) {
        let _ = writeln!(self.out, "\nUploading to {region} bucket: {bucket}");
    }

    fn on_file(&mut self, file: &FileDescriptor<'_>) {
        let _ = writeln!(
            self.out,
            "  Uploading {} ({})...",
            file.local_path, file.description
        );
        let _ = self.out.flush();
    }

    fn on_outcome(&mut self, record: &UploadRecord) {
        let key = &record.object_key;
        let _ = match &record.outcome {
            UploadOutcome::Success => writeln!(self.out, "    ✓ Successfully uploaded {key}"),
            UploadOutcome::RemoteFailure { message } => writeln!(
                self.out,
                "Error uploading {key} to {}: {message}\n    ✗ Failed to upload {key}",
                record.bucket
            ),
            UploadOutcome::LocalFileMissing { path } => writeln!(
                self.out,
                "Error: File {} not found\n    ✗ Failed to upload {key}",
                path.display()
            ),
            UploadOutcome::LocalFileUnreadable { path, message } => writeln!(
                self.out,
                "Error: Could not read {}: {message}\n    ✗ Failed to upload {key}",
                path.display()
            ),
        };
    }
}
