//! High-level pipeline: validate → connect → pre-flight → upload.
//!
//! # Responsibilities
//! - Refuse to build a client when credentials or buckets are missing
//! - Build exactly one client through the caller's factory; credentials are
//!   not checked against the service here, the first upload does that
//! - Refuse to upload anything unless every required file is present
//! - Run the uploads and hand back the report
//!
//! # Error Handling
//! Only the steps before the upload loop are fatal and surface as
//! [`RunError`]. Per-pair failures are recorded in the returned report.

use std::fmt::Display;
use std::path::Path;

use tracing::{error, info};

use crate::config::{Credentials, UploadConfig};
use crate::contract::ObjectStore;
use crate::error::RunError;
use crate::files::{verify_files_exist, FileDescriptor};
use crate::report::UploadReport;
use crate::upload::{run_uploads, UploadProgress};

pub async fn execute<S, E, F, P>(
    config: &UploadConfig,
    files: &[FileDescriptor<'_>],
    base_dir: &Path,
    connect: F,
    progress: &mut P,
) -> Result<UploadReport, RunError>
where
    S: ObjectStore,
    E: Display,
    F: FnOnce(&Credentials) -> Result<S, E>,
    P: UploadProgress + ?Sized,
{
    info!("[RUN] Starting upload pipeline");

    if let Err(e) = config.validate() {
        error!(error = %e, "[RUN][ERROR] Configuration incomplete");
        return Err(e.into());
    }
    config.trace_loaded();
    progress.on_connect();

    let store = match connect(&config.credentials) {
        Ok(store) => {
            info!("[RUN] Storage client constructed");
            store
        }
        Err(e) => {
            error!(error = %e, "[RUN][ERROR] Failed to construct storage client");
            return Err(RunError::client(e));
        }
    };

    verify_files_exist(files, base_dir)?;

    let report = run_uploads(&store, config, files, base_dir, progress).await;
    info!(
        attempted = report.attempted(),
        succeeded = report.succeeded(),
        "[RUN] Upload pipeline finished"
    );
    Ok(report)
}
