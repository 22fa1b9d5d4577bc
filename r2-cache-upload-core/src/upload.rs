//! Upload runner: one PUT per (bucket, file) pair, tallied into a report.
//!
//! Pairs are visited in region-insertion order, then file order. A failed pair
//! never stops the loop and is never retried.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::{Region, UploadConfig};
use crate::contract::{
    ObjectStore, PutObjectRequest, CONTENT_TYPE_JSON, META_UPLOADED_BY, META_UPLOAD_TIMESTAMP,
    UPLOADED_BY,
};
use crate::files::FileDescriptor;
use crate::report::{UploadRecord, UploadReport};

/// Result of a single upload attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UploadOutcome {
    Success,
    /// The storage service rejected the request or could not be reached.
    RemoteFailure { message: String },
    /// The local file vanished between the pre-flight check and the upload.
    LocalFileMissing { path: PathBuf },
    /// The local file exists but could not be read.
    LocalFileUnreadable { path: PathBuf, message: String },
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success)
    }
}

/// Observer for per-pair progress, so callers can echo results as they happen.
pub trait UploadProgress {
    /// Called once the configuration is complete, right before the client is built.
    fn on_connect(&mut self) {}
    fn on_start(&mut self, _bucket_count: usize) {}
    fn on_bucket(&mut self, _region: Region, _bucket: &str) {}
    fn on_file(&mut self, _file: &FileDescriptor<'_>) {}
    fn on_outcome(&mut self, _record: &UploadRecord) {}
}

impl UploadProgress for () {}

/// Builds the metadata attached to every object. The timestamp is taken now.
pub fn upload_metadata() -> BTreeMap<String, String> {
    BTreeMap::from([
        (META_UPLOADED_BY.to_string(), UPLOADED_BY.to_string()),
        (
            META_UPLOAD_TIMESTAMP.to_string(),
            jiff::Timestamp::now().as_second().to_string(),
        ),
    ])
}

/// Uploads one file to one bucket with the file's cache-control policy.
pub async fn upload_file<S>(
    store: &S,
    bucket: &str,
    file: &FileDescriptor<'_>,
    base_dir: &Path,
) -> UploadOutcome
where
    S: ObjectStore + ?Sized,
{
    let path = file.resolve(base_dir);
    let body = match tokio::fs::read(&path).await {
        Ok(body) => body,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            error!(path = %path.display(), "[UPLOAD][ERROR] Local file not found");
            return UploadOutcome::LocalFileMissing {
                path: PathBuf::from(file.local_path),
            };
        }
        Err(e) => {
            error!(path = %path.display(), error = ?e, "[UPLOAD][ERROR] Failed to read local file");
            return UploadOutcome::LocalFileUnreadable {
                path: PathBuf::from(file.local_path),
                message: e.to_string(),
            };
        }
    };

    let req = PutObjectRequest {
        bucket: bucket.to_string(),
        key: file.object_key.to_string(),
        body,
        content_type: CONTENT_TYPE_JSON.to_string(),
        cache_control: file.cache_control.to_string(),
        metadata: upload_metadata(),
    };
    debug!(
        bucket,
        key = file.object_key,
        bytes = req.body.len(),
        cache_control = file.cache_control,
        "[UPLOAD] Sending object"
    );

    match store.put_object(req).await {
        Ok(()) => {
            info!(bucket, key = file.object_key, "[UPLOAD] put_object succeeded");
            UploadOutcome::Success
        }
        Err(e) => {
            error!(bucket, key = file.object_key, error = %e, "[UPLOAD][ERROR] put_object failed");
            UploadOutcome::RemoteFailure {
                message: e.to_string(),
            }
        }
    }
}

/// Runs the full cross-product of configured buckets and `files`.
pub async fn run_uploads<S, P>(
    store: &S,
    config: &UploadConfig,
    files: &[FileDescriptor<'_>],
    base_dir: &Path,
    progress: &mut P,
) -> UploadReport
where
    S: ObjectStore + ?Sized,
    P: UploadProgress + ?Sized,
{
    info!(
        buckets = config.buckets.len(),
        files = files.len(),
        "[UPLOAD] Starting uploads"
    );
    progress.on_start(config.buckets.len());

    let mut report = UploadReport::default();
    for (region, bucket) in config.buckets.iter() {
        info!(region = region.code(), bucket, "[UPLOAD] Uploading to bucket");
        progress.on_bucket(region, bucket);

        for file in files {
            progress.on_file(file);
            let outcome = upload_file(store, bucket, file, base_dir).await;
            let record = UploadRecord {
                region,
                bucket: bucket.to_string(),
                local_path: file.local_path.to_string(),
                object_key: file.object_key.to_string(),
                outcome,
            };
            progress.on_outcome(&record);
            report.push(record);
        }
    }

    if report.failed() > 0 {
        warn!(
            attempted = report.attempted(),
            failed = report.failed(),
            "[UPLOAD] Some uploads failed"
        );
    }
    match serde_json::to_string_pretty(&report) {
        Ok(json) => debug!(json = %json, "[UPLOAD][DEBUG] Upload report as JSON"),
        Err(e) => error!(error = ?e, "[UPLOAD][DEBUG] Failed to serialize upload report"),
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::MockObjectStore;
    use crate::files::CACHE_WITH;
    use tempfile::tempdir;

    const FILE: FileDescriptor<'static> = FileDescriptor {
        local_path: "payload.json",
        object_key: "remote/payload.json",
        cache_control: CACHE_WITH,
        description: "test payload",
    };

    #[tokio::test]
    async fn missing_local_file_is_not_sent() {
        let dir = tempdir().unwrap();
        let mut store = MockObjectStore::new();
        store.expect_put_object().never();

        let outcome = upload_file(&store, "bucket", &FILE, dir.path()).await;
        assert_eq!(
            outcome,
            UploadOutcome::LocalFileMissing {
                path: PathBuf::from("payload.json")
            }
        );
    }

    #[tokio::test]
    async fn request_carries_headers_and_metadata() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("payload.json"), br#"{"ok":true}"#).unwrap();
        let before = jiff::Timestamp::now().as_second();

        let mut store = MockObjectStore::new();
        store
            .expect_put_object()
            .times(1)
            .withf(move |req| {
                let stamp: i64 = req.metadata[META_UPLOAD_TIMESTAMP].parse().unwrap();
                req.bucket == "bucket"
                    && req.key == "remote/payload.json"
                    && req.body == br#"{"ok":true}"#
                    && req.content_type == "application/json"
                    && req.cache_control == CACHE_WITH
                    && req.metadata[META_UPLOADED_BY] == UPLOADED_BY
                    && stamp >= before
            })
            .returning(|_| Ok(()));

        let outcome = upload_file(&store, "bucket", &FILE, dir.path()).await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn remote_error_becomes_remote_failure() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("payload.json"), b"{}").unwrap();

        let mut store = MockObjectStore::new();
        store
            .expect_put_object()
            .returning(|_| Err("AccessDenied".into()));

        let outcome = upload_file(&store, "bucket", &FILE, dir.path()).await;
        assert_eq!(
            outcome,
            UploadOutcome::RemoteFailure {
                message: "AccessDenied".to_string()
            }
        );
    }

    #[tokio::test]
    async fn file_vanishing_mid_run_does_not_stop_later_pairs() {
        let dir = tempdir().unwrap();
        let first = FileDescriptor {
            local_path: "first.json",
            object_key: "first.json",
            ..FILE
        };
        let second = FileDescriptor {
            local_path: "second.json",
            object_key: "second.json",
            ..FILE
        };
        std::fs::write(dir.path().join("first.json"), b"{}").unwrap();
        std::fs::write(dir.path().join("second.json"), b"{}").unwrap();

        let mut buckets = crate::config::RegionBuckets::new();
        buckets.insert(Region::Eeur, "eeur-bucket");
        buckets.insert(Region::Wnam, "wnam-bucket");
        let config = UploadConfig {
            buckets,
            ..UploadConfig::default()
        };

        // The first upload removes the second file out from under the run.
        let doomed = dir.path().join("second.json");
        let mut store = MockObjectStore::new();
        store.expect_put_object().times(2).returning(move |req| {
            assert_eq!(req.key, "first.json");
            let _ = std::fs::remove_file(&doomed);
            Ok(())
        });

        let report = run_uploads(&store, &config, &[first, second], dir.path(), &mut ()).await;

        assert_eq!(report.attempted(), 4);
        assert_eq!(report.succeeded(), 2);
        let outcomes: Vec<_> = report
            .records
            .iter()
            .map(|r| (r.bucket.as_str(), r.outcome.clone()))
            .collect();
        let missing = UploadOutcome::LocalFileMissing {
            path: PathBuf::from("second.json"),
        };
        assert_eq!(
            outcomes,
            vec![
                ("eeur-bucket", UploadOutcome::Success),
                ("eeur-bucket", missing.clone()),
                ("wnam-bucket", UploadOutcome::Success),
                ("wnam-bucket", missing),
            ]
        );
    }
}
