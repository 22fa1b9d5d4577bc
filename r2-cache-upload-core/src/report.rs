//! Upload tally and the end-of-run summary text.

use std::fmt::Write as _;

use serde::Serialize;

use crate::config::Region;
use crate::files::FileDescriptor;
use crate::upload::UploadOutcome;

/// One attempted (bucket, file) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadRecord {
    pub region: Region,
    pub bucket: String,
    pub local_path: String,
    pub object_key: String,
    pub outcome: UploadOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadReport {
    pub records: Vec<UploadRecord>,
}

impl UploadReport {
    pub fn push(&mut self, record: UploadRecord) {
        self.records.push(record);
    }

    pub fn attempted(&self) -> usize {
        self.records.len()
    }

    pub fn succeeded(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.succeeded() == self.attempted()
    }
}

/// Renders the final tally followed by the cache-control values in use.
pub fn render_summary(report: &UploadReport, files: &[FileDescriptor<'_>]) -> String {
    let rule = "=".repeat(50);
    let attempted = report.attempted();
    let succeeded = report.succeeded();

    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "\n{rule}\nUpload Summary\n{rule}");
    let _ = writeln!(out, "Total upload attempts: {attempted}");
    let _ = writeln!(out, "Successful uploads: {succeeded}");
    let _ = writeln!(out, "Failed uploads: {}", report.failed());

    if report.all_succeeded() {
        let _ = writeln!(out, "\n🎉 All files uploaded successfully!");
    } else if succeeded > 0 {
        let _ = writeln!(
            out,
            "\n⚠️  Partial success: {succeeded}/{attempted} uploads completed"
        );
    } else {
        let _ = writeln!(out, "\n❌ No files were uploaded successfully");
    }

    let _ = writeln!(out, "\nCache Control Headers Used:");
    for file in files {
        let _ = writeln!(out, "- {}: {}", file.object_key, file.cache_control);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::DEFAULT_FILES;

    fn record(outcome: UploadOutcome) -> UploadRecord {
        UploadRecord {
            region: Region::Weur,
            bucket: "weur-bucket".into(),
            local_path: "test-with-cache.json".into(),
            object_key: "test-with-cache.json".into(),
            outcome,
        }
    }

    fn failure() -> UploadOutcome {
        UploadOutcome::RemoteFailure {
            message: "boom".into(),
        }
    }

    #[test]
    fn counts_add_up() {
        let mut report = UploadReport::default();
        report.push(record(UploadOutcome::Success));
        report.push(record(failure()));
        report.push(record(UploadOutcome::Success));
        assert_eq!(report.attempted(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.all_succeeded());
    }

    #[test]
    fn summary_for_full_success() {
        let mut report = UploadReport::default();
        report.push(record(UploadOutcome::Success));
        report.push(record(UploadOutcome::Success));

        let text = render_summary(&report, &DEFAULT_FILES);
        assert!(text.contains("Total upload attempts: 2"));
        assert!(text.contains("Successful uploads: 2"));
        assert!(text.contains("Failed uploads: 0"));
        assert!(text.contains("All files uploaded successfully!"));
        assert!(text.contains(
            "- test-with-cache.json: public, s-maxage=31536000, max-age=0, must-revalidate"
        ));
        assert!(text.contains(
            "- test-without-cache.json: no-store, no-cache, must-revalidate, max-age=0"
        ));
    }

    #[test]
    fn summary_for_partial_and_total_failure() {
        let mut partial = UploadReport::default();
        partial.push(record(UploadOutcome::Success));
        partial.push(record(failure()));
        let text = render_summary(&partial, &DEFAULT_FILES);
        assert!(text.contains("Partial success: 1/2 uploads completed"));

        let mut none = UploadReport::default();
        none.push(record(failure()));
        let text = render_summary(&none, &DEFAULT_FILES);
        assert!(text.contains("Failed uploads: 1"));
        assert!(text.contains("No files were uploaded successfully"));
    }
}
