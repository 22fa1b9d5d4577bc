//! The fixed pair of test files and their cache-control policies.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::error::RunError;

/// Cacheable at the edge for a year, always revalidated by browsers.
pub const CACHE_WITH: &str = "public, s-maxage=31536000, max-age=0, must-revalidate";
/// Not cacheable anywhere.
pub const CACHE_WITHOUT: &str = "no-store, no-cache, must-revalidate, max-age=0";

/// One local file, where it goes, and how it should be cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileDescriptor<'a> {
    /// Path relative to the working directory.
    pub local_path: &'a str,
    pub object_key: &'a str,
    pub cache_control: &'a str,
    pub description: &'a str,
}

impl FileDescriptor<'_> {
    pub fn resolve(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(self.local_path)
    }
}

pub const DEFAULT_FILES: [FileDescriptor<'static>; 2] = [
    FileDescriptor {
        local_path: "test-with-cache.json",
        object_key: "test-with-cache.json",
        cache_control: CACHE_WITH,
        description: "File with CDN caching enabled (1 year s-maxage, no browser cache)",
    },
    FileDescriptor {
        local_path: "test-without-cache.json",
        object_key: "test-without-cache.json",
        cache_control: CACHE_WITHOUT,
        description: "File with no caching anywhere",
    },
];

/// Fails on the first descriptor whose file is absent under `base_dir`.
pub fn verify_files_exist(files: &[FileDescriptor<'_>], base_dir: &Path) -> Result<(), RunError> {
    for file in files {
        let path = file.resolve(base_dir);
        if !path.exists() {
            error!(path = %path.display(), "[PREFLIGHT] Required file not found");
            return Err(RunError::MissingLocalFile {
                path: PathBuf::from(file.local_path),
                dir: base_dir.to_path_buf(),
            });
        }
    }
    info!(files = files.len(), "[PREFLIGHT] All required files present");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_files_carry_distinct_cache_policies() {
        assert_eq!(DEFAULT_FILES.len(), 2);
        assert_eq!(DEFAULT_FILES[0].object_key, "test-with-cache.json");
        assert_eq!(DEFAULT_FILES[0].cache_control, CACHE_WITH);
        assert_eq!(DEFAULT_FILES[1].object_key, "test-without-cache.json");
        assert_eq!(DEFAULT_FILES[1].cache_control, CACHE_WITHOUT);
    }

    #[test]
    fn verify_reports_the_missing_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("test-with-cache.json"), b"{}").unwrap();

        let err = verify_files_exist(&DEFAULT_FILES, dir.path()).unwrap_err();
        match err {
            RunError::MissingLocalFile { path, dir: searched } => {
                assert_eq!(path, PathBuf::from("test-without-cache.json"));
                assert_eq!(searched, dir.path());
            }
            other => panic!("unexpected error: {other:?}"),
        }

        std::fs::write(dir.path().join("test-without-cache.json"), b"{}").unwrap();
        verify_files_exist(&DEFAULT_FILES, dir.path()).expect("both files present");
    }
}
