//! # contract: the storage seam
//!
//! The pipeline talks to object storage through a single trait,
//! [`ObjectStore`], so that the real R2 client and test mocks are
//! interchangeable.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`; `MockObjectStore` is available in
//!   unit tests and, through the default `test-export-mocks` feature, to
//!   integration tests and downstream crates.
//!
//! ## Errors
//! - Implementors return boxed errors; the pipeline only renders them, it
//!   never branches on their type.

use std::collections::BTreeMap;

use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// Every uploaded object is served as JSON.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Metadata key naming the tool that wrote the object.
pub const META_UPLOADED_BY: &str = "uploaded-by";
/// Metadata key holding the upload time in Unix epoch seconds.
pub const META_UPLOAD_TIMESTAMP: &str = "upload-timestamp";
/// Value stored under [`META_UPLOADED_BY`].
pub const UPLOADED_BY: &str = "cloudflare-r2-ping-test-script";

pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// A fully prepared single-part PUT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObjectRequest {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
    pub cache_control: String,
    /// User metadata, sent as `x-amz-meta-*` headers.
    pub metadata: BTreeMap<String, String>,
}

/// Trait for writing objects into a bucket.
/// The implementor owns authentication, endpoint routing and transport.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `req.body` under `req.key` in `req.bucket`, replacing any existing object.
    async fn put_object(&self, req: PutObjectRequest) -> Result<(), StoreError>;
}
