//! R2 storage client: the aws-sdk-s3 implementation of the core `ObjectStore` trait.
//!
//! # Client factory
//!
//! [`R2Client::new`] turns collected [`Credentials`] into an S3 client aimed at
//! the account's R2 endpoint with region `auto`.
//!
//! - Construction never talks to the network. Bad credentials show up as a
//!   remote failure on the first upload.
//! - The endpoint must be an absolute `http`/`https` URL; anything else fails
//!   construction.
//! - Retries are disabled: every `put_object` is exactly one HTTP request.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{
    BehaviorVersion, Credentials as AwsCredentials, Region as AwsRegion,
    RequestChecksumCalculation,
};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use r2_cache_upload_core::config::Credentials;
use r2_cache_upload_core::contract::{ObjectStore, PutObjectRequest, StoreError};
use url::Url;

/// R2 routes by account endpoint, not by region name.
pub const R2_REGION: &str = "auto";

pub struct R2Client {
    client: aws_sdk_s3::Client,
}

impl R2Client {
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let endpoint = credentials.endpoint_url.trim();
        let parsed = Url::parse(endpoint)
            .with_context(|| format!("Invalid endpoint URL '{endpoint}'"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "Invalid endpoint URL '{endpoint}': scheme must be http or https, got '{}'",
                parsed.scheme()
            );
        }
        if parsed.host_str().is_none() {
            bail!("Invalid endpoint URL '{endpoint}': missing host");
        }

        let creds = AwsCredentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            None,
            None,
            "r2-cache-upload",
        );
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(AwsRegion::new(R2_REGION))
            .endpoint_url(endpoint)
            .credentials_provider(creds)
            .retry_config(RetryConfig::disabled())
            // R2 rejects some of the newer default integrity headers.
            .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
            .build();

        tracing::info!(
            endpoint = %endpoint,
            region = R2_REGION,
            access_key_set = !credentials.access_key_id.is_empty(),
            "Initialized R2Client"
        );
        Ok(R2Client {
            client: aws_sdk_s3::Client::from_conf(config),
        })
    }
}

#[async_trait]
impl ObjectStore for R2Client {
    async fn put_object(&self, req: PutObjectRequest) -> Result<(), StoreError> {
        let PutObjectRequest {
            bucket,
            key,
            body,
            content_type,
            cache_control,
            metadata,
        } = req;

        tracing::info!(bucket = %bucket, key = %key, bytes = body.len(), "Uploading object to R2");
        let result = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .cache_control(cache_control)
            .set_metadata(Some(metadata.into_iter().collect()))
            .send()
            .await;

        match result {
            Ok(output) => {
                tracing::debug!(e_tag = ?output.e_tag(), "R2 accepted object");
                Ok(())
            }
            Err(e) => {
                let message = DisplayErrorContext(&e).to_string();
                tracing::error!(error = %message, "R2 put_object failed");
                Err(message.into())
            }
        }
    }
}
