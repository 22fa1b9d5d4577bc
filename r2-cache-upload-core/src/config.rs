//! Run configuration: credentials, endpoint and the region→bucket mapping.
//!
//! Everything the upload stage needs arrives in one [`UploadConfig`]; how the
//! values were obtained (prompts, flags, environment) is the caller's concern.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::error::ConfigError;

/// The six R2 location hints, in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Eeur,
    Wnam,
    Enam,
    Oc,
    Weur,
    Apac,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Eeur,
        Region::Wnam,
        Region::Enam,
        Region::Oc,
        Region::Weur,
        Region::Apac,
    ];

    /// Human-readable label used in prompts and progress output.
    pub fn label(self) -> &'static str {
        match self {
            Region::Eeur => "Eastern Europe (EEUR)",
            Region::Wnam => "Western North America (WNAM)",
            Region::Enam => "Eastern North America (ENAM)",
            Region::Oc => "Oceania (OC)",
            Region::Weur => "Western Europe (WEUR)",
            Region::Apac => "Asia Pacific (APAC)",
        }
    }

    /// Lowercase short code, e.g. `eeur`.
    pub fn code(self) -> &'static str {
        match self {
            Region::Eeur => "eeur",
            Region::Wnam => "wnam",
            Region::Enam => "enam",
            Region::Oc => "oc",
            Region::Weur => "weur",
            Region::Apac => "apac",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown region '{0}' (expected one of eeur, wnam, enam, oc, weur, apac)")]
pub struct UnknownRegion(pub String);

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Region::ALL
            .into_iter()
            .find(|r| r.code() == wanted)
            .ok_or_else(|| UnknownRegion(s.to_string()))
    }
}

/// Insertion-ordered region→bucket mapping. Every entry has a non-empty name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionBuckets {
    entries: Vec<(Region, String)>,
}

impl RegionBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a bucket for `region`. The name is trimmed; an empty name is
    /// rejected and `false` is returned. A region that is already present
    /// keeps its position and gets the new name.
    pub fn insert(&mut self, region: Region, bucket: impl AsRef<str>) -> bool {
        let bucket = bucket.as_ref().trim();
        if bucket.is_empty() {
            return false;
        }
        match self.entries.iter_mut().find(|(r, _)| *r == region) {
            Some(entry) => entry.1 = bucket.to_string(),
            None => self.entries.push((region, bucket.to_string())),
        }
        true
    }

    pub fn get(&self, region: Region) -> Option<&str> {
        self.entries
            .iter()
            .find(|(r, _)| *r == region)
            .map(|(_, b)| b.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Region, &str)> {
        self.entries.iter().map(|(r, b)| (*r, b.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// R2 API credentials and the account endpoint.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub endpoint_url: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

/// The top-level upload configuration.
#[derive(Debug, Clone, Default)]
pub struct UploadConfig {
    pub credentials: Credentials,
    pub buckets: RegionBuckets,
}

impl UploadConfig {
    /// Checks that every credential field is present and at least one bucket was given.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("access key ID", &self.credentials.access_key_id),
            ("secret access key", &self.credentials.secret_access_key),
            ("endpoint URL", &self.credentials.endpoint_url),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ConfigError::MissingCredentials { field: *field });
        }
        if self.buckets.is_empty() {
            return Err(ConfigError::NoBuckets);
        }
        Ok(())
    }

    pub fn trace_loaded(&self) {
        info!(
            endpoint_url = %self.credentials.endpoint_url,
            buckets_count = self.buckets.len(),
            "Loaded UploadConfig"
        );
        debug!(?self, "UploadConfig loaded (full debug)");
    }
}
