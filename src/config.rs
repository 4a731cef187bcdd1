//! Object storage settings
//!
//! The public base URL and bucket of the media store are read from the process
//! environment once, at startup, and then passed explicitly to the media
//! serializer. Nothing in the serializer reads the environment itself.

use crate::media::paths::{build_storage_url, resolve_base_url, resolve_bucket, MediaOptions};

/// Environment variable holding the public base URL of the media store.
pub const ENV_PUBLIC_URL: &str = "MINIO_PUBLIC_URL";

/// Fallback environment variable holding the media store endpoint.
pub const ENV_ENDPOINT: &str = "MINIO_ENDPOINT";

/// Environment variable holding the media bucket name.
pub const ENV_BUCKET: &str = "MINIO_BUCKET";

/// Base URL used when neither a call-site option nor the environment names one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:9000";

/// Bucket used when neither a call-site option nor the environment names one.
pub const DEFAULT_BUCKET: &str = "guzel-invest";

/// Environment-derived object storage settings.
///
/// Both fields are optional; resolution falls back to [`DEFAULT_BASE_URL`] and
/// [`DEFAULT_BUCKET`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageSettings {
    /// Configured endpoint or public URL, possibly without a scheme.
    pub endpoint: Option<String>,
    /// Configured bucket name.
    pub bucket: Option<String>,
}

impl StorageSettings {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the settings through an arbitrary lookup function.
    ///
    /// `MINIO_PUBLIC_URL` wins over `MINIO_ENDPOINT`; blank values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            endpoint: non_blank(ENV_PUBLIC_URL).or_else(|| non_blank(ENV_ENDPOINT)),
            bucket: non_blank(ENV_BUCKET),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Resolved public base URL, without overrides.
    pub fn base_url(&self) -> String {
        resolve_base_url(&MediaOptions::default(), self)
    }

    /// Resolved bucket name, without overrides.
    pub fn bucket_name(&self) -> String {
        resolve_bucket(&MediaOptions::default(), self)
    }
}

/// Canonical policy for turning a relative media path into a public URL.
///
/// The serializer delegates to this whenever a call carries no explicit base
/// URL or bucket override.
pub trait PublicUrlBuilder {
    fn public_url(&self, path: &str) -> String;
}

impl PublicUrlBuilder for StorageSettings {
    fn public_url(&self, path: &str) -> String {
        build_storage_url(&self.base_url(), &self.bucket_name(), path)
    }
}
