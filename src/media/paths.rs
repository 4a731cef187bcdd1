//! Media URL ⇄ relative path conversion.
//!
//! Stored media keys are bucket-relative (`public/listings/abc/original/1.webp`).
//! Exports carry fully qualified public URLs so a spreadsheet reader can open
//! them; imports turn whatever URL comes back into a relative key again.

use percent_encoding::percent_decode_str;
use url::Url;

use crate::config::{PublicUrlBuilder, StorageSettings, DEFAULT_BASE_URL, DEFAULT_BUCKET};

/// Path segment under which public media lives when the bucket segment is
/// missing from a URL (CDN rewrites, bucket-per-host setups).
const PUBLIC_SEGMENT: &str = "public";

/// Per-call storage overrides.
///
/// When both fields are `None`, URL building is delegated to the configured
/// [`PublicUrlBuilder`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaOptions {
    pub minio_base_url: Option<String>,
    pub minio_bucket: Option<String>,
}

impl MediaOptions {
    pub fn new(minio_base_url: Option<String>, minio_bucket: Option<String>) -> Self {
        Self {
            minio_base_url,
            minio_bucket,
        }
    }

    /// True when neither a base URL nor a bucket override is present.
    pub fn is_empty(&self) -> bool {
        self.minio_base_url.is_none() && self.minio_bucket.is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// True for `http://` and `https://` URLs, ignoring case.
#[must_use]
pub fn is_absolute_http_url(value: &str) -> bool {
    let prefix: String = value.trim_start().chars().take(8).collect();
    let prefix = prefix.to_ascii_lowercase();
    prefix.starts_with("http://") || prefix.starts_with("https://")
}

/// Adds a scheme to a bare host and strips trailing slashes.
///
/// Hosts containing `localhost` get `http://`, everything else `https://`.
fn normalize_base_url(value: &str) -> String {
    let value = value.trim();
    let with_scheme = if value.contains("://") {
        value.to_string()
    } else if value.contains("localhost") {
        format!("http://{}", value)
    } else {
        format!("https://{}", value)
    };
    with_scheme.trim_end_matches('/').to_string()
}

/// Resolves the public base URL: call-site option, then the configured
/// endpoint, then `http://localhost:9000`.
#[must_use]
pub fn resolve_base_url(options: &MediaOptions, settings: &StorageSettings) -> String {
    let raw = non_blank(options.minio_base_url.as_deref())
        .or_else(|| non_blank(settings.endpoint.as_deref()))
        .unwrap_or(DEFAULT_BASE_URL);
    normalize_base_url(raw)
}

/// Resolves the bucket name: call-site option, then configured bucket, then
/// the default bucket.
#[must_use]
pub fn resolve_bucket(options: &MediaOptions, settings: &StorageSettings) -> String {
    non_blank(options.minio_bucket.as_deref())
        .or_else(|| non_blank(settings.bucket.as_deref()))
        .unwrap_or(DEFAULT_BUCKET)
        .to_string()
}

/// Joins base URL, bucket and a relative path.
pub(crate) fn build_storage_url(base_url: &str, bucket: &str, path: &str) -> String {
    let clean_path = path.trim().trim_start_matches('/');
    format!("{}/{}/{}", base_url, bucket, clean_path)
}

/// Turns a stored relative path into a public URL.
///
/// Absolute `http(s)` input is returned unchanged and blank input yields an
/// empty string. Without overrides in `options` the call is delegated to
/// `public_urls`; otherwise the URL is built as `{base}/{bucket}/{path}`.
///
/// # Examples
///
/// ```
/// use estate_csv::config::StorageSettings;
/// use estate_csv::media::{build_public_media_url, MediaOptions};
///
/// let settings = StorageSettings::default();
/// let options = MediaOptions::new(Some("cdn.example.com".into()), Some("guzel-invest".into()));
/// assert_eq!(
///     build_public_media_url("/public/a.webp", &options, &settings, &settings),
///     "https://cdn.example.com/guzel-invest/public/a.webp"
/// );
/// ```
#[must_use]
pub fn build_public_media_url(
    path: &str,
    options: &MediaOptions,
    settings: &StorageSettings,
    public_urls: &dyn PublicUrlBuilder,
) -> String {
    let path = path.trim();
    if path.is_empty() {
        return String::new();
    }
    if is_absolute_http_url(path) {
        return path.to_string();
    }
    if options.is_empty() {
        return public_urls.public_url(path);
    }

    build_storage_url(
        &resolve_base_url(options, settings),
        &resolve_bucket(options, settings),
        path,
    )
}

/// Reduces a stored or exported media reference to a bucket-relative path.
///
/// Relative input only loses its leading slashes. An absolute URL is parsed
/// and its decoded path segments are searched for `bucket`; everything after
/// it is the relative path, which is empty when the bucket is the last
/// segment. Failing that, the path from a `public` segment
/// onwards is kept. URLs that match neither, or do not parse, are returned as
/// they came in.
///
/// # Examples
///
/// ```
/// use estate_csv::media::normalize_stored_media_path;
///
/// assert_eq!(
///     normalize_stored_media_path(
///         "https://cdn.example.com/guzel-invest/public/listings/abc/original/test.webp",
///         "guzel-invest",
///     ),
///     "public/listings/abc/original/test.webp"
/// );
/// assert_eq!(normalize_stored_media_path("/public/a.webp", "guzel-invest"), "public/a.webp");
/// ```
#[must_use]
pub fn normalize_stored_media_path(value: &str, bucket: &str) -> String {
    let trimmed = value.trim();
    if !is_absolute_http_url(trimmed) {
        return trimmed.trim_start_matches('/').to_string();
    }

    let parsed = match Url::parse(trimmed) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::debug!(url = trimmed, error = %err, "keeping unparseable media url");
            return value.to_string();
        }
    };

    let segments: Vec<String> = parsed
        .path_segments()
        .map(|segments| {
            segments
                .filter(|segment| !segment.is_empty())
                .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();

    if let Some(position) = segments.iter().position(|segment| segment == bucket) {
        return segments[position + 1..].join("/");
    }

    if let Some(position) = segments.iter().position(|segment| segment == PUBLIC_SEGMENT) {
        return segments[position..].join("/");
    }

    tracing::debug!(url = trimmed, bucket, "media url outside the configured bucket");
    value.to_string()
}
