use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::paths::{build_public_media_url, normalize_stored_media_path, resolve_bucket, MediaOptions};
use super::record::{finite_or_index, merge_drafts, trim_to_option, MediaDraft, MediaItem, MediaRecord};
use crate::config::{PublicUrlBuilder, StorageSettings};

/// Header of the human-readable media column.
pub const MEDIA_URLS_COLUMN: &str = "mediaUrls";

/// Header of the JSON media column.
pub const MEDIA_PAYLOAD_COLUMN: &str = "mediaPayloadJson";

/// Separator between entries of the media url column.
pub const MEDIA_URL_SEPARATOR: &str = " | ";

/// The two CSV cells a media set is exported as.
///
/// `media_payload_json` is the authoritative column; `media_urls` exists for
/// people skimming the sheet and for exports that predate the payload column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaColumns {
    pub media_urls: String,
    pub media_payload_json: String,
}

/// Where a parsed media set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSource {
    /// Read from the JSON payload column.
    Payload,
    /// Read from the url list because the payload had no usable entries.
    UrlList,
    /// Neither column held any media.
    Empty,
}

/// Serializes and parses media columns against one storage configuration.
///
/// Holds the environment-derived [`StorageSettings`] and the
/// [`PublicUrlBuilder`] used when a call carries no overrides. By default the
/// settings double as the builder.
pub struct MediaColumnCodec<'a> {
    settings: &'a StorageSettings,
    public_urls: &'a dyn PublicUrlBuilder,
}

impl<'a> MediaColumnCodec<'a> {
    pub fn new(settings: &'a StorageSettings) -> Self {
        Self {
            settings,
            public_urls: settings,
        }
    }

    pub fn with_public_urls(settings: &'a StorageSettings, public_urls: &'a dyn PublicUrlBuilder) -> Self {
        Self {
            settings,
            public_urls,
        }
    }

    /// Turns media items into the `mediaUrls` and `mediaPayloadJson` cells.
    ///
    /// Items are normalized (blank urls dropped, duplicates merged, order made
    /// dense, one cover assigned) and every `url`/`thumbnailUrl` is rewritten
    /// to a public URL.
    pub fn serialize(&self, items: &[MediaItem], options: &MediaOptions) -> MediaColumns {
        let records: Vec<MediaRecord> = super::record::normalize_media_items(items)
            .into_iter()
            .map(|record| self.publish(record, options))
            .collect();

        let media_urls = records
            .iter()
            .map(|record| record.url.as_str())
            .collect::<Vec<_>>()
            .join(MEDIA_URL_SEPARATOR);

        let media_payload_json = match serde_json::to_string(&records) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize media payload");
                "[]".to_string()
            }
        };

        MediaColumns {
            media_urls,
            media_payload_json,
        }
    }

    /// Reads media records back out of the two export cells.
    ///
    /// See [`MediaColumnCodec::parse_with_source`].
    pub fn parse(&self, media_urls: &str, media_payload_json: &str, options: &MediaOptions) -> Vec<MediaRecord> {
        self.parse_with_source(media_urls, media_payload_json, options).0
    }

    /// Reads media records and reports which column they came from.
    ///
    /// The JSON payload wins whenever it yields at least one record. Otherwise
    /// the url list is split on `" | "` and newlines, its first entry becomes
    /// the cover and entries are ordered by position. All urls are reduced to
    /// bucket-relative paths and the result is normalized like the export side.
    ///
    /// Payload `order` values only decide the sort; returned records are
    /// renumbered `0..n-1`.
    pub fn parse_with_source(
        &self,
        media_urls: &str,
        media_payload_json: &str,
        options: &MediaOptions,
    ) -> (Vec<MediaRecord>, MediaSource) {
        let bucket = resolve_bucket(options, self.settings);

        let from_payload = drafts_from_payload(media_payload_json, &bucket);
        if !from_payload.is_empty() {
            return (merge_drafts(from_payload), MediaSource::Payload);
        }

        let from_urls = drafts_from_url_list(media_urls, &bucket);
        if from_urls.is_empty() {
            return (Vec::new(), MediaSource::Empty);
        }
        (merge_drafts(from_urls), MediaSource::UrlList)
    }

    fn publish(&self, mut record: MediaRecord, options: &MediaOptions) -> MediaRecord {
        record.url = build_public_media_url(&record.url, options, self.settings, self.public_urls);
        record.thumbnail_url = record
            .thumbnail_url
            .map(|thumb| build_public_media_url(&thumb, options, self.settings, self.public_urls))
            .filter(|thumb| !thumb.is_empty());
        record
    }
}

/// Parses the JSON payload column into drafts.
///
/// Anything other than a JSON array yields no drafts; entries that are not
/// objects with a string `url` are skipped.
fn drafts_from_payload(payload: &str, bucket: &str) -> Vec<MediaDraft> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Vec::new();
    }

    let entries = match serde_json::from_str::<Value>(payload) {
        Ok(Value::Array(entries)) => entries,
        Ok(other) => {
            tracing::debug!(kind = json_kind(&other), "media payload is not an array");
            return Vec::new();
        }
        Err(err) => {
            tracing::debug!(error = %err, "media payload is not valid json");
            return Vec::new();
        }
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| draft_from_entry(entry, index, bucket))
        .collect()
}

fn draft_from_entry(entry: &Value, index: usize, bucket: &str) -> Option<MediaDraft> {
    let object = entry.as_object()?;
    let raw_url = object.get("url")?.as_str()?;
    let url = normalize_stored_media_path(raw_url, bucket);
    let url = trim_to_option(Some(url.as_str()))?;

    let thumbnail_url = object
        .get("thumbnailUrl")
        .and_then(Value::as_str)
        .map(|thumb| normalize_stored_media_path(thumb, bucket))
        .and_then(|thumb| trim_to_option(Some(thumb.as_str())));

    Some(MediaDraft {
        url,
        thumbnail_url,
        order: finite_or_index(object.get("order").and_then(numeric_value), index),
        is_cover: object.get("isCover") == Some(&Value::Bool(true)),
        category: trim_to_option(object.get("category").and_then(Value::as_str)),
        media_type: trim_to_option(object.get("type").and_then(Value::as_str)),
    })
}

/// Reads a number or a numeric string.
fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Splits the legacy url column into drafts.
fn drafts_from_url_list(media_urls: &str, bucket: &str) -> Vec<MediaDraft> {
    split_media_urls(media_urls)
        .into_iter()
        .map(|url| normalize_stored_media_path(url, bucket))
        .filter(|url| !url.trim().is_empty())
        .enumerate()
        .map(|(index, url)| MediaDraft {
            url,
            thumbnail_url: None,
            order: index as f64,
            is_cover: index == 0,
            category: None,
            media_type: None,
        })
        .collect()
}

/// Splits a `mediaUrls` cell on `" | "` and newlines, dropping blank entries.
///
/// # Examples
///
/// ```
/// use estate_csv::media::split_media_urls;
///
/// assert_eq!(split_media_urls("a | b\nc\n\n"), vec!["a", "b", "c"]);
/// ```
#[must_use]
pub fn split_media_urls(media_urls: &str) -> Vec<&str> {
    media_urls
        .split('\n')
        .flat_map(|line| line.split(MEDIA_URL_SEPARATOR))
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Serializes media items using `settings` for URL building.
///
/// Shorthand for [`MediaColumnCodec::serialize`].
#[must_use]
pub fn serialize_media_columns(
    items: &[MediaItem],
    options: &MediaOptions,
    settings: &StorageSettings,
) -> MediaColumns {
    MediaColumnCodec::new(settings).serialize(items, options)
}

/// Parses media columns using `settings` for bucket resolution.
///
/// Shorthand for [`MediaColumnCodec::parse`].
#[must_use]
pub fn parse_media_columns(
    media_urls: &str,
    media_payload_json: &str,
    options: &MediaOptions,
    settings: &StorageSettings,
) -> Vec<MediaRecord> {
    MediaColumnCodec::new(settings).parse(media_urls, media_payload_json, options)
}
