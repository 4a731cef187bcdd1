//! Media column module
//!
//! Converts the media attached to a listing or project into two CSV cells
//! (`mediaUrls` and `mediaPayloadJson`) and back, rewriting storage paths to
//! public URLs on export and back to bucket-relative paths on import.
//!
//! Nothing in this module fails on bad data: malformed payloads fall back to
//! the url list, unrecognized URLs pass through, and items without a url are
//! dropped.

pub mod columns;
pub mod paths;
pub mod record;

pub use columns::{
    parse_media_columns, serialize_media_columns, split_media_urls, MediaColumnCodec, MediaColumns,
    MediaSource, MEDIA_PAYLOAD_COLUMN, MEDIA_URLS_COLUMN, MEDIA_URL_SEPARATOR,
};
pub use paths::{
    build_public_media_url, is_absolute_http_url, normalize_stored_media_path, resolve_base_url,
    resolve_bucket, MediaOptions,
};
pub use record::{normalize_media_items, MediaItem, MediaRecord};
