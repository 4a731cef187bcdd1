use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One media asset attached to a listing or project.
///
/// `url` and `thumbnail_url` hold bucket-relative storage paths while a record
/// is in memory; the serializer swaps them for public URLs only in its output.
/// Serialized keys follow the export payload column: `url`, `thumbnailUrl`,
/// `order`, `isCover`, `category`, `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub order: u32,
    pub is_cover: bool,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
}

/// A partial media record as handed in by export code.
///
/// Only `url` matters; items without a non-blank `url` are dropped during
/// normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaItem {
    pub url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub order: Option<f64>,
    pub is_cover: Option<bool>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
}

impl MediaItem {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn thumbnail(mut self, thumbnail_url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(thumbnail_url.into());
        self
    }

    pub fn order(mut self, order: f64) -> Self {
        self.order = Some(order);
        self
    }

    pub fn cover(mut self) -> Self {
        self.is_cover = Some(true);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }
}

impl From<&MediaRecord> for MediaItem {
    fn from(record: &MediaRecord) -> Self {
        Self {
            url: Some(record.url.clone()),
            thumbnail_url: record.thumbnail_url.clone(),
            order: Some(f64::from(record.order)),
            is_cover: Some(record.is_cover),
            category: record.category.clone(),
            media_type: record.media_type.clone(),
        }
    }
}

/// Trims an optional tag, mapping blank values to `None`.
pub(crate) fn trim_to_option(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
}

/// A record before de-duplication, still carrying its raw sort key.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MediaDraft {
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub order: f64,
    pub is_cover: bool,
    pub category: Option<String>,
    pub media_type: Option<String>,
}

impl MediaDraft {
    /// Builds a draft from an input item at position `index`.
    ///
    /// Returns `None` when the item has no usable url.
    pub(crate) fn from_item(item: &MediaItem, index: usize) -> Option<Self> {
        let url = trim_to_option(item.url.as_deref())?;
        Some(Self {
            url,
            thumbnail_url: trim_to_option(item.thumbnail_url.as_deref()),
            order: finite_or_index(item.order, index),
            is_cover: item.is_cover == Some(true),
            category: trim_to_option(item.category.as_deref()),
            media_type: trim_to_option(item.media_type.as_deref()),
        })
    }

    fn absorb(&mut self, later: MediaDraft) {
        if later.thumbnail_url.is_some() {
            self.thumbnail_url = later.thumbnail_url;
        }
        if later.category.is_some() {
            self.category = later.category;
        }
        if later.media_type.is_some() {
            self.media_type = later.media_type;
        }
        self.is_cover |= later.is_cover;
    }
}

/// Uses `order` when it is a finite number, the item's position otherwise.
pub(crate) fn finite_or_index(order: Option<f64>, index: usize) -> f64 {
    match order {
        Some(order) if order.is_finite() => order,
        _ => index as f64,
    }
}

/// Merges drafts by url, sorts them by order and assigns the cover.
///
/// - duplicate urls merge into the first occurrence: later non-empty
///   thumbnail, category and type win, the first order is kept and the cover
///   flags are OR-combined;
/// - the merged set is stably sorted by order and renumbered `0..n-1`;
/// - exactly one record ends up as cover: the first flagged one in final
///   order, or the first record when none is flagged.
pub(crate) fn merge_drafts(drafts: impl IntoIterator<Item = MediaDraft>) -> Vec<MediaRecord> {
    let mut merged: Vec<MediaDraft> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for draft in drafts {
        match positions.get(&draft.url) {
            Some(&position) => merged[position].absorb(draft),
            None => {
                positions.insert(draft.url.clone(), merged.len());
                merged.push(draft);
            }
        }
    }

    merged.sort_by(|a, b| a.order.total_cmp(&b.order));

    let cover = merged
        .iter()
        .position(|draft| draft.is_cover)
        .unwrap_or(0);

    merged
        .into_iter()
        .enumerate()
        .map(|(index, draft)| MediaRecord {
            url: draft.url,
            thumbnail_url: draft.thumbnail_url,
            order: u32::try_from(index).unwrap_or(u32::MAX),
            is_cover: index == cover,
            category: draft.category,
            media_type: draft.media_type,
        })
        .collect()
}

/// Normalizes partial media items into a de-duplicated, densely ordered set.
///
/// Paths are left as given; see the column serializer for URL rewriting.
///
/// # Examples
///
/// ```
/// use estate_csv::media::{normalize_media_items, MediaItem};
///
/// let records = normalize_media_items(&[MediaItem::new("a"), MediaItem::new("b")]);
/// assert!(records[0].is_cover);
/// assert!(!records[1].is_cover);
/// ```
#[must_use]
pub fn normalize_media_items(items: &[MediaItem]) -> Vec<MediaRecord> {
    merge_drafts(
        items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| MediaDraft::from_item(item, index)),
    )
}
