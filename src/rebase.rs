//! Media rebase module
//!
//! Rewrites the media columns of an existing export so their URLs point at a
//! different object storage location, for example after moving the bucket to
//! a CDN host or when preparing a staging import from a production export.
//!
//! # Overview
//!
//! Each row's media is parsed against the *source* storage options (so the old
//! URLs reduce to bucket-relative paths) and serialized again against the
//! *target* options. Rows without media columns content are copied unchanged.
//! Legacy rows that only carried a url list gain a payload column value.
//!
//! # Example
//!
//! ```no_run
//! use estate_csv::config::StorageSettings;
//! use estate_csv::media::MediaOptions;
//! use estate_csv::rebase::MediaRebaser;
//! use std::path::Path;
//!
//! let settings = StorageSettings::from_env();
//! let target = MediaOptions::new(Some("https://cdn.example.com".into()), None);
//! let rebaser = MediaRebaser::new(&settings, MediaOptions::default(), target);
//! let stats = rebaser
//!     .rebase(Path::new("listings-export.csv"), Path::new("listings-cdn.csv"))
//!     .unwrap();
//! println!("{}", stats);
//! ```

use std::fmt;
use std::path::Path;

use crate::config::StorageSettings;
use crate::csv_codec::CsvTable;
use crate::error::EstateCsvError;
use crate::media::{
    MediaColumnCodec, MediaItem, MediaOptions, MediaSource, MEDIA_PAYLOAD_COLUMN, MEDIA_URLS_COLUMN,
};

/// Statistics collected during a rebase.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RebaseStats {
    /// Number of data rows processed.
    pub total_rows: u64,
    /// Rows whose media columns were rewritten.
    pub rewritten_rows: u64,
    /// Rows copied unchanged because they carried no media.
    pub unchanged_rows: u64,
    /// Rewritten rows that came from the legacy url list.
    pub upgraded_rows: u64,
    /// Media records written across all rows.
    pub media_records: u64,
}

impl fmt::Display for RebaseStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CSV Media Rebase Report")?;
        writeln!(f, "=======================")?;
        writeln!(f)?;
        writeln!(f, "Statistics:")?;
        writeln!(f, "  Total rows:        {:>10}", self.total_rows)?;
        writeln!(f, "  Rewritten rows:    {:>10}", self.rewritten_rows)?;
        writeln!(f, "  Unchanged rows:    {:>10}", self.unchanged_rows)?;
        writeln!(f, "  Upgraded rows:     {:>10}", self.upgraded_rows)?;
        writeln!(f, "  Media records:     {:>10}", self.media_records)?;
        Ok(())
    }
}

/// Rewrites media columns from one storage location to another.
pub struct MediaRebaser<'a> {
    codec: MediaColumnCodec<'a>,
    source: MediaOptions,
    target: MediaOptions,
    with_bom: bool,
}

impl<'a> MediaRebaser<'a> {
    pub fn new(settings: &'a StorageSettings, source: MediaOptions, target: MediaOptions) -> Self {
        Self {
            codec: MediaColumnCodec::new(settings),
            source,
            target,
            with_bom: true,
        }
    }

    /// Whether the output starts with a byte order mark (default: yes).
    pub fn with_bom(mut self, with_bom: bool) -> Self {
        self.with_bom = with_bom;
        self
    }

    /// Reads `input`, rewrites its media columns and writes `output`.
    pub fn rebase(&self, input: &Path, output: &Path) -> Result<RebaseStats, EstateCsvError> {
        let text = std::fs::read_to_string(input)?;
        let (rewritten, stats) = self.rebase_text(&text)?;
        std::fs::write(output, rewritten)?;
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            rows = stats.total_rows,
            "rebased media columns"
        );
        Ok(stats)
    }

    /// Rewrites the media columns of export text.
    ///
    /// Both media columns must be present: the payload column is the one
    /// being rewritten and the url column is kept in step with it.
    pub fn rebase_text(&self, text: &str) -> Result<(String, RebaseStats), EstateCsvError> {
        let mut table = CsvTable::from_text(text);
        let urls_index = table
            .column_index(MEDIA_URLS_COLUMN)
            .ok_or_else(|| EstateCsvError::MissingColumn(MEDIA_URLS_COLUMN.to_string()))?;
        let payload_index = table
            .column_index(MEDIA_PAYLOAD_COLUMN)
            .ok_or_else(|| EstateCsvError::MissingColumn(MEDIA_PAYLOAD_COLUMN.to_string()))?;
        let width = table.headers().len();

        let mut stats = RebaseStats::default();
        for row in table.rows_mut() {
            stats.total_rows += 1;

            let urls = row.get(urls_index).map(String::as_str).unwrap_or("");
            let payload = row.get(payload_index).map(String::as_str).unwrap_or("");
            let (records, source) = self.codec.parse_with_source(urls, payload, &self.source);
            if source == MediaSource::Empty {
                stats.unchanged_rows += 1;
                continue;
            }

            let items: Vec<MediaItem> = records.iter().map(MediaItem::from).collect();
            let columns = self.codec.serialize(&items, &self.target);

            if row.len() < width {
                row.resize(width, String::new());
            }
            row[urls_index] = columns.media_urls;
            row[payload_index] = columns.media_payload_json;

            stats.rewritten_rows += 1;
            stats.media_records += records.len() as u64;
            if source == MediaSource::UrlList {
                stats.upgraded_rows += 1;
            }
        }

        Ok((table.to_csv(self.with_bom), stats))
    }
}
