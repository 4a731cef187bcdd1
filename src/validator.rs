//! Import check module
//!
//! Reads a listing/project export the way the import route would and reports
//! what it would get out of each row, without writing anything.
//!
//! # Overview
//!
//! For every data row the check:
//! - compares the field count against the header row;
//! - parses the media columns, noting whether the JSON payload or the legacy
//!   url list was used;
//! - optionally flags rows that carry no media at all;
//! - counts cells carrying the formula guard prefix.
//!
//! # Example
//!
//! ```rust,ignore
//! use estate_csv::config::StorageSettings;
//! use estate_csv::media::MediaOptions;
//! use estate_csv::validator::ImportValidator;
//! use std::path::Path;
//!
//! let settings = StorageSettings::from_env();
//! let validator = ImportValidator::new(&settings, MediaOptions::default());
//! let stats = validator.validate(Path::new("listings-export.csv"))?;
//! println!("{}", stats);
//! ```

use std::fmt;
use std::path::Path;

use crate::config::StorageSettings;
use crate::csv_codec::{CsvTable, FORMULA_GUARD_PREFIX, FORMULA_TRIGGERS};
use crate::error::EstateCsvError;
use crate::media::{MediaColumnCodec, MediaOptions, MediaSource, MEDIA_PAYLOAD_COLUMN, MEDIA_URLS_COLUMN};

/// Problem found in a single data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowIssue {
    /// The row has a different number of cells than the header row.
    InvalidFieldCount {
        /// Number of header cells.
        expected: usize,
        /// Number of cells found in the row.
        actual: usize,
    },

    /// Neither media column produced a record.
    ///
    /// Only reported when the validator requires media.
    MissingMedia,
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowIssue::InvalidFieldCount { expected, actual } => write!(
                f,
                "Invalid field count: expected {} fields, found {}",
                expected, actual
            ),
            RowIssue::MissingMedia => write!(f, "No media records in mediaPayloadJson or mediaUrls"),
        }
    }
}

/// A row issue together with the row it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportIssue {
    /// 1-based row number among non-blank rows; the header is row 1.
    ///
    /// Counts parsed records, not file lines: a quoted cell spanning several
    /// lines still counts as one row, and blank lines are skipped, so this can
    /// be lower than the line number an editor shows.
    pub row_number: u64,
    pub issue: RowIssue,
}

impl fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row_number, self.issue)
    }
}

/// Statistics collected while checking an export.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStats {
    /// Number of data rows (header and blank rows excluded).
    pub total_rows: u64,
    pub valid_rows: u64,
    pub invalid_rows: u64,
    /// Rows whose media came from the JSON payload column.
    pub payload_rows: u64,
    /// Rows whose media came from the legacy url list.
    pub url_list_rows: u64,
    /// Rows with no media in either column.
    pub rows_without_media: u64,
    /// Media records across all rows, after de-duplication.
    pub media_records: u64,
    /// Largest media set found in a single row.
    pub largest_media_set: usize,
    /// Cells starting with the formula guard prefix.
    pub guarded_cells: u64,
    pub issues: Vec<ImportIssue>,
}

impl ImportStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no row had an issue.
    pub fn is_valid(&self) -> bool {
        self.invalid_rows == 0
    }

    fn record_media(&mut self, count: usize, source: MediaSource) {
        match source {
            MediaSource::Payload => self.payload_rows += 1,
            MediaSource::UrlList => self.url_list_rows += 1,
            MediaSource::Empty => self.rows_without_media += 1,
        }
        self.media_records += count as u64;
        self.largest_media_set = self.largest_media_set.max(count);
    }

    fn record_row(&mut self, row_number: u64, issues: Vec<RowIssue>) {
        self.total_rows += 1;
        if issues.is_empty() {
            self.valid_rows += 1;
            return;
        }
        self.invalid_rows += 1;
        self.issues.extend(
            issues
                .into_iter()
                .map(|issue| ImportIssue { row_number, issue }),
        );
    }
}

impl fmt::Display for ImportStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CSV Import Check")?;
        writeln!(f, "================")?;
        writeln!(
            f,
            "Status: {}",
            if self.is_valid() { "PASSED" } else { "FAILED" }
        )?;
        writeln!(f)?;
        writeln!(f, "Statistics:")?;
        writeln!(f, "  Total rows:          {:>10}", self.total_rows)?;
        writeln!(f, "  Valid rows:          {:>10}", self.valid_rows)?;
        writeln!(f, "  Invalid rows:        {:>10}", self.invalid_rows)?;
        writeln!(f, "  Payload rows:        {:>10}", self.payload_rows)?;
        writeln!(f, "  Url list rows:       {:>10}", self.url_list_rows)?;
        writeln!(f, "  Rows without media:  {:>10}", self.rows_without_media)?;
        writeln!(f, "  Media records:       {:>10}", self.media_records)?;
        writeln!(f, "  Largest media set:   {:>10}", self.largest_media_set)?;
        writeln!(f, "  Guarded cells:       {:>10}", self.guarded_cells)?;

        if !self.issues.is_empty() {
            writeln!(f)?;
            writeln!(f, "Issues:")?;
            for issue in &self.issues {
                writeln!(f, "  {}", issue)?;
            }
        }

        Ok(())
    }
}

/// Returns true for a cell the encoder prefixed with the formula guard.
fn is_guarded_cell(cell: &str) -> bool {
    cell.strip_prefix(FORMULA_GUARD_PREFIX)
        .is_some_and(|rest| rest.starts_with(FORMULA_TRIGGERS))
}

/// Checks export files against the media column rules.
pub struct ImportValidator<'a> {
    codec: MediaColumnCodec<'a>,
    options: MediaOptions,
    urls_column: String,
    payload_column: String,
    require_media: bool,
}

impl<'a> ImportValidator<'a> {
    /// Creates a validator reading the default `mediaUrls` and
    /// `mediaPayloadJson` columns.
    pub fn new(settings: &'a StorageSettings, options: MediaOptions) -> Self {
        Self {
            codec: MediaColumnCodec::new(settings),
            options,
            urls_column: MEDIA_URLS_COLUMN.to_string(),
            payload_column: MEDIA_PAYLOAD_COLUMN.to_string(),
            require_media: false,
        }
    }

    pub fn with_columns(mut self, urls_column: impl Into<String>, payload_column: impl Into<String>) -> Self {
        self.urls_column = urls_column.into();
        self.payload_column = payload_column.into();
        self
    }

    /// Report rows without any media as issues.
    pub fn require_media(mut self, require_media: bool) -> Self {
        self.require_media = require_media;
        self
    }

    /// Reads and checks an export file.
    pub fn validate(&self, path: &Path) -> Result<ImportStats, EstateCsvError> {
        let text = std::fs::read_to_string(path)?;
        tracing::info!(path = %path.display(), bytes = text.len(), "checking export");
        self.validate_text(&text)
    }

    /// Checks export text.
    ///
    /// Fails only when neither media column is present in the header row.
    pub fn validate_text(&self, text: &str) -> Result<ImportStats, EstateCsvError> {
        let table = CsvTable::from_text(text);
        let urls_index = table.column_index(&self.urls_column);
        let payload_index = table.column_index(&self.payload_column);
        if urls_index.is_none() && payload_index.is_none() {
            return Err(EstateCsvError::MissingColumn(format!(
                "{} or {}",
                self.urls_column, self.payload_column
            )));
        }

        let expected = table.headers().len();
        let mut stats = ImportStats::new();

        for (index, row) in table.rows().iter().enumerate() {
            // header is row 1
            let row_number = index as u64 + 2;
            let mut issues = Vec::new();

            if row.len() != expected {
                issues.push(RowIssue::InvalidFieldCount {
                    expected,
                    actual: row.len(),
                });
            }

            stats.guarded_cells += row.iter().filter(|cell| is_guarded_cell(cell)).count() as u64;

            let cell = |column: Option<usize>| {
                column
                    .and_then(|column| row.get(column))
                    .map(String::as_str)
                    .unwrap_or("")
            };
            let (records, source) =
                self.codec
                    .parse_with_source(cell(urls_index), cell(payload_index), &self.options);
            if source == MediaSource::UrlList {
                tracing::debug!(row = row_number, "media read from legacy url list");
            }
            if self.require_media && records.is_empty() {
                issues.push(RowIssue::MissingMedia);
            }
            stats.record_media(records.len(), source);
            stats.record_row(row_number, issues);
        }

        Ok(stats)
    }
}
