use super::reader::parse_csv;
use super::writer::{encode_csv, encode_csv_with_bom};

/// A parsed CSV file: the first row as headers, the rest as data rows.
///
/// Rows are kept exactly as the parser produced them, so malformed input may
/// leave them shorter or longer than the header row. Cell lookups past the end
/// of a short row return `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Parses CSV text with [`parse_csv`] and splits off the header row.
    ///
    /// Empty text yields an empty table.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut rows = parse_csv(text).into_iter();
        let headers = rows.next().unwrap_or_default();
        Self {
            headers,
            rows: rows.collect(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Vec<String>] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a header, matched after trimming.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.trim() == name)
    }

    /// Cell of `row` under the header `name`.
    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        let column = self.column_index(name)?;
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }

    /// Re-encodes the table with [`encode_csv`] or [`encode_csv_with_bom`].
    ///
    /// The formula guard applies again, so a table parsed from an export keeps
    /// its already-guarded cells unchanged.
    #[must_use]
    pub fn to_csv(&self, with_bom: bool) -> String {
        if with_bom {
            encode_csv_with_bom(&self.headers, &self.rows)
        } else {
            encode_csv(&self.headers, &self.rows)
        }
    }
}
