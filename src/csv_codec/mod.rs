//! CSV codec module
//!
//! Encodes export rows to CSV text and parses uploaded CSV text back into rows.
//! The codec is lenient: decoding never fails, and encoding
//! guards spreadsheet formulas with a `'` prefix that is not removed again.

pub mod encoding;
pub mod reader;
pub mod table;
pub mod writer;

pub use encoding::{
    encode_cell, needs_formula_guard, CsvValue, FORMULA_GUARD_PREFIX, FORMULA_TRIGGERS, UTF8_BOM,
};
pub use reader::parse_csv;
pub use table::CsvTable;
pub use writer::{encode_csv, encode_csv_with_bom};
