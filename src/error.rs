//! Error module
//!
//! Defines custom error types using `thiserror` for the file-oriented tooling.
//! The CSV codec and the media column serializer never fail on bad data; only
//! reading/writing files and validating command-line input can produce an
//! [`EstateCsvError`].

use thiserror::Error;

/// The main error type for the export/import tooling.
///
/// # Error Categories
///
/// - **File I/O errors**: reading an export or writing a rewritten copy
/// - **Input errors**: malformed JSON media input, missing CSV columns
/// - **Configuration errors**: invalid argument combinations
///
/// # Example
///
/// ```rust,ignore
/// use estate_csv::error::EstateCsvError;
///
/// fn example() -> Result<(), EstateCsvError> {
///     let text = std::fs::read_to_string("listings-export.csv")?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum EstateCsvError {
    /// General I/O error.
    ///
    /// Raised for file system operations like opening, reading, or writing
    /// export files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    ///
    /// Raised when a media item file handed to the `columns` mode is not a
    /// JSON array of media items.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid command-line argument error.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A required header is absent from the CSV file.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// The import check found problem rows.
    ///
    /// The report has already been printed; this error only signals the exit
    /// code.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}
