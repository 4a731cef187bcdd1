//! CLI argument parsing module
//!
//! Handles command-line argument parsing using `clap` derive macros.
//! This module defines the `Mode` enum for operation modes and the `Args` struct
//! containing all CLI arguments with validation logic.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::media::{MediaOptions, MEDIA_PAYLOAD_COLUMN, MEDIA_URLS_COLUMN};

/// Operation mode for the export tool.
///
/// - **Check**: parse an export the way an import would and report per-row results
/// - **Rebase**: rewrite the media columns of an export for another storage location
/// - **Columns**: turn a JSON array of media items into the two export cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Check a CSV export before importing it
    Check,
    /// Rewrite media URLs of a CSV export
    Rebase,
    /// Serialize a JSON media list into export columns
    Columns,
}

/// Command-line arguments for the export tool.
///
/// Use the `validate()` method after parsing to ensure argument combinations are valid.
///
/// # Example
///
/// ```rust,ignore
/// use clap::Parser;
/// use estate_csv::cli::Args;
///
/// let args = Args::parse();
/// args.validate()?;
/// ```
#[derive(Parser, Debug)]
#[command(name = "estate-csv")]
#[command(about = "Check and rewrite listing CSV exports")]
#[command(version)]
pub struct Args {
    /// Operation mode: check, rebase, or columns
    #[arg(long, value_enum)]
    pub mode: Mode,

    /// Input file (CSV export, or JSON media list for columns mode)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Output file path (required for rebase mode)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Object storage base URL the file's media URLs were built with
    #[arg(long)]
    pub minio_base_url: Option<String>,

    /// Object storage bucket the file's media URLs were built with
    #[arg(long)]
    pub minio_bucket: Option<String>,

    /// Base URL to rewrite media URLs to (rebase mode)
    #[arg(long)]
    pub target_base_url: Option<String>,

    /// Bucket to rewrite media URLs to (rebase mode)
    #[arg(long)]
    pub target_bucket: Option<String>,

    /// Header of the pipe-separated media URL column
    #[arg(long, default_value = MEDIA_URLS_COLUMN)]
    pub urls_column: String,

    /// Header of the JSON media payload column
    #[arg(long, default_value = MEDIA_PAYLOAD_COLUMN)]
    pub payload_column: String,

    /// Report rows without media as invalid (check mode)
    #[arg(long, default_value = "false")]
    pub require_media: bool,

    /// Write output without a UTF-8 byte order mark
    #[arg(long, default_value = "false")]
    pub no_bom: bool,

    /// Enable debug logging
    #[arg(short = 'v', long, default_value = "false")]
    pub verbose: bool,
}

impl Args {
    /// Validate argument combinations.
    ///
    /// - `--file` is required in every mode
    /// - `--output` is required for rebase mode
    /// - rebase mode needs `--target-base-url` or `--target-bucket`
    /// - target flags are only accepted in rebase mode
    /// - the two media column headers must differ
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the argument combination is valid
    /// - `Err(String)` with a descriptive error message if validation fails
    pub fn validate(&self) -> Result<(), String> {
        if self.file.is_none() {
            return Err("--file is required".to_string());
        }

        if self.urls_column.trim().is_empty() || self.payload_column.trim().is_empty() {
            return Err("media column names cannot be empty".to_string());
        }

        if self.urls_column.trim() == self.payload_column.trim() {
            return Err("--urls-column and --payload-column must differ".to_string());
        }

        let has_target = self.target_base_url.is_some() || self.target_bucket.is_some();

        match self.mode {
            Mode::Rebase => {
                if self.output.is_none() {
                    return Err("--output is required for rebase mode".to_string());
                }
                if !has_target {
                    return Err(
                        "rebase mode requires --target-base-url or --target-bucket".to_string(),
                    );
                }
                if self.urls_column != MEDIA_URLS_COLUMN
                    || self.payload_column != MEDIA_PAYLOAD_COLUMN
                {
                    return Err("rebase mode only supports the default media columns".to_string());
                }
            }
            Mode::Check | Mode::Columns => {
                if has_target {
                    return Err("--target-* flags are only valid in rebase mode".to_string());
                }
            }
        }

        if self.require_media && self.mode != Mode::Check {
            return Err("--require-media is only valid in check mode".to_string());
        }

        Ok(())
    }

    /// Storage options describing where the input's URLs point.
    pub fn source_options(&self) -> MediaOptions {
        MediaOptions::new(self.minio_base_url.clone(), self.minio_bucket.clone())
    }

    /// Storage options for rewritten URLs.
    ///
    /// Unset target fields inherit the source options, so moving only the
    /// host keeps the bucket and the other way round.
    pub fn target_options(&self) -> MediaOptions {
        MediaOptions::new(
            self.target_base_url
                .clone()
                .or_else(|| self.minio_base_url.clone()),
            self.target_bucket
                .clone()
                .or_else(|| self.minio_bucket.clone()),
        )
    }
}
