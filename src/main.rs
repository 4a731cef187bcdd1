//! estate-csv - Check and rewrite listing CSV exports
//!
//! This CLI tool provides three operational modes:
//! - **Check**: Parse an export the way the import route would and report per-row results
//! - **Rebase**: Rewrite the media columns of an export for another storage location
//! - **Columns**: Serialize a JSON media list into the two export cells
//!
//! # Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | Configuration/argument error |
//! | 3 | File I/O error or failed check |

use clap::Parser;
use std::process::ExitCode;

use estate_csv::cli::{Args, Mode};
use estate_csv::config::StorageSettings;
use estate_csv::error::EstateCsvError;
use estate_csv::media::{MediaColumnCodec, MediaItem};
use estate_csv::rebase::MediaRebaser;
use estate_csv::util::init_logging;
use estate_csv::validator::ImportValidator;

/// Exit code for success
const EXIT_SUCCESS: u8 = 0;
/// Exit code for configuration/argument errors
const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for file I/O errors
const EXIT_IO_ERROR: u8 = 3;
/// Exit code for a failed import check (same as IO error)
const EXIT_VALIDATION_FAILURE: u8 = 3;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = args.validate() {
        eprintln!("Error: Configuration error: {}", e);
        eprintln!("  Hint: Use --help for usage information");
        return ExitCode::from(EXIT_CONFIG_ERROR);
    }

    // Environment is read once here and passed down explicitly.
    let settings = StorageSettings::from_env();
    tracing::debug!(
        base_url = %settings.base_url(),
        bucket = %settings.bucket_name(),
        "storage settings"
    );

    match run(&args, &settings) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(error_to_exit_code(&e))
        }
    }
}

fn run(args: &Args, settings: &StorageSettings) -> Result<(), EstateCsvError> {
    let file = args
        .file
        .as_deref()
        .ok_or_else(|| EstateCsvError::InvalidArgument("--file is required".to_string()))?;

    match args.mode {
        Mode::Check => run_check_mode(args, settings, file),
        Mode::Rebase => run_rebase_mode(args, settings, file),
        Mode::Columns => run_columns_mode(args, settings, file),
    }
}

/// Run in check mode.
///
/// Prints the import report to stdout and fails with exit code 3 when any
/// row has an issue.
fn run_check_mode(
    args: &Args,
    settings: &StorageSettings,
    file: &std::path::Path,
) -> Result<(), EstateCsvError> {
    eprintln!("Checking file: {:?}", file);

    let validator = ImportValidator::new(settings, args.source_options())
        .with_columns(args.urls_column.trim(), args.payload_column.trim())
        .require_media(args.require_media);

    let stats = validator.validate(file)?;
    println!("{}", stats);

    if stats.is_valid() {
        eprintln!("Check complete. All {} rows are valid.", stats.valid_rows);
        Ok(())
    } else {
        eprintln!(
            "Check failed. {} of {} rows have issues.",
            stats.invalid_rows, stats.total_rows
        );
        Err(EstateCsvError::ValidationFailed(format!(
            "{} invalid rows found",
            stats.invalid_rows
        )))
    }
}

/// Run in rebase mode.
fn run_rebase_mode(
    args: &Args,
    settings: &StorageSettings,
    file: &std::path::Path,
) -> Result<(), EstateCsvError> {
    let output = args.output.as_deref().ok_or_else(|| {
        EstateCsvError::InvalidArgument("--output is required for rebase mode".to_string())
    })?;

    eprintln!("Input file: {:?}", file);
    eprintln!("Output file: {:?}", output);

    let rebaser = MediaRebaser::new(settings, args.source_options(), args.target_options())
        .with_bom(!args.no_bom);
    let stats = rebaser.rebase(file, output)?;
    println!("{}", stats);

    eprintln!(
        "Rebase complete. {} rows processed, {} rewritten.",
        stats.total_rows, stats.rewritten_rows
    );
    Ok(())
}

/// Run in columns mode.
///
/// Reads a JSON array of media items and prints the `mediaUrls` and
/// `mediaPayloadJson` cells, one per line.
fn run_columns_mode(
    args: &Args,
    settings: &StorageSettings,
    file: &std::path::Path,
) -> Result<(), EstateCsvError> {
    let text = std::fs::read_to_string(file)?;
    let items: Vec<MediaItem> = serde_json::from_str(&text)?;
    tracing::debug!(items = items.len(), "serializing media list");

    let columns = MediaColumnCodec::new(settings).serialize(&items, &args.source_options());

    match &args.output {
        Some(output) => {
            std::fs::write(output, serde_json::to_string_pretty(&columns)?)?;
            eprintln!("Wrote media columns to {:?}", output);
        }
        None => {
            println!("{}", columns.media_urls);
            println!("{}", columns.media_payload_json);
        }
    }
    Ok(())
}

/// Map an error to its process exit code.
fn error_to_exit_code(error: &EstateCsvError) -> u8 {
    match error {
        EstateCsvError::InvalidArgument(_) => EXIT_CONFIG_ERROR,
        EstateCsvError::ValidationFailed(_) => EXIT_VALIDATION_FAILURE,
        EstateCsvError::Io(_) => EXIT_IO_ERROR,
        EstateCsvError::Json(_) => EXIT_IO_ERROR,
        EstateCsvError::MissingColumn(_) => EXIT_IO_ERROR,
    }
}
