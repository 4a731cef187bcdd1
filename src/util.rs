//! Utility functions shared by the binary and export code.

use chrono::{DateTime, Utc};
use tracing_subscriber::EnvFilter;

/// Builds the download name for an export, e.g. `listings-export-2026-10-17.csv`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use estate_csv::util::export_file_name;
///
/// let at = Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap();
/// assert_eq!(export_file_name("projects", at), "projects-export-2026-10-17.csv");
/// ```
#[must_use]
pub fn export_file_name(prefix: &str, at: DateTime<Utc>) -> String {
    let prefix = prefix.trim().trim_matches('-');
    let prefix = if prefix.is_empty() { "data" } else { prefix };
    format!("{}-export-{}.csv", prefix, at.format("%Y-%m-%d"))
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` over `info`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
