//! Integration tests for checking export files before import

use estate_csv::config::StorageSettings;
use estate_csv::csv_codec::encode_csv_with_bom;
use estate_csv::error::EstateCsvError;
use estate_csv::media::{serialize_media_columns, MediaItem, MediaOptions};
use estate_csv::util::export_file_name;
use estate_csv::validator::{ImportValidator, RowIssue};

use chrono::{TimeZone, Utc};
use tempfile::tempdir;

fn cdn_options() -> MediaOptions {
    MediaOptions::new(
        Some("https://cdn.example.com".to_string()),
        Some("guzel-invest".to_string()),
    )
}

/// Writes an export the way the listings export would and checks it.
///
/// Setup:
/// 1. Serialize two media sets into columns
/// 2. Encode listing rows with a BOM into a temp file
/// 3. Run the validator over the file
#[test]
fn test_check_listing_export_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let at = Utc.with_ymd_and_hms(2026, 10, 17, 8, 0, 0).unwrap();
    let path = dir.path().join(export_file_name("listings", at));

    let settings = StorageSettings::default();
    let villa = serialize_media_columns(
        &[
            MediaItem::new("public/listings/v1/original/pool.webp").order(2.0),
            MediaItem::new("public/listings/v1/original/front.webp")
                .order(1.0)
                .cover()
                .thumbnail("public/listings/v1/thumb/front.webp"),
            MediaItem::new("public/listings/v1/original/pool.webp").category("EXTERIOR"),
        ],
        &cdn_options(),
        &settings,
    );
    let flat = serialize_media_columns(
        &[MediaItem::new("public/listings/f1/original/living.webp")],
        &cdn_options(),
        &settings,
    );

    let text = encode_csv_with_bom(
        &["title", "price", "phone", "mediaUrls", "mediaPayloadJson"],
        [
            vec![
                "Villa, sea view".to_string(),
                "450000".to_string(),
                "+90 555 123 45 67".to_string(),
                villa.media_urls,
                villa.media_payload_json,
            ],
            vec![
                "Flat \"Central\"".to_string(),
                "-".to_string(),
                String::new(),
                flat.media_urls,
                flat.media_payload_json,
            ],
        ],
    );
    std::fs::write(&path, text).expect("Failed to write export");
    assert!(path.ends_with("listings-export-2026-10-17.csv"));

    let stats = ImportValidator::new(&settings, cdn_options())
        .require_media(true)
        .validate(&path)
        .expect("Failed to check export");

    assert!(stats.is_valid());
    assert_eq!(stats.total_rows, 2);
    assert_eq!(stats.payload_rows, 2);
    assert_eq!(stats.url_list_rows, 0);
    assert_eq!(stats.media_records, 3);
    assert_eq!(stats.largest_media_set, 2);
    // phone and the lone "-" price were guarded on export
    assert_eq!(stats.guarded_cells, 2);

    let report = stats.to_string();
    assert!(report.contains("Status: PASSED"));
}

/// A hand-edited sheet with a legacy row, a short row and a row without media.
#[test]
fn test_check_reports_row_issues() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("projects-import.csv");
    std::fs::write(
        &path,
        "name,mediaUrls,mediaPayloadJson\r\n\
         Residence,public/projects/p1/a.webp | public/projects/p1/b.webp,\r\n\
         \r\n\
         Short Row\r\n\
         Towers,,[]\r\n",
    )
    .expect("Failed to write import file");

    let settings = StorageSettings::default();
    let stats = ImportValidator::new(&settings, MediaOptions::default())
        .require_media(true)
        .validate(&path)
        .expect("Failed to check import file");

    assert!(!stats.is_valid());
    assert_eq!(stats.total_rows, 3);
    assert_eq!(stats.valid_rows, 1);
    assert_eq!(stats.invalid_rows, 2);
    assert_eq!(stats.url_list_rows, 1);
    assert_eq!(stats.rows_without_media, 2);

    // The blank line is dropped, so the short row is row 3.
    assert_eq!(stats.issues[0].row_number, 3);
    assert_eq!(
        stats.issues[0].issue,
        RowIssue::InvalidFieldCount {
            expected: 3,
            actual: 1
        }
    );
    assert!(stats
        .issues
        .iter()
        .any(|issue| issue.row_number == 4 && issue.issue == RowIssue::MissingMedia));
    assert!(stats.to_string().contains("Status: FAILED"));
}

#[test]
fn test_check_without_media_columns_fails() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("articles.csv");
    std::fs::write(&path, "title,body\nHello,World\n").expect("Failed to write file");

    let settings = StorageSettings::default();
    let result = ImportValidator::new(&settings, MediaOptions::default()).validate(&path);
    assert!(matches!(result, Err(EstateCsvError::MissingColumn(_))));
}

#[test]
fn test_check_missing_file_is_io_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let settings = StorageSettings::default();
    let result = ImportValidator::new(&settings, MediaOptions::default())
        .validate(&dir.path().join("missing.csv"));
    assert!(matches!(result, Err(EstateCsvError::Io(_))));
}
