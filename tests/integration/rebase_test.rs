//! Integration tests for moving export media to another storage location

use estate_csv::config::StorageSettings;
use estate_csv::csv_codec::{encode_csv_with_bom, CsvTable};
use estate_csv::error::EstateCsvError;
use estate_csv::media::{
    parse_media_columns, serialize_media_columns, MediaItem, MediaOptions, MEDIA_PAYLOAD_COLUMN,
    MEDIA_URLS_COLUMN,
};
use estate_csv::rebase::MediaRebaser;
use estate_csv::validator::ImportValidator;

use tempfile::tempdir;

fn local_options() -> MediaOptions {
    MediaOptions::new(
        Some("localhost:9000".to_string()),
        Some("guzel-invest".to_string()),
    )
}

fn cdn_options() -> MediaOptions {
    MediaOptions::new(
        Some("cdn.example.com".to_string()),
        Some("guzel-invest".to_string()),
    )
}

/// Rebases a local export onto a CDN host and reads it back.
///
/// Setup:
/// 1. Export two listings against the local object store
/// 2. Rebase the file onto the CDN host
/// 3. Parse the output and compare relative paths with the original items
#[test]
fn test_rebase_file_to_cdn() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("listings-export.csv");
    let output = dir.path().join("listings-cdn.csv");

    let settings = StorageSettings::default();
    let items = vec![
        MediaItem::new("public/listings/abc/original/1.webp")
            .thumbnail("public/listings/abc/thumb/1.webp")
            .cover(),
        MediaItem::new("public/listings/abc/original/2.webp").category("INTERIOR"),
    ];
    let columns = serialize_media_columns(&items, &local_options(), &settings);
    assert!(columns.media_urls.starts_with("http://localhost:9000/guzel-invest/"));

    let text = encode_csv_with_bom(
        &["id", "title", "mediaUrls", "mediaPayloadJson"],
        [
            vec![
                "abc".to_string(),
                "Garden Villa".to_string(),
                columns.media_urls,
                columns.media_payload_json,
            ],
            vec![
                "def".to_string(),
                "Legacy Flat".to_string(),
                "http://localhost:9000/guzel-invest/public/listings/def/original/1.webp".to_string(),
                String::new(),
            ],
            vec![
                "ghi".to_string(),
                "No Photos".to_string(),
                String::new(),
                String::new(),
            ],
        ],
    );
    std::fs::write(&input, text).expect("Failed to write export");

    let stats = MediaRebaser::new(&settings, local_options(), cdn_options())
        .rebase(&input, &output)
        .expect("Failed to rebase export");

    assert_eq!(stats.total_rows, 3);
    assert_eq!(stats.rewritten_rows, 2);
    assert_eq!(stats.unchanged_rows, 1);
    assert_eq!(stats.upgraded_rows, 1);
    assert_eq!(stats.media_records, 3);
    assert!(stats.to_string().contains("Rewritten rows:"));

    let rewritten = std::fs::read_to_string(&output).expect("Failed to read output");
    assert!(rewritten.starts_with('\u{FEFF}'));
    assert!(!rewritten.contains("localhost"));

    let table = CsvTable::from_text(&rewritten);
    assert_eq!(table.len(), 3);
    assert_eq!(
        table.cell(0, MEDIA_URLS_COLUMN),
        Some(
            "https://cdn.example.com/guzel-invest/public/listings/abc/original/1.webp | \
             https://cdn.example.com/guzel-invest/public/listings/abc/original/2.webp"
        )
    );

    let records = parse_media_columns(
        table.cell(0, MEDIA_URLS_COLUMN).unwrap_or(""),
        table.cell(0, MEDIA_PAYLOAD_COLUMN).unwrap_or(""),
        &cdn_options(),
        &settings,
    );
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].url, "public/listings/abc/original/1.webp");
    assert_eq!(
        records[0].thumbnail_url.as_deref(),
        Some("public/listings/abc/thumb/1.webp")
    );
    assert!(records[0].is_cover);
    assert_eq!(records[1].category.as_deref(), Some("INTERIOR"));

    // The legacy row now carries a payload.
    let legacy_payload = table.cell(1, MEDIA_PAYLOAD_COLUMN).unwrap_or("");
    assert!(legacy_payload.contains("\"isCover\":true"));

    // Rows without media are untouched.
    assert_eq!(table.cell(2, MEDIA_URLS_COLUMN), Some(""));

    // The rebased file passes the import check against the new host.
    let check = ImportValidator::new(&settings, cdn_options())
        .validate(&output)
        .expect("Failed to check rebased export");
    assert!(check.is_valid());
    assert_eq!(check.payload_rows, 2);
}

#[test]
fn test_rebase_without_bom() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    std::fs::write(
        &input,
        "title,mediaUrls,mediaPayloadJson\nFlat,public/a.webp,\n",
    )
    .expect("Failed to write input");

    let settings = StorageSettings::default();
    MediaRebaser::new(&settings, local_options(), cdn_options())
        .with_bom(false)
        .rebase(&input, &output)
        .expect("Failed to rebase");

    let rewritten = std::fs::read_to_string(&output).expect("Failed to read output");
    assert!(rewritten.starts_with("title,mediaUrls,mediaPayloadJson\n"));
    assert!(rewritten.contains("https://cdn.example.com/guzel-invest/public/a.webp"));
}

#[test]
fn test_rebase_requires_both_media_columns() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    std::fs::write(&input, "title,mediaUrls\nFlat,public/a.webp\n").expect("Failed to write input");

    let settings = StorageSettings::default();
    let result = MediaRebaser::new(&settings, local_options(), cdn_options()).rebase(&input, &output);

    assert!(matches!(result, Err(EstateCsvError::MissingColumn(column)) if column == MEDIA_PAYLOAD_COLUMN));
    assert!(!output.exists());
}
