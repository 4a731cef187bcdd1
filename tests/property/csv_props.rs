//! Property-based tests for the CSV codec
//!
//! Covers the encode/decode round trip, the formula guard, blank-line
//! tolerance, and interoperability with a standard RFC 4180 reader.

use proptest::prelude::*;

use estate_csv::csv_codec::{encode_csv, encode_csv_with_bom, parse_csv};

/// Strategy for cell text that does not start with a formula trigger
fn safe_cell_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Plain alphanumeric cells
        "[a-zA-Z0-9 ]{0,20}".prop_map(|s| s),
        // Cells with commas
        "[a-zA-Z0-9]{1,8},[a-zA-Z0-9 ]{0,8}".prop_map(|s| s),
        // Cells with double quotes
        "[a-zA-Z0-9]{0,8}\"[a-zA-Z0-9]{0,8}\"".prop_map(|s| s),
        // Cells with newlines
        "[a-zA-Z0-9]{1,8}\n[a-zA-Z0-9]{0,8}".prop_map(|s| s),
        // Cells with CRLF
        "[a-zA-Z0-9]{1,8}\r\n[a-zA-Z0-9]{0,8}".prop_map(|s| s),
        // Non-ASCII text
        Just("Güzel Invest".to_string()),
        Just("Alanya, Türkiye".to_string()),
        Just(r#"{"url":"public/a.webp","isCover":true}"#.to_string()),
        Just(String::new()),
    ]
}

/// Strategy for cells that a spreadsheet would treat as a formula
fn formula_cell_strategy() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just('='), Just('+'), Just('-'), Just('@')],
        "[a-zA-Z0-9(),:]{0,12}",
    )
        .prop_map(|(trigger, rest)| format!("{}{}", trigger, rest))
}

/// Strategy for a header row of non-blank labels
fn header_strategy(width: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z][a-zA-Z]{0,10}", width)
}

/// Strategy for a rectangular table of `width` columns
///
/// The first cell is a non-blank id so no row is dropped as blank.
fn table_strategy() -> impl Strategy<Value = (Vec<String>, Vec<Vec<String>>)> {
    (1usize..6).prop_flat_map(|width| {
        let row = (
            "[a-z0-9]{1,6}",
            prop::collection::vec(safe_cell_strategy(), width - 1),
        )
            .prop_map(|(id, rest)| {
                let mut row = vec![id];
                row.extend(rest);
                row
            });
        (
            header_strategy(width),
            prop::collection::vec(row, 0..8),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Decoding encoded text reproduces headers and rows.
    #[test]
    fn property_roundtrip_preserves_table(
        (headers, rows) in table_strategy()
    ) {
        let text = encode_csv(&headers, &rows);
        let parsed = parse_csv(&text);

        let mut expected = vec![headers.clone()];
        expected.extend(rows.clone());
        prop_assert_eq!(parsed, expected);
    }

    // The BOM variant decodes to the same table.
    #[test]
    fn property_bom_is_transparent(
        (headers, rows) in table_strategy()
    ) {
        let plain = parse_csv(&encode_csv(&headers, &rows));
        let with_bom = parse_csv(&encode_csv_with_bom(&headers, &rows));
        prop_assert_eq!(plain, with_bom);
    }

    // Formula-looking cells come back with a single leading quote.
    #[test]
    fn property_formula_guard_is_permanent(
        id in "[a-z0-9]{1,6}",
        cell in formula_cell_strategy(),
    ) {
        let text = encode_csv(&["id", "value"], [[id.clone(), cell.clone()]]);
        let parsed = parse_csv(&text);
        prop_assert_eq!(&parsed[1][0], &id);
        prop_assert_eq!(parsed[1][1].clone(), format!("'{}", cell));

        // Encoding the guarded value again does not stack another prefix.
        let again = parse_csv(&encode_csv(&["id", "value"], [parsed[1].clone()]));
        prop_assert_eq!(&again[1][1], &parsed[1][1]);
    }

    // Blank lines between rows never show up as rows.
    #[test]
    fn property_blank_lines_are_dropped(
        (headers, rows) in table_strategy(),
        blank in prop_oneof![Just("\n"), Just("\r\n"), Just("\n \n"), Just("\n,,\n")],
    ) {
        let text = encode_csv(&headers, &rows);
        let padded = text.replace("\n", &format!("{}\n", blank));
        // Only line breaks between records are padded when no cell holds one.
        prop_assume!(rows.iter().flatten().all(|cell| !cell.contains('\n')));

        prop_assert_eq!(parse_csv(&padded), parse_csv(&text));
        prop_assert!(parse_csv(&padded).iter().all(|row| row.iter().any(|c| !c.trim().is_empty())));
    }

    // Encoded output is readable by a standard RFC 4180 reader.
    #[test]
    fn property_output_reads_with_csv_crate(
        (headers, rows) in table_strategy()
    ) {
        let text = encode_csv(&headers, &rows);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(text.as_bytes());

        let records: Vec<Vec<String>> = reader
            .records()
            .map(|record| record.expect("valid csv record").iter().map(String::from).collect())
            .collect();

        prop_assert_eq!(records, parse_csv(&text));
    }

    // Decoding never panics, whatever the input.
    #[test]
    fn property_parse_is_total(text in "[\\PC\r\n\",]{0,200}") {
        let rows = parse_csv(&text);
        prop_assert!(rows.iter().all(|row| !row.is_empty()));
    }
}

#[test]
fn test_spreadsheet_example_roundtrip() {
    let text = encode_csv(
        &["name", "note"],
        [["Güzel Invest", "line1\nline2, \"quoted\""]],
    );
    assert_eq!(
        parse_csv(&text),
        vec![
            vec!["name".to_string(), "note".to_string()],
            vec![
                "Güzel Invest".to_string(),
                "line1\nline2, \"quoted\"".to_string()
            ],
        ]
    );
}

#[test]
fn test_blank_lines_between_rows() {
    let rows = parse_csv("id,title\n\n1,Villa\n\n\n2,Flat\n");
    assert_eq!(rows.len(), 3);
}
