use super::encoding::{encode_cell, CsvValue, UTF8_BOM};

/// Encodes a header row and data rows as CSV text.
///
/// Every cell goes through [`encode_cell`]: formula-looking values get a `'`
/// prefix, internal quotes are doubled, and cells containing commas, quotes or
/// line breaks are quoted. Rows are joined with `\n` and the output carries no
/// trailing newline.
///
/// # Examples
///
/// ```
/// use estate_csv::csv_codec::{encode_csv, CsvValue};
///
/// let row = vec![CsvValue::from("Sea View"), CsvValue::from(250_000)];
/// let text = encode_csv(&["name", "price"], [row]);
/// assert_eq!(text, "name,price\nSea View,250000");
/// ```
pub fn encode_csv<H, R, C>(headers: &[H], rows: impl IntoIterator<Item = R>) -> String
where
    H: AsRef<str>,
    R: IntoIterator<Item = C>,
    C: Into<CsvValue>,
{
    let mut lines: Vec<String> = Vec::new();
    lines.push(
        headers
            .iter()
            .map(|header| encode_cell(header.as_ref()))
            .collect::<Vec<_>>()
            .join(","),
    );

    for row in rows {
        let line = row
            .into_iter()
            .map(|cell| encode_cell(&cell.into().to_string()))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }

    lines.join("\n")
}

/// Same as [`encode_csv`] with a leading UTF-8 byte order mark.
///
/// Spreadsheet applications need the BOM to open non-ASCII exports with the
/// right encoding.
pub fn encode_csv_with_bom<H, R, C>(headers: &[H], rows: impl IntoIterator<Item = R>) -> String
where
    H: AsRef<str>,
    R: IntoIterator<Item = C>,
    C: Into<CsvValue>,
{
    let body = encode_csv(headers, rows);
    let mut text = String::with_capacity(body.len() + UTF8_BOM.len_utf8());
    text.push(UTF8_BOM);
    text.push_str(&body);
    text
}
