use super::encoding::UTF8_BOM;

/// Parses CSV text into rows of string cells.
///
/// The scanner walks the text one character at a time with a single
/// `in_quotes` flag:
///
/// - inside quotes, `""` yields a literal quote, a lone `"` closes the quoted
///   section and every other character (commas and newlines included) is kept;
/// - outside quotes, `"` opens a quoted section, `,` ends the cell, `\n` ends
///   the cell and the row, and `\r` is dropped so CRLF and LF both work.
///
/// A leading byte order mark is skipped. Rows whose cells are all blank after
/// trimming are dropped, which keeps blank lines from spreadsheet exports out
/// of the result.
///
/// Malformed quoting never fails; it only moves cell boundaries.
///
/// # Examples
///
/// ```
/// use estate_csv::csv_codec::parse_csv;
///
/// let rows = parse_csv("\u{FEFF}name,note\r\n\r\nVilla,\"sea, view\"\r\n");
/// assert_eq!(rows, vec![vec!["name", "note"], vec!["Villa", "sea, view"]]);
/// ```
#[must_use]
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    cell.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => cell.push(ch),
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut cell)),
            '\n' => {
                row.push(std::mem::take(&mut cell));
                rows.push(std::mem::take(&mut row));
            }
            '\r' => {}
            _ => cell.push(ch),
        }
    }

    row.push(cell);
    rows.push(row);

    rows.retain(|row| !is_blank_row(row));
    rows
}

/// Returns true when every cell of the row trims to an empty string.
#[inline]
pub(crate) fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}
