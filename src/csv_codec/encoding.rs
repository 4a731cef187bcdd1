use std::fmt;

/// UTF-8 byte order mark prepended to exports so spreadsheet applications
/// detect the encoding.
pub const UTF8_BOM: char = '\u{FEFF}';

/// Leading characters that spreadsheet applications treat as the start of a
/// formula.
pub const FORMULA_TRIGGERS: [char; 4] = ['=', '+', '-', '@'];

/// Prefix written in front of a cell that would otherwise be evaluated as a
/// formula.
pub const FORMULA_GUARD_PREFIX: char = '\'';

/// A single scalar cell handed to the encoder.
///
/// Export rows mix text, numbers, flags and absent values; every variant is
/// stringified the same way regardless of its column.
#[derive(Debug, Clone, PartialEq)]
pub enum CsvValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CsvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvValue::Text(text) => f.write_str(text),
            CsvValue::Integer(value) => write!(f, "{}", value),
            CsvValue::Float(value) => f.write_str(&format_float(*value)),
            CsvValue::Bool(value) => write!(f, "{}", value),
            CsvValue::Null => Ok(()),
        }
    }
}

/// Formats a float in ECMAScript number-to-string form: integral values without a
/// fraction, infinities spelled out, and exponent notation (`1e+21`,
/// `1.5e-7`) for magnitudes of at least `1e21` or below `1e-6`.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if value == 0.0 {
        // -0 prints as 0
        "0".to_string()
    } else if value.abs() >= 1e21 || value.abs() < 1e-6 {
        format_exponent(value)
    } else {
        value.to_string()
    }
}

/// Shortest exponent form with an explicit `+` on positive exponents.
fn format_exponent(value: f64) -> String {
    let formatted = format!("{:e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

impl From<&str> for CsvValue {
    fn from(value: &str) -> Self {
        CsvValue::Text(value.to_string())
    }
}

impl From<String> for CsvValue {
    fn from(value: String) -> Self {
        CsvValue::Text(value)
    }
}

impl From<&String> for CsvValue {
    fn from(value: &String) -> Self {
        CsvValue::Text(value.clone())
    }
}

impl From<bool> for CsvValue {
    fn from(value: bool) -> Self {
        CsvValue::Bool(value)
    }
}

impl From<f64> for CsvValue {
    fn from(value: f64) -> Self {
        CsvValue::Float(value)
    }
}

impl From<f32> for CsvValue {
    fn from(value: f32) -> Self {
        CsvValue::Float(f64::from(value))
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for CsvValue {
                fn from(value: $ty) -> Self {
                    CsvValue::Integer(i64::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<usize> for CsvValue {
    fn from(value: usize) -> Self {
        match i64::try_from(value) {
            Ok(value) => CsvValue::Integer(value),
            Err(_) => CsvValue::Text(value.to_string()),
        }
    }
}

impl<T: Into<CsvValue>> From<Option<T>> for CsvValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => CsvValue::Null,
        }
    }
}

/// Returns true when a stringified cell would be executed as a formula by a
/// spreadsheet application.
#[must_use]
pub fn needs_formula_guard(value: &str) -> bool {
    value.starts_with(FORMULA_TRIGGERS)
}

/// Returns true when a cell must be wrapped in double quotes.
#[inline]
pub(crate) fn needs_quoting(value: &str) -> bool {
    value.contains([',', '"', '\n', '\r'])
}

/// Encodes one cell for output.
///
/// The formula guard is applied first, then internal quotes are doubled and
/// the cell is quoted when it contains a comma, a quote or a line break.
///
/// # Examples
///
/// ```
/// use estate_csv::csv_codec::encode_cell;
///
/// assert_eq!(encode_cell("plain"), "plain");
/// assert_eq!(encode_cell("a,b"), "\"a,b\"");
/// assert_eq!(encode_cell("say \"hi\""), "\"say \"\"hi\"\"\"");
/// assert_eq!(encode_cell("=SUM(A1:A2)"), "'=SUM(A1:A2)");
/// ```
#[must_use]
pub fn encode_cell(value: &str) -> String {
    let mut guarded = String::with_capacity(value.len() + 1);
    if needs_formula_guard(value) {
        guarded.push(FORMULA_GUARD_PREFIX);
    }
    guarded.push_str(value);

    let escaped = guarded.replace('"', "\"\"");
    if needs_quoting(&escaped) {
        format!("\"{}\"", escaped)
    } else {
        escaped
    }
}
