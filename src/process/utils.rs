use crate::process::date_parser;
use arrow::datatypes::{DataType, TimeUnit};

/// Trim whitespace and a stray UTF-8 byte-order mark.
pub fn clean_str(raw: &str) -> &str {
    raw.trim_start_matches('\u{feff}').trim()
}

/// Cells read as missing, matching the usual dataframe-reader defaults.
pub const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// True when `s` is exactly one of [`NULL_TOKENS`].
pub fn is_null_token(s: &str) -> bool {
    NULL_TOKENS.contains(&s)
}

/// Case-insensitive `true` / `false`.
pub fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Narrowest Arrow dtype that can hold a single cleaned, non-empty value.
pub fn infer_arrow_dtype_from_str(s: &str, infer_dates: bool) -> DataType {
    if s.parse::<i64>().is_ok() {
        DataType::Int64
    } else if s.parse::<f64>().is_ok() {
        DataType::Float64
    } else if parse_bool(s).is_some() {
        DataType::Boolean
    } else if infer_dates && date_parser::parse_timestamp(s).is_some() {
        DataType::Timestamp(TimeUnit::Microsecond, None)
    } else {
        DataType::Utf8
    }
}

/// Smallest dtype covering both `a` and `b`. Integers widen to floats;
/// every other disagreement falls back to text.
pub fn widen(a: &DataType, b: &DataType) -> DataType {
    match (a, b) {
        _ if a == b => a.clone(),
        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }
        _ => DataType::Utf8,
    }
}
