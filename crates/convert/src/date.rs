use chrono::NaiveDate;

use crate::error::ConvertError;

/// Recognized input formats, tried in this exact order. First structural
/// match wins, so a value like `03/04/2025` parses day-first (`%d/%m/%Y`
/// comes before `%m/%d/%Y`). That ambiguity is load-bearing: existing
/// mappings depend on the order, so it must not be reordered.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y%m%d",
];

/// Parse a raw date cell into a calendar date.
///
/// Month/day bounds and leap years are validated by chrono, not here.
pub fn parse(raw: &str) -> Result<NaiveDate, ConvertError> {
    let s = raw.trim();
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }
    Err(ConvertError::UnparseableDate(raw.to_string()))
}
