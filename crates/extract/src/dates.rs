use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("unparseable date: {0}")]
pub struct DateParseError(pub String);

/// Formats shared by the SA banks, 4-digit-year shapes first so that an
/// unambiguous year is never routed through the 2-digit correction.
pub const COMMON_DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %b %Y",
    "%b %d, %Y",
    "%d/%m/%y",
    "%d-%m-%y",
    "%y/%m/%d",
    "%y-%m-%d",
    "%d %b %y",
];

fn has_two_digit_year_shape(token: &str) -> bool {
    static R: OnceLock<Vec<Regex>> = OnceLock::new();
    R.get_or_init(|| {
        vec![
            Regex::new(r"^\d{1,2}[/-]\d{1,2}[/-]\d{2}$").expect("invalid regex"),
            Regex::new(r"^\d{2}[/-]\d{1,2}[/-]\d{1,2}$").expect("invalid regex"),
            Regex::new(r"(?i)^\d{1,2} [a-z]{3} \d{2}$").expect("invalid regex"),
        ]
    })
    .iter()
    .any(|re| re.is_match(token))
}

/// Parse a date token against bank-specific formats first, then the shared
/// fallback list. Callers catch the error per row and skip; a bad date never
/// aborts a whole statement.
pub fn parse_date(token: &str, bank_formats: &[&str]) -> Result<NaiveDate, DateParseError> {
    parse_date_at(token, bank_formats, Utc::now().year())
}

/// Deterministic core: `current_year` is injected so the 2-digit-year cutoff
/// can be pinned in tests.
pub fn parse_date_at(
    token: &str,
    bank_formats: &[&str],
    current_year: i32,
) -> Result<NaiveDate, DateParseError> {
    let token = token.trim();

    for format in bank_formats.iter().chain(COMMON_DATE_FORMATS) {
        if let Ok(parsed) = NaiveDate::parse_from_str(token, format) {
            return adjust_two_digit_year(parsed, token, current_year);
        }
    }

    Err(DateParseError(token.to_string()))
}

/// Statements are recent documents: a parsed year before 2010 coming from a
/// 2-digit token is a century mix-up. Recompute as 20xx, falling back to 19xx
/// when that would land beyond next year.
fn adjust_two_digit_year(
    date: NaiveDate,
    token: &str,
    current_year: i32,
) -> Result<NaiveDate, DateParseError> {
    if date.year() >= 2010 || !has_two_digit_year_shape(token) {
        return Ok(date);
    }

    let two_digit = date.year().rem_euclid(100);
    let mut year = 2000 + two_digit;
    if year > current_year + 1 {
        year = 1900 + two_digit;
    }

    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .ok_or_else(|| DateParseError(token.to_string()))
}
