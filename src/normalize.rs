//! Input normalizer: raw tabular rows to typed entries
//!
//! Rows arrive already decoded from the spreadsheet codec, mapped
//! positionally to date, amount and description. Dates accept the
//! `DD/MM/YYYY` format the source extracts use as well as ISO
//! `YYYY-MM-DD`. Amounts accept the locale format with `.` as thousands
//! separator and `,` as decimal separator, explicit negative signs and
//! parenthesized negatives, and are normalized to signed integer minor
//! units. A row that fails to parse is reported and skipped; the batch
//! never aborts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Entry, EntrySide, RowError};

/// A raw row as handed over by the spreadsheet codec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// Row number in the uploaded file (1-based, header excluded)
    pub row: usize,
    pub date: String,
    pub amount: String,
    pub description: String,
}

impl RawRow {
    pub fn new(row: usize, date: &str, amount: &str, description: &str) -> Self {
        Self {
            row,
            date: date.to_string(),
            amount: amount.to_string(),
            description: description.to_string(),
        }
    }
}

/// Result of normalizing one side's rows
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// Entries in original row order
    pub entries: Vec<Entry>,
    /// Row-level failures, in row order
    pub errors: Vec<RowError>,
}

impl NormalizedBatch {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalize a batch of raw rows into entries for one side
///
/// Input order is preserved. Each rejected row produces one [`RowError`]
/// naming the field that failed.
pub fn normalize_rows(side: EntrySide, rows: &[RawRow]) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();

    for raw in rows {
        let date = match parse_date(&raw.date) {
            Some(d) => d,
            None => {
                batch.errors.push(RowError {
                    row: raw.row,
                    field: "date".to_string(),
                    message: format!("unparseable date '{}'", raw.date.trim()),
                });
                continue;
            }
        };

        let amount_minor = match parse_amount_minor(&raw.amount) {
            Some(a) => a,
            None => {
                batch.errors.push(RowError {
                    row: raw.row,
                    field: "amount".to_string(),
                    message: format!("unparseable amount '{}'", raw.amount.trim()),
                });
                continue;
            }
        };

        batch.entries.push(Entry::new(
            side,
            raw.row,
            date,
            amount_minor,
            raw.description.trim().to_string(),
        ));
    }

    batch
}

/// Parse a date in `DD/MM/YYYY` or ISO `YYYY-MM-DD` format
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .ok()
}

/// Parse a locale-formatted amount string into signed minor units
///
/// Accepted forms: `1.234,56` / `-1.234,56` / `(1.234,56)` / `1234` /
/// `1234,5` (one decimal digit) and the unambiguous ISO form `1234.56`.
/// The currency is assumed to carry two decimal places.
pub fn parse_amount_minor(input: &str) -> Option<i64> {
    let mut s = input.trim();
    if s.is_empty() {
        return None;
    }

    // Parenthesized negatives, common in bank extracts
    let mut negative = false;
    if s.starts_with('(') && s.ends_with(')') {
        negative = true;
        s = s[1..s.len() - 1].trim();
    }
    if let Some(rest) = s.strip_prefix('-') {
        negative = !negative;
        s = rest.trim();
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest.trim();
    }

    let (integer_part, decimal_part) = split_amount(s)?;

    if integer_part.is_empty() && decimal_part.is_empty() {
        return None;
    }
    if !integer_part.chars().all(|c| c.is_ascii_digit())
        || !decimal_part.chars().all(|c| c.is_ascii_digit())
        || decimal_part.len() > 2
    {
        return None;
    }

    let units: i64 = if integer_part.is_empty() {
        0
    } else {
        integer_part.parse().ok()?
    };
    let cents: i64 = match decimal_part.len() {
        0 => 0,
        1 => decimal_part.parse::<i64>().ok()? * 10,
        _ => decimal_part.parse().ok()?,
    };

    let minor = units.checked_mul(100)?.checked_add(cents)?;
    Some(if negative { -minor } else { minor })
}

/// Split an unsigned amount string into integer and decimal digit parts,
/// resolving the separator convention
fn split_amount(s: &str) -> Option<(String, String)> {
    let has_comma = s.contains(',');
    let has_dot = s.contains('.');

    if has_comma {
        // Comma is the decimal separator, dots are thousands separators
        let mut parts = s.splitn(2, ',');
        let integer = parts.next()?.replace('.', "");
        let decimal = parts.next().unwrap_or("").to_string();
        if decimal.contains(',') || decimal.contains('.') {
            return None;
        }
        Some((integer, decimal))
    } else if has_dot {
        // No comma: a single trailing dot group of at most two digits is an
        // ISO decimal point, anything else is thousands grouping
        let idx = s.rfind('.').unwrap_or(0);
        let tail = &s[idx + 1..];
        if s.matches('.').count() == 1 && tail.len() <= 2 {
            Some((s[..idx].to_string(), tail.to_string()))
        } else {
            // e.g. "1.234.567" — grouped integer
            let groups: Vec<&str> = s.split('.').collect();
            if groups[1..].iter().all(|g| g.len() == 3) {
                Some((s.replace('.', ""), String::new()))
            } else {
                None
            }
        }
    } else {
        Some((s.to_string(), String::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_locale_amounts() {
        assert_eq!(parse_amount_minor("1.234,56"), Some(123_456));
        assert_eq!(parse_amount_minor("-1.234,56"), Some(-123_456));
        assert_eq!(parse_amount_minor("0,50"), Some(50));
        assert_eq!(parse_amount_minor("150,5"), Some(15_050));
        assert_eq!(parse_amount_minor("1234"), Some(123_400));
        assert_eq!(parse_amount_minor("(200,00)"), Some(-20_000));
        assert_eq!(parse_amount_minor("+12,00"), Some(1_200));
    }

    #[test]
    fn parses_iso_and_grouped_amounts() {
        assert_eq!(parse_amount_minor("1234.56"), Some(123_456));
        assert_eq!(parse_amount_minor("1.234.567"), Some(123_456_700));
    }

    #[test]
    fn rejects_garbage_amounts() {
        assert_eq!(parse_amount_minor(""), None);
        assert_eq!(parse_amount_minor("abc"), None);
        assert_eq!(parse_amount_minor("12,345"), None); // 3 decimal digits
        assert_eq!(parse_amount_minor("1,2,3"), None);
        assert_eq!(parse_amount_minor("--5"), None);
    }

    #[test]
    fn parses_both_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_date("15/03/2024"), Some(expected));
        assert_eq!(parse_date("2024-03-15"), Some(expected));
        assert_eq!(parse_date("15-03-2024"), None);
        assert_eq!(parse_date("32/01/2024"), None);
    }

    #[test]
    fn bad_rows_are_collected_not_fatal() {
        let rows = vec![
            RawRow::new(1, "01/03/2024", "1.500,00", "deposit"),
            RawRow::new(2, "not-a-date", "100,00", "bad date"),
            RawRow::new(3, "02/03/2024", "???", "bad amount"),
            RawRow::new(4, "03/03/2024", "-250,75", "withdrawal"),
        ];
        let batch = normalize_rows(EntrySide::Ledger, &rows);

        assert_eq!(batch.entries.len(), 2);
        assert_eq!(batch.errors.len(), 2);
        assert_eq!(batch.entries[0].id, "L-1");
        assert_eq!(batch.entries[0].amount_minor, 150_000);
        assert_eq!(batch.entries[1].amount_minor, -25_075);
        assert_eq!(batch.errors[0].row, 2);
        assert_eq!(batch.errors[0].field, "date");
        assert_eq!(batch.errors[1].row, 3);
        assert_eq!(batch.errors[1].field, "amount");
    }

    #[test]
    fn order_and_source_rows_preserved() {
        let rows = vec![
            RawRow::new(10, "05/01/2024", "1,00", "a"),
            RawRow::new(11, "01/01/2024", "2,00", "b"),
        ];
        let batch = normalize_rows(EntrySide::Statement, &rows);
        assert_eq!(batch.entries[0].source_row, 10);
        assert_eq!(batch.entries[1].source_row, 11);
        assert_eq!(batch.entries[0].id, "S-10");
    }
}
