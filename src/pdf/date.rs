//! PDF date string rendering
//!
//! PDF dates look like `D:20240131154500+01'00'`; every component after the
//! year is optional. They are rendered as `2024-01-31 15:45:00+01:00`, or
//! without the offset when the string carries none.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime};

/// Render a PDF date string canonically, keeping it verbatim if it doesn't parse
pub fn normalize_pdf_date(raw: &str) -> String {
    match parse_pdf_date(raw) {
        Some((datetime, Some(offset))) => {
            format!("{}{}", datetime.format("%Y-%m-%d %H:%M:%S"), offset)
        }
        Some((datetime, None)) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => raw.to_string(),
    }
}

fn parse_pdf_date(raw: &str) -> Option<(NaiveDateTime, Option<FixedOffset>)> {
    let s = raw.trim();
    let s = s.strip_prefix("D:").unwrap_or(s);

    let digits_len = s.bytes().take_while(u8::is_ascii_digit).count();
    if !(4..=14).contains(&digits_len) {
        return None;
    }
    let (digits, rest) = s.split_at(digits_len);

    // Missing trailing components take their defaults; a truncated one is invalid
    let component = |start: usize, default: u32| -> Option<u32> {
        if digits.len() <= start {
            return Some(default);
        }
        digits.get(start..start + 2)?.parse().ok()
    };

    let year: i32 = digits[0..4].parse().ok()?;
    let datetime = NaiveDate::from_ymd_opt(year, component(4, 1)?, component(6, 1)?)?
        .and_hms_opt(component(8, 0)?, component(10, 0)?, component(12, 0)?)?;

    Some((datetime, parse_offset(rest)?))
}

/// Outer `None` means malformed; inner `None` means no offset present
fn parse_offset(rest: &str) -> Option<Option<FixedOffset>> {
    let mut chars = rest.chars();
    let sign = match chars.next() {
        None => return Some(None),
        Some('Z') => return Some(Some(FixedOffset::east_opt(0)?)),
        Some('+') => 1,
        Some('-') => -1,
        Some(_) => return None,
    };

    let tz = chars.as_str();
    if !tz.chars().all(|c| c.is_ascii_digit() || c == '\'') {
        return None;
    }
    let tz: String = tz.chars().filter(char::is_ascii_digit).collect();
    let hours: i32 = tz.get(0..2)?.parse().ok()?;
    let minutes: i32 = match tz.get(2..4) {
        Some(m) => m.parse().ok()?,
        None => 0,
    };

    Some(Some(FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))?))
}
