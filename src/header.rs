//! Post header parsing.
//!
//! Headers look like `12：名無しさん 25/03/23(日) 08:24:57 ID:od5CtiXq0`.
//! Parsing is tolerant: a header without an `ID` marker yields an empty
//! [`ParsedHeader`], never an error.

use chrono::{NaiveDate, NaiveDateTime};

use crate::patterns::{DISPLAY_NAME, NUMBERED_HEADER, POSTED_AT, RESPONDER_ID};
use crate::result::ParsedHeader;

/// Parse the structured fields of a header line.
#[must_use]
pub fn parse_header(text: &str) -> ParsedHeader {
    let Some(responder_id) = responder_id(text) else {
        return ParsedHeader::default();
    };

    ParsedHeader {
        sequence_number: sequence_number(text),
        responder_id: Some(responder_id),
        display_name: DISPLAY_NAME
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty()),
        posted_at: posted_at(text),
    }
}

/// Leading post number (`12:` or `12：`).
#[must_use]
pub fn sequence_number(text: &str) -> Option<u32> {
    NUMBERED_HEADER
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Whether the text starts like a numbered post header.
#[must_use]
pub fn is_numbered_header(text: &str) -> bool {
    NUMBERED_HEADER.is_match(text)
}

/// Token after the `ID` marker.
#[must_use]
pub fn responder_id(text: &str) -> Option<String> {
    RESPONDER_ID
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn posted_at(text: &str) -> Option<NaiveDateTime> {
    let caps = POSTED_AT.captures(text)?;
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let year = field(1)?;
    let year = if year < 100 { year + 2000 } else { year };
    let date = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, field(2)?, field(3)?)?;
    date.and_hms_opt(field(4)?, field(5)?, field(6).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_header() {
        let parsed = parse_header("12：名無しさん 25/03/23(日) 08:24:57 ID:od5CtiXq0");
        assert_eq!(parsed.sequence_number, Some(12));
        assert_eq!(parsed.responder_id.as_deref(), Some("od5CtiXq0"));
        assert_eq!(parsed.display_name.as_deref(), Some("名無しさん"));
        let expected = NaiveDate::from_ymd_opt(2025, 3, 23).and_then(|d| d.and_hms_opt(8, 24, 57));
        assert_eq!(parsed.posted_at, expected);
    }

    #[test]
    fn missing_id_marker_yields_nothing() {
        let parsed = parse_header("1: 名無し 2024/01/02 10:00");
        assert!(parsed.is_empty());
    }

    #[test]
    fn id_with_space_separator_and_lowercase_marker() {
        let parsed = parse_header("3 : anon id AbC123");
        assert_eq!(parsed.sequence_number, Some(3));
        assert_eq!(parsed.responder_id.as_deref(), Some("AbC123"));
        assert_eq!(parsed.display_name, None);
        assert_eq!(parsed.posted_at, None);
    }

    #[test]
    fn four_digit_year_without_seconds() {
        let parsed = parse_header("7:風吹けば名無し 2024/12/31 23:59 ID:Zz9");
        assert_eq!(
            parsed.posted_at,
            NaiveDate::from_ymd_opt(2024, 12, 31).and_then(|d| d.and_hms_opt(23, 59, 0))
        );
        assert_eq!(parsed.display_name.as_deref(), Some("風吹けば名無し"));
    }

    #[test]
    fn impossible_date_is_dropped() {
        let parsed = parse_header("1: x 24/13/40 10:00 ID:abc");
        assert_eq!(parsed.responder_id.as_deref(), Some("abc"));
        assert_eq!(parsed.posted_at, None);
    }
}
