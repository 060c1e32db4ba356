use std::borrow::Cow;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

/// Characters of extracted text shown right after an upload.
pub const RESULT_PREVIEW_CHARS: usize = 200;

/// Characters of text and reply shown on each list row.
pub const LIST_PREVIEW_CHARS: usize = 100;

/// The first `max` characters of `text` (not bytes).
pub fn excerpt(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// `text` cut to `max` characters with `...` appended when something was cut.
pub fn truncate(text: &str, max: usize) -> Cow<'_, str> {
    let cut = excerpt(text, max);
    if cut.len() == text.len() {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(format!("{cut}..."))
    }
}

/// `text` on one line: every run of whitespace, newlines included, becomes
/// a single space.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Format a server timestamp for display in the local time zone.
pub fn format_timestamp(raw: &str) -> String {
    format_timestamp_in(raw, &Local)
}

/// Format as `dd/mm/yyyy, HH:MM:SS` in `tz`.
///
/// Accepts RFC 3339 and the SQLite `YYYY-MM-DD HH:MM:SS[.fff]` form, which
/// is UTC. Anything else is returned unchanged.
pub fn format_timestamp_in<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match parse_timestamp(raw) {
        Some(utc) => utc
            .with_timezone(tz)
            .format("%d/%m/%Y, %H:%M:%S")
            .to_string(),
        None => raw.to_string(),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::*;

    #[test]
    fn excerpt_counts_chars() {
        assert_eq!(excerpt("ação rápida", 4), "ação");
        assert_eq!(excerpt("curto", 200), "curto");
        assert_eq!(excerpt("", 10), "");
    }

    #[test]
    fn preview_is_first_200_chars() {
        let text: String = "é".repeat(250);
        let preview = excerpt(&text, RESULT_PREVIEW_CHARS);
        assert_eq!(preview.chars().count(), 200);
        assert!(text.starts_with(preview));
    }

    #[test]
    fn truncate_only_when_longer() {
        assert_eq!(truncate("abc", 3), "abc");
        assert!(matches!(truncate("abc", 3), Cow::Borrowed(_)));
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    #[test]
    fn single_line_collapses_whitespace() {
        assert_eq!(single_line("Bom dia,\nSegue anexo"), "Bom dia, Segue anexo");
        assert_eq!(single_line("  Prezado,\r\n\r\n\tObrigado  "), "Prezado, Obrigado");
        assert_eq!(single_line(""), "");
    }

    #[test]
    fn formats_sqlite_timestamp_as_utc() {
        assert_eq!(
            format_timestamp_in("2025-09-14 18:05:09", &Utc),
            "14/09/2025, 18:05:09"
        );
    }

    #[test]
    fn formats_into_offset() {
        let brt = FixedOffset::west_opt(3 * 3600).unwrap();
        assert_eq!(
            format_timestamp_in("2025-09-14T01:00:00Z", &brt),
            "13/09/2025, 22:00:00"
        );
    }

    #[test]
    fn accepts_fractional_seconds() {
        assert_eq!(
            format_timestamp_in("2025-01-02T03:04:05.678", &Utc),
            "02/01/2025, 03:04:05"
        );
    }

    #[test]
    fn unparseable_is_passed_through() {
        assert_eq!(format_timestamp_in("ontem", &Utc), "ontem");
    }
}
