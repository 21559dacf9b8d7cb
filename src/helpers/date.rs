//! Date helper functions

use chrono::NaiveDateTime;
use std::fmt::{self, Write};

use crate::content::Timeline;

/// Format a date using a Moment.js-style format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "MMMM D, YYYY") // -> "September 5, 2023"
/// ```
pub fn format_date(date: &NaiveDateTime, format: &str) -> String {
    render(date, &moment_to_chrono_format(format)).unwrap_or_else(|_| {
        tracing::warn!("Cannot format a date with {:?}, using ISO 8601", format);
        date_xml(date)
    })
}

/// Check that `format` can render a date; formats that need a timezone
/// fail, since dates here never carry one
pub fn check_date_format(format: &str) -> Result<(), fmt::Error> {
    render(&NaiveDateTime::default(), &moment_to_chrono_format(format)).map(|_| ())
}

/// chrono reports unrenderable specifiers through `Display`, so write
/// instead of calling `to_string`
fn render(date: &NaiveDateTime, chrono_format: &str) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write!(out, "{}", date.format(chrono_format))?;
    Ok(out)
}

/// ISO 8601 form without offset, e.g. `2023-09-05T00:00:00`
pub fn date_xml(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Human-readable timeline: a single date, a `start - end` span with an
/// open end shown as `Present`, or nothing for undated records
pub fn format_timeline(timeline: &Timeline, format: &str) -> Option<String> {
    match timeline {
        Timeline::Date { date } => Some(format_date(date, format)),
        Timeline::Span { start, end } => {
            let start_text = format_date(start, format);
            match end {
                Some(end) if end == start => Some(start_text),
                Some(end) => Some(format!("{} - {}", start_text, format_date(end, format))),
                None => Some(format!("{} - Present", start_text)),
            }
        }
        Timeline::Undated => None,
    }
}

/// Moment tokens, longest first so `MMMM` wins over `MM`
const TOKENS: [(&str, &str); 20] = [
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("DDDD", "%j"),
    ("DD", "%d"),
    ("D", "%-d"),
    ("dddd", "%A"),
    ("ddd", "%a"),
    ("HH", "%H"),
    ("H", "%-H"),
    ("hh", "%I"),
    ("h", "%-I"),
    ("mm", "%M"),
    ("ss", "%S"),
    ("SSS", "%3f"),
    ("A", "%p"),
    ("a", "%P"),
];

/// Convert a Moment.js format to a chrono one in a single left-to-right pass.
/// Text in `[brackets]` is kept literally.
fn moment_to_chrono_format(format: &str) -> String {
    let mut result = String::with_capacity(format.len() * 2);
    let mut rest = format;

    'outer: while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(end) = rest.find(']') {
                result.push_str(&rest[1..end].replace('%', "%%"));
                rest = &rest[end + 1..];
                continue;
            }
        }

        for (token, replacement) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                result.push_str(replacement);
                rest = tail;
                continue 'outer;
            }
        }

        if c == '%' {
            result.push_str("%%");
        } else {
            result.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }

    result
}
