//! Clock injection and date formatting
//!
//! Date patterns use the date-fns token style the web front end already
//! speaks (`yyyy-MM-dd`), translated to chrono format items.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Source of the current instant
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant, for tests and reproducible runs
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Format a date-time with a date-fns style pattern
///
/// Supported tokens: `yyyy`, `yy`, `MM`, `dd`, `HH`, `mm`, `ss`. Any other
/// character is copied verbatim.
pub fn format_date(date: &NaiveDateTime, pattern: &str) -> String {
    date.format(&to_chrono_pattern(pattern)).to_string()
}

/// Format an instant with a date-fns style pattern, in UTC
pub fn format_instant(instant: &DateTime<Utc>, pattern: &str) -> String {
    format_date(&instant.naive_utc(), pattern)
}

const TOKENS: &[(&str, &str)] = &[
    ("yyyy", "%Y"),
    ("yy", "%y"),
    ("MM", "%m"),
    ("dd", "%d"),
    ("HH", "%H"),
    ("mm", "%M"),
    ("ss", "%S"),
];

fn to_chrono_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;

    'outer: while !rest.is_empty() {
        for (token, item) in TOKENS {
            if let Some(stripped) = rest.strip_prefix(token) {
                out.push_str(item);
                rest = stripped;
                continue 'outer;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            if c == '%' {
                out.push_str("%%");
            } else {
                out.push(c);
            }
        }
        rest = chars.as_str();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(14, 7, 9)
            .unwrap()
    }

    #[test]
    fn test_format_iso_date() {
        assert_eq!(format_date(&sample(), "yyyy-MM-dd"), "2024-05-01");
    }

    #[test]
    fn test_format_time_tokens() {
        assert_eq!(format_date(&sample(), "HH:mm:ss"), "14:07:09");
        assert_eq!(format_date(&sample(), "dd.MM.yy"), "01.05.24");
    }

    #[test]
    fn test_percent_is_literal() {
        assert_eq!(format_date(&sample(), "100% yyyy"), "100% 2024");
    }

    #[test]
    fn test_fixed_clock_today() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 0).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(format_instant(&clock.now(), "yyyy-MM-dd"), "2024-02-29");
    }
}
