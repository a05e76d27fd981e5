//! String format recognition
//!
//! The converter and the inference pass both need to decide whether a string
//! is a date, a time, a date-time, or a URI. That capability is a trait so
//! the recognizer can be swapped; the shipped implementation is regex-based
//! with a configurable date order.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static DAY_FIRST_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(0?[1-9]|[12][0-9]|3[01])[/.](0?[1-9]|1[0-2])[/.]\d{4}$").unwrap()
});

static MONTH_FIRST_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(0?[1-9]|1[0-2])[/.](0?[1-9]|[12][0-9]|3[01])[/.]\d{4}$").unwrap()
});

static TIME_24H: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-1]?[0-9]|2[0-3]):([0-5][0-9])(:[0-5][0-9])?$").unwrap());

static TIME_12H: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(0?[0-9]|1[01]):([0-5][0-9]) (AM|PM|a\.m\.|p\.m\.)$").unwrap()
});

static ISO_DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})?$").unwrap()
});

/// Capability set consumed by the converter and the inference pass
pub trait StringFormatRecognizer {
    /// Does the string denote a calendar date?
    fn is_date(&self, s: &str) -> bool;

    /// Does the string denote a time of day?
    fn is_time(&self, s: &str) -> bool;

    /// Does the string denote a combined date and time?
    fn is_date_time(&self, s: &str) -> bool;

    /// Does the string denote an http/https/ftp URI?
    fn is_uri(&self, s: &str) -> bool;
}

/// Which side of a numeric date comes first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateOrder {
    /// `31.12.2023` / `31/12/2023` (the reference behavior)
    #[default]
    DayFirst,
    /// `12.31.2023` / `12/31/2023`
    MonthFirst,
}

/// Regex-backed recognizer
///
/// Accepted formats:
/// - dates: ISO `yyyy-mm-dd`, plus numeric `d.m.yyyy` or `d/m/yyyy` in the
///   configured [`DateOrder`]
/// - times: 24-hour `hh:mm` with optional `:ss`, and 12-hour `h:mm` followed
///   by `AM`/`PM`/`a.m.`/`p.m.`
/// - date-times: ISO 8601 `yyyy-mm-ddThh:mm:ss` with optional fraction and
///   offset, or an accepted date, a single space, and an accepted time
/// - URIs: absolute `http`, `https` or `ftp` URLs with a dotted authority
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexRecognizer {
    date_order: DateOrder,
}

impl RegexRecognizer {
    /// Create a recognizer with the default day-first date order
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recognizer with an explicit date order
    pub fn with_date_order(date_order: DateOrder) -> Self {
        Self { date_order }
    }

    fn numeric_date(&self) -> &'static Regex {
        match self.date_order {
            DateOrder::DayFirst => &DAY_FIRST_DATE,
            DateOrder::MonthFirst => &MONTH_FIRST_DATE,
        }
    }
}

impl StringFormatRecognizer for RegexRecognizer {
    fn is_date(&self, s: &str) -> bool {
        ISO_DATE.is_match(s) || self.numeric_date().is_match(s)
    }

    fn is_time(&self, s: &str) -> bool {
        TIME_24H.is_match(s) || TIME_12H.is_match(s)
    }

    fn is_date_time(&self, s: &str) -> bool {
        if ISO_DATE_TIME.is_match(s) {
            return true;
        }

        match s.split_once(' ') {
            Some((date, time)) => self.is_date(date) && self.is_time(time),
            None => false,
        }
    }

    fn is_uri(&self, s: &str) -> bool {
        let parsed = match Url::parse(s) {
            Ok(url) => url,
            Err(_) => return false,
        };

        matches!(parsed.scheme(), "http" | "https" | "ftp")
            && parsed.host_str().is_some_and(|h| h.contains('.'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_date() {
        let rec = RegexRecognizer::new();

        assert!(rec.is_date("01.02.2023"));
        assert!(rec.is_date("31/12/2023"));
        assert!(rec.is_date("2023-12-31"));

        assert!(!rec.is_date("32.01.2023"));
        assert!(!rec.is_date("hello"));
        assert!(!rec.is_date("01.13.2023"));
    }

    #[test]
    fn test_date_order() {
        let us = RegexRecognizer::with_date_order(DateOrder::MonthFirst);

        assert!(us.is_date("12/31/2023"));
        assert!(!us.is_date("31/12/2023"));
    }

    #[test]
    fn test_is_time() {
        let rec = RegexRecognizer::new();

        assert!(rec.is_time("14:30"));
        assert!(rec.is_time("14:30:59"));
        assert!(rec.is_time("2:05 PM"));
        assert!(rec.is_time("11:59 p.m."));

        assert!(!rec.is_time("24:00"));
        assert!(!rec.is_time("14:60"));
    }

    #[test]
    fn test_is_date_time() {
        let rec = RegexRecognizer::new();

        assert!(rec.is_date_time("2023-12-31T23:59:59Z"));
        assert!(rec.is_date_time("01.02.2023 14:30"));

        assert!(!rec.is_date_time("01.02.2023"));
        assert!(!rec.is_date_time("14:30"));
    }

    #[test]
    fn test_is_uri() {
        let rec = RegexRecognizer::new();

        assert!(rec.is_uri("https://example.com/a"));
        assert!(rec.is_uri("ftp://files.example.org/pub"));

        assert!(!rec.is_uri("example.com"));
        assert!(!rec.is_uri("mailto:user@example.com"));
        assert!(!rec.is_uri("not a uri"));
    }
}
