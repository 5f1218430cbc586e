//! Normalized temporal descriptor produced by the parser.
//!
//! The wire/storage representation of the resolved instant is the
//! local-naive `"YYYY-MM-DD HH:MM"` string; `display_text` is the
//! human-readable Vietnamese rendering ("thứ 6, ngày 19/10 lúc 20:00").

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Wire/storage format for resolved datetimes, minute precision.
pub const WIRE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Default time-of-day when only a date is known.
pub const DEFAULT_HOUR: u32 = 9;

/// Result of temporal parsing over one message.
///
/// Invariant: `has_time == false` implies `datetime` is `None` and
/// `display_text` is empty. The constructors uphold this; deserialized
/// values are normalized through [`TimeDescriptor::normalized`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeDescriptor {
    /// Whether any time expression was recognized.
    pub has_time: bool,
    /// The resolved instant (local clock, minute precision).
    #[serde(with = "wire_datetime")]
    pub datetime: Option<NaiveDateTime>,
    /// Localized rendering of the resolved date/time.
    pub display_text: String,
    /// Input text with all recognized temporal substrings removed.
    pub residual_text: String,
}

impl TimeDescriptor {
    /// Descriptor for text with no recognized time expression.
    #[must_use]
    pub fn none(residual_text: impl Into<String>) -> Self {
        Self {
            has_time: false,
            datetime: None,
            display_text: String::new(),
            residual_text: residual_text.into(),
        }
    }

    /// Descriptor for a resolved instant.
    ///
    /// `explicit_time` controls whether the clock suffix appears in the
    /// display text: it is set when a rule supplied the time-of-day and
    /// unset when the 09:00 date-only default was applied.
    #[must_use]
    pub fn at(datetime: NaiveDateTime, explicit_time: bool, residual_text: impl Into<String>) -> Self {
        Self {
            has_time: true,
            datetime: Some(datetime),
            display_text: render_display(datetime, explicit_time),
            residual_text: residual_text.into(),
        }
    }

    /// Re-establish the struct invariant after deserialization from an
    /// untrusted source (the LLM JSON contract).
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if !self.has_time || self.datetime.is_none() {
            self.has_time = false;
            self.datetime = None;
            self.display_text.clear();
        }
        self
    }

    /// The resolved instant in wire format, if any.
    #[must_use]
    pub fn wire_datetime(&self) -> Option<String> {
        self.datetime.map(|dt| dt.format(WIRE_FORMAT).to_string())
    }
}

/// Render the canonical display string for a resolved instant.
///
/// `"<weekday>, ngày <DD>/<MM>"`, plus `" lúc <HH:MM>"` when the
/// time-of-day was explicitly resolved.
#[must_use]
pub fn render_display(datetime: NaiveDateTime, explicit_time: bool) -> String {
    let date = datetime.date();
    let mut out = format!(
        "{}, ngày {:02}/{:02}",
        weekday_name(date.weekday()),
        date.day(),
        date.month()
    );
    if explicit_time {
        out.push_str(&format!(" lúc {}", datetime.format("%H:%M")));
    }
    out
}

/// Vietnamese weekday name ("thứ 2" .. "thứ 7", "chủ nhật").
#[must_use]
pub const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "thứ 2",
        Weekday::Tue => "thứ 3",
        Weekday::Wed => "thứ 4",
        Weekday::Thu => "thứ 5",
        Weekday::Fri => "thứ 6",
        Weekday::Sat => "thứ 7",
        Weekday::Sun => "chủ nhật",
    }
}

/// Parse a Vietnamese weekday phrase ("thứ 2".."thứ 7", "thứ hai", "t2",
/// "chủ nhật", "cn") to a [`Weekday`].
#[must_use]
pub fn parse_weekday_name(raw: &str) -> Option<Weekday> {
    let s = raw.trim().to_lowercase();
    let s = s.split_whitespace().collect::<Vec<_>>().join(" ");
    match s.as_str() {
        "thứ 2" | "thứ hai" | "t2" => Some(Weekday::Mon),
        "thứ 3" | "thứ ba" | "t3" => Some(Weekday::Tue),
        "thứ 4" | "thứ tư" | "t4" => Some(Weekday::Wed),
        "thứ 5" | "thứ năm" | "t5" => Some(Weekday::Thu),
        "thứ 6" | "thứ sáu" | "t6" => Some(Weekday::Fri),
        "thứ 7" | "thứ bảy" | "t7" => Some(Weekday::Sat),
        "chủ nhật" | "cn" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Build a minute-precision instant from a date and an hour/minute pair.
#[must_use]
pub fn at_time(date: NaiveDate, hour: u32, minute: u32) -> Option<NaiveDateTime> {
    NaiveTime::from_hms_opt(hour, minute, 0).map(|t| date.and_time(t))
}

/// Serde helpers for the `"YYYY-MM-DD HH:MM"` wire representation.
mod wire_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::WIRE_FORMAT;

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_some(&dt.format(WIRE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(s) => NaiveDateTime::parse_from_str(s.trim(), WIRE_FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

/// Parse a wire-format datetime string.
#[must_use]
pub fn parse_wire_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), WIRE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_none_upholds_invariant() {
        let td = TimeDescriptor::none("mua sữa");
        assert!(!td.has_time);
        assert!(td.datetime.is_none());
        assert!(td.display_text.is_empty());
        assert_eq!(td.residual_text, "mua sữa");
    }

    #[test]
    fn test_display_with_and_without_clock() {
        // 2025-10-19 is a Sunday.
        let dt = at_time(date(2025, 10, 19), 20, 0).unwrap();
        assert_eq!(render_display(dt, true), "chủ nhật, ngày 19/10 lúc 20:00");
        assert_eq!(render_display(dt, false), "chủ nhật, ngày 19/10");
    }

    #[test]
    fn test_wire_roundtrip() {
        let dt = at_time(date(2025, 8, 7), 9, 30).unwrap();
        let td = TimeDescriptor::at(dt, true, "tiêm mèo");
        let json = serde_json::to_string(&td).unwrap();
        assert!(json.contains("\"2025-08-07 09:30\""));
        let restored: TimeDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, td);
    }

    #[test]
    fn test_normalized_clears_partial_state() {
        let td = TimeDescriptor {
            has_time: true,
            datetime: None,
            display_text: "thứ 6, ngày 19/10".to_string(),
            residual_text: String::new(),
        };
        let td = td.normalized();
        assert!(!td.has_time);
        assert!(td.display_text.is_empty());
    }

    #[test]
    fn test_parse_weekday_aliases() {
        assert_eq!(parse_weekday_name("thứ sáu"), Some(Weekday::Fri));
        assert_eq!(parse_weekday_name("T2"), Some(Weekday::Mon));
        assert_eq!(parse_weekday_name("cn"), Some(Weekday::Sun));
        assert_eq!(parse_weekday_name("mai"), None);
    }
}
