//! Deterministic Vietnamese temporal-expression parser.
//!
//! One rule cascade, the union of every rule generation observed in the
//! wild: absolute date, relative day, weekday with optional next-week
//! suffix, explicit clock time with day-part qualifier, and bare day-part
//! words. The date dimension resolves first-match-wins; the time dimension
//! composes with whichever date rule fired, in either word order.
//!
//! The parser is pure: `reference_now` is injected and read nowhere else,
//! so the same input always yields the same descriptor.

use std::ops::Range;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::capture::core::time::{self, TimeDescriptor, DEFAULT_HOUR};

/// A named day part and its implied clock time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DayPart {
    /// "sáng" — morning, 09:00.
    Sang,
    /// "chiều" — afternoon, 17:00.
    Chieu,
    /// "tối" — evening, 20:00.
    Toi,
    /// "đêm" — night, 22:00.
    Dem,
}

impl DayPart {
    fn from_match(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "sáng" => Some(Self::Sang),
            "chiều" => Some(Self::Chieu),
            "tối" => Some(Self::Toi),
            "đêm" => Some(Self::Dem),
            _ => None,
        }
    }

    /// Implied clock time when no explicit hour is present.
    const fn implied_time(self) -> (u32, u32) {
        match self {
            Self::Sang => (9, 0),
            Self::Chieu => (17, 0),
            Self::Toi => (20, 0),
            Self::Dem => (22, 0),
        }
    }

    /// Whether this part shifts a sub-12 clock hour into the second half
    /// of the civil day.
    const fn is_pm(self) -> bool {
        matches!(self, Self::Chieu | Self::Toi | Self::Dem)
    }
}

/// Compiled temporal parser.
pub struct TemporalParser {
    absolute_date: Regex,
    today: Regex,
    tomorrow: Regex,
    weekday: Regex,
    clock: Regex,
    day_part: Regex,
}

impl TemporalParser {
    /// Compile the rule set.
    ///
    /// # Errors
    /// Returns an error if any pattern is invalid.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            absolute_date: Regex::new(r"(?i)(?:ngày\s+)?(\d{1,2})/(\d{1,2})(?:/(\d{4}))?")?,
            today: Regex::new(r"(?i)hôm\s+nay")?,
            tomorrow: Regex::new(r"(?i)\b(?:ngày\s+)?mai\b")?,
            weekday: Regex::new(
                r"(?i)(?:thứ\s*([2-7])|thứ\s+(hai|ba|tư|năm|sáu|bảy)|chủ\s*nhật)(\s*tuần\s+sau)?",
            )?,
            clock: Regex::new(r"(?i)\b(?:lúc\s+)?(\d{1,2})h(\d{2})?\b(?:\s*(sáng|chiều|tối|đêm))?")?,
            day_part: Regex::new(r"(?i)\b(sáng|chiều|tối|đêm)\b")?,
        })
    }

    /// Parse a message against `reference_now`.
    ///
    /// The returned descriptor's `residual_text` is the input with every
    /// matched substring removed and whitespace collapsed.
    #[must_use]
    pub fn parse(&self, text: &str, reference_now: NaiveDateTime) -> TimeDescriptor {
        let today = reference_now.date();
        let mut spans: Vec<Range<usize>> = Vec::new();

        let date = self
            .match_absolute_date(text, today, &mut spans)
            .or_else(|| self.match_relative_day(text, today, &mut spans))
            .or_else(|| self.match_weekday(text, today, &mut spans));

        let mut time_of_day = self.match_clock(text, &mut spans);
        if time_of_day.is_none() {
            time_of_day = self.match_day_part(text, &mut spans);
        }

        if date.is_none() && time_of_day.is_none() {
            return TimeDescriptor::none(collapse_whitespace(text));
        }

        // A bare time expression anchors to the reference date.
        let date = date.unwrap_or(today);
        let (hour, minute, explicit) = match time_of_day {
            Some((h, m)) => (h, m, true),
            None => (DEFAULT_HOUR, 0, false),
        };

        let residual = remove_spans(text, &spans);
        match time::at_time(date, hour, minute) {
            Some(datetime) => TimeDescriptor::at(datetime, explicit, residual),
            None => TimeDescriptor::none(collapse_whitespace(text)),
        }
    }

    /// Rule 1: explicit absolute date `D/M[/YYYY]`, optional "ngày" prefix.
    ///
    /// A defaulted year rolls forward when the date already lies strictly
    /// before `today`; an explicitly written year is taken as-is. Invalid
    /// calendar dates fall through without consuming the match.
    fn match_absolute_date(
        &self,
        text: &str,
        today: NaiveDate,
        spans: &mut Vec<Range<usize>>,
    ) -> Option<NaiveDate> {
        let caps = self.absolute_date.captures(text)?;
        let day: u32 = caps.get(1)?.as_str().parse().ok()?;
        let month: u32 = caps.get(2)?.as_str().parse().ok()?;

        let date = match caps.get(3) {
            Some(year) => {
                let year: i32 = year.as_str().parse().ok()?;
                NaiveDate::from_ymd_opt(year, month, day)?
            }
            None => {
                let candidate = NaiveDate::from_ymd_opt(today.year(), month, day)?;
                if candidate < today {
                    NaiveDate::from_ymd_opt(today.year() + 1, month, day)?
                } else {
                    candidate
                }
            }
        };

        spans.push(caps.get(0)?.range());
        Some(date)
    }

    /// Rule 2: "hôm nay" (today) and "mai"/"ngày mai" (tomorrow).
    fn match_relative_day(
        &self,
        text: &str,
        today: NaiveDate,
        spans: &mut Vec<Range<usize>>,
    ) -> Option<NaiveDate> {
        if let Some(m) = self.today.find(text) {
            spans.push(m.range());
            return Some(today);
        }
        if let Some(m) = self.tomorrow.find(text) {
            spans.push(m.range());
            return today.checked_add_days(Days::new(1));
        }
        None
    }

    /// Rule 3: "thứ N" / "chủ nhật", optional "tuần sau" suffix.
    ///
    /// Resolves to the next occurrence strictly after `today`; a bare
    /// weekday equal to today's rolls a full week forward, and "tuần sau"
    /// adds exactly seven more days on top of the plain resolution.
    fn match_weekday(
        &self,
        text: &str,
        today: NaiveDate,
        spans: &mut Vec<Range<usize>>,
    ) -> Option<NaiveDate> {
        let caps = self.weekday.captures(text)?;

        // "thứ N" (N in 2..=7) and the spelled-out forms map to
        // Monday..Saturday; otherwise the alternation matched "chủ nhật".
        let target = if let Some(n) = caps.get(1) {
            n.as_str().parse::<u32>().ok()?.checked_sub(2)?
        } else if let Some(name) = caps.get(2) {
            match name.as_str().to_lowercase().as_str() {
                "hai" => 0,
                "ba" => 1,
                "tư" => 2,
                "năm" => 3,
                "sáu" => 4,
                "bảy" => 5,
                _ => return None,
            }
        } else {
            6
        };

        let mut days_ahead = (target + 7 - today.weekday().num_days_from_monday()) % 7;
        if days_ahead == 0 {
            days_ahead = 7;
        }
        if caps.get(3).is_some() {
            days_ahead += 7;
        }

        spans.push(caps.get(0)?.range());
        today.checked_add_days(Days::new(u64::from(days_ahead)))
    }

    /// Rule 4: explicit clock time `Hh[MM]`, optional day-part qualifier
    /// either adjacent ("5h chiều") or anywhere else in the sentence
    /// ("chiều 5h") — word order is irrelevant.
    fn match_clock(&self, text: &str, spans: &mut Vec<Range<usize>>) -> Option<(u32, u32)> {
        let caps = self
            .clock
            .captures_iter(text)
            .find(|c| !overlaps(&c.get(0).map_or(0..0, |m| m.range()), spans))?;

        let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = match caps.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        if hour > 23 || minute > 59 {
            return None;
        }

        let full = caps.get(0)?.range();
        let qualifier = match caps.get(3) {
            Some(q) => DayPart::from_match(q.as_str()),
            None => {
                // Look for a standalone day-part word elsewhere.
                let mut found = None;
                for m in self.day_part.find_iter(text) {
                    let disjoint = m.range().start >= full.end || m.range().end <= full.start;
                    if disjoint && !overlaps(&m.range(), spans) {
                        found = Some((DayPart::from_match(m.as_str()), m.range()));
                        break;
                    }
                }
                match found {
                    Some((part, range)) => {
                        spans.push(range);
                        part
                    }
                    None => None,
                }
            }
        };

        if let Some(part) = qualifier {
            if part.is_pm() && hour < 12 {
                hour += 12;
            }
        }

        spans.push(full);
        Some((hour, minute))
    }

    /// Rule 5: a named day-part word without an explicit clock time.
    fn match_day_part(&self, text: &str, spans: &mut Vec<Range<usize>>) -> Option<(u32, u32)> {
        for m in self.day_part.find_iter(text) {
            if overlaps(&m.range(), spans) {
                continue;
            }
            if let Some(part) = DayPart::from_match(m.as_str()) {
                spans.push(m.range());
                return Some(part.implied_time());
            }
        }
        None
    }
}

fn overlaps(range: &Range<usize>, taken: &[Range<usize>]) -> bool {
    taken
        .iter()
        .any(|t| range.start < t.end && t.start < range.end)
}

/// Remove the matched byte ranges and collapse whitespace.
fn remove_spans(text: &str, spans: &[Range<usize>]) -> String {
    let mut keep = vec![true; text.len()];
    for span in spans {
        for flag in keep
            .iter_mut()
            .take(span.end.min(text.len()))
            .skip(span.start)
        {
            *flag = false;
        }
    }

    let mut out = String::with_capacity(text.len());
    for (idx, ch) in text.char_indices() {
        if keep[idx] {
            out.push(ch);
        } else if !out.ends_with(' ') {
            // Keep a separator so removal never glues adjacent words.
            out.push(' ');
        }
    }

    collapse_whitespace(&out)
}

/// Collapse runs of whitespace into single spaces and trim.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_space = true;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike, Weekday};

    fn parser() -> TemporalParser {
        TemporalParser::new().unwrap()
    }

    fn now(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_absolute_date_in_future_keeps_year() {
        let td = parser().parse("19/10 họp lớp", now(2025, 1, 1));
        assert_eq!(td.datetime, Some(datetime(2025, 10, 19, 9, 0)));
        assert_eq!(td.residual_text, "họp lớp");
    }

    #[test]
    fn test_absolute_date_in_past_rolls_to_next_year() {
        let td = parser().parse("19/10 họp lớp", now(2025, 11, 1));
        assert_eq!(td.datetime, Some(datetime(2026, 10, 19, 9, 0)));
    }

    #[test]
    fn test_absolute_date_with_ngay_prefix() {
        let td = parser().parse("ngày 7/8 tiêm mèo", now(2025, 8, 1));
        assert_eq!(td.datetime, Some(datetime(2025, 8, 7, 9, 0)));
        assert_eq!(td.residual_text, "tiêm mèo");
    }

    #[test]
    fn test_absolute_date_explicit_year_taken_as_is() {
        let td = parser().parse("25/12/2024 tiệc", now(2025, 8, 7));
        assert_eq!(td.datetime, Some(datetime(2024, 12, 25, 9, 0)));
    }

    #[test]
    fn test_invalid_calendar_date_falls_through() {
        // 31/02 never exists; the text has no other rule to fall to.
        let td = parser().parse("31/2 nộp báo cáo", now(2025, 8, 7));
        assert!(!td.has_time);
        assert!(td.datetime.is_none());
        assert!(td.display_text.is_empty());
    }

    #[test]
    fn test_today_keyword() {
        let td = parser().parse("hôm nay dọn nhà", now(2025, 8, 7));
        assert_eq!(td.datetime, Some(datetime(2025, 8, 7, 9, 0)));
        assert_eq!(td.residual_text, "dọn nhà");
    }

    #[test]
    fn test_tomorrow_keyword() {
        let td = parser().parse("mua sắm ngày mai", now(2025, 8, 7));
        assert_eq!(td.datetime, Some(datetime(2025, 8, 8, 9, 0)));
        assert_eq!(td.residual_text, "mua sắm");
    }

    #[test]
    fn test_bare_mai() {
        let td = parser().parse("mai gặp bạn", now(2025, 8, 7));
        assert_eq!(td.datetime, Some(datetime(2025, 8, 8, 9, 0)));
        assert_eq!(td.residual_text, "gặp bạn");
    }

    #[test]
    fn test_weekday_resolves_strictly_forward() {
        // 2025-08-07 is a Thursday; thứ 6 is the next day.
        let td = parser().parse("thứ 6 thợ lắp đồ", now(2025, 8, 7));
        let date = td.datetime.unwrap().date();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 8, 8).unwrap());
        assert_eq!(date.weekday(), Weekday::Fri);
        assert_eq!(td.residual_text, "thợ lắp đồ");
    }

    #[test]
    fn test_weekday_never_resolves_to_today() {
        // 2025-08-08 is itself a Friday.
        let td = parser().parse("thứ 6 thợ lắp đồ", now(2025, 8, 8));
        let date = td.datetime.unwrap().date();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 8, 15).unwrap());
        assert_eq!(date.weekday(), Weekday::Fri);
    }

    #[test]
    fn test_next_week_adds_exactly_seven_days() {
        let plain = parser().parse("thứ 6 đi chơi", now(2025, 8, 7));
        let next = parser().parse("thứ 6 tuần sau đi chơi", now(2025, 8, 7));
        assert_eq!(
            next.datetime.unwrap().date(),
            plain.datetime.unwrap().date() + Days::new(7)
        );
        assert_eq!(next.residual_text, "đi chơi");
    }

    #[test]
    fn test_spelled_out_weekday() {
        let a = parser().parse("thứ sáu đi chơi", now(2025, 8, 7));
        let b = parser().parse("thứ 6 đi chơi", now(2025, 8, 7));
        assert_eq!(a.datetime, b.datetime);
        assert_eq!(a.residual_text, "đi chơi");
    }

    #[test]
    fn test_sunday() {
        // 2025-08-07 Thursday -> chủ nhật is 2025-08-10.
        let td = parser().parse("chủ nhật về quê", now(2025, 8, 7));
        let date = td.datetime.unwrap().date();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 8, 10).unwrap());
        assert_eq!(date.weekday(), Weekday::Sun);
    }

    #[test]
    fn test_clock_time_anchors_to_today() {
        let td = parser().parse("dọn nhà 5h", now(2025, 8, 7));
        assert_eq!(td.datetime, Some(datetime(2025, 8, 7, 5, 0)));
        assert_eq!(td.residual_text, "dọn nhà");
        assert_eq!(td.display_text, "thứ 5, ngày 07/08 lúc 05:00");
    }

    #[test]
    fn test_clock_time_with_minutes() {
        let td = parser().parse("meeting ngày 19/10 lúc 14h30", now(2025, 8, 7));
        assert_eq!(td.datetime, Some(datetime(2025, 10, 19, 14, 30)));
        assert_eq!(td.residual_text, "meeting");
    }

    #[test]
    fn test_pm_qualifier_shifts_hour() {
        let td = parser().parse("đón con 5h chiều", now(2025, 8, 7));
        assert_eq!(td.datetime, Some(datetime(2025, 8, 7, 17, 0)));
    }

    #[test]
    fn test_morning_qualifier_keeps_hour() {
        let td = parser().parse("cuộc họp mai 9h sáng", now(2025, 8, 7));
        assert_eq!(td.datetime, Some(datetime(2025, 8, 8, 9, 0)));
        assert_eq!(td.residual_text, "cuộc họp");
    }

    #[test]
    fn test_pm_qualifier_leaves_24h_clock_alone() {
        let td = parser().parse("ăn tối 17h tối", now(2025, 8, 7));
        assert_eq!(td.datetime, Some(datetime(2025, 8, 7, 17, 0)));
    }

    #[test]
    fn test_out_of_range_clock_falls_through() {
        let td = parser().parse("mã 99h của đơn hàng", now(2025, 8, 7));
        assert!(!td.has_time);
    }

    #[test]
    fn test_day_part_word_alone_supplies_time() {
        let td = parser().parse("tối thứ 6 đón mèo", now(2025, 8, 7));
        assert_eq!(td.datetime, Some(datetime(2025, 8, 8, 20, 0)));
        assert_eq!(td.residual_text, "đón mèo");
    }

    #[test]
    fn test_word_order_is_irrelevant() {
        let a = parser().parse("tối thứ 3 đón mèo", now(2025, 8, 7));
        let b = parser().parse("đón mèo thứ 3 tối", now(2025, 8, 7));
        assert_eq!(a.datetime, b.datetime);
        assert_eq!(a.datetime.unwrap().time().hour(), 20);
        assert_eq!(a.residual_text, "đón mèo");
        assert_eq!(b.residual_text, "đón mèo");
    }

    #[test]
    fn test_qualifier_before_clock() {
        let td = parser().parse("chiều 5h đá bóng", now(2025, 8, 7));
        assert_eq!(td.datetime, Some(datetime(2025, 8, 7, 17, 0)));
        assert_eq!(td.residual_text, "đá bóng");
    }

    #[test]
    fn test_no_time_expression() {
        let td = parser().parse("ghi nhớ  mua   sữa", now(2025, 8, 7));
        assert!(!td.has_time);
        assert!(td.datetime.is_none());
        assert!(td.display_text.is_empty());
        assert_eq!(td.residual_text, "ghi nhớ mua sữa");
    }

    #[test]
    fn test_display_without_explicit_time_omits_clock() {
        let td = parser().parse("thứ 6 thợ lắp đồ", now(2025, 8, 7));
        assert_eq!(td.display_text, "thứ 6, ngày 08/08");
    }

    #[test]
    fn test_display_with_explicit_time() {
        let td = parser().parse("tối thứ 6 đón mèo", now(2025, 8, 7));
        assert_eq!(td.display_text, "thứ 6, ngày 08/08 lúc 20:00");
    }

    #[test]
    fn test_deterministic_for_same_reference() {
        let a = parser().parse("thứ 4 liên hệ gửi mèo", now(2025, 8, 7));
        let b = parser().parse("thứ 4 liên hệ gửi mèo", now(2025, 8, 7));
        assert_eq!(a, b);
    }
}
