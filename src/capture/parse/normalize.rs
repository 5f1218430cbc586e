//! Text normalization: produce the clean item description.
//!
//! Starts from the residual the temporal parser already computed, then
//! removes the `prio:N` tag, known priority keyword words, and leading
//! explicit kind tags ("todo dọn nhà" stores as "dọn nhà"). Idempotent up
//! to whitespace normalization and safe when nothing matched.

use regex::Regex;

use crate::capture::core::time::TimeDescriptor;

/// Text normalizer with precompiled patterns.
pub struct TextNormalizer {
    prio_tag: Regex,
    priority_words: Regex,
}

impl TextNormalizer {
    /// Compile the stripping patterns.
    ///
    /// # Errors
    /// Returns an error if a pattern is invalid.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            prio_tag: Regex::new(r"(?i)\bprio:\s*[1-3]\b")?,
            priority_words: Regex::new(
                r"(?i)\b(khẩn cấp|không gấp|thảnh thơi|khi nào|quan trọng|deadline|gấp|ngay|rảnh)\b",
            )?,
        })
    }

    /// Strip recognized substrings and collapse whitespace.
    ///
    /// `strip_priority_words` removes the keyword vocabulary in addition to
    /// the tag; the pipeline enables it for todos, where the words were
    /// consumed as a priority signal.
    #[must_use]
    pub fn strip(
        &self,
        text: &str,
        time: &TimeDescriptor,
        strip_priority_words: bool,
    ) -> String {
        // The residual already has the temporal substrings removed; an
        // empty residual is only trusted when a time was actually found.
        let base = if time.has_time || !time.residual_text.is_empty() {
            time.residual_text.clone()
        } else {
            text.to_string()
        };

        let without_tag = self.prio_tag.replace_all(&base, " ");
        let cleaned = if strip_priority_words {
            self.priority_words.replace_all(&without_tag, " ").to_string()
        } else {
            without_tag.to_string()
        };

        let mut out = collapse_whitespace(&cleaned);
        loop {
            let stripped = strip_leading_kind_tag(&out);
            if stripped == out {
                break;
            }
            out = stripped;
        }
        out
    }
}

/// Remove one leading explicit kind tag, if present.
fn strip_leading_kind_tag(text: &str) -> String {
    let mut words = text.splitn(2, ' ');
    let first = words.next().unwrap_or("");
    let is_tag = ["event", "todo", "idea"]
        .iter()
        .any(|t| first.eq_ignore_ascii_case(t));
    if is_tag {
        words.next().unwrap_or("").trim_start().to_string()
    } else {
        text.to_string()
    }
}

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
    use crate::capture::parse::temporal::TemporalParser;
    use chrono::NaiveDate;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::new().unwrap()
    }

    fn now() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 7)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_full_strip_scenario() {
        let text = "todo dọn nhà tối thứ 6 prio:1";
        let time = TemporalParser::new().unwrap().parse(text, now());
        let out = normalizer().strip(text, &time, true);
        assert_eq!(out, "dọn nhà");
    }

    #[test]
    fn test_strip_is_idempotent() {
        let parser = TemporalParser::new().unwrap();
        let text = "todo dọn nhà tối thứ 6 prio:1";
        let time = parser.parse(text, now());
        let once = normalizer().strip(text, &time, true);

        let time_again = parser.parse(&once, now());
        let twice = normalizer().strip(&once, &time_again, true);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_identity_when_nothing_matches() {
        let time = TimeDescriptor::none("gọi  mẹ");
        assert_eq!(normalizer().strip("gọi  mẹ", &time, true), "gọi mẹ");
    }

    #[test]
    fn test_priority_words_kept_for_non_todos() {
        let time = TimeDescriptor::none("ghi nhớ lúc rảnh đọc sách");
        let out = normalizer().strip("ghi nhớ lúc rảnh đọc sách", &time, false);
        assert_eq!(out, "ghi nhớ lúc rảnh đọc sách");
    }

    #[test]
    fn test_tag_removed_regardless() {
        let time = TimeDescriptor::none("ghi chú prio:2 về dự án");
        let out = normalizer().strip("ghi chú prio:2 về dự án", &time, false);
        assert_eq!(out, "ghi chú về dự án");
    }

    #[test]
    fn test_repeated_kind_tags_stripped() {
        let time = TimeDescriptor::none("todo todo mua sữa");
        assert_eq!(normalizer().strip("todo todo mua sữa", &time, false), "mua sữa");
    }

    #[test]
    fn test_empty_residual_with_time_is_trusted() {
        let parser = TemporalParser::new().unwrap();
        let time = parser.parse("ngày mai", now());
        assert!(time.has_time);
        assert_eq!(normalizer().strip("ngày mai", &time, true), "");
    }
}
