//! Priority extraction for todos.
//!
//! Precedence: explicit `prio:N` tag, then the LLM label, then the keyword
//! heuristic. Always returns a valid level.

use std::time::Duration;

use regex::Regex;
use tracing::debug;

use crate::capture::core::kinds::Priority;
use crate::llm::{complete_bounded, Completion};

/// Urgency keywords (checked with "không gấp" negations masked out).
const URGENT_WORDS: [&str; 5] = ["gấp", "khẩn cấp", "ngay", "quan trọng", "deadline"];

/// Low-urgency keywords.
const CHILL_WORDS: [&str; 4] = ["rảnh", "thảnh thơi", "không gấp", "khi nào"];

/// Priority extractor.
pub struct PriorityExtractor {
    tag: Regex,
}

impl PriorityExtractor {
    /// Compile the tag pattern.
    ///
    /// # Errors
    /// Returns an error if the pattern is invalid.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            tag: Regex::new(r"(?i)\bprio:\s*([1-3])\b")?,
        })
    }

    /// Explicit `prio:1|2|3` tag anywhere in the text.
    #[must_use]
    pub fn from_tag(&self, text: &str) -> Option<Priority> {
        let caps = self.tag.captures(text)?;
        let digit: u8 = caps.get(1)?.as_str().parse().ok()?;
        Priority::from_tag_digit(digit)
    }

    /// Whether the text carries an explicit tag.
    #[must_use]
    pub fn tag_present(&self, text: &str) -> bool {
        self.tag.is_match(text)
    }

    /// Keyword fallback. "không gấp" is masked before the urgency scan so
    /// the negated phrase can reach the chill bucket.
    #[must_use]
    pub fn keyword_heuristic(text: &str) -> Priority {
        let lowered = text.to_lowercase();
        let masked = lowered.replace("không gấp", " ");

        if URGENT_WORDS.iter().any(|w| masked.contains(w)) {
            return Priority::Urgent;
        }
        if CHILL_WORDS.iter().any(|w| lowered.contains(w)) {
            return Priority::Chill;
        }
        Priority::Normal
    }

    /// Full extraction: tag, then LLM label, then keywords.
    pub async fn parse(
        &self,
        llm: Option<&dyn Completion>,
        timeout: Duration,
        text: &str,
    ) -> Priority {
        if let Some(priority) = self.from_tag(text) {
            return priority;
        }

        if let Some(llm) = llm {
            match complete_bounded(llm, timeout, &build_prompt(text)).await {
                Ok(reply) => match reply.trim().to_lowercase().as_str() {
                    "urgent" => return Priority::Urgent,
                    "normal" => return Priority::Normal,
                    "chill" => return Priority::Chill,
                    other => debug!("priority label rejected: {other:?}"),
                },
                Err(err) => debug!("priority completion failed: {err}"),
            }
        }

        Self::keyword_heuristic(text)
    }
}

fn build_prompt(text: &str) -> String {
    format!(
        "Phân tích mức độ ưu tiên trong câu tiếng Việt:\n\"{text}\"\n\n\
         Mức độ ưu tiên:\n\
         - \"urgent\": gấp, khẩn cấp, cần làm ngay, quan trọng, deadline gần\n\
         - \"normal\": bình thường, không có từ khóa đặc biệt\n\
         - \"chill\": không gấp, rảnh rỗi, khi nào có thời gian\n\n\
         Trả về chỉ một từ: urgent, normal, hoặc chill"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> PriorityExtractor {
        PriorityExtractor::new().unwrap()
    }

    #[tokio::test]
    async fn test_tag_beats_conflicting_keywords() {
        // "rảnh" alone would be chill; the tag wins.
        let priority = extractor()
            .parse(None, Duration::from_secs(1), "dọn nhà khi nào rảnh prio:1")
            .await;
        assert_eq!(priority, Priority::Urgent);
    }

    #[test]
    fn test_tag_digits() {
        let e = extractor();
        assert_eq!(e.from_tag("x prio:1 y"), Some(Priority::Urgent));
        assert_eq!(e.from_tag("x prio:2"), Some(Priority::Normal));
        assert_eq!(e.from_tag("x prio: 3"), Some(Priority::Chill));
        assert_eq!(e.from_tag("x prio:4"), None);
        assert_eq!(e.from_tag("không có tag"), None);
    }

    #[test]
    fn test_urgent_keywords() {
        assert_eq!(
            PriorityExtractor::keyword_heuristic("nộp báo cáo gấp"),
            Priority::Urgent
        );
        assert_eq!(
            PriorityExtractor::keyword_heuristic("deadline sắp tới"),
            Priority::Urgent
        );
    }

    #[test]
    fn test_chill_keywords() {
        assert_eq!(
            PriorityExtractor::keyword_heuristic("dọn kho khi nào rảnh"),
            Priority::Chill
        );
        assert_eq!(
            PriorityExtractor::keyword_heuristic("việc này không gấp"),
            Priority::Chill
        );
    }

    #[test]
    fn test_ngay_does_not_match_ngay_with_diacritics() {
        // "ngày" (day) is not the urgency word "ngay".
        assert_eq!(
            PriorityExtractor::keyword_heuristic("họp ngày 19/10"),
            Priority::Normal
        );
    }

    #[test]
    fn test_default_is_normal() {
        assert_eq!(
            PriorityExtractor::keyword_heuristic("mua sữa"),
            Priority::Normal
        );
    }

    #[tokio::test]
    async fn test_no_llm_falls_back_to_keywords() {
        let priority = extractor()
            .parse(None, Duration::from_secs(1), "làm ngay việc này")
            .await;
        assert_eq!(priority, Priority::Urgent);
    }
}
