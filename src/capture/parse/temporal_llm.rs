//! Optional LLM-assisted temporal parsing.
//!
//! Consulted only when the deterministic cascade found no time expression.
//! The model's reply must be strict JSON with the same shape the cascade
//! produces; anything else is treated as a failure and the caller keeps
//! the deterministic result.

use std::time::Duration;

use chrono::{Datelike, NaiveDateTime};
use serde::Deserialize;

use crate::capture::core::errors::{CaptureError, CaptureResult};
use crate::capture::core::time::{self, TimeDescriptor};
use crate::llm::{complete_bounded, strip_code_fences, Completion};

/// Reply contract for the time-parsing prompt.
#[derive(Debug, Deserialize)]
struct TimeCandidate {
    has_time: bool,
    datetime: Option<String>,
    display_time: Option<String>,
    parsed_text: Option<String>,
}

/// LLM-assisted temporal parser.
pub struct LlmTimeParser<'a> {
    completion: &'a dyn Completion,
    timeout: Duration,
}

impl<'a> LlmTimeParser<'a> {
    /// Wrap a completion collaborator with a bounded timeout.
    #[must_use]
    pub fn new(completion: &'a dyn Completion, timeout: Duration) -> Self {
        Self {
            completion,
            timeout,
        }
    }

    /// Ask the model for a time descriptor.
    ///
    /// # Errors
    /// Returns an error on timeout, backend failure, or a reply that does
    /// not satisfy the JSON contract. Callers recover by keeping the
    /// deterministic result.
    pub async fn parse(
        &self,
        text: &str,
        reference_now: NaiveDateTime,
    ) -> CaptureResult<TimeDescriptor> {
        let prompt = build_prompt(text, reference_now);
        let raw = complete_bounded(self.completion, self.timeout, &prompt).await?;
        interpret_reply(&raw, text)
    }
}

/// Build the Vietnamese time-extraction prompt.
fn build_prompt(text: &str, reference_now: NaiveDateTime) -> String {
    let date = reference_now.date();
    format!(
        "Phân tích thời gian trong câu tiếng Việt. Hôm nay là {weekday} ngày {today}.\n\
         \n\
         Câu: \"{text}\"\n\
         \n\
         Quy tắc:\n\
         - \"hôm nay\" = hôm nay; \"mai\", \"ngày mai\" = ngày mai\n\
         - \"thứ X\" = thứ X sắp tới (không bao giờ là hôm nay)\n\
         - \"thứ X tuần sau\" = thứ X sắp tới cộng thêm 7 ngày\n\
         - \"dd/mm\" = ngày dd/mm năm nay, nếu đã qua thì năm sau\n\
         - Giờ mặc định là 09:00 nếu chỉ biết ngày\n\
         \n\
         Chỉ trả về JSON hợp lệ, không giải thích:\n\
         {{\"has_time\": true/false, \"datetime\": \"YYYY-MM-DD HH:MM\", \
         \"display_time\": \"thứ X, ngày DD/MM\", \"parsed_text\": \"câu sau khi bỏ thời gian\"}}",
        weekday = time::weekday_name(date.weekday()),
        today = date.format("%d/%m/%Y"),
    )
}

/// Validate a model reply against the descriptor contract.
fn interpret_reply(raw: &str, original_text: &str) -> CaptureResult<TimeDescriptor> {
    let body = strip_code_fences(raw);
    let candidate: TimeCandidate = serde_json::from_str(body)?;

    let residual = candidate
        .parsed_text
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| original_text.to_string());

    if !candidate.has_time {
        return Ok(TimeDescriptor::none(residual.trim().to_string()));
    }

    let datetime = candidate
        .datetime
        .as_deref()
        .and_then(time::parse_wire_datetime)
        .ok_or_else(|| {
            CaptureError::MalformedCompletion("has_time without a parseable datetime".to_string())
        })?;

    let mut descriptor = TimeDescriptor::at(datetime, true, residual.trim().to_string());
    if let Some(display) = candidate.display_time {
        if !display.trim().is_empty() {
            descriptor.display_text = display.trim().to_string();
        }
    }
    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 7)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_prompt_carries_reference_date() {
        let prompt = build_prompt("tối thứ 6 đón mèo", reference());
        assert!(prompt.contains("thứ 5 ngày 07/08/2025"));
        assert!(prompt.contains("tối thứ 6 đón mèo"));
    }

    #[test]
    fn test_interpret_well_formed_reply() {
        let raw = r#"{"has_time": true, "datetime": "2025-08-08 20:00",
            "display_time": "thứ 6, ngày 08/08", "parsed_text": "đón mèo"}"#;
        let td = interpret_reply(raw, "tối thứ 6 đón mèo").unwrap();
        assert!(td.has_time);
        assert_eq!(td.wire_datetime().as_deref(), Some("2025-08-08 20:00"));
        assert_eq!(td.display_text, "thứ 6, ngày 08/08");
        assert_eq!(td.residual_text, "đón mèo");
    }

    #[test]
    fn test_interpret_fenced_reply() {
        let raw = "```json\n{\"has_time\": false, \"datetime\": null, \
                   \"display_time\": \"\", \"parsed_text\": \"mua sữa\"}\n```";
        let td = interpret_reply(raw, "mua sữa").unwrap();
        assert!(!td.has_time);
        assert_eq!(td.residual_text, "mua sữa");
    }

    #[test]
    fn test_interpret_rejects_non_json() {
        assert!(interpret_reply("không có thời gian", "x").is_err());
    }

    #[test]
    fn test_interpret_rejects_missing_datetime() {
        let raw = r#"{"has_time": true, "datetime": null, "display_time": "", "parsed_text": ""}"#;
        assert!(matches!(
            interpret_reply(raw, "x"),
            Err(CaptureError::MalformedCompletion(_))
        ));
    }

    #[test]
    fn test_interpret_rejects_bad_datetime_format() {
        let raw = r#"{"has_time": true, "datetime": "08/08/2025", "display_time": "", "parsed_text": ""}"#;
        assert!(interpret_reply(raw, "x").is_err());
    }
}
