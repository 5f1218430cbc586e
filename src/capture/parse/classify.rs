//! Message classification into event / todo / idea.
//!
//! LLM primary (accepted only on an exact label), keyword fallback, idea
//! as the permissive default.

use std::time::Duration;

use tracing::debug;

use crate::capture::core::kinds::ItemKind;
use crate::llm::{complete_bounded, Completion};

/// Keywords that mark an appointment.
const EVENT_WORDS: [&str; 4] = ["event", "meeting", "cuộc họp", "hẹn"];

/// Keywords that mark an actionable task.
const TODO_WORDS: [&str; 5] = ["todo", "làm", "dọn", "mua", "task"];

/// Keyword fallback classification.
#[must_use]
pub fn keyword_classify(text: &str) -> ItemKind {
    let lowered = text.to_lowercase();
    if EVENT_WORDS.iter().any(|w| lowered.contains(w)) {
        return ItemKind::Event;
    }
    if TODO_WORDS.iter().any(|w| lowered.contains(w)) {
        return ItemKind::Todo;
    }
    ItemKind::Idea
}

/// Classify a message, consulting the LLM first when available.
pub async fn classify(llm: Option<&dyn Completion>, timeout: Duration, text: &str) -> ItemKind {
    if let Some(llm) = llm {
        match complete_bounded(llm, timeout, &build_prompt(text)).await {
            Ok(reply) => match reply.trim().to_lowercase().as_str() {
                "event" => return ItemKind::Event,
                "todo" => return ItemKind::Todo,
                "idea" => return ItemKind::Idea,
                other => debug!("classification label rejected: {other:?}"),
            },
            Err(err) => debug!("classification completion failed: {err}"),
        }
    }

    keyword_classify(text)
}

fn build_prompt(text: &str) -> String {
    format!(
        "Phân loại tin nhắn tiếng Việt sau vào đúng một loại:\n\"{text}\"\n\n\
         - \"event\": lịch hẹn, cuộc họp, sự kiện có thời gian\n\
         - \"todo\": công việc cần làm\n\
         - \"idea\": ghi chú, ý tưởng, điều cần nhớ\n\n\
         Trả về chỉ một từ: event, todo, hoặc idea"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_keywords() {
        assert_eq!(keyword_classify("event thứ 6 thợ lắp đồ"), ItemKind::Event);
        assert_eq!(keyword_classify("cuộc họp mai 9h sáng"), ItemKind::Event);
        assert_eq!(keyword_classify("hẹn nha sĩ"), ItemKind::Event);
    }

    #[test]
    fn test_todo_keywords() {
        assert_eq!(keyword_classify("todo dọn nhà 5h"), ItemKind::Todo);
        assert_eq!(keyword_classify("mua sắm ngày mai"), ItemKind::Todo);
        assert_eq!(keyword_classify("làm bài tập"), ItemKind::Todo);
    }

    #[test]
    fn test_idea_is_default() {
        assert_eq!(keyword_classify("ghi nhớ gọi mẹ"), ItemKind::Idea);
        assert_eq!(keyword_classify("ý tưởng app mới"), ItemKind::Idea);
    }

    #[test]
    fn test_event_beats_todo_keywords() {
        // Both "meeting" and "task" appear; event is checked first.
        assert_eq!(keyword_classify("meeting về task mới"), ItemKind::Event);
    }

    #[tokio::test]
    async fn test_no_llm_uses_keywords() {
        let kind = classify(None, Duration::from_secs(1), "todo dọn nhà").await;
        assert_eq!(kind, ItemKind::Todo);
    }
}
