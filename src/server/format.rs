//! Vietnamese reply rendering for the chat surface.
//!
//! Keeps the original bot's voice: emoji-led confirmations, grouped list
//! views, and one confirmation or one failure line per action.

use crate::capture::core::item::Item;
use crate::capture::core::kinds::ItemKind;
use crate::capture::pipeline::{CaptureOutcome, SummaryStats};

/// Cap on timed entries shown per agenda section.
const MAX_TIMED_SHOWN: usize = 10;

/// Cap on timeless entries shown per agenda section.
const MAX_TIMELESS_SHOWN: usize = 5;

/// `/start` welcome text.
#[must_use]
pub fn welcome() -> String {
    "🤖 **Smart Todolist & Calendar Bot**\n\n\
     Chào mừng! Tôi có thể giúp bạn:\n\n\
     📅 **Events/Lịch hẹn:** \"event thứ 6 thợ lắp đồ\", \"meeting ngày 19/10 lúc 14h\"\n\
     ✅ **Todos:** \"todo dọn nhà 5h\", \"mua sắm ngày mai\"\n\
     💡 **Ideas/Ý tưởng:** \"ghi nhớ mua sữa\", \"ý tưởng cho dự án mới\"\n\n\
     🎯 **Commands:** /idea, /list, /todone [mô tả], /help\n\n\
     🧠 Tôi hiểu thời gian tiếng Việt: thứ 6, ngày 19/10, 5h, mai, v.v."
        .to_string()
}

/// `/help` usage guide.
#[must_use]
pub fn help() -> String {
    "🤖 **Hướng dẫn**\n\n\
     Gõ tự nhiên bằng tiếng Việt, bot tự phân loại:\n\
     • `event thứ 6 thợ lắp đồ` → lịch hẹn thứ 6 tới\n\
     • `todo dọn nhà 5h` → việc cần làm hôm nay lúc 5h\n\
     • `ghi nhớ mua sữa` → ghi chú\n\n\
     ⏰ **Thời gian hỗ trợ:** thứ 2..thứ 7, chủ nhật, ngày 19/10, \
     25/12/2024, 5h, 14h30, 9h sáng, hôm nay, mai, tuần sau\n\
     🔥 **Ưu tiên:** thêm `prio:1` (gấp), `prio:2`, `prio:3` (thảnh thơi)\n\n\
     🎯 **Commands:**\n\
     • `/list` - Xem todolist\n\
     • `/idea` - Xem events & ideas\n\
     • `/todone [mô tả]` - Hoàn thành task\n\
     • `/eventdone [mô tả]` - Xóa event\n\
     • `/ideadone [mô tả]` - Xóa idea"
        .to_string()
}

/// Reply for users outside the allow-list.
#[must_use]
pub fn denied() -> String {
    "❌ Bạn không có quyền sử dụng bot này.".to_string()
}

/// Reply when the user header is missing or malformed.
#[must_use]
pub fn missing_user() -> String {
    "❌ Thiếu định danh người dùng.".to_string()
}

/// Confirmation after a successful capture.
#[must_use]
pub fn capture_confirmation(outcome: &CaptureOutcome) -> String {
    let mut reply = format!(
        "{} **{} đã thêm!**\n\n📝 {}",
        outcome.kind.emoji(),
        outcome.kind.display_name(),
        outcome.text
    );
    if !outcome.time_summary.is_empty() {
        reply.push_str(&format!("\n⏰ {}", outcome.time_summary));
    }
    if let Some(priority) = outcome.priority {
        reply.push_str(&format!("\n📌 Ưu tiên: {priority}"));
    }
    reply.push_str(&format!("\n🆔 ID: {}", outcome.id));
    reply
}

/// Failure reply for a capture that could not be stored.
#[must_use]
pub fn capture_failure() -> String {
    "❌ Không thể thêm, vui lòng thử lại.".to_string()
}

/// Failure reply for a store-backed view or mutation.
#[must_use]
pub fn store_failure() -> String {
    "❌ Có lỗi xảy ra, vui lòng thử lại.".to_string()
}

/// `/list` view: the todo list grouped by time status.
#[must_use]
pub fn todo_list(todos: &[Item]) -> String {
    if todos.is_empty() {
        return "📋 **Todolist trống**\n\nThêm todo bằng cách gửi: 'todo dọn nhà 5h'".to_string();
    }

    let (timed, timeless): (Vec<&Item>, Vec<&Item>) =
        todos.iter().partition(|t| t.time.has_time);

    let mut reply = "📋 **Todolist** (sắp xếp theo thời gian)\n\n".to_string();

    if !timed.is_empty() {
        reply.push_str("⏰ **Có thời gian:**\n");
        for todo in &timed {
            reply.push_str(&todo_line(todo));
        }
        reply.push('\n');
    }

    if !timeless.is_empty() {
        reply.push_str("📝 **Chưa có thời gian:**\n");
        for todo in &timeless {
            reply.push_str(&todo_line(todo));
        }
        reply.push('\n');
    }

    reply.push_str(&format!("📊 Tổng: {} tasks\n", todos.len()));
    reply.push_str("💡 Dùng `/todone [mô tả]` để hoàn thành task");
    reply
}

fn todo_line(todo: &Item) -> String {
    let status = if todo.completed { "☑️" } else { "⬜" };
    let marker = todo.priority_or_default().marker();
    let mut line = format!("{status} {marker}{}", todo.text);
    if !todo.time.display_text.is_empty() {
        line.push_str(&format!(" - ⏰ {}", todo.time.display_text));
    }
    line.push_str(&format!(" (ID: {})\n", todo.id));
    line
}

/// `/idea` view: events and ideas, grouped and capped like the original.
#[must_use]
pub fn agenda(events: &[Item], ideas: &[Item], stats: &SummaryStats) -> String {
    let mut reply = "📋 **Events & Ideas** (sắp xếp theo thời gian)\n\n".to_string();

    if !events.is_empty() {
        let (timed, timeless): (Vec<&Item>, Vec<&Item>) =
            events.iter().partition(|e| e.time.has_time);

        reply.push_str("📅 **Events:**\n");
        if !timed.is_empty() {
            reply.push_str("⏰ *Có thời gian:*\n");
            for event in tail(&timed, MAX_TIMED_SHOWN) {
                reply.push_str(&item_line(event));
            }
        }
        if !timeless.is_empty() {
            if !timed.is_empty() {
                reply.push_str("\n📝 *Chưa có thời gian:*\n");
            }
            for event in tail(&timeless, MAX_TIMELESS_SHOWN) {
                reply.push_str(&item_line(event));
            }
        }
        reply.push('\n');
    }

    if !ideas.is_empty() {
        reply.push_str("💡 **Ideas:**\n");
        for idea in tail(&ideas.iter().collect::<Vec<_>>(), MAX_TIMED_SHOWN) {
            reply.push_str(&item_line(idea));
        }
        reply.push('\n');
    }

    if events.is_empty() && ideas.is_empty() {
        reply.push_str("Chưa có events hoặc ideas nào.\n");
        reply.push_str("Hãy thêm bằng cách gửi tin nhắn như: 'event thứ 6 thợ lắp đồ'\n\n");
    }

    reply.push_str(&format!("📊 {}\n\n", stats_line(stats)));
    reply.push_str("🗑️ **Xóa items:**\n");
    reply.push_str("• `/eventdone [mô tả]` - xóa event\n");
    reply.push_str("• `/ideadone [mô tả]` - xóa idea");
    reply
}

fn item_line(item: &Item) -> String {
    let mut line = format!("• {}", item.text);
    if !item.time.display_text.is_empty() {
        line.push_str(&format!(" - ⏰ {}", item.time.display_text));
    }
    line.push_str(&format!(" (ID: {})\n", item.id));
    line
}

/// Last `n` entries, preserving order.
fn tail<'a>(items: &'a [&'a Item], n: usize) -> &'a [&'a Item] {
    &items[items.len().saturating_sub(n)..]
}

/// Summary statistics line.
#[must_use]
pub fn stats_line(stats: &SummaryStats) -> String {
    let mut parts = vec![
        format!("📅 Events: {}", stats.events),
        format!("✅ Todos: {}/{}", stats.todos_pending, stats.todos_total),
        format!("💡 Ideas: {}", stats.ideas),
    ];
    if stats.upcoming > 0 {
        parts.push(format!("⏰ Upcoming: {}", stats.upcoming));
    }
    parts.join(" | ")
}

/// Confirmation for a completed todo.
#[must_use]
pub fn completed(description: &str) -> String {
    format!("✅ **Task hoàn thành!**\n\n📝 {description}")
}

/// "Not found" reply for `/todone`.
#[must_use]
pub fn todo_not_found(description: &str) -> String {
    format!("❌ Không tìm thấy task: '{description}'\n\nDùng `/list` để xem danh sách todos")
}

/// Confirmation for a deleted item.
#[must_use]
pub fn deleted(kind: ItemKind, description: &str) -> String {
    format!(
        "🗑️ **{} đã xóa!**\n\n{} {description}",
        kind.display_name(),
        kind.emoji()
    )
}

/// "Not found" reply for the delete commands.
#[must_use]
pub fn delete_not_found(kind: ItemKind, description: &str) -> String {
    format!(
        "❌ Không tìm thấy {}: '{description}'\n\nDùng `/idea` để xem danh sách",
        kind.as_str()
    )
}

/// Usage reply when a command is missing its description argument.
#[must_use]
pub fn missing_argument(command: &str, example: &str) -> String {
    format!("❌ Cần mô tả. Ví dụ: `{command} {example}`")
}

/// Reply for an unrecognized slash command.
#[must_use]
pub fn unknown_command(command: &str) -> String {
    format!("❓ Không hiểu lệnh '{command}'. Dùng /help để xem hướng dẫn.")
}
