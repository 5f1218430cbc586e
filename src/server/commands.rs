//! Command parsing for the chat surface.
//!
//! Slash commands mirror the bot's original surface; anything else is a
//! free-text capture message.

/// A parsed chat input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `/start` — welcome message.
    Start,
    /// `/help` — usage guide.
    Help,
    /// `/list` — todo list view.
    ListTodos,
    /// `/idea` — events & ideas view.
    ListAgenda,
    /// `/todone <desc>` — complete a todo by description.
    CompleteTodo(String),
    /// `/eventdone <desc>` — delete an event by description.
    DeleteEvent(String),
    /// `/ideadone <desc>` — delete an idea by description.
    DeleteIdea(String),
    /// Free-text capture.
    Capture(String),
    /// Unrecognized slash command.
    Unknown(String),
}

/// Parse one incoming message.
#[must_use]
pub fn parse_command(text: &str) -> Command {
    let trimmed = text.trim();
    if !trimmed.starts_with('/') {
        return Command::Capture(trimmed.to_string());
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let head = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim().to_string();

    // Transports may suffix the bot handle ("/list@vietodo_bot").
    let name = head.split('@').next().unwrap_or(head);

    match name {
        "/start" => Command::Start,
        "/help" => Command::Help,
        "/list" => Command::ListTodos,
        "/idea" => Command::ListAgenda,
        "/todone" => Command::CompleteTodo(args),
        "/eventdone" => Command::DeleteEvent(args),
        "/ideadone" => Command::DeleteIdea(args),
        other => Command::Unknown(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_capture() {
        assert_eq!(
            parse_command("todo dọn nhà 5h"),
            Command::Capture("todo dọn nhà 5h".to_string())
        );
    }

    #[test]
    fn test_known_commands() {
        assert_eq!(parse_command("/start"), Command::Start);
        assert_eq!(parse_command("/help"), Command::Help);
        assert_eq!(parse_command("/list"), Command::ListTodos);
        assert_eq!(parse_command("/idea"), Command::ListAgenda);
    }

    #[test]
    fn test_commands_with_arguments() {
        assert_eq!(
            parse_command("/todone dọn nhà"),
            Command::CompleteTodo("dọn nhà".to_string())
        );
        assert_eq!(
            parse_command("/eventdone thợ lắp đồ"),
            Command::DeleteEvent("thợ lắp đồ".to_string())
        );
        assert_eq!(
            parse_command("/ideadone mua sữa"),
            Command::DeleteIdea("mua sữa".to_string())
        );
    }

    #[test]
    fn test_missing_argument_is_empty() {
        assert_eq!(parse_command("/todone"), Command::CompleteTodo(String::new()));
        assert_eq!(parse_command("/todone   "), Command::CompleteTodo(String::new()));
    }

    #[test]
    fn test_bot_handle_suffix_is_ignored() {
        assert_eq!(parse_command("/list@vietodo_bot"), Command::ListTodos);
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse_command("/frobnicate now"),
            Command::Unknown("/frobnicate".to_string())
        );
    }
}
