//! Item kinds and priority levels.
//!
//! [`ItemKind`] is the closed category a captured message lands in; it
//! drives which table view the item appears in, how it is sorted, and how
//! the front-end renders it. [`Priority`] orders todos inside a list view.
//!
//! Both enums use stable `snake_case` identifiers for storage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The category of a captured item.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A time-anchored appointment.
    Event,
    /// An actionable task with an optional priority.
    Todo,
    /// A free note. The permissive default: most free text is better
    /// treated as a note than mis-filed as an action item.
    #[default]
    Idea,
}

/// Parse error for [`ItemKind`].
#[derive(Debug, Clone)]
pub struct ItemKindParseError {
    value: String,
}

impl ItemKindParseError {
    /// The raw value that failed parsing.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ItemKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid item kind: {}", self.value)
    }
}

impl std::error::Error for ItemKindParseError {}

impl ItemKind {
    /// All known kinds.
    pub const ALL: &'static [Self] = &[Self::Event, Self::Todo, Self::Idea];

    /// Stable storage identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Todo => "todo",
            Self::Idea => "idea",
        }
    }

    /// Small stable numeric code for compact storage and indexing.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Event => 1,
            Self::Todo => 2,
            Self::Idea => 3,
        }
    }

    /// Convert a stored numeric code back into an [`ItemKind`].
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Event),
            2 => Some(Self::Todo),
            3 => Some(Self::Idea),
            _ => None,
        }
    }

    /// Emoji used by the chat front-end when rendering this kind.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Event => "📅",
            Self::Todo => "✅",
            Self::Idea => "💡",
        }
    }

    /// Capitalized display name used in confirmations ("Event đã thêm!").
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Event => "Event",
            Self::Todo => "Todo",
            Self::Idea => "Idea",
        }
    }

    /// True if items of this kind carry a completion flag.
    #[must_use]
    pub const fn is_completable(self) -> bool {
        matches!(self, Self::Todo)
    }

    /// True if items of this kind carry a priority.
    #[must_use]
    pub const fn has_priority(self) -> bool {
        matches!(self, Self::Todo)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = ItemKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.eq_ignore_ascii_case("event") {
            return Ok(Self::Event);
        }
        if raw.eq_ignore_ascii_case("todo") || raw.eq_ignore_ascii_case("task") {
            return Ok(Self::Todo);
        }
        if raw.eq_ignore_ascii_case("idea") || raw.eq_ignore_ascii_case("note") {
            return Ok(Self::Idea);
        }
        Err(ItemKindParseError {
            value: raw.to_string(),
        })
    }
}

/// Priority level of a todo.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Needs attention now.
    Urgent,
    /// No special urgency.
    #[default]
    Normal,
    /// Whenever there is time.
    Chill,
}

impl Priority {
    /// All levels, in sort order.
    pub const ALL: &'static [Self] = &[Self::Urgent, Self::Normal, Self::Chill];

    /// Stable storage identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::Normal => "normal",
            Self::Chill => "chill",
        }
    }

    /// Sort rank: urgent sorts before normal sorts before chill.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Urgent => 0,
            Self::Normal => 1,
            Self::Chill => 2,
        }
    }

    /// Numeric tag value accepted by the `prio:N` syntax.
    #[must_use]
    pub const fn from_tag_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(Self::Urgent),
            2 => Some(Self::Normal),
            3 => Some(Self::Chill),
            _ => None,
        }
    }

    /// Marker shown next to urgent todos in list views.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Urgent => "🔥 ",
            Self::Normal | Self::Chill => "",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse error for [`Priority`].
#[derive(Debug, Clone)]
pub struct PriorityParseError {
    value: String,
}

impl PriorityParseError {
    /// The raw value that failed parsing.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for PriorityParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid priority: {}", self.value)
    }
}

impl std::error::Error for PriorityParseError {}

impl FromStr for Priority {
    type Err = PriorityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.eq_ignore_ascii_case("urgent") {
            return Ok(Self::Urgent);
        }
        if raw.eq_ignore_ascii_case("normal") {
            return Ok(Self::Normal);
        }
        if raw.eq_ignore_ascii_case("chill") {
            return Ok(Self::Chill);
        }
        Err(PriorityParseError {
            value: raw.to_string(),
        })
    }
}
