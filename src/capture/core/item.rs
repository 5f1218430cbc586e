//! Captured item model with validation helpers.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capture::core::errors::{CaptureError, CaptureResult};
use crate::capture::core::ids::{ItemId, UserId};
use crate::capture::core::kinds::{ItemKind, Priority};
use crate::capture::core::time::TimeDescriptor;

/// A persisted captured item (event, todo, or idea).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique item identifier.
    pub id: ItemId,
    /// Owning user. Items are never visible across users.
    pub user_id: UserId,
    /// Item category.
    pub kind: ItemKind,
    /// Description with time/priority substrings stripped.
    pub text: String,
    /// Resolved temporal information.
    pub time: TimeDescriptor,
    /// Priority (todos only).
    pub priority: Option<Priority>,
    /// Completion flag (todos only). Set once, never cleared.
    pub completed: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Completion timestamp, set together with `completed`.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Create a new item ready for insertion.
    ///
    /// # Errors
    /// Returns an error if the text is empty after trimming, or if a
    /// priority is supplied for a kind that carries none.
    pub fn new(
        user_id: UserId,
        kind: ItemKind,
        text: impl Into<String>,
        time: TimeDescriptor,
        priority: Option<Priority>,
    ) -> CaptureResult<Self> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CaptureError::InvalidItem("text is empty".to_string()));
        }
        if priority.is_some() && !kind.has_priority() {
            return Err(CaptureError::InvalidItem(format!(
                "{kind} items carry no priority"
            )));
        }

        Ok(Self {
            id: ItemId::new(),
            user_id,
            kind,
            text: trimmed.to_string(),
            time,
            priority,
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        })
    }

    /// The resolved instant this item is anchored to, if any.
    #[must_use]
    pub fn scheduled_at(&self) -> Option<NaiveDateTime> {
        self.time.datetime
    }

    /// Effective priority for sorting; kinds without priority sort as
    /// normal.
    #[must_use]
    pub fn priority_or_default(&self) -> Priority {
        self.priority.unwrap_or_default()
    }

    /// Validate the item's cross-field invariants.
    ///
    /// # Errors
    /// Returns an error if any invariant is violated.
    pub fn validate(&self) -> CaptureResult<()> {
        if self.text.trim().is_empty() {
            return Err(CaptureError::InvalidItem("text is empty".to_string()));
        }
        if self.priority.is_some() && !self.kind.has_priority() {
            return Err(CaptureError::InvalidItem(format!(
                "{} items carry no priority",
                self.kind
            )));
        }
        if self.completed && !self.kind.is_completable() {
            return Err(CaptureError::InvalidItem(format!(
                "{} items cannot be completed",
                self.kind
            )));
        }
        if self.completed != self.completed_at.is_some() {
            return Err(CaptureError::InvalidItem(
                "completed flag and completed_at must be set together".to_string(),
            ));
        }
        if self.time.has_time != self.time.datetime.is_some() {
            return Err(CaptureError::InvalidItem(
                "has_time and datetime must agree".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId::new("42").unwrap()
    }

    #[test]
    fn test_new_trims_and_validates() {
        let item = Item::new(
            user(),
            ItemKind::Todo,
            "  dọn nhà  ",
            TimeDescriptor::none("dọn nhà"),
            Some(Priority::Urgent),
        )
        .unwrap();
        assert_eq!(item.text, "dọn nhà");
        assert!(item.validate().is_ok());
    }

    #[test]
    fn test_empty_text_rejected() {
        let err = Item::new(user(), ItemKind::Idea, "   ", TimeDescriptor::none(""), None);
        assert!(err.is_err());
    }

    #[test]
    fn test_priority_only_on_todos() {
        let err = Item::new(
            user(),
            ItemKind::Event,
            "họp nhóm",
            TimeDescriptor::none("họp nhóm"),
            Some(Priority::Normal),
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_completed_requires_timestamp() {
        let mut item = Item::new(
            user(),
            ItemKind::Todo,
            "mua sữa",
            TimeDescriptor::none("mua sữa"),
            None,
        )
        .unwrap();
        item.completed = true;
        assert!(item.validate().is_err());
        item.completed_at = Some(Utc::now());
        assert!(item.validate().is_ok());
    }
}
