//! Item persistence: trait and `SQLite` implementation.

use std::cmp::Ordering;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use tokio_rusqlite::Connection;

use crate::capture::core::config::StorageConfig;
use crate::capture::core::errors::{CaptureError, CaptureResult};
use crate::capture::core::ids::{ItemId, UserId};
use crate::capture::core::item::Item;
use crate::capture::core::kinds::{ItemKind, Priority};
use crate::capture::core::time::TimeDescriptor;

/// Boxed future type for item store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Item store trait.
///
/// All operations are scoped by the ids they receive; listing never
/// crosses users, and the UUID item ids make the mutating calls
/// unambiguous on their own.
pub trait ItemStore: Send + Sync {
    /// Insert a new item and return it as persisted.
    ///
    /// The insert is atomic: it either fully succeeds and returns the
    /// created item, or fails and nothing is persisted.
    ///
    /// # Errors
    /// Returns an error if validation or storage access fails.
    fn insert(
        &self,
        user_id: UserId,
        kind: ItemKind,
        text: String,
        time: TimeDescriptor,
        priority: Option<Priority>,
    ) -> StoreFuture<'_, CaptureResult<Item>>;

    /// List a user's items of one kind, sorted for display.
    ///
    /// Todos: priority rank, then resolved datetime ascending, timeless
    /// last within each bucket. Events: datetime ascending, timeless
    /// last. Ideas: newest first.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn list(
        &self,
        user_id: UserId,
        kind: ItemKind,
        include_completed: bool,
    ) -> StoreFuture<'_, CaptureResult<Vec<Item>>>;

    /// Mark a todo completed. Returns `false` when the item does not
    /// exist or was already completed; completion is monotonic.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn mark_completed(&self, item_id: ItemId) -> StoreFuture<'_, CaptureResult<bool>>;

    /// Delete an item. Returns `false` when nothing was deleted.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn delete(&self, item_id: ItemId) -> StoreFuture<'_, CaptureResult<bool>>;
}

/// Sort items in place the way their kind's list view expects.
pub fn sort_for_display(kind: ItemKind, items: &mut [Item]) {
    match kind {
        ItemKind::Todo => items.sort_by(|a, b| {
            a.priority_or_default()
                .rank()
                .cmp(&b.priority_or_default().rank())
                .then_with(|| cmp_scheduled(a, b))
                .then_with(|| a.created_at.cmp(&b.created_at))
        }),
        ItemKind::Event => {
            items.sort_by(|a, b| cmp_scheduled(a, b).then_with(|| a.created_at.cmp(&b.created_at)));
        }
        ItemKind::Idea => items.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

/// Timeless items sort after timed ones.
fn cmp_scheduled(a: &Item, b: &Item) -> Ordering {
    match (a.scheduled_at(), b.scheduled_at()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Raw row shape moved out of the connection actor.
type ItemRow = (
    ItemId,
    UserId,
    String,
    String,
    bool,
    Option<String>,
    String,
    Option<String>,
    bool,
    i64,
    Option<i64>,
);

/// `SQLite` implementation of the item store.
pub struct SqliteItemStore {
    conn: Connection,
    table: String,
}

impl SqliteItemStore {
    /// Initialize the item store and its schema.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub async fn new(config: &StorageConfig) -> CaptureResult<Self> {
        let conn = Connection::open(&config.sqlite_path).await?;
        let table = config.items_table.clone();
        let table_name = table.clone();

        conn.call(move |conn| {
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {table_name} (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    text TEXT NOT NULL,
                    has_time INTEGER NOT NULL DEFAULT 0,
                    scheduled_at TEXT,
                    display_text TEXT NOT NULL DEFAULT '',
                    priority TEXT,
                    completed INTEGER NOT NULL DEFAULT 0,
                    created_at INTEGER NOT NULL,
                    completed_at INTEGER
                );
                CREATE INDEX IF NOT EXISTS idx_{table_name}_user_kind
                    ON {table_name} (user_id, kind)"
            ))?;
            Ok(())
        })
        .await?;

        Ok(Self { conn, table })
    }
}

impl ItemStore for SqliteItemStore {
    fn insert(
        &self,
        user_id: UserId,
        kind: ItemKind,
        text: String,
        time: TimeDescriptor,
        priority: Option<Priority>,
    ) -> StoreFuture<'_, CaptureResult<Item>> {
        Box::pin(async move {
            let item = Item::new(user_id, kind, text, time, priority)?;
            item.validate()?;

            let table = self.table.clone();
            let row = item.clone();
            self.conn
                .call(move |conn| {
                    conn.execute(
                        &format!(
                            "INSERT INTO {table}
                             (id, user_id, kind, text, has_time, scheduled_at, display_text,
                              priority, completed, created_at, completed_at)
                             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
                        ),
                        rusqlite::params![
                            row.id,
                            row.user_id,
                            row.kind.as_str(),
                            row.text,
                            row.time.has_time,
                            row.time.wire_datetime(),
                            row.time.display_text,
                            row.priority.map(Priority::as_str),
                            row.completed,
                            row.created_at.timestamp_millis(),
                            row.completed_at.map(|t| t.timestamp_millis()),
                        ],
                    )?;
                    Ok(())
                })
                .await?;

            Ok(item)
        })
    }

    fn list(
        &self,
        user_id: UserId,
        kind: ItemKind,
        include_completed: bool,
    ) -> StoreFuture<'_, CaptureResult<Vec<Item>>> {
        Box::pin(async move {
            let table = self.table.clone();
            let user = user_id.clone();
            let rows: Vec<ItemRow> = self
                .conn
                .call(move |conn| {
                    let filter = if include_completed {
                        ""
                    } else {
                        " AND completed = 0"
                    };
                    let mut stmt = conn.prepare(&format!(
                        "SELECT id, user_id, kind, text, has_time, scheduled_at, display_text,
                                priority, completed, created_at, completed_at
                         FROM {table}
                         WHERE user_id = ?1 AND kind = ?2{filter}
                         ORDER BY created_at ASC"
                    ))?;
                    let rows = stmt
                        .query_map(rusqlite::params![user, kind.as_str()], |row| {
                            Ok((
                                row.get(0)?,
                                row.get(1)?,
                                row.get(2)?,
                                row.get(3)?,
                                row.get(4)?,
                                row.get(5)?,
                                row.get(6)?,
                                row.get(7)?,
                                row.get(8)?,
                                row.get(9)?,
                                row.get(10)?,
                            ))
                        })?
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(rows)
                })
                .await?;

            let mut items = rows
                .into_iter()
                .map(item_from_row)
                .collect::<CaptureResult<Vec<_>>>()?;
            sort_for_display(kind, &mut items);
            Ok(items)
        })
    }

    fn mark_completed(&self, item_id: ItemId) -> StoreFuture<'_, CaptureResult<bool>> {
        Box::pin(async move {
            let table = self.table.clone();
            let completed_at = Utc::now().timestamp_millis();
            let changed = self
                .conn
                .call(move |conn| {
                    let changed = conn.execute(
                        &format!(
                            "UPDATE {table}
                             SET completed = 1, completed_at = ?2
                             WHERE id = ?1 AND completed = 0"
                        ),
                        rusqlite::params![item_id, completed_at],
                    )?;
                    Ok(changed)
                })
                .await?;

            Ok(changed > 0)
        })
    }

    fn delete(&self, item_id: ItemId) -> StoreFuture<'_, CaptureResult<bool>> {
        Box::pin(async move {
            let table = self.table.clone();
            let changed = self
                .conn
                .call(move |conn| {
                    let changed = conn.execute(
                        &format!("DELETE FROM {table} WHERE id = ?1"),
                        rusqlite::params![item_id],
                    )?;
                    Ok(changed)
                })
                .await?;

            Ok(changed > 0)
        })
    }
}

fn item_from_row(row: ItemRow) -> CaptureResult<Item> {
    let (
        id,
        user_id,
        kind,
        text,
        has_time,
        scheduled_at,
        display_text,
        priority,
        completed,
        created_at_ms,
        completed_at_ms,
    ) = row;

    let kind = ItemKind::from_str(&kind)
        .map_err(|err| CaptureError::InvalidItem(format!("stored kind: {err}")))?;
    let priority = priority
        .map(|p| Priority::from_str(&p))
        .transpose()
        .map_err(|err| CaptureError::InvalidItem(format!("stored priority: {err}")))?;

    let datetime = scheduled_at
        .as_deref()
        .map(|raw| {
            crate::capture::core::time::parse_wire_datetime(raw)
                .ok_or_else(|| CaptureError::InvalidItem(format!("stored datetime: {raw:?}")))
        })
        .transpose()?;

    let time = TimeDescriptor {
        has_time: has_time && datetime.is_some(),
        datetime,
        display_text,
        residual_text: String::new(),
    }
    .normalized();

    Ok(Item {
        id,
        user_id,
        kind,
        text,
        time,
        priority,
        completed,
        created_at: millis_to_utc(created_at_ms)?,
        completed_at: completed_at_ms.map(millis_to_utc).transpose()?,
    })
}

fn millis_to_utc(millis: i64) -> CaptureResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| CaptureError::InvalidItem("invalid stored timestamp".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::core::time::at_time;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    async fn store() -> SqliteItemStore {
        let config = StorageConfig {
            sqlite_path: PathBuf::from(":memory:"),
            ..StorageConfig::default()
        };
        SqliteItemStore::new(&config).await.unwrap()
    }

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn timed(y: i32, m: u32, d: u32, h: u32) -> TimeDescriptor {
        let dt = at_time(NaiveDate::from_ymd_opt(y, m, d).unwrap(), h, 0).unwrap();
        TimeDescriptor::at(dt, true, "")
    }

    #[tokio::test]
    async fn test_insert_roundtrip() {
        let store = store().await;
        let item = store
            .insert(
                user("1"),
                ItemKind::Todo,
                "dọn nhà".to_string(),
                timed(2025, 8, 8, 20),
                Some(Priority::Urgent),
            )
            .await
            .unwrap();

        let listed = store.list(user("1"), ItemKind::Todo, false).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, item.id);
        assert_eq!(listed[0].text, "dọn nhà");
        assert_eq!(listed[0].priority, Some(Priority::Urgent));
        assert_eq!(
            listed[0].time.wire_datetime().as_deref(),
            Some("2025-08-08 20:00")
        );
    }

    #[tokio::test]
    async fn test_todo_sort_priority_then_time_timeless_last() {
        let store = store().await;
        let u = user("1");

        store
            .insert(
                u.clone(),
                ItemKind::Todo,
                "chill sớm".to_string(),
                timed(2025, 8, 8, 8),
                Some(Priority::Chill),
            )
            .await
            .unwrap();
        store
            .insert(
                u.clone(),
                ItemKind::Todo,
                "urgent không giờ".to_string(),
                TimeDescriptor::none(""),
                Some(Priority::Urgent),
            )
            .await
            .unwrap();
        store
            .insert(
                u.clone(),
                ItemKind::Todo,
                "urgent có giờ".to_string(),
                timed(2025, 8, 9, 9),
                Some(Priority::Urgent),
            )
            .await
            .unwrap();
        store
            .insert(
                u.clone(),
                ItemKind::Todo,
                "normal".to_string(),
                TimeDescriptor::none(""),
                None,
            )
            .await
            .unwrap();

        let listed = store.list(u, ItemKind::Todo, false).await.unwrap();
        let texts: Vec<&str> = listed.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["urgent có giờ", "urgent không giờ", "normal", "chill sớm"]
        );
    }

    #[tokio::test]
    async fn test_event_sort_timeless_last() {
        let store = store().await;
        let u = user("1");

        store
            .insert(
                u.clone(),
                ItemKind::Event,
                "không giờ".to_string(),
                TimeDescriptor::none(""),
                None,
            )
            .await
            .unwrap();
        store
            .insert(
                u.clone(),
                ItemKind::Event,
                "muộn".to_string(),
                timed(2025, 9, 1, 9),
                None,
            )
            .await
            .unwrap();
        store
            .insert(
                u.clone(),
                ItemKind::Event,
                "sớm".to_string(),
                timed(2025, 8, 8, 9),
                None,
            )
            .await
            .unwrap();

        let listed = store.list(u, ItemKind::Event, false).await.unwrap();
        let texts: Vec<&str> = listed.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["sớm", "muộn", "không giờ"]);
    }

    #[tokio::test]
    async fn test_completion_is_monotonic() {
        let store = store().await;
        let item = store
            .insert(
                user("1"),
                ItemKind::Todo,
                "mua sữa".to_string(),
                TimeDescriptor::none(""),
                None,
            )
            .await
            .unwrap();

        assert!(store.mark_completed(item.id).await.unwrap());
        // A second completion is a no-op, not an un-complete.
        assert!(!store.mark_completed(item.id).await.unwrap());

        let open = store.list(user("1"), ItemKind::Todo, false).await.unwrap();
        assert!(open.is_empty());
        let all = store.list(user("1"), ItemKind::Todo, true).await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].completed);
        assert!(all[0].completed_at.is_some());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = store().await;
        let item = store
            .insert(
                user("1"),
                ItemKind::Idea,
                "ý tưởng".to_string(),
                TimeDescriptor::none(""),
                None,
            )
            .await
            .unwrap();

        assert!(store.delete(item.id).await.unwrap());
        assert!(!store.delete(item.id).await.unwrap());
        let listed = store.list(user("1"), ItemKind::Idea, true).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_listing_is_scoped_to_user() {
        let store = store().await;
        store
            .insert(
                user("1"),
                ItemKind::Idea,
                "của người 1".to_string(),
                TimeDescriptor::none(""),
                None,
            )
            .await
            .unwrap();

        let other = store.list(user("2"), ItemKind::Idea, true).await.unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn test_empty_text_insert_fails_and_persists_nothing() {
        let store = store().await;
        let result = store
            .insert(
                user("1"),
                ItemKind::Todo,
                "   ".to_string(),
                TimeDescriptor::none(""),
                None,
            )
            .await;
        assert!(result.is_err());
        let listed = store.list(user("1"), ItemKind::Todo, true).await.unwrap();
        assert!(listed.is_empty());
    }
}
