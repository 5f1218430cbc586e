//! Persistence adapters for captured items.

pub mod item_store;

pub use item_store::{sort_for_display, ItemStore, SqliteItemStore, StoreFuture};
