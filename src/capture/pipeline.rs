//! Capture pipeline orchestration.
//!
//! One engine instance owns the injected collaborators (item store,
//! optional completion client) and runs each message through
//! classify → parse-time → parse-priority → normalize → persist. The
//! deterministic layers are authoritative; the LLM is best-effort
//! enrichment and every failure of it is recovered locally.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, NaiveDateTime};
use tracing::{debug, info};

use crate::capture::core::config::AgentConfig;
use crate::capture::core::errors::{CaptureError, CaptureResult};
use crate::capture::core::ids::{ItemId, UserId};
use crate::capture::core::item::Item;
use crate::capture::core::kinds::{ItemKind, Priority};
use crate::capture::parse::classify;
use crate::capture::parse::normalize::TextNormalizer;
use crate::capture::parse::priority::PriorityExtractor;
use crate::capture::parse::temporal::TemporalParser;
use crate::capture::parse::temporal_llm::LlmTimeParser;
use crate::capture::resolve::fuzzy::best_match;
use crate::capture::store::item_store::ItemStore;
use crate::llm::Completion;

/// Days ahead considered "upcoming" in the summary view.
const UPCOMING_WINDOW_DAYS: u64 = 7;

/// Result of capturing one message.
#[derive(Clone, Debug)]
pub struct CaptureOutcome {
    /// Identifier of the stored item.
    pub id: ItemId,
    /// Resolved item kind.
    pub kind: ItemKind,
    /// Stored description (time/priority substrings stripped).
    pub text: String,
    /// Localized time rendering, empty when no time was recognized.
    pub time_summary: String,
    /// Priority assigned to the item (todos only).
    pub priority: Option<Priority>,
}

/// Per-user item counts for the summary line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SummaryStats {
    /// Number of events.
    pub events: usize,
    /// Total number of todos, completed included.
    pub todos_total: usize,
    /// Number of open todos.
    pub todos_pending: usize,
    /// Number of ideas.
    pub ideas: usize,
    /// Timed items falling within the upcoming window.
    pub upcoming: usize,
}

/// Capture engine with injected collaborators.
pub struct CaptureEngine {
    config: AgentConfig,
    store: Arc<dyn ItemStore>,
    llm: Option<Arc<dyn Completion>>,
    temporal: TemporalParser,
    priority: PriorityExtractor,
    normalizer: TextNormalizer,
}

impl CaptureEngine {
    /// Create a new engine.
    ///
    /// # Errors
    /// Returns an error if the configuration or the compiled rule set is
    /// invalid.
    pub fn new(
        config: AgentConfig,
        store: Arc<dyn ItemStore>,
        llm: Option<Arc<dyn Completion>>,
    ) -> CaptureResult<Self> {
        config.validate()?;
        let temporal = TemporalParser::new()
            .map_err(|err| CaptureError::InvalidConfig(err.to_string()))?;
        let priority = PriorityExtractor::new()
            .map_err(|err| CaptureError::InvalidConfig(err.to_string()))?;
        let normalizer = TextNormalizer::new()
            .map_err(|err| CaptureError::InvalidConfig(err.to_string()))?;

        Ok(Self {
            config,
            store,
            llm,
            temporal,
            priority,
            normalizer,
        })
    }

    /// Capture one free-text message for a user.
    ///
    /// `reference_now` anchors every relative time expression; inject the
    /// local clock at the call site.
    ///
    /// # Errors
    /// Returns an error when the message is empty, nothing remains after
    /// stripping, or the store fails.
    pub async fn process_message(
        &self,
        user_id: UserId,
        raw_text: &str,
        reference_now: NaiveDateTime,
    ) -> CaptureResult<CaptureOutcome> {
        let raw = raw_text.trim();
        if raw.is_empty() {
            return Err(CaptureError::InvalidItem("message is empty".to_string()));
        }

        let llm = self.llm.as_deref();
        let llm_timeout = Duration::from_secs(self.config.llm.timeout_secs);

        let kind = classify::classify(llm, llm_timeout, raw).await;

        let mut time = self.temporal.parse(raw, reference_now);
        if !time.has_time {
            if let Some(llm) = llm {
                match LlmTimeParser::new(llm, llm_timeout)
                    .parse(raw, reference_now)
                    .await
                {
                    Ok(enriched) => time = enriched,
                    Err(err) => debug!("time enrichment failed: {err}"),
                }
            }
        }

        let priority = if kind.has_priority() {
            Some(self.priority.parse(llm, llm_timeout, raw).await)
        } else {
            None
        };

        let text = self.normalizer.strip(raw, &time, kind.has_priority());
        if text.is_empty() {
            return Err(CaptureError::InvalidItem(
                "nothing left to store after stripping".to_string(),
            ));
        }

        let time_summary = time.display_text.clone();
        let item = self
            .bounded(self.store.insert(user_id.clone(), kind, text, time, priority))
            .await?;

        info!(
            user = %user_id,
            kind = %item.kind,
            id = %item.id,
            "captured item"
        );

        Ok(CaptureOutcome {
            id: item.id,
            kind: item.kind,
            text: item.text,
            time_summary,
            priority: item.priority,
        })
    }

    /// Complete the open todo best matching `search_text`.
    ///
    /// Returns `false` when no candidate clears the similarity threshold
    /// ("not found"), which is distinct from a store failure.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub async fn resolve_and_complete(
        &self,
        user_id: UserId,
        search_text: &str,
    ) -> CaptureResult<bool> {
        let todos = self
            .bounded(self.store.list(user_id, ItemKind::Todo, false))
            .await?;

        let target = best_match(
            search_text,
            todos.iter().map(|item| (item.id, item.text.as_str())),
            self.config.matcher.min_similarity,
        );

        match target {
            Some(id) => self.bounded(self.store.mark_completed(id)).await,
            None => Ok(false),
        }
    }

    /// Delete the item of `kind` best matching `search_text`.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub async fn resolve_and_delete(
        &self,
        user_id: UserId,
        kind: ItemKind,
        search_text: &str,
    ) -> CaptureResult<bool> {
        let items = self.bounded(self.store.list(user_id, kind, true)).await?;

        let target = best_match(
            search_text,
            items.iter().map(|item| (item.id, item.text.as_str())),
            self.config.matcher.min_similarity,
        );

        match target {
            Some(id) => self.bounded(self.store.delete(id)).await,
            None => Ok(false),
        }
    }

    /// List a user's items of one kind, display-sorted.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub async fn list_items(
        &self,
        user_id: UserId,
        kind: ItemKind,
        include_completed: bool,
    ) -> CaptureResult<Vec<Item>> {
        self.bounded(self.store.list(user_id, kind, include_completed))
            .await
    }

    /// Per-user counts for the summary line, including items whose
    /// resolved time falls within the next seven days.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub async fn summary_stats(
        &self,
        user_id: UserId,
        reference_now: NaiveDateTime,
    ) -> CaptureResult<SummaryStats> {
        let events = self
            .bounded(self.store.list(user_id.clone(), ItemKind::Event, true))
            .await?;
        let todos = self
            .bounded(self.store.list(user_id.clone(), ItemKind::Todo, true))
            .await?;
        let ideas = self
            .bounded(self.store.list(user_id, ItemKind::Idea, true))
            .await?;

        let horizon = reference_now
            .checked_add_days(Days::new(UPCOMING_WINDOW_DAYS))
            .unwrap_or(reference_now);
        let upcoming = events
            .iter()
            .chain(&todos)
            .chain(&ideas)
            .filter_map(Item::scheduled_at)
            .filter(|at| *at >= reference_now && *at <= horizon)
            .count();

        Ok(SummaryStats {
            events: events.len(),
            todos_total: todos.len(),
            todos_pending: todos.iter().filter(|t| !t.completed).count(),
            ideas: ideas.len(),
            upcoming,
        })
    }

    async fn bounded<T>(
        &self,
        operation: impl Future<Output = CaptureResult<T>> + Send,
    ) -> CaptureResult<T> {
        let secs = self.config.storage.timeout_secs;
        match tokio::time::timeout(Duration::from_secs(secs), operation).await {
            Ok(result) => result,
            Err(_) => Err(CaptureError::StoreTimeout(secs)),
        }
    }
}
