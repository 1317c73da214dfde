//! Paginated question listing under one of three retrieval modes.
//!
//! The controller owns the displayed page and re-issues the right request
//! for the active mode on page changes and after deletes. State is only
//! replaced by a successful response; failures alert the user and leave
//! the previous view in place.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::api::{TransportFailure, TriviaBackend};
use crate::config::ClientConfig;
use crate::domain::{Question, RetrievalMode};
use crate::notify::{messages, Notifier};
use crate::protocol::QuestionsPage;
use crate::util::ceil_div;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingState {
    /// Current page only, in server order.
    pub questions: Vec<Question>,
    pub total_count: u64,
    /// 1-based.
    pub page: u32,
    pub mode: RetrievalMode,
    pub categories: BTreeMap<i64, String>,
    pub current_category: Option<String>,
    /// Last submitted search term; kept when switching to another mode.
    pub search_term: Option<String>,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            questions: Vec::new(),
            total_count: 0,
            page: 1,
            mode: RetrievalMode::All,
            categories: BTreeMap::new(),
            current_category: None,
            search_term: None,
        }
    }
}

/// One pagination control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageControl {
    pub number: u32,
    pub active: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined the confirmation; nothing was sent.
    Declined,
    /// The backend deleted the question. `refreshed` is false when the
    /// follow-up fetch failed and the view still shows the old page.
    Deleted { page: u32, refreshed: bool },
}

/// Number of pages needed for `total_count` items, saturating at `u32::MAX`.
pub fn page_count(total_count: u64, page_size: u32) -> u32 {
    u32::try_from(ceil_div(total_count, u64::from(page_size))).unwrap_or(u32::MAX)
}

/// Page controls `1..=ceil(total / page_size)`, the current one marked active.
/// Lazy, so a huge backend total costs nothing until iterated.
pub fn pagination(total_count: u64, page: u32, page_size: u32) -> impl DoubleEndedIterator<Item = PageControl> {
    (1..=page_count(total_count, page_size)).map(move |number| PageControl { number, active: number == page })
}

/// Provisional page after one question is removed, computed from the
/// pre-delete total. Never below 1.
pub fn adjusted_page(total_count: u64, page: u32, page_size: u32) -> u32 {
    let max_page = page_count(total_count.saturating_sub(1), page_size).max(1);
    page.min(max_page)
}

pub struct ListingController {
    backend: Arc<dyn TriviaBackend>,
    notifier: Arc<dyn Notifier>,
    page_size: u32,
    state: ListingState,
}

impl ListingController {
    pub fn new(backend: Arc<dyn TriviaBackend>, notifier: Arc<dyn Notifier>, config: &ClientConfig) -> Self {
        Self {
            backend,
            notifier,
            page_size: config.listing_page_size,
            state: ListingState::default(),
        }
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn category_name(&self, id: i64) -> Option<&str> {
        self.state.categories.get(&id).map(String::as_str)
    }

    pub async fn load_all(&mut self, page: u32) -> Result<(), TransportFailure> {
        self.load(RetrievalMode::All, page).await
    }

    pub async fn load_by_category(&mut self, category_id: i64, page: u32) -> Result<(), TransportFailure> {
        self.load(RetrievalMode::ByCategory(category_id), page).await
    }

    pub async fn search(&mut self, term: &str, page: u32) -> Result<(), TransportFailure> {
        self.load(RetrievalMode::BySearch(term.to_string()), page).await
    }

    /// Same mode and parameters, page `n`.
    pub async fn select_page(&mut self, n: u32) -> Result<(), TransportFailure> {
        let mode = self.state.mode.clone();
        self.load(mode, n.max(1)).await
    }

    /// Same mode, parameters and page.
    pub async fn refresh(&mut self) -> Result<(), TransportFailure> {
        let mode = self.state.mode.clone();
        let page = self.state.page;
        self.load(mode, page).await
    }

    /// Confirm, delete, then re-fetch the current mode at a page the
    /// remaining data can still fill.
    #[instrument(level = "info", skip(self), fields(page = self.state.page, total = self.state.total_count))]
    pub async fn delete_question(&mut self, id: i64) -> Result<DeleteOutcome, TransportFailure> {
        if !self.notifier.confirm(messages::CONFIRM_DELETE).await {
            debug!(target: "listing", id, "delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        if let Err(e) = self.backend.delete_question(id).await {
            error!(target: "listing", id, error = %e, "delete failed");
            self.notifier.alert(messages::DELETE).await;
            return Err(e);
        }

        // Phase one: local estimate.
        let estimate = adjusted_page(self.state.total_count, self.state.page, self.page_size);
        if estimate != self.state.page {
            info!(target: "listing", id, from = self.state.page, to = estimate, "page adjusted after delete");
        }
        self.state.page = estimate;

        // Phase two: authoritative refresh.
        let refreshed = self.refresh().await.is_ok();
        Ok(DeleteOutcome::Deleted { page: self.state.page, refreshed })
    }

    pub fn render_pagination(&self) -> impl DoubleEndedIterator<Item = PageControl> {
        pagination(self.state.total_count, self.state.page, self.page_size)
    }

    async fn fetch(&self, mode: &RetrievalMode, page: u32) -> Result<QuestionsPage, TransportFailure> {
        match mode {
            RetrievalMode::All => self.backend.list_questions(page).await,
            RetrievalMode::ByCategory(id) => self.backend.list_by_category(*id, page).await,
            RetrievalMode::BySearch(term) => self.backend.search_questions(term, page).await,
        }
    }

    #[instrument(level = "info", skip(self, mode), fields(mode = mode.label()))]
    async fn load(&mut self, mode: RetrievalMode, page: u32) -> Result<(), TransportFailure> {
        match self.fetch(&mode, page).await {
            Ok(result) => {
                self.commit(mode, page, result);
                Ok(())
            }
            Err(e) => {
                error!(target: "listing", mode = mode.label(), page, error = %e, "fetch failed; keeping previous page");
                let message = match mode {
                    RetrievalMode::BySearch(_) => messages::SEARCH,
                    _ => messages::LOAD_QUESTIONS,
                };
                self.notifier.alert(message).await;
                Err(e)
            }
        }
    }

    fn commit(&mut self, mode: RetrievalMode, page: u32, result: QuestionsPage) {
        let QuestionsPage { mut questions, total_questions, categories, current_category } = result;
        if questions.len() > self.page_size as usize {
            warn!(target: "listing", got = questions.len(), page_size = self.page_size, "backend page larger than listing page size; truncating");
            questions.truncate(self.page_size as usize);
        }
        if let RetrievalMode::BySearch(term) = &mode {
            self.state.search_term = Some(term.clone());
        }
        if let Some(categories) = categories {
            self.state.categories = categories;
        }
        debug!(target: "listing", mode = mode.label(), page, total = total_questions, shown = questions.len(), "page committed");
        self.state.questions = questions;
        self.state.total_count = total_questions;
        self.state.current_category = current_category;
        self.state.page = page;
        self.state.mode = mode;
    }
}
