//! Local mirror of the remote student collection and the form draft.

use std::sync::Arc;

use shared::{
    domain::{DraftField, DraftStudent, Student},
    error::{SubmissionFailure, ViewError},
    protocol::StudentPage,
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

use crate::StudentApi;

/// Read-only copy of the controller state handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub items: Vec<Student>,
    pub current_page: u32,
    pub total_pages: u32,
    pub last_error: Option<ViewError>,
    pub draft: DraftStudent,
    pub draft_error: Option<ViewError>,
}

impl ViewSnapshot {
    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// How a page load ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Failed,
    /// A newer load was issued before this one resolved; nothing was changed.
    Stale,
}

struct ViewState {
    items: Vec<Student>,
    current_page: u32,
    total_pages: u32,
    last_error: Option<ViewError>,
    draft: DraftStudent,
    draft_error: Option<ViewError>,
    latest_load_ticket: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            total_pages: 1,
            last_error: None,
            draft: DraftStudent::default(),
            draft_error: None,
            latest_load_ticket: 0,
        }
    }
}

impl ViewState {
    fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            items: self.items.clone(),
            current_page: self.current_page,
            total_pages: self.total_pages,
            last_error: self.last_error.clone(),
            draft: self.draft.clone(),
            draft_error: self.draft_error.clone(),
        }
    }

    /// Returns the last page when `requested` turned out to be past it.
    fn apply_page(&mut self, requested: u32, page: StudentPage) -> Option<u32> {
        self.items = page.students;
        if let Some(total_pages) = page.total_pages {
            self.total_pages = total_pages.max(1);
        }
        self.current_page = requested.min(self.total_pages);
        self.last_error = None;
        if requested > self.total_pages {
            warn!(
                requested,
                total_pages = self.total_pages,
                "students: requested page is past the last page"
            );
            return Some(self.total_pages);
        }
        None
    }
}

pub struct CollectionViewController {
    api: Arc<dyn StudentApi>,
    inner: Mutex<ViewState>,
    events: broadcast::Sender<ViewSnapshot>,
}

impl CollectionViewController {
    pub fn new(api: Arc<dyn StudentApi>) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            api,
            inner: Mutex::new(ViewState::default()),
            events,
        })
    }

    /// Every state change is published here as a fresh snapshot.
    pub fn subscribe(&self) -> broadcast::Receiver<ViewSnapshot> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        self.inner.lock().await.snapshot()
    }

    fn publish(&self, snapshot: ViewSnapshot) {
        // No subscribers is fine.
        let _ = self.events.send(snapshot);
    }

    /// Initial load of the first page.
    pub async fn mount(&self) -> LoadOutcome {
        self.load_page(1).await
    }

    /// Loads `page`. A page past the reported end is followed by a load of
    /// the last page so the rows always belong to `current_page`.
    pub async fn load_page(&self, page: u32) -> LoadOutcome {
        let mut page = page.max(1);
        loop {
            let (outcome, follow_up) = self.load_once(page).await;
            match follow_up {
                // Strictly smaller than `page`, so this terminates.
                Some(last_page) => page = last_page,
                None => return outcome,
            }
        }
    }

    async fn load_once(&self, page: u32) -> (LoadOutcome, Option<u32>) {
        let ticket = {
            let mut guard = self.inner.lock().await;
            guard.latest_load_ticket += 1;
            guard.latest_load_ticket
        };
        debug!(page, ticket, "students: loading page");

        let result = self.api.fetch_page(page).await;

        let mut guard = self.inner.lock().await;
        if guard.latest_load_ticket != ticket {
            debug!(
                page,
                ticket,
                latest = guard.latest_load_ticket,
                "students: discarding stale page response"
            );
            return (LoadOutcome::Stale, None);
        }

        let (outcome, follow_up) = match result {
            Ok(fetched) => {
                let follow_up = guard.apply_page(page, fetched);
                info!(
                    page = guard.current_page,
                    total_pages = guard.total_pages,
                    count = guard.items.len(),
                    "students: page loaded"
                );
                (LoadOutcome::Applied, follow_up)
            }
            Err(err) => {
                error!(page, error = %err, "students: failed to fetch page");
                guard.last_error = Some(ViewError::FetchFailure);
                (LoadOutcome::Failed, None)
            }
        };
        let snapshot = guard.snapshot();
        drop(guard);
        self.publish(snapshot);
        (outcome, follow_up)
    }

    pub async fn update_draft_field(&self, field: DraftField, raw: &str) {
        let mut guard = self.inner.lock().await;
        guard.draft.set_field(field, raw);
        let snapshot = guard.snapshot();
        drop(guard);
        self.publish(snapshot);
    }

    /// Checks that every field is filled in and posts the draft.
    ///
    /// On success the reload of the current page is already running when this
    /// returns; the handle may be awaited or dropped. Failures are also stored
    /// as `draft_error`.
    pub async fn submit_draft(self: &Arc<Self>) -> Result<JoinHandle<LoadOutcome>, ViewError> {
        let draft = {
            let mut guard = self.inner.lock().await;
            let missing = guard.draft.missing_fields();
            if !missing.is_empty() {
                warn!(?missing, "students: draft rejected before submit");
                let err = ViewError::missing_fields(&missing);
                guard.draft_error = Some(err.clone());
                let snapshot = guard.snapshot();
                drop(guard);
                self.publish(snapshot);
                return Err(err);
            }
            guard.draft.clone()
        };

        if let Err(err) = self.api.create_student(&draft).await {
            error!(error = %err, "students: failed to create student");
            let failure = match err.status() {
                Some(status) => SubmissionFailure::Rejected {
                    status: status.as_u16(),
                },
                None => SubmissionFailure::Transport,
            };
            let view_error = ViewError::SubmissionFailure(failure);
            let mut guard = self.inner.lock().await;
            guard.draft_error = Some(view_error.clone());
            let snapshot = guard.snapshot();
            drop(guard);
            self.publish(snapshot);
            return Err(view_error);
        }

        let mut guard = self.inner.lock().await;
        let page = guard.current_page;
        let controller = Arc::clone(self);
        let reload = tokio::spawn(async move { controller.load_page(page).await });
        guard.draft = DraftStudent::default();
        guard.draft_error = None;
        let snapshot = guard.snapshot();
        drop(guard);
        info!(page, "students: student created, reloading page");
        self.publish(snapshot);
        Ok(reload)
    }

    /// Returns `None` without touching state when already on the last page.
    pub async fn go_to_next_page(&self) -> Option<LoadOutcome> {
        let page = {
            let mut guard = self.inner.lock().await;
            if guard.current_page >= guard.total_pages {
                return None;
            }
            guard.current_page += 1;
            let page = guard.current_page;
            let snapshot = guard.snapshot();
            drop(guard);
            self.publish(snapshot);
            page
        };
        Some(self.load_page(page).await)
    }

    /// Returns `None` without touching state when already on the first page.
    pub async fn go_to_previous_page(&self) -> Option<LoadOutcome> {
        let page = {
            let mut guard = self.inner.lock().await;
            if guard.current_page <= 1 {
                return None;
            }
            guard.current_page -= 1;
            let page = guard.current_page;
            let snapshot = guard.snapshot();
            drop(guard);
            self.publish(snapshot);
            page
        };
        Some(self.load_page(page).await)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
