//! Pagination/filter-sync state controller.
//!
//! A controller owns the observable state of one list view:
//!
//! ```text
//! Idle ──sync──▶ Loading ──▶ Success
//!                   ▲   └──▶ Error
//!                   └── sync (new filters/page) | retry
//! ```
//!
//! Every fetch is tagged with a sequence number. Only the response of the
//! most recently issued fetch is applied; older responses that resolve late
//! are dropped so they cannot overwrite fresher results.
//!
//! Views observe state through [`PaginatedController::subscribe`] or take a
//! point-in-time copy with [`PaginatedController::snapshot`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use super::fetch::{load_page, PageFetcher};
use crate::camara::{CamaraApiError, Freshness, PaginatedResult};

/// Item transform shared by the controller and its fetches.
pub type Transform<T, R> = Arc<dyn Fn(T) -> R + Send + Sync>;

/// Lifecycle of the current fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Observable list state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSnapshot<R> {
    pub status: LoadStatus,
    pub items: Vec<R>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub total_pages: u32,
    pub page: u32,
}

impl<R> Default for ListSnapshot<R> {
    fn default() -> Self {
        Self {
            status: LoadStatus::Idle,
            items: Vec::new(),
            is_loading: false,
            error: None,
            total_pages: 1,
            page: 1,
        }
    }
}

impl<R> ListSnapshot<R> {
    fn begin(&mut self, page: u32) {
        self.status = LoadStatus::Loading;
        self.is_loading = true;
        self.error = None;
        self.items.clear();
        self.page = page;
    }

    fn succeed(&mut self, result: PaginatedResult<R>) {
        self.status = LoadStatus::Success;
        self.items = result.items;
        self.total_pages = result.total_pages;
        self.error = None;
        self.is_loading = false;
    }

    fn fail(&mut self, message: String) {
        self.status = LoadStatus::Error;
        self.items.clear();
        self.error = Some(message);
        self.is_loading = false;
    }
}

/// Turn a fetch error into text for the error panel.
fn error_message(err: &CamaraApiError) -> String {
    let message = err.user_message();
    if message.trim().is_empty() {
        crate::camara::GENERIC_LOAD_ERROR.to_string()
    } else {
        message
    }
}

/// A fetch claimed by [`PaginatedController::request`] and not yet run.
#[must_use = "a claimed fetch does nothing until completed"]
pub struct PendingFetch<F> {
    seq: u64,
    filters: F,
    page: u32,
}

/// Drives fetches for one list view and exposes their state.
pub struct PaginatedController<F, T, R> {
    fetcher: Arc<dyn PageFetcher<F, T>>,
    transform: Transform<T, R>,
    sequence: AtomicU64,
    requested: Mutex<Option<(F, u32)>>,
    state: watch::Sender<ListSnapshot<R>>,
}

impl<F, T, R> PaginatedController<F, T, R>
where
    F: Clone + PartialEq + Send + Sync + 'static,
    T: Send + 'static,
    R: Clone + Send + Sync + 'static,
{
    pub fn new(
        fetcher: Arc<dyn PageFetcher<F, T>>,
        transform: impl Fn(T) -> R + Send + Sync + 'static,
    ) -> Self {
        let (state, _) = watch::channel(ListSnapshot::default());
        Self {
            fetcher,
            transform: Arc::new(transform),
            sequence: AtomicU64::new(0),
            requested: Mutex::new(None),
            state,
        }
    }

    /// Current state.
    pub fn snapshot(&self) -> ListSnapshot<R> {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot<R>> {
        self.state.subscribe()
    }

    /// Revalidation hint of the underlying resource.
    pub fn freshness(&self) -> Freshness {
        self.fetcher.freshness()
    }

    /// Bring the list in line with `(filters, page)`.
    ///
    /// Does nothing and returns `false` when the pair equals the last
    /// requested one. Otherwise fetches, applies the result if no newer
    /// fetch has started meanwhile, and returns `true`.
    pub async fn sync(&self, filters: F, page: u32) -> bool {
        match self.request(filters, page) {
            Some(fetch) => {
                self.complete(fetch).await;
                true
            }
            None => false,
        }
    }

    /// Claim the fetch for `(filters, page)` without running it.
    ///
    /// Enters `Loading` immediately. Returns `None` when the pair equals
    /// the last requested one. Claims are ordered: of several claimed
    /// fetches only the latest can change the state.
    #[must_use]
    pub fn request(&self, filters: F, page: u32) -> Option<PendingFetch<F>> {
        let page = page.max(1);
        let mut requested = self.requested.lock().unwrap_or_else(PoisonError::into_inner);
        if requested
            .as_ref()
            .is_some_and(|(f, p)| *f == filters && *p == page)
        {
            return None;
        }
        *requested = Some((filters.clone(), page));
        let seq = self.begin(page);
        Some(PendingFetch { seq, filters, page })
    }

    /// Run a fetch claimed with [`PaginatedController::request`].
    pub async fn complete(&self, fetch: PendingFetch<F>) {
        self.run(fetch.seq, &fetch.filters, fetch.page).await;
    }

    /// Re-issue the last requested fetch, e.g. from a retry button.
    ///
    /// Returns `false` when nothing was requested yet.
    pub async fn retry(&self) -> bool {
        let (seq, filters, page) = {
            let requested = self.requested.lock().unwrap_or_else(PoisonError::into_inner);
            let Some((filters, page)) = requested.clone() else {
                return false;
            };
            (self.begin(page), filters, page)
        };

        self.run(seq, &filters, page).await;
        true
    }

    /// Enter `Loading` and claim a new sequence number. Callers hold the
    /// `requested` lock so sequence order matches request order.
    fn begin(&self, page: u32) -> u64 {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|snapshot| snapshot.begin(page));
        seq
    }

    async fn run(&self, seq: u64, filters: &F, page: u32) {
        let result = load_page(self.fetcher.as_ref(), self.transform.as_ref(), page, filters).await;

        self.state.send_if_modified(|snapshot| {
            if self.sequence.load(Ordering::SeqCst) != seq {
                tracing::debug!(seq, page, "discarding stale list response");
                return false;
            }
            match result {
                Ok(result) => snapshot.succeed(result),
                Err(err) => {
                    tracing::warn!(page, error = %err, "list fetch failed");
                    snapshot.fail(error_message(&err));
                }
            }
            true
        });
    }
}
