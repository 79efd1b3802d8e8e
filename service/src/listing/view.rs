//! A list view: URL state plus its controller.
//!
//! The view owns the current [`ViewState`] and pushes every change through
//! the controller, which only refetches when `(filters, page)` actually
//! changed. A filter change always lands on page 1 with a single fetch.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use super::controller::{ListSnapshot, PaginatedController};
use super::debounce::Debouncer;
use super::view_state::ViewState;
use crate::camara::ListFilters;

pub struct ListView<F, T, R> {
    controller: Arc<PaginatedController<F, T, R>>,
    state: Mutex<ViewState<F>>,
}

impl<F, T, R> ListView<F, T, R>
where
    F: ListFilters,
    T: Send + 'static,
    R: Clone + Send + Sync + 'static,
{
    /// Start from a query string such as `q=saude&tipo=PL&page=2`.
    pub fn from_query(controller: Arc<PaginatedController<F, T, R>>, query: &str) -> Self {
        Self {
            controller,
            state: Mutex::new(ViewState::from_query(query)),
        }
    }

    pub fn controller(&self) -> &Arc<PaginatedController<F, T, R>> {
        &self.controller
    }

    pub fn state(&self) -> ViewState<F> {
        self.lock().clone()
    }

    /// Canonical query string of the current state.
    pub fn query(&self) -> String {
        self.lock().to_query()
    }

    pub fn snapshot(&self) -> ListSnapshot<R> {
        self.controller.snapshot()
    }

    /// Fetch whatever the current state points at.
    pub async fn load(&self) -> bool {
        self.apply(ViewState::clone).await
    }

    /// Replace the filters. Changed filters reset the page to 1.
    pub async fn set_filters(&self, filters: F) -> bool {
        self.apply(|state| state.with_filters(filters)).await
    }

    /// Navigate to `page`, keeping the filters.
    pub async fn set_page(&self, page: u32) -> bool {
        self.apply(|state| state.with_page(page)).await
    }

    /// Commit a search term as the view's free-text filter.
    pub async fn submit_search(&self, term: &str) -> bool {
        self.apply(|state| state.with_filters(state.filters.with_search_term(term))).await
    }

    /// Re-run the last fetch after an error.
    pub async fn retry(&self) -> bool {
        self.controller.retry().await
    }

    /// Wire a debounced search box to this view.
    ///
    /// Terms pushed into the returned debouncer are committed through
    /// [`ListView::submit_search`] once typing pauses for `delay`. The
    /// background task ends when the debouncer is dropped.
    pub fn attach_search(self: &Arc<Self>, delay: Duration) -> Debouncer<String> {
        let (debouncer, mut terms) = Debouncer::<String>::new(delay);
        let view = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(term) = terms.recv().await {
                tracing::debug!(term = %term, "search committed");
                view.submit_search(&term).await;
            }
        });
        debouncer
    }

    /// Update the URL state and claim the matching fetch under one lock, so
    /// concurrent edits reach the controller in the order they hit the URL.
    async fn apply(&self, update: impl FnOnce(&ViewState<F>) -> ViewState<F>) -> bool {
        let pending = {
            let mut state = self.lock();
            *state = update(&state);
            self.controller.request(state.filters.clone(), state.page)
        };
        match pending {
            Some(fetch) => {
                self.controller.complete(fetch).await;
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ViewState<F>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camara::mock::MockCamaraClient;
    use crate::camara::{CamaraApiClient, PaginatedResult, Proposicao, ProposicaoFilters};
    use crate::listing::fetch::{PageFetcher, ProposicoesSource};
    use crate::listing::items::{proposicao_item, ListItem};

    type ProposicoesView = ListView<ProposicaoFilters, Proposicao, ListItem>;

    fn view(mock: &Arc<MockCamaraClient>, query: &str) -> Arc<ProposicoesView> {
        let client: Arc<dyn CamaraApiClient> = mock.clone();
        let source: Arc<dyn PageFetcher<ProposicaoFilters, Proposicao>> =
            Arc::new(ProposicoesSource::new(client));
        let controller = Arc::new(PaginatedController::new(source, proposicao_item));
        Arc::new(ListView::from_query(controller, query))
    }

    fn mock_with_pages(total_pages: u32) -> Arc<MockCamaraClient> {
        let mock = Arc::new(MockCamaraClient::new());
        mock.set_proposicoes_result(Ok(PaginatedResult {
            items: Vec::new(),
            total_pages,
        }));
        mock
    }

    #[tokio::test]
    async fn filter_change_resets_page_with_single_fetch() {
        let mock = mock_with_pages(5);
        let view = view(&mock, "tipo=PL&page=3");

        view.load().await;
        assert_eq!(view.state().page, 3);

        view.set_filters(ProposicaoFilters::new().sigla_tipo(["PEC"])).await;

        assert_eq!(view.state().page, 1);
        assert_eq!(view.query(), "tipo=PEC");
        let calls = mock.calls_to("list_proposicoes");
        assert_eq!(calls.len(), 2);
        assert!(calls[1].contains("page=1"));
    }

    #[tokio::test]
    async fn same_filters_do_not_refetch() {
        let mock = mock_with_pages(2);
        let view = view(&mock, "tipo=PL");

        view.load().await;
        view.set_filters(ProposicaoFilters::new().sigla_tipo(["PL"])).await;

        assert_eq!(mock.calls_to("list_proposicoes").len(), 1);
    }

    #[tokio::test]
    async fn page_navigation_keeps_filters() {
        let mock = mock_with_pages(4);
        let view = view(&mock, "q=sa%C3%BAde");

        view.load().await;
        view.set_page(2).await;

        assert_eq!(view.state().filters.keywords_value(), Some("saúde"));
        assert_eq!(view.snapshot().page, 2);
        assert!(view.query().ends_with("page=2"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_edits_leave_url_and_list_agreeing() {
        let mock = mock_with_pages(9);
        let view = view(&mock, "");

        let tasks: Vec<_> = (2..=9)
            .map(|page| {
                let view = Arc::clone(&view);
                tokio::spawn(async move { view.set_page(page).await })
            })
            .collect();
        for task in tasks {
            task.await.expect("join");
        }

        let snapshot = view.snapshot();
        assert_eq!(snapshot.page, view.state().page);
        assert_eq!(snapshot.status, crate::listing::LoadStatus::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn debounced_search_commits_last_term_once() {
        let mock = mock_with_pages(1);
        let view = view(&mock, "page=4");
        let search = view.attach_search(crate::listing::DEFAULT_SEARCH_DELAY);

        for term in ["s", "sa", "sau", "saude"] {
            search.push(term.to_string());
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(600)).await;

        let calls = mock.calls_to("list_proposicoes");
        assert_eq!(calls.len(), 1);
        assert_eq!(view.state().filters.keywords_value(), Some("saude"));
        assert_eq!(view.state().page, 1);
    }
}
