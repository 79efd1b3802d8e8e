//! Paginated, filterable list views.
//!
//! - [`view_state`] - filters and page encoded in the URL query string
//! - [`fetch`] - adapters from the Câmara client to `(page, filters)` fetches
//! - [`items`] - display rows produced from upstream records
//! - [`controller`] - fetch lifecycle with stale-response protection
//! - [`debounce`] - delayed commit of free-text search
//! - [`view`] - ties a URL state to a controller

pub mod controller;
pub mod debounce;
pub mod fetch;
pub mod items;
pub mod view;
pub mod view_state;

pub use controller::{ListSnapshot, LoadStatus, PaginatedController, PendingFetch};
pub use debounce::{Debouncer, DEFAULT_SEARCH_DELAY};
pub use fetch::{load_page, DeputadosSource, PageFetcher, ProposicoesSource};
pub use items::{deputado_item, proposicao_item, ListItem};
pub use view::ListView;
pub use view_state::ViewState;
