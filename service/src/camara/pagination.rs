//! Page-count derivation for paginated upstream collections.
//!
//! The upstream never returns a total count. The only source of truth is the
//! `pagina` query parameter of the `last` navigation link; when that link is
//! missing the collection fits on one page.

use reqwest::Url;

use super::types::{Envelope, Link};

/// Relation label of the navigation link that points at the final page.
pub const LAST_REL: &str = "last";

/// Query parameter carrying the page number in navigation links.
pub const PAGE_PARAM: &str = "pagina";

/// One page of an upstream collection plus the derived page count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatedResult<T> {
    /// Items in upstream order.
    pub items: Vec<T>,
    /// Total page count, always at least 1.
    pub total_pages: u32,
}

impl<T> PaginatedResult<T> {
    /// Normalize an upstream envelope.
    #[must_use]
    pub fn from_envelope(envelope: Envelope<T>) -> Self {
        let total_pages = total_pages(&envelope.links);
        Self {
            items: envelope.dados,
            total_pages,
        }
    }

    /// Transform every item, keeping order and page count.
    pub fn map<R>(self, f: impl FnMut(T) -> R) -> PaginatedResult<R> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            total_pages: self.total_pages,
        }
    }
}

/// Derive the total page count from a list of navigation links.
///
/// Returns the `pagina` value of the `last` link, or 1 when the link is
/// absent, carries no parseable page number, or has a malformed URL.
#[must_use]
pub fn total_pages(links: &[Link]) -> u32 {
    let Some(last) = links.iter().find(|link| link.rel == LAST_REL) else {
        return 1;
    };

    match Url::parse(&last.href) {
        Ok(url) => url
            .query_pairs()
            .find(|(key, _)| key == PAGE_PARAM)
            .and_then(|(_, value)| value.parse::<u32>().ok())
            .map_or(1, |page| page.max(1)),
        Err(err) => {
            tracing::warn!(href = %last.href, error = %err, "malformed last-page link; assuming a single page");
            1
        }
    }
}
