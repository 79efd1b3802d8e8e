//! URL-encoded list view state.
//!
//! The query string is the single source of truth for what a list view
//! shows: filters plus the 1-based page. Defaults (blank values, page 1) are
//! elided so equivalent states always produce the same URL.

use crate::camara::filters::{encode_query, FilterValue, ListFilters};

/// URL parameter holding the page number.
pub const PAGE_KEY: &str = "page";

/// Filters and page of one list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState<F> {
    pub filters: F,
    pub page: u32,
}

impl<F: ListFilters> ViewState<F> {
    /// Build a state, clamping the page to at least 1.
    pub fn new(filters: F, page: u32) -> Self {
        Self {
            filters,
            page: page.max(1),
        }
    }

    /// Parse a raw query string (with or without a leading `?`).
    ///
    /// Unknown keys are ignored; a missing, non-numeric or non-positive page
    /// becomes page 1. When a key repeats, its first occurrence wins.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let pairs = decode_pairs(query);
        let lookup = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        };

        let page = lookup(PAGE_KEY)
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .and_then(|page| u32::try_from(page).ok())
            .unwrap_or(1);

        Self::new(F::from_url_params(&lookup), page)
    }

    /// Canonical query string (without `?`), defaults elided.
    #[must_use]
    pub fn to_query(&self) -> String {
        let mut params = self.filters.url_params();
        if self.page > 1 {
            params.push((PAGE_KEY, FilterValue::Single(self.page.to_string())));
        }
        encode_query(&params)
    }

    /// Same filters, different page.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        Self::new(self.filters.clone(), page)
    }

    /// Apply new filters. A change in filters always lands on page 1; equal
    /// filters keep the current page.
    #[must_use]
    pub fn with_filters(&self, filters: F) -> Self {
        if filters == self.filters {
            self.clone()
        } else {
            Self::new(filters, 1)
        }
    }
}

/// Decode `a=1&b=x%20y` into pairs.
///
/// Multi-valued filters split the decoded value on commas, so a comma can
/// only appear inside single-valued parameters such as `q`.
fn decode_pairs(query: &str) -> Vec<(String, String)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).map_or(spaced.clone(), |decoded| decoded.into_owned())
}
