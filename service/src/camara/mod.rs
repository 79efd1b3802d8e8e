//! Câmara dos Deputados open-data API module.
//!
//! Provides the HTTP client for the upstream REST API plus the pieces built
//! directly on top of it.
//!
//! # Architecture
//!
//! - [`CamaraApiClient`] - Trait defining API operations
//! - [`HttpCamaraClient`] - Real HTTP implementation using reqwest
//! - [`mock::MockCamaraClient`] - Mock for unit tests (behind `test-utils` feature)
//! - [`pagination`] - Page-count derivation from navigation links
//! - [`filters`] - Typed per-view filter sets
//! - [`enrichment`] - Concurrent author enrichment with isolated failures
//! - [`votes`] - Latest vote session of a proposal
//!
//! # Testing Patterns
//!
//! ## Unit Tests (Mock Implementation)
//!
//! ```ignore
//! use camara_explorer_api::camara::mock::MockCamaraClient;
//!
//! let mock = MockCamaraClient::new();
//! mock.insert_deputado(detalhes);
//!
//! let autores = enrich_authors(&mock, autores).await;
//! assert_eq!(mock.calls_to("get_deputado").len(), 1);
//! ```
//!
//! ## Integration Tests (HTTP Stubbing)
//!
//! ```ignore
//! use crate::common::http_mock::MockHttpServer;
//! use camara_explorer_api::camara::HttpCamaraClient;
//!
//! let server = MockHttpServer::start().await;
//! server
//!     .expect_get("/proposicoes")
//!     .with_query("keywords", "saúde")
//!     .respond_with_json(json!({"dados": [], "links": []}))
//!     .mount()
//!     .await;
//!
//! let client = HttpCamaraClient::new(server.url());
//! ```

mod client;
pub mod enrichment;
pub mod filters;
pub mod pagination;
mod types;
pub mod votes;

pub use client::{
    CamaraApiClient, CamaraApiError, Freshness, HttpCamaraClient, DEFAULT_BASE_URL,
    DEFAULT_PAGE_SIZE, GENERIC_LOAD_ERROR,
};
pub use enrichment::{enrich_authors, EnrichedAutor};
pub use filters::{DeputadoFilters, ListFilters, ProposicaoFilters};
pub use pagination::{total_pages, PaginatedResult};
pub use types::{
    Autor, Deputado, DeputadoDetalhes, DeputadoVotante, Envelope, Gabinete, Link, Partido,
    Proposicao, ProposicaoDetalhes, SingleEnvelope, StatusProposicao, UltimoStatus, Votacao,
    VotoDeputado,
};
pub use votes::{latest_vote, VoteSummary};

#[cfg(any(test, feature = "test-utils"))]
pub use client::mock;
