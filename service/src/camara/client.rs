//! Câmara open-data API client.
//!
//! This module provides a trait-based HTTP client for the read-only
//! `dadosabertos.camara.leg.br` REST API. The trait abstraction enables:
//!
//! - Easy mocking in unit tests
//! - HTTP-level testing with `MockHttpServer` in integration tests
//! - Sharing one client between the list views, detail lookups and the
//!   enrichment aggregator
//!
//! # Example
//!
//! ```ignore
//! use camara_explorer_api::camara::{CamaraApiClient, HttpCamaraClient, ProposicaoFilters};
//!
//! let client = HttpCamaraClient::new("https://dadosabertos.camara.leg.br/api/v2");
//! let page = client
//!     .list_proposicoes(1, &ProposicaoFilters::new().keywords("saúde"))
//!     .await?;
//! println!("{} items, {} pages", page.items.len(), page.total_pages);
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::filters::{encode_query, DeputadoFilters, FilterValue, ListFilters, ProposicaoFilters};
use super::pagination::{PaginatedResult, PAGE_PARAM};
use super::types::{
    Autor, DeputadoDetalhes, Deputado, Envelope, Partido, Proposicao, ProposicaoDetalhes,
    SingleEnvelope, Votacao, VotoDeputado,
};

/// Public upstream base URL.
pub const DEFAULT_BASE_URL: &str = "https://dadosabertos.camara.leg.br/api/v2";

/// Items per page requested from paginated collections.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Message shown when a failure carries nothing a citizen can act on.
pub const GENERIC_LOAD_ERROR: &str = "Falha ao carregar dados.";

/// Errors that can occur when calling the Câmara API.
#[derive(Debug, Error)]
pub enum CamaraApiError {
    /// Transport failure, timeout or undecodable body
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Singular resource does not exist
    #[error("Recurso não encontrado: {0}")]
    NotFound(String),

    /// Upstream answered with a non-success status
    #[error("Erro na API ({status}): {status_text}")]
    Remote { status: u16, status_text: String },
}

impl CamaraApiError {
    /// Text suitable for an error panel. Transport details are replaced by a
    /// generic message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Request(_) => GENERIC_LOAD_ERROR.to_string(),
            other => other.to_string(),
        }
    }
}

/// Revalidation hint attached to each upstream resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Proposals, votes and deputy lists change during the day.
    Volatile,
    /// Parties and similar reference data are near-static.
    Reference,
}

impl Freshness {
    #[must_use]
    pub const fn max_age(self) -> Duration {
        match self {
            Self::Volatile => Duration::from_secs(60 * 60),
            Self::Reference => Duration::from_secs(24 * 60 * 60),
        }
    }

    /// `Cache-Control` header value for responses derived from this resource.
    #[must_use]
    pub fn cache_control(self) -> String {
        format!("public, max-age={}", self.max_age().as_secs())
    }
}

/// Trait for Câmara API operations.
///
/// Use `HttpCamaraClient` for real HTTP calls, or `mock::MockCamaraClient`
/// (behind the `test-utils` feature) in tests.
#[async_trait]
pub trait CamaraApiClient: Send + Sync {
    /// One page of proposals matching `filters`, newest first.
    async fn list_proposicoes(
        &self,
        page: u32,
        filters: &ProposicaoFilters,
    ) -> Result<PaginatedResult<Proposicao>, CamaraApiError>;

    /// One page of deputies matching `filters`, by name.
    async fn list_deputados(
        &self,
        page: u32,
        filters: &DeputadoFilters,
    ) -> Result<PaginatedResult<Deputado>, CamaraApiError>;

    /// Full record of one proposal.
    async fn get_proposicao(&self, id: &str) -> Result<ProposicaoDetalhes, CamaraApiError>;

    /// Full record of one deputy.
    async fn get_deputado(&self, id: &str) -> Result<DeputadoDetalhes, CamaraApiError>;

    /// Authors of a proposal.
    async fn list_autores(&self, proposicao_id: &str) -> Result<Vec<Autor>, CamaraApiError>;

    /// Vote sessions of a proposal, most recent first.
    async fn list_votacoes(&self, proposicao_id: &str) -> Result<Vec<Votacao>, CamaraApiError>;

    /// Individual votes cast in a vote session.
    async fn list_votos(&self, votacao_id: &str) -> Result<Vec<VotoDeputado>, CamaraApiError>;

    /// Party reference list.
    async fn list_partidos(&self) -> Result<Vec<Partido>, CamaraApiError>;
}

/// HTTP-based implementation of `CamaraApiClient`.
pub struct HttpCamaraClient {
    client: reqwest::Client,
    base_url: String,
    page_size: u32,
}

impl HttpCamaraClient {
    /// Create a new client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client with a custom `reqwest::Client` (timeouts, pooling).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the number of items requested per page.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    async fn get(&self, path_and_query: &str) -> Result<reqwest::Response, CamaraApiError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        tracing::debug!(%url, "camara request");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        Ok(response)
    }

    fn remote_error(status: reqwest::StatusCode) -> CamaraApiError {
        CamaraApiError::Remote {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }

    async fn get_collection<T: DeserializeOwned>(
        &self,
        path_and_query: &str,
    ) -> Result<Envelope<T>, CamaraApiError> {
        let response = self.get(path_and_query).await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Self::remote_error(status));
        }

        Ok(response.json().await?)
    }

    async fn get_single<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: &str,
    ) -> Result<T, CamaraApiError> {
        let path = format!("/{resource}/{}", urlencoding::encode(id));
        let response = self.get(&path).await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CamaraApiError::NotFound(id.to_string()));
        }

        if !status.is_success() {
            return Err(Self::remote_error(status));
        }

        let envelope: SingleEnvelope<T> = response.json().await?;
        Ok(envelope.dados)
    }

    async fn list_page<T: DeserializeOwned, F: ListFilters>(
        &self,
        resource: &str,
        page: u32,
        filters: &F,
        order_by: &str,
        order: &str,
    ) -> Result<PaginatedResult<T>, CamaraApiError> {
        let mut params = filters.upstream_params();
        params.push((PAGE_PARAM, FilterValue::Single(page.max(1).to_string())));
        params.push(("itens", FilterValue::Single(self.page_size.to_string())));
        params.push(("ordenarPor", FilterValue::Single(order_by.to_string())));
        params.push(("ordem", FilterValue::Single(order.to_string())));

        let path = format!("/{resource}?{}", encode_query(&params));
        let envelope = self.get_collection(&path).await?;
        Ok(PaginatedResult::from_envelope(envelope))
    }
}

#[async_trait]
impl CamaraApiClient for HttpCamaraClient {
    async fn list_proposicoes(
        &self,
        page: u32,
        filters: &ProposicaoFilters,
    ) -> Result<PaginatedResult<Proposicao>, CamaraApiError> {
        self.list_page("proposicoes", page, filters, "id", "DESC")
            .await
    }

    async fn list_deputados(
        &self,
        page: u32,
        filters: &DeputadoFilters,
    ) -> Result<PaginatedResult<Deputado>, CamaraApiError> {
        self.list_page("deputados", page, filters, "nome", "ASC")
            .await
    }

    async fn get_proposicao(&self, id: &str) -> Result<ProposicaoDetalhes, CamaraApiError> {
        self.get_single("proposicoes", id).await
    }

    async fn get_deputado(&self, id: &str) -> Result<DeputadoDetalhes, CamaraApiError> {
        self.get_single("deputados", id).await
    }

    async fn list_autores(&self, proposicao_id: &str) -> Result<Vec<Autor>, CamaraApiError> {
        let path = format!("/proposicoes/{}/autores", urlencoding::encode(proposicao_id));
        Ok(self.get_collection(&path).await?.dados)
    }

    async fn list_votacoes(&self, proposicao_id: &str) -> Result<Vec<Votacao>, CamaraApiError> {
        let path = format!(
            "/proposicoes/{}/votacoes?ordem=DESC&ordenarPor=dataHoraRegistro",
            urlencoding::encode(proposicao_id)
        );
        Ok(self.get_collection(&path).await?.dados)
    }

    async fn list_votos(&self, votacao_id: &str) -> Result<Vec<VotoDeputado>, CamaraApiError> {
        let path = format!("/votacoes/{}/votos", urlencoding::encode(votacao_id));
        Ok(self.get_collection(&path).await?.dados)
    }

    async fn list_partidos(&self) -> Result<Vec<Partido>, CamaraApiError> {
        let envelope = self
            .get_collection("/partidos?itens=100&ordem=ASC&ordenarPor=sigla")
            .await?;
        Ok(envelope.dados)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::missing_const_for_fn,
    clippy::must_use_candidate
)]
pub mod mock {
    //! Mock implementation for unit testing.

    use super::{
        Autor, CamaraApiClient, CamaraApiError, Deputado, DeputadoDetalhes, DeputadoFilters,
        PaginatedResult, Partido, Proposicao, ProposicaoDetalhes, ProposicaoFilters, Votacao,
        VotoDeputado,
    };
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock implementation of `CamaraApiClient` for unit tests.
    ///
    /// Collection results set with `set_*_result` are consumed by the next
    /// call; detail records are keyed by id and can be looked up repeatedly.
    /// Every call is recorded and can be inspected with `calls()`.
    #[derive(Default)]
    pub struct MockCamaraClient {
        proposicoes_result: Mutex<Option<Result<PaginatedResult<Proposicao>, CamaraApiError>>>,
        deputados_result: Mutex<Option<Result<PaginatedResult<Deputado>, CamaraApiError>>>,
        proposicoes: Mutex<HashMap<String, ProposicaoDetalhes>>,
        deputados: Mutex<HashMap<String, DeputadoDetalhes>>,
        autores_result: Mutex<Option<Result<Vec<Autor>, CamaraApiError>>>,
        votacoes_result: Mutex<Option<Result<Vec<Votacao>, CamaraApiError>>>,
        votos_result: Mutex<Option<Result<Vec<VotoDeputado>, CamaraApiError>>>,
        partidos: Mutex<Vec<Partido>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockCamaraClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_proposicoes_result(
            &self,
            result: Result<PaginatedResult<Proposicao>, CamaraApiError>,
        ) {
            *self.proposicoes_result.lock().unwrap() = Some(result);
        }

        pub fn set_deputados_result(
            &self,
            result: Result<PaginatedResult<Deputado>, CamaraApiError>,
        ) {
            *self.deputados_result.lock().unwrap() = Some(result);
        }

        pub fn insert_proposicao(&self, detalhes: ProposicaoDetalhes) {
            self.proposicoes
                .lock()
                .unwrap()
                .insert(detalhes.id.to_string(), detalhes);
        }

        pub fn insert_deputado(&self, detalhes: DeputadoDetalhes) {
            self.deputados
                .lock()
                .unwrap()
                .insert(detalhes.id.to_string(), detalhes);
        }

        pub fn set_autores_result(&self, result: Result<Vec<Autor>, CamaraApiError>) {
            *self.autores_result.lock().unwrap() = Some(result);
        }

        pub fn set_votacoes_result(&self, result: Result<Vec<Votacao>, CamaraApiError>) {
            *self.votacoes_result.lock().unwrap() = Some(result);
        }

        pub fn set_votos_result(&self, result: Result<Vec<VotoDeputado>, CamaraApiError>) {
            *self.votos_result.lock().unwrap() = Some(result);
        }

        pub fn set_partidos(&self, partidos: Vec<Partido>) {
            *self.partidos.lock().unwrap() = partidos;
        }

        /// All calls made so far, as `"operation arg"` strings.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        /// Calls whose operation name matches `operation`.
        pub fn calls_to(&self, operation: &str) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter(|call| call.split(' ').next() == Some(operation))
                .collect()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl CamaraApiClient for MockCamaraClient {
        async fn list_proposicoes(
            &self,
            page: u32,
            filters: &ProposicaoFilters,
        ) -> Result<PaginatedResult<Proposicao>, CamaraApiError> {
            self.record(format!("list_proposicoes page={page} {filters:?}"));
            self.proposicoes_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| {
                    Ok(PaginatedResult {
                        items: Vec::new(),
                        total_pages: 1,
                    })
                })
        }

        async fn list_deputados(
            &self,
            page: u32,
            filters: &DeputadoFilters,
        ) -> Result<PaginatedResult<Deputado>, CamaraApiError> {
            self.record(format!("list_deputados page={page} {filters:?}"));
            self.deputados_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| {
                    Ok(PaginatedResult {
                        items: Vec::new(),
                        total_pages: 1,
                    })
                })
        }

        async fn get_proposicao(&self, id: &str) -> Result<ProposicaoDetalhes, CamaraApiError> {
            self.record(format!("get_proposicao {id}"));
            self.proposicoes
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .ok_or_else(|| CamaraApiError::NotFound(id.to_string()))
        }

        async fn get_deputado(&self, id: &str) -> Result<DeputadoDetalhes, CamaraApiError> {
            self.record(format!("get_deputado {id}"));
            self.deputados
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .ok_or_else(|| CamaraApiError::NotFound(id.to_string()))
        }

        async fn list_autores(&self, proposicao_id: &str) -> Result<Vec<Autor>, CamaraApiError> {
            self.record(format!("list_autores {proposicao_id}"));
            self.autores_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn list_votacoes(
            &self,
            proposicao_id: &str,
        ) -> Result<Vec<Votacao>, CamaraApiError> {
            self.record(format!("list_votacoes {proposicao_id}"));
            self.votacoes_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn list_votos(&self, votacao_id: &str) -> Result<Vec<VotoDeputado>, CamaraApiError> {
            self.record(format!("list_votos {votacao_id}"));
            self.votos_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn list_partidos(&self) -> Result<Vec<Partido>, CamaraApiError> {
            self.record("list_partidos".to_string());
            Ok(self.partidos.lock().unwrap().clone())
        }
    }
}
