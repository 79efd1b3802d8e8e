//! Fetch adapters: `(page, filters) -> PaginatedResult<T>`.
//!
//! Each list view is backed by one adapter. The adapter also carries the
//! revalidation hint of the resource it reads.

use std::sync::Arc;

use async_trait::async_trait;

use crate::camara::{
    CamaraApiClient, CamaraApiError, Deputado, DeputadoFilters, Freshness, PaginatedResult,
    Proposicao, ProposicaoFilters,
};

/// Source of paginated, filtered items for one list view.
#[async_trait]
pub trait PageFetcher<F, T>: Send + Sync {
    async fn fetch_page(&self, page: u32, filters: &F) -> Result<PaginatedResult<T>, CamaraApiError>;

    fn freshness(&self) -> Freshness {
        Freshness::Volatile
    }
}

/// Proposals list backed by a Câmara client.
pub struct ProposicoesSource {
    client: Arc<dyn CamaraApiClient>,
}

impl ProposicoesSource {
    pub fn new(client: Arc<dyn CamaraApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher<ProposicaoFilters, Proposicao> for ProposicoesSource {
    async fn fetch_page(
        &self,
        page: u32,
        filters: &ProposicaoFilters,
    ) -> Result<PaginatedResult<Proposicao>, CamaraApiError> {
        self.client.list_proposicoes(page, filters).await
    }
}

/// Deputies list backed by a Câmara client.
pub struct DeputadosSource {
    client: Arc<dyn CamaraApiClient>,
}

impl DeputadosSource {
    pub fn new(client: Arc<dyn CamaraApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher<DeputadoFilters, Deputado> for DeputadosSource {
    async fn fetch_page(
        &self,
        page: u32,
        filters: &DeputadoFilters,
    ) -> Result<PaginatedResult<Deputado>, CamaraApiError> {
        self.client.list_deputados(page, filters).await
    }
}

/// Fetch one page and run every item through `transform`, keeping order.
///
/// # Errors
///
/// Propagates the adapter's error unchanged.
pub async fn load_page<F, T, R>(
    fetcher: &dyn PageFetcher<F, T>,
    transform: &(dyn Fn(T) -> R + Send + Sync),
    page: u32,
    filters: &F,
) -> Result<PaginatedResult<R>, CamaraApiError>
where
    F: Sync,
{
    let result = fetcher.fetch_page(page.max(1), filters).await?;
    Ok(result.map(transform))
}
