//! REST API handlers and `OpenAPI` documentation.
//!
//! List endpoints accept the same query string a list view keeps in its URL
//! (`q`, `page` and view-specific keys) and answer with one normalized page
//! plus the canonical query. Errors are RFC 7807 problem documents, except
//! for `/api/explain` which answers `{"error": "..."}`.

// The OpenApi derive macro generates code that triggers this lint
#![allow(clippy::needless_for_each)]

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Path, RawQuery, State},
    http::{header::CACHE_CONTROL, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize, Serializer};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::camara::{
    enrich_authors, latest_vote, Autor, CamaraApiClient, CamaraApiError, Deputado,
    DeputadoDetalhes, DeputadoFilters, DeputadoVotante, EnrichedAutor, Freshness, Gabinete,
    ListFilters, Partido, Proposicao, ProposicaoDetalhes, ProposicaoFilters, StatusProposicao,
    UltimoStatus, Votacao, VoteSummary, VotoDeputado,
};
use crate::explain::{ExplainError, ExplainRequest, ExplainResponse, ExplainService};
use crate::listing::{
    deputado_item, load_page, proposicao_item, DeputadosSource, ListItem, PageFetcher,
    ProposicoesSource, ViewState,
};
use crate::proxy::UpstreamProxy;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub camara: Arc<dyn CamaraApiClient>,
    pub explain: ExplainService,
    pub proxy: UpstreamProxy,
}

/// Serialize a `StatusCode` as its `u16` representation.
#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires `&T` signature
fn serialize_status_code<S: Serializer>(status: &StatusCode, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u16(status.as_u16())
}

/// RFC 7807 Problem Details error response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    /// URI reference identifying the problem type
    #[serde(rename = "type")]
    pub problem_type: String,
    /// Short human-readable summary
    pub title: String,
    /// HTTP status code
    #[serde(serialize_with = "serialize_status_code")]
    #[schema(value_type = u16)]
    pub status: StatusCode,
    /// Human-readable explanation specific to this occurrence
    pub detail: String,
    /// URI reference identifying the specific occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ProblemExtensions>,
}

/// Machine-readable error code.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProblemExtensions {
    pub code: String,
}

impl ProblemDetails {
    fn new(status: StatusCode, slug: &str, code: &str, detail: &str) -> Self {
        Self {
            problem_type: format!("/errors/{slug}"),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            status,
            detail: detail.to_string(),
            instance: None,
            extensions: Some(ProblemExtensions {
                code: code.to_string(),
            }),
        }
    }

    #[must_use]
    pub fn not_found(detail: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not-found", "NOT_FOUND", detail)
    }

    #[must_use]
    pub fn bad_gateway(detail: &str) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, "upstream", "UPSTREAM_ERROR", detail)
    }

    /// Create an internal server error response.
    #[must_use]
    pub fn internal_error(detail: &str) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            "INTERNAL_ERROR",
            detail,
        )
    }

    /// Attach the request path.
    #[must_use]
    pub fn at(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<CamaraApiError> for ProblemDetails {
    fn from(err: CamaraApiError) -> Self {
        match &err {
            CamaraApiError::NotFound(id) => {
                Self::not_found(&format!("Recurso não encontrado: {id}"))
            }
            CamaraApiError::Remote { .. } => Self::bad_gateway(&err.to_string()),
            CamaraApiError::Request(source) => {
                tracing::error!(error = %source, "upstream request failed");
                Self::internal_error(&err.user_message())
            }
        }
    }
}

/// Error body of `/api/explain`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ExplainError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::MissingInput => StatusCode::BAD_REQUEST,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// One page of a list view.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListPage {
    pub items: Vec<ListItem>,
    pub total_pages: u32,
    pub page: u32,
    /// Canonical query string of this view (defaults elided).
    pub query: String,
}

/// Proposal detail with enriched authors.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposicaoView {
    #[serde(flatten)]
    pub proposicao: ProposicaoDetalhes,
    pub autores: Vec<EnrichedAutor>,
}

/// Query parameters of `/api/v1/proposicoes`.
#[derive(IntoParams)]
#[into_params(parameter_in = Query)]
#[allow(dead_code)]
struct ProposicoesQuery {
    /// Free-text keywords
    q: Option<String>,
    /// Comma-separated type acronyms, e.g. `PL,PEC`
    tipo: Option<String>,
    /// Theme code
    tema: Option<String>,
    /// Year of presentation
    ano: Option<String>,
    /// 1-based page
    page: Option<u32>,
}

/// Query parameters of `/api/v1/deputados`.
#[derive(IntoParams)]
#[into_params(parameter_in = Query)]
#[allow(dead_code)]
struct DeputadosQuery {
    /// Name search
    q: Option<String>,
    /// Party acronym
    partido: Option<String>,
    /// State (UF)
    uf: Option<String>,
    /// 1-based page
    page: Option<u32>,
}

fn cache_headers(freshness: Freshness) -> [(axum::http::HeaderName, String); 1] {
    [(CACHE_CONTROL, freshness.cache_control())]
}

async fn list_view<F, T>(
    fetcher: &dyn PageFetcher<F, T>,
    transform: &(dyn Fn(T) -> ListItem + Send + Sync),
    query: Option<&str>,
) -> Result<Response, ProblemDetails>
where
    F: ListFilters,
{
    let view = ViewState::<F>::from_query(query.unwrap_or_default());
    let result = load_page(fetcher, transform, view.page, &view.filters).await?;

    let page = ListPage {
        items: result.items,
        total_pages: result.total_pages,
        page: view.page,
        query: view.to_query(),
    };
    Ok((cache_headers(fetcher.freshness()), Json(page)).into_response())
}

/// Health check
#[utoipa::path(get, path = "/health", tag = "System", responses((status = 200, description = "Service is up")))]
#[allow(clippy::unused_async)] // Required for Axum handler signature
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// List proposals
///
/// # Errors
///
/// Returns `ProblemDetails` when the upstream API fails.
#[utoipa::path(
    get,
    path = "/api/v1/proposicoes",
    tag = "Proposições",
    params(ProposicoesQuery),
    responses(
        (status = 200, description = "One page of proposals", body = ListPage),
        (status = 502, description = "Upstream API error", body = ProblemDetails)
    )
)]
pub async fn list_proposicoes(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, ProblemDetails> {
    let source = ProposicoesSource::new(Arc::clone(&state.camara));
    list_view::<ProposicaoFilters, Proposicao>(&source, &proposicao_item, query.as_deref()).await
}

/// List deputies
///
/// # Errors
///
/// Returns `ProblemDetails` when the upstream API fails.
#[utoipa::path(
    get,
    path = "/api/v1/deputados",
    tag = "Deputados",
    params(DeputadosQuery),
    responses(
        (status = 200, description = "One page of deputies", body = ListPage),
        (status = 502, description = "Upstream API error", body = ProblemDetails)
    )
)]
pub async fn list_deputados(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, ProblemDetails> {
    let source = DeputadosSource::new(Arc::clone(&state.camara));
    list_view::<DeputadoFilters, Deputado>(&source, &deputado_item, query.as_deref()).await
}

/// Get a proposal with its authors
///
/// Deputy authors carry party, state and photo when their record could be
/// fetched. A failure listing authors yields an empty author list.
///
/// # Errors
///
/// Returns 404 when the proposal does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/proposicoes/{id}",
    tag = "Proposições",
    params(("id" = String, Path, description = "Proposal id")),
    responses(
        (status = 200, description = "Proposal detail", body = ProposicaoView),
        (status = 404, description = "Proposal not found", body = ProblemDetails)
    )
)]
pub async fn get_proposicao(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ProblemDetails> {
    let client = state.camara.as_ref();
    let proposicao = client
        .get_proposicao(&id)
        .await
        .map_err(|err| ProblemDetails::from(err).at(format!("/api/v1/proposicoes/{id}")))?;

    let autores = match client.list_autores(&id).await {
        Ok(autores) => enrich_authors(client, autores).await,
        Err(err) => {
            tracing::warn!(proposicao_id = %id, error = %err, "failed to list authors");
            Vec::new()
        }
    };

    let view = ProposicaoView {
        proposicao,
        autores,
    };
    Ok((cache_headers(Freshness::Volatile), Json(view)).into_response())
}

/// Latest vote on a proposal
///
/// # Errors
///
/// Returns 404 when the proposal has no recorded vote session.
#[utoipa::path(
    get,
    path = "/api/v1/proposicoes/{id}/votacao",
    tag = "Proposições",
    params(("id" = String, Path, description = "Proposal id")),
    responses(
        (status = 200, description = "Latest vote with yes/no split", body = VoteSummary),
        (status = 404, description = "No vote session", body = ProblemDetails)
    )
)]
pub async fn get_votacao(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ProblemDetails> {
    let summary = latest_vote(state.camara.as_ref(), &id).await.ok_or_else(|| {
        ProblemDetails::not_found("Nenhuma votação registrada para esta proposição.")
            .at(format!("/api/v1/proposicoes/{id}/votacao"))
    })?;
    Ok((cache_headers(Freshness::Volatile), Json(summary)).into_response())
}

/// Get a deputy
///
/// # Errors
///
/// Returns 404 when the deputy does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/deputados/{id}",
    tag = "Deputados",
    params(("id" = String, Path, description = "Deputy id")),
    responses(
        (status = 200, description = "Deputy detail", body = DeputadoDetalhes),
        (status = 404, description = "Deputy not found", body = ProblemDetails)
    )
)]
pub async fn get_deputado(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ProblemDetails> {
    let deputado = state
        .camara
        .get_deputado(&id)
        .await
        .map_err(|err| ProblemDetails::from(err).at(format!("/api/v1/deputados/{id}")))?;
    Ok((cache_headers(Freshness::Volatile), Json(deputado)).into_response())
}

/// List parties
///
/// # Errors
///
/// Returns `ProblemDetails` when the upstream API fails.
#[utoipa::path(
    get,
    path = "/api/v1/partidos",
    tag = "Partidos",
    responses(
        (status = 200, description = "Party reference list", body = [Partido]),
        (status = 502, description = "Upstream API error", body = ProblemDetails)
    )
)]
pub async fn list_partidos(State(state): State<AppState>) -> Result<Response, ProblemDetails> {
    let partidos = state.camara.list_partidos().await?;
    Ok((cache_headers(Freshness::Reference), Json(partidos)).into_response())
}

/// Explain a proposal in plain language
///
/// Explanations are cached per proposal id.
///
/// # Errors
///
/// 400 on missing fields, 503 when no generator is configured, 500 when
/// generation fails.
#[utoipa::path(
    post,
    path = "/api/explain",
    tag = "Explicação",
    request_body = ExplainRequest,
    responses(
        (status = 200, description = "Explanation", body = ExplainResponse),
        (status = 400, description = "Missing ementa or id", body = ErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse),
        (status = 503, description = "Explanation service not configured", body = ErrorResponse)
    )
)]
pub async fn explain(
    State(state): State<AppState>,
    body: Result<Json<ExplainRequest>, JsonRejection>,
) -> Result<Json<ExplainResponse>, ExplainError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "invalid explain body");
        ExplainError::MissingInput
    })?;
    state.explain.explain(&request).await.map(Json)
}

const PROXY_PREFIX: &str = "/api/camara";

/// Forward a GET to the upstream API
///
/// # Errors
///
/// Returns 502 when the upstream cannot be reached.
#[utoipa::path(
    get,
    path = "/api/camara/{path}",
    tag = "Proxy",
    params(("path" = String, Path, description = "Upstream path, forwarded verbatim with the query string")),
    responses(
        (status = 200, description = "Upstream response, relayed as-is"),
        (status = 502, description = "Upstream unreachable", body = ProblemDetails)
    )
)]
pub async fn proxy_camara(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, ProblemDetails> {
    // Raw, still percent-encoded; the `{*path}` capture would be decoded.
    let path = uri.path().strip_prefix(PROXY_PREFIX).unwrap_or(uri.path());
    match state.proxy.forward(path, uri.query()).await {
        Ok(response) => Ok(response.into_response()),
        Err(err) => {
            tracing::warn!(%path, error = %err, "proxy request failed");
            Err(ProblemDetails::bad_gateway("Falha ao contatar a API da Câmara.").at(uri.path()))
        }
    }
}

/// `OpenAPI` documentation for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Câmara Explorer API",
        version = "1.0.0",
        description = "Read-only browsing of the Câmara dos Deputados open data, with plain-language explanations",
        license(name = "MIT")
    ),
    paths(
        health_check,
        list_proposicoes,
        list_deputados,
        get_proposicao,
        get_votacao,
        get_deputado,
        list_partidos,
        explain,
        proxy_camara
    ),
    components(schemas(
        ListPage,
        ListItem,
        ProposicaoView,
        ProposicaoDetalhes,
        StatusProposicao,
        EnrichedAutor,
        Autor,
        DeputadoDetalhes,
        UltimoStatus,
        Gabinete,
        Partido,
        VoteSummary,
        Votacao,
        VotoDeputado,
        DeputadoVotante,
        ExplainRequest,
        ExplainResponse,
        ErrorResponse,
        ProblemDetails,
        ProblemExtensions
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_details_serializes_correctly() {
        let problem = ProblemDetails::internal_error("Something went wrong");
        let json = serde_json::to_string(&problem).expect("serialize");
        assert!(json.contains("\"type\":"));
        assert!(json.contains("\"status\":500"));
        assert!(json.contains("INTERNAL_ERROR"));
    }

    #[test]
    fn upstream_errors_map_to_status() {
        let cases = [
            (CamaraApiError::NotFound("1".into()), StatusCode::NOT_FOUND),
            (
                CamaraApiError::Remote {
                    status: 500,
                    status_text: "Internal Server Error".into(),
                },
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ProblemDetails::from(err).status, expected);
        }
    }

    #[test]
    fn remote_error_detail_is_readable() {
        let problem = ProblemDetails::from(CamaraApiError::Remote {
            status: 500,
            status_text: "Internal Server Error".into(),
        });
        assert_eq!(problem.detail, "Erro na API (500): Internal Server Error");
    }

    #[test]
    fn explain_errors_map_to_status() {
        let cases = [
            (ExplainError::MissingInput, StatusCode::BAD_REQUEST),
            (ExplainError::Unavailable, StatusCode::SERVICE_UNAVAILABLE),
            (
                ExplainError::Generation(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn openapi_lists_every_endpoint() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/v1/proposicoes",
            "/api/v1/proposicoes/{id}",
            "/api/v1/proposicoes/{id}/votacao",
            "/api/v1/deputados",
            "/api/v1/deputados/{id}",
            "/api/v1/partidos",
            "/api/explain",
            "/api/camara/{path}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
