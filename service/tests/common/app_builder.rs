//! Router factory for HTTP tests.
//!
//! [`TestAppBuilder`] assembles the router through `http::router` and
//! `http::cors_layer`, the same functions `main.rs` calls, with mock
//! collaborators plugged in:
//!
//! ```ignore
//! let camara = Arc::new(MockCamaraClient::new());
//! camara.insert_deputado(fixtures::deputado_detalhes(1, "PT", "BA"));
//!
//! let response = TestAppBuilder::minimal()
//!     .with_camara(camara.clone())
//!     .build()
//!     .oneshot(request)
//!     .await?;
//! ```
//!
//! `minimal()` has no generator, no CORS layer and no Swagger.
//! `with_mocks()` adds a canned generator, Swagger and a localhost origin.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use camara_explorer_api::{
    camara::{mock::MockCamaraClient, CamaraApiClient},
    config::CorsConfig,
    explain::{
        mock::MockTextGenerator, ExplainService, ExplanationCache, InMemoryCache, TextGenerator,
        DEFAULT_CACHE_TTL,
    },
    http::{cors_layer, router},
    proxy::UpstreamProxy,
    rest::{ApiDoc, AppState},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub struct TestAppBuilder {
    camara: Arc<dyn CamaraApiClient>,
    generator: Option<Arc<dyn TextGenerator>>,
    cache: Arc<dyn ExplanationCache>,
    /// Where `/api/camara/*` forwards; defaults to a closed port.
    upstream_url: String,
    /// `None` leaves the CORS layer off entirely.
    cors_origins: Option<Vec<String>>,
    include_swagger: bool,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppBuilder {
    /// Create a builder with an empty mock upstream and no generator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            camara: Arc::new(MockCamaraClient::new()),
            generator: None,
            cache: Arc::new(InMemoryCache::new()),
            upstream_url: "http://127.0.0.1:9".to_string(),
            cors_origins: None,
            include_swagger: false,
        }
    }

    #[must_use]
    pub fn minimal() -> Self {
        Self::new()
    }

    #[must_use]
    pub fn with_mocks() -> Self {
        Self::new()
            .with_generator(Arc::new(MockTextGenerator::answering(
                "Esta proposta muda as regras.",
            )))
            .with_swagger()
            .with_cors(&["http://localhost:3000"])
    }

    #[must_use]
    pub fn with_camara(mut self, client: Arc<dyn CamaraApiClient>) -> Self {
        self.camara = client;
        self
    }

    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn ExplanationCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Point the `/api/camara/*` proxy at a stub server.
    #[must_use]
    pub fn with_upstream_url(mut self, url: &str) -> Self {
        self.upstream_url = url.to_string();
        self
    }

    #[must_use]
    pub fn with_swagger(mut self) -> Self {
        self.include_swagger = true;
        self
    }

    /// `&[]` blocks every cross-origin request, `&["*"]` allows all.
    #[must_use]
    pub fn with_cors(mut self, origins: &[&str]) -> Self {
        self.cors_origins = Some(origins.iter().map(|s| (*s).to_string()).collect());
        self
    }

    /// Router with state, optional Swagger, then CORS outermost.
    pub fn build(self) -> Router {
        let state = AppState {
            camara: self.camara,
            explain: ExplainService::new(self.generator, self.cache, DEFAULT_CACHE_TTL),
            proxy: UpstreamProxy::new(reqwest::Client::new(), self.upstream_url),
        };

        let mut app = router(state);
        if self.include_swagger {
            app = app.merge(
                SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
            );
        }
        if let Some(allowed_origins) = self.cors_origins {
            app = app.layer(cors_layer(&CorsConfig { allowed_origins }));
        }
        app
    }
}
