#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

use std::{sync::Arc, time::Duration};

use camara_explorer_api::{
    camara::{CamaraApiClient, HttpCamaraClient},
    config::Config,
    explain::{ExplainService, ExplanationCache, InMemoryCache, RedisCache, TextGenerator},
    http::{cors_layer, router},
    proxy::UpstreamProxy,
    rest::{ApiDoc, AppState},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn explanation_cache(config: &Config) -> Result<Arc<dyn ExplanationCache>, anyhow::Error> {
    if let Some(url) = config.explain.redis_url.as_deref().filter(|u| !u.is_empty()) {
        tracing::info!("Explanation cache: redis");
        Ok(Arc::new(RedisCache::new(url)?))
    } else {
        tracing::info!("Explanation cache: in-memory");
        Ok(Arc::new(InMemoryCache::new()))
    }
}

fn text_generator(config: &Config, http: &reqwest::Client) -> Option<Arc<dyn TextGenerator>> {
    let Some(api_key) = config.explain.api_key() else {
        tracing::warn!("explain.api_key not set - /api/explain will answer 503");
        return None;
    };
    tracing::info!(model = %config.explain.model, "Explanation generator configured");
    Some(Arc::new(ce_llm::GeminiClient::with_client(
        http.clone(),
        &config.explain.base_url,
        api_key,
        &config.explain.model,
    )))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load and validate configuration first (fail-fast)
    let config = Config::load().map_err(|e| anyhow::anyhow!("{e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.level)?)
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "camara-explorer-api starting up"
    );

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.upstream.timeout_secs))
        .build()?;

    tracing::info!(base_url = %config.upstream.base_url, page_size = config.upstream.page_size, "Upstream API configured");
    let camara: Arc<dyn CamaraApiClient> = Arc::new(
        HttpCamaraClient::with_client(http.clone(), &config.upstream.base_url)
            .with_page_size(config.upstream.page_size),
    );

    let explain = ExplainService::new(
        text_generator(&config, &http),
        explanation_cache(&config)?,
        Duration::from_secs(config.explain.cache_ttl_secs),
    );

    let state = AppState {
        camara,
        explain,
        proxy: UpstreamProxy::new(http, &config.upstream.base_url),
    };

    let mut app = router(state);
    if config.swagger.enabled {
        tracing::info!("Swagger UI enabled at /swagger-ui");
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }
    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config.cors)),
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
