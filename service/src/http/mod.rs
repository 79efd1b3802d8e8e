//! Router assembly and HTTP middleware shared by the server and tests.

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::CorsConfig;
use crate::rest::{self, AppState};

/// All application routes with their state attached.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(rest::health_check))
        .route("/api/v1/proposicoes", get(rest::list_proposicoes))
        .route("/api/v1/proposicoes/{id}", get(rest::get_proposicao))
        .route("/api/v1/proposicoes/{id}/votacao", get(rest::get_votacao))
        .route("/api/v1/deputados", get(rest::list_deputados))
        .route("/api/v1/deputados/{id}", get(rest::get_deputado))
        .route("/api/v1/partidos", get(rest::list_partidos))
        .route("/api/explain", post(rest::explain))
        .route("/api/camara/{*path}", get(rest::proxy_camara))
        .with_state(state)
}

/// Build the CORS layer from configuration.
///
/// `"*"` allows any origin; an empty list blocks cross-origin requests.
#[must_use]
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = &config.allowed_origins;
    let allow_origin: AllowOrigin = if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow any origin - not recommended for production");
        AllowOrigin::any()
    } else if origins.is_empty() {
        tracing::info!("CORS allowed origins not configured - cross-origin requests will be blocked");
        AllowOrigin::list(Vec::<HeaderValue>::new())
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        tracing::info!(origins = ?origins, "CORS allowed origins configured");
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(allow_origin)
}
