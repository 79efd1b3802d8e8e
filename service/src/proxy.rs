//! Pass-through to the upstream open-data API.
//!
//! `/api/camara/<path>?<query>` is forwarded as `GET {base}/<path>?<query>`
//! with path and query untouched. Status, content type and body come back
//! as the upstream sent them.

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Upstream response relayed to the caller.
#[derive(Debug)]
pub struct ProxiedResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Vec<u8>,
}

impl IntoResponse for ProxiedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        if let Some(content_type) = self.content_type {
            response.headers_mut().insert(CONTENT_TYPE, content_type);
        }
        response
    }
}

#[derive(Clone)]
pub struct UpstreamProxy {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamProxy {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Target URL for a proxied path and raw query string.
    #[must_use]
    pub fn target_url(&self, path: &str, query: Option<&str>) -> String {
        let path = path.trim_start_matches('/');
        match query.filter(|q| !q.is_empty()) {
            Some(query) => format!("{}/{path}?{query}", self.base_url),
            None => format!("{}/{path}", self.base_url),
        }
    }

    /// Forward one GET request.
    ///
    /// # Errors
    ///
    /// Returns the transport error when the upstream cannot be reached or
    /// the body cannot be read. Upstream error statuses are not errors here.
    pub async fn forward(
        &self,
        path: &str,
        query: Option<&str>,
    ) -> Result<ProxiedResponse, reqwest::Error> {
        let url = self.target_url(path, query);
        tracing::debug!(%url, "proxying upstream request");

        let response = self.client.get(&url).send().await?;
        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| HeaderValue::from_bytes(value.as_bytes()).ok());
        let body = response.bytes().await?.to_vec();

        Ok(ProxiedResponse {
            status,
            content_type,
            body,
        })
    }
}
