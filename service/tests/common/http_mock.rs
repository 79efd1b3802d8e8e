//! HTTP mock server helpers for testing outbound HTTP calls.
//!
//! This module provides a thin wrapper around `wiremock` for declarative
//! HTTP stubbing. Use it to mock the upstream open-data API (or the
//! generative-text API) in integration tests.
//!
//! # Quick Start
//!
//! ```ignore
//! use crate::common::http_mock::MockHttpServer;
//!
//! #[tokio::test]
//! async fn test_external_api_call() {
//!     let server = MockHttpServer::start().await;
//!
//!     server
//!         .expect_get("/proposicoes")
//!         .with_query("keywords", "saúde")
//!         .respond_with_json(json!({"dados": [], "links": []}))
//!         .mount()
//!         .await;
//!
//!     let client = HttpCamaraClient::new(server.url());
//! }
//! ```
//!
//! # Patterns
//!
//! - **Success response**: `.respond_with_json(value)` or `.respond_with_body(string, content_type)`
//! - **Error response**: `.respond_with_status(500)`, optionally `.with_json_response(value)`
//! - **Timeout simulation**: `.respond_with_delay(Duration::from_secs(30))`
//! - **Request verification**: `.expect_times(1)` then `server.verify().await`

#![allow(dead_code)]

use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A running stub server.
pub struct MockHttpServer {
    server: MockServer,
}

impl MockHttpServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL of the server, without trailing slash.
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Underlying wiremock server, for matchers this wrapper does not cover.
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    /// Panics if any mounted `expect_times` was not met.
    pub async fn verify(&self) {
        self.server.verify().await;
    }

    /// Requests received so far.
    pub async fn received_requests(&self) -> Vec<wiremock::Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    pub fn expect_get(&self, path: &str) -> StubBuilder<'_> {
        StubBuilder::new(&self.server, "GET", path)
    }

    pub fn expect_post(&self, path: &str) -> StubBuilder<'_> {
        StubBuilder::new(&self.server, "POST", path)
    }
}

enum StubBody {
    Json(Value),
    Raw(String, String),
}

/// Declarative stub; nothing is registered until [`StubBuilder::mount`].
pub struct StubBuilder<'a> {
    server: &'a MockServer,
    method: &'static str,
    path: String,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    status: u16,
    body: Option<StubBody>,
    delay: Option<Duration>,
    times: Option<u64>,
}

impl<'a> StubBuilder<'a> {
    fn new(server: &'a MockServer, method: &'static str, path: &str) -> Self {
        Self {
            server,
            method,
            path: path.to_string(),
            headers: Vec::new(),
            query: Vec::new(),
            status: 200,
            body: None,
            delay: None,
            times: None,
        }
    }

    /// Only match requests carrying this header value.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Only match requests with this (decoded) query parameter.
    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    pub fn respond_with_json(mut self, body: Value) -> Self {
        self.body = Some(StubBody::Json(body));
        self
    }

    pub fn respond_with_body(mut self, body: &str, content_type: &str) -> Self {
        self.body = Some(StubBody::Raw(body.to_string(), content_type.to_string()));
        self
    }

    pub fn respond_with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// JSON body for an error status set with `respond_with_status`.
    pub fn with_json_response(self, body: Value) -> Self {
        self.respond_with_json(body)
    }

    pub fn respond_with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn expect_times(mut self, times: u64) -> Self {
        self.times = Some(times);
        self
    }

    pub async fn mount(self) {
        let mut builder = Mock::given(method(self.method)).and(path(self.path.as_str()));
        for (name, value) in &self.headers {
            builder = builder.and(header(name.as_str(), value.as_str()));
        }
        for (name, value) in &self.query {
            builder = builder.and(query_param(name.as_str(), value.as_str()));
        }

        let mut template = ResponseTemplate::new(self.status);
        match self.body {
            Some(StubBody::Json(body)) => template = template.set_body_json(body),
            Some(StubBody::Raw(body, content_type)) => {
                template = template.set_body_raw(body.into_bytes(), &content_type);
            }
            None => {}
        }
        if let Some(delay) = self.delay {
            template = template.set_delay(delay);
        }

        let mut mock = builder.respond_with(template);
        if let Some(times) = self.times {
            mock = mock.expect(times);
        }
        mock.mount(self.server).await;
    }
}
