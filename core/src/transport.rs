//! Pluggable HTTP transport.
//!
//! # Design
//! A `Transport` turns an `HttpRequest` into an `HttpResponse`. Non-2xx
//! statuses come back as data so `PetClient` can interpret them; only failures
//! that prevent a response from existing are errors. `UreqTransport` is the
//! default and runs ureq's blocking agent on tokio's blocking pool.

use async_trait::async_trait;
use tracing::trace;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Default transport backed by a `ureq::Agent`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    /// Agent with ureq's status-code-as-error behavior disabled.
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Use a pre-configured agent. It should have `http_status_as_error(false)`
    /// or 4xx/5xx responses surface as `TransportError` instead of statuses.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
            .await
            .map_err(|e| TransportError::Task(e.to_string()))?
    }
}

fn execute_blocking(agent: &ureq::Agent, req: HttpRequest) -> Result<HttpResponse, TransportError> {
    let options = &req.options;
    if options.credentials.is_some() || options.mode.is_some() || !options.extra.is_empty() {
        trace!(
            credentials = ?options.credentials,
            mode = ?options.mode,
            extra = ?options.extra,
            "passing through browser-only request options"
        );
    }

    let result = match (req.method, req.body.as_deref()) {
        (HttpMethod::Get, _) => prepare(agent.get(&req.path), &req).call(),
        (HttpMethod::Delete, _) => prepare(agent.delete(&req.path), &req).call(),
        (HttpMethod::Post, Some(body)) => prepare(agent.post(&req.path), &req).send(body),
        (HttpMethod::Post, None) => prepare(agent.post(&req.path), &req).send_empty(),
        (HttpMethod::Put, Some(body)) => prepare(agent.put(&req.path), &req).send(body),
        (HttpMethod::Put, None) => prepare(agent.put(&req.path), &req).send_empty(),
    };
    let mut response = result.map_err(|e| TransportError::Request(e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| TransportError::Request(e.to_string()))?;

    Ok(HttpResponse { status, headers, body })
}

fn prepare<B>(mut builder: ureq::RequestBuilder<B>, req: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (name, value) in &req.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(timeout) = req.options.timeout_duration() {
        builder = builder.config().timeout_global(Some(timeout)).build();
    }
    builder
}
