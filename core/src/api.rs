//! Asynchronous Pet resource client.
//!
//! # Design
//! `PetApi` pairs the stateless `PetClient` with a `Transport`. Every
//! operation builds a request, stamps configuration headers and merged
//! options onto it, executes it exactly once and parses the response. No
//! retries, no caching: transport and status failures reach the caller as
//! `ApiError`.

use std::sync::Arc;

use tracing::debug;

use crate::client::PetClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::options::RequestOptions;
use crate::transport::{Transport, UreqTransport};
use crate::types::{ApiResponse, Pet, PetStatus};

pub const DEFAULT_BASE_PATH: &str = "http://petstore.swagger.io/v2";

/// Client-wide settings shared by every request.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub base_path: String,
    pub user_agent: Option<String>,
    /// Sent as the `api_key` header.
    pub api_key: Option<String>,
    /// Sent as `Authorization: Bearer <token>`.
    pub access_token: Option<String>,
    /// Instance-level option defaults, overridden per call.
    pub base_options: RequestOptions,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            user_agent: Some(format!("petstore-core/{}", env!("CARGO_PKG_VERSION"))),
            api_key: None,
            access_token: None,
            base_options: RequestOptions::default(),
        }
    }
}

impl Configuration {
    pub fn new(base_path: &str) -> Self {
        Self {
            base_path: base_path.to_string(),
            ..Default::default()
        }
    }

    /// Read `PETSTORE_BASE_PATH`, `PETSTORE_API_KEY` and `PETSTORE_ACCESS_TOKEN`,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_path) = std::env::var("PETSTORE_BASE_PATH") {
            config.base_path = base_path;
        }
        config.api_key = std::env::var("PETSTORE_API_KEY").ok();
        config.access_token = std::env::var("PETSTORE_ACCESS_TOKEN").ok();
        config
    }
}

/// A parsed response together with its HTTP status and headers.
#[derive(Debug, Clone)]
pub struct ResponseContent<T> {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub data: T,
}

pub struct PetApi {
    config: Configuration,
    client: PetClient,
    transport: Arc<dyn Transport>,
}

impl PetApi {
    /// Client using a freshly built `UreqTransport`.
    pub fn new(config: Configuration) -> Self {
        Self::with_transport(config, Arc::new(UreqTransport::new()))
    }

    /// Client that sends every request through `transport`.
    pub fn with_transport(config: Configuration, transport: Arc<dyn Transport>) -> Self {
        let client = PetClient::new(&config.base_path);
        Self {
            config,
            client,
            transport,
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// `data` is `None` when the server accepts the pet without echoing it.
    pub async fn add_pet(
        &self,
        pet: &Pet,
        options: &RequestOptions,
    ) -> Result<ResponseContent<Option<Pet>>, ApiError> {
        let req = self.client.build_add_pet(pet)?;
        let resp = self.send(req, options).await?;
        respond(resp, |r| self.client.parse_add_pet(r))
    }

    pub async fn update_pet(
        &self,
        pet: &Pet,
        options: &RequestOptions,
    ) -> Result<ResponseContent<Option<Pet>>, ApiError> {
        let req = self.client.build_update_pet(pet)?;
        let resp = self.send(req, options).await?;
        respond(resp, |r| self.client.parse_update_pet(r))
    }

    pub async fn get_pet_by_id(&self, pet_id: i64, options: &RequestOptions) -> Result<ResponseContent<Pet>, ApiError> {
        let req = self.client.build_get_pet_by_id(pet_id);
        let resp = self.send(req, options).await?;
        respond(resp, |r| self.client.parse_get_pet_by_id(r))
    }

    /// `api_key` overrides the configured key for this call only.
    pub async fn delete_pet(
        &self,
        pet_id: i64,
        api_key: Option<&str>,
        options: &RequestOptions,
    ) -> Result<ResponseContent<()>, ApiError> {
        let req = self.client.build_delete_pet(pet_id, api_key);
        let resp = self.send(req, options).await?;
        respond(resp, |r| self.client.parse_delete_pet(r))
    }

    pub async fn find_pets_by_status(
        &self,
        statuses: &[PetStatus],
        options: &RequestOptions,
    ) -> Result<ResponseContent<Vec<Pet>>, ApiError> {
        let req = self.client.build_find_pets_by_status(statuses);
        let resp = self.send(req, options).await?;
        respond(resp, |r| self.client.parse_find_pets_by_status(r))
    }

    pub async fn update_pet_with_form(
        &self,
        pet_id: i64,
        name: Option<&str>,
        status: Option<PetStatus>,
        options: &RequestOptions,
    ) -> Result<ResponseContent<ApiResponse>, ApiError> {
        let req = self.client.build_update_pet_with_form(pet_id, name, status);
        let resp = self.send(req, options).await?;
        respond(resp, |r| self.client.parse_update_pet_with_form(r))
    }

    /// Upload `file` as the pet's image. A `None` content type is sent as
    /// `application/octet-stream`.
    pub async fn upload_file(
        &self,
        pet_id: i64,
        content_type: Option<&str>,
        additional_metadata: Option<&str>,
        file_name: &str,
        file: &[u8],
        options: &RequestOptions,
    ) -> Result<ResponseContent<ApiResponse>, ApiError> {
        let req = self
            .client
            .build_upload_file(pet_id, content_type, additional_metadata, file_name, file);
        let resp = self.send(req, options).await?;
        respond(resp, |r| self.client.parse_upload_file(r))
    }

    /// Precedence, lowest to highest: operation headers, configuration
    /// headers, `base_options` headers, call `options` headers. A multipart
    /// `content-type` is never replaced: it names the body's boundary.
    fn prepare(&self, mut req: HttpRequest, options: &RequestOptions) -> HttpRequest {
        if let Some(agent) = &self.config.user_agent {
            req.set_header("user-agent", agent);
        }
        if req.header("api_key").is_none() {
            if let Some(key) = &self.config.api_key {
                req.set_header("api_key", key);
            }
        }
        if let Some(token) = &self.config.access_token {
            req.set_header("authorization", &format!("Bearer {token}"));
        }

        let multipart = req
            .header("content-type")
            .is_some_and(|ct| ct.starts_with("multipart/"));
        let merged = self.config.base_options.merge(options);
        for (name, value) in &merged.headers {
            if multipart && name == "content-type" {
                continue;
            }
            req.set_header(name, value);
        }
        req.options = merged;
        req
    }

    async fn send(&self, req: HttpRequest, options: &RequestOptions) -> Result<HttpResponse, ApiError> {
        let req = self.prepare(req, options);
        debug!(method = %req.method, path = %req.path, "sending request");
        let resp = self.transport.execute(req).await?;
        debug!(status = resp.status, bytes = resp.body.len(), "received response");
        Ok(resp)
    }
}

fn respond<T>(
    resp: HttpResponse,
    parse: impl FnOnce(HttpResponse) -> Result<T, ApiError>,
) -> Result<ResponseContent<T>, ApiError> {
    let status = resp.status;
    let headers = resp.headers.clone();
    let data = parse(resp)?;
    Ok(ResponseContent { status, headers, data })
}
