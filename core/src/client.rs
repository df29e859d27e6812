//! Stateless HTTP request builder and response parser for the Pet API.
//!
//! # Design
//! `PetClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! `PetApi` glues the two together around a `Transport`; callers that want to
//! drive the I/O themselves can use this type directly.

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::MultipartForm;
use crate::types::{ApiResponse, Pet, PetStatus};

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";

/// Synchronous, stateless client for the Pet API.
#[derive(Debug, Clone)]
pub struct PetClient {
    base_url: String,
}

impl PetClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_add_pet(&self, pet: &Pet) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, format!("{}/pet", self.base_url), pet)
    }

    pub fn build_update_pet(&self, pet: &Pet) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, format!("{}/pet", self.base_url), pet)
    }

    pub fn build_get_pet_by_id(&self, pet_id: i64) -> HttpRequest {
        let mut req = HttpRequest::new(HttpMethod::Get, format!("{}/pet/{pet_id}", self.base_url));
        req.set_header("accept", JSON);
        req
    }

    pub fn build_delete_pet(&self, pet_id: i64, api_key: Option<&str>) -> HttpRequest {
        let mut req = HttpRequest::new(HttpMethod::Delete, format!("{}/pet/{pet_id}", self.base_url));
        if let Some(key) = api_key {
            req.set_header("api_key", key);
        }
        req
    }

    pub fn build_find_pets_by_status(&self, statuses: &[PetStatus]) -> HttpRequest {
        let joined = statuses
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("status", &joined)
            .finish();
        let mut req = HttpRequest::new(
            HttpMethod::Get,
            format!("{}/pet/findByStatus?{query}", self.base_url),
        );
        req.set_header("accept", JSON);
        req
    }

    pub fn build_update_pet_with_form(
        &self,
        pet_id: i64,
        name: Option<&str>,
        status: Option<PetStatus>,
    ) -> HttpRequest {
        let mut form = form_urlencoded::Serializer::new(String::new());
        if let Some(name) = name {
            form.append_pair("name", name);
        }
        if let Some(status) = status {
            form.append_pair("status", status.as_str());
        }
        let mut req = HttpRequest::new(HttpMethod::Post, format!("{}/pet/{pet_id}", self.base_url));
        req.set_header("content-type", FORM);
        req.body = Some(form.finish().into_bytes());
        req
    }

    /// Build a multipart upload. `content_type` applies to the file part and
    /// falls back to `application/octet-stream` when `None`.
    pub fn build_upload_file(
        &self,
        pet_id: i64,
        content_type: Option<&str>,
        additional_metadata: Option<&str>,
        file_name: &str,
        file: &[u8],
    ) -> HttpRequest {
        self.build_upload_file_with_form(
            MultipartForm::new(),
            pet_id,
            content_type,
            additional_metadata,
            file_name,
            file,
        )
    }

    /// Same as `build_upload_file`, encoding into a caller-supplied (empty)
    /// form so the boundary is fixed.
    pub fn build_upload_file_with_form(
        &self,
        mut form: MultipartForm,
        pet_id: i64,
        content_type: Option<&str>,
        additional_metadata: Option<&str>,
        file_name: &str,
        file: &[u8],
    ) -> HttpRequest {
        if let Some(metadata) = additional_metadata {
            form = form.text("additionalMetadata", metadata);
        }
        let form = form.file("file", file_name, content_type, file);

        let mut req = HttpRequest::new(
            HttpMethod::Post,
            format!("{}/pet/{pet_id}/uploadImage", self.base_url),
        );
        req.set_header("content-type", &form.content_type());
        req.set_header("accept", JSON);
        req.body = Some(form.into_body());
        req
    }

    /// `None` when the server acknowledged the create without echoing the pet.
    pub fn parse_add_pet(&self, response: HttpResponse) -> Result<Option<Pet>, ApiError> {
        check_status(&response)?;
        decode_optional(&response.body)
    }

    /// `None` when the server acknowledged the update without a body.
    pub fn parse_update_pet(&self, response: HttpResponse) -> Result<Option<Pet>, ApiError> {
        check_status(&response)?;
        decode_optional(&response.body)
    }

    pub fn parse_get_pet_by_id(&self, response: HttpResponse) -> Result<Pet, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_delete_pet(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)?;
        Ok(())
    }

    pub fn parse_find_pets_by_status(&self, response: HttpResponse) -> Result<Vec<Pet>, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_update_pet_with_form(&self, response: HttpResponse) -> Result<ApiResponse, ApiError> {
        check_status(&response)?;
        decode_or_default(&response.body)
    }

    pub fn parse_upload_file(&self, response: HttpResponse) -> Result<ApiResponse, ApiError> {
        check_status(&response)?;
        decode_or_default(&response.body)
    }

    fn json_request<T: Serialize>(
        &self,
        method: HttpMethod,
        path: String,
        body: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_vec(body).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let mut req = HttpRequest::new(method, path);
        req.set_header("content-type", JSON);
        req.body = Some(body);
        Ok(req)
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

fn decode_optional<T: DeserializeOwned>(body: &str) -> Result<Option<T>, ApiError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    decode(body).map(Some)
}

fn decode_or_default<T: DeserializeOwned + Default>(body: &str) -> Result<T, ApiError> {
    if body.trim().is_empty() {
        return Ok(T::default());
    }
    decode(body)
}
