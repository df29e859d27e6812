//! Per-call request options.
//!
//! # Design
//! Options are an explicit structure with named fields for the keys every
//! transport understands the meaning of, plus an open `extra` map that is
//! carried through verbatim. `Configuration::base_options` holds the
//! instance-level defaults; `merge` overlays call-level values on top, field
//! by field, with the call winning.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Whether a browser-style transport should send credentials.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Credentials {
    Omit,
    SameOrigin,
    Include,
}

/// Cross-origin mode for a browser-style transport.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    Cors,
    NoCors,
    SameOrigin,
    Navigate,
}

/// Options merged into a single request.
///
/// Header names are compared case-insensitively and stored lowercase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<RequestMode>,
    /// Whole-request timeout in milliseconds.
    #[serde(rename = "timeout", default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Any other key, passed to the transport untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a free-form options bag such as `{"credentials":"include","mode":"cors"}`.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ApiError> {
        let mut options: RequestOptions =
            serde_json::from_value(value).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        options.headers = lowercase_keys(std::mem::take(&mut options.headers));
        Ok(options)
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn mode(mut self, mode: RequestMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn extra(mut self, key: &str, value: serde_json::Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn is_empty(&self) -> bool {
        *self == RequestOptions::default()
    }

    /// Overlay `overrides` on top of `self`. Values set in `overrides` win.
    pub fn merge(&self, overrides: &RequestOptions) -> RequestOptions {
        let mut headers = lowercase_keys(self.headers.clone());
        headers.extend(lowercase_keys(overrides.headers.clone()));

        let mut extra = self.extra.clone();
        extra.extend(overrides.extra.iter().map(|(k, v)| (k.clone(), v.clone())));

        RequestOptions {
            credentials: overrides.credentials.or(self.credentials),
            mode: overrides.mode.or(self.mode),
            timeout_ms: overrides.timeout_ms.or(self.timeout_ms),
            headers,
            extra,
        }
    }
}

fn lowercase_keys(headers: BTreeMap<String, String>) -> BTreeMap<String, String> {
    headers
        .into_iter()
        .map(|(k, v)| (k.to_ascii_lowercase(), v))
        .collect()
}
