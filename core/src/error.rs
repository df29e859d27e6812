//! Error types for the Pet API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers distinguish "the pet
//! does not exist" from "the server returned an unexpected status." All other
//! non-2xx responses land in `HttpError` with the raw status code and body.
//! Network-level failures come from the transport and are wrapped as-is.

use thiserror::Error;

/// Errors raised by a `Transport` before any HTTP status is available.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The blocking task running the request panicked or was cancelled.
    #[error("transport task failed: {0}")]
    Task(String),
}

/// Errors returned by `PetClient` parse methods and `PetApi` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404: the requested pet does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
