//! Asynchronous API client core for the Pet service.
//!
//! # Overview
//! `PetClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network. `PetApi` runs those requests through a
//! pluggable `Transport`, merging per-call `RequestOptions` over the
//! instance defaults in `Configuration`.
//!
//! # Design
//! - `PetClient` is stateless: it holds only the base URL.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - `PetApi::new` constructs the default `UreqTransport`;
//!   `PetApi::with_transport` uses the supplied transport for every request.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod multipart;
pub mod options;
pub mod transport;
pub mod types;

pub use api::{Configuration, PetApi, ResponseContent};
pub use client::PetClient;
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use options::{Credentials, RequestMode, RequestOptions};
pub use transport::{Transport, UreqTransport};
pub use types::{ApiResponse, Category, Pet, PetStatus, Tag};
