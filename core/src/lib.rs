//! Typed JSON API client core.
//!
//! # Overview
//! An `ApiClient` opens `ApiRequest`s against endpoints. A request serializes
//! its payload through the client's converter chain, is dispatched through a
//! `Transport`, and resolves to an `ApiResponse { code, body }` whose body
//! type is chosen by status code, or rejects with a `FetchError`.
//!
//! # Design
//! - `ApiClient` holds only the server address and the converters.
//! - Dispatch is split into `build` (produces an `HttpRequest`), a
//!   `Transport` round-trip, and `parse` (consumes an `HttpResponse`), so the
//!   I/O boundary is explicit and the first and last steps are pure.
//! - GET payloads travel as a base64url JSON blob in the `payload` query
//!   parameter; other methods send a JSON body.
//! - Schemas are expressed with the `Endpoint` trait and the `responses!`
//!   macro instead of being derived by the compiler.

pub mod client;
pub mod converter;
pub mod error;
pub mod http;
pub mod query;
pub mod request;
pub mod schema;
pub mod transport;

pub use client::ApiClient;
pub use converter::{BoxError, ConvertError, Converter, ConverterSet};
pub use error::{FailureReason, FetchError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use request::{ApiRequest, ApiResponse, DEFAULT_TIMEOUT, JSON_CONTENT_TYPE};
pub use schema::{Endpoint, ResponseBody};
pub use transport::{Transport, UreqTransport};

#[doc(hidden)]
pub mod __private {
    pub use serde_json::{from_value, Error, Value};
}
