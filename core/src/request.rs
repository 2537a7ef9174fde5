//! A single API call: configure, build, dispatch, parse.
//!
//! # Design
//! `ApiRequest` is a consuming builder. `timeout` and `send` overwrite the
//! previous value and hand the request back; `fetch` takes the request by
//! value, so a request is dispatched at most once.
//!
//! Dispatch is split like the rest of the crate: `build` produces a plain
//! `HttpRequest`, a `Transport` performs the I/O, and `parse` turns the
//! `HttpResponse` into a typed `ApiResponse`. `build` and `parse` never touch
//! the network and can be driven by any host.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::converter::ConverterSet;
use crate::error::FetchError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query;
use crate::schema::ResponseBody;
use crate::transport::Transport;

/// Timeout applied to every new request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Content type of every request that carries a body.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// A resolved request: the HTTP status and the decoded body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<B> {
    pub code: u16,
    pub body: B,
}

/// One call against an endpoint, created by `ApiClient`.
#[derive(Debug)]
pub struct ApiRequest<Req = Value, Res = Value> {
    method: HttpMethod,
    uri: String,
    with_credentials: bool,
    timeout: Duration,
    converters: Arc<ConverterSet>,
    data: Option<Req>,
    response: PhantomData<fn() -> Res>,
}

impl<Req, Res> ApiRequest<Req, Res>
where
    Req: Serialize,
    Res: ResponseBody,
{
    pub(crate) fn new(
        method: HttpMethod,
        uri: String,
        with_credentials: bool,
        converters: Arc<ConverterSet>,
    ) -> Self {
        Self {
            method,
            uri,
            with_credentials,
            timeout: DEFAULT_TIMEOUT,
            converters,
            data: None,
            response: PhantomData,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn with_credentials(&self) -> bool {
        self.with_credentials
    }

    pub fn timeout_duration(&self) -> Duration {
        self.timeout
    }

    pub fn payload(&self) -> Option<&Req> {
        self.data.as_ref()
    }

    /// Set the transport timeout, replacing any earlier value.
    ///
    /// `Duration::ZERO` disables the timeout: the request may stay
    /// outstanding for as long as the transport allows.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the payload, replacing any earlier value.
    pub fn send(mut self, data: Req) -> Self {
        self.data = Some(data);
        self
    }

    /// Encode the payload and describe the HTTP request to perform.
    ///
    /// GET requests carry the payload in the URI and have no body. Every
    /// other method sends the JSON wire payload (`null` when none was set)
    /// with a JSON content type.
    pub fn build(&self) -> Result<HttpRequest, FetchError> {
        let payload = self
            .data
            .as_ref()
            .map(|data| self.converters.to_payload(data))
            .transpose()
            .map_err(|e| FetchError::Encode(e.to_string()))?;

        let (url, headers, body) = match (self.method, payload) {
            (HttpMethod::Get, None) => (self.uri.clone(), Vec::new(), None),
            (HttpMethod::Get, Some(payload)) => {
                let url = query::append_payload(&self.uri, &payload)
                    .map_err(|e| FetchError::Encode(e.to_string()))?;
                (url, Vec::new(), None)
            }
            (_, payload) => {
                let body = serde_json::to_string(&payload.unwrap_or(Value::Null))
                    .map_err(|e| FetchError::Encode(e.to_string()))?;
                (
                    self.uri.clone(),
                    vec![("content-type".to_string(), JSON_CONTENT_TYPE.to_string())],
                    Some(body),
                )
            }
        };

        Ok(HttpRequest {
            method: self.method,
            url,
            headers,
            body,
            timeout: self.timeout,
            with_credentials: self.with_credentials,
        })
    }

    /// Decode a response: JSON parse, converter chain, then the body type
    /// declared for the status code. Any status resolves.
    pub fn parse(&self, response: HttpResponse) -> Result<ApiResponse<Res>, FetchError> {
        let wire: Value =
            serde_json::from_slice(&response.body).map_err(|e| FetchError::Json(e.to_string()))?;
        let decoded = self
            .converters
            .decode_value(wire)
            .map_err(|e| FetchError::Json(e.to_string()))?;
        let body =
            Res::from_wire(response.status, decoded).map_err(|e| FetchError::Json(e.to_string()))?;
        Ok(ApiResponse {
            code: response.status,
            body,
        })
    }

    /// Dispatch the request through `transport` and wait for the outcome.
    pub async fn fetch<T: Transport>(self, transport: &T) -> Result<ApiResponse<Res>, FetchError> {
        let request = self.build()?;
        debug!(
            method = %request.method,
            url = %request.url,
            timeout = ?request.timeout,
            "dispatching request"
        );

        let outcome = match transport.execute(request).await {
            Ok(response) => self.parse(response),
            Err(err) => Err(FetchError::from(err)),
        };

        match &outcome {
            Ok(response) => debug!(uri = %self.uri, code = response.code, "request resolved"),
            Err(err) => warn!(uri = %self.uri, reason = ?err.reason(), error = %err, "request rejected"),
        }
        outcome
    }
}
