//! Executing `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the only I/O seam in the crate. `UreqTransport` is the
//! production implementation: it builds a fresh `ureq` agent per request, so
//! no connection state is shared between requests, and runs the blocking
//! call on tokio's blocking pool so `ApiRequest::fetch` stays non-blocking.
//!
//! Status codes are returned as data, never as errors; only timeouts and
//! transport failures surface as `TransportError`.

use std::future::Future;
use std::time::Duration;

use tracing::trace;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip.
///
/// Implementations must apply `request.timeout`, attach credentials only when
/// `request.with_credentials` is set, and report exactly one outcome.
pub trait Transport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// `ureq`-backed transport.
///
/// Credential headers (for example `authorization` or `cookie`) registered
/// with [`UreqTransport::with_credential`] are sent only on requests opened
/// with credentials.
#[derive(Debug, Clone, Default)]
pub struct UreqTransport {
    credentials: Vec<(String, String)>,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.credentials.push((name.into(), value.into()));
        self
    }
}

impl Transport for UreqTransport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        let credentials = if request.with_credentials {
            self.credentials.clone()
        } else {
            Vec::new()
        };
        async move {
            tokio::task::spawn_blocking(move || execute_blocking(request, &credentials))
                .await
                .map_err(|e| TransportError::Error(e.to_string()))?
        }
    }
}

fn execute_blocking(
    request: HttpRequest,
    credentials: &[(String, String)],
) -> Result<HttpResponse, TransportError> {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(global_timeout(request.timeout))
        .build()
        .new_agent();

    let headers: Vec<&(String, String)> = request.headers.iter().chain(credentials).collect();
    let url = request.url.as_str();
    let body = request.body.as_deref().unwrap_or("null").as_bytes();
    trace!(method = %request.method, url, headers = headers.len(), "executing with ureq");

    let result = match request.method {
        HttpMethod::Get => with_headers(agent.get(url), &headers).call(),
        HttpMethod::Post => with_headers(agent.post(url), &headers).send(body),
        HttpMethod::Put => with_headers(agent.put(url), &headers).send(body),
        HttpMethod::Patch => with_headers(agent.patch(url), &headers).send(body),
        HttpMethod::Delete => with_headers(agent.delete(url), &headers)
            .force_send_body()
            .send(body),
    };

    let mut response = result.map_err(map_error)?;
    let status = response.status().as_u16();
    let response_headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    // Decoding is left to `ApiRequest::parse`; only I/O can fail here.
    let body = response
        .body_mut()
        .with_config()
        .limit(u64::MAX)
        .read_to_vec()
        .map_err(map_error)?;

    Ok(HttpResponse {
        status,
        headers: response_headers,
        body,
    })
}

/// A zero timeout means "no timeout", as with `XMLHttpRequest.timeout`.
fn global_timeout(timeout: Duration) -> Option<Duration> {
    (!timeout.is_zero()).then_some(timeout)
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[&(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn map_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        other => TransportError::Error(other.to_string()),
    }
}
