//! Request factory for one API surface.
//!
//! # Design
//! `ApiClient` holds the server address and the shared converter chain and
//! nothing else. Every request it opens captures a copy of the address and a
//! handle to the (immutable) converters, so changing the address later never
//! affects requests that already exist.

use std::sync::Arc;

use serde_json::Value;

use crate::converter::ConverterSet;
use crate::http::HttpMethod;
use crate::request::ApiRequest;
use crate::schema::Endpoint;

#[derive(Debug, Clone, Default)]
pub struct ApiClient {
    uri_prefix: String,
    converters: Arc<ConverterSet>,
}

impl ApiClient {
    pub fn new(converters: ConverterSet) -> Self {
        Self {
            uri_prefix: String::new(),
            converters: Arc::new(converters),
        }
    }

    /// Prefix every subsequently opened endpoint with `address`.
    pub fn custom_server_address(&mut self, address: impl Into<String>) -> &mut Self {
        self.uri_prefix = address.into();
        self
    }

    pub fn server_address(&self) -> &str {
        &self.uri_prefix
    }

    pub fn converters(&self) -> &ConverterSet {
        &self.converters
    }

    /// Open an untyped request that includes credentials.
    ///
    /// Any endpoint and method are accepted; nothing is validated here.
    pub fn open(&self, endpoint: &str, method: HttpMethod) -> ApiRequest {
        self.open_with_credentials(endpoint, method, true)
    }

    pub fn open_with_credentials(
        &self,
        endpoint: &str,
        method: HttpMethod,
        with_credentials: bool,
    ) -> ApiRequest<Value, Value> {
        self.request(endpoint, method, with_credentials)
    }

    /// Open a typed request for `E`, including credentials.
    pub fn endpoint<E: Endpoint>(&self) -> ApiRequest<E::Request, E::Response> {
        self.endpoint_with_credentials::<E>(true)
    }

    pub fn endpoint_with_credentials<E: Endpoint>(
        &self,
        with_credentials: bool,
    ) -> ApiRequest<E::Request, E::Response> {
        self.request(E::PATH, E::METHOD, with_credentials)
    }

    fn request<Req, Res>(
        &self,
        endpoint: &str,
        method: HttpMethod,
        with_credentials: bool,
    ) -> ApiRequest<Req, Res>
    where
        Req: serde::Serialize,
        Res: crate::schema::ResponseBody,
    {
        ApiRequest::new(
            method,
            format!("{}{endpoint}", self.uri_prefix),
            with_credentials,
            Arc::clone(&self.converters),
        )
    }
}
