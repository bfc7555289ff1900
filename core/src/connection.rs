// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt::{Debug, Display, Formatter};

use bytes::Bytes;
use http::header::HeaderName;
use http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use log::debug;

use crate::{Context, Error, ErrorKind, ErrorResponse, HttpSend, ProviderError, Result};

/// Endpoint is where a connection points to.
///
/// It's resolved once when a service is built and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// `http` or `https`.
    pub scheme: String,
    /// Host name without port.
    pub host: String,
    /// Port to connect to.
    pub port: u16,
    /// Base path, always starts with `/`.
    pub path: String,
}

impl Endpoint {
    /// Create a new endpoint.
    pub fn new(scheme: &str, host: &str, port: u16, path: &str) -> Self {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            port,
            path,
        }
    }

    /// Parse an endpoint from an url like `https://host:port/base`.
    ///
    /// Port defaults to the scheme's well known port.
    pub fn parse(url: &str) -> Result<Self> {
        let uri: Uri = url.parse().map_err(|e| {
            Error::config_invalid(format!("endpoint {url} is not a valid url")).with_source(e)
        })?;

        let scheme = uri.scheme_str().unwrap_or("https");
        let Some(host) = uri.host() else {
            return Err(Error::config_invalid(format!(
                "endpoint {url} doesn't contain a host"
            )));
        };
        let port = uri.port_u16().unwrap_or(default_port(scheme));

        Ok(Self::new(scheme, host, port, uri.path()))
    }

    /// Resolve the request path against the base path.
    ///
    /// - `None` means the base path itself.
    /// - A path starting with `/` replaces the base path.
    /// - Other paths are appended to the base path.
    pub fn resolve_path(&self, path: Option<&str>) -> String {
        match path {
            None => self.path.clone(),
            Some(p) if p.starts_with('/') => p.to_string(),
            Some(p) => format!("{}/{}", self.path.trim_end_matches('/'), p),
        }
    }

    /// Build the full url for given path.
    pub fn url(&self, path: Option<&str>) -> String {
        let path = self.resolve_path(path);
        if self.port == default_port(&self.scheme) {
            format!("{}://{}{}", self.scheme, self.host, path)
        } else {
            format!("{}://{}:{}{}", self.scheme, self.host, self.port, path)
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url(None))
    }
}

fn default_port(scheme: &str) -> u16 {
    match scheme {
        "http" => 80,
        _ => 443,
    }
}

/// Request describes one call made through a [`Connection`].
///
/// It's built by the service operation and consumed by the connection.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: Option<String>,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
    expects: Vec<StatusCode>,
    idempotent: bool,
}

impl Request {
    /// Create a new request which expects `200 OK`.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            path: None,
            query: None,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            expects: vec![StatusCode::OK],
            idempotent: false,
        }
    }

    /// Override the connection's base path for this request.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set an already encoded query string.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Insert a header, replacing the connection's default with the same name.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Set the status codes this request accepts.
    pub fn with_expects(mut self, expects: &[StatusCode]) -> Self {
        self.expects = expects.to_vec();
        self
    }

    /// Mark whether this request is safe to send again.
    ///
    /// The connection never retries by itself. Callers with a retry policy
    /// read this back through [`Error::is_temporary`].
    pub fn with_idempotent(mut self, idempotent: bool) -> Self {
        self.idempotent = idempotent;
        self
    }

    /// HTTP method of this request.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path override of this request.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Encoded query of this request.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Headers of this request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Body of this request.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Expected status codes.
    pub fn expects(&self) -> &[StatusCode] {
        &self.expects
    }

    /// Whether this request is idempotent.
    pub fn is_idempotent(&self) -> bool {
        self.idempotent
    }
}

/// Parses a provider specific error body.
pub type ParseError = fn(&[u8]) -> Option<ProviderError>;

/// Connection owns the transport handle towards one endpoint.
///
/// In persistent mode the handle is kept between requests and dialed lazily.
/// Otherwise a handle is dialed for every request and dropped afterwards.
///
/// A connection is not meant to be shared: every call takes `&mut self`, so
/// callers that need concurrency should build one connection per task.
pub struct Connection {
    ctx: Context,
    endpoint: Endpoint,
    persistent: bool,
    headers: HeaderMap,
    error_parser: Option<ParseError>,

    handle: Option<Box<dyn HttpSend>>,
}

impl Debug for Connection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("endpoint", &self.endpoint)
            .field("persistent", &self.persistent)
            .field("connected", &self.handle.is_some())
            .finish()
    }
}

impl Connection {
    /// Create a new connection, no transport is dialed until the first request.
    pub fn new(ctx: Context, endpoint: Endpoint, persistent: bool) -> Self {
        Self {
            ctx,
            endpoint,
            persistent,
            headers: HeaderMap::new(),
            error_parser: None,
            handle: None,
        }
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.set_header(name, value);
        self
    }

    /// Set the parser used to extract provider errors from failed responses.
    pub fn with_error_parser(mut self, parser: ParseError) -> Self {
        self.error_parser = Some(parser);
        self
    }

    /// Insert or replace a header sent with every request.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    /// The endpoint of this connection.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Whether this connection keeps its transport handle between requests.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Whether a transport handle is currently held.
    pub fn is_connected(&self) -> bool {
        self.handle.is_some()
    }

    /// Close the transport handle, the next request will dial again.
    pub fn reset(&mut self) {
        if self.handle.take().is_some() {
            debug!("connection to {} reset", self.endpoint);
        }
    }

    /// Send the request and check the response status.
    pub async fn request(&mut self, req: Request) -> Result<http::Response<Bytes>> {
        let http_req = self.build(&req)?;
        debug!("sending request: {} {}", http_req.method(), http_req.uri());

        let handle = match self.handle.take() {
            Some(handle) => handle,
            None => {
                debug!(
                    "dialing {} (persistent: {})",
                    self.endpoint, self.persistent
                );
                self.ctx.http_connect(&self.endpoint, self.persistent)?
            }
        };

        let resp = match handle.http_send(http_req).await {
            Ok(resp) => resp,
            Err(err) => {
                // The handle is dropped here, a broken transport must not be reused.
                debug!("request to {} failed: {err}", self.endpoint);
                return Err(if req.is_idempotent() && err.kind() == ErrorKind::Transport {
                    err.set_temporary()
                } else {
                    err
                });
            }
        };

        if self.persistent {
            self.handle = Some(handle);
        }

        let status = resp.status();
        debug!("got response: {status}");
        if req.expects().contains(&status) {
            return Ok(resp);
        }

        Err(self.unexpected_status(&req, resp))
    }

    fn build(&self, req: &Request) -> Result<http::Request<Bytes>> {
        let mut url = self.endpoint.url(req.path());
        if let Some(query) = req.query() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(query);
        }

        let mut headers = self.headers.clone();
        for (name, value) in req.headers() {
            headers.insert(name.clone(), value.clone());
        }

        let mut http_req = http::Request::builder()
            .method(req.method().clone())
            .uri(url)
            .body(req.body().clone())?;
        *http_req.headers_mut() = headers;

        Ok(http_req)
    }

    fn unexpected_status(&self, req: &Request, resp: http::Response<Bytes>) -> Error {
        let status = resp.status();
        let body = resp.into_body();
        let provider = self
            .error_parser
            .and_then(|parse| parse(&body))
            .unwrap_or_default();

        let expects = req
            .expects()
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let mut message = format!("expected status [{expects}], got {status}");
        if let Some(code) = &provider.code {
            message.push_str(&format!(", code: {code}"));
        }
        if let Some(msg) = &provider.message {
            message.push_str(&format!(", message: {msg}"));
        }

        let err = if status == StatusCode::NOT_FOUND {
            Error::not_found(message)
        } else {
            Error::unexpected_status(message)
        };

        err.with_response(ErrorResponse {
            status,
            body,
            code: provider.code,
            message: provider.message,
        })
    }
}
