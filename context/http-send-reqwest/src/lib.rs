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

//! HTTP transport for nimbus backed by [reqwest](https://docs.rs/reqwest).
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use nimbus_core::Context;
//! use nimbus_http_send_reqwest::ReqwestHttpConnect;
//!
//! let ctx = Context::new().with_http_connect(
//!     ReqwestHttpConnect::default().with_timeout(Duration::from_secs(30)),
//! );
//! ```

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use nimbus_core::{Endpoint, Error, HttpConnect, HttpSend, Result};
use reqwest::{Client, ClientBuilder, Request};

/// ReqwestHttpConnect opens transport handles backed by a fresh [`Client`].
///
/// Every handle owns its own connection pool. A persistent handle keeps idle
/// connections around; a non-persistent one disables pooling so the socket
/// is closed with the handle.
///
/// Timeouts configured here are the only cancellation mechanism nimbus has.
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpConnect {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ReqwestHttpConnect {
    /// Set the total timeout of each request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the timeout for establishing a connection.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the user agent sent with each request.
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }

    fn client_builder(&self, persistent: bool) -> ClientBuilder {
        let mut builder = Client::builder();
        if !persistent {
            builder = builder.pool_max_idle_per_host(0);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(ua) = &self.user_agent {
            builder = builder.user_agent(ua.as_str());
        }
        builder
    }
}

impl HttpConnect for ReqwestHttpConnect {
    fn http_connect(&self, endpoint: &Endpoint, persistent: bool) -> Result<Box<dyn HttpSend>> {
        debug!("building reqwest client for {endpoint} (persistent: {persistent})");

        let client = self.client_builder(persistent).build().map_err(|e| {
            Error::transport("failed to build reqwest client").with_source(e)
        })?;
        Ok(Box::new(ReqwestHttpSend::new(client)))
    }
}

/// ReqwestHttpSend sends requests with a [`Client`].
#[derive(Debug, Default)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req)
            .map_err(|e| Error::request_invalid("failed to convert request").with_source(e))?;
        let resp = self.client.execute(req).await.map_err(transport_error)?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await.map_err(transport_error)?;

        let mut out = http::Response::new(body);
        *out.status_mut() = status;
        *out.headers_mut() = headers;
        Ok(out)
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    let message = if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "failed to connect"
    } else {
        "failed to send request"
    };

    Error::transport(message).with_source(err)
}
