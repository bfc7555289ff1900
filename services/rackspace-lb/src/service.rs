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

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{HeaderName, ACCEPT, CONTENT_TYPE};
use http::{HeaderValue, Method, StatusCode, Uri};
use log::debug;
use nimbus_core::utils::non_empty;
use nimbus_core::{
    find_operation, Connection, Context, Error, Operation, ProviderError, Request, Result,
};
use serde_json::Value;

use crate::config::Auth;
use crate::models::AlgorithmList;
use crate::{Algorithm, Config, ConnectionThrottle, RackspaceLbApi, OPERATIONS};

const X_AUTH_USER: HeaderName = HeaderName::from_static("x-auth-user");
const X_AUTH_KEY: HeaderName = HeaderName::from_static("x-auth-key");
const X_AUTH_TOKEN: HeaderName = HeaderName::from_static("x-auth-token");
const X_SERVER_MANAGEMENT_URL: &str = "x-server-management-url";

/// RackspaceLbService talks to Rackspace Cloud Load Balancers.
///
/// With key based auth the token and the account are resolved on the first
/// call.
#[derive(Debug)]
pub struct RackspaceLbService {
    ctx: Context,
    config: Config,
    conn: Option<Connection>,
    operations: &'static [Operation],
}

impl RackspaceLbService {
    /// Create a new service from config, nothing is dialed until the first call.
    pub fn new(ctx: Context, config: &Config) -> Result<Self> {
        // Validate up front, auth is resolved again on connect.
        config.auth()?;

        Ok(Self {
            ctx,
            config: config.clone(),
            conn: None,
            operations: &OPERATIONS,
        })
    }

    async fn connect(&self) -> Result<Connection> {
        let (token, endpoint) = match self.config.auth()? {
            Auth::Token { token, endpoint } => (token, endpoint),
            Auth::Key {
                username,
                api_key,
                auth,
            } => self.authenticate(&username, &api_key, auth).await?,
        };
        debug!("rackspace load balancer service is using endpoint {endpoint}");

        let conn = Connection::new(self.ctx.clone(), endpoint, self.config.persistent)
            .with_header(X_AUTH_TOKEN, HeaderValue::from_str(&token)?)
            .with_header(ACCEPT, HeaderValue::from_static("application/json"))
            .with_error_parser(parse_error);
        Ok(conn)
    }

    async fn authenticate(
        &self,
        username: &str,
        api_key: &str,
        auth: nimbus_core::Endpoint,
    ) -> Result<(String, nimbus_core::Endpoint)> {
        debug!("authenticating rackspace user {username} against {auth}");
        let mut conn = Connection::new(self.ctx.clone(), auth, false);
        let req = Request::new(Method::GET)
            .with_header(X_AUTH_USER, HeaderValue::from_str(username)?)
            .with_header(X_AUTH_KEY, HeaderValue::from_str(api_key)?)
            .with_expects(&[StatusCode::OK, StatusCode::NO_CONTENT])
            .with_idempotent(true);
        let resp = conn.request(req).await.map_err(|err| {
            if err.response().is_some_and(|r| r.status == StatusCode::UNAUTHORIZED) {
                Error::credential_invalid("rackspace rejected username and api key")
                    .with_source(err)
            } else {
                err
            }
        })?;

        let header = |name: &str| -> Result<String> {
            let value = resp.headers().get(name).ok_or_else(|| {
                Error::unexpected(format!("auth response doesn't contain {name}"))
            })?;
            Ok(value.to_str()?.to_string())
        };
        let token = header(X_AUTH_TOKEN.as_str())?;
        let management_url = header(X_SERVER_MANAGEMENT_URL)?;

        Ok((token, self.config.lb_endpoint(&account_id(&management_url)?)?))
    }

    async fn connection(&mut self) -> Result<&mut Connection> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => self.connect().await?,
        };
        Ok(self.conn.insert(conn))
    }

    /// Send one action, authenticating again once if the token is rejected.
    async fn send(
        &mut self,
        action: &str,
        path: String,
        body: Option<Vec<u8>>,
    ) -> Result<http::Response<Bytes>> {
        let op = find_operation(self.operations, action)
            .ok_or_else(|| Error::unexpected(format!("action {action} is not declared")))?;

        let mut req = op.request().with_path(path);
        if let Some(body) = body {
            req = req
                .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .with_body(body);
        }

        let reauth = matches!(self.config.auth()?, Auth::Key { .. });
        let result = self.connection().await?.request(req.clone()).await;
        match result {
            Err(err) if err.response().is_some_and(|r| r.status == StatusCode::UNAUTHORIZED) => {
                self.conn = None;
                if !reauth {
                    return Err(err);
                }
                debug!("rackspace token rejected, authenticating again");
                self.connection().await?.request(req).await
            }
            result => result,
        }
    }
}

/// The account id is the last segment of the server management url.
fn account_id(management_url: &str) -> Result<String> {
    let uri: Uri = management_url.parse().map_err(|e| {
        Error::unexpected(format!(
            "server management url {management_url} is not a valid url"
        ))
        .with_source(e)
    })?;

    uri.path()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(non_empty)
        .map(str::to_string)
        .ok_or_else(|| {
            Error::unexpected(format!(
                "server management url {management_url} doesn't contain an account"
            ))
        })
}

/// Extract code and message from a load balancer error body.
///
/// Both `{"message": .., "code": ..}` and `{"badRequest": {"message": .., "code": ..}}`
/// are understood.
pub fn parse_error(body: &[u8]) -> Option<ProviderError> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let obj = value.as_object()?;

    let (name, fault) = if obj.contains_key("message") {
        (None, obj)
    } else {
        let (name, fault) = obj.iter().next()?;
        (Some(name.clone()), fault.as_object()?)
    };

    let message = fault.get("message").and_then(Value::as_str).map(str::to_string);
    let code = name.or_else(|| {
        fault
            .get("code")
            .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
    });
    if code.is_none() && message.is_none() {
        return None;
    }

    Some(ProviderError { code, message })
}

#[async_trait]
impl RackspaceLbApi for RackspaceLbService {
    fn operations(&self) -> &'static [Operation] {
        self.operations
    }

    fn reload(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            conn.reset();
        }
    }

    async fn list_algorithms(&mut self) -> Result<Vec<Algorithm>> {
        let resp = self
            .send("ListAlgorithms", "loadbalancers/algorithms".to_string(), None)
            .await?;
        let list: AlgorithmList = serde_json::from_slice(resp.body())?;
        Ok(list.algorithms)
    }

    async fn set_connection_throttling(
        &mut self,
        load_balancer_id: &str,
        max_connections: u32,
        min_connections: u32,
        max_connection_rate: u32,
        rate_interval: u32,
    ) -> Result<Option<ConnectionThrottle>> {
        let Some(id) = non_empty(load_balancer_id) else {
            return Ok(None);
        };

        let throttle = ConnectionThrottle {
            max_connections,
            min_connections,
            max_connection_rate,
            rate_interval,
        };
        self.send(
            "SetConnectionThrottling",
            format!("loadbalancers/{id}/connectionthrottle"),
            Some(serde_json::to_vec(&throttle)?),
        )
        .await?;
        Ok(Some(throttle))
    }
}
