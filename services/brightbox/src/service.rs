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
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, StatusCode};
use log::debug;
use nimbus_core::hash::basic_auth;
use nimbus_core::utils::non_empty;
use nimbus_core::{
    find_operation, Connection, Context, Error, Operation, ProviderError, Request, Result,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::models::AddListenersRequest;
use crate::token::{TokenRequest, TokenResponse};
use crate::{BrightboxApi, Config, Listener, LoadBalancer, Token, User, OPERATIONS};

/// BrightboxService talks to the Brightbox API.
///
/// The OAuth token is fetched on the first call and cached until it expires.
#[derive(Debug)]
pub struct BrightboxService {
    api: Connection,
    auth: Connection,
    client_id: String,
    client_secret: String,
    token: Option<Token>,
    operations: &'static [Operation],
}

impl BrightboxService {
    /// Create a new service from config, nothing is dialed until the first call.
    pub fn new(ctx: Context, config: &Config) -> Result<Self> {
        let (client_id, client_secret) = config.client()?;
        let api_endpoint = config.api_endpoint()?;
        let auth_endpoint = config.auth_endpoint()?;
        debug!("brightbox service is using endpoint {api_endpoint}");

        let json = HeaderValue::from_static("application/json");
        let api = Connection::new(ctx.clone(), api_endpoint, config.persistent)
            .with_header(ACCEPT, json.clone())
            .with_error_parser(parse_error);
        let auth = Connection::new(ctx, auth_endpoint, false)
            .with_header(ACCEPT, json)
            .with_error_parser(parse_error);

        Ok(Self {
            api,
            auth,
            client_id,
            client_secret,
            token: None,
            operations: &OPERATIONS,
        })
    }

    /// Use a token obtained elsewhere instead of fetching one.
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    async fn token(&mut self) -> Result<String> {
        if let Some(token) = self.token.as_ref().filter(|t| t.is_valid()) {
            return Ok(token.access_token.clone());
        }

        debug!("fetching brightbox oauth token");
        let body = serde_json::to_vec(&TokenRequest {
            client_id: &self.client_id,
            grant_type: "none",
        })?;
        let req = Request::new(http::Method::POST)
            .with_path("/token")
            .with_header(
                AUTHORIZATION,
                HeaderValue::from_str(&basic_auth(&self.client_id, &self.client_secret))?,
            )
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .with_body(body);
        let resp = self.auth.request(req).await.map_err(|err| {
            if err.response().is_some_and(|r| r.status == StatusCode::UNAUTHORIZED) {
                Error::credential_invalid("brightbox rejected client credentials").with_source(err)
            } else {
                err
            }
        })?;

        let token = Token::from(serde_json::from_slice::<TokenResponse>(resp.body())?);
        let access_token = token.access_token.clone();
        self.token = Some(token);
        Ok(access_token)
    }

    /// Send one action, fetching a new token once if the current one is rejected.
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

        let mut refreshed = false;
        loop {
            let token = self.token().await?;
            let req = req.clone().with_header(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("OAuth {token}"))?,
            );

            match self.api.request(req).await {
                Err(err)
                    if !refreshed
                        && err
                            .response()
                            .is_some_and(|r| r.status == StatusCode::UNAUTHORIZED) =>
                {
                    debug!("brightbox token rejected, fetching a new one");
                    self.token = None;
                    refreshed = true;
                }
                result => return result,
            }
        }
    }
}

fn parse_json<T: DeserializeOwned>(resp: &http::Response<Bytes>) -> Result<T> {
    Ok(serde_json::from_slice(resp.body())?)
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_name: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
}

/// Extract `error_name` and `errors` from a Brightbox error body.
pub fn parse_error(body: &[u8]) -> Option<ProviderError> {
    let err: ErrorBody = serde_json::from_slice(body).ok()?;
    if err.error_name.is_none() && err.errors.is_empty() {
        return None;
    }

    Some(ProviderError {
        code: err.error_name,
        message: (!err.errors.is_empty()).then(|| err.errors.join("; ")),
    })
}

#[async_trait]
impl BrightboxApi for BrightboxService {
    fn operations(&self) -> &'static [Operation] {
        self.operations
    }

    fn reload(&mut self) {
        self.api.reset();
        self.auth.reset();
        self.token = None;
    }

    async fn add_listeners_load_balancer(
        &mut self,
        id: &str,
        listeners: &[Listener],
    ) -> Result<Option<LoadBalancer>> {
        let Some(id) = non_empty(id) else {
            return Ok(None);
        };

        let body = serde_json::to_vec(&AddListenersRequest { listeners })?;
        let resp = self
            .send(
                "AddListenersLoadBalancer",
                format!("/1.0/load_balancers/{id}/add_listeners"),
                Some(body),
            )
            .await?;
        Ok(Some(parse_json(&resp)?))
    }

    async fn get_user(&mut self, id: &str) -> Result<Option<User>> {
        let Some(id) = non_empty(id) else {
            return Ok(None);
        };

        let resp = self
            .send("GetUser", format!("/1.0/users/{id}"), None)
            .await?;
        Ok(Some(parse_json(&resp)?))
    }

    async fn list_users(&mut self) -> Result<Vec<User>> {
        let resp = self
            .send("ListUsers", "/1.0/users".to_string(), None)
            .await?;
        parse_json(&resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_error() {
        assert_eq!(
            parse_error(br#"{"error_name":"missing_resource","errors":["Resource not found"]}"#),
            Some(ProviderError {
                code: Some("missing_resource".to_string()),
                message: Some("Resource not found".to_string()),
            })
        );
        assert_eq!(parse_error(br#"{"status":"ok"}"#), None);
        assert_eq!(parse_error(b"<html></html>"), None);
    }
}
