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
use http::header::{HeaderName, ACCEPT, AUTHORIZATION};
use http::{HeaderValue, StatusCode, Uri};
use log::debug;
use nimbus_core::hash::basic_auth;
use nimbus_core::utils::non_empty;
use nimbus_core::{find_operation, Connection, Context, Error, Operation, ProviderError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::models::Session;
use crate::{Config, Organization, Vdc, VcloudApi, OPERATIONS};

const X_VCLOUD_AUTHORIZATION: HeaderName = HeaderName::from_static("x-vcloud-authorization");

/// VcloudService talks to vCloud Director.
///
/// A session is opened on the first call. Its token is sent with every
/// following request.
#[derive(Debug)]
pub struct VcloudService {
    conn: Connection,
    username: String,
    password: String,
    logged_in: bool,
    organization_uri: Option<String>,
    operations: &'static [Operation],
}

impl VcloudService {
    /// Create a new service from config, nothing is dialed until the first call.
    pub fn new(ctx: Context, config: &Config) -> Result<Self> {
        let (username, password) = config.login()?;
        let endpoint = config.endpoint()?;
        debug!("vcloud service is using endpoint {endpoint}");

        let accept = HeaderValue::from_str(&format!(
            "application/*+xml;version={}",
            config.vcloud_version
        ))?;
        let conn = Connection::new(ctx, endpoint, config.persistent)
            .with_header(ACCEPT, accept)
            .with_error_parser(parse_error);

        Ok(Self {
            conn,
            username,
            password,
            logged_in: false,
            organization_uri: None,
            operations: &OPERATIONS,
        })
    }

    fn operation(&self, action: &str) -> Result<&'static Operation> {
        find_operation(self.operations, action)
            .ok_or_else(|| Error::unexpected(format!("action {action} is not declared")))
    }

    async fn login(&mut self) -> Result<()> {
        if self.logged_in {
            return Ok(());
        }

        debug!("opening vcloud session for {}", self.username);
        let req = self
            .operation("Login")?
            .request()
            .with_path("sessions")
            .with_header(
                AUTHORIZATION,
                HeaderValue::from_str(&basic_auth(&self.username, &self.password))?,
            );
        let resp = self.conn.request(req).await.map_err(|err| {
            if err.response().is_some_and(|r| r.status == StatusCode::UNAUTHORIZED) {
                Error::credential_invalid("vcloud rejected username and password").with_source(err)
            } else {
                err
            }
        })?;

        let token = resp
            .headers()
            .get(&X_VCLOUD_AUTHORIZATION)
            .cloned()
            .ok_or_else(|| Error::unexpected("login response doesn't contain a session token"))?;
        let session: Session = parse_xml(resp.body())?;

        self.conn.set_header(X_VCLOUD_AUTHORIZATION, token);
        self.organization_uri = session.organization_uri().map(str::to_string);
        self.logged_in = true;
        Ok(())
    }

    /// Get an entity by its url, opening a new session once if the current one expired.
    async fn get<T: DeserializeOwned>(&mut self, action: &str, uri: &str) -> Result<T> {
        let path = entity_path(self.conn.endpoint().host.as_str(), uri)?;
        let req = self.operation(action)?.request().with_path(path);

        let mut relogged = false;
        loop {
            self.login().await?;
            match self.conn.request(req.clone()).await {
                Err(err)
                    if !relogged
                        && err
                            .response()
                            .is_some_and(|r| r.status == StatusCode::UNAUTHORIZED) =>
                {
                    debug!("vcloud session expired, logging in again");
                    self.logged_in = false;
                    relogged = true;
                }
                Err(err) => return Err(err),
                Ok(resp) => return parse_xml(resp.body()),
            }
        }
    }
}

/// Entities are addressed by absolute urls, only the path is sent.
fn entity_path(host: &str, uri: &str) -> Result<String> {
    let parsed: Uri = uri.parse().map_err(|e| {
        Error::request_invalid(format!("{uri} is not a valid url")).with_source(e)
    })?;
    if let Some(h) = parsed.host() {
        if !h.eq_ignore_ascii_case(host) {
            return Err(Error::request_invalid(format!(
                "{uri} doesn't belong to {host}"
            )));
        }
    }

    Ok(parsed
        .path_and_query()
        .map(|v| v.as_str().to_string())
        .unwrap_or_else(|| "/".to_string()))
}

fn parse_xml<T: DeserializeOwned>(body: &Bytes) -> Result<T> {
    let text = std::str::from_utf8(body)
        .map_err(|e| Error::unexpected("response body is not valid utf-8").with_source(e))?;
    Ok(quick_xml::de::from_str(text)?)
}

#[derive(Deserialize)]
struct ErrorXml {
    #[serde(rename = "@majorErrorCode", default)]
    major_error_code: Option<String>,
    #[serde(rename = "@minorErrorCode", default)]
    minor_error_code: Option<String>,
    #[serde(rename = "@message", default)]
    message: Option<String>,
}

/// Extract code and message from a vCloud `<Error>` body.
pub fn parse_error(body: &[u8]) -> Option<ProviderError> {
    let text = std::str::from_utf8(body).ok()?;
    let err: ErrorXml = quick_xml::de::from_str(text).ok()?;
    let code = err.minor_error_code.or(err.major_error_code);
    if code.is_none() && err.message.is_none() {
        return None;
    }

    Some(ProviderError {
        code,
        message: err.message,
    })
}

#[async_trait]
impl VcloudApi for VcloudService {
    fn operations(&self) -> &'static [Operation] {
        self.operations
    }

    fn reload(&mut self) {
        self.conn.reset();
        self.logged_in = false;
        self.organization_uri = None;
    }

    async fn default_organization_uri(&mut self) -> Result<String> {
        self.login().await?;
        self.organization_uri
            .clone()
            .ok_or_else(|| Error::unexpected("vcloud session doesn't link to an organization"))
    }

    async fn get_organization(&mut self, uri: &str) -> Result<Option<Organization>> {
        let Some(uri) = non_empty(uri) else {
            return Ok(None);
        };
        Ok(Some(self.get("GetOrganization", uri).await?))
    }

    async fn get_vdc(&mut self, uri: &str) -> Result<Option<Vdc>> {
        let Some(uri) = non_empty(uri) else {
            return Ok(None);
        };
        Ok(Some(self.get("GetVdc", uri).await?))
    }
}
