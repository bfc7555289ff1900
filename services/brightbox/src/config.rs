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

use std::fmt::{Debug, Formatter};

use nimbus_core::utils::{non_empty, Redact};
use nimbus_core::{Context, Endpoint, Error, Result};
use serde::Deserialize;

use crate::{BrightboxApi, BrightboxService, MockBrightboxService};

/// Env name of the client id.
pub const BRIGHTBOX_CLIENT_ID: &str = "BRIGHTBOX_CLIENT_ID";
/// Env name of the client secret.
pub const BRIGHTBOX_SECRET: &str = "BRIGHTBOX_SECRET";
/// Env name of the api url.
pub const BRIGHTBOX_API_URL: &str = "BRIGHTBOX_API_URL";
/// Env name of the auth url.
pub const BRIGHTBOX_AUTH_URL: &str = "BRIGHTBOX_AUTH_URL";

/// Default api and auth url.
pub const DEFAULT_API_URL: &str = "https://api.gb1.brightbox.com";

/// Config carries all the configuration for Brightbox.
#[derive(Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// `brightbox_client_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`BRIGHTBOX_CLIENT_ID`]
    pub brightbox_client_id: Option<String>,
    /// `brightbox_secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`BRIGHTBOX_SECRET`]
    pub brightbox_secret: Option<String>,
    /// `brightbox_api_url` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`BRIGHTBOX_API_URL`]
    ///
    /// Default to [`DEFAULT_API_URL`].
    pub brightbox_api_url: Option<String>,
    /// `brightbox_auth_url` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`BRIGHTBOX_AUTH_URL`]
    ///
    /// Default to the api url.
    pub brightbox_auth_url: Option<String>,
    /// Keep the connection open between calls, default to `true`.
    pub persistent: bool,
    /// Build the in-memory mock instead of the real service.
    pub mock: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            brightbox_client_id: None,
            brightbox_secret: None,
            brightbox_api_url: None,
            brightbox_auth_url: None,
            persistent: true,
            mock: false,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("brightbox_client_id", &self.brightbox_client_id)
            .field("brightbox_secret", &Redact::from(&self.brightbox_secret))
            .field("brightbox_api_url", &self.brightbox_api_url)
            .field("brightbox_auth_url", &self.brightbox_auth_url)
            .field("persistent", &self.persistent)
            .field("mock", &self.mock)
            .finish()
    }
}

impl Config {
    /// Load config from env.
    ///
    /// Fields that are already set are kept.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let fields = [
            (&mut self.brightbox_client_id, BRIGHTBOX_CLIENT_ID),
            (&mut self.brightbox_secret, BRIGHTBOX_SECRET),
            (&mut self.brightbox_api_url, BRIGHTBOX_API_URL),
            (&mut self.brightbox_auth_url, BRIGHTBOX_AUTH_URL),
        ];
        for (field, key) in fields {
            if field.is_none() {
                *field = ctx.env_var(key).filter(|v| non_empty(v).is_some());
            }
        }
        self
    }

    /// Resolve the api endpoint.
    pub fn api_endpoint(&self) -> Result<Endpoint> {
        let url = self
            .brightbox_api_url
            .as_deref()
            .and_then(non_empty)
            .unwrap_or(DEFAULT_API_URL);
        Endpoint::parse(url)
    }

    /// Resolve the auth endpoint, the api endpoint if not set.
    pub fn auth_endpoint(&self) -> Result<Endpoint> {
        match self.brightbox_auth_url.as_deref().and_then(non_empty) {
            Some(url) => Endpoint::parse(url),
            None => self.api_endpoint(),
        }
    }

    /// Resolve client id and secret.
    pub fn client(&self) -> Result<(String, String)> {
        let id = self.brightbox_client_id.as_deref().and_then(non_empty);
        let secret = self.brightbox_secret.as_deref().and_then(non_empty);
        match (id, secret) {
            (Some(id), Some(secret)) => Ok((id.to_string(), secret.to_string())),
            _ => Err(Error::credential_invalid(
                "brightbox_client_id and brightbox_secret are required",
            )),
        }
    }

    /// Build the service.
    pub fn build(&self, ctx: &Context) -> Result<Box<dyn BrightboxApi>> {
        if self.mock {
            return Ok(Box::new(MockBrightboxService::new()));
        }

        Ok(Box::new(BrightboxService::new(ctx.clone(), self)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_core::{ErrorKind, StaticEnv};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_default_endpoints() -> Result<()> {
        let cfg = Config::default();

        assert_eq!(
            cfg.api_endpoint()?,
            Endpoint::new("https", "api.gb1.brightbox.com", 443, "/")
        );
        assert_eq!(cfg.auth_endpoint()?, cfg.api_endpoint()?);
        Ok(())
    }

    #[test]
    fn test_from_env() -> Result<()> {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (BRIGHTBOX_CLIENT_ID.to_string(), "cli-12345".to_string()),
                (BRIGHTBOX_SECRET.to_string(), "secret".to_string()),
                (BRIGHTBOX_AUTH_URL.to_string(), "http://localhost:8080".to_string()),
            ]),
        });
        let cfg = Config::default().from_env(&ctx);

        assert_eq!(cfg.client()?, ("cli-12345".to_string(), "secret".to_string()));
        assert_eq!(cfg.auth_endpoint()?.port, 8080);
        assert_eq!(cfg.api_endpoint()?.host, "api.gb1.brightbox.com");
        Ok(())
    }

    #[test]
    fn test_missing_client() {
        let err = Config::default().client().expect_err("client is required");
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    }

    #[test]
    fn test_deserialize_unknown_option() {
        let err = serde_json::from_str::<Config>(r#"{"brightbox_client": "cli-12345"}"#)
            .expect_err("unknown option must be rejected");
        assert!(err.to_string().contains("brightbox_client"));
    }
}
