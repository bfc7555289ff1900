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

use crate::{MockRackspaceLbService, RackspaceLbApi, RackspaceLbService, Region};

/// Env name of the username.
pub const RACKSPACE_USERNAME: &str = "RACKSPACE_USERNAME";
/// Env name of the api key.
pub const RACKSPACE_API_KEY: &str = "RACKSPACE_API_KEY";
/// Env name of the region.
pub const RACKSPACE_REGION: &str = "RACKSPACE_REGION";

/// Config carries all the configuration for Rackspace Cloud Load Balancers.
#[derive(Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// `rackspace_username` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`RACKSPACE_USERNAME`]
    pub rackspace_username: Option<String>,
    /// `rackspace_api_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`RACKSPACE_API_KEY`]
    pub rackspace_api_key: Option<String>,
    /// Token to use instead of authenticating, requires `rackspace_account_id`
    /// or `rackspace_lb_endpoint`.
    pub rackspace_auth_token: Option<String>,
    /// Account id the load balancers belong to.
    pub rackspace_account_id: Option<String>,
    /// `rackspace_region` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`RACKSPACE_REGION`]
    ///
    /// Default to `dfw`.
    pub rackspace_region: Option<String>,
    /// Full load balancer endpoint including account, overrides region and account.
    pub rackspace_lb_endpoint: Option<String>,
    /// Auth endpoint, default to the region's v1.0 auth endpoint.
    pub rackspace_auth_url: Option<String>,
    /// Keep the connection open between calls, default to `true`.
    pub persistent: bool,
    /// Build the in-memory mock instead of the real service.
    pub mock: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rackspace_username: None,
            rackspace_api_key: None,
            rackspace_auth_token: None,
            rackspace_account_id: None,
            rackspace_region: None,
            rackspace_lb_endpoint: None,
            rackspace_auth_url: None,
            persistent: true,
            mock: false,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("rackspace_username", &self.rackspace_username)
            .field("rackspace_api_key", &Redact::from(&self.rackspace_api_key))
            .field(
                "rackspace_auth_token",
                &Redact::from(&self.rackspace_auth_token),
            )
            .field("rackspace_account_id", &self.rackspace_account_id)
            .field("rackspace_region", &self.rackspace_region)
            .field("rackspace_lb_endpoint", &self.rackspace_lb_endpoint)
            .field("rackspace_auth_url", &self.rackspace_auth_url)
            .field("persistent", &self.persistent)
            .field("mock", &self.mock)
            .finish()
    }
}

/// How the service gets its token.
#[derive(Clone)]
pub(crate) enum Auth {
    /// Token and endpoint are known up front.
    Token { token: String, endpoint: Endpoint },
    /// Authenticate against the v1.0 auth endpoint.
    Key {
        username: String,
        api_key: String,
        auth: Endpoint,
    },
}

impl Config {
    /// Load config from env.
    ///
    /// Fields that are already set are kept.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let fields = [
            (&mut self.rackspace_username, RACKSPACE_USERNAME),
            (&mut self.rackspace_api_key, RACKSPACE_API_KEY),
            (&mut self.rackspace_region, RACKSPACE_REGION),
        ];
        for (field, key) in fields {
            if field.is_none() {
                *field = ctx.env_var(key).filter(|v| non_empty(v).is_some());
            }
        }
        self
    }

    /// Resolve the region, `dfw` if not set.
    pub fn region(&self) -> Result<Region> {
        match self.rackspace_region.as_deref().and_then(non_empty) {
            Some(region) => region.parse(),
            None => Ok(Region::default()),
        }
    }

    /// Resolve the load balancer endpoint for an account.
    pub fn lb_endpoint(&self, account_id: &str) -> Result<Endpoint> {
        if let Some(url) = self.rackspace_lb_endpoint.as_deref().and_then(non_empty) {
            return Endpoint::parse(url);
        }

        let account_id = non_empty(account_id)
            .ok_or_else(|| Error::config_invalid("rackspace account id is required"))?;
        let region = self.region()?;
        Ok(Endpoint::new(
            "https",
            &region.host(),
            443,
            &format!("/v1.0/{account_id}"),
        ))
    }

    pub(crate) fn auth(&self) -> Result<Auth> {
        if let Some(token) = self.rackspace_auth_token.as_deref().and_then(non_empty) {
            let account_id = self.rackspace_account_id.as_deref().unwrap_or_default();
            return Ok(Auth::Token {
                token: token.to_string(),
                endpoint: self.lb_endpoint(account_id)?,
            });
        }

        let username = self.rackspace_username.as_deref().and_then(non_empty);
        let api_key = self.rackspace_api_key.as_deref().and_then(non_empty);
        let (Some(username), Some(api_key)) = (username, api_key) else {
            return Err(Error::credential_invalid(
                "rackspace_username and rackspace_api_key are required",
            ));
        };

        let auth = match self.rackspace_auth_url.as_deref().and_then(non_empty) {
            Some(url) => Endpoint::parse(url)?,
            None => Endpoint::parse(self.region()?.auth_url())?,
        };
        Ok(Auth::Key {
            username: username.to_string(),
            api_key: api_key.to_string(),
            auth,
        })
    }

    /// Build the service.
    pub fn build(&self, ctx: &Context) -> Result<Box<dyn RackspaceLbApi>> {
        if self.mock {
            return Ok(Box::new(MockRackspaceLbService::new()));
        }

        Ok(Box::new(RackspaceLbService::new(ctx.clone(), self)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_core::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lb_endpoint() -> Result<()> {
        let cfg = Config {
            rackspace_region: Some("ord".to_string()),
            ..Default::default()
        };

        assert_eq!(
            cfg.lb_endpoint("123456")?.to_string(),
            "https://ord.loadbalancers.api.rackspacecloud.com/v1.0/123456"
        );
        Ok(())
    }

    #[test]
    fn test_lb_endpoint_override() -> Result<()> {
        let cfg = Config {
            rackspace_region: Some("syd".to_string()),
            rackspace_lb_endpoint: Some("http://localhost:8080/v1.0/42".to_string()),
            ..Default::default()
        };

        assert_eq!(
            cfg.lb_endpoint("")?,
            Endpoint::new("http", "localhost", 8080, "/v1.0/42")
        );
        Ok(())
    }

    #[test]
    fn test_token_requires_account() {
        let cfg = Config {
            rackspace_auth_token: Some("token".to_string()),
            ..Default::default()
        };

        let err = cfg.auth().err().expect("account id is required");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_key_auth_uses_region_auth_url() -> Result<()> {
        let cfg = Config {
            rackspace_username: Some("user".to_string()),
            rackspace_api_key: Some("key".to_string()),
            rackspace_region: Some("lon".to_string()),
            ..Default::default()
        };

        match cfg.auth()? {
            Auth::Key { auth, .. } => assert_eq!(auth.host, "lon.auth.api.rackspacecloud.com"),
            Auth::Token { .. } => panic!("key auth expected"),
        }
        Ok(())
    }

    #[test]
    fn test_missing_credential() {
        let err = Config::default().auth().err().expect("credential is required");
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    }
}
