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

use crate::{MockVcloudService, VcloudApi, VcloudService};

/// Env name of the username, `user@org`.
pub const VCLOUD_USERNAME: &str = "VCLOUD_USERNAME";
/// Env name of the password.
pub const VCLOUD_PASSWORD: &str = "VCLOUD_PASSWORD";
/// Env name of the host.
pub const VCLOUD_HOST: &str = "VCLOUD_HOST";

/// Config carries all the configuration for vCloud Director.
#[derive(Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// `vcloud_username` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`VCLOUD_USERNAME`]
    pub vcloud_username: Option<String>,
    /// `vcloud_password` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`VCLOUD_PASSWORD`]
    pub vcloud_password: Option<String>,
    /// `vcloud_host` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`VCLOUD_HOST`]
    pub vcloud_host: Option<String>,
    /// Port, default to `443`.
    pub vcloud_port: u16,
    /// Scheme, default to `https`.
    pub vcloud_scheme: String,
    /// Base path of the api, default to `/api`.
    pub vcloud_path: String,
    /// Api version sent in `Accept`, default to `1.5`.
    pub vcloud_version: String,
    /// Keep the connection open between calls, default to `true`.
    pub persistent: bool,
    /// Build the in-memory mock instead of the real service.
    pub mock: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vcloud_username: None,
            vcloud_password: None,
            vcloud_host: None,
            vcloud_port: 443,
            vcloud_scheme: "https".to_string(),
            vcloud_path: "/api".to_string(),
            vcloud_version: "1.5".to_string(),
            persistent: true,
            mock: false,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("vcloud_username", &self.vcloud_username)
            .field("vcloud_password", &Redact::from(&self.vcloud_password))
            .field("vcloud_host", &self.vcloud_host)
            .field("vcloud_port", &self.vcloud_port)
            .field("vcloud_scheme", &self.vcloud_scheme)
            .field("vcloud_path", &self.vcloud_path)
            .field("vcloud_version", &self.vcloud_version)
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
            (&mut self.vcloud_username, VCLOUD_USERNAME),
            (&mut self.vcloud_password, VCLOUD_PASSWORD),
            (&mut self.vcloud_host, VCLOUD_HOST),
        ];
        for (field, key) in fields {
            if field.is_none() {
                *field = ctx.env_var(key).filter(|v| non_empty(v).is_some());
            }
        }
        self
    }

    /// Resolve the api endpoint.
    pub fn endpoint(&self) -> Result<Endpoint> {
        let Some(host) = self.vcloud_host.as_deref().and_then(non_empty) else {
            return Err(Error::config_invalid("vcloud_host is required"));
        };
        if !matches!(self.vcloud_scheme.as_str(), "http" | "https") {
            return Err(Error::config_invalid(format!(
                "scheme {} is not supported",
                self.vcloud_scheme
            )));
        }

        Ok(Endpoint::new(
            &self.vcloud_scheme,
            host,
            self.vcloud_port,
            &self.vcloud_path,
        ))
    }

    /// Resolve username and password.
    pub fn login(&self) -> Result<(String, String)> {
        let username = self.vcloud_username.as_deref().and_then(non_empty);
        let password = self.vcloud_password.as_deref().and_then(non_empty);
        match (username, password) {
            (Some(u), Some(p)) => Ok((u.to_string(), p.to_string())),
            _ => Err(Error::credential_invalid(
                "vcloud_username and vcloud_password are required",
            )),
        }
    }

    /// Build the service.
    pub fn build(&self, ctx: &Context) -> Result<Box<dyn VcloudApi>> {
        if self.mock {
            return Ok(Box::new(MockVcloudService::new()));
        }

        Ok(Box::new(VcloudService::new(ctx.clone(), self)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_core::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_endpoint() -> Result<()> {
        let cfg = Config {
            vcloud_host: Some("vcloud.example.com".to_string()),
            ..Default::default()
        };

        assert_eq!(cfg.endpoint()?.to_string(), "https://vcloud.example.com/api");
        Ok(())
    }

    #[test]
    fn test_host_is_required() {
        let err = Config::default().endpoint().expect_err("host is required");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_deserialize() {
        let cfg: Config = serde_json::from_str(
            r#"{"vcloud_host": "vcloud.example.com", "vcloud_port": 8443, "persistent": false}"#,
        )
        .expect("config must be valid");

        assert_eq!(cfg.vcloud_port, 8443);
        assert_eq!(cfg.vcloud_path, "/api");
        assert!(!cfg.persistent);

        assert!(serde_json::from_str::<Config>(r#"{"host": "vcloud.example.com"}"#).is_err());
    }
}
