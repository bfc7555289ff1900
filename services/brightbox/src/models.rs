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

use serde::{Deserialize, Serialize};

/// User account as returned by `/1.0/users`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct User {
    /// Identifier like `usr-abcde`.
    pub id: String,
    /// Always `user`.
    #[serde(default)]
    pub resource_type: String,
    /// Api url of this user.
    #[serde(default)]
    pub url: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email_address: Option<String>,
    /// Whether the email address is verified.
    #[serde(default)]
    pub email_verified: bool,
    /// Public SSH key installed on new servers.
    #[serde(default)]
    pub ssh_key: Option<String>,
}

/// Listener of a load balancer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listener {
    /// Port the load balancer listens on.
    #[serde(rename = "in")]
    pub port_in: u16,
    /// Port traffic is forwarded to.
    #[serde(rename = "out")]
    pub port_out: u16,
    /// `http`, `http+ws`, `https`, `https+wss` or `tcp`.
    pub protocol: String,
    /// Idle timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

/// Load balancer as returned by `/1.0/load_balancers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoadBalancer {
    /// Identifier like `lba-abcde`.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// `creating`, `active`, `deleting`, `deleted` or `failed`.
    #[serde(default)]
    pub status: String,
    /// Balancing policy.
    #[serde(default)]
    pub policy: Option<String>,
    /// Configured listeners.
    #[serde(default)]
    pub listeners: Vec<Listener>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddListenersRequest<'a> {
    pub listeners: &'a [Listener],
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_listener_wire_names() -> serde_json::Result<()> {
        let listener = Listener {
            port_in: 80,
            port_out: 8080,
            protocol: "http".to_string(),
            timeout: None,
        };

        assert_eq!(
            serde_json::to_string(&AddListenersRequest {
                listeners: &[listener]
            })?,
            r#"{"listeners":[{"in":80,"out":8080,"protocol":"http"}]}"#
        );
        Ok(())
    }

    #[test]
    fn test_user_ignores_unknown_fields() -> serde_json::Result<()> {
        let user: User = serde_json::from_str(
            r#"{"id":"usr-abcde","resource_type":"user","url":"https://api.gb1.brightbox.com/1.0/users/usr-abcde","name":"John","email_address":"john@example.com","email_verified":true,"ssh_key":null,"accounts":[]}"#,
        )?;

        assert_eq!(user.id, "usr-abcde");
        assert_eq!(user.email_address.as_deref(), Some("john@example.com"));
        assert!(user.email_verified);
        Ok(())
    }
}
