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

use chrono::TimeDelta;
use nimbus_core::time::{now, DateTime};
use nimbus_core::utils::Redact;
use serde::{Deserialize, Serialize};

/// Seconds before expiry at which a token stops being used.
const EXPIRY_BUFFER: i64 = 120;

/// OAuth token issued by `POST /token`.
#[derive(Clone)]
pub struct Token {
    /// Value sent as `Authorization: OAuth <access_token>`.
    pub access_token: String,
    /// Expiry time, `None` if the server didn't tell.
    pub expires_at: Option<DateTime>,
}

impl Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &Redact::from(&self.access_token))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Token {
    /// Check if the token can still be used.
    pub fn is_valid(&self) -> bool {
        if self.access_token.is_empty() {
            return false;
        }

        match self.expires_at {
            Some(at) => now() + TimeDelta::seconds(EXPIRY_BUFFER) < at,
            None => true,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub client_id: &'a str,
    pub grant_type: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl From<TokenResponse> for Token {
    fn from(v: TokenResponse) -> Self {
        Token {
            access_token: v.access_token,
            expires_at: v.expires_in.and_then(expires_at),
        }
    }
}

/// Expiry `secs` from now. A lifetime past chrono's range never expires, a
/// negative one past it is already expired.
fn expires_at(secs: i64) -> Option<DateTime> {
    let now = now();
    match TimeDelta::try_seconds(secs).and_then(|d| now.checked_add_signed(d)) {
        Some(at) => Some(at),
        None if secs > 0 => None,
        None => Some(now),
    }
}
