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

use std::collections::BTreeMap;
use std::fmt::Write;
use std::time::Duration;

use http::Method;
use log::debug;
use nimbus_core::hash::{base64_hmac_sha1, base64_hmac_sha256};
use nimbus_core::time::{format_rfc3339, now, DateTime};
use nimbus_core::{Endpoint, Error, Result};
use percent_encoding::utf8_percent_encode;

use crate::constants::AWS_QUERY_ENCODE_SET;
use crate::Credential;

/// Parameters of one query request.
///
/// Keys are kept sorted byte-wise, which is the order they are signed in.
pub type Params = BTreeMap<String, String>;

/// Hash used to compute the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureMethod {
    /// `HmacSHA256`
    #[default]
    HmacSha256,
    /// `HmacSHA1`
    HmacSha1,
}

impl SignatureMethod {
    /// Name sent as `SignatureMethod`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureMethod::HmacSha256 => "HmacSHA256",
            SignatureMethod::HmacSha1 => "HmacSHA1",
        }
    }

    fn sign(&self, key: &[u8], content: &[u8]) -> String {
        match self {
            SignatureMethod::HmacSha256 => base64_hmac_sha256(key, content),
            SignatureMethod::HmacSha1 => base64_hmac_sha1(key, content),
        }
    }
}

/// SignedQuery is the outcome of signing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedQuery {
    /// Canonical query with `&Signature=...` appended, ready to be sent as
    /// body or query string.
    pub query: String,
    /// Raw base64 signature.
    pub signature: String,
}

/// RequestSigner that implements AWS query signature version 2.
///
/// - [Signature Version 2 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-2.html)
#[derive(Debug, Clone)]
pub struct RequestSigner {
    version: String,
    signature_method: SignatureMethod,
    expires_in: Option<Duration>,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer for the given API version.
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            signature_method: SignatureMethod::default(),
            expires_in: None,
            time: None,
        }
    }

    /// Set the hash used for the signature.
    pub fn with_signature_method(mut self, method: SignatureMethod) -> Self {
        self.signature_method = method;
        self
    }

    /// Sign with `Expires` set to now plus `expires_in` instead of `Timestamp`.
    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = Some(expires_in);
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Sign an action with its params.
    ///
    /// The caller's params are merged with the authentication params. The
    /// authentication params win on a key clash.
    pub fn sign(
        &self,
        method: &Method,
        endpoint: &Endpoint,
        path: &str,
        action: &str,
        params: &Params,
        cred: &Credential,
    ) -> Result<SignedQuery> {
        if !cred.is_valid() {
            return Err(Error::credential_invalid(
                "access key id and secret access key are required to sign requests",
            ));
        }

        let now = self.time.unwrap_or_else(now);

        let mut params = params.clone();
        params.insert("Action".to_string(), action.to_string());
        params.insert("Version".to_string(), self.version.clone());
        params.insert("AWSAccessKeyId".to_string(), cred.access_key_id.clone());
        params.insert(
            "SignatureMethod".to_string(),
            self.signature_method.as_str().to_string(),
        );
        params.insert("SignatureVersion".to_string(), "2".to_string());
        match self.expires_in {
            Some(expires_in) => {
                let expires_at = chrono::TimeDelta::from_std(expires_in)
                    .ok()
                    .and_then(|d| now.checked_add_signed(d))
                    .ok_or_else(|| Error::request_invalid("expires_in is out of range"))?;
                params.insert("Expires".to_string(), format_rfc3339(expires_at));
            }
            None => {
                params.insert("Timestamp".to_string(), format_rfc3339(now));
            }
        }
        if let Some(token) = &cred.session_token {
            params.insert("SecurityToken".to_string(), token.clone());
        }

        let canonical = canonicalize_query(&params);
        let path = if path.is_empty() { "/" } else { path };
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            method.as_str(),
            endpoint.host.to_lowercase(),
            path,
            canonical
        );
        debug!("calculated string to sign: {string_to_sign}");

        let signature = self
            .signature_method
            .sign(cred.secret_access_key.as_bytes(), string_to_sign.as_bytes());

        let mut query = canonical;
        write!(
            query,
            "&Signature={}",
            utf8_percent_encode(&signature, &AWS_QUERY_ENCODE_SET)
        )?;

        Ok(SignedQuery { query, signature })
    }
}

fn canonicalize_query(params: &Params) -> String {
    params
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
