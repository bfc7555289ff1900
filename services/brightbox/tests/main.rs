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

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use http::header::AUTHORIZATION;
use http::{HeaderMap, Method, StatusCode};
use nimbus_brightbox::{BrightboxApi, BrightboxService, Config, Listener, Users};
use nimbus_core::{Collection, Context, Endpoint, Error, ErrorKind, HttpConnect, HttpSend};
use pretty_assertions::assert_eq;

#[derive(Debug)]
struct Sent {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Bytes,
}

impl Sent {
    fn authorization(&self) -> Option<&str> {
        self.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
    }
}

/// Transport that replays queued responses and records the requests.
#[derive(Debug, Clone, Default)]
struct Replay {
    state: Arc<Mutex<ReplayState>>,
}

#[derive(Debug, Default)]
struct ReplayState {
    dials: usize,
    sent: Vec<Sent>,
    responses: VecDeque<(StatusCode, &'static str)>,
}

impl Replay {
    fn push(&self, status: StatusCode, body: &'static str) {
        self.state.lock().unwrap().responses.push_back((status, body));
    }

    fn dials(&self) -> usize {
        self.state.lock().unwrap().dials
    }

    /// `METHOD uri` of every request sent so far.
    fn requests(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .sent
            .iter()
            .map(|s| format!("{} {}", s.method, s.uri))
            .collect()
    }

    fn with_sent<T>(&self, idx: usize, f: impl FnOnce(&Sent) -> T) -> T {
        let state = self.state.lock().unwrap();
        f(&state.sent[idx])
    }
}

impl HttpConnect for Replay {
    fn http_connect(&self, _: &Endpoint, _: bool) -> nimbus_core::Result<Box<dyn HttpSend>> {
        self.state.lock().unwrap().dials += 1;
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl HttpSend for Replay {
    async fn http_send(
        &self,
        req: http::Request<Bytes>,
    ) -> nimbus_core::Result<http::Response<Bytes>> {
        let mut state = self.state.lock().unwrap();
        let (parts, body) = req.into_parts();
        state.sent.push(Sent {
            method: parts.method,
            uri: parts.uri.to_string(),
            headers: parts.headers,
            body,
        });

        let (status, body) = state
            .responses
            .pop_front()
            .ok_or_else(|| Error::transport("no response queued"))?;
        Ok(http::Response::builder()
            .status(status)
            .body(Bytes::from_static(body.as_bytes()))?)
    }
}

const TOKEN: &str = r#"{"access_token":"a1b2c3","token_type":"OAuth","expires_in":7200}"#;
const OTHER_TOKEN: &str = r#"{"access_token":"d4e5f6","token_type":"OAuth","expires_in":7200}"#;
const USER: &str = r#"{"id":"usr-abcde","resource_type":"user","url":"https://api.gb1.brightbox.com/1.0/users/usr-abcde","name":"John","email_address":"john@example.com","email_verified":true}"#;
const USERS: &str = r#"[{"id":"usr-abcde","resource_type":"user"},{"id":"usr-fghij","resource_type":"user"}]"#;
const LOAD_BALANCER: &str = r#"{"id":"lba-12345","status":"active","listeners":[{"in":80,"out":8080,"protocol":"http"},{"in":443,"out":8443,"protocol":"tcp"}]}"#;
const NOT_FOUND: &str = r#"{"error_name":"missing_resource","errors":["Resource not found"]}"#;

fn test_config() -> Config {
    Config {
        brightbox_client_id: Some("cli-12345".to_string()),
        brightbox_secret: Some("secret".to_string()),
        ..Default::default()
    }
}

fn service(replay: &Replay) -> nimbus_core::Result<BrightboxService> {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new().with_http_connect(replay.clone());
    BrightboxService::new(ctx, &test_config())
}

#[tokio::test]
async fn test_token_is_fetched_lazily_and_cached() -> Result<()> {
    let replay = Replay::default();
    let mut api = service(&replay)?;
    assert_eq!(replay.dials(), 0);

    replay.push(StatusCode::OK, TOKEN);
    replay.push(StatusCode::OK, USER);
    replay.push(StatusCode::OK, USERS);
    let user = api.get_user("usr-abcde").await?.expect("user must exist");
    let users = api.list_users().await?;

    assert_eq!(user.name.as_deref(), Some("John"));
    assert_eq!(users.len(), 2);
    assert_eq!(
        replay.requests(),
        vec![
            "POST https://api.gb1.brightbox.com/token",
            "GET https://api.gb1.brightbox.com/1.0/users/usr-abcde",
            "GET https://api.gb1.brightbox.com/1.0/users",
        ]
    );

    replay.with_sent(0, |s| {
        assert_eq!(s.authorization(), Some("Basic Y2xpLTEyMzQ1OnNlY3JldA=="));
        let body: serde_json::Value =
            serde_json::from_slice(&s.body).expect("token body must be json");
        assert_eq!(
            body,
            serde_json::json!({"client_id": "cli-12345", "grant_type": "none"})
        );
    });
    replay.with_sent(1, |s| assert_eq!(s.authorization(), Some("OAuth a1b2c3")));
    replay.with_sent(2, |s| assert_eq!(s.authorization(), Some("OAuth a1b2c3")));
    Ok(())
}

#[tokio::test]
async fn test_empty_identifier_returns_none() -> Result<()> {
    let replay = Replay::default();
    let mut api = service(&replay)?;

    assert_eq!(api.get_user("").await?, None);
    assert_eq!(api.add_listeners_load_balancer(" ", &[]).await?, None);
    assert_eq!(replay.dials(), 0);
    Ok(())
}

#[tokio::test]
async fn test_add_listeners_expects_accepted() -> Result<()> {
    let replay = Replay::default();
    let mut api = service(&replay)?;
    let listeners = [Listener {
        port_in: 443,
        port_out: 8443,
        protocol: "tcp".to_string(),
        timeout: None,
    }];

    replay.push(StatusCode::OK, TOKEN);
    replay.push(StatusCode::ACCEPTED, LOAD_BALANCER);
    let lb = api
        .add_listeners_load_balancer("lba-12345", &listeners)
        .await?
        .expect("load balancer must be returned");

    assert_eq!(lb.listeners.len(), 2);
    replay.with_sent(1, |s| {
        assert_eq!(s.method, Method::POST);
        assert_eq!(
            s.uri,
            "https://api.gb1.brightbox.com/1.0/load_balancers/lba-12345/add_listeners"
        );
        assert_eq!(
            s.body,
            Bytes::from_static(br#"{"listeners":[{"in":443,"out":8443,"protocol":"tcp"}]}"#)
        );
    });

    // 200 is not what this action answers with.
    replay.push(StatusCode::OK, LOAD_BALANCER);
    let err = api
        .add_listeners_load_balancer("lba-12345", &listeners)
        .await
        .expect_err("200 must be rejected");
    assert_eq!(err.kind(), ErrorKind::UnexpectedStatus);
    Ok(())
}

#[tokio::test]
async fn test_rejected_token_is_refreshed_once() -> Result<()> {
    let replay = Replay::default();
    let mut api = service(&replay)?;

    replay.push(StatusCode::OK, TOKEN);
    replay.push(StatusCode::UNAUTHORIZED, "");
    replay.push(StatusCode::OK, OTHER_TOKEN);
    replay.push(StatusCode::OK, USERS);
    api.list_users().await?;

    replay.with_sent(3, |s| assert_eq!(s.authorization(), Some("OAuth d4e5f6")));

    // A second rejection is returned to the caller.
    replay.push(StatusCode::UNAUTHORIZED, "");
    replay.push(StatusCode::OK, TOKEN);
    replay.push(StatusCode::UNAUTHORIZED, "");
    let err = api.list_users().await.expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::UnexpectedStatus);
    assert_eq!(replay.requests().len(), 7);
    Ok(())
}

#[tokio::test]
async fn test_invalid_client_credentials() -> Result<()> {
    let replay = Replay::default();
    let mut api = service(&replay)?;

    replay.push(
        StatusCode::UNAUTHORIZED,
        r#"{"error_name":"invalid_client","errors":["client authentication failed"]}"#,
    );
    let err = api.list_users().await.expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    Ok(())
}

#[tokio::test]
async fn test_missing_user_is_none_in_collection() -> Result<()> {
    let replay = Replay::default();
    let mut api = service(&replay)?;

    replay.push(StatusCode::OK, TOKEN);
    replay.push(StatusCode::NOT_FOUND, NOT_FOUND);
    let err = api.get_user("usr-zzzzz").await.expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(
        err.response().and_then(|r| r.code.as_deref()),
        Some("missing_resource")
    );

    replay.push(StatusCode::NOT_FOUND, NOT_FOUND);
    let mut users = Users::new(&mut api);
    assert_eq!(users.get("usr-zzzzz").await?, None);
    Ok(())
}

#[tokio::test]
async fn test_reload_drops_token() -> Result<()> {
    let replay = Replay::default();
    let mut api = service(&replay)?;

    replay.push(StatusCode::OK, TOKEN);
    replay.push(StatusCode::OK, USERS);
    api.list_users().await?;
    api.reload();
    replay.push(StatusCode::OK, OTHER_TOKEN);
    replay.push(StatusCode::OK, USERS);
    api.list_users().await?;

    let requests = replay.requests();
    assert_eq!(requests[2], "POST https://api.gb1.brightbox.com/token");
    replay.with_sent(3, |s| assert_eq!(s.authorization(), Some("OAuth d4e5f6")));
    Ok(())
}

#[tokio::test]
async fn test_mock_never_touches_network() -> Result<()> {
    let replay = Replay::default();
    let ctx = Context::new().with_http_connect(replay.clone());
    let mut api = Config {
        mock: true,
        ..Default::default()
    }
    .build(&ctx)?;

    assert_eq!(api.list_users().await?.len(), 1);
    assert!(api.get_user("usr-abcde").await?.is_some());
    assert!(api
        .add_listeners_load_balancer("lba-12345", &[])
        .await?
        .is_some());
    assert_eq!(api.operations().len(), 3);
    assert_eq!(replay.dials(), 0);
    Ok(())
}
