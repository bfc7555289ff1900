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

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, Method, StatusCode};
use nimbus_core::{
    Connection, Context, Endpoint, Error, ErrorKind, HttpConnect, HttpSend, ProviderError,
    Request, Result,
};
use pretty_assertions::assert_eq;

/// Transport that replays canned responses and records what it was asked.
#[derive(Debug, Clone, Default)]
struct ReplayConnect {
    state: Arc<Mutex<ReplayState>>,
}

#[derive(Debug, Default)]
struct ReplayState {
    dials: usize,
    // (handle id, request)
    sent: Vec<(usize, http::Request<Bytes>)>,
    responses: VecDeque<Result<http::Response<Bytes>>>,
}

impl ReplayConnect {
    fn push(&self, status: StatusCode, body: &'static str) {
        let resp = http::Response::builder()
            .status(status)
            .body(Bytes::from_static(body.as_bytes()))
            .expect("response must be valid");
        self.state.lock().unwrap().responses.push_back(Ok(resp));
    }

    fn push_err(&self, err: Error) {
        self.state.lock().unwrap().responses.push_back(Err(err));
    }

    fn dials(&self) -> usize {
        self.state.lock().unwrap().dials
    }

    fn handle_ids(&self) -> Vec<usize> {
        self.state
            .lock()
            .unwrap()
            .sent
            .iter()
            .map(|(id, _)| *id)
            .collect()
    }
}

#[derive(Debug)]
struct ReplaySend {
    id: usize,
    state: Arc<Mutex<ReplayState>>,
}

impl HttpConnect for ReplayConnect {
    fn http_connect(&self, _: &Endpoint, _: bool) -> Result<Box<dyn HttpSend>> {
        let mut state = self.state.lock().unwrap();
        state.dials += 1;
        Ok(Box::new(ReplaySend {
            id: state.dials,
            state: self.state.clone(),
        }))
    }
}

#[async_trait]
impl HttpSend for ReplaySend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let mut state = self.state.lock().unwrap();
        state.sent.push((self.id, req));
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(Error::transport("no response queued")))
    }
}

fn connection(replay: &ReplayConnect, persistent: bool) -> Connection {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new().with_http_connect(replay.clone());
    let endpoint = Endpoint::new("https", "queue.amazonaws.com", 443, "/");
    Connection::new(ctx, endpoint, persistent)
}

fn parse_test_error(body: &[u8]) -> Option<ProviderError> {
    let body = std::str::from_utf8(body).ok()?;
    let (code, message) = body.split_once(':')?;
    Some(ProviderError {
        code: Some(code.to_string()),
        message: Some(message.to_string()),
    })
}

#[tokio::test]
async fn test_persistent_connection_reuses_handle() -> anyhow::Result<()> {
    let replay = ReplayConnect::default();
    let mut conn = connection(&replay, true);
    assert!(!conn.is_connected());

    replay.push(StatusCode::OK, "first");
    replay.push(StatusCode::OK, "second");
    conn.request(Request::new(Method::GET)).await?;
    conn.request(Request::new(Method::GET)).await?;

    assert!(conn.is_connected());
    assert_eq!(replay.dials(), 1);
    assert_eq!(replay.handle_ids(), vec![1, 1]);
    Ok(())
}

#[tokio::test]
async fn test_reset_redials_lazily() -> anyhow::Result<()> {
    let replay = ReplayConnect::default();
    let mut conn = connection(&replay, true);

    replay.push(StatusCode::OK, "before");
    let resp = conn.request(Request::new(Method::GET)).await?;
    assert_eq!(resp.body().as_ref(), b"before");

    conn.reset();
    assert!(!conn.is_connected());
    assert_eq!(replay.dials(), 1);

    replay.push(StatusCode::OK, "after");
    let resp = conn.request(Request::new(Method::GET)).await?;
    assert_eq!(resp.body().as_ref(), b"after");
    assert_eq!(replay.dials(), 2);
    assert_eq!(replay.handle_ids(), vec![1, 2]);
    Ok(())
}

#[tokio::test]
async fn test_non_persistent_dials_every_request() -> anyhow::Result<()> {
    let replay = ReplayConnect::default();
    let mut conn = connection(&replay, false);

    replay.push(StatusCode::OK, "");
    replay.push(StatusCode::OK, "");
    conn.request(Request::new(Method::GET)).await?;
    assert!(!conn.is_connected());
    conn.request(Request::new(Method::GET)).await?;

    assert_eq!(replay.dials(), 2);
    assert_eq!(replay.handle_ids(), vec![1, 2]);
    Ok(())
}

#[tokio::test]
async fn test_unexpected_status_carries_response() -> anyhow::Result<()> {
    let replay = ReplayConnect::default();
    let mut conn = connection(&replay, true).with_error_parser(parse_test_error);

    replay.push(StatusCode::BAD_REQUEST, "InvalidParameterValue:bad value");
    let err = conn
        .request(Request::new(Method::POST).with_expects(&[StatusCode::OK]))
        .await
        .expect_err("status 400 must fail");

    assert_eq!(err.kind(), ErrorKind::UnexpectedStatus);
    assert!(err.is_protocol_error());
    let resp = err.response().expect("response must be attached");
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body.as_ref(), b"InvalidParameterValue:bad value");
    assert_eq!(resp.code.as_deref(), Some("InvalidParameterValue"));
    assert_eq!(resp.message.as_deref(), Some("bad value"));
    // A protocol error keeps the transport alive.
    assert!(conn.is_connected());
    Ok(())
}

#[tokio::test]
async fn test_unexpected_status_without_structured_body() -> anyhow::Result<()> {
    let replay = ReplayConnect::default();
    let mut conn = connection(&replay, true).with_error_parser(parse_test_error);

    replay.push(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
    let err = conn
        .request(Request::new(Method::GET))
        .await
        .expect_err("status 500 must fail");

    let resp = err.response().expect("response must be attached");
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body.as_ref(), b"<html>oops</html>");
    assert_eq!(resp.code, None);
    Ok(())
}

#[tokio::test]
async fn test_not_found_status() -> anyhow::Result<()> {
    let replay = ReplayConnect::default();
    let mut conn = connection(&replay, true);

    replay.push(StatusCode::NOT_FOUND, "");
    let err = conn
        .request(Request::new(Method::GET).with_path("/api/vdc/missing"))
        .await
        .expect_err("status 404 must fail");

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.is_protocol_error());
    Ok(())
}

#[tokio::test]
async fn test_status_in_expected_set() -> anyhow::Result<()> {
    let replay = ReplayConnect::default();
    let mut conn = connection(&replay, true);

    replay.push(StatusCode::ACCEPTED, "");
    let resp = conn
        .request(Request::new(Method::PUT).with_expects(&[StatusCode::OK, StatusCode::ACCEPTED]))
        .await?;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    Ok(())
}

#[tokio::test]
async fn test_transport_error_drops_handle() -> anyhow::Result<()> {
    let replay = ReplayConnect::default();
    let mut conn = connection(&replay, true);

    replay.push_err(Error::transport("connection reset by peer"));
    let err = conn
        .request(Request::new(Method::POST).with_idempotent(true))
        .await
        .expect_err("transport error must surface");
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.is_temporary());
    assert!(!conn.is_connected());

    replay.push_err(Error::transport("connection reset by peer"));
    let err = conn
        .request(Request::new(Method::POST))
        .await
        .expect_err("transport error must surface");
    assert!(!err.is_temporary());

    replay.push(StatusCode::OK, "");
    conn.request(Request::new(Method::POST)).await?;
    assert_eq!(replay.dials(), 3);
    Ok(())
}

#[tokio::test]
async fn test_rejected_request_is_never_temporary() -> anyhow::Result<()> {
    let replay = ReplayConnect::default();
    let mut conn = connection(&replay, true);

    replay.push_err(Error::request_invalid("invalid header for transport"));
    let err = conn
        .request(Request::new(Method::GET).with_idempotent(true))
        .await
        .expect_err("request error must surface");
    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    assert!(!err.is_temporary());
    assert!(!conn.is_connected());
    Ok(())
}

#[tokio::test]
async fn test_request_building() -> anyhow::Result<()> {
    let replay = ReplayConnect::default();
    let ctx = Context::new().with_http_connect(replay.clone());
    let endpoint = Endpoint::new("https", "lb.example.com", 443, "/v1.0/123456");
    let mut conn = Connection::new(ctx, endpoint, true)
        .with_header(AUTHORIZATION, HeaderValue::from_static("Bearer default"))
        .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    replay.push(StatusCode::OK, "");
    conn.request(
        Request::new(Method::PUT)
            .with_path("loadbalancers/42/connectionthrottle")
            .with_query("format=json")
            .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .with_body("hello"),
    )
    .await?;

    let state = replay.state.lock().unwrap();
    let (_, req) = &state.sent[0];
    assert_eq!(req.method(), Method::PUT);
    assert_eq!(
        req.uri().to_string(),
        "https://lb.example.com/v1.0/123456/loadbalancers/42/connectionthrottle?format=json"
    );
    assert_eq!(req.headers()[AUTHORIZATION], "Bearer default");
    assert_eq!(req.headers()[CONTENT_TYPE], "text/plain");
    assert_eq!(req.body().as_ref(), b"hello");
    Ok(())
}
