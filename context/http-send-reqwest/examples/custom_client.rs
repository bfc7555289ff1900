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

use std::time::Duration;

use anyhow::Result;
use http::Method;
use nimbus_core::{Connection, Context, Endpoint, Request};
use nimbus_http_send_reqwest::ReqwestHttpConnect;

#[tokio::main]
async fn main() -> Result<()> {
    // Configure the transport with timeouts and a custom user agent.
    let connect = ReqwestHttpConnect::default()
        .with_timeout(Duration::from_secs(30))
        .with_connect_timeout(Duration::from_secs(5))
        .with_user_agent("nimbus-example/1.0");

    println!("Created HTTP transport with:");
    println!("  - 30 second timeout");
    println!("  - 5 second connect timeout");
    println!("  - Custom user agent");

    let ctx = Context::new().with_http_connect(connect);
    let endpoint = Endpoint::parse("https://httpbin.org")?;
    let mut conn = Connection::new(ctx, endpoint, true);

    println!("\nTesting connection with GET /get");
    match conn.request(Request::new(Method::GET).with_path("/get")).await {
        Ok(resp) => {
            println!("Response status: {}", resp.status());
            if let Ok(text) = String::from_utf8(resp.body().to_vec()) {
                println!("\nResponse body:");
                println!("{text}");
            }
        }
        Err(e) => {
            eprintln!("Request failed: {e}");
        }
    }

    // Drop the transport and send again over a new one.
    conn.reset();
    match conn.request(Request::new(Method::GET).with_path("/get")).await {
        Ok(resp) => println!("After reset: {}", resp.status()),
        Err(e) => eprintln!("Request after reset failed: {e}"),
    }

    Ok(())
}
