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

//! Core components for sending authenticated requests to cloud APIs.
//!
//! This crate provides the foundational types and traits for the nimbus ecosystem.
//! Every provider binding builds on the same pieces.
//!
//! ## Overview
//!
//! - **Context**: A container that holds implementations for HTTP transport and environment access
//! - **Connection**: Owns one transport handle towards an [`Endpoint`], sends [`Request`]s and checks their status
//! - **Operation**: A declared remote action, used to build per-service operation tables
//! - **Collection**: `all`/`get` loaders that materialize models
//!
//! ## Example
//!
//! ```no_run
//! use http::{Method, StatusCode};
//! use nimbus_core::{Connection, Context, Endpoint, Request};
//!
//! # async fn example() -> nimbus_core::Result<()> {
//! let ctx = Context::new();
//! let endpoint = Endpoint::new("https", "api.gb1.brightbox.com", 443, "/");
//! let mut conn = Connection::new(ctx, endpoint, true);
//!
//! let resp = conn
//!     .request(
//!         Request::new(Method::GET)
//!             .with_path("/1.0/users")
//!             .with_expects(&[StatusCode::OK]),
//!     )
//!     .await?;
//! println!("{}", resp.status());
//!
//! // Drop the transport, the next request will dial again.
//! conn.reset();
//! # Ok(())
//! # }
//! ```
//!
//! ## Traits
//!
//! - [`HttpConnect`]: For opening transport handles
//! - [`HttpSend`]: For sending HTTP requests over a handle
//! - [`Env`]: For environment variable access
//! - [`Collection`]: For resource collections
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time manipulation utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::Context;
pub use context::Env;
pub use context::HttpConnect;
pub use context::HttpSend;
pub use context::NoopEnv;
pub use context::NoopHttpConnect;
pub use context::OsEnv;
pub use context::StaticEnv;

mod error;
pub use error::{Error, ErrorKind, ErrorResponse, ProviderError, Result};

mod connection;
pub use connection::{Connection, Endpoint, ParseError, Request};

mod operation;
pub use operation::{find_operation, Operation};

mod collection;
pub use collection::{Collection, NotFoundExt};
