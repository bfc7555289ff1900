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

//! Brightbox cloud binding.
//!
//! Calls are authenticated with an OAuth token obtained from the client
//! credentials. The token is fetched on the first call.
//!
//! ## Example
//!
//! ```no_run
//! use nimbus_brightbox::{Config, Users};
//! use nimbus_core::{Collection, Context, OsEnv};
//!
//! # async fn example(ctx: Context) -> nimbus_core::Result<()> {
//! let ctx = ctx.with_env(OsEnv);
//! let mut api = Config::default().from_env(&ctx).build(&ctx)?;
//!
//! for user in Users::new(api.as_mut()).all().await? {
//!     println!("{} {:?}", user.id, user.email_address);
//! }
//! # Ok(())
//! # }
//! ```

mod api;
pub use api::{BrightboxApi, OPERATIONS};

mod config;
pub use config::{
    Config, BRIGHTBOX_API_URL, BRIGHTBOX_AUTH_URL, BRIGHTBOX_CLIENT_ID, BRIGHTBOX_SECRET,
    DEFAULT_API_URL,
};

mod models;
pub use models::{Listener, LoadBalancer, User};

mod token;
pub use token::Token;

mod service;
pub use service::{parse_error, BrightboxService};

mod mock;
pub use mock::MockBrightboxService;

mod collection;
pub use collection::Users;
