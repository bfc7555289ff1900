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

//! Rackspace Cloud Load Balancers binding.
//!
//! ## Example
//!
//! ```no_run
//! use nimbus_core::{Context, OsEnv};
//! use nimbus_rackspace_lb::Config;
//!
//! # async fn example(ctx: Context) -> nimbus_core::Result<()> {
//! let ctx = ctx.with_env(OsEnv);
//! let mut lb = Config::default().from_env(&ctx).build(&ctx)?;
//!
//! lb.set_connection_throttling("42", 100, 10, 50, 60).await?;
//! # Ok(())
//! # }
//! ```

mod api;
pub use api::{RackspaceLbApi, OPERATIONS};

mod config;
pub use config::{Config, RACKSPACE_API_KEY, RACKSPACE_REGION, RACKSPACE_USERNAME};

mod models;
pub use models::{Algorithm, ConnectionThrottle};

mod region;
pub use region::Region;

mod service;
pub use service::{parse_error, RackspaceLbService};

mod mock;
pub use mock::{MockRackspaceLbService, MOCK_ALGORITHMS};

mod collection;
pub use collection::Algorithms;
