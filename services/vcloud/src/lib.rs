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

//! VMware vCloud Director binding.
//!
//! ## Example
//!
//! ```no_run
//! use nimbus_core::{Collection, Context, OsEnv};
//! use nimbus_vcloud::{Config, Vdcs};
//!
//! # async fn example(ctx: Context) -> nimbus_core::Result<()> {
//! let ctx = ctx.with_env(OsEnv);
//! let mut api = Config::default().from_env(&ctx).build(&ctx)?;
//!
//! for vdc in Vdcs::new(api.as_mut()).all().await? {
//!     println!("{:?} {}", vdc.name, vdc.href);
//! }
//! # Ok(())
//! # }
//! ```

mod api;
pub use api::{VcloudApi, OPERATIONS};

mod config;
pub use config::{Config, VCLOUD_HOST, VCLOUD_PASSWORD, VCLOUD_USERNAME};

mod models;
pub use models::{Link, Organization, Vdc, ORG_MEDIA_TYPE, VDC_MEDIA_TYPE};

mod service;
pub use service::{parse_error, VcloudService};

mod mock;
pub use mock::{MockVcloudService, MOCK_ORGANIZATION_URI, MOCK_VDC_URI};

mod collection;
pub use collection::Vdcs;
