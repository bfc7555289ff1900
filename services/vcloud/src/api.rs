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

use std::fmt::Debug;

use async_trait::async_trait;
use http::{Method, StatusCode};
use nimbus_core::{Operation, Result};

use crate::{Organization, Vdc};

/// Actions supported by the vCloud binding.
pub static OPERATIONS: [Operation; 3] = [
    Operation::new("GetOrganization", Method::GET, &[StatusCode::OK], true),
    Operation::new("GetVdc", Method::GET, &[StatusCode::OK], true),
    Operation::new("Login", Method::POST, &[StatusCode::OK], false),
];

/// VcloudApi is the operation surface shared by the real and the mock service.
#[async_trait]
pub trait VcloudApi: Debug + Send {
    /// Actions this service supports.
    fn operations(&self) -> &'static [Operation];

    /// Drop the transport and the session.
    fn reload(&mut self);

    /// Url of the organization the session belongs to.
    async fn default_organization_uri(&mut self) -> Result<String>;

    /// Get an organization by url.
    ///
    /// Returns `None` without sending anything if `uri` is empty.
    async fn get_organization(&mut self, uri: &str) -> Result<Option<Organization>>;

    /// Get a vdc by url.
    ///
    /// Returns `None` without sending anything if `uri` is empty.
    async fn get_vdc(&mut self, uri: &str) -> Result<Option<Vdc>>;
}
