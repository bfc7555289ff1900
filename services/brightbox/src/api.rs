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

use crate::{Listener, LoadBalancer, User};

/// Actions supported by the Brightbox binding.
pub static OPERATIONS: [Operation; 3] = [
    Operation::new(
        "AddListenersLoadBalancer",
        Method::POST,
        &[StatusCode::ACCEPTED],
        false,
    ),
    Operation::new("GetUser", Method::GET, &[StatusCode::OK], true),
    Operation::new("ListUsers", Method::GET, &[StatusCode::OK], true),
];

/// BrightboxApi is the operation surface shared by the real and the mock service.
#[async_trait]
pub trait BrightboxApi: Debug + Send {
    /// Actions this service supports.
    fn operations(&self) -> &'static [Operation];

    /// Drop the transport and the cached token.
    fn reload(&mut self);

    /// Add listeners to a load balancer.
    ///
    /// Returns `None` without sending anything if `id` is empty.
    async fn add_listeners_load_balancer(
        &mut self,
        id: &str,
        listeners: &[Listener],
    ) -> Result<Option<LoadBalancer>>;

    /// Get a user by id.
    ///
    /// Returns `None` without sending anything if `id` is empty.
    async fn get_user(&mut self, id: &str) -> Result<Option<User>>;

    /// List users visible to the client.
    async fn list_users(&mut self) -> Result<Vec<User>>;
}
