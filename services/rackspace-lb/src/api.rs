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

use crate::{Algorithm, ConnectionThrottle};

/// Actions supported by the load balancer binding.
pub static OPERATIONS: [Operation; 2] = [
    Operation::new("ListAlgorithms", Method::GET, &[StatusCode::OK], true),
    Operation::new(
        "SetConnectionThrottling",
        Method::PUT,
        &[StatusCode::OK, StatusCode::ACCEPTED],
        true,
    ),
];

/// RackspaceLbApi is the operation surface shared by the real and the mock service.
#[async_trait]
pub trait RackspaceLbApi: Debug + Send {
    /// Actions this service supports.
    fn operations(&self) -> &'static [Operation];

    /// Drop the transport, key based auth will authenticate again.
    fn reload(&mut self);

    /// List supported balancing algorithms.
    async fn list_algorithms(&mut self) -> Result<Vec<Algorithm>>;

    /// Set connection throttling of a load balancer.
    ///
    /// Returns `None` without sending anything if `load_balancer_id` is empty,
    /// otherwise the settings as sent.
    async fn set_connection_throttling(
        &mut self,
        load_balancer_id: &str,
        max_connections: u32,
        min_connections: u32,
        max_connection_rate: u32,
        rate_interval: u32,
    ) -> Result<Option<ConnectionThrottle>>;
}
