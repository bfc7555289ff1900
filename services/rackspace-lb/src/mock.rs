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

use async_trait::async_trait;
use nimbus_core::utils::non_empty;
use nimbus_core::{Operation, Result};

use crate::{Algorithm, ConnectionThrottle, RackspaceLbApi, OPERATIONS};

/// Algorithms returned by [`MockRackspaceLbService`].
pub const MOCK_ALGORITHMS: [&str; 5] = [
    "LEAST_CONNECTIONS",
    "RANDOM",
    "ROUND_ROBIN",
    "WEIGHTED_LEAST_CONNECTIONS",
    "WEIGHTED_ROUND_ROBIN",
];

/// MockRackspaceLbService answers every call with static values.
#[derive(Debug, Default)]
pub struct MockRackspaceLbService {}

impl MockRackspaceLbService {
    /// Create a new mock service.
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl RackspaceLbApi for MockRackspaceLbService {
    fn operations(&self) -> &'static [Operation] {
        &OPERATIONS
    }

    fn reload(&mut self) {}

    async fn list_algorithms(&mut self) -> Result<Vec<Algorithm>> {
        Ok(MOCK_ALGORITHMS
            .iter()
            .map(|name| Algorithm {
                name: name.to_string(),
            })
            .collect())
    }

    async fn set_connection_throttling(
        &mut self,
        load_balancer_id: &str,
        max_connections: u32,
        min_connections: u32,
        max_connection_rate: u32,
        rate_interval: u32,
    ) -> Result<Option<ConnectionThrottle>> {
        Ok(non_empty(load_balancer_id).map(|_| ConnectionThrottle {
            max_connections,
            min_connections,
            max_connection_rate,
            rate_interval,
        }))
    }
}
