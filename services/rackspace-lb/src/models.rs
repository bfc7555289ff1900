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

use serde::{Deserialize, Serialize};

/// Balancing algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Algorithm {
    /// Name like `ROUND_ROBIN`.
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AlgorithmList {
    #[serde(default)]
    pub algorithms: Vec<Algorithm>,
}

/// Connection throttling settings of a load balancer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionThrottle {
    /// Maximum connections from a single address.
    pub max_connections: u32,
    /// Connections allowed before throttling kicks in.
    pub min_connections: u32,
    /// Maximum connections per `rate_interval` from a single address.
    pub max_connection_rate: u32,
    /// Interval in seconds `max_connection_rate` is counted over.
    pub rate_interval: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_connection_throttle_body_is_flat() -> serde_json::Result<()> {
        let throttle = ConnectionThrottle {
            max_connections: 100,
            min_connections: 10,
            max_connection_rate: 50,
            rate_interval: 60,
        };

        assert_eq!(
            serde_json::to_value(throttle)?,
            serde_json::json!({
                "maxConnections": 100,
                "minConnections": 10,
                "maxConnectionRate": 50,
                "rateInterval": 60,
            })
        );
        Ok(())
    }
}
