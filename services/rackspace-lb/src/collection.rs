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
use nimbus_core::{Collection, Result};

use crate::{Algorithm, RackspaceLbApi};

/// Algorithms loads balancing algorithms through a [`RackspaceLbApi`].
///
/// There is no lookup action, `get` filters the full list by name.
#[derive(Debug)]
pub struct Algorithms<'a> {
    api: &'a mut dyn RackspaceLbApi,
}

impl<'a> Algorithms<'a> {
    /// Create a new collection on top of a service.
    pub fn new(api: &'a mut dyn RackspaceLbApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Collection for Algorithms<'_> {
    type Model = Algorithm;

    async fn all(&mut self) -> Result<Vec<Algorithm>> {
        self.api.list_algorithms().await
    }

    async fn get(&mut self, name: &str) -> Result<Option<Algorithm>> {
        Ok(self
            .api
            .list_algorithms()
            .await?
            .into_iter()
            .find(|a| a.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockRackspaceLbService;

    #[tokio::test]
    async fn test_algorithms_with_mock() -> Result<()> {
        let mut api = MockRackspaceLbService::new();
        let mut algorithms = Algorithms::new(&mut api);

        assert_eq!(algorithms.all().await?.len(), 5);
        assert_eq!(
            algorithms.get("ROUND_ROBIN").await?,
            Some(Algorithm {
                name: "ROUND_ROBIN".to_string()
            })
        );
        assert_eq!(algorithms.get("FASTEST").await?, None);
        Ok(())
    }
}
