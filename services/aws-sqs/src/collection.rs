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

use std::collections::BTreeMap;

use async_trait::async_trait;
use nimbus_core::{Collection, NotFoundExt, Result};

use crate::SqsApi;

/// Queue materialized from SQS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Queue {
    /// Url of the queue.
    pub url: String,
    /// Attributes, only loaded by [`Queues::get`].
    pub attributes: BTreeMap<String, String>,
}

impl Queue {
    /// Name of the queue, the last segment of its url.
    pub fn name(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or_default()
    }
}

/// Queues loads queues through an [`SqsApi`].
#[derive(Debug)]
pub struct Queues<'a> {
    api: &'a mut dyn SqsApi,
}

impl<'a> Queues<'a> {
    /// Create a new collection on top of a service.
    pub fn new(api: &'a mut dyn SqsApi) -> Self {
        Self { api }
    }

    /// Create a queue and return it.
    pub async fn create(
        &mut self,
        name: &str,
        attributes: &BTreeMap<String, String>,
    ) -> Result<Queue> {
        let out = self.api.create_queue(name, attributes).await?;
        Ok(Queue {
            url: out.queue_url,
            attributes: attributes.clone(),
        })
    }
}

#[async_trait]
impl Collection for Queues<'_> {
    type Model = Queue;

    async fn all(&mut self) -> Result<Vec<Queue>> {
        let out = self.api.list_queues(None).await?;
        Ok(out
            .queue_urls
            .into_iter()
            .map(|url| Queue {
                url,
                attributes: BTreeMap::new(),
            })
            .collect())
    }

    /// Load a queue with all of its attributes by url.
    async fn get(&mut self, url: &str) -> Result<Option<Queue>> {
        let out = self
            .api
            .get_queue_attributes(url, "All")
            .await
            .not_found_as_none()?;

        Ok(out.map(|out| Queue {
            url: url.to_string(),
            attributes: out.attributes,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockSqsService;

    #[tokio::test]
    async fn test_queues_with_mock() -> Result<()> {
        let mut api = MockSqsService::new();
        let mut queues = Queues::new(&mut api);

        let queue = queues.create("orders", &BTreeMap::new()).await?;
        assert_eq!(queue.name(), "orders");

        assert!(queues.all().await?.is_empty());
        assert!(queues.get(&queue.url).await?.is_some());
        assert!(queues.get("").await?.is_none());
        Ok(())
    }
}
