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

use crate::{BrightboxApi, Listener, LoadBalancer, User, OPERATIONS};

/// MockBrightboxService answers every call with static values.
#[derive(Debug, Default)]
pub struct MockBrightboxService {}

impl MockBrightboxService {
    /// Create a new mock service.
    pub fn new() -> Self {
        Self {}
    }
}

fn sample_user(id: &str) -> User {
    User {
        id: id.to_string(),
        resource_type: "user".to_string(),
        url: format!("https://api.gb1.brightbox.com/1.0/users/{id}"),
        name: Some("Mock User".to_string()),
        email_address: Some("mock@example.com".to_string()),
        email_verified: true,
        ssh_key: None,
    }
}

#[async_trait]
impl BrightboxApi for MockBrightboxService {
    fn operations(&self) -> &'static [Operation] {
        &OPERATIONS
    }

    fn reload(&mut self) {}

    async fn add_listeners_load_balancer(
        &mut self,
        id: &str,
        listeners: &[Listener],
    ) -> Result<Option<LoadBalancer>> {
        Ok(non_empty(id).map(|id| LoadBalancer {
            id: id.to_string(),
            name: None,
            status: "active".to_string(),
            policy: Some("least-connections".to_string()),
            listeners: listeners.to_vec(),
        }))
    }

    async fn get_user(&mut self, id: &str) -> Result<Option<User>> {
        Ok(non_empty(id).map(sample_user))
    }

    async fn list_users(&mut self) -> Result<Vec<User>> {
        Ok(vec![sample_user("usr-12345")])
    }
}
