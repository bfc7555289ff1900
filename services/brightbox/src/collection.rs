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
use nimbus_core::{Collection, NotFoundExt, Result};

use crate::{BrightboxApi, User};

/// Users loads user accounts through a [`BrightboxApi`].
#[derive(Debug)]
pub struct Users<'a> {
    api: &'a mut dyn BrightboxApi,
}

impl<'a> Users<'a> {
    /// Create a new collection on top of a service.
    pub fn new(api: &'a mut dyn BrightboxApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Collection for Users<'_> {
    type Model = User;

    async fn all(&mut self) -> Result<Vec<User>> {
        self.api.list_users().await
    }

    async fn get(&mut self, id: &str) -> Result<Option<User>> {
        Ok(self.api.get_user(id).await.not_found_as_none()?.flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockBrightboxService;

    #[tokio::test]
    async fn test_users_with_mock() -> Result<()> {
        let mut api = MockBrightboxService::new();
        let mut users = Users::new(&mut api);

        assert_eq!(users.all().await?.len(), 1);
        assert_eq!(
            users.get("usr-abcde").await?.map(|u| u.id),
            Some("usr-abcde".to_string())
        );
        assert_eq!(users.get("").await?, None);
        Ok(())
    }
}
