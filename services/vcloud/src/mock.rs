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

use crate::models::{ORG_MEDIA_TYPE, VDC_MEDIA_TYPE};
use crate::{Link, Organization, Vdc, VcloudApi, OPERATIONS};

/// Organization url returned by [`MockVcloudService`].
pub const MOCK_ORGANIZATION_URI: &str = "https://vcloud.example.com/api/org/1";
/// Url of the only vdc of the mocked organization.
pub const MOCK_VDC_URI: &str = "https://vcloud.example.com/api/vdc/1";

/// MockVcloudService answers every call with static values.
#[derive(Debug, Default)]
pub struct MockVcloudService {}

impl MockVcloudService {
    /// Create a new mock service.
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl VcloudApi for MockVcloudService {
    fn operations(&self) -> &'static [Operation] {
        &OPERATIONS
    }

    fn reload(&mut self) {}

    async fn default_organization_uri(&mut self) -> Result<String> {
        Ok(MOCK_ORGANIZATION_URI.to_string())
    }

    async fn get_organization(&mut self, uri: &str) -> Result<Option<Organization>> {
        Ok(non_empty(uri).map(|uri| Organization {
            name: Some("MockOrg".to_string()),
            href: uri.to_string(),
            media_type: Some(ORG_MEDIA_TYPE.to_string()),
            description: None,
            full_name: Some("Mock Organization".to_string()),
            links: vec![Link {
                rel: Some("down".to_string()),
                media_type: Some(VDC_MEDIA_TYPE.to_string()),
                name: Some("MockVdc".to_string()),
                href: MOCK_VDC_URI.to_string(),
            }],
        }))
    }

    async fn get_vdc(&mut self, uri: &str) -> Result<Option<Vdc>> {
        Ok(non_empty(uri).map(|uri| Vdc {
            name: Some("MockVdc".to_string()),
            href: uri.to_string(),
            media_type: Some(VDC_MEDIA_TYPE.to_string()),
            allocation_model: Some("AllocationPool".to_string()),
            is_enabled: Some(true),
            ..Default::default()
        }))
    }
}
