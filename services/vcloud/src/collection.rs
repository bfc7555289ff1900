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

use crate::models::VDC_MEDIA_TYPE;
use crate::{VcloudApi, Vdc};

/// Vdcs loads the virtual datacenters of one organization.
///
/// The organization defaults to the one the session belongs to. Vdcs can't
/// be created through this collection.
#[derive(Debug)]
pub struct Vdcs<'a> {
    api: &'a mut dyn VcloudApi,
    organization_uri: Option<String>,
}

impl<'a> Vdcs<'a> {
    /// Create a new collection on top of a service.
    pub fn new(api: &'a mut dyn VcloudApi) -> Self {
        Self {
            api,
            organization_uri: None,
        }
    }

    /// Load vdcs of another organization.
    pub fn with_organization_uri(mut self, uri: &str) -> Self {
        self.organization_uri = Some(uri.to_string());
        self
    }

    /// Url of the organization this collection loads from.
    pub async fn organization_uri(&mut self) -> Result<String> {
        if let Some(uri) = &self.organization_uri {
            return Ok(uri.clone());
        }

        let uri = self.api.default_organization_uri().await?;
        self.organization_uri = Some(uri.clone());
        Ok(uri)
    }
}

#[async_trait]
impl Collection for Vdcs<'_> {
    type Model = Vdc;

    /// Vdcs as linked from the organization, only name, href and type are
    /// filled.
    async fn all(&mut self) -> Result<Vec<Vdc>> {
        let uri = self.organization_uri().await?;
        let Some(org) = self.api.get_organization(&uri).await? else {
            return Ok(vec![]);
        };

        Ok(org
            .links_of(VDC_MEDIA_TYPE)
            .cloned()
            .map(Vdc::from)
            .collect())
    }

    async fn get(&mut self, uri: &str) -> Result<Option<Vdc>> {
        Ok(self.api.get_vdc(uri).await.not_found_as_none()?.flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MockVcloudService, MOCK_VDC_URI};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_vdcs_with_mock() -> Result<()> {
        let mut api = MockVcloudService::new();
        let mut vdcs = Vdcs::new(&mut api);

        let all = vdcs.all().await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].href, MOCK_VDC_URI);
        assert_eq!(all[0].name.as_deref(), Some("MockVdc"));

        let vdc = vdcs.get(MOCK_VDC_URI).await?.expect("vdc must exist");
        assert_eq!(vdc.is_enabled, Some(true));
        assert_eq!(vdcs.get("").await?, None);
        Ok(())
    }
}
