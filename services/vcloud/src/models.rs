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

use serde::Deserialize;

/// Media type of an organization.
pub const ORG_MEDIA_TYPE: &str = "application/vnd.vmware.vcloud.org+xml";
/// Media type of a virtual datacenter.
pub const VDC_MEDIA_TYPE: &str = "application/vnd.vmware.vcloud.vdc+xml";

/// Link to another entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Link {
    /// Relation, for example `down` or `up`.
    #[serde(rename = "@rel", default)]
    pub rel: Option<String>,
    /// Media type of the linked entity.
    #[serde(rename = "@type", default)]
    pub media_type: Option<String>,
    /// Name of the linked entity.
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    /// Url of the linked entity.
    #[serde(rename = "@href")]
    pub href: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Session {
    #[serde(rename = "Link", default)]
    pub links: Vec<Link>,
}

impl Session {
    pub fn organization_uri(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.media_type.as_deref() == Some(ORG_MEDIA_TYPE))
            .map(|l| l.href.as_str())
    }
}

/// Organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Organization {
    /// Short name.
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    /// Url of this organization.
    #[serde(rename = "@href", default)]
    pub href: String,
    /// Media type.
    #[serde(rename = "@type", default)]
    pub media_type: Option<String>,
    /// Description.
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    /// Display name.
    #[serde(rename = "FullName", default)]
    pub full_name: Option<String>,
    /// Links to vdcs, catalogs and networks of this organization.
    #[serde(rename = "Link", default)]
    pub links: Vec<Link>,
}

impl Organization {
    /// Links of the given media type.
    pub fn links_of<'a>(&'a self, media_type: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        self.links
            .iter()
            .filter(move |l| l.media_type.as_deref() == Some(media_type))
    }
}

/// Virtual datacenter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Vdc {
    /// Name.
    #[serde(rename = "@name", default)]
    pub name: Option<String>,
    /// Url of this vdc.
    #[serde(rename = "@href", default)]
    pub href: String,
    /// Media type.
    #[serde(rename = "@type", default)]
    pub media_type: Option<String>,
    /// Description.
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    /// `AllocationVApp`, `AllocationPool` or `ReservationPool`.
    #[serde(rename = "AllocationModel", default)]
    pub allocation_model: Option<String>,
    /// Whether the vdc is enabled.
    #[serde(rename = "IsEnabled", default)]
    pub is_enabled: Option<bool>,
    /// Links of this vdc.
    #[serde(rename = "Link", default)]
    pub links: Vec<Link>,
}

/// A vdc known only by its link, `rel` is dropped.
impl From<Link> for Vdc {
    fn from(link: Link) -> Self {
        Vdc {
            name: link.name,
            href: link.href,
            media_type: link.media_type,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_session() -> Result<(), quick_xml::DeError> {
        let session: Session = quick_xml::de::from_str(
            r#"<Session xmlns="http://www.vmware.com/vcloud/v1.5" user="admin" org="MyOrg" type="application/vnd.vmware.vcloud.session+xml" href="https://vcloud.example.com/api/session/">
  <Link rel="down" type="application/vnd.vmware.vcloud.orgList+xml" href="https://vcloud.example.com/api/org/"/>
  <Link rel="down" type="application/vnd.vmware.vcloud.org+xml" name="MyOrg" href="https://vcloud.example.com/api/org/a93c9db9"/>
  <Link rel="remove" href="https://vcloud.example.com/api/session/"/>
</Session>"#,
        )?;

        assert_eq!(session.links.len(), 3);
        assert_eq!(
            session.organization_uri(),
            Some("https://vcloud.example.com/api/org/a93c9db9")
        );
        Ok(())
    }

    #[test]
    fn test_parse_vdc() -> Result<(), quick_xml::DeError> {
        let vdc: Vdc = quick_xml::de::from_str(
            r#"<Vdc xmlns="http://www.vmware.com/vcloud/v1.5" status="1" name="MyVdc" type="application/vnd.vmware.vcloud.vdc+xml" href="https://vcloud.example.com/api/vdc/52be2d4f">
  <Link rel="up" type="application/vnd.vmware.vcloud.org+xml" href="https://vcloud.example.com/api/org/a93c9db9"/>
  <Description>Example vdc</Description>
  <AllocationModel>AllocationPool</AllocationModel>
  <IsEnabled>true</IsEnabled>
</Vdc>"#,
        )?;

        assert_eq!(vdc.name.as_deref(), Some("MyVdc"));
        assert_eq!(vdc.allocation_model.as_deref(), Some("AllocationPool"));
        assert_eq!(vdc.is_enabled, Some(true));
        assert_eq!(vdc.links.len(), 1);
        Ok(())
    }

    #[test]
    fn test_vdc_from_link() {
        let vdc = Vdc::from(Link {
            rel: Some("down".to_string()),
            media_type: Some(VDC_MEDIA_TYPE.to_string()),
            name: Some("MyVdc".to_string()),
            href: "https://vcloud.example.com/api/vdc/52be2d4f".to_string(),
        });

        assert_eq!(vdc.name.as_deref(), Some("MyVdc"));
        assert_eq!(vdc.href, "https://vcloud.example.com/api/vdc/52be2d4f");
        assert!(vdc.links.is_empty());
    }
}
