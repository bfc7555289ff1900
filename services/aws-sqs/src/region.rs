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

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use nimbus_core::Error;

/// Region where SQS is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    /// `us-east-1`
    #[default]
    UsEast1,
    /// `us-west-1`
    UsWest1,
    /// `eu-west-1`
    EuWest1,
    /// `ap-southeast-1`
    ApSoutheast1,
}

impl Region {
    /// All supported regions.
    pub const ALL: [Region; 4] = [
        Region::UsEast1,
        Region::UsWest1,
        Region::EuWest1,
        Region::ApSoutheast1,
    ];

    /// Region identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::UsEast1 => "us-east-1",
            Region::UsWest1 => "us-west-1",
            Region::EuWest1 => "eu-west-1",
            Region::ApSoutheast1 => "ap-southeast-1",
        }
    }

    /// Queue service host of this region.
    pub fn host(&self) -> &'static str {
        match self {
            Region::UsEast1 => "queue.amazonaws.com",
            Region::UsWest1 => "us-west-1.queue.amazonaws.com",
            Region::EuWest1 => "eu-west-1.queue.amazonaws.com",
            Region::ApSoutheast1 => "ap-southeast-1.queue.amazonaws.com",
        }
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| Error::config_invalid(format!("unknown region: {s:?}")))
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_core::ErrorKind;
    use test_case::test_case;

    #[test_case("us-east-1", "queue.amazonaws.com")]
    #[test_case("us-west-1", "us-west-1.queue.amazonaws.com")]
    #[test_case("eu-west-1", "eu-west-1.queue.amazonaws.com")]
    #[test_case("ap-southeast-1", "ap-southeast-1.queue.amazonaws.com")]
    fn test_region_host(region: &str, host: &str) {
        let r: Region = region.parse().expect("region must be known");
        assert_eq!(r.host(), host);
        assert_eq!(r.to_string(), region);
    }

    #[test]
    fn test_unknown_region() {
        let err = "mars-1".parse::<Region>().expect_err("mars-1 is not a region");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert!(err.to_string().contains("mars-1"));
    }
}
