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

/// Region where load balancers are served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    /// Dallas, `dfw`
    #[default]
    Dfw,
    /// Chicago, `ord`
    Ord,
    /// London, `lon`
    Lon,
}

impl Region {
    /// Region identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Dfw => "dfw",
            Region::Ord => "ord",
            Region::Lon => "lon",
        }
    }

    /// Load balancer api host of this region.
    pub fn host(&self) -> String {
        format!("{}.loadbalancers.api.rackspacecloud.com", self.as_str())
    }

    /// Auth endpoint accounts of this region authenticate against.
    pub fn auth_url(&self) -> &'static str {
        match self {
            Region::Lon => "https://lon.auth.api.rackspacecloud.com/v1.0",
            _ => "https://auth.api.rackspacecloud.com/v1.0",
        }
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dfw" => Ok(Region::Dfw),
            "ord" => Ok(Region::Ord),
            "lon" => Ok(Region::Lon),
            _ => Err(Error::config_invalid(format!("unknown region: {s:?}"))),
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
