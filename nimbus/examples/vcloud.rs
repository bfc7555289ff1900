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

use anyhow::Result;
use nimbus::vcloud::{Config, Vdcs};
use nimbus::{default_context, Collection};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // Reads VCLOUD_HOST, VCLOUD_USERNAME and VCLOUD_PASSWORD.
    let ctx = default_context();
    let mut api = Config::default().from_env(&ctx).build(&ctx)?;

    let mut vdcs = Vdcs::new(api.as_mut());
    println!("organization: {}", vdcs.organization_uri().await?);
    let listed = vdcs.all().await?;
    for summary in listed {
        // Listing only carries the link, fetch the full entity.
        let Some(vdc) = vdcs.get(&summary.href).await? else {
            continue;
        };
        println!(
            "{} enabled={:?} model={:?}",
            vdc.name.unwrap_or_default(),
            vdc.is_enabled,
            vdc.allocation_model
        );
    }
    Ok(())
}
