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

use crate::{ErrorKind, Result};

/// Collection loads models of one resource type.
///
/// `get` never fails for a resource that doesn't exist, it returns `None`
/// instead.
#[async_trait]
pub trait Collection: Send {
    /// Model materialized by this collection.
    type Model: Send;

    /// Load all models.
    async fn all(&mut self) -> Result<Vec<Self::Model>>;

    /// Load one model by its identity.
    async fn get(&mut self, id: &str) -> Result<Option<Self::Model>>;
}

/// NotFoundExt turns lookups that found nothing into `Ok(None)`.
pub trait NotFoundExt<T> {
    /// Map `NotFound` and `RequestInvalid` errors to `Ok(None)`.
    ///
    /// `RequestInvalid` is included because lookups with an empty or
    /// malformed identity can't match anything.
    fn not_found_as_none(self) -> Result<Option<T>>;
}

impl<T> NotFoundExt<T> for Result<T> {
    fn not_found_as_none(self) -> Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::RequestInvalid) => {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
