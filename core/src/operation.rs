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

use http::{Method, StatusCode};

use crate::Request;

/// Operation declares one remote action of a service.
///
/// Services keep a static table of operations and look up the entry for
/// every call, so the set of actions a service supports is visible without
/// reading all of its methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Action name as the provider knows it, for example `CreateQueue`.
    pub name: &'static str,
    /// HTTP method used for this action.
    pub method: Method,
    /// Status codes that mean success.
    pub expects: &'static [StatusCode],
    /// Whether sending this action twice has the same effect as once.
    pub idempotent: bool,
}

impl Operation {
    /// Declare a new operation.
    pub const fn new(
        name: &'static str,
        method: Method,
        expects: &'static [StatusCode],
        idempotent: bool,
    ) -> Self {
        Self {
            name,
            method,
            expects,
            idempotent,
        }
    }

    /// Start a request for this operation.
    pub fn request(&self) -> Request {
        Request::new(self.method.clone())
            .with_expects(self.expects)
            .with_idempotent(self.idempotent)
    }
}

/// Find an operation by name in a table.
pub fn find_operation<'a>(table: &'a [Operation], name: &str) -> Option<&'a Operation> {
    table.iter().find(|op| op.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: Operation = Operation::new("ListThings", Method::GET, &[StatusCode::OK], true);
    const UPDATE: Operation = Operation::new(
        "UpdateThing",
        Method::PUT,
        &[StatusCode::OK, StatusCode::ACCEPTED],
        false,
    );
    static TABLE: [Operation; 2] = [LIST, UPDATE];

    #[test]
    fn test_operation_request() {
        let req = UPDATE.request();

        assert_eq!(req.method(), Method::PUT);
        assert_eq!(req.expects(), &[StatusCode::OK, StatusCode::ACCEPTED]);
        assert!(!req.is_idempotent());
        assert!(LIST.request().is_idempotent());
    }

    #[test]
    fn test_find_operation() {
        assert_eq!(find_operation(&TABLE, "ListThings"), Some(&LIST));
        assert_eq!(find_operation(&TABLE, "DeleteThing"), None);
    }
}
