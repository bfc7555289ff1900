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

use std::collections::BTreeMap;

use async_trait::async_trait;
use log::debug;
use nimbus_core::utils::non_empty;
use nimbus_core::{Error, Operation, Result};

use crate::{
    CreateQueueOutput, GetQueueAttributesOutput, ListQueuesOutput, ReceiveMessageOptions,
    ReceiveMessageOutput, RequestOutput, SendMessageOutput, SqsApi, OPERATIONS,
};

/// Request id returned by every mocked call.
pub const MOCK_REQUEST_ID: &str = "7a62c49f-347e-4fc4-9331-6e8e7a96aa73";
/// Account id used in mocked queue urls.
pub const MOCK_ACCOUNT_ID: &str = "123456789012";
/// Message id returned by a mocked `SendMessage`.
pub const MOCK_MESSAGE_ID: &str = "5fea7756-0ea4-451a-a703-a558b933e274";
/// MD5 returned by a mocked `SendMessage`.
pub const MOCK_MD5_OF_MESSAGE_BODY: &str = "fafb00f5732ab283681e124bf8747ed1";

/// MockSqsService answers every call with static values.
///
/// It never opens a connection and keeps no state between calls.
#[derive(Debug, Default)]
pub struct MockSqsService {}

impl MockSqsService {
    /// Create a new mock service.
    pub fn new() -> Self {
        Self {}
    }

    fn output(&self, action: &str) -> RequestOutput {
        debug!("mocked sqs action {action}");
        RequestOutput {
            request_id: MOCK_REQUEST_ID.to_string(),
        }
    }
}

fn check(name: &str, value: &str) -> Result<()> {
    match non_empty(value) {
        Some(_) => Ok(()),
        None => Err(Error::request_invalid(format!("{name} is required"))),
    }
}

#[async_trait]
impl SqsApi for MockSqsService {
    fn operations(&self) -> &'static [Operation] {
        &OPERATIONS
    }

    fn reload(&mut self) {}

    async fn change_message_visibility(
        &mut self,
        queue_url: &str,
        receipt_handle: &str,
        _: u32,
    ) -> Result<RequestOutput> {
        check("queue url", queue_url)?;
        check("receipt handle", receipt_handle)?;
        Ok(self.output("ChangeMessageVisibility"))
    }

    async fn create_queue(
        &mut self,
        name: &str,
        _: &BTreeMap<String, String>,
    ) -> Result<CreateQueueOutput> {
        check("queue name", name)?;
        let out = self.output("CreateQueue");
        Ok(CreateQueueOutput {
            queue_url: format!("https://queue.amazonaws.com/{MOCK_ACCOUNT_ID}/{name}"),
            request_id: out.request_id,
        })
    }

    async fn delete_message(
        &mut self,
        queue_url: &str,
        receipt_handle: &str,
    ) -> Result<RequestOutput> {
        check("queue url", queue_url)?;
        check("receipt handle", receipt_handle)?;
        Ok(self.output("DeleteMessage"))
    }

    async fn delete_queue(&mut self, queue_url: &str) -> Result<RequestOutput> {
        check("queue url", queue_url)?;
        Ok(self.output("DeleteQueue"))
    }

    async fn get_queue_attributes(
        &mut self,
        queue_url: &str,
        attribute_name: &str,
    ) -> Result<GetQueueAttributesOutput> {
        check("queue url", queue_url)?;
        check("attribute name", attribute_name)?;
        let out = self.output("GetQueueAttributes");
        Ok(GetQueueAttributesOutput {
            attributes: BTreeMap::new(),
            request_id: out.request_id,
        })
    }

    async fn list_queues(&mut self, _: Option<&str>) -> Result<ListQueuesOutput> {
        let out = self.output("ListQueues");
        Ok(ListQueuesOutput {
            queue_urls: vec![],
            request_id: out.request_id,
        })
    }

    async fn receive_message(
        &mut self,
        queue_url: &str,
        _: &ReceiveMessageOptions,
    ) -> Result<ReceiveMessageOutput> {
        check("queue url", queue_url)?;
        let out = self.output("ReceiveMessage");
        Ok(ReceiveMessageOutput {
            messages: vec![],
            request_id: out.request_id,
        })
    }

    async fn send_message(&mut self, queue_url: &str, body: &str) -> Result<SendMessageOutput> {
        check("queue url", queue_url)?;
        if body.is_empty() {
            return Err(Error::request_invalid("message body is required"));
        }
        let out = self.output("SendMessage");
        Ok(SendMessageOutput {
            message_id: MOCK_MESSAGE_ID.to_string(),
            md5_of_message_body: MOCK_MD5_OF_MESSAGE_BODY.to_string(),
            request_id: out.request_id,
        })
    }

    async fn set_queue_attributes(
        &mut self,
        queue_url: &str,
        name: &str,
        _: &str,
    ) -> Result<RequestOutput> {
        check("queue url", queue_url)?;
        check("attribute name", name)?;
        Ok(self.output("SetQueueAttributes"))
    }
}
