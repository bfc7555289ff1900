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
use std::fmt::Debug;

use async_trait::async_trait;
use http::{Method, StatusCode};
use nimbus_core::{Operation, Result};

use crate::Params;

/// Actions supported by SQS, in the order of their documentation.
pub static OPERATIONS: [Operation; 9] = [
    Operation::new("ChangeMessageVisibility", Method::POST, &[StatusCode::OK], true),
    Operation::new("CreateQueue", Method::POST, &[StatusCode::OK], true),
    Operation::new("DeleteMessage", Method::POST, &[StatusCode::OK], true),
    Operation::new("DeleteQueue", Method::POST, &[StatusCode::OK], true),
    Operation::new("GetQueueAttributes", Method::POST, &[StatusCode::OK], true),
    Operation::new("ListQueues", Method::POST, &[StatusCode::OK], true),
    Operation::new("ReceiveMessage", Method::POST, &[StatusCode::OK], false),
    Operation::new("SendMessage", Method::POST, &[StatusCode::OK], false),
    Operation::new("SetQueueAttributes", Method::POST, &[StatusCode::OK], true),
];

/// SqsApi is the operation surface shared by the real and the mock service.
///
/// Every call takes `&mut self`: one service handles one call at a time.
#[async_trait]
pub trait SqsApi: Debug + Send {
    /// Actions this service supports.
    fn operations(&self) -> &'static [Operation];

    /// Drop the transport, the next call dials again.
    fn reload(&mut self);

    /// Change the visibility timeout of a received message.
    async fn change_message_visibility(
        &mut self,
        queue_url: &str,
        receipt_handle: &str,
        visibility_timeout: u32,
    ) -> Result<RequestOutput>;

    /// Create a queue, returns the existing one if the name is taken with the
    /// same attributes.
    async fn create_queue(
        &mut self,
        name: &str,
        attributes: &BTreeMap<String, String>,
    ) -> Result<CreateQueueOutput>;

    /// Delete a message by its receipt handle.
    async fn delete_message(&mut self, queue_url: &str, receipt_handle: &str)
        -> Result<RequestOutput>;

    /// Delete a queue.
    async fn delete_queue(&mut self, queue_url: &str) -> Result<RequestOutput>;

    /// Get one attribute of a queue, `All` returns every attribute.
    async fn get_queue_attributes(
        &mut self,
        queue_url: &str,
        attribute_name: &str,
    ) -> Result<GetQueueAttributesOutput>;

    /// List queues, optionally filtered by name prefix.
    async fn list_queues(&mut self, prefix: Option<&str>) -> Result<ListQueuesOutput>;

    /// Receive messages from a queue.
    async fn receive_message(
        &mut self,
        queue_url: &str,
        options: &ReceiveMessageOptions,
    ) -> Result<ReceiveMessageOutput>;

    /// Send a message to a queue.
    async fn send_message(&mut self, queue_url: &str, body: &str) -> Result<SendMessageOutput>;

    /// Set one attribute of a queue.
    async fn set_queue_attributes(
        &mut self,
        queue_url: &str,
        name: &str,
        value: &str,
    ) -> Result<RequestOutput>;
}

/// Options of `ReceiveMessage`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiveMessageOptions {
    /// `MaxNumberOfMessages`, the service defaults to 1.
    pub max_number_of_messages: Option<u32>,
    /// `VisibilityTimeout` applied to the received messages.
    pub visibility_timeout: Option<u32>,
    /// Message attributes to return, for example `All` or `SenderId`.
    pub attribute_names: Vec<String>,
}

impl ReceiveMessageOptions {
    pub(crate) fn to_params(&self) -> Params {
        let mut params = Params::new();
        if let Some(v) = self.max_number_of_messages {
            params.insert("MaxNumberOfMessages".to_string(), v.to_string());
        }
        if let Some(v) = self.visibility_timeout {
            params.insert("VisibilityTimeout".to_string(), v.to_string());
        }
        for (idx, name) in self.attribute_names.iter().enumerate() {
            params.insert(format!("AttributeName.{}", idx + 1), name.clone());
        }
        params
    }
}

/// Output of actions which only return a request id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOutput {
    /// Request id assigned by the service.
    pub request_id: String,
}

/// Output of `CreateQueue`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateQueueOutput {
    /// Url of the queue, used by all queue scoped actions.
    pub queue_url: String,
    /// Request id assigned by the service.
    pub request_id: String,
}

/// Output of `GetQueueAttributes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetQueueAttributesOutput {
    /// Attribute name to value.
    pub attributes: BTreeMap<String, String>,
    /// Request id assigned by the service.
    pub request_id: String,
}

/// Output of `ListQueues`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQueuesOutput {
    /// Urls of the matched queues.
    pub queue_urls: Vec<String>,
    /// Request id assigned by the service.
    pub request_id: String,
}

/// A received message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Message id.
    pub message_id: String,
    /// Handle used to delete the message or change its visibility.
    pub receipt_handle: String,
    /// MD5 of the body.
    pub md5_of_body: String,
    /// Message body.
    pub body: String,
    /// Requested message attributes.
    pub attributes: BTreeMap<String, String>,
}

/// Output of `ReceiveMessage`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiveMessageOutput {
    /// Received messages, empty if the queue has none visible.
    pub messages: Vec<Message>,
    /// Request id assigned by the service.
    pub request_id: String,
}

/// Output of `SendMessage`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendMessageOutput {
    /// Id of the new message.
    pub message_id: String,
    /// MD5 of the body as received by the service.
    pub md5_of_message_body: String,
    /// Request id assigned by the service.
    pub request_id: String,
}
