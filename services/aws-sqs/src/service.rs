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
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method, Uri};
use log::debug;
use nimbus_core::utils::non_empty;
use nimbus_core::{find_operation, Connection, Context, Error, Operation, Result};

use crate::constants::{FORM_CONTENT_TYPE, NON_EXISTENT_QUEUE, SQS_API_VERSION};
use crate::parse::{
    into_map, parse_error, parse_response, CreateQueueResult, Empty, Envelope,
    GetQueueAttributesResult, ListQueuesResult, ReceiveMessageResult, SendMessageResult,
};
use crate::{
    Config, CreateQueueOutput, Credential, GetQueueAttributesOutput, ListQueuesOutput, Params,
    ReceiveMessageOptions, ReceiveMessageOutput, RequestOutput, RequestSigner, SendMessageOutput,
    SqsApi, OPERATIONS,
};

/// SqsService talks to the real SQS endpoint.
#[derive(Debug)]
pub struct SqsService {
    conn: Connection,
    signer: RequestSigner,
    credential: Credential,
    operations: &'static [Operation],
}

impl SqsService {
    /// Create a new service from config.
    ///
    /// Credentials and endpoint are validated here, nothing is dialed until
    /// the first call.
    pub fn new(ctx: Context, config: &Config) -> Result<Self> {
        let credential = config.credential()?;
        let endpoint = config.endpoint()?;
        debug!("sqs service is using endpoint {endpoint}");

        let conn = Connection::new(ctx, endpoint, config.persistent).with_error_parser(parse_error);

        Ok(Self {
            conn,
            signer: RequestSigner::new(SQS_API_VERSION),
            credential,
            operations: &OPERATIONS,
        })
    }

    /// Replace the request signer.
    pub fn with_signer(mut self, signer: RequestSigner) -> Self {
        self.signer = signer;
        self
    }

    /// Send one action.
    ///
    /// `path` is the queue path for queue scoped actions, `None` means the
    /// endpoint's base path.
    async fn send(
        &mut self,
        action: &str,
        path: Option<&str>,
        params: Params,
    ) -> Result<http::Response<Bytes>> {
        let op = find_operation(self.operations, action)
            .ok_or_else(|| Error::unexpected(format!("action {action} is not declared")))?;

        let path = self.conn.endpoint().resolve_path(path);
        let signed = self.signer.sign(
            &op.method,
            self.conn.endpoint(),
            &path,
            op.name,
            &params,
            &self.credential,
        )?;

        let mut req = op
            .request()
            .with_path(path)
            .with_header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        req = if op.method == Method::GET {
            req.with_query(signed.query)
        } else {
            req.with_body(signed.query)
        };

        self.conn.request(req).await.map_err(|err| {
            let missing = err
                .response()
                .and_then(|resp| resp.code.as_deref())
                .is_some_and(|code| code == NON_EXISTENT_QUEUE);
            if !missing {
                return err;
            }

            match err.response().cloned() {
                Some(resp) => Error::not_found(err.to_string()).with_response(resp),
                None => err,
            }
        })
    }
}

/// Extract the path of a queue url, which is where queue scoped actions are sent.
fn queue_path(queue_url: &str) -> Result<String> {
    let Some(queue_url) = non_empty(queue_url) else {
        return Err(Error::request_invalid("queue url is required"));
    };

    let uri: Uri = queue_url.parse().map_err(|e| {
        Error::request_invalid(format!("queue url {queue_url} is not a valid url")).with_source(e)
    })?;
    let path = uri.path();
    if path.is_empty() || path == "/" {
        return Err(Error::request_invalid(format!(
            "queue url {queue_url} doesn't contain a queue path"
        )));
    }

    Ok(path.to_string())
}

fn required<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    non_empty(value).ok_or_else(|| Error::request_invalid(format!("{name} is required")))
}

#[async_trait]
impl SqsApi for SqsService {
    fn operations(&self) -> &'static [Operation] {
        self.operations
    }

    fn reload(&mut self) {
        self.conn.reset()
    }

    async fn change_message_visibility(
        &mut self,
        queue_url: &str,
        receipt_handle: &str,
        visibility_timeout: u32,
    ) -> Result<RequestOutput> {
        let path = queue_path(queue_url)?;
        let receipt_handle = required("receipt handle", receipt_handle)?;

        let params = Params::from([
            ("ReceiptHandle".to_string(), receipt_handle.to_string()),
            (
                "VisibilityTimeout".to_string(),
                visibility_timeout.to_string(),
            ),
        ]);
        let resp = self
            .send("ChangeMessageVisibility", Some(&path), params)
            .await?;

        let out: Envelope<Empty> = parse_response(resp.body())?;
        Ok(RequestOutput {
            request_id: out.response_metadata.request_id,
        })
    }

    async fn create_queue(
        &mut self,
        name: &str,
        attributes: &BTreeMap<String, String>,
    ) -> Result<CreateQueueOutput> {
        let name = required("queue name", name)?;

        let mut params = Params::from([("QueueName".to_string(), name.to_string())]);
        for (idx, (k, v)) in attributes.iter().enumerate() {
            params.insert(format!("Attribute.{}.Name", idx + 1), k.clone());
            params.insert(format!("Attribute.{}.Value", idx + 1), v.clone());
        }
        let resp = self.send("CreateQueue", None, params).await?;

        let out: Envelope<CreateQueueResult> = parse_response(resp.body())?;
        Ok(CreateQueueOutput {
            queue_url: out.result.queue_url,
            request_id: out.response_metadata.request_id,
        })
    }

    async fn delete_message(
        &mut self,
        queue_url: &str,
        receipt_handle: &str,
    ) -> Result<RequestOutput> {
        let path = queue_path(queue_url)?;
        let receipt_handle = required("receipt handle", receipt_handle)?;

        let params = Params::from([("ReceiptHandle".to_string(), receipt_handle.to_string())]);
        let resp = self.send("DeleteMessage", Some(&path), params).await?;

        let out: Envelope<Empty> = parse_response(resp.body())?;
        Ok(RequestOutput {
            request_id: out.response_metadata.request_id,
        })
    }

    async fn delete_queue(&mut self, queue_url: &str) -> Result<RequestOutput> {
        let path = queue_path(queue_url)?;

        let resp = self.send("DeleteQueue", Some(&path), Params::new()).await?;

        let out: Envelope<Empty> = parse_response(resp.body())?;
        Ok(RequestOutput {
            request_id: out.response_metadata.request_id,
        })
    }

    async fn get_queue_attributes(
        &mut self,
        queue_url: &str,
        attribute_name: &str,
    ) -> Result<GetQueueAttributesOutput> {
        let path = queue_path(queue_url)?;
        let attribute_name = required("attribute name", attribute_name)?;

        let params = Params::from([("AttributeName.1".to_string(), attribute_name.to_string())]);
        let resp = self
            .send("GetQueueAttributes", Some(&path), params)
            .await?;

        let out: Envelope<GetQueueAttributesResult> = parse_response(resp.body())?;
        Ok(GetQueueAttributesOutput {
            attributes: into_map(out.result.attributes),
            request_id: out.response_metadata.request_id,
        })
    }

    async fn list_queues(&mut self, prefix: Option<&str>) -> Result<ListQueuesOutput> {
        let mut params = Params::new();
        if let Some(prefix) = prefix.and_then(non_empty) {
            params.insert("QueueNamePrefix".to_string(), prefix.to_string());
        }
        let resp = self.send("ListQueues", None, params).await?;

        let out: Envelope<ListQueuesResult> = parse_response(resp.body())?;
        Ok(ListQueuesOutput {
            queue_urls: out.result.queue_urls,
            request_id: out.response_metadata.request_id,
        })
    }

    async fn receive_message(
        &mut self,
        queue_url: &str,
        options: &ReceiveMessageOptions,
    ) -> Result<ReceiveMessageOutput> {
        let path = queue_path(queue_url)?;

        let resp = self
            .send("ReceiveMessage", Some(&path), options.to_params())
            .await?;

        let out: Envelope<ReceiveMessageResult> = parse_response(resp.body())?;
        Ok(ReceiveMessageOutput {
            messages: out.result.messages.into_iter().map(Into::into).collect(),
            request_id: out.response_metadata.request_id,
        })
    }

    async fn send_message(&mut self, queue_url: &str, body: &str) -> Result<SendMessageOutput> {
        let path = queue_path(queue_url)?;
        // Whitespace is a valid payload, only an absent body is rejected.
        if body.is_empty() {
            return Err(Error::request_invalid("message body is required"));
        }

        let params = Params::from([("MessageBody".to_string(), body.to_string())]);
        let resp = self.send("SendMessage", Some(&path), params).await?;

        let out: Envelope<SendMessageResult> = parse_response(resp.body())?;
        Ok(SendMessageOutput {
            message_id: out.result.message_id,
            md5_of_message_body: out.result.md5_of_message_body,
            request_id: out.response_metadata.request_id,
        })
    }

    async fn set_queue_attributes(
        &mut self,
        queue_url: &str,
        name: &str,
        value: &str,
    ) -> Result<RequestOutput> {
        let path = queue_path(queue_url)?;
        let name = required("attribute name", name)?;

        let params = Params::from([
            ("Attribute.Name".to_string(), name.to_string()),
            ("Attribute.Value".to_string(), value.to_string()),
        ]);
        let resp = self
            .send("SetQueueAttributes", Some(&path), params)
            .await?;

        let out: Envelope<Empty> = parse_response(resp.body())?;
        Ok(RequestOutput {
            request_id: out.response_metadata.request_id,
        })
    }
}
