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

use bytes::Bytes;
use nimbus_core::{Error, ProviderError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::Message;

/// Every SQS response wraps an optional `<ActionResult>` and the metadata.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Envelope<T: Default> {
    #[serde(
        default,
        alias = "CreateQueueResult",
        alias = "GetQueueAttributesResult",
        alias = "ListQueuesResult",
        alias = "ReceiveMessageResult",
        alias = "SendMessageResult"
    )]
    pub result: T,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ResponseMetadata {
    #[serde(default)]
    pub request_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Empty {}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct CreateQueueResult {
    pub queue_url: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQueuesResult {
    #[serde(rename = "QueueUrl", default)]
    pub queue_urls: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GetQueueAttributesResult {
    #[serde(rename = "Attribute", default)]
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Attribute {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReceiveMessageResult {
    #[serde(rename = "Message", default)]
    pub messages: Vec<MessageXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct MessageXml {
    pub message_id: String,
    pub receipt_handle: String,
    #[serde(rename = "MD5OfBody", default)]
    pub md5_of_body: String,
    #[serde(default)]
    pub body: String,
    #[serde(rename = "Attribute", default)]
    pub attributes: Vec<Attribute>,
}

impl From<MessageXml> for Message {
    fn from(v: MessageXml) -> Self {
        Message {
            message_id: v.message_id,
            receipt_handle: v.receipt_handle,
            md5_of_body: v.md5_of_body,
            body: v.body,
            attributes: into_map(v.attributes),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SendMessageResult {
    pub message_id: String,
    #[serde(rename = "MD5OfMessageBody", default)]
    pub md5_of_message_body: String,
}

pub(crate) fn into_map(attrs: Vec<Attribute>) -> BTreeMap<String, String> {
    attrs.into_iter().map(|a| (a.name, a.value)).collect()
}

/// Parse a successful response body.
pub(crate) fn parse_response<T: DeserializeOwned + Default>(body: &Bytes) -> Result<Envelope<T>> {
    let text = std::str::from_utf8(body)
        .map_err(|e| Error::unexpected("response body is not valid utf-8").with_source(e))?;
    Ok(quick_xml::de::from_str(text)?)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorResponseXml {
    #[serde(default)]
    error: ErrorXml,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorXml {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Extract code and message from an `<ErrorResponse>` body.
pub fn parse_error(body: &[u8]) -> Option<ProviderError> {
    let text = std::str::from_utf8(body).ok()?;
    let resp: ErrorResponseXml = quick_xml::de::from_str(text).ok()?;
    if resp.error.code.is_none() && resp.error.message.is_none() {
        return None;
    }

    Some(ProviderError {
        code: resp.error.code,
        message: resp.error.message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_create_queue() -> Result<()> {
        let body = Bytes::from_static(
            br#"<CreateQueueResponse xmlns="http://queue.amazonaws.com/doc/2009-02-01/">
  <CreateQueueResult>
    <QueueUrl>https://queue.amazonaws.com/123456789012/orders</QueueUrl>
  </CreateQueueResult>
  <ResponseMetadata>
    <RequestId>7a62c49f-347e-4fc4-9331-6e8e7a96aa73</RequestId>
  </ResponseMetadata>
</CreateQueueResponse>"#,
        );

        let resp: Envelope<CreateQueueResult> = parse_response(&body)?;
        assert_eq!(
            resp.result.queue_url,
            "https://queue.amazonaws.com/123456789012/orders"
        );
        assert_eq!(
            resp.response_metadata.request_id,
            "7a62c49f-347e-4fc4-9331-6e8e7a96aa73"
        );
        Ok(())
    }

    #[test]
    fn test_parse_list_queues() -> Result<()> {
        let body = Bytes::from_static(
            br#"<ListQueuesResponse>
  <ListQueuesResult>
    <QueueUrl>https://queue.amazonaws.com/123456789012/a</QueueUrl>
    <QueueUrl>https://queue.amazonaws.com/123456789012/b</QueueUrl>
  </ListQueuesResult>
  <ResponseMetadata><RequestId>r-1</RequestId></ResponseMetadata>
</ListQueuesResponse>"#,
        );

        let resp: Envelope<ListQueuesResult> = parse_response(&body)?;
        assert_eq!(resp.result.queue_urls.len(), 2);
        assert_eq!(resp.response_metadata.request_id, "r-1");

        let empty = Bytes::from_static(
            br#"<ListQueuesResponse><ListQueuesResult/><ResponseMetadata><RequestId>r-2</RequestId></ResponseMetadata></ListQueuesResponse>"#,
        );
        let resp: Envelope<ListQueuesResult> = parse_response(&empty)?;
        assert!(resp.result.queue_urls.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_receive_message() -> Result<()> {
        let body = Bytes::from_static(
            br#"<ReceiveMessageResponse>
  <ReceiveMessageResult>
    <Message>
      <MessageId>5fea7756-0ea4-451a-a703-a558b933e274</MessageId>
      <ReceiptHandle>MbZj6wDWli+JvwwJaBV+3dcjk2YW2vA3+STFFljTM8tJJg6HRG6PYSasuWXPJB+Cw</ReceiptHandle>
      <MD5OfBody>fafb00f5732ab283681e124bf8747ed1</MD5OfBody>
      <Body>This is a test message</Body>
      <Attribute><Name>SenderId</Name><Value>195004372649</Value></Attribute>
    </Message>
  </ReceiveMessageResult>
  <ResponseMetadata><RequestId>b6633655-283d-45b4-aee4-4e84e0ae6afa</RequestId></ResponseMetadata>
</ReceiveMessageResponse>"#,
        );

        let resp: Envelope<ReceiveMessageResult> = parse_response(&body)?;
        let messages: Vec<Message> = resp.result.messages.into_iter().map(Message::from).collect();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].body, "This is a test message");
        assert_eq!(messages[0].md5_of_body, "fafb00f5732ab283681e124bf8747ed1");
        assert_eq!(
            messages[0].attributes.get("SenderId").map(String::as_str),
            Some("195004372649")
        );
        Ok(())
    }

    #[test]
    fn test_parse_request_id_only() -> Result<()> {
        let body = Bytes::from_static(
            br#"<DeleteQueueResponse><ResponseMetadata><RequestId>r-3</RequestId></ResponseMetadata></DeleteQueueResponse>"#,
        );

        let resp: Envelope<Empty> = parse_response(&body)?;
        assert_eq!(resp.response_metadata.request_id, "r-3");
        Ok(())
    }

    #[test]
    fn test_parse_error() {
        let body = br#"<ErrorResponse>
  <Error>
    <Type>Sender</Type>
    <Code>AWS.SimpleQueueService.NonExistentQueue</Code>
    <Message>The specified queue does not exist for this wsdl version.</Message>
    <Detail/>
  </Error>
  <RequestId>42d59b56-7407-4c4a-be0f-4c88daeea257</RequestId>
</ErrorResponse>"#;

        assert_eq!(
            parse_error(body),
            Some(ProviderError {
                code: Some("AWS.SimpleQueueService.NonExistentQueue".to_string()),
                message: Some(
                    "The specified queue does not exist for this wsdl version.".to_string()
                ),
            })
        );
        assert_eq!(parse_error(b"<html>bad gateway</html>"), None);
        assert_eq!(parse_error(b"not xml at all"), None);
    }
}
