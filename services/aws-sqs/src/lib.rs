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

//! Amazon Simple Queue Service (SQS) binding.
//!
//! Requests are signed with AWS query signature version 2 and sent as form
//! bodies. Every action has a mock counterpart which never touches the
//! network.
//!
//! ## Example
//!
//! ```no_run
//! use nimbus_aws_sqs::{Config, ReceiveMessageOptions};
//! use nimbus_core::{Context, OsEnv};
//!
//! # async fn example(ctx: Context) -> nimbus_core::Result<()> {
//! let ctx = ctx.with_env(OsEnv);
//! let config = Config::default().from_env(&ctx);
//! let mut sqs = config.build(&ctx)?;
//!
//! let queue = sqs.create_queue("orders", &Default::default()).await?;
//! sqs.send_message(&queue.queue_url, "hello").await?;
//! let received = sqs
//!     .receive_message(&queue.queue_url, &ReceiveMessageOptions::default())
//!     .await?;
//! for msg in received.messages {
//!     sqs.delete_message(&queue.queue_url, &msg.receipt_handle).await?;
//! }
//! # Ok(())
//! # }
//! ```

mod api;
pub use api::*;

mod config;
pub use config::Config;

mod constants;
pub use constants::{
    AWS_ACCESS_KEY_ID, AWS_REGION, AWS_SECRET_ACCESS_KEY, AWS_SESSION_TOKEN, NON_EXISTENT_QUEUE,
    SQS_API_VERSION,
};

mod credential;
pub use credential::Credential;

mod region;
pub use region::Region;

mod sign_request;
pub use sign_request::{Params, RequestSigner, SignatureMethod, SignedQuery};

mod parse;
pub use parse::parse_error;

mod service;
pub use service::SqsService;

mod mock;
pub use mock::{
    MockSqsService, MOCK_ACCOUNT_ID, MOCK_MD5_OF_MESSAGE_BODY, MOCK_MESSAGE_ID, MOCK_REQUEST_ID,
};

mod collection;
pub use collection::{Queue, Queues};
