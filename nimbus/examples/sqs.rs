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
use nimbus::aws::{Config, Queues, ReceiveMessageOptions};
use nimbus::{default_context, Collection};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // Credentials and region come from AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY
    // and AWS_REGION.
    let ctx = default_context();
    let mut sqs = Config::default().from_env(&ctx).build(&ctx)?;

    let queue = Queues::new(sqs.as_mut())
        .create("nimbus-example", &Default::default())
        .await?;
    println!("queue: {}", queue.url);

    let sent = sqs.send_message(&queue.url, "hello from nimbus").await?;
    println!("sent message {}", sent.message_id);

    let received = sqs
        .receive_message(
            &queue.url,
            &ReceiveMessageOptions {
                max_number_of_messages: Some(10),
                ..Default::default()
            },
        )
        .await?;
    for msg in received.messages {
        println!("received {}: {}", msg.message_id, msg.body);
        sqs.delete_message(&queue.url, &msg.receipt_handle).await?;
    }

    for queue in Queues::new(sqs.as_mut()).all().await? {
        println!("found queue {}", queue.name());
    }

    sqs.delete_queue(&queue.url).await?;
    Ok(())
}
