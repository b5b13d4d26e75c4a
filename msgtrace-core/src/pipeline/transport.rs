//! Transport seam: the terminal step that actually executes a command.

use super::{Command, CommandOutput};
use crate::error::Result;
use async_trait::async_trait;

/// Executes a command against the messaging service.
///
/// Results and errors are handed back through the pipeline unchanged.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, command: &Command) -> Result<CommandOutput>;
}

#[cfg(feature = "runtime")]
mod in_memory {
    use super::Transport;
    use crate::constants::PUBLISH_COMMAND;
    use crate::error::{Result, TransportError};
    use crate::pipeline::{Command, CommandOutput, PublishInput};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::{BTreeMap, HashMap};
    use tokio::sync::Mutex;

    const CREATE_TOPIC_COMMAND: &str = "CreateTopicCommand";
    const LIST_TOPICS_COMMAND: &str = "ListTopicsCommand";
    const TOPIC_ARN_PREFIX: &str = "arn:aws:sns:local:000000000000:";

    #[derive(Default)]
    struct State {
        topics: BTreeMap<String, String>,
        published: HashMap<String, Vec<PublishInput>>,
        calls: usize,
    }

    /// Process-local stand-in for a topic-based messaging service.
    ///
    /// Understands `CreateTopicCommand`, `ListTopicsCommand` and
    /// `PublishCommand`; any other command is rejected as unsupported.
    #[derive(Default)]
    pub struct InMemoryTransport {
        state: Mutex<State>,
        failure: Option<String>,
    }

    impl InMemoryTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// A transport that rejects every command with `reason`
        pub fn failing<R: Into<String>>(reason: R) -> Self {
            Self {
                state: Mutex::default(),
                failure: Some(reason.into()),
            }
        }

        /// Messages delivered to `destination` so far, oldest first
        pub async fn published(&self, destination: &str) -> Vec<PublishInput> {
            let state = self.state.lock().await;
            state.published.get(destination).cloned().unwrap_or_default()
        }

        /// Number of commands that reached the transport
        pub async fn call_count(&self) -> usize {
            self.state.lock().await.calls
        }

        fn rejected(command: &Command, reason: impl Into<String>) -> TransportError {
            TransportError::Rejected {
                command: command.name.clone(),
                reason: reason.into(),
            }
        }

        fn publish(state: &mut State, command: &Command) -> Result<CommandOutput> {
            let input: PublishInput = serde_json::from_value(command.input.clone())
                .map_err(|e| Self::rejected(command, e.to_string()))?;
            let destination = input
                .destination()
                .map(str::to_string)
                .ok_or_else(|| Self::rejected(command, "no destination given"))?;
            if let Some(topic_arn) = &input.topic_arn {
                if !state.topics.values().any(|arn| arn == topic_arn) {
                    return Err(Self::rejected(command, format!("topic '{}' does not exist", topic_arn)).into());
                }
            }

            state.published.entry(destination).or_default().push(input);
            Ok(json!({ "MessageId": uuid::Uuid::new_v4().to_string() }))
        }

        fn create_topic(state: &mut State, command: &Command) -> Result<CommandOutput> {
            let name = command
                .input
                .get("Name")
                .and_then(Value::as_str)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| Self::rejected(command, "missing Name"))?;
            let arn = state
                .topics
                .entry(name.to_string())
                .or_insert_with(|| format!("{}{}", TOPIC_ARN_PREFIX, name))
                .clone();
            Ok(json!({ "TopicArn": arn }))
        }
    }

    #[async_trait]
    impl Transport for InMemoryTransport {
        async fn send(&self, command: &Command) -> Result<CommandOutput> {
            let mut state = self.state.lock().await;
            state.calls += 1;

            if let Some(reason) = &self.failure {
                return Err(Self::rejected(command, reason.clone()).into());
            }

            match command.name.as_str() {
                PUBLISH_COMMAND => Self::publish(&mut state, command),
                CREATE_TOPIC_COMMAND => Self::create_topic(&mut state, command),
                LIST_TOPICS_COMMAND => {
                    let topics: Vec<Value> = state
                        .topics
                        .values()
                        .map(|arn| json!({ "TopicArn": arn }))
                        .collect();
                    Ok(json!({ "Topics": topics }))
                }
                other => Err(TransportError::UnsupportedCommand {
                    command: other.to_string(),
                }
                .into()),
            }
        }
    }

}

#[cfg(feature = "runtime")]
pub use in_memory::InMemoryTransport;
