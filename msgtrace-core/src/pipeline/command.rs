//! Commands flowing through a client pipeline and their per-call context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result value produced by a transport for a command
pub type CommandOutput = Value;

/// A logical call issued through a client: an operation name plus its
/// operation-specific input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Operation name, e.g. `PublishCommand`
    pub name: String,
    /// Operation-specific parameters
    pub input: Value,
}

impl Command {
    pub fn new<N: Into<String>>(name: N, input: Value) -> Self {
        Self {
            name: name.into(),
            input,
        }
    }

    /// Build a `PublishCommand` from typed input
    pub fn publish(input: PublishInput) -> Self {
        Self::new(crate::constants::PUBLISH_COMMAND, input.into())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input(&self) -> &Value {
        &self.input
    }
}

/// Input of a publish call. Exactly one destination is normally set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublishInput {
    #[serde(default)]
    pub topic_arn: Option<String>,
    #[serde(default)]
    pub target_arn: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub message: String,
    #[serde(default)]
    pub subject: Option<String>,
}

/// Wire form of the input; unset optional fields are left out
impl From<PublishInput> for Value {
    fn from(input: PublishInput) -> Self {
        let mut fields = Map::new();
        let optional = [
            ("TopicArn", input.topic_arn),
            ("TargetArn", input.target_arn),
            ("PhoneNumber", input.phone_number),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                fields.insert(key.to_string(), Value::String(value));
            }
        }
        fields.insert("Message".to_string(), Value::String(input.message));
        if let Some(subject) = input.subject {
            fields.insert("Subject".to_string(), Value::String(subject));
        }
        Value::Object(fields)
    }
}

impl PublishInput {
    pub fn to_topic<A: Into<String>, M: Into<String>>(topic_arn: A, message: M) -> Self {
        Self {
            topic_arn: Some(topic_arn.into()),
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn to_target<A: Into<String>, M: Into<String>>(target_arn: A, message: M) -> Self {
        Self {
            target_arn: Some(target_arn.into()),
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn to_phone_number<P: Into<String>, M: Into<String>>(phone_number: P, message: M) -> Self {
        Self {
            phone_number: Some(phone_number.into()),
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_subject<S: Into<String>>(mut self, subject: S) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Destination the transport delivers to, recipient included
    pub fn destination(&self) -> Option<&str> {
        self.topic_arn
            .as_deref()
            .or(self.target_arn.as_deref())
            .or(self.phone_number.as_deref())
    }
}

/// Per-call context handed to every middleware while the pipeline is resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerContext {
    /// Name of the client issuing the call
    pub client_name: String,
    /// Operation name of the command
    pub command_name: String,
    /// Snapshot of the command input
    pub input: Value,
    /// Unique id of this call
    pub request_id: String,
    /// When the call entered the pipeline
    pub created_at: DateTime<Utc>,
}

impl HandlerContext {
    pub fn new(client_name: &str, command: &Command) -> Self {
        Self {
            client_name: client_name.to_string(),
            command_name: command.name.clone(),
            input: command.input.clone(),
            request_id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        }
    }
}
