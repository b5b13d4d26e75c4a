//! Span descriptors for producer calls.
//!
//! A [`SpanDescriptor`] tells a span recorder how to measure one matched call
//! and what destination to tag it with. Descriptors are built per call and
//! dropped as soon as the recorder has read them.

use crate::constants::PHONE_NUMBER_PLACEHOLDER;
use crate::pipeline::Command;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Where a completion callback sits in a call's arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallbackPosition {
    None,
    Last,
}

/// Kind of destination a message is produced to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestinationType {
    Queue,
    Topic,
    Exchange,
    TempQueue,
    TempTopic,
}

impl DestinationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationType::Queue => "Queue",
            DestinationType::Topic => "Topic",
            DestinationType::Exchange => "Exchange",
            DestinationType::TempQueue => "TempQueue",
            DestinationType::TempTopic => "TempTopic",
        }
    }
}

impl fmt::Display for DestinationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanDescriptor {
    /// The measured call completes through a future
    pub is_async: bool,
    pub callback: CallbackPosition,
    pub destination_name: String,
    pub destination_type: DestinationType,
    /// Hide spans opened by the call itself from the trace tree
    pub opaque: bool,
}

/// Destination name of a publish call.
///
/// First present wins: `TopicArn`, then `TargetArn`, then the literal
/// `"PhoneNumber"`. The recipient's actual number is never returned.
///
/// # Examples
/// ```
/// use msgtrace_core::descriptor::derive_destination_name;
/// use serde_json::json;
///
/// assert_eq!(derive_destination_name(&json!({"TopicArn": "arn:1"})), "arn:1");
/// assert_eq!(derive_destination_name(&json!({"PhoneNumber": "+15551234567"})), "PhoneNumber");
/// ```
pub fn derive_destination_name(input: &Value) -> String {
    let field = |key: &str| {
        input
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    };

    field("TopicArn")
        .or_else(|| field("TargetArn"))
        .unwrap_or(PHONE_NUMBER_PLACEHOLDER)
        .to_string()
}

/// Descriptor for an SNS `PublishCommand`
pub fn sns_publish_spec(command: &Command) -> SpanDescriptor {
    SpanDescriptor {
        is_async: true,
        callback: CallbackPosition::Last,
        destination_name: derive_destination_name(command.input()),
        destination_type: DestinationType::Topic,
        opaque: true,
    }
}
