use crate::descriptor::SpanDescriptor;
use std::fmt::Display;

pub const MESSAGING_SYSTEM: &str = "messaging.system";
pub const MESSAGING_OPERATION: &str = "messaging.operation";
pub const MESSAGING_DESTINATION_NAME: &str = "messaging.destination.name";
pub const MESSAGING_DESTINATION_KIND: &str = "messaging.destination.kind";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagingOperation {
    Publish,
}

impl MessagingOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessagingOperation::Publish => "publish",
        }
    }

    /// OpenTelemetry span kind name for this operation
    pub fn span_kind(&self) -> &'static str {
        match self {
            MessagingOperation::Publish => "PRODUCER",
        }
    }
}

impl Display for MessagingOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attributes shared by every recorder for one producer span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProduceAttributes {
    pub system: String,
    pub operation: MessagingOperation,
    pub destination_name: String,
    pub destination_kind: &'static str,
}

impl ProduceAttributes {
    pub fn new(system: &str, descriptor: &SpanDescriptor) -> Self {
        Self {
            system: system.to_string(),
            operation: MessagingOperation::Publish,
            destination_name: descriptor.destination_name.clone(),
            destination_kind: descriptor.destination_type.as_str(),
        }
    }

    pub fn span_name(&self) -> String {
        format!("{} {} {}", self.system, self.operation, self.destination_name)
    }

    pub fn key_values(&self) -> Vec<(&'static str, String)> {
        vec![
            (MESSAGING_SYSTEM, self.system.clone()),
            (MESSAGING_OPERATION, self.operation.as_str().to_string()),
            (MESSAGING_DESTINATION_NAME, self.destination_name.clone()),
            (MESSAGING_DESTINATION_KIND, self.destination_kind.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{CallbackPosition, DestinationType};

    #[test]
    fn test_produce_attributes() {
        let descriptor = SpanDescriptor {
            is_async: true,
            callback: CallbackPosition::Last,
            destination_name: "arn:orders".to_string(),
            destination_type: DestinationType::Topic,
            opaque: true,
        };
        let attributes = ProduceAttributes::new("SNS", &descriptor);

        assert_eq!(attributes.span_name(), "SNS publish arn:orders");
        assert_eq!(attributes.operation.span_kind(), "PRODUCER");
        assert_eq!(
            attributes.key_values(),
            vec![
                ("messaging.system", "SNS".to_string()),
                ("messaging.operation", "publish".to_string()),
                ("messaging.destination.name", "arn:orders".to_string()),
                ("messaging.destination.kind", "Topic".to_string()),
            ]
        );
    }
}
