use crate::descriptor::SpanDescriptor;
use crate::pipeline::StepOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Event for logging a middleware step attached to a client
#[derive(Debug, Serialize, Deserialize)]
pub struct MiddlewareRegisteredEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub client: String,
    pub middleware: String,
    pub step: String,
    pub priority: String,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl MiddlewareRegisteredEvent {
    pub fn new(client: &str, options: &StepOptions) -> Self {
        Self {
            event_type: "MiddlewareRegistered".to_string(),
            client: client.to_string(),
            middleware: options.name.clone(),
            step: options.step.to_string(),
            priority: options.priority.to_string(),
            extra: HashMap::new(),
        }
    }

    pub fn with_extra(mut self, key: String, value: Value) -> Self {
        self.extra.insert(key, value);
        self
    }
}

impl std::fmt::Display for MiddlewareRegisteredEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "MiddlewareRegisteredEvent serialization error"),
        }
    }
}

/// Why instrumentation left a client alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    #[serde(rename = "SkipReason.NO_STACK")]
    NoStack,
    #[serde(rename = "SkipReason.NOT_TARGETED")]
    NotTargeted,
    #[serde(rename = "SkipReason.ALREADY_REGISTERED")]
    AlreadyRegistered,
    #[serde(rename = "SkipReason.DISABLED")]
    Disabled,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoStack => write!(f, "SkipReason.NO_STACK"),
            SkipReason::NotTargeted => write!(f, "SkipReason.NOT_TARGETED"),
            SkipReason::AlreadyRegistered => write!(f, "SkipReason.ALREADY_REGISTERED"),
            SkipReason::Disabled => write!(f, "SkipReason.DISABLED"),
        }
    }
}

/// Event for logging a client that was not instrumented
#[derive(Debug, Serialize, Deserialize)]
pub struct InstrumentationSkippedEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub client: String,
    pub reason: SkipReason,
}

impl InstrumentationSkippedEvent {
    pub fn new(client: &str, reason: SkipReason) -> Self {
        Self {
            event_type: "InstrumentationSkipped".to_string(),
            client: client.to_string(),
            reason,
        }
    }
}

impl std::fmt::Display for InstrumentationSkippedEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "InstrumentationSkippedEvent serialization error"),
        }
    }
}

/// Event for logging a measured producer call
#[derive(Debug, Serialize, Deserialize)]
pub struct ProduceRecordedEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub system: String,
    #[serde(flatten)]
    pub descriptor: SpanDescriptor,
    pub duration_ms: f64,
    pub error: Option<String>,
}

impl ProduceRecordedEvent {
    pub fn new(system: &str, descriptor: SpanDescriptor, duration_ms: f64, error: Option<String>) -> Self {
        Self {
            event_type: "ProduceRecorded".to_string(),
            system: system.to_string(),
            descriptor,
            duration_ms,
            error,
        }
    }
}

impl std::fmt::Display for ProduceRecordedEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "ProduceRecordedEvent serialization error"),
        }
    }
}

/// Install a global `tracing` subscriber filtered by `RUST_LOG`
/// (`msgtrace_core=info` when unset). Returns `false` if a global subscriber
/// was already installed.
#[cfg(feature = "subscriber")]
pub fn init_subscriber(json: bool) -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", crate::constants::ROOT_LOGGER_NAME)));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
