//! Constants used in the msgtrace-core crate.

/// Logger name used for root logger
pub const ROOT_LOGGER_NAME: &str = "msgtrace_core";

/// Logger name used for structured event logging
pub const EVENT_LOGGER_NAME: &str = "msgtrace_core.events";

/// Logger name used for developer intended trace logging. The content and format of this log should not be depended upon.
pub const TRACE_LOGGER_NAME: &str = "msgtrace_core.trace";

/// Client name the SNS instrumentation attaches to
pub const SNS_CLIENT_NAME: &str = "SNSClient";

/// Messaging library name recorded on SNS spans
pub const SNS_LIBRARY: &str = "SNS";

/// Name of the middleware step registered on SNS clients
pub const SNS_MIDDLEWARE_NAME: &str = "TracingSnsMiddleware";

/// Command name of an SNS publish
pub const PUBLISH_COMMAND: &str = "PublishCommand";

/// Destination name recorded when a publish goes straight to a phone number.
/// The number itself must never reach telemetry.
pub const PHONE_NUMBER_PLACEHOLDER: &str = "PhoneNumber";
