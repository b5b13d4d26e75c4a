//! # MsgTrace Core
//!
//! MsgTrace core records calls made through messaging clients as producer
//! spans. It hooks into a client's middleware pipeline when the client is
//! built, recognizes the operations worth recording (for SNS clients, the
//! `PublishCommand`), and hands every such call to a span recorder. All other
//! calls continue down the pipeline untouched.
//!
//! ## Features
//!
//! - **Ordered middleware pipelines**: named steps resolved by phase and priority
//! - **Construction-time instrumentation**: clients are instrumented as they are built
//! - **Classify-and-wrap**: only recognized operations are observed
//! - **Pluggable recorders**: `tracing` spans, OpenTelemetry spans, or nothing
//! - **Observability**: structured JSON events on dedicated log targets
//!
//! ## Quick Start
//!
//! ```rust
//! use msgtrace_core::{
//!     ClientBuilder, Command, InMemoryTransport, InstrumentationRegistry, PublishInput,
//!     SnsInstrumentation, TracingRecorder,
//! };
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let registry = InstrumentationRegistry::new()
//!     .with(Arc::new(SnsInstrumentation::new(Arc::new(TracingRecorder::new()))));
//!
//! let transport = Arc::new(InMemoryTransport::new());
//! let client = ClientBuilder::new("SNSClient", transport.clone())
//!     .instrumentation(Arc::new(registry))
//!     .build();
//! assert_eq!(client.middleware_stack().unwrap().names(), vec!["TracingSnsMiddleware"]);
//!
//! let output = client
//!     .send(Command::publish(PublishInput::to_phone_number("+15551234567", "hello")))
//!     .await
//!     .unwrap();
//! assert!(output["MessageId"].is_string());
//! assert_eq!(transport.published("+15551234567").await.len(), 1);
//! # });
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

// Error types (must be first for other modules to use)
pub mod error;
pub mod constants;

// Middleware pipeline model
pub mod pipeline;

// Span descriptors and the classify-and-wrap middleware
pub mod descriptor;
pub mod interception;

// Span recorders
pub mod telemetry;

// Construction-time registration
pub mod config;
pub mod instrumentation;

// Structured events and subscriber setup
pub mod logging;

// === Core Re-exports ===
pub use error::{MsgTraceError, Result};
pub use pipeline::{
    ClientBuilder, Command, CommandOutput, ConstructionHook, Handler, HandlerContext, MessagingClient,
    Middleware, MiddlewareStack, Plugin, Priority, PublishInput, Step, StepOptions, Transport,
};
pub use descriptor::{sns_publish_spec, CallbackPosition, DestinationType, SpanDescriptor};
pub use interception::{OperationClassifier, SnsClassifier, SnsOperation, TracingMiddleware};
pub use telemetry::{NoopRecorder, SpanRecorder, SpecBuilder, TracingRecorder};
pub use config::InstrumentationConfig;
pub use instrumentation::{Instrumentation, InstrumentationRegistry, SnsInstrumentation, TracingPlugin};

// === Runtime Re-exports ===
#[cfg(feature = "runtime")]
pub use pipeline::InMemoryTransport;

// === Telemetry Re-exports ===
#[cfg(feature = "telemetry")]
pub use telemetry::OtelRecorder;

/// Current version of msgtrace-core
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use constants::{EVENT_LOGGER_NAME, ROOT_LOGGER_NAME, TRACE_LOGGER_NAME};
