//! Span recording for intercepted calls.
//!
//! The interception layer never measures anything itself: it hands the
//! continuation of a matched call to a [`SpanRecorder`] together with a
//! [`SpecBuilder`], and the recorder decides how the call is measured and
//! reported.
//!
//! - [`TracingRecorder`] reports through the `tracing` crate
//! - `OtelRecorder` (feature `telemetry`) reports through OpenTelemetry
//! - [`NoopRecorder`] records nothing

#[cfg(feature = "telemetry")]
pub mod otel;
pub mod tracing;
pub mod tracing_config;

use crate::descriptor::SpanDescriptor;
use crate::pipeline::{Command, Handler};
use std::sync::Arc;

#[cfg(feature = "telemetry")]
pub use self::otel::OtelRecorder;
pub use self::tracing::TracingRecorder;
pub use self::tracing_config::{MessagingOperation, ProduceAttributes};

/// Builds the descriptor of one call from the command being executed
pub type SpecBuilder = Arc<dyn Fn(&Command) -> SpanDescriptor + Send + Sync>;

/// A tracing engine able to measure producer calls.
///
/// The handler returned by `record_produce` must call `spec` exactly once per
/// invocation, run `next`, and hand back `next`'s result or error untouched.
pub trait SpanRecorder: Send + Sync {
    fn record_produce(&self, system: &str, next: Handler, spec: SpecBuilder) -> Handler;
}

/// Recorder that leaves every call unmeasured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRecorder;

impl SpanRecorder for NoopRecorder {
    fn record_produce(&self, _system: &str, next: Handler, _spec: SpecBuilder) -> Handler {
        next
    }
}
