//! Classify-and-wrap middleware.
//!
//! [`TracingMiddleware`] looks at the operation name of every call passing
//! through the pipeline. Recognized operations are handed to a
//! [`SpanRecorder`]; for everything else the middleware hands back the
//! continuation it was given.
//!
//! Recognition is a closed enum per messaging library (see
//! [`OperationClassifier`]), so adding an operation is a compile-checked
//! change to the classifier rather than another string comparison.

use crate::constants::{PUBLISH_COMMAND, SNS_LIBRARY, TRACE_LOGGER_NAME};
use crate::descriptor::{sns_publish_spec, SpanDescriptor};
use crate::pipeline::{Command, Handler, HandlerContext, Middleware};
use crate::telemetry::{SpanRecorder, SpecBuilder};
use std::sync::Arc;

/// Maps operation names of one messaging library to the operations worth
/// recording, and builds their span descriptors.
pub trait OperationClassifier: Send + Sync + 'static {
    type Operation: Copy + Send + Sync + std::fmt::Debug + 'static;

    /// Messaging library name recorded on spans
    fn system(&self) -> &str;

    /// `None` means the call passes through unobserved
    fn classify(&self, command_name: &str) -> Option<Self::Operation>;

    fn descriptor(&self, operation: Self::Operation, command: &Command) -> SpanDescriptor;
}

/// Operations recorded on SNS clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnsOperation {
    Publish,
}

/// Classifier for SNS commands; only `PublishCommand` is recorded
#[derive(Debug, Clone, Copy)]
pub struct SnsClassifier {
    opaque: bool,
}

impl SnsClassifier {
    pub fn new() -> Self {
        Self { opaque: true }
    }

    pub fn with_opaque(mut self, opaque: bool) -> Self {
        self.opaque = opaque;
        self
    }
}

impl Default for SnsClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationClassifier for SnsClassifier {
    type Operation = SnsOperation;

    fn system(&self) -> &str {
        SNS_LIBRARY
    }

    fn classify(&self, command_name: &str) -> Option<SnsOperation> {
        match command_name {
            PUBLISH_COMMAND => Some(SnsOperation::Publish),
            _ => None,
        }
    }

    fn descriptor(&self, operation: SnsOperation, command: &Command) -> SpanDescriptor {
        match operation {
            SnsOperation::Publish => SpanDescriptor {
                opaque: self.opaque,
                ..sns_publish_spec(command)
            },
        }
    }
}

/// Middleware recording recognized operations as producer spans
pub struct TracingMiddleware<C: OperationClassifier> {
    classifier: Arc<C>,
    recorder: Arc<dyn SpanRecorder>,
}

impl<C: OperationClassifier> TracingMiddleware<C> {
    pub fn new(classifier: C, recorder: Arc<dyn SpanRecorder>) -> Self {
        Self {
            classifier: Arc::new(classifier),
            recorder,
        }
    }

    /// Wrap `next` if the call is recognized, otherwise return it as is.
    pub fn classify_and_wrap(&self, next: Handler, context: &HandlerContext) -> Handler {
        let Some(operation) = self.classifier.classify(&context.command_name) else {
            tracing::trace!(
                target: TRACE_LOGGER_NAME,
                command = %context.command_name,
                "command not recognized, passing through"
            );
            return next;
        };

        tracing::trace!(
            target: TRACE_LOGGER_NAME,
            command = %context.command_name,
            operation = ?operation,
            request_id = %context.request_id,
            "recording command as producer call"
        );
        let classifier = Arc::clone(&self.classifier);
        let spec: SpecBuilder = Arc::new(move |command: &Command| classifier.descriptor(operation, command));
        self.recorder.record_produce(self.classifier.system(), next, spec)
    }
}

impl<C: OperationClassifier> Middleware for TracingMiddleware<C> {
    fn wrap(&self, next: Handler, context: &HandlerContext) -> Handler {
        self.classify_and_wrap(next, context)
    }
}
