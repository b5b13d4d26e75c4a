//! Test utilities and helpers for msgtrace-core tests

#![allow(dead_code)]

use futures::future::BoxFuture;
use msgtrace_core::*;
use std::sync::{Arc, Mutex};

/// One call observed by a [`RecordingRecorder`]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub descriptor: SpanDescriptor,
    pub succeeded: bool,
}

/// Recorder that keeps every producer call it measures
#[derive(Debug, Default, Clone)]
pub struct RecordingRecorder {
    pub calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl RecordingRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl SpanRecorder for RecordingRecorder {
    fn record_produce(&self, system: &str, next: Handler, spec: SpecBuilder) -> Handler {
        let calls = Arc::clone(&self.calls);
        let system = system.to_string();
        Arc::new(move |command: Command| -> BoxFuture<'static, Result<CommandOutput>> {
            let descriptor = spec(&command);
            let next = Arc::clone(&next);
            let calls = Arc::clone(&calls);
            let system = system.clone();
            Box::pin(async move {
                let result = next(command).await;
                calls.lock().unwrap().push(RecordedCall {
                    system,
                    descriptor,
                    succeeded: result.is_ok(),
                });
                result
            })
        })
    }
}

/// Shared log of middleware names, in the order their handlers ran
pub type ExecutionLog = Arc<Mutex<Vec<String>>>;

/// Middleware appending `name` to `log` every time its handler runs
pub fn recording_middleware(name: &str, log: ExecutionLog) -> impl Middleware {
    let name = name.to_string();
    move |next: Handler, _context: &HandlerContext| -> Handler {
        let name = name.clone();
        let log = Arc::clone(&log);
        Arc::new(move |command: Command| -> BoxFuture<'static, Result<CommandOutput>> {
            log.lock().unwrap().push(name.clone());
            next(command)
        })
    }
}

/// Terminal handler answering every command with a fixed message id
pub fn fixed_terminal(message_id: &str) -> Handler {
    let message_id = message_id.to_string();
    Arc::new(move |_command: Command| -> BoxFuture<'static, Result<CommandOutput>> {
        let message_id = message_id.clone();
        Box::pin(async move { Ok(serde_json::json!({ "MessageId": message_id })) })
    })
}

/// Registry instrumenting `SNSClient` with `recorder`
pub fn sns_registry(recorder: &RecordingRecorder) -> Arc<InstrumentationRegistry> {
    Arc::new(InstrumentationRegistry::new().with(Arc::new(SnsInstrumentation::new(Arc::new(recorder.clone())))))
}

/// An instrumented `SNSClient` over a fresh in-memory transport
pub fn instrumented_sns_client(recorder: &RecordingRecorder) -> (MessagingClient, Arc<InMemoryTransport>) {
    let transport = Arc::new(InMemoryTransport::new());
    let client = ClientBuilder::new("SNSClient", transport.clone())
        .instrumentation(sns_registry(recorder))
        .build();
    (client, transport)
}

/// Context for `command` issued by an `SNSClient`
pub fn sns_context(command: &Command) -> HandlerContext {
    HandlerContext::new("SNSClient", command)
}
