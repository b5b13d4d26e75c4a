use super::tracing_config::ProduceAttributes;
use super::{SpanRecorder, SpecBuilder};
use crate::error::Result;
use crate::pipeline::{Command, CommandOutput, Handler};
use futures::future::BoxFuture;
use opentelemetry::global::{self, BoxedTracer};
use opentelemetry::trace::{FutureExt, SpanKind, Status, TraceContextExt, Tracer};
use opentelemetry::{Context, KeyValue};
use std::sync::Arc;

const DEFAULT_TRACER_NAME: &str = "msgtrace-core";

/// Records producer calls as OpenTelemetry spans on the global tracer provider.
///
/// OpenTelemetry has no way to suppress spans opened further down the call,
/// so `opaque` only shows up as the `messaging.opaque` attribute here.
pub struct OtelRecorder {
    tracer: Arc<BoxedTracer>,
}

impl OtelRecorder {
    pub fn new() -> Self {
        Self::with_tracer_name(DEFAULT_TRACER_NAME)
    }

    pub fn with_tracer_name(name: &'static str) -> Self {
        Self {
            tracer: Arc::new(global::tracer(name)),
        }
    }
}

impl Default for OtelRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl SpanRecorder for OtelRecorder {
    fn record_produce(&self, system: &str, next: Handler, spec: SpecBuilder) -> Handler {
        let system = system.to_string();
        let tracer = Arc::clone(&self.tracer);
        Arc::new(move |command: Command| -> BoxFuture<'static, Result<CommandOutput>> {
            let descriptor = spec(&command);
            let attributes = ProduceAttributes::new(&system, &descriptor);
            let mut kv_attributes: Vec<KeyValue> = attributes
                .key_values()
                .into_iter()
                .map(|(key, value)| KeyValue::new(key, value))
                .collect();
            kv_attributes.push(KeyValue::new("messaging.opaque", descriptor.opaque));

            let span = tracer
                .span_builder(attributes.span_name())
                .with_kind(SpanKind::Producer)
                .with_attributes(kv_attributes)
                .start(tracer.as_ref());
            let cx = Context::current_with_span(span);

            let next = Arc::clone(&next);
            Box::pin(async move {
                let result = next(command).with_context(cx.clone()).await;

                let span = cx.span();
                match &result {
                    Ok(_) => span.set_status(Status::Ok),
                    Err(e) => {
                        span.record_error(e);
                        span.set_status(Status::error(e.to_string()));
                    }
                }
                span.end();
                result
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::sns_publish_spec;
    use crate::error::{MsgTraceError, TransportError};
    use serde_json::json;

    #[tokio::test]
    async fn test_passes_results_and_errors_through() {
        let ok: Handler = Arc::new(|_command: Command| -> BoxFuture<'static, Result<CommandOutput>> {
            Box::pin(async { Ok(json!({"MessageId": "m-1"})) })
        });
        let failing: Handler = Arc::new(|command: Command| -> BoxFuture<'static, Result<CommandOutput>> {
            Box::pin(async move { Err(TransportError::UnsupportedCommand { command: command.name }.into()) })
        });
        let spec: SpecBuilder = Arc::new(sns_publish_spec);
        let recorder = OtelRecorder::new();

        let output = recorder.record_produce("SNS", ok, spec.clone())(Command::new(
            "PublishCommand",
            json!({"TopicArn": "arn:1"}),
        ))
        .await
        .unwrap();
        assert_eq!(output["MessageId"], "m-1");

        let err = recorder.record_produce("SNS", failing, spec)(Command::new("PublishCommand", json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, MsgTraceError::Transport(_)));
    }
}
