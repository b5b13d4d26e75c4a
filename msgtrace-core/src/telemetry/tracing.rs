use super::tracing_config::ProduceAttributes;
use super::{SpanRecorder, SpecBuilder};
use crate::constants::EVENT_LOGGER_NAME;
use crate::error::Result;
use crate::logging::ProduceRecordedEvent;
use crate::pipeline::{Command, CommandOutput, Handler};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Instant;
use tracing::field::{self, Empty};
use tracing::instrument::WithSubscriber;
use tracing::level_filters::LevelFilter;
use tracing::span::{Attributes, Id, Record};
use tracing::subscriber::Interest;
use tracing::{Dispatch, Event, Instrument, Metadata, Subscriber};

/// Records producer calls as `tracing` spans.
///
/// Each call gets a `produce` span carrying `otel.name`, `otel.kind =
/// "PRODUCER"` and the messaging attributes, so a `tracing-opentelemetry`
/// layer exports it as a regular producer span. Duration and outcome are
/// recorded on the span once the call completes.
///
/// For opaque descriptors the call runs with span creation disabled, so the
/// producer span has no children. Events logged during the call still reach
/// the host's subscriber, parented to the producer span.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRecorder;

impl TracingRecorder {
    pub fn new() -> Self {
        Self
    }
}

impl SpanRecorder for TracingRecorder {
    fn record_produce(&self, system: &str, next: Handler, spec: SpecBuilder) -> Handler {
        let system = system.to_string();
        Arc::new(move |command: Command| -> BoxFuture<'static, Result<CommandOutput>> {
            let descriptor = spec(&command);
            let attributes = ProduceAttributes::new(&system, &descriptor);
            let span = tracing::info_span!(
                "produce",
                otel.name = %attributes.span_name(),
                otel.kind = attributes.operation.span_kind(),
                otel.status_code = Empty,
                messaging.system = %attributes.system,
                messaging.operation = attributes.operation.as_str(),
                messaging.destination.name = %attributes.destination_name,
                messaging.destination.kind = attributes.destination_kind,
                duration_ms = Empty,
                error.message = Empty,
            );

            let next = Arc::clone(&next);
            let system = system.clone();
            Box::pin(async move {
                let start = Instant::now();
                let result = if descriptor.opaque {
                    let suppressor = SpanSuppressor::current();
                    span.in_scope(|| tracing::dispatcher::with_default(&suppressor, || next(command)))
                        .with_subscriber(suppressor)
                        .instrument(span.clone())
                        .await
                } else {
                    span.in_scope(|| next(command))
                        .instrument(span.clone())
                        .await
                };
                let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

                span.record("duration_ms", duration_ms);
                let error = match &result {
                    Ok(_) => {
                        span.record("otel.status_code", "OK");
                        None
                    }
                    Err(e) => {
                        span.record("otel.status_code", "ERROR");
                        span.record("error.message", field::display(e));
                        Some(e.to_string())
                    }
                };

                let event = ProduceRecordedEvent::new(&system, descriptor, duration_ms, error);
                tracing::debug!(target: EVENT_LOGGER_NAME, parent: &span, "{}", event);
                result
            })
        })
    }
}

/// Subscriber wrapping the current dispatcher that refuses new spans and
/// forwards everything else.
struct SpanSuppressor {
    inner: Dispatch,
    max_level: LevelFilter,
}

impl SpanSuppressor {
    fn current() -> Dispatch {
        let inner = tracing::dispatcher::get_default(Dispatch::clone);
        Dispatch::new(Self {
            inner,
            max_level: LevelFilter::current(),
        })
    }
}

impl Subscriber for SpanSuppressor {
    fn register_callsite(&self, metadata: &'static Metadata<'static>) -> Interest {
        if metadata.is_span() {
            // other dispatchers may still want this callsite
            Interest::sometimes()
        } else {
            self.inner.register_callsite(metadata)
        }
    }

    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        !metadata.is_span() && self.inner.enabled(metadata)
    }

    fn max_level_hint(&self) -> Option<LevelFilter> {
        Some(self.max_level)
    }

    fn new_span(&self, span: &Attributes<'_>) -> Id {
        self.inner.new_span(span)
    }

    fn record(&self, span: &Id, values: &Record<'_>) {
        self.inner.record(span, values)
    }

    fn record_follows_from(&self, span: &Id, follows: &Id) {
        self.inner.record_follows_from(span, follows)
    }

    fn event(&self, event: &Event<'_>) {
        self.inner.event(event)
    }

    fn enter(&self, span: &Id) {
        self.inner.enter(span)
    }

    fn exit(&self, span: &Id) {
        self.inner.exit(span)
    }

    fn clone_span(&self, id: &Id) -> Id {
        self.inner.clone_span(id)
    }

    fn try_close(&self, id: Id) -> bool {
        self.inner.try_close(id)
    }
}
