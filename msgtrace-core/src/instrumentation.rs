//! Attaching tracing middleware to clients as they are constructed.
//!
//! An [`InstrumentationRegistry`] is a [`ConstructionHook`]: hand it to
//! [`ClientBuilder::instrumentation`](crate::pipeline::ClientBuilder::instrumentation)
//! and every client it builds is offered to the instrumentations registered
//! for that client's name.
//!
//! Instrumentation never gets in the way of the host: clients that cannot be
//! instrumented are logged at debug level and returned as they are.

use crate::config::InstrumentationConfig;
use crate::constants::{EVENT_LOGGER_NAME, SNS_CLIENT_NAME, SNS_LIBRARY};
use crate::error::{PipelineError, Result};
use crate::interception::{OperationClassifier, SnsClassifier, TracingMiddleware};
use crate::logging::{InstrumentationSkippedEvent, MiddlewareRegisteredEvent, SkipReason};
use crate::pipeline::{ConstructionHook, MessagingClient, MiddlewareStack, Plugin, StepOptions};
use crate::telemetry::SpanRecorder;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Instrumentation for one kind of client
pub trait Instrumentation: Send + Sync {
    /// Name of the client this instrumentation applies to
    fn target(&self) -> &str;

    fn instrument(&self, client: &mut MessagingClient) -> Result<()>;
}

/// Plugin registering a [`TracingMiddleware`] under fixed step options
pub struct TracingPlugin<C: OperationClassifier + Clone> {
    options: StepOptions,
    classifier: C,
    recorder: Arc<dyn SpanRecorder>,
}

impl<C: OperationClassifier + Clone> TracingPlugin<C> {
    pub fn new(options: StepOptions, classifier: C, recorder: Arc<dyn SpanRecorder>) -> Self {
        Self {
            options,
            classifier,
            recorder,
        }
    }

    pub fn options(&self) -> &StepOptions {
        &self.options
    }
}

impl<C: OperationClassifier + Clone> Plugin for TracingPlugin<C> {
    fn apply_to_stack(&self, stack: &mut MiddlewareStack) -> Result<()> {
        let middleware = TracingMiddleware::new(self.classifier.clone(), Arc::clone(&self.recorder));
        stack.add(middleware, self.options.clone())
    }
}

/// Records `PublishCommand` calls of `SNSClient` instances as producer spans
pub struct SnsInstrumentation {
    recorder: Arc<dyn SpanRecorder>,
    config: InstrumentationConfig,
}

impl SnsInstrumentation {
    pub fn new(recorder: Arc<dyn SpanRecorder>) -> Self {
        Self::from_config(recorder, InstrumentationConfig::default())
    }

    pub fn from_config(recorder: Arc<dyn SpanRecorder>, config: InstrumentationConfig) -> Self {
        Self { recorder, config }
    }

    pub fn config(&self) -> &InstrumentationConfig {
        &self.config
    }

    fn plugin(&self) -> Result<TracingPlugin<SnsClassifier>> {
        Ok(TracingPlugin::new(
            self.config.step_options()?,
            SnsClassifier::new().with_opaque(self.config.opaque),
            Arc::clone(&self.recorder),
        ))
    }
}

impl Instrumentation for SnsInstrumentation {
    fn target(&self) -> &str {
        SNS_CLIENT_NAME
    }

    fn instrument(&self, client: &mut MessagingClient) -> Result<()> {
        let client_name = client.name().to_string();
        if !self.config.enabled {
            log_skipped(&client_name, SkipReason::Disabled);
            return Ok(());
        }

        let plugin = self.plugin()?;
        let stack = client
            .middleware_stack_mut()
            .ok_or_else(|| PipelineError::StackUnavailable {
                client: client_name.clone(),
            })?;
        if stack.contains(&plugin.options().name) {
            log_skipped(&client_name, SkipReason::AlreadyRegistered);
            return Ok(());
        }

        stack.use_plugin(&plugin)?;
        let event = MiddlewareRegisteredEvent::new(&client_name, plugin.options())
            .with_extra("library".to_string(), Value::from(SNS_LIBRARY));
        tracing::debug!(target: EVENT_LOGGER_NAME, "{}", event);
        Ok(())
    }
}

fn log_skipped(client: &str, reason: SkipReason) {
    let event = InstrumentationSkippedEvent::new(client, reason);
    tracing::debug!(target: EVENT_LOGGER_NAME, "{}", event);
}

/// Instrumentations keyed by the client name they target
#[derive(Default)]
pub struct InstrumentationRegistry {
    instrumentations: HashMap<String, Vec<Arc<dyn Instrumentation>>>,
}

impl InstrumentationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, instrumentation: Arc<dyn Instrumentation>) {
        self.instrumentations
            .entry(instrumentation.target().to_string())
            .or_default()
            .push(instrumentation);
    }

    pub fn with(mut self, instrumentation: Arc<dyn Instrumentation>) -> Self {
        self.register(instrumentation);
        self
    }

    pub fn is_registered(&self, client_name: &str) -> bool {
        self.instrumentations.contains_key(client_name)
    }

    /// Offer a freshly built client to every instrumentation targeting it.
    ///
    /// Never fails: clients without a middleware stack or without a matching
    /// instrumentation are left untouched, and instrumentation errors are
    /// logged and dropped.
    pub fn on_client_constructed(&self, client: &mut MessagingClient) {
        let Some(instrumentations) = self.instrumentations.get(client.name()) else {
            log_skipped(client.name(), SkipReason::NotTargeted);
            return;
        };
        if client.middleware_stack().is_none() {
            tracing::debug!(
                "Could not find middleware stack on {}, not instrumenting.",
                client.name()
            );
            log_skipped(client.name(), SkipReason::NoStack);
            return;
        }

        for instrumentation in instrumentations {
            if let Err(e) = instrumentation.instrument(client) {
                tracing::warn!("Failed to instrument {}: {}", client.name(), e);
            }
        }
    }
}

impl ConstructionHook for InstrumentationRegistry {
    fn on_client_constructed(&self, client: &mut MessagingClient) {
        InstrumentationRegistry::on_client_constructed(self, client)
    }
}
