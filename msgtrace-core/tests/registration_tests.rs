//! Integration tests for construction-time registration
//!
//! These tests cover how instrumentation attaches to client pipelines and
//! where the tracing step lands relative to the host's own middleware.

mod test_utils;

use async_trait::async_trait;
use mockall::mock;
use msgtrace_core::*;
use serde_json::json;
use std::sync::{Arc, Mutex};
use test_utils::*;

mock! {
    pub SnsTransport {}

    #[async_trait]
    impl Transport for SnsTransport {
        async fn send(&self, command: &Command) -> Result<CommandOutput>;
    }
}

fn sns_options(name: &str, step: Step, priority: Priority) -> StepOptions {
    StepOptions::new(name, step).unwrap().with_priority(priority)
}

/// The tracing step wraps host middleware of every later phase and priority
#[tokio::test]
async fn test_tracing_step_resolves_outermost() {
    let log: ExecutionLog = Arc::new(Mutex::new(Vec::new()));
    let recorder = RecordingRecorder::new();

    let mut transport = MockSnsTransport::new();
    transport
        .expect_send()
        .withf(|command: &Command| command.name == "PublishCommand")
        .times(1)
        .returning(|_| Ok(json!({ "MessageId": "m-1" })));

    let mut client = ClientBuilder::new("SNSClient", Arc::new(transport)).build();
    {
        let stack = client.middleware_stack_mut().unwrap();
        stack
            .add(
                recording_middleware("serialize", log.clone()),
                sns_options("serialize", Step::Serialize, Priority::High),
            )
            .unwrap();
        stack
            .add(
                recording_middleware("init-normal", log.clone()),
                sns_options("init-normal", Step::Initialize, Priority::Normal),
            )
            .unwrap();
    }
    // host middleware registered after construction still resolves inside
    sns_registry(&recorder).on_client_constructed(&mut client);
    client
        .middleware_stack_mut()
        .unwrap()
        .add(
            recording_middleware("init-high-late", log.clone()),
            sns_options("init-high-late", Step::Initialize, Priority::High),
        )
        .unwrap();

    assert_eq!(
        client.middleware_stack().unwrap().names(),
        vec!["TracingSnsMiddleware", "init-high-late", "init-normal", "serialize"]
    );

    client
        .send(Command::publish(PublishInput::to_target("arn:endpoint/1", "hi")))
        .await
        .unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["init-high-late", "init-normal", "serialize"]);
    assert_eq!(recorder.call_count(), 1);
}

/// Running the construction hook twice leaves a single tracing step
#[tokio::test]
async fn test_registering_twice_keeps_one_step() {
    let recorder = RecordingRecorder::new();
    let registry = sns_registry(&recorder);

    let mut transport = MockSnsTransport::new();
    transport
        .expect_send()
        .times(1)
        .returning(|_| Ok(json!({ "MessageId": "m-1" })));

    let mut client = ClientBuilder::new("SNSClient", Arc::new(transport))
        .instrumentation(registry.clone())
        .instrumentation(registry.clone())
        .build();
    registry.on_client_constructed(&mut client);

    assert_eq!(client.middleware_stack().unwrap().names(), vec!["TracingSnsMiddleware"]);

    client
        .send(Command::publish(PublishInput::to_phone_number("+15551234567", "x")))
        .await
        .unwrap();
    assert_eq!(recorder.call_count(), 1);
}

/// Clients without a stack are returned untouched and still work
#[tokio::test]
async fn test_client_without_pipeline_is_left_alone() {
    let recorder = RecordingRecorder::new();

    let mut transport = MockSnsTransport::new();
    transport
        .expect_send()
        .times(1)
        .returning(|_| Ok(json!({ "MessageId": "m-1" })));

    let client = ClientBuilder::new("SNSClient", Arc::new(transport))
        .without_pipeline()
        .instrumentation(sns_registry(&recorder))
        .build();

    assert!(client.middleware_stack().is_none());
    client
        .send(Command::publish(PublishInput::to_target("arn:endpoint/1", "hi")))
        .await
        .unwrap();
    assert_eq!(recorder.call_count(), 0);
}

#[tokio::test]
async fn test_untargeted_client_is_left_alone() {
    let recorder = RecordingRecorder::new();
    let registry = sns_registry(&recorder);

    let mut transport = MockSnsTransport::new();
    transport
        .expect_send()
        .times(1)
        .returning(|_| Ok(json!({ "MessageId": "m-1" })));

    let client = ClientBuilder::new("SQSClient", Arc::new(transport))
        .instrumentation(registry.clone())
        .build();

    assert!(!registry.is_registered("SQSClient"));
    assert!(client.middleware_stack().unwrap().is_empty());
    client
        .send(Command::new("PublishCommand", json!({ "TopicArn": "arn:1" })))
        .await
        .unwrap();
    assert_eq!(recorder.call_count(), 0);
}

/// Transport failures reach the caller unchanged
#[tokio::test]
async fn test_mock_transport_error_propagates() {
    let recorder = RecordingRecorder::new();

    let mut transport = MockSnsTransport::new();
    transport.expect_send().times(1).returning(|command| {
        Err(error::TransportError::Unreachable {
            endpoint: format!("sns for {}", command.name),
        }
        .into())
    });

    let client = ClientBuilder::new("SNSClient", Arc::new(transport))
        .instrumentation(sns_registry(&recorder))
        .build();

    let err = client
        .send(Command::publish(PublishInput::to_topic("arn:1", "x")))
        .await
        .unwrap_err();

    assert!(err.is_recoverable());
    assert_eq!(err.to_string(), "Transport error: Service unreachable: sns for PublishCommand");
    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].succeeded);
}

#[cfg(feature = "config-support")]
#[tokio::test]
async fn test_disabled_config_document_registers_nothing() {
    let recorder = RecordingRecorder::new();
    let config = InstrumentationConfig::from_toml_str("enabled = false").unwrap();
    assert_eq!(config.middleware_name, "TracingSnsMiddleware");
    assert_eq!(config.priority, Priority::High);

    let registry = InstrumentationRegistry::new().with(Arc::new(SnsInstrumentation::from_config(
        Arc::new(recorder.clone()),
        config,
    )));
    let client = ClientBuilder::new("SNSClient", Arc::new(InMemoryTransport::new()))
        .instrumentation(Arc::new(registry))
        .build();

    assert!(client.middleware_stack().unwrap().is_empty());
}

/// An invalid configured name is logged and leaves the client usable
#[tokio::test]
async fn test_invalid_config_is_swallowed_by_registry() {
    let recorder = RecordingRecorder::new();
    let config = InstrumentationConfig::new().with_middleware_name("has spaces");
    let registry = InstrumentationRegistry::new().with(Arc::new(SnsInstrumentation::from_config(
        Arc::new(recorder.clone()),
        config,
    )));

    let transport = Arc::new(InMemoryTransport::new());
    let client = ClientBuilder::new("SNSClient", transport.clone())
        .instrumentation(Arc::new(registry))
        .build();

    assert!(client.middleware_stack().unwrap().is_empty());
    client
        .send(Command::publish(PublishInput::to_target("arn:endpoint/1", "hi")))
        .await
        .unwrap();
    assert_eq!(transport.call_count().await, 1);
}

/// Host middleware added through a plugin sits next to the tracing step
#[test]
fn test_host_plugin_and_tracing_plugin_coexist() {
    let recorder = RecordingRecorder::new();
    let mut stack = MiddlewareStack::new();

    let tracing_plugin = TracingPlugin::new(
        sns_options("TracingSnsMiddleware", Step::Initialize, Priority::High),
        SnsClassifier::new(),
        Arc::new(recorder.clone()),
    );
    stack.use_plugin(&tracing_plugin).unwrap();
    stack
        .add(
            recording_middleware("retry", Arc::new(Mutex::new(Vec::new()))),
            sns_options("retry", Step::FinalizeRequest, Priority::Normal),
        )
        .unwrap();

    let err = stack.use_plugin(&tracing_plugin).unwrap_err();
    assert!(matches!(err, MsgTraceError::Pipeline(error::PipelineError::DuplicateName { .. })));
    assert_eq!(stack.names(), vec!["TracingSnsMiddleware", "retry"]);
}
