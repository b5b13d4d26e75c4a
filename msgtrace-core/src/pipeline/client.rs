use super::{Command, CommandOutput, Handler, HandlerContext, MiddlewareStack, Transport};
use crate::error::Result;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// Extension point invoked by [`ClientBuilder::build`] right after a client
/// is constructed, before it is handed to the caller.
///
/// This is where instrumentation attaches its middleware: the host opts in
/// by passing a hook to the builder rather than having anything reach into
/// the client from outside.
pub trait ConstructionHook: Send + Sync {
    fn on_client_constructed(&self, client: &mut MessagingClient);
}

/// A client whose calls flow through a middleware pipeline.
///
/// The stack is only reachable mutably through `&mut self`, i.e. while the
/// client is being set up. Once shared, calls take `&self` and may run
/// concurrently without any locking.
pub struct MessagingClient {
    name: String,
    stack: Option<MiddlewareStack>,
    transport: Arc<dyn Transport>,
}

impl MessagingClient {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The client's middleware stack, if this client shape exposes one
    pub fn middleware_stack(&self) -> Option<&MiddlewareStack> {
        self.stack.as_ref()
    }

    pub fn middleware_stack_mut(&mut self) -> Option<&mut MiddlewareStack> {
        self.stack.as_mut()
    }

    /// Run `command` through the pipeline and the transport
    pub async fn send(&self, command: Command) -> Result<CommandOutput> {
        let context = HandlerContext::new(&self.name, &command);
        let terminal = self.terminal_handler();
        let handler = match &self.stack {
            Some(stack) => stack.resolve(terminal, &context),
            None => terminal,
        };
        handler(command).await
    }

    fn terminal_handler(&self) -> Handler {
        let transport = Arc::clone(&self.transport);
        Arc::new(move |command: Command| -> BoxFuture<'static, Result<CommandOutput>> {
            let transport = Arc::clone(&transport);
            Box::pin(async move { transport.send(&command).await })
        })
    }
}

impl fmt::Debug for MessagingClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessagingClient")
            .field("name", &self.name)
            .field("stack", &self.stack)
            .finish()
    }
}

/// Builder for [`MessagingClient`]
pub struct ClientBuilder {
    name: String,
    transport: Arc<dyn Transport>,
    expose_pipeline: bool,
    hooks: Vec<Arc<dyn ConstructionHook>>,
}

impl ClientBuilder {
    pub fn new<N: Into<String>>(name: N, transport: Arc<dyn Transport>) -> Self {
        Self {
            name: name.into(),
            transport,
            expose_pipeline: true,
            hooks: Vec::new(),
        }
    }

    /// Build a client that exposes no middleware stack
    pub fn without_pipeline(mut self) -> Self {
        self.expose_pipeline = false;
        self
    }

    /// Add a post-construction hook; hooks run in the order they were added
    pub fn instrumentation(mut self, hook: Arc<dyn ConstructionHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn build(self) -> MessagingClient {
        let mut client = MessagingClient {
            name: self.name,
            stack: self.expose_pipeline.then(MiddlewareStack::new),
            transport: self.transport,
        };
        for hook in &self.hooks {
            hook.on_client_constructed(&mut client);
        }
        client
    }
}
