//! Client middleware pipeline.
//!
//! A [`MessagingClient`] owns a [`MiddlewareStack`]: an ordered set of named
//! steps, each able to wrap the continuation that represents "the rest of the
//! pipeline". Resolving the stack over a [`Transport`] yields a single
//! [`Handler`] per call.
//!
//! ```text
//! client.send(command)
//!     → stack.resolve(terminal, &context)
//!         initialize/high → initialize/normal → serialize → ... → transport
//! ```

pub mod client;
pub mod command;
pub mod stack;
pub mod step;
pub mod transport;

use crate::error::Result;
use futures::future::BoxFuture;
use std::sync::Arc;

pub use client::{ClientBuilder, ConstructionHook, MessagingClient};
pub use command::{Command, CommandOutput, HandlerContext, PublishInput};
pub use stack::MiddlewareStack;
pub use step::{Priority, Step, StepOptions};
#[cfg(feature = "runtime")]
pub use transport::InMemoryTransport;
pub use transport::Transport;

/// Continuation executing a command through the remainder of a pipeline
pub type Handler = Arc<dyn Fn(Command) -> BoxFuture<'static, Result<CommandOutput>> + Send + Sync>;

/// A pipeline step.
///
/// `wrap` is called once per call while the stack is resolved. Returning
/// `next` unchanged makes the step a pure pass-through for that call.
pub trait Middleware: Send + Sync {
    fn wrap(&self, next: Handler, context: &HandlerContext) -> Handler;
}

impl<F> Middleware for F
where
    F: Fn(Handler, &HandlerContext) -> Handler + Send + Sync,
{
    fn wrap(&self, next: Handler, context: &HandlerContext) -> Handler {
        self(next, context)
    }
}

/// A bundle of middleware registered in one go, see [`MiddlewareStack::use_plugin`].
pub trait Plugin: Send + Sync {
    fn apply_to_stack(&self, stack: &mut MiddlewareStack) -> Result<()>;
}
