use super::{Handler, HandlerContext, Middleware, Plugin, StepOptions};
use crate::error::{PipelineError, Result};
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
struct MiddlewareEntry {
    options: StepOptions,
    middleware: Arc<dyn Middleware>,
}

/// Ordered, named set of middleware steps owned by a client.
///
/// Step names are unique within a stack: adding a name twice fails with
/// [`PipelineError::DuplicateName`] instead of silently stacking a second copy.
#[derive(Clone, Default)]
pub struct MiddlewareStack {
    entries: Vec<MiddlewareEntry>,
}

impl MiddlewareStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a middleware under `options`.
    ///
    /// # Examples
    /// ```
    /// use msgtrace_core::pipeline::{Handler, HandlerContext, MiddlewareStack, Step, StepOptions};
    ///
    /// let mut stack = MiddlewareStack::new();
    /// let passthrough = |next: Handler, _ctx: &HandlerContext| next;
    /// stack.add(passthrough, StepOptions::new("passthrough", Step::Build).unwrap()).unwrap();
    ///
    /// assert!(stack.contains("passthrough"));
    /// assert!(stack.add(passthrough, StepOptions::new("passthrough", Step::Build).unwrap()).is_err());
    /// ```
    pub fn add<M>(&mut self, middleware: M, options: StepOptions) -> Result<()>
    where
        M: Middleware + 'static,
    {
        self.add_arc(Arc::new(middleware), options)
    }

    pub fn add_arc(&mut self, middleware: Arc<dyn Middleware>, options: StepOptions) -> Result<()> {
        if self.contains(&options.name) {
            return Err(PipelineError::DuplicateName { name: options.name }.into());
        }

        tracing::trace!(
            target: crate::constants::TRACE_LOGGER_NAME,
            name = %options.name,
            step = %options.step,
            priority = %options.priority,
            "middleware added to stack"
        );
        self.entries.push(MiddlewareEntry { options, middleware });
        Ok(())
    }

    /// Let a plugin register its middleware on this stack
    pub fn use_plugin(&mut self, plugin: &dyn Plugin) -> Result<()> {
        plugin.apply_to_stack(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.options.name == name)
    }

    /// Remove the step named `name`, returning whether it was present
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.options.name != name);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Step names in execution order, outermost first
    pub fn names(&self) -> Vec<String> {
        self.ordered()
            .into_iter()
            .map(|entry| entry.options.name.clone())
            .collect()
    }

    /// Compose every step around `terminal`.
    ///
    /// Steps are ordered by phase, then priority, then insertion order; the
    /// first step in that order becomes the outermost wrapper.
    pub fn resolve(&self, terminal: Handler, context: &HandlerContext) -> Handler {
        self.ordered()
            .into_iter()
            .rev()
            .fold(terminal, |next, entry| entry.middleware.wrap(next, context))
    }

    fn ordered(&self) -> Vec<&MiddlewareEntry> {
        let mut ordered: Vec<&MiddlewareEntry> = self.entries.iter().collect();
        // stable: ties keep insertion order
        ordered.sort_by_key(|entry| (entry.options.step, entry.options.priority));
        ordered
    }
}

impl fmt::Debug for MiddlewareStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.ordered().into_iter().map(|entry| &entry.options))
            .finish()
    }
}
