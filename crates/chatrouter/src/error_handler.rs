//! Ordered chain of error handlers

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::context::Context;
use crate::error::RouterError;

/// Returns `true` when it has dealt with the error
pub type ErrorHandlerFn = Arc<dyn Fn(&Context<'_>, &RouterError) -> bool + Send + Sync>;

/// Error handlers, invoked in registration order until one returns `true`
#[derive(Clone, Default)]
pub struct ErrorHandlerChain {
    handlers: Vec<ErrorHandlerFn>,
}

impl ErrorHandlerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler to the end of the chain
    pub fn push<F>(&mut self, handler: F)
    where
        F: Fn(&Context<'_>, &RouterError) -> bool + Send + Sync + 'static,
    {
        self.handlers.push(Arc::new(handler));
    }

    /// Offer the error to each handler in turn
    ///
    /// Returns `true` as soon as one handler consumes the error; later handlers
    /// are not called. Returns `false` if no handler consumed it.
    pub fn dispatch(&self, ctx: &Context<'_>, err: &RouterError) -> bool {
        for (position, handler) in self.handlers.iter().enumerate() {
            if handler(ctx, err) {
                debug!(handler = position, error = %err, "Error handled");
                return true;
            }
        }
        false
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for ErrorHandlerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorHandlerChain")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
