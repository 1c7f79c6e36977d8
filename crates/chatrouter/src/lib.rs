//! ChatRouter Command Routing
//!
//! This crate turns prefixed chat messages into typed command invocations.
//! A message such as `!ban bob "spamming links"` is matched against the
//! configured prefix, split into quote-aware tokens, run through the command's
//! argument transformers, and handed to the command handler. Failures at any
//! stage go to an ordered chain of error handlers.
//!
//! The platform client stays outside: the router only sees an
//! [`IncomingMessage`] and a [`Replier`].
//!
//! # Examples
//!
//! ```ignore
//! use chatrouter::{transformers, ArgTransformer, Command, CommandRouter, StaticPrefix};
//!
//! let mut router = CommandRouter::new(StaticPrefix::new("!"));
//!
//! router.register(
//!     Command::new("say", |ctx| {
//!         let text = ctx.arg(0).and_then(|v| v.as_str()).unwrap_or_default().to_string();
//!         ctx.reply(&text)
//!     })
//!     .with_alias("echo")
//!     .with_arg(ArgTransformer::new(transformers::string).with_remainder(true)),
//! )?;
//!
//! router.add_error_handler(|ctx, err| {
//!     let _ = ctx.reply(&err.to_string());
//!     true
//! });
//!
//! router.process(&message, &replier)?;
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod error_handler;
pub mod pipeline;
pub mod prefix;
pub mod registry;
pub mod router;
pub mod tokenizer;
pub mod transformers;
pub mod types;

pub use config::{ConfigManager, RouterSettings};
pub use context::Context;
pub use error::{BoxError, Result, RouterError, TransformError};
pub use error_handler::{ErrorHandlerChain, ErrorHandlerFn};
pub use prefix::{MultiplePrefix, PrefixCheck, RegexPrefix, StaticPrefix};
pub use registry::CommandRegistry;
pub use router::{CommandRouter, Dispatch};
pub use tokenizer::tokenize;
pub use types::{
    ArgTransformer, ArgValue, Command, HandlerFn, IncomingMessage, MiddlewareFn, PermissionFn,
    Replier, TransformFn,
};
