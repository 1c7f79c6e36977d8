//! Message routing
//!
//! For each incoming message the router:
//!
//! 1. applies the prefix check (no match: the message is ignored)
//! 2. reads the command name and resolves it in the registry
//! 3. runs the command's permission validators
//! 4. tokenizes the rest of the text and transforms the arguments
//! 5. runs router-level then command-level middleware
//! 6. invokes the handler
//!
//! Any failure along the way is offered to the error handler chain together
//! with the context built so far. Setup (`register`, `add_*`) takes `&mut self`
//! and processing takes `&self`, so a fully configured router can be shared
//! across threads.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::RouterSettings;
use crate::context::Context;
use crate::error::{BoxError, Result, RouterError};
use crate::error_handler::ErrorHandlerChain;
use crate::pipeline::transform_args;
use crate::prefix::PrefixCheck;
use crate::registry::CommandRegistry;
use crate::tokenizer::{split_command, tokenize};
use crate::types::{Command, IncomingMessage, MiddlewareFn, Replier};

/// What happened to a processed message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The message was not a command invocation
    Ignored,

    /// The command handler ran to completion
    Executed { command: String },

    /// Processing failed and an error handler consumed the error
    Recovered { command: Option<String> },
}

/// Routes prefixed chat messages to registered commands
pub struct CommandRouter {
    prefix_check: Box<dyn PrefixCheck>,
    registry: CommandRegistry,
    error_handlers: ErrorHandlerChain,
    middleware: Vec<MiddlewareFn>,
    dispatch_unknown_commands: bool,
}

impl CommandRouter {
    /// Create a router with a case-sensitive registry
    pub fn new<P>(prefix_check: P) -> Self
    where
        P: PrefixCheck + 'static,
    {
        Self {
            prefix_check: Box::new(prefix_check),
            registry: CommandRegistry::new(),
            error_handlers: ErrorHandlerChain::new(),
            middleware: Vec::new(),
            dispatch_unknown_commands: true,
        }
    }

    /// Create a router from settings
    pub fn from_settings(settings: &RouterSettings) -> Result<Self> {
        let registry = if settings.case_insensitive {
            CommandRegistry::case_insensitive()
        } else {
            CommandRegistry::new()
        };

        Ok(Self {
            prefix_check: settings.prefix_check()?,
            registry,
            error_handlers: ErrorHandlerChain::new(),
            middleware: Vec::new(),
            dispatch_unknown_commands: settings.dispatch_unknown_commands,
        })
    }

    /// Replace the registry, e.g. with a case-insensitive one
    pub fn with_registry(mut self, registry: CommandRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set whether unknown and blank commands reach the error handlers
    pub fn set_dispatch_unknown_commands(&mut self, dispatch: bool) {
        self.dispatch_unknown_commands = dispatch;
    }

    /// Register a command
    pub fn register(&mut self, command: Command) -> Result<()> {
        self.registry.register(command)
    }

    /// Unregister a command by name or alias
    pub fn unregister(&mut self, name: &str) -> Result<()> {
        self.registry.unregister(name)
    }

    /// Append an error handler to the chain
    pub fn add_error_handler<F>(&mut self, handler: F)
    where
        F: Fn(&Context<'_>, &RouterError) -> bool + Send + Sync + 'static,
    {
        self.error_handlers.push(handler);
    }

    /// Add middleware run before every command handler
    pub fn add_middleware<F>(&mut self, middleware: F)
    where
        F: Fn(&mut Context<'_>) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        self.middleware.push(Arc::new(middleware));
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Process one incoming message
    ///
    /// Returns the unrecovered error when processing failed and no error
    /// handler consumed it.
    pub fn process(&self, message: &dyn IncomingMessage, replier: &dyn Replier) -> Result<Dispatch> {
        let Some(stripped) = self.prefix_check.strip(message.content()) else {
            return Ok(Dispatch::Ignored);
        };

        debug!(
            author = %message.author_id(),
            channel = %message.channel_id(),
            "Prefix matched"
        );

        let mut ctx = Context::new(message, replier);
        match self.run(stripped, &mut ctx) {
            Ok(()) => Ok(Dispatch::Executed {
                command: ctx.command_name().unwrap_or_default().to_string(),
            }),
            Err(RouterError::UnknownCommand { .. } | RouterError::BlankCommand)
                if !self.dispatch_unknown_commands =>
            {
                debug!("Ignoring unknown command");
                Ok(Dispatch::Ignored)
            }
            Err(err) => self.dispatch_error(&ctx, err),
        }
    }

    fn run<'a>(&'a self, text: &'a str, ctx: &mut Context<'a>) -> Result<()> {
        let (name, rest) = split_command(text);
        if name.is_empty() {
            return Err(RouterError::BlankCommand);
        }

        let command = self.registry.get(name)?;
        ctx.command = Some(command);
        ctx.invoked_as = name;
        debug!(command = %command.name, invoked_as = %name, "Command resolved");

        for validator in &command.permission_validators {
            validator(&*ctx).map_err(|reason| RouterError::PermissionDenied {
                command: command.name.clone(),
                reason,
            })?;
        }

        let tokens = tokenize(rest);
        transform_args(command, &tokens, ctx)?;
        debug!(command = %command.name, args = ctx.args.len(), "Arguments transformed");

        for middleware in self.middleware.iter().chain(&command.middleware) {
            middleware(&mut *ctx).map_err(|cause| RouterError::MiddlewareRejected {
                command: command.name.clone(),
                cause,
            })?;
        }

        command.invoke(ctx).map_err(|cause| RouterError::HandlerError {
            command: command.name.clone(),
            cause,
        })?;
        debug!(command = %command.name, "Handler finished");
        Ok(())
    }

    fn dispatch_error(&self, ctx: &Context<'_>, err: RouterError) -> Result<Dispatch> {
        debug!(error = %err, "Dispatching error to handlers");

        if self.error_handlers.dispatch(ctx, &err) {
            return Ok(Dispatch::Recovered {
                command: ctx.command_name().map(str::to_string),
            });
        }

        warn!(
            command = ?ctx.command_name(),
            error = %err,
            "Unhandled command error"
        );
        Err(err)
    }
}

impl fmt::Debug for CommandRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRouter")
            .field("registry", &self.registry)
            .field("error_handlers", &self.error_handlers)
            .field("middleware", &self.middleware.len())
            .field("dispatch_unknown_commands", &self.dispatch_unknown_commands)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::prefix::StaticPrefix;
    use crate::transformers;
    use crate::types::{ArgTransformer, ArgValue};

    struct Msg(&'static str);

    impl IncomingMessage for Msg {
        fn content(&self) -> &str {
            self.0
        }

        fn author_id(&self) -> &str {
            "alice"
        }

        fn channel_id(&self) -> &str {
            "general"
        }
    }

    #[derive(Default)]
    struct Outbox {
        sent: Mutex<Vec<String>>,
    }

    impl Replier for Outbox {
        fn send(&self, _channel_id: &str, content: &str) -> std::result::Result<(), BoxError> {
            self.sent.lock().unwrap().push(content.to_string());
            Ok(())
        }
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_router_is_shareable() {
        assert_send_sync::<CommandRouter>();
    }

    #[test]
    fn test_non_prefixed_message_ignored() {
        let router = CommandRouter::new(StaticPrefix::new("!"));
        let outbox = Outbox::default();
        assert_eq!(router.process(&Msg("hello"), &outbox).unwrap(), Dispatch::Ignored);
    }

    #[test]
    fn test_handler_replies() {
        let mut router = CommandRouter::new(StaticPrefix::new("!"));
        router
            .register(
                Command::new("echo", |ctx| {
                    let text = ctx.arg(0).and_then(ArgValue::as_str).unwrap_or_default().to_string();
                    ctx.reply(&text)
                })
                .with_arg(ArgTransformer::new(transformers::string).with_remainder(true)),
            )
            .unwrap();

        let outbox = Outbox::default();
        let outcome = router.process(&Msg("!echo  hi   there"), &outbox).unwrap();
        assert_eq!(
            outcome,
            Dispatch::Executed {
                command: "echo".to_string()
            }
        );
        assert_eq!(*outbox.sent.lock().unwrap(), vec!["hi there"]);
    }

    #[test]
    fn test_unknown_command_reaches_chain() {
        let router = CommandRouter::new(StaticPrefix::new("!"));
        let outbox = Outbox::default();
        let err = router.process(&Msg("!nope"), &outbox).unwrap_err();
        assert!(matches!(err, RouterError::UnknownCommand { name } if name == "nope"));
    }

    #[test]
    fn test_unknown_command_can_be_silenced() {
        let mut router = CommandRouter::new(StaticPrefix::new("!"));
        router.set_dispatch_unknown_commands(false);
        router.add_error_handler(|_ctx, _err| panic!("must not be called"));
        let outbox = Outbox::default();
        assert_eq!(router.process(&Msg("!nope"), &outbox).unwrap(), Dispatch::Ignored);
        assert_eq!(router.process(&Msg("!"), &outbox).unwrap(), Dispatch::Ignored);
    }

    #[test]
    fn test_blank_command() {
        let router = CommandRouter::new(StaticPrefix::new("!"));
        let outbox = Outbox::default();
        let err = router.process(&Msg("!   "), &outbox).unwrap_err();
        assert!(matches!(err, RouterError::BlankCommand));
    }

    #[test]
    fn test_permission_denied_skips_transform() {
        let transforms = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&transforms);

        let mut router = CommandRouter::new(StaticPrefix::new("!"));
        router
            .register(
                Command::new("ban", |_ctx| Ok(()))
                    .with_permission_validator(|ctx| {
                        if ctx.author_id() == "admin" {
                            Ok(())
                        } else {
                            Err("admins only".to_string())
                        }
                    })
                    .with_arg(ArgTransformer::new(move |_ctx, raw| {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Ok(raw.into())
                    })),
            )
            .unwrap();

        let outbox = Outbox::default();
        let err = router.process(&Msg("!ban bob"), &outbox).unwrap_err();
        match err {
            RouterError::PermissionDenied { command, reason } => {
                assert_eq!(command, "ban");
                assert_eq!(reason, "admins only");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(transforms.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_middleware_order_and_rejection() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let (o1, o2, o3) = (Arc::clone(&order), Arc::clone(&order), Arc::clone(&order));

        let mut router = CommandRouter::new(StaticPrefix::new("!"));
        router.add_middleware(move |_ctx| {
            o1.lock().unwrap().push("router");
            Ok(())
        });
        router
            .register(
                Command::new("go", move |_ctx| {
                    o3.lock().unwrap().push("handler");
                    Ok(())
                })
                .with_middleware(move |_ctx| {
                    o2.lock().unwrap().push("command");
                    Ok(())
                }),
            )
            .unwrap();
        router
            .register(Command::new("stop", |_ctx| Ok(())).with_middleware(|_ctx| Err("halt".into())))
            .unwrap();

        let outbox = Outbox::default();
        router.process(&Msg("!go"), &outbox).unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["router", "command", "handler"]);

        let err = router.process(&Msg("!stop"), &outbox).unwrap_err();
        assert!(matches!(err, RouterError::MiddlewareRejected { .. }));
    }

    #[test]
    fn test_recovered_reports_command() {
        let mut router = CommandRouter::new(StaticPrefix::new("!"));
        router
            .register(Command::new("fail", |_ctx| Err("boom".into())))
            .unwrap();
        router.add_error_handler(|_ctx, err| matches!(err, RouterError::HandlerError { .. }));

        let outbox = Outbox::default();
        assert_eq!(
            router.process(&Msg("!fail"), &outbox).unwrap(),
            Dispatch::Recovered {
                command: Some("fail".to_string())
            }
        );
    }

    #[test]
    fn test_from_settings_case_insensitive() {
        let settings = RouterSettings {
            prefixes: vec!["bot!".to_string()],
            case_insensitive: true,
            dispatch_unknown_commands: true,
        };
        let mut router = CommandRouter::from_settings(&settings).unwrap();
        router.register(Command::new("Ping", |ctx| ctx.reply("pong"))).unwrap();

        let outbox = Outbox::default();
        let outcome = router.process(&Msg("BOT!pInG"), &outbox).unwrap();
        assert_eq!(
            outcome,
            Dispatch::Executed {
                command: "Ping".to_string()
            }
        );
    }
}
