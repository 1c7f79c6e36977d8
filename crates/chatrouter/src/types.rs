use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::error::BoxError;

/// Transforms one raw token (or the joined remainder) into a typed value
pub type TransformFn = Arc<dyn Fn(&Context<'_>, &str) -> Result<ArgValue, BoxError> + Send + Sync>;

/// Command body, invoked once all arguments are transformed
pub type HandlerFn = Arc<dyn Fn(&mut Context<'_>) -> Result<(), BoxError> + Send + Sync>;

/// Runs between argument transformation and the handler
pub type MiddlewareFn = Arc<dyn Fn(&mut Context<'_>) -> Result<(), BoxError> + Send + Sync>;

/// Checks whether the author may run a command; `Err` carries the reason
pub type PermissionFn = Arc<dyn Fn(&Context<'_>) -> Result<(), String> + Send + Sync>;

/// A chat message as seen by the router
pub trait IncomingMessage {
    /// Text content of the message
    fn content(&self) -> &str;

    /// Identity of the message author
    fn author_id(&self) -> &str;

    /// Identity of the channel the message was posted in
    fn channel_id(&self) -> &str;
}

/// Capability to post a message back to the chat platform
pub trait Replier {
    /// Send `content` to the channel identified by `channel_id`
    fn send(&self, channel_id: &str, content: &str) -> Result<(), BoxError>;
}

/// A transformed argument value
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    String(String),
    Integer(i64),
    UInt(u64),
    Float(f64),
    Boolean(bool),
    Url(url::Url),
    /// Values collected by a greedy argument
    List(Vec<ArgValue>),
}

impl ArgValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_url(&self) -> Option<&url::Url> {
        match self {
            Self::Url(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ArgValue]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u64> for ArgValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// One argument slot of a command
#[derive(Clone)]
pub struct ArgTransformer {
    function: TransformFn,

    /// Consume every remaining token, joined with single spaces
    pub remainder: bool,

    /// May be omitted when input is exhausted
    pub optional: bool,

    /// Consume tokens while the transform keeps succeeding
    pub greedy: bool,
}

impl ArgTransformer {
    /// Create a new argument transformer
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(&Context<'_>, &str) -> Result<ArgValue, BoxError> + Send + Sync + 'static,
    {
        Self {
            function: Arc::new(function),
            remainder: false,
            optional: false,
            greedy: false,
        }
    }

    /// Set whether this argument takes the remainder of the input
    pub fn with_remainder(mut self, remainder: bool) -> Self {
        self.remainder = remainder;
        self
    }

    /// Set whether this argument is optional
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Set whether this argument is greedy
    pub fn with_greedy(mut self, greedy: bool) -> Self {
        self.greedy = greedy;
        self
    }

    /// Run the transform function on a raw string
    pub fn transform(&self, ctx: &Context<'_>, raw: &str) -> Result<ArgValue, BoxError> {
        (self.function)(ctx, raw)
    }
}

impl fmt::Debug for ArgTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgTransformer")
            .field("remainder", &self.remainder)
            .field("optional", &self.optional)
            .field("greedy", &self.greedy)
            .finish_non_exhaustive()
    }
}

/// A command definition
#[derive(Clone)]
pub struct Command {
    /// Name the command is invoked by
    pub name: String,

    /// Alternative names
    pub aliases: Vec<String>,

    /// Description of what the command does
    pub description: String,

    /// Usage hint, e.g. `<user> [reason...]`
    pub usage: String,

    /// Category for grouping in help output
    pub category: Option<String>,

    /// Argument slots, in order
    pub args: Vec<ArgTransformer>,

    pub(crate) handler: HandlerFn,
    pub(crate) permission_validators: Vec<PermissionFn>,
    pub(crate) middleware: Vec<MiddlewareFn>,
}

impl Command {
    /// Create a new command
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: String::new(),
            usage: String::new(),
            category: None,
            args: Vec::new(),
            handler: Arc::new(handler),
            permission_validators: Vec::new(),
            middleware: Vec::new(),
        }
    }

    /// Add an alias
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the usage hint
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Add an argument slot
    pub fn with_arg(mut self, arg: ArgTransformer) -> Self {
        self.args.push(arg);
        self
    }

    /// Add a permission validator, checked before arguments are transformed
    pub fn with_permission_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Context<'_>) -> Result<(), String> + Send + Sync + 'static,
    {
        self.permission_validators.push(Arc::new(validator));
        self
    }

    /// Add command-level middleware, run after router-level middleware
    pub fn with_middleware<F>(mut self, middleware: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// All names the command answers to, name first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    pub(crate) fn invoke(&self, ctx: &mut Context<'_>) -> Result<(), BoxError> {
        (self.handler)(ctx)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("category", &self.category)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder() {
        let cmd = Command::new("ban", |_ctx| Ok(()))
            .with_alias("b")
            .with_description("Ban a user")
            .with_usage("<user> [reason...]")
            .with_category("moderation")
            .with_arg(ArgTransformer::new(|_ctx, raw| Ok(raw.into())));

        assert_eq!(cmd.name, "ban");
        assert_eq!(cmd.names().collect::<Vec<_>>(), vec!["ban", "b"]);
        assert_eq!(cmd.description, "Ban a user");
        assert_eq!(cmd.category.as_deref(), Some("moderation"));
        assert_eq!(cmd.args.len(), 1);
    }

    #[test]
    fn test_arg_transformer_flags() {
        let arg = ArgTransformer::new(|_ctx, raw| Ok(raw.into()))
            .with_remainder(true)
            .with_optional(true);
        assert!(arg.remainder);
        assert!(arg.optional);
        assert!(!arg.greedy);
    }

    #[test]
    fn test_arg_value_accessors() {
        assert_eq!(ArgValue::from("x").as_str(), Some("x"));
        assert_eq!(ArgValue::from(-3i64).as_i64(), Some(-3));
        assert_eq!(ArgValue::from(3u64).as_u64(), Some(3));
        assert_eq!(ArgValue::from(true).as_bool(), Some(true));
        assert_eq!(ArgValue::Float(1.5).as_f64(), Some(1.5));
        assert!(ArgValue::from("x").as_i64().is_none());

        let list = ArgValue::List(vec![ArgValue::Integer(1), ArgValue::Integer(2)]);
        assert_eq!(list.as_list().map(|l| l.len()), Some(2));
    }
}
