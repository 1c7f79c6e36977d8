//! Per-message dispatch state

use crate::error::BoxError;
use crate::types::{ArgValue, Command, IncomingMessage, Replier};

/// State for one in-flight message
///
/// Built by the router when a message matches the prefix and dropped once the
/// handler and any error handlers have run. Early failures leave `command`
/// unset and `args` partially filled.
pub struct Context<'a> {
    /// The resolved command, if resolution got that far
    pub command: Option<&'a Command>,

    /// The name or alias the command was invoked by
    pub invoked_as: &'a str,

    /// Transformed argument values, in spec order
    pub args: Vec<ArgValue>,

    /// The message being processed
    pub message: &'a dyn IncomingMessage,

    replier: &'a dyn Replier,
}

impl<'a> Context<'a> {
    /// Create a new context for a message
    pub fn new(message: &'a dyn IncomingMessage, replier: &'a dyn Replier) -> Self {
        Self {
            command: None,
            invoked_as: "",
            args: Vec::new(),
            message,
            replier,
        }
    }

    /// Send a reply to the channel the message came from
    pub fn reply(&self, content: &str) -> Result<(), BoxError> {
        self.replier.send(self.message.channel_id(), content)
    }

    /// Send a message to another channel
    pub fn send_to(&self, channel_id: &str, content: &str) -> Result<(), BoxError> {
        self.replier.send(channel_id, content)
    }

    /// Get a transformed argument by position
    pub fn arg(&self, index: usize) -> Option<&ArgValue> {
        self.args.get(index)
    }

    /// Name of the resolved command
    pub fn command_name(&self) -> Option<&str> {
        self.command.map(|cmd| cmd.name.as_str())
    }

    pub fn author_id(&self) -> &str {
        self.message.author_id()
    }

    pub fn channel_id(&self) -> &str {
        self.message.channel_id()
    }
}
