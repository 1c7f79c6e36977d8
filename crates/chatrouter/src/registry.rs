use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::info;

use crate::error::{Result, RouterError};
use crate::types::Command;

/// Registry mapping command names and aliases to commands
///
/// Keys are normalized once at registration and again on lookup, so case
/// folding applies uniformly to both.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    entries: HashMap<String, Arc<Command>>,
    order: Vec<Arc<Command>>,
    case_insensitive: bool,
}

impl CommandRegistry {
    /// Create a new empty, case-sensitive registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that folds case on names and lookups
    pub fn case_insensitive() -> Self {
        Self {
            case_insensitive: true,
            ..Self::default()
        }
    }

    /// Whether lookups fold case
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    fn key(&self, name: &str) -> String {
        if self.case_insensitive {
            name.to_lowercase()
        } else {
            name.to_string()
        }
    }

    /// Register a command
    ///
    /// Fails without modifying the registry if the definition is malformed or
    /// if any of its names is already taken.
    pub fn register(&mut self, command: Command) -> Result<()> {
        validate_args(&command)?;

        let mut keys = HashSet::new();
        for name in command.names() {
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                return Err(RouterError::invalid_definition(format!(
                    "Command name '{}' must be non-empty and contain no whitespace",
                    name
                )));
            }

            let key = self.key(name);
            if self.entries.contains_key(&key) {
                return Err(RouterError::invalid_definition(format!(
                    "Command name already registered: {}",
                    name
                )));
            }
            if !keys.insert(key) {
                return Err(RouterError::invalid_definition(format!(
                    "Command '{}' lists the name '{}' twice",
                    command.name, name
                )));
            }
        }

        info!(
            command = %command.name,
            aliases = command.aliases.len(),
            args = command.args.len(),
            "Registered command"
        );

        let command = Arc::new(command);
        for key in keys {
            self.entries.insert(key, Arc::clone(&command));
        }
        self.order.push(command);
        Ok(())
    }

    /// Unregister a command by its name or any alias
    pub fn unregister(&mut self, name: &str) -> Result<()> {
        let command = self
            .entries
            .get(&self.key(name))
            .cloned()
            .ok_or_else(|| RouterError::UnknownCommand {
                name: name.to_string(),
            })?;

        self.entries.retain(|_, cmd| !Arc::ptr_eq(cmd, &command));
        self.order.retain(|cmd| !Arc::ptr_eq(cmd, &command));
        Ok(())
    }

    /// Resolve a name or alias to its command
    pub fn resolve(&self, name: &str) -> Option<&Command> {
        self.entries.get(&self.key(name)).map(Arc::as_ref)
    }

    /// Get a command by name or alias, failing with `UnknownCommand`
    pub fn get(&self, name: &str) -> Result<&Command> {
        self.resolve(name).ok_or_else(|| RouterError::UnknownCommand {
            name: name.to_string(),
        })
    }

    /// All commands, in registration order
    pub fn list_all(&self) -> Vec<&Command> {
        self.order.iter().map(Arc::as_ref).collect()
    }

    /// Commands in a category, in registration order
    pub fn list_by_category(&self, category: &str) -> Vec<&Command> {
        self.order
            .iter()
            .filter(|cmd| cmd.category.as_deref() == Some(category))
            .map(Arc::as_ref)
            .collect()
    }

    /// Check if a name or alias is registered
    pub fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(&self.key(name))
    }

    /// Get the number of registered commands (aliases not counted)
    pub fn count(&self) -> usize {
        self.order.len()
    }

    /// Clear all commands
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

fn validate_args(command: &Command) -> Result<()> {
    let last = command.args.len().saturating_sub(1);
    let mut remainders = 0;

    for (index, arg) in command.args.iter().enumerate() {
        if !arg.remainder {
            continue;
        }
        remainders += 1;
        if remainders > 1 {
            return Err(RouterError::invalid_definition(format!(
                "Command '{}' has more than one remainder argument",
                command.name
            )));
        }
        if index != last {
            return Err(RouterError::invalid_definition(format!(
                "Command '{}' has a remainder argument at position {} but it must be last",
                command.name, index
            )));
        }
        if arg.greedy {
            return Err(RouterError::invalid_definition(format!(
                "Command '{}' argument {} cannot be both remainder and greedy",
                command.name, index
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformers;
    use crate::types::ArgTransformer;

    fn cmd(name: &str) -> Command {
        Command::new(name, |_ctx| Ok(()))
    }

    fn string_arg() -> ArgTransformer {
        ArgTransformer::new(transformers::string)
    }

    #[test]
    fn test_register_and_resolve_alias() {
        let mut registry = CommandRegistry::new();
        registry.register(cmd("help").with_alias("h")).unwrap();
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.resolve("h").map(|c| c.name.as_str()), Some("help"));
        assert!(registry.resolve("HELP").is_none());
    }

    #[test]
    fn test_case_insensitive_registry() {
        let mut registry = CommandRegistry::case_insensitive();
        registry.register(cmd("Help")).unwrap();
        assert!(registry.exists("help"));
        assert!(registry.exists("HELP"));
        assert!(registry.register(cmd("hElP")).is_err());
    }

    #[test]
    fn test_alias_collision_rejected() {
        let mut registry = CommandRegistry::new();
        registry.register(cmd("help").with_alias("h")).unwrap();
        let err = registry.register(cmd("history").with_alias("h")).unwrap_err();
        assert!(matches!(err, RouterError::InvalidCommandDefinition { .. }));
        assert!(!registry.exists("history"));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_self_collision_rejected() {
        let mut registry = CommandRegistry::new();
        assert!(registry.register(cmd("echo").with_alias("echo")).is_err());
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut registry = CommandRegistry::new();
        assert!(registry.register(cmd("")).is_err());
        assert!(registry.register(cmd("two words")).is_err());
    }

    #[test]
    fn test_remainder_must_be_last() {
        let mut registry = CommandRegistry::new();
        let bad = cmd("bad")
            .with_arg(string_arg().with_remainder(true))
            .with_arg(string_arg());
        let err = registry.register(bad).unwrap_err();
        assert!(matches!(err, RouterError::InvalidCommandDefinition { .. }));
        assert_eq!(registry.count(), 0);
        assert!(!registry.exists("bad"));
    }

    #[test]
    fn test_two_remainders_rejected() {
        let mut registry = CommandRegistry::new();
        let bad = cmd("bad")
            .with_arg(string_arg().with_remainder(true))
            .with_arg(string_arg().with_remainder(true));
        assert!(registry.register(bad).is_err());
    }

    #[test]
    fn test_remainder_cannot_be_greedy() {
        let mut registry = CommandRegistry::new();
        let bad = cmd("bad").with_arg(string_arg().with_remainder(true).with_greedy(true));
        assert!(registry.register(bad).is_err());
    }

    #[test]
    fn test_unregister_removes_aliases() {
        let mut registry = CommandRegistry::new();
        registry.register(cmd("help").with_alias("h")).unwrap();
        registry.unregister("h").unwrap();
        assert!(!registry.exists("help"));
        assert!(!registry.exists("h"));
        assert_eq!(registry.count(), 0);
        assert!(registry.unregister("help").is_err());
    }

    #[test]
    fn test_list_in_registration_order() {
        let mut registry = CommandRegistry::new();
        registry.register(cmd("b").with_category("fun")).unwrap();
        registry.register(cmd("a")).unwrap();
        registry.register(cmd("c").with_category("fun")).unwrap();

        let names: Vec<_> = registry.list_all().iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);

        let fun: Vec<_> = registry
            .list_by_category("fun")
            .iter()
            .map(|c| c.name.clone())
            .collect();
        assert_eq!(fun, vec!["b", "c"]);
    }
}
