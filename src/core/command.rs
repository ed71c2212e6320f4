//! Console commands and variable change callbacks.
//!
//! Handlers and callbacks are capability closures: they receive the ECS
//! [`World`] and resolve whatever they act on at call time, so the
//! registry never holds a reference into the host. They are `Arc`ed
//! because `if` and `exec` re-enter the dispatcher from inside a handler.

use std::collections::HashMap;
use std::sync::Arc;

use bevy::prelude::*;

/// Handler invoked with the statement remainder, verbatim. The command
/// owns all further argument parsing.
pub type CommandHandler = Arc<dyn Fn(&str, &mut World) + Send + Sync>;

/// Callback invoked with a variable's new canonical text.
pub type VarCallback = Arc<dyn Fn(&str, &mut World) + Send + Sync>;

/// Registry-side command metadata; the handler lives in [`CommandHandlers`].
#[derive(Debug, Clone)]
pub struct CommandMeta {
    pub name: Box<str>,
    pub help: &'static str,
}

/// A console command under construction.
///
/// # Examples
///
/// ```ignore
/// let cmd = ConsoleCommand::new("noclip", |_args, _world| {
///     info!("noclip toggled");
/// })
/// .help("toggle noclip mode");
/// ```
pub struct ConsoleCommand {
    name: Box<str>,
    help: &'static str,
    handler: CommandHandler,
}

impl ConsoleCommand {
    /// Create a command with the given name and handler.
    pub fn new<F>(name: impl Into<Box<str>>, handler: F) -> Self
    where
        F: Fn(&str, &mut World) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            help: "",
            handler: Arc::new(handler),
        }
    }

    /// Set the help text shown by `help`.
    pub fn help(mut self, help: &'static str) -> Self {
        self.help = help;
        self
    }

    /// Get the command name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Split into registry metadata and the handler.
    pub fn split(self) -> (CommandMeta, CommandHandler) {
        (
            CommandMeta {
                name: self.name,
                help: self.help,
            },
            self.handler,
        )
    }
}

impl std::fmt::Debug for ConsoleCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleCommand")
            .field("name", &self.name)
            .field("help", &self.help)
            .finish_non_exhaustive()
    }
}

/// Command handlers, keyed by name.
///
/// Stored apart from [`ConsoleRegistry`](super::ConsoleRegistry) so a
/// handler can borrow the `World` (and through it, the registry) while
/// running.
#[derive(Resource, Default)]
pub struct CommandHandlers {
    handlers: HashMap<Box<str>, CommandHandler>,
}

impl CommandHandlers {
    /// Create empty handler storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any previous one with the name.
    pub fn register(&mut self, name: Box<str>, handler: CommandHandler) {
        self.handlers.insert(name, handler);
    }

    /// Clone out the handler for a command.
    pub fn get(&self, name: &str) -> Option<CommandHandler> {
        self.handlers.get(name).cloned()
    }

    /// Check if a handler is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }
}

/// Variable change callbacks, keyed by variable name.
///
/// Registration with a callback queues an immediate invocation with the
/// default's canonical text; the dispatcher drains the queue at the start
/// of its frame so the side effect lands before any queued command runs.
#[derive(Resource, Default)]
pub struct VarCallbacks {
    callbacks: HashMap<Box<str>, VarCallback>,
    pending: Vec<(Box<str>, String)>,
}

impl VarCallbacks {
    /// Create empty callback storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for a variable.
    pub fn register(&mut self, name: impl Into<Box<str>>, callback: VarCallback) {
        self.callbacks.insert(name.into(), callback);
    }

    /// Clone out the callback for a variable.
    pub fn get(&self, name: &str) -> Option<VarCallback> {
        self.callbacks.get(name).cloned()
    }

    /// Check if a variable has a callback.
    pub fn contains(&self, name: &str) -> bool {
        self.callbacks.contains_key(name)
    }

    /// Queue an invocation to run at the next dispatch.
    pub fn queue(&mut self, name: impl Into<Box<str>>, text: impl Into<String>) {
        self.pending.push((name.into(), text.into()));
    }

    /// Take all queued invocations.
    pub fn drain_queued(&mut self) -> Vec<(Box<str>, String)> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder() {
        let cmd = ConsoleCommand::new("greet", |_args, _world| {}).help("say hello");
        assert_eq!(cmd.name(), "greet");

        let (meta, _handler) = cmd.split();
        assert_eq!(&*meta.name, "greet");
        assert_eq!(meta.help, "say hello");
    }

    #[test]
    fn test_handler_storage() {
        let mut handlers = CommandHandlers::new();
        let (meta, handler) = ConsoleCommand::new("x", |_, _| {}).split();
        handlers.register(meta.name, handler);

        assert!(handlers.contains("x"));
        assert!(handlers.get("x").is_some());
        assert!(handlers.get("y").is_none());
    }

    #[test]
    fn test_callback_queue() {
        let mut callbacks = VarCallbacks::new();
        callbacks.register("con_height", Arc::new(|_, _| {}));
        callbacks.queue("con_height", "50");

        let drained = callbacks.drain_queued();
        assert_eq!(drained.len(), 1);
        assert_eq!(&*drained[0].0, "con_height");
        assert_eq!(drained[0].1, "50");
        assert!(callbacks.drain_queued().is_empty());
    }
}
