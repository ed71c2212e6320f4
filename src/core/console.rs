//! Unified console API for the embedding application.
//!
//! [`Console`] bundles the registry, handler storage, log, and message
//! writers into one system parameter so host systems can register
//! commands and variables, read and set values, print lines, and submit
//! input without touching the individual resources.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::{
    CommandHandlers, ConsoleCommand, ConsoleInputEvent, ConsoleLog, ConsoleRegistry,
    ConsoleToggleEvent, ConsoleValue, ConsoleView, PendingEffects, Severity, Value, VarCallbacks,
    VarChangedEvent,
};

/// The embedding contract in one place.
///
/// # Examples
///
/// ```ignore
/// fn setup(mut console: Console) {
///     console.register_var("g_gravity", 9.8f64);
///
///     console.register_var_with("win_title", "my game", |text, world| {
///         // resolve the window through the World and retitle it
///     });
///
///     console.register_cmd(ConsoleCommand::new("noclip", |_args, _world| {
///         info!("noclip toggled");
///     }).help("toggle noclip mode"));
///
///     let gravity: f64 = console.get("g_gravity");
///     console.set("g_gravity", 3.7f64);
/// }
/// ```
#[derive(SystemParam)]
pub struct Console<'w> {
    registry: ResMut<'w, ConsoleRegistry>,
    handlers: ResMut<'w, CommandHandlers>,
    callbacks: ResMut<'w, VarCallbacks>,
    effects: ResMut<'w, PendingEffects>,
    log: ResMut<'w, ConsoleLog>,
    view: ResMut<'w, ConsoleView>,
    input: MessageWriter<'w, ConsoleInputEvent>,
    toggles: MessageWriter<'w, ConsoleToggleEvent>,
}

impl Console<'_> {
    /// Register a command, overwriting any existing entry with the name.
    pub fn register_cmd(&mut self, cmd: ConsoleCommand) {
        let (meta, handler) = cmd.split();
        self.handlers.register(meta.name.clone(), handler);
        self.registry.register_cmd_meta(meta);
    }

    /// Register a variable with a typed default.
    pub fn register_var(&mut self, name: &str, default: impl Into<Value>) {
        self.registry.register_var(name, default);
    }

    /// Register a variable with a change callback.
    ///
    /// The callback is also queued to run immediately with the default's
    /// canonical text, so side effects of the default (say, applying a
    /// window title) happen at registration time.
    pub fn register_var_with<F>(&mut self, name: &str, default: impl Into<Value>, callback: F)
    where
        F: Fn(&str, &mut World) + Send + Sync + 'static,
    {
        self.registry.register_var(name, default);
        self.callbacks.register(name, std::sync::Arc::new(callback));
        let text = self.registry.get_text(name).unwrap_or_default();
        self.callbacks.queue(name, text);
    }

    /// Set a variable from a typed value, creating it if absent. The
    /// change callback (if any) runs at the next dispatch.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        let canonical = self.registry.set_value(name, value);
        if self.callbacks.contains(name) {
            self.callbacks.queue(name, canonical.clone());
        }
        self.effects
            .changes
            .push(VarChangedEvent::new(name, canonical));
    }

    /// Set a variable from text, exactly as the `set` command would.
    pub fn set_text(&mut self, name: &str, text: &str) {
        let canonical = self.registry.set_text(name, text);
        if self.callbacks.contains(name) {
            self.callbacks.queue(name, canonical.clone());
        }
        self.effects
            .changes
            .push(VarChangedEvent::new(name, canonical));
    }

    /// Read a variable as `T`; unknown names read as the type's zero.
    pub fn get<T: ConsoleValue>(&self, name: &str) -> T {
        self.registry.get(name)
    }

    /// Read a variable as `T`, or `None` if absent or unparsable.
    pub fn try_get<T: ConsoleValue>(&self, name: &str) -> Option<T> {
        self.registry.try_get(name)
    }

    /// A variable's canonical text.
    pub fn get_text(&self, name: &str) -> Option<String> {
        self.registry.get_text(name)
    }

    /// Print a line into the console at the given severity.
    pub fn print(&mut self, line: &str, severity: Severity) {
        self.log.print(line, severity);
    }

    /// Open or close the console panel.
    pub fn toggle(&mut self) -> bool {
        let open = self.view.toggle();
        self.toggles.write(ConsoleToggleEvent { open });
        open
    }

    /// Submit a line as if the user typed it.
    pub fn submit(&mut self, line: impl Into<String>) {
        self.input.write(ConsoleInputEvent::new(line));
    }

    /// Run a line programmatically: no echo, no history entry.
    pub fn run(&mut self, line: impl Into<String>) {
        self.input.write(ConsoleInputEvent::script(line));
    }

    /// Read-only access to the registry for anything not covered here.
    pub fn registry(&self) -> &ConsoleRegistry {
        &self.registry
    }
}

/// Read-only console access, for systems that only inspect values.
#[derive(SystemParam)]
pub struct ConsoleRef<'w> {
    registry: Res<'w, ConsoleRegistry>,
}

impl ConsoleRef<'_> {
    /// Read a variable as `T`; unknown names read as the type's zero.
    pub fn get<T: ConsoleValue>(&self, name: &str) -> T {
        self.registry.get(name)
    }

    /// Read a variable as `T`, or `None` if absent or unparsable.
    pub fn try_get<T: ConsoleValue>(&self, name: &str) -> Option<T> {
        self.registry.try_get(name)
    }

    /// A variable's canonical text.
    pub fn get_text(&self, name: &str) -> Option<String> {
        self.registry.get_text(name)
    }

    /// Access the underlying registry.
    pub fn registry(&self) -> &ConsoleRegistry {
        &self.registry
    }
}
