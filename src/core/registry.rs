//! Variable and command registries.
//!
//! Both live in one console-owned resource, but in separate maps: a
//! command and a variable may share a name without conflict. Each map is
//! paired with a name trie for prefix iteration and autocomplete.

use std::collections::HashMap;

use bevy::prelude::*;

use super::{CommandMeta, ConsoleValue, NameTrie, Value};

/// Central store for console variables and command metadata.
///
/// Owned by the plugin's `App`; never process-wide. Variables are
/// auto-vivifying: setting an unknown name creates it. Commands are
/// registered once at startup and only ever overwritten, never removed.
///
/// # Examples
///
/// ```
/// use bevy_devcon::core::ConsoleRegistry;
///
/// let mut registry = ConsoleRegistry::new();
/// registry.register_var("con_height", 50i64);
///
/// assert_eq!(registry.get::<i64>("con_height"), 50);
/// assert_eq!(registry.get::<i64>("missing"), 0);
/// ```
#[derive(Resource, Default)]
pub struct ConsoleRegistry {
    vars: HashMap<Box<str>, Value>,
    cmds: HashMap<Box<str>, CommandMeta>,
    var_names: NameTrie,
    cmd_names: NameTrie,
}

impl ConsoleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variable with a typed default, overwriting any existing
    /// entry with the same name.
    pub fn register_var(&mut self, name: &str, default: impl Into<Value>) {
        if self.vars.insert(name.into(), default.into()).is_some() {
            warn!("console: overwriting existing variable '{}'", name);
        }
        self.var_names.insert(name);
    }

    /// Register a command's metadata, overwriting any existing entry.
    ///
    /// The handler is stored separately in
    /// [`CommandHandlers`](super::CommandHandlers).
    pub fn register_cmd_meta(&mut self, meta: CommandMeta) {
        let name = meta.name.clone();
        if self.cmds.insert(name.clone(), meta).is_some() {
            warn!("console: overwriting existing command '{}'", name);
        }
        self.cmd_names.insert(&name);
    }

    /// Check if a variable exists.
    pub fn contains_var(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Check if a command exists.
    pub fn contains_cmd(&self, name: &str) -> bool {
        self.cmds.contains_key(name)
    }

    /// A variable's canonical text, or `None` if absent.
    pub fn get_text(&self, name: &str) -> Option<String> {
        self.vars.get(name).map(Value::encode)
    }

    /// Read a variable as `T`. Unknown names and failed parses read as
    /// the type's zero value.
    pub fn get<T: ConsoleValue>(&self, name: &str) -> T {
        self.try_get(name).unwrap_or_else(T::zero)
    }

    /// Read a variable as `T`, distinguishing absence and parse failure.
    pub fn try_get<T: ConsoleValue>(&self, name: &str) -> Option<T> {
        self.vars.get(name).and_then(|v| T::from_text(&v.encode()))
    }

    /// Store text into a variable, creating it if absent.
    ///
    /// Existing entries re-decode the text against their tag (degrading
    /// to `Str` on failure); new entries are plain text. Returns the
    /// canonical text actually stored.
    pub fn set_text(&mut self, name: &str, text: &str) -> String {
        match self.vars.get_mut(name) {
            Some(value) => {
                *value = value.decode_as_self(text);
                value.encode()
            }
            None => {
                self.vars.insert(name.into(), Value::Str(text.to_string()));
                self.var_names.insert(name);
                text.to_string()
            }
        }
    }

    /// Store a typed value, creating or re-tagging the variable.
    /// Returns the canonical text stored.
    pub fn set_value(&mut self, name: &str, value: impl Into<Value>) -> String {
        let value = value.into();
        let text = value.encode();
        if self.vars.insert(name.into(), value).is_none() {
            self.var_names.insert(name);
        }
        text
    }

    /// Number of registered variables.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Number of registered commands.
    pub fn cmd_count(&self) -> usize {
        self.cmds.len()
    }

    /// Variable names for prefix matching.
    pub fn var_names(&self) -> &NameTrie {
        &self.var_names
    }

    /// Command names for prefix matching.
    pub fn cmd_names(&self) -> &NameTrie {
        &self.cmd_names
    }

    /// Command metadata in name order, filtered by prefix. Used by `help`.
    pub fn cmds_with_prefix(&self, prefix: &str) -> Vec<&CommandMeta> {
        self.cmd_names
            .with_prefix(prefix)
            .iter()
            .filter_map(|name| self.cmds.get(name.as_str()))
            .collect()
    }

    /// Iterate over all variables as (name, canonical text).
    pub fn vars(&self) -> impl Iterator<Item = (&str, String)> {
        self.vars.iter().map(|(k, v)| (k.as_ref(), v.encode()))
    }
}
