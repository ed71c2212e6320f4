//! An embedded, line-oriented developer console for Bevy.
//!
//! bevy_devcon drops a Quake-style console into a running game: a live
//! command interpreter bound to a mutable variable store, dispatched
//! synchronously inside the `Update` schedule every frame.
//!
//! - **Variables**: text-encoded values referenced with a `$` sigil,
//!   auto-created on first `set`, with optional change callbacks
//! - **Commands**: named handlers that receive their argument string verbatim
//! - **Expressions**: `set $hp $hp - 10`, `if $score > 100, echo "nice"`,
//!   string concatenation with `+`, comparisons returning `1`/`0`
//! - **History**: persisted to a plain-text file, arrow-key navigation
//! - **Autocomplete**: shortest-prefix-match over command and variable names
//! - **Log**: bounded severity-tagged ring, mirrored to `bevy::log`
//!
//! # Features
//!
//! - `egui` (default): sliding egui overlay with log capture
//! - `persist`: RON settings file (theme colors, history path)
//! - `full`: egui + persist
//!
//! # Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_devcon::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(DevConsolePlugin::default())
//!         .add_systems(Startup, setup_console)
//!         .run();
//! }
//!
//! fn setup_console(mut console: Console) {
//!     console.register_var("g_speed", 4.5f64);
//!
//!     console.register_cmd(ConsoleCommand::new("respawn", |_args, world| {
//!         // full World access here
//!     }).help("respawn the player"));
//!
//!     let speed: f64 = console.get("g_speed");
//!     console.set("g_speed", speed * 2.0);
//! }
//! ```
//!
//! The host is responsible for two outward-facing commands: `quit` emits
//! [`bevy::app::AppExit`], and `play` emits a [`PlaySoundRequest`] message
//! for the host's audio layer to resolve.

use std::path::PathBuf;

use bevy::prelude::*;

// Core module (always available, zero optional deps)
pub mod core;

// Re-export core types at crate root for convenience
pub use core::{
    CommandHandler, CommandHandlers, CommandMeta, Console, ConsoleCommand, ConsoleHistory,
    ConsoleInputEvent, ConsoleLog, ConsoleRef, ConsoleRegistry, ConsoleToggleEvent, ConsoleValue,
    ConsoleView, Evaluator, ExecContext, LogLine, NameTrie, PendingEffects, PlaySoundRequest,
    Rgb, Severity, Token, TokenKind, Value, VarCallbacks, VarChangedEvent, autocomplete,
    eval_expr, exec, set_variable, tokenize,
};

// UI modules (feature-gated)
#[cfg(feature = "egui")]
pub mod config;
#[cfg(feature = "egui")]
pub mod logging;
#[cfg(feature = "egui")]
pub mod ui;

// Settings persistence (feature-gated)
#[cfg(feature = "persist")]
pub mod persist;

#[cfg(feature = "egui")]
pub use config::{ConsoleConfig, ConsoleTheme};

#[cfg(feature = "persist")]
pub use persist::{ConsoleSettings, DEFAULT_SETTINGS_FILE, SettingsError};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::DevConsolePlugin;
    pub use crate::core::{
        Console, ConsoleCommand, ConsoleInputEvent, ConsoleLog, ConsoleRef, ConsoleRegistry,
        ConsoleToggleEvent, PlaySoundRequest, Rgb, Severity, VarChangedEvent,
    };
}

/// Main console plugin.
///
/// `history_file` overrides the history path; when `None` the path comes
/// from the settings file (`persist` feature) or defaults to
/// `history.txt`.
#[derive(Default)]
pub struct DevConsolePlugin {
    pub history_file: Option<PathBuf>,
}

impl Plugin for DevConsolePlugin {
    fn build(&self, app: &mut App) {
        #[cfg(feature = "persist")]
        let settings = persist::ConsoleSettings::load_or_default(persist::DEFAULT_SETTINGS_FILE);

        #[cfg(feature = "persist")]
        let default_history: PathBuf = settings.history_file.clone().into();
        #[cfg(not(feature = "persist"))]
        let default_history: PathBuf = core::DEFAULT_HISTORY_FILE.into();

        let history_path = self.history_file.clone().unwrap_or(default_history);

        app.init_resource::<ConsoleRegistry>()
            .init_resource::<CommandHandlers>()
            .init_resource::<VarCallbacks>()
            .init_resource::<ConsoleLog>()
            .init_resource::<ConsoleView>()
            .init_resource::<PendingEffects>()
            .init_resource::<ExecContext>()
            .init_resource::<core::PendingLines>()
            .insert_resource(ConsoleHistory::new(history_path))
            .add_plugins(core::ConsoleEventsPlugin);

        // Register built-ins, then print the banner and load history
        app.add_systems(
            Startup,
            (register_builtin_commands, init_console).chain(),
        );

        // Input pipeline, in order:
        // 1. queue_input_lines: collect submitted lines
        // 2. dispatch_pending_lines: execute with exclusive World access
        // 3. flush_pending_effects: forward queued side effects as messages
        app.add_systems(
            Update,
            (
                core::queue_input_lines,
                core::dispatch_pending_lines,
                core::flush_pending_effects,
            )
                .chain(),
        );

        #[cfg(feature = "persist")]
        app.insert_resource(settings);

        // egui overlay (feature-gated)
        #[cfg(feature = "egui")]
        {
            use bevy_egui::EguiPrimaryContextPass;

            #[cfg(feature = "persist")]
            let console_config = {
                let mut console_config = config::ConsoleConfig::default();
                console_config.apply_settings(app.world().resource::<persist::ConsoleSettings>());
                console_config
            };
            #[cfg(not(feature = "persist"))]
            let console_config = config::ConsoleConfig::default();

            app.insert_resource(console_config)
                .init_resource::<ui::ConsoleUiState>()
                .add_systems(Update, ui::toggle_console)
                .add_systems(
                    EguiPrimaryContextPass,
                    ui::render_console.run_if(|view: Res<ConsoleView>| view.visible()),
                );
        }
    }
}

/// Register a command in both the registry and the handler storage.
fn register_cmd(
    registry: &mut ConsoleRegistry,
    handlers: &mut CommandHandlers,
    cmd: ConsoleCommand,
) {
    let (meta, handler) = cmd.split();
    handlers.register(meta.name.clone(), handler);
    registry.register_cmd_meta(meta);
}

/// Register the built-in commands and variables.
fn register_builtin_commands(
    mut registry: ResMut<ConsoleRegistry>,
    mut handlers: ResMut<CommandHandlers>,
) {
    // con_height - console panel height as a percentage of the window
    registry.register_var("con_height", 50i64);
    // echo_mode - severity index used by the echo command
    registry.register_var("echo_mode", 0i64);

    // set - store an evaluated value into a variable
    register_cmd(&mut registry, &mut handlers, ConsoleCommand::new("set", |args, world| {
        let Some(at) = args.find(' ') else {
            world
                .resource_mut::<ConsoleLog>()
                .print("set [VARIABLE] [VALUE]", Severity::Info);
            return;
        };
        let (var, value_expr) = (&args[..at], &args[at + 1..]);

        let value = eval_expr(world, value_expr);
        if value.is_empty() {
            world
                .resource_mut::<ConsoleLog>()
                .print("error: could not evaluate", Severity::Error);
            return;
        }

        let name: String = var.chars().filter(|&c| c != core::SIGIL).collect();
        let canonical = set_variable(world, &name, &value);

        if world.resource::<ExecContext>().user_input {
            world
                .resource_mut::<ConsoleLog>()
                .print(&format!("set ${name} to \"{canonical}\""), Severity::Info);
        }
    }).help("set a variable to a value"));

    // value - print a variable's stored text
    register_cmd(&mut registry, &mut handlers, ConsoleCommand::new("value", |args, world| {
        let name: String = args.chars().filter(|&c| c != core::SIGIL).collect();
        if name.is_empty() {
            world
                .resource_mut::<ConsoleLog>()
                .print("value [VARIABLE]", Severity::Info);
            return;
        }
        let text = world.resource::<ConsoleRegistry>().get::<String>(&name);
        world.resource_mut::<ConsoleLog>().print(&text, Severity::Info);
    }).help("echo the value of a variable"));

    // if - conditional dispatch: if <condition>, <true cmd>[, <false cmd>]
    register_cmd(&mut registry, &mut handlers, ConsoleCommand::new("if", |args, world| {
        if args.is_empty() {
            world
                .resource_mut::<ConsoleLog>()
                .print("if [CONDITION] [TRUE CMD] (ELSE CMD)", Severity::Info);
            return;
        }

        // Top-level comma split; quotes get no special treatment here
        let mut condition = "";
        let mut on_true = "";
        let mut on_false = "";
        for field in args.split(',') {
            let field = field.trim();
            if field.is_empty() {
                continue;
            }
            if condition.is_empty() {
                condition = field;
            } else if on_true.is_empty() {
                on_true = field;
            } else if on_false.is_empty() {
                on_false = field;
            }
        }

        if condition.is_empty() || on_true.is_empty() {
            world
                .resource_mut::<ConsoleLog>()
                .print("if [CONDITION] [TRUE CMD] (ELSE CMD)", Severity::Info);
            return;
        }

        // Anything but the literal "0" takes the true branch
        let result = eval_expr(world, condition);
        if result != "0" {
            exec(world, on_true, false);
        } else if !on_false.is_empty() {
            exec(world, on_false, false);
        }
    }).help("perform a conditional command"));

    // exec - run a script file, one statement per line
    register_cmd(&mut registry, &mut handlers, ConsoleCommand::new("exec", |args, world| {
        if args.is_empty() {
            world
                .resource_mut::<ConsoleLog>()
                .print("exec [FILE]", Severity::Info);
            return;
        }
        // A missing file runs nothing and reports nothing
        let Ok(contents) = std::fs::read_to_string(args) else {
            return;
        };
        for line in contents.lines() {
            if !line.is_empty() {
                exec(world, line, false);
            }
        }
    }).help("executes a script file"));

    // echo - evaluate and print a message
    register_cmd(&mut registry, &mut handlers, ConsoleCommand::new("echo", |args, world| {
        if args.is_empty() {
            world
                .resource_mut::<ConsoleLog>()
                .print("echo [MESSAGE]", Severity::Info);
            return;
        }
        let value = eval_expr(world, args);
        if value.is_empty() {
            world
                .resource_mut::<ConsoleLog>()
                .print("error: could not evaluate", Severity::Error);
            return;
        }
        let mode = world.resource::<ConsoleRegistry>().get::<i64>("echo_mode");
        let severity = Severity::from_index(mode).unwrap_or_default();
        world.resource_mut::<ConsoleLog>().print(&value, severity);
    }).help("print a message to the console"));

    // clear - drop all console output
    register_cmd(&mut registry, &mut handlers, ConsoleCommand::new("clear", |_args, world| {
        world.resource_mut::<ConsoleLog>().clear();
    }).help("clear the console"));

    // help - list commands, optionally filtered by prefix
    register_cmd(&mut registry, &mut handlers, ConsoleCommand::new("help", |args, world| {
        let lines: Vec<String> = world
            .resource::<ConsoleRegistry>()
            .cmds_with_prefix(args)
            .iter()
            .map(|meta| format!("{:<32}{}", meta.name, meta.help))
            .collect();
        let mut log = world.resource_mut::<ConsoleLog>();
        for line in &lines {
            log.print(line, Severity::Info);
        }
    }).help("print this message"));

    // clearhistory - wipe the in-memory list and the backing file
    register_cmd(&mut registry, &mut handlers, ConsoleCommand::new("clearhistory", |_args, world| {
        let result = world.resource_mut::<ConsoleHistory>().clear();
        let mut log = world.resource_mut::<ConsoleLog>();
        match result {
            Ok(()) => log.print("history cleared.", Severity::Info),
            Err(e) => log.print(&format!("could not clear history: {e}"), Severity::Error),
        }
    }).help("clear the command history log"));

    // quit - hand control back to the host's lifecycle
    register_cmd(&mut registry, &mut handlers, ConsoleCommand::new("quit", |_args, world| {
        world.resource_mut::<PendingEffects>().quit = true;
    }).help("exit the application"));

    // play - ask the host's audio layer for a sound
    register_cmd(&mut registry, &mut handlers, ConsoleCommand::new("play", |args, world| {
        if args.is_empty() {
            return;
        }
        world
            .resource_mut::<PendingEffects>()
            .sounds
            .push(PlaySoundRequest {
                path: args.to_string(),
            });
    }).help("play a sound"));
}

/// Print the banner and load persisted history.
fn init_console(mut log: ResMut<ConsoleLog>, mut history: ResMut<ConsoleHistory>) {
    log.print_raw(
        concat!("devcon ", env!("CARGO_PKG_VERSION")),
        Severity::System,
    );
    log.print_raw("type 'help' for available commands", Severity::System);
    log.print_raw("", Severity::Info);

    if let Err(e) = history.load() {
        let path = history.path().display().to_string();
        log.print(
            &format!("could not read '{path}': {e}"),
            Severity::Warning,
        );
    }

    log.print("Console initialised.", Severity::Success);
}
