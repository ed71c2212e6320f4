//! Statement dispatcher.
//!
//! A submitted line splits on `;` into statements. Each statement routes
//! to a registered command (which receives the remainder verbatim) or,
//! failing that, to the expression evaluator. The split is deliberately
//! not quote-aware: a `;` inside quotes still terminates a statement, and
//! existing scripts depend on that.

use bevy::prelude::*;

use super::{
    CommandHandlers, ConsoleHistory, ConsoleLog, ConsoleRegistry, Evaluator, PlaySoundRequest,
    Severity, VarCallbacks, VarChangedEvent,
};

/// Side effects raised during exclusive-world dispatch, flushed to
/// messages afterward by [`flush_pending_effects`].
#[derive(Resource, Default)]
pub struct PendingEffects {
    pub changes: Vec<VarChangedEvent>,
    pub sounds: Vec<PlaySoundRequest>,
    pub quit: bool,
}

/// Whether the statement currently executing came from direct user entry.
/// `set` consults this to suppress its confirmation line in scripts.
#[derive(Resource, Default)]
pub struct ExecContext {
    pub user_input: bool,
}

/// Lines waiting for the exclusive dispatch system.
#[derive(Resource, Default)]
pub(crate) struct PendingLines(pub(crate) Vec<(String, bool)>);

/// Evaluate an expression against the world's registry, routing error
/// lines to the console log.
pub fn eval_expr(world: &mut World, expr: &str) -> String {
    world.resource_scope(|world, mut log: Mut<ConsoleLog>| {
        let registry = world.resource::<ConsoleRegistry>();
        Evaluator::new(registry, &mut log).eval(expr)
    })
}

/// Execute one raw line.
///
/// User-entered lines are echoed with a `> ` prefix and recorded to
/// history before any statement runs. A statement that is neither a
/// command nor an evaluable expression reports an error and abandons the
/// rest of the line.
pub fn exec(world: &mut World, input: &str, user_input: bool) {
    if user_input {
        world
            .resource_mut::<ConsoleLog>()
            .print(&format!("> {input}"), Severity::Info);
        let record_err = {
            let mut history = world.resource_mut::<ConsoleHistory>();
            let path = history.path().display().to_string();
            history.record(input).err().map(|e| (path, e))
        };
        if let Some((path, e)) = record_err {
            world
                .resource_mut::<ConsoleLog>()
                .print(&format!("could not write '{path}': {e}"), Severity::Warning);
        }
    }

    world.resource_mut::<ExecContext>().user_input = user_input;

    for statement in input.split(';') {
        if statement.is_empty() {
            continue;
        }

        let (name, remainder) = match statement.find(' ') {
            Some(at) => (&statement[..at], &statement[at + 1..]),
            None => (statement, ""),
        };

        if world.resource::<ConsoleRegistry>().contains_cmd(name) {
            let handler = world.resource::<CommandHandlers>().get(name);
            if let Some(handler) = handler {
                (*handler)(remainder, world);
            }
        } else {
            let value = eval_expr(world, statement);
            if value.is_empty() {
                world.resource_mut::<ConsoleLog>().print(
                    &format!("'{name}' is not a valid command."),
                    Severity::Error,
                );
                return;
            }
            world
                .resource_mut::<ConsoleLog>()
                .print(&value, Severity::Info);
        }
    }
}

/// Store text into a variable and run the attached machinery: the change
/// callback (synchronously) and a queued [`VarChangedEvent`].
pub fn set_variable(world: &mut World, name: &str, text: &str) -> String {
    let canonical = world
        .resource_mut::<ConsoleRegistry>()
        .set_text(name, text);

    let callback = world.resource::<VarCallbacks>().get(name);
    if let Some(callback) = callback {
        (*callback)(&canonical, world);
    }

    world
        .resource_mut::<PendingEffects>()
        .changes
        .push(VarChangedEvent::new(name, canonical.clone()));
    canonical
}

/// System: move submitted input messages into the pending queue.
pub(crate) fn queue_input_lines(
    mut events: MessageReader<super::ConsoleInputEvent>,
    mut pending: ResMut<PendingLines>,
) {
    for event in events.read() {
        pending.0.push((event.line.clone(), event.user));
    }
}

/// Exclusive system: run registration-time variable callbacks, then every
/// queued line, in order.
pub(crate) fn dispatch_pending_lines(world: &mut World) {
    let queued_callbacks = world.resource_mut::<VarCallbacks>().drain_queued();
    for (name, text) in queued_callbacks {
        let callback = world.resource::<VarCallbacks>().get(&name);
        if let Some(callback) = callback {
            (*callback)(&text, world);
        }
    }

    let lines = std::mem::take(&mut world.resource_mut::<PendingLines>().0);
    for (line, user) in lines {
        exec(world, &line, user);
    }
}

/// System: forward queued side effects as messages.
pub(crate) fn flush_pending_effects(
    mut pending: ResMut<PendingEffects>,
    mut changes: MessageWriter<VarChangedEvent>,
    mut sounds: MessageWriter<PlaySoundRequest>,
    mut exit: MessageWriter<AppExit>,
) {
    for change in pending.changes.drain(..) {
        changes.write(change);
    }
    for sound in pending.sounds.drain(..) {
        sounds.write(sound);
    }
    if pending.quit {
        pending.quit = false;
        exit.write(AppExit::Success);
    }
}
