//! Console messages for communication with the host and the UI.

use bevy::prelude::*;

/// A line submitted for execution.
///
/// User-entered lines are echoed and recorded to history; programmatic
/// lines (scripts, conditional branches, host automation) are not.
///
/// # Examples
///
/// ```ignore
/// fn submit(mut events: MessageWriter<ConsoleInputEvent>) {
///     events.write(ConsoleInputEvent::new("set $lives 5"));
/// }
/// ```
#[derive(Message, Debug, Clone)]
pub struct ConsoleInputEvent {
    /// The raw line to execute.
    pub line: String,
    /// Whether this came from direct user entry.
    pub user: bool,
}

impl ConsoleInputEvent {
    /// A line typed by the user.
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            user: true,
        }
    }

    /// A programmatic line: no echo, no history entry.
    pub fn script(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            user: false,
        }
    }
}

/// Sent after a variable's value changes through the console.
#[derive(Message, Debug, Clone)]
pub struct VarChangedEvent {
    pub name: Box<str>,
    /// The canonical text now stored.
    pub value: String,
}

impl VarChangedEvent {
    pub fn new(name: impl Into<Box<str>>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Sent when the console opens or closes.
#[derive(Message, Debug, Clone, Copy)]
pub struct ConsoleToggleEvent {
    pub open: bool,
}

/// Request from the `play` command; the host's audio layer resolves the
/// path and plays it.
#[derive(Message, Debug, Clone)]
pub struct PlaySoundRequest {
    pub path: String,
}

/// Registers all console messages.
pub struct ConsoleEventsPlugin;

impl Plugin for ConsoleEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ConsoleInputEvent>()
            .add_message::<VarChangedEvent>()
            .add_message::<ConsoleToggleEvent>()
            .add_message::<PlaySoundRequest>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_event_flags() {
        assert!(ConsoleInputEvent::new("echo hi").user);
        assert!(!ConsoleInputEvent::script("echo hi").user);
    }

    #[test]
    fn test_var_changed_event() {
        let event = VarChangedEvent::new("lives", "5");
        assert_eq!(&*event.name, "lives");
        assert_eq!(event.value, "5");
    }
}
