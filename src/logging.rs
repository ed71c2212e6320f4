//! Host log capture for the console.
//!
//! Installed through [`LogPlugin::custom_layer`](bevy::log::LogPlugin):
//! tracing events from the host flow into the console's ring buffer so
//! engine output shows up alongside command output. Lines the console
//! itself mirrored out (target `"devcon"`) are skipped to avoid
//! re-ingesting them.

use std::sync::mpsc;

use bevy::log::{BoxedLayer, Level};
use bevy::prelude::*;
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::field::Visit;

use crate::core::{ConsoleLog, LOG_TARGET, Severity};

/// Layer factory for [`LogPlugin::custom_layer`](bevy::log::LogPlugin).
///
/// ```ignore
/// App::new().add_plugins(DefaultPlugins.set(bevy::log::LogPlugin {
///     custom_layer: bevy_devcon::logging::console_log_layer,
///     ..default()
/// }))
/// ```
pub fn console_log_layer(app: &mut App) -> Option<BoxedLayer> {
    Some(Box::new(create_capture_layer(app)))
}

fn create_capture_layer(app: &mut App) -> CaptureLayer {
    let (sender, receiver) = mpsc::channel();
    app.insert_non_send_resource(CapturedLines(receiver));
    app.add_systems(PostUpdate, drain_captured_lines);
    CaptureLayer { sender }
}

/// One captured host log event.
struct CapturedLine {
    level: Level,
    target: String,
    message: String,
}

/// Receiver side of the capture channel.
struct CapturedLines(mpsc::Receiver<CapturedLine>);

/// Move captured host lines into the console ring.
fn drain_captured_lines(receiver: NonSend<CapturedLines>, log: Option<ResMut<ConsoleLog>>) {
    let Some(mut log) = log else { return };
    for line in receiver.0.try_iter() {
        let severity = match line.level {
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warning,
            _ => Severity::Info,
        };
        // print_raw: these already reached the process log once
        log.print_raw(format!("[{}] {}", line.target, line.message), severity);
    }
}

/// A tracing [`Layer`] that forwards events over the capture channel.
struct CaptureLayer {
    sender: mpsc::Sender<CapturedLine>,
}

impl<S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>> Layer<S>
    for CaptureLayer
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        if metadata.target() == LOG_TARGET {
            return;
        }

        let mut message = None;
        event.record(&mut MessageVisitor(&mut message));
        if let Some(message) = message {
            let _ = self.sender.send(CapturedLine {
                level: *metadata.level(),
                target: metadata.target().to_string(),
                message,
            });
        }
    }
}

/// Extracts the `message` field from an event.
struct MessageVisitor<'a>(&'a mut Option<String>);

impl Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = Some(format!("{value:?}"));
        }
    }
}
