//! egui overlay: the sliding console panel.
//!
//! The panel drops from the top of the screen to a height given by the
//! `con_height` variable (a percentage of the window). The edit buffer and
//! its cursor live here; history navigation and autocompletion delegate to
//! the core.

use bevy::prelude::*;
use bevy_egui::egui::text::{CCursor, CCursorRange};
use bevy_egui::{EguiContexts, egui};

use crate::config::ConsoleConfig;
use crate::core::{
    ConsoleHistory, ConsoleInputEvent, ConsoleLog, ConsoleRegistry, ConsoleToggleEvent,
    ConsoleView, autocomplete,
};

/// Prefix drawn before the edit buffer.
pub const PROMPT: &str = "> ";

const TEXT_EDIT_ID: &str = "devcon_text_edit";

/// The overlay's edit-buffer state.
#[derive(Resource, Default)]
pub struct ConsoleUiState {
    /// Current edit-buffer text.
    pub(crate) buffer: String,
    /// Whether focus has been claimed since the console opened.
    pub(crate) text_focus: bool,
}

/// System: open or close the console on the configured key.
pub(crate) fn toggle_console(
    key: Res<ButtonInput<KeyCode>>,
    config: Res<ConsoleConfig>,
    mut view: ResMut<ConsoleView>,
    mut state: ResMut<ConsoleUiState>,
    mut toggles: MessageWriter<ConsoleToggleEvent>,
) {
    if key.just_pressed(config.open_key) {
        let open = view.toggle();
        state.text_focus = false;
        toggles.write(ConsoleToggleEvent { open });
    }
}

/// System: draw the console panel while it occupies any screen space.
pub(crate) fn render_console(
    mut contexts: EguiContexts,
    mut state: ResMut<ConsoleUiState>,
    mut view: ResMut<ConsoleView>,
    mut history: ResMut<ConsoleHistory>,
    registry: Res<ConsoleRegistry>,
    log: Res<ConsoleLog>,
    config: Res<ConsoleConfig>,
    mut input_events: MessageWriter<ConsoleInputEvent>,
) -> Result<(), BevyError> {
    let ctx = contexts.ctx_mut()?;

    // Chase the target height: con_height percent of the window when open
    let fraction = registry.get::<f32>("con_height") / 100.0;
    let target = if view.open {
        ctx.screen_rect().height() * fraction
    } else {
        0.0
    };
    view.advance(target);
    if view.height() <= 0.0 {
        return Ok(());
    }

    let text_edit_id = egui::Id::new(TEXT_EDIT_ID);

    egui::TopBottomPanel::top("devcon_panel")
        .exact_height(view.height())
        .frame(
            egui::Frame::NONE
                .fill(egui::Color32::from_black_alpha(230))
                .inner_margin(egui::Margin::symmetric(6, 4)),
        )
        .show(ctx, |ui| {
            egui::TopBottomPanel::bottom("devcon_input")
                .frame(egui::Frame::NONE.outer_margin(egui::Margin::symmetric(0, 4)))
                .show_inside(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.colored_label(config.theme.prompt, PROMPT);

                        let response = ui.add(
                            egui::TextEdit::singleline(&mut state.buffer)
                                .id(text_edit_id)
                                .desired_width(ui.available_width())
                                .lock_focus(true),
                        );

                        if response.lost_focus()
                            && ui.input(|i| i.key_pressed(egui::Key::Enter))
                        {
                            let line = std::mem::take(&mut state.buffer);
                            let line = line.trim();
                            if !line.is_empty() {
                                input_events.write(ConsoleInputEvent::new(line));
                            }
                            history.reset_cursor();
                            response.request_focus();
                        }

                        if response.has_focus() {
                            handle_history_keys(ui, &mut state, &mut history, text_edit_id);
                            handle_tab_complete(ui, &mut state, &registry, text_edit_id);
                        }

                        if !state.text_focus {
                            state.text_focus = true;
                            ui.ctx().memory_mut(|mem| mem.request_focus(text_edit_id));
                        }
                    });
                });

            // Scroll back with PageUp/PageDown; scroll skips newest lines
            if ui.input(|i| i.key_pressed(egui::Key::PageUp)) {
                view.scroll = (view.scroll + 4).min(log.len().saturating_sub(1));
            }
            if ui.input(|i| i.key_pressed(egui::Key::PageDown)) {
                view.scroll = view.scroll.saturating_sub(4);
            }

            egui::ScrollArea::new([false, true])
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    let shown: Vec<_> = log.iter().skip(view.scroll).collect();
                    for line in shown.iter().rev() {
                        ui.colored_label(
                            config.theme.severity_color(line.severity),
                            &line.text,
                        );
                    }
                });
        });

    Ok(())
}

/// Arrow keys walk the history into the edit buffer, cursor at end.
fn handle_history_keys(
    ui: &egui::Ui,
    state: &mut ConsoleUiState,
    history: &mut ConsoleHistory,
    text_edit_id: egui::Id,
) {
    let mut replaced = false;

    if ui.input(|i| i.key_pressed(egui::Key::ArrowUp)) {
        if let Some(entry) = history.navigate_up() {
            state.buffer = entry.to_string();
            replaced = true;
        }
    }
    if ui.input(|i| i.key_pressed(egui::Key::ArrowDown)) {
        if let Some(entry) = history.navigate_down() {
            state.buffer = entry;
            replaced = true;
        }
    }

    if replaced {
        set_cursor_at(ui, text_edit_id, state.buffer.chars().count());
    }
}

/// Tab completes the name under the cursor when the cursor is at the end.
fn handle_tab_complete(
    ui: &egui::Ui,
    state: &mut ConsoleUiState,
    registry: &ConsoleRegistry,
    text_edit_id: egui::Id,
) {
    if !ui.input(|i| i.key_pressed(egui::Key::Tab)) {
        return;
    }

    let Some(text_edit_state) = egui::TextEdit::load_state(ui.ctx(), text_edit_id) else {
        return;
    };
    let Some(range) = text_edit_state.cursor.char_range() else {
        return;
    };
    if range.primary.index != state.buffer.chars().count() {
        return;
    }

    let mut cursor = state.buffer.len();
    autocomplete(registry, &mut state.buffer, &mut cursor);
    set_cursor_at(ui, text_edit_id, state.buffer.chars().count());
}

fn set_cursor_at(ui: &egui::Ui, text_edit_id: egui::Id, char_index: usize) {
    if let Some(mut text_edit_state) = egui::TextEdit::load_state(ui.ctx(), text_edit_id) {
        text_edit_state
            .cursor
            .set_char_range(Some(CCursorRange::one(CCursor::new(char_index))));
        text_edit_state.store(ui.ctx(), text_edit_id);
    }
}
