//! Console overlay configuration.

use bevy::prelude::*;
use bevy_egui::egui::Color32;

use crate::core::Severity;

/// Configuration for the console overlay.
#[derive(Resource, Clone)]
pub struct ConsoleConfig {
    /// Key that opens and closes the console.
    pub open_key: KeyCode,
    /// Severity colors.
    pub theme: ConsoleTheme,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            open_key: KeyCode::Backquote,
            theme: ConsoleTheme::default(),
        }
    }
}

impl ConsoleConfig {
    /// Override theme colors from the settings file.
    #[cfg(feature = "persist")]
    pub fn apply_settings(&mut self, settings: &crate::persist::ConsoleSettings) {
        let rgb = |c: [u8; 3]| Color32::from_rgb(c[0], c[1], c[2]);
        self.theme.info = rgb(settings.colors.info);
        self.theme.warning = rgb(settings.colors.warning);
        self.theme.error = rgb(settings.colors.error);
        self.theme.success = rgb(settings.colors.success);
        self.theme.system = rgb(settings.colors.system);
    }
}

/// Display colors for each severity plus the prompt.
#[derive(Clone)]
pub struct ConsoleTheme {
    pub info: Color32,
    pub warning: Color32,
    pub error: Color32,
    pub success: Color32,
    pub system: Color32,
    pub prompt: Color32,
}

impl Default for ConsoleTheme {
    fn default() -> Self {
        Self {
            info: Color32::WHITE,
            warning: Color32::YELLOW,
            error: Color32::from_rgb(255, 64, 64),
            success: Color32::from_rgb(64, 255, 64),
            system: Color32::from_rgb(0, 255, 255),
            prompt: Color32::GRAY,
        }
    }
}

impl ConsoleTheme {
    /// The color a severity renders in.
    pub fn severity_color(&self, severity: Severity) -> Color32 {
        match severity {
            Severity::Info => self.info,
            Severity::Warning => self.warning,
            Severity::Error => self.error,
            Severity::Success => self.success,
            Severity::System => self.system,
        }
    }
}
