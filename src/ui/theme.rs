//! Light/dark theme application

use eframe::egui;

use crate::core::config::Theme;

/// Apply the configured theme to the egui context.
pub fn apply(ctx: &egui::Context, theme: Theme) {
    match theme {
        Theme::Light => ctx.set_visuals(egui::Visuals::light()),
        Theme::Dark => ctx.set_visuals(egui::Visuals::dark()),
    }
}
