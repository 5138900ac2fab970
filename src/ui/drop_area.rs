//! Drop target shown while no document is loaded

use std::path::PathBuf;

use eframe::egui;

/// Action requested from the drop area.
pub enum DropAreaAction {
    OpenFile(PathBuf),
}

/// Landing panel: drag-and-drop hint plus an Open button.
pub struct DropArea;

impl DropArea {
    /// Show the drop area. Returns an action when the user picked a file
    /// through the dialog; dropped files are handled by the app itself.
    pub fn show(ui: &mut egui::Ui, hovering_file: bool) -> Option<DropAreaAction> {
        let mut action = None;

        let stroke = if hovering_file {
            egui::Stroke::new(2.0, ui.visuals().selection.stroke.color)
        } else {
            egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color)
        };

        egui::Frame::group(ui.style())
            .stroke(stroke)
            .inner_margin(egui::Margin::same(24))
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(80.0);
                    ui.heading("\u{1F4C4} Drop a document here");
                    ui.add_space(8.0);
                    ui.label("Supported formats: DOCX and RTF");
                    ui.add_space(24.0);
                    if ui.button("Open Document\u{2026}").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Word Documents", &["docx"])
                            .add_filter("RTF Documents", &["rtf"])
                            .pick_file()
                        {
                            action = Some(DropAreaAction::OpenFile(path));
                        }
                    }
                    ui.add_space(80.0);
                });
            });

        action
    }
}
