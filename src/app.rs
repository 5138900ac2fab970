//! Main application state and UI coordination
//!
//! The controller of the load → review → modify → save flow. It owns the
//! single active [`DocumentHandle`]; load or apply failures report the
//! error and leave the current state untouched.

use std::path::{Path, PathBuf};

use eframe::egui;

use crate::core::config::AppConfig;
use crate::core::document::{DocumentFormat, DocumentHandle};
use crate::core::error::DocumentError;
use crate::core::modify;
use crate::ui::drop_area::{DropArea, DropAreaAction};
use crate::ui::modify_form::ModifyForm;
use crate::ui::overview::OverviewPanel;
use crate::ui::theme;

/// A message window raised by a finished or failed operation.
struct Message {
    title: String,
    text: String,
}

/// Main application state
pub struct AdjusterApp {
    /// Application configuration
    pub config: AppConfig,
    /// The single active document, if one is loaded
    document: Option<DocumentHandle>,
    /// Modification form state, seeded from the active document
    form: ModifyForm,
    /// Status bar text
    status: String,
    /// Pending message window
    message: Option<Message>,
    /// Where the last successful apply was saved
    last_output: Option<PathBuf>,
}

impl AdjusterApp {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = AppConfig::load().unwrap_or_default();
        theme::apply(&cc.egui_ctx, config.theme);

        Self {
            config,
            document: None,
            form: ModifyForm::default(),
            status: "Drop a document to begin".to_string(),
            message: None,
            last_output: None,
        }
    }

    /// Load a document and make it the active one. Failure keeps whatever
    /// was loaded before.
    pub fn open_document(&mut self, path: &Path) {
        match DocumentHandle::load(path) {
            Ok(handle) => {
                let summary = handle.describe();
                self.form.seed(&summary);
                self.status = format!("Loaded {}", summary.file_name);
                self.document = Some(handle);
                self.last_output = None;

                self.config.add_recent_file(path.to_path_buf());
                if let Err(e) = self.config.save() {
                    tracing::warn!("Failed to save config: {e}");
                }
            }
            Err(e) => self.report_error("Could not open document", &e),
        }
    }

    /// Validate the form, apply it in memory, and save the modified copy.
    fn apply_modifications(&mut self) {
        let Some(ref mut handle) = self.document else {
            return;
        };

        let request = self.form.build_request();
        if request.is_empty() {
            self.status = "No changes to apply".to_string();
            return;
        }

        let result = request
            .validate(&handle.props)
            .and_then(|validated| modify::apply(handle, &validated))
            .and_then(|()| {
                let output = handle.default_output_path();
                handle.save(&output).map(|()| output)
            });

        match result {
            Ok(output) => {
                self.status = format!("Saved to {}", output.display());
                self.message = Some(Message {
                    title: "Success".to_string(),
                    text: format!("Document modified and saved to:\n{}", output.display()),
                });
                self.last_output = Some(output);
            }
            Err(e) => self.report_error("Could not apply modifications", &e),
        }
    }

    fn report_error(&mut self, title: &str, error: &DocumentError) {
        tracing::error!(kind = error.kind(), "{title}: {error}");
        self.status = format!("{}: {error}", error.kind());
        self.message = Some(Message {
            title: title.to_string(),
            text: error.to_string(),
        });
    }

    /// Route a dropped file: unsupported extensions are rejected with a
    /// message instead of a load attempt.
    fn handle_dropped_file(&mut self, path: PathBuf) {
        if DocumentFormat::from_path(&path).is_none() {
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().to_string())
                .unwrap_or_default();
            self.report_error("Invalid file", &DocumentError::UnsupportedFormat(ext));
            return;
        }
        self.open_document(&path);
    }

    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Word Documents", &["docx"])
            .add_filter("RTF Documents", &["rtf"])
            .pick_file()
        {
            self.open_document(&path);
        }
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Document\u{2026}").clicked() {
                        self.open_file_dialog();
                        ui.close();
                    }

                    let recent: Vec<PathBuf> = self.config.recent_files.clone();
                    ui.menu_button("Open Recent", |ui| {
                        if recent.is_empty() {
                            ui.label("(empty)");
                        }
                        for path in recent {
                            if ui.button(path.display().to_string()).clicked() {
                                self.open_document(&path);
                                ui.close();
                            }
                        }
                    });

                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Toggle Theme").clicked() {
                        self.config.theme = self.config.theme.toggled();
                        theme::apply(ctx, self.config.theme);
                        if let Err(e) = self.config.save() {
                            tracing::warn!("Failed to save config: {e}");
                        }
                        ui.close();
                    }
                });
            });
        });
    }

    /// Render the bottom status bar
    fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                if let Some(output) = self.last_output.clone() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Show in folder").clicked() {
                            if let Some(dir) = output.parent() {
                                if let Err(e) = open::that(dir) {
                                    tracing::warn!("Failed to open folder: {e}");
                                }
                            }
                        }
                    });
                }
            });
        });
    }

    /// Render the pending message window, if any
    fn render_message(&mut self, ctx: &egui::Context) {
        let mut dismiss = false;
        if let Some(ref message) = self.message {
            egui::Window::new(&message.title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(&message.text);
                    ui.add_space(8.0);
                    ui.vertical_centered(|ui| {
                        if ui.button("OK").clicked() {
                            dismiss = true;
                        }
                    });
                });
        }
        if dismiss {
            self.message = None;
        }
    }
}

impl eframe::App for AdjusterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Files dropped anywhere on the window
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if let Some(path) = dropped.into_iter().next() {
            self.handle_dropped_file(path);
        }
        let hovering_file = ctx.input(|i| !i.raw.hovered_files.is_empty());

        // Keyboard shortcuts
        let open_requested = ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::O));
        if open_requested {
            self.open_file_dialog();
        }

        self.render_menu_bar(ctx);
        self.render_status_bar(ctx);

        let mut apply_requested = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            match self.document {
                Some(ref handle) => {
                    let summary = handle.describe();
                    let available_width = ui.available_width();
                    ui.horizontal(|ui| {
                        ui.set_min_width(available_width);

                        ui.vertical(|ui| {
                            ui.set_width(available_width * 0.45);
                            OverviewPanel::show(ui, &summary);
                        });

                        ui.separator();

                        ui.vertical(|ui| {
                            ui.set_width(available_width * 0.5);
                            // Block the form while a message is up
                            ui.add_enabled_ui(self.message.is_none(), |ui| {
                                if self.form.show(ui) {
                                    apply_requested = true;
                                }
                            });
                        });
                    });
                }
                None => {
                    if let Some(DropAreaAction::OpenFile(path)) =
                        DropArea::show(ui, hovering_file)
                    {
                        self.open_document(&path);
                    }
                }
            }
        });

        if apply_requested {
            self.apply_modifications();
        }

        self.render_message(ctx);
    }
}
