//! Document overview panel

use eframe::egui;

use crate::core::document::DocumentSummary;

/// Read-only overview of the loaded document's properties.
pub struct OverviewPanel;

impl OverviewPanel {
    pub fn show(ui: &mut egui::Ui, summary: &DocumentSummary) {
        ui.heading("Document Overview");
        ui.separator();

        egui::ScrollArea::vertical()
            .id_salt("overview_scroll")
            .show(ui, |ui| {
                egui::Grid::new("overview_grid")
                    .num_columns(2)
                    .spacing([12.0, 6.0])
                    .striped(true)
                    .show(ui, |ui| {
                        Self::row(ui, "File", &summary.file_name);
                        Self::row(ui, "Format", summary.format.label());
                        Self::row(
                            ui,
                            "Title",
                            summary.title.as_deref().unwrap_or("Untitled"),
                        );
                        Self::row(
                            ui,
                            "Author",
                            summary.author.as_deref().unwrap_or("Unknown"),
                        );
                        Self::row(
                            ui,
                            "Page size",
                            &format!(
                                "{:.2} \u{D7} {:.2} in",
                                summary.page_width_in, summary.page_height_in
                            ),
                        );
                        Self::row(
                            ui,
                            "Margins",
                            &format!(
                                "T {:.2} / B {:.2} / L {:.2} / R {:.2} in",
                                summary.margin_top_in,
                                summary.margin_bottom_in,
                                summary.margin_left_in,
                                summary.margin_right_in
                            ),
                        );
                        Self::row(
                            ui,
                            "Default font",
                            summary.font_family.as_deref().unwrap_or("(not set)"),
                        );
                        Self::row(
                            ui,
                            "Font size",
                            &summary
                                .font_size_pt
                                .map(|pt| format!("{pt:.1} pt"))
                                .unwrap_or_else(|| "(not set)".to_string()),
                        );
                        Self::row(
                            ui,
                            "Line spacing",
                            &summary
                                .line_spacing
                                .map(|s| format!("{s:.2}"))
                                .unwrap_or_else(|| "(not set)".to_string()),
                        );
                        Self::row(ui, "Paragraphs", &summary.paragraph_count.to_string());
                        Self::row(ui, "Words", &summary.word_count.to_string());
                        Self::row(ui, "Tables", &summary.table_count.to_string());
                    });

                if summary.heading_counts.iter().any(|&count| count > 0) {
                    ui.add_space(8.0);
                    ui.collapsing("Headings", |ui| {
                        for (i, &count) in summary.heading_counts.iter().enumerate() {
                            if count > 0 {
                                ui.label(format!("Heading {}: {count}", i + 1));
                            }
                        }
                    });
                }

                if !summary.fonts_used.is_empty() {
                    ui.add_space(8.0);
                    ui.collapsing("Fonts used", |ui| {
                        for font in &summary.fonts_used {
                            ui.label(font);
                        }
                    });
                }
            });
    }

    fn row(ui: &mut egui::Ui, label: &str, value: &str) {
        ui.label(egui::RichText::new(label).strong());
        ui.label(value);
        ui.end_row();
    }
}
