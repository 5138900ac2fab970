//! Modification form panel

use eframe::egui;

use crate::core::document::{inches_to_twips, DocumentSummary};
use crate::core::modify::{FontSpec, MarginsSpec, ModificationRequest, PageSize};

/// Page size dropdown choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum PageChoice {
    A4,
    #[default]
    Letter,
    Legal,
    Custom,
}

impl PageChoice {
    const ALL: [Self; 4] = [Self::A4, Self::Letter, Self::Legal, Self::Custom];

    fn label(&self) -> &'static str {
        match self {
            Self::A4 => "A4",
            Self::Letter => "Letter",
            Self::Legal => "Legal",
            Self::Custom => "Custom",
        }
    }
}

/// Line spacing dropdown choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SpacingChoice {
    #[default]
    Single,
    Relaxed,
    OneAndHalf,
    Double,
    Custom,
}

impl SpacingChoice {
    const ALL: [Self; 5] = [
        Self::Single,
        Self::Relaxed,
        Self::OneAndHalf,
        Self::Double,
        Self::Custom,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single (1.0)",
            Self::Relaxed => "1.15",
            Self::OneAndHalf => "1.5",
            Self::Double => "Double (2.0)",
            Self::Custom => "Custom",
        }
    }

    fn multiplier(&self, custom: f32) -> f32 {
        match self {
            Self::Single => 1.0,
            Self::Relaxed => 1.15,
            Self::OneAndHalf => 1.5,
            Self::Double => 2.0,
            Self::Custom => custom,
        }
    }

    fn from_multiplier(multiplier: f32) -> Self {
        for choice in [Self::Single, Self::Relaxed, Self::OneAndHalf, Self::Double] {
            if (choice.multiplier(0.0) - multiplier).abs() < 0.01 {
                return choice;
            }
        }
        Self::Custom
    }
}

/// The raw form values, kept twice: once editable, once as the snapshot
/// taken when the document was loaded. The request sent to the engine only
/// carries the fields that actually differ from the snapshot.
#[derive(Debug, Clone, PartialEq)]
struct FormValues {
    page: PageChoice,
    custom_width_in: f32,
    custom_height_in: f32,
    margin_top: f32,
    margin_bottom: f32,
    margin_left: f32,
    margin_right: f32,
    font_family: String,
    font_size_pt: f32,
    spacing: SpacingChoice,
    custom_spacing: f32,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            page: PageChoice::Letter,
            custom_width_in: 8.5,
            custom_height_in: 11.0,
            margin_top: 1.0,
            margin_bottom: 1.0,
            margin_left: 1.0,
            margin_right: 1.0,
            font_family: String::new(),
            font_size_pt: 12.0,
            spacing: SpacingChoice::Single,
            custom_spacing: 1.0,
        }
    }
}

/// Modification form state.
#[derive(Debug, Clone, Default)]
pub struct ModifyForm {
    values: FormValues,
    seeded: FormValues,
}

impl ModifyForm {
    /// Pre-fill the form from a freshly loaded document.
    pub fn seed(&mut self, summary: &DocumentSummary) {
        let mut values = FormValues::default();

        let width = inches_to_twips(summary.page_width_in);
        let height = inches_to_twips(summary.page_height_in);
        values.page = match PageSize::from_dimensions(width, height) {
            PageSize::A4 => PageChoice::A4,
            PageSize::Letter => PageChoice::Letter,
            PageSize::Legal => PageChoice::Legal,
            PageSize::Custom { .. } => PageChoice::Custom,
        };
        values.custom_width_in = summary.page_width_in;
        values.custom_height_in = summary.page_height_in;

        values.margin_top = summary.margin_top_in;
        values.margin_bottom = summary.margin_bottom_in;
        values.margin_left = summary.margin_left_in;
        values.margin_right = summary.margin_right_in;

        values.font_family = summary.font_family.clone().unwrap_or_default();
        values.font_size_pt = summary.font_size_pt.unwrap_or(12.0);

        if let Some(spacing) = summary.line_spacing {
            values.spacing = SpacingChoice::from_multiplier(spacing);
            values.custom_spacing = spacing;
        }

        self.seeded = values.clone();
        self.values = values;
    }

    /// Build a partial-update request from the fields the user changed.
    pub fn build_request(&self) -> ModificationRequest {
        let v = &self.values;
        let s = &self.seeded;
        let mut request = ModificationRequest::default();

        let page_changed = v.page != s.page
            || (v.page == PageChoice::Custom
                && (differs(v.custom_width_in, s.custom_width_in)
                    || differs(v.custom_height_in, s.custom_height_in)));
        if page_changed {
            request.page_size = Some(match v.page {
                PageChoice::A4 => PageSize::A4,
                PageChoice::Letter => PageSize::Letter,
                PageChoice::Legal => PageSize::Legal,
                PageChoice::Custom => PageSize::Custom {
                    width_in: v.custom_width_in,
                    height_in: v.custom_height_in,
                },
            });
        }

        let margins = MarginsSpec {
            top: differs(v.margin_top, s.margin_top).then_some(v.margin_top),
            bottom: differs(v.margin_bottom, s.margin_bottom).then_some(v.margin_bottom),
            left: differs(v.margin_left, s.margin_left).then_some(v.margin_left),
            right: differs(v.margin_right, s.margin_right).then_some(v.margin_right),
        };
        if margins != MarginsSpec::default() {
            request.margins = Some(margins);
        }

        let family_changed = v.font_family.trim() != s.font_family.trim();
        let size_changed = differs(v.font_size_pt, s.font_size_pt);
        if (family_changed && !v.font_family.trim().is_empty()) || size_changed {
            request.font = Some(FontSpec {
                family: (family_changed && !v.font_family.trim().is_empty())
                    .then(|| v.font_family.trim().to_string()),
                size_pt: size_changed.then_some(v.font_size_pt),
            });
        }

        let spacing = v.spacing.multiplier(v.custom_spacing);
        if differs(spacing, s.spacing.multiplier(s.custom_spacing)) {
            request.line_spacing = Some(spacing);
        }

        request
    }

    /// Render the form. Returns true when Apply was clicked.
    pub fn show(&mut self, ui: &mut egui::Ui) -> bool {
        let mut apply_clicked = false;

        ui.heading("Modifications");
        ui.separator();

        egui::ScrollArea::vertical()
            .id_salt("modify_form_scroll")
            .show(ui, |ui| {
                self.show_page_group(ui);
                self.show_margins_group(ui);
                self.show_font_group(ui);
                self.show_spacing_group(ui);
            });

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("Apply Modifications").clicked() {
                apply_clicked = true;
            }
            if ui.button("Reset").clicked() {
                self.values = self.seeded.clone();
            }
        });

        apply_clicked
    }

    fn show_page_group(&mut self, ui: &mut egui::Ui) {
        let v = &mut self.values;
        ui.group(|ui| {
            ui.label(egui::RichText::new("Page Size").strong());
            egui::ComboBox::from_id_salt("page_size")
                .selected_text(v.page.label())
                .show_ui(ui, |ui| {
                    for choice in PageChoice::ALL {
                        ui.selectable_value(&mut v.page, choice, choice.label());
                    }
                });

            if v.page == PageChoice::Custom {
                ui.horizontal(|ui| {
                    ui.label("Width:");
                    ui.add(
                        egui::DragValue::new(&mut v.custom_width_in)
                            .range(1.0..=30.0)
                            .speed(0.05)
                            .suffix(" in"),
                    );
                    ui.label("Height:");
                    ui.add(
                        egui::DragValue::new(&mut v.custom_height_in)
                            .range(1.0..=30.0)
                            .speed(0.05)
                            .suffix(" in"),
                    );
                });
            }
        });
    }

    fn show_margins_group(&mut self, ui: &mut egui::Ui) {
        let v = &mut self.values;
        ui.group(|ui| {
            ui.label(egui::RichText::new("Margins").strong());
            egui::Grid::new("margins_grid")
                .num_columns(4)
                .show(ui, |ui| {
                    ui.label("Top:");
                    ui.add(margin_drag(&mut v.margin_top));
                    ui.label("Bottom:");
                    ui.add(margin_drag(&mut v.margin_bottom));
                    ui.end_row();
                    ui.label("Left:");
                    ui.add(margin_drag(&mut v.margin_left));
                    ui.label("Right:");
                    ui.add(margin_drag(&mut v.margin_right));
                    ui.end_row();
                });
        });
    }

    fn show_font_group(&mut self, ui: &mut egui::Ui) {
        let v = &mut self.values;
        ui.group(|ui| {
            ui.label(egui::RichText::new("Font").strong());
            ui.horizontal(|ui| {
                ui.label("Family:");
                ui.text_edit_singleline(&mut v.font_family);
            });
            ui.horizontal(|ui| {
                ui.label("Size:");
                ui.add(
                    egui::DragValue::new(&mut v.font_size_pt)
                        .range(6.0..=72.0)
                        .speed(0.5)
                        .suffix(" pt"),
                );
            });
        });
    }

    fn show_spacing_group(&mut self, ui: &mut egui::Ui) {
        let v = &mut self.values;
        ui.group(|ui| {
            ui.label(egui::RichText::new("Line Spacing").strong());
            egui::ComboBox::from_id_salt("line_spacing")
                .selected_text(v.spacing.label())
                .show_ui(ui, |ui| {
                    for choice in SpacingChoice::ALL {
                        ui.selectable_value(&mut v.spacing, choice, choice.label());
                    }
                });

            if v.spacing == SpacingChoice::Custom {
                ui.horizontal(|ui| {
                    ui.label("Multiplier:");
                    ui.add(
                        egui::DragValue::new(&mut v.custom_spacing)
                            .range(0.25..=10.0)
                            .speed(0.05),
                    );
                });
            }
        });
    }
}

fn margin_drag(value: &mut f32) -> egui::DragValue<'_> {
    egui::DragValue::new(value)
        .range(0.0..=5.0)
        .speed(0.05)
        .suffix(" in")
}

fn differs(a: f32, b: f32) -> bool {
    (a - b).abs() > 0.005
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::DocumentFormat;

    fn summary() -> DocumentSummary {
        DocumentSummary {
            file_name: "report.docx".to_string(),
            format: DocumentFormat::Docx,
            title: None,
            author: None,
            page_width_in: 8.5,
            page_height_in: 11.0,
            margin_top_in: 1.0,
            margin_bottom_in: 1.0,
            margin_left_in: 1.0,
            margin_right_in: 1.0,
            font_family: Some("Calibri".to_string()),
            font_size_pt: Some(12.0),
            line_spacing: Some(1.0),
            paragraph_count: 3,
            word_count: 40,
            table_count: 0,
            heading_counts: [0; 6],
            fonts_used: vec!["Calibri".to_string()],
        }
    }

    #[test]
    fn test_untouched_form_builds_empty_request() {
        let mut form = ModifyForm::default();
        form.seed(&summary());
        assert!(form.build_request().is_empty());
    }

    #[test]
    fn test_changed_fields_appear_in_request() {
        let mut form = ModifyForm::default();
        form.seed(&summary());

        form.values.page = PageChoice::A4;
        form.values.margin_left = 0.5;
        form.values.spacing = SpacingChoice::Double;

        let request = form.build_request();
        assert_eq!(request.page_size, Some(PageSize::A4));
        let margins = request.margins.unwrap();
        assert_eq!(margins.left, Some(0.5));
        assert_eq!(margins.top, None);
        assert!(request.font.is_none());
        assert_eq!(request.line_spacing, Some(2.0));
    }

    #[test]
    fn test_spacing_preset_detection() {
        assert_eq!(SpacingChoice::from_multiplier(1.0), SpacingChoice::Single);
        assert_eq!(SpacingChoice::from_multiplier(1.15), SpacingChoice::Relaxed);
        assert_eq!(SpacingChoice::from_multiplier(2.0), SpacingChoice::Double);
        assert_eq!(SpacingChoice::from_multiplier(1.37), SpacingChoice::Custom);
    }
}
