//! Control Panel Widget
//! Left side panel with data source, filter and export controls.

use chrono::NaiveDate;
use egui::{Color32, ComboBox, RichText};
use retail_insights::data::{Dataset, FilterCriteria};
use std::path::PathBuf;

const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Sidebar filter selection
#[derive(Default, Clone)]
pub struct UserSettings {
    pub csv_path: Option<PathBuf>,
    pub country: String,
    pub start_text: String,
    pub end_text: String,
}

/// Left side control panel with file selection and filter controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub countries: Vec<String>,
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
    pub validation: Option<String>,
    pub status: String,
    pub is_busy: bool,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            countries: Vec::new(),
            date_bounds: None,
            validation: None,
            status: "Ready".to_string(),
            is_busy: false,
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the filter inputs for a freshly loaded dataset.
    ///
    /// Keeps the selected country when the new dataset also has it.
    pub fn update_dataset(&mut self, dataset: &Dataset) {
        self.countries = dataset.countries().to_vec();
        if !dataset.has_country(&self.settings.country) {
            self.settings.country = self.countries.first().cloned().unwrap_or_default();
        }

        self.date_bounds = dataset.date_range();
        if let Some((start, end)) = self.date_bounds {
            self.settings.start_text = start.format(DATE_INPUT_FORMAT).to_string();
            self.settings.end_text = end.format(DATE_INPUT_FORMAT).to_string();
        }
        self.validation = None;
    }

    /// Criteria from the current inputs, or a message for the user.
    pub fn criteria(&self) -> Result<FilterCriteria, String> {
        if self.settings.country.is_empty() {
            return Err("Select a country".to_string());
        }
        let start = parse_date_input(&self.settings.start_text, "Start date")?;
        let end = parse_date_input(&self.settings.end_text, "End date")?;
        Ok(FilterCriteria::new(self.settings.country.clone(), start, end))
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🧴 Online Sales")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("Insights Dashboard").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let path_text = self
                    .settings
                    .csv_path
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "No file selected".to_string());

                let path_color = if self.settings.csv_path.is_some() {
                    ui.visuals().text_color()
                } else {
                    Color32::GRAY
                };
                ui.label(RichText::new(&path_text).size(12.0).color(path_color));

                ui.add_enabled_ui(!self.is_busy, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                        if ui.button("🔄 Reload").clicked() {
                            action = ControlPanelAction::Reload;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filter Section =====
        ui.label(RichText::new("🔍 Filter Options").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 90.0;
        let input_width = 170.0;

        ui.add_enabled_ui(!self.countries.is_empty(), |ui| {
            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Country:"));
                ComboBox::from_id_salt("country")
                    .width(input_width)
                    .selected_text(&self.settings.country)
                    .show_ui(ui, |ui| {
                        for country in &self.countries {
                            if ui
                                .selectable_label(self.settings.country == *country, country)
                                .clicked()
                                && self.settings.country != *country
                            {
                                self.settings.country = country.clone();
                                action = ControlPanelAction::FilterChanged;
                            }
                        }
                    });
            });

            ui.add_space(5.0);

            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Start date:"));
                let response = ui.add_sized(
                    [input_width, 20.0],
                    egui::TextEdit::singleline(&mut self.settings.start_text),
                );
                if response.changed() {
                    action = ControlPanelAction::FilterChanged;
                }
            });

            ui.add_space(5.0);

            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("End date:"));
                let response = ui.add_sized(
                    [input_width, 20.0],
                    egui::TextEdit::singleline(&mut self.settings.end_text),
                );
                if response.changed() {
                    action = ControlPanelAction::FilterChanged;
                }
            });

            if let Some((min, max)) = self.date_bounds {
                ui.label(
                    RichText::new(format!("Data covers {} to {}", min, max))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
                if ui.small_button("Full range").clicked() {
                    self.settings.start_text = min.format(DATE_INPUT_FORMAT).to_string();
                    self.settings.end_text = max.format(DATE_INPUT_FORMAT).to_string();
                    action = ControlPanelAction::FilterChanged;
                }
            }
        });

        if let Some(message) = &self.validation {
            ui.add_space(5.0);
            ui.label(
                RichText::new(format!("⚠ {}", message))
                    .size(12.0)
                    .color(Color32::from_rgb(220, 53, 69)),
            );
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let chart_button = egui::Button::new(RichText::new("🖼 Export Chart (PNG)").size(14.0))
                    .min_size(egui::vec2(200.0, 30.0));
                if ui.add(chart_button).clicked() {
                    action = ControlPanelAction::ExportChart;
                }

                ui.add_space(8.0);

                let report_button =
                    egui::Button::new(RichText::new("📄 Export Report (JSON)").size(14.0))
                        .min_size(egui::vec2(200.0, 30.0));
                if ui.add(report_button).clicked() {
                    action = ControlPanelAction::ExportReport;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.horizontal(|ui| {
            if self.is_busy {
                ui.spinner();
            }
            let status_color = if self.status.starts_with("Error") {
                Color32::from_rgb(220, 53, 69)
            } else if self.status.starts_with("Loaded") || self.status.starts_with("Exported") {
                Color32::from_rgb(40, 167, 69)
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(&self.status).size(11.0).color(status_color));
        });

        action
    }

    /// Show a validation message; exports stay off until the selection is valid.
    pub fn reject_selection(&mut self, message: String) {
        self.validation = Some(message);
        self.export_enabled = false;
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

fn parse_date_input(text: &str, label: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text.trim(), DATE_INPUT_FORMAT)
        .map_err(|_| format!("{} must be YYYY-MM-DD", label))
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    Reload,
    FilterChanged,
    ExportChart,
    ExportReport,
}
