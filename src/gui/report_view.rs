//! Report View Widget
//! Central scrollable panel: overview metrics, top-products chart,
//! product sales table and the ROPA reference table.

use egui::{Color32, RichText, ScrollArea};
use egui_plot::{Bar, BarChart, Plot};
use retail_insights::report::{format_currency, DashboardReport};
use retail_insights::ropa::ROPA_COLUMNS;

const BAR_COLOR: Color32 = Color32::from_rgb(31, 119, 180);
const CHART_HEIGHT: f32 = 320.0;
const SECTION_SPACING: f32 = 18.0;

/// Read-only presentation of the latest `DashboardReport`.
pub struct ReportView {
    pub report: Option<DashboardReport>,
    pub top_n: usize,
}

impl ReportView {
    pub fn new(top_n: usize) -> Self {
        Self { report: None, top_n }
    }

    pub fn set_report(&mut self, report: DashboardReport) {
        self.report = Some(report);
    }

    pub fn clear(&mut self) {
        self.report = None;
    }

    /// Draw the dashboard body
    pub fn show(&self, ui: &mut egui::Ui) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new("🧴 Online Sales Insights Dashboard").size(26.0));
                ui.label(
                    "Explore top-selling products by country and time period. \
                     Great for identifying product trends and marketing opportunities.",
                );
                ui.add_space(SECTION_SPACING);

                let Some(report) = &self.report else {
                    ui.centered_and_justified(|ui| {
                        ui.label(RichText::new("No Data").size(20.0));
                    });
                    return;
                };

                Self::draw_overview(ui, report);
                ui.add_space(SECTION_SPACING);

                ui.label(
                    RichText::new(format!("🏆 {}", report.chart_title(self.top_n)))
                        .size(18.0)
                        .strong(),
                );
                if report.top_products.is_empty() {
                    ui.label(RichText::new("No sales in the selected period").color(Color32::GRAY));
                } else {
                    Self::draw_top_products_chart(ui, report);
                }
                ui.add_space(SECTION_SPACING);

                ui.label(RichText::new("📋 Product Sales Table").size(18.0).strong());
                Self::draw_product_table(ui, report);
                ui.add_space(SECTION_SPACING);

                ui.label(
                    RichText::new("🔐 Record of Processing Activities (ROPA) – Example")
                        .size(18.0)
                        .strong(),
                );
                Self::draw_ropa_table(ui, report);
                ui.add_space(SECTION_SPACING);

                ui.separator();
                ui.label(
                    RichText::new("📊 Data: UCI Online Retail")
                        .size(11.0)
                        .color(Color32::GRAY),
                );
            });
    }

    fn draw_overview(ui: &mut egui::Ui, report: &DashboardReport) {
        ui.label(RichText::new("📈 Overview").size(18.0).strong());
        ui.add_space(6.0);
        ui.columns(2, |columns| {
            Self::draw_metric(
                &mut columns[0],
                "Total Transactions",
                &report.summary.count.to_string(),
            );
            Self::draw_metric(
                &mut columns[1],
                "Total Sales",
                &format_currency(report.summary.total_sales),
            );
        });
    }

    fn draw_metric(ui: &mut egui::Ui, label: &str, value: &str) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(label).size(13.0).color(Color32::GRAY));
                ui.label(RichText::new(value).size(28.0).strong());
            });
    }

    /// Bar per product; X axis labelled with product names.
    fn draw_top_products_chart(ui: &mut egui::Ui, report: &DashboardReport) {
        let labels: Vec<String> = report
            .top_products
            .iter()
            .map(|p| p.description.clone())
            .collect();

        let bars: Vec<Bar> = report
            .top_products
            .iter()
            .enumerate()
            .map(|(i, p)| {
                Bar::new(i as f64, p.sales)
                    .width(0.6)
                    .name(&p.description)
                    .fill(BAR_COLOR)
            })
            .collect();

        Plot::new("top_products_chart")
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .y_axis_label("Sales")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR).name("Sales"));
            });
    }

    fn draw_product_table(ui: &mut egui::Ui, report: &DashboardReport) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("product_sales_table")
                    .striped(true)
                    .min_col_width(80.0)
                    .spacing([24.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Product").strong());
                        ui.label(RichText::new("Sales").strong());
                        ui.end_row();

                        for product in &report.top_products {
                            ui.label(&product.description);
                            ui.label(format!("{:.2}", product.sales));
                            ui.end_row();
                        }
                    });
            });
    }

    fn draw_ropa_table(ui: &mut egui::Ui, report: &DashboardReport) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("ropa_table")
                    .striped(true)
                    .min_col_width(80.0)
                    .spacing([24.0, 4.0])
                    .show(ui, |ui| {
                        for header in ROPA_COLUMNS {
                            ui.label(RichText::new(header).strong());
                        }
                        ui.end_row();

                        for entry in report.ropa {
                            for cell in entry.cells() {
                                ui.label(cell);
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}
