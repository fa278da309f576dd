//! Retail Insights Main Application
//! Main window with the filter panel and the report view.

use crate::gui::{ControlPanel, ControlPanelAction, ReportView};
use egui::SidePanel;
use retail_insights::charts::StaticChartRenderer;
use retail_insights::config::AppConfig;
use retail_insights::data::{self, Dataset, DatasetCache};
use retail_insights::report::DashboardReport;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use tracing::{error, warn};

/// CSV loading result from background thread
enum LoadResult {
    Complete { path: PathBuf, dataset: Dataset },
    Error(String),
}

/// Main application window.
pub struct RetailInsightsApp {
    config: AppConfig,
    cache: DatasetCache,
    control_panel: ControlPanel,
    report_view: ReportView,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl RetailInsightsApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let mut app = Self {
            report_view: ReportView::new(config.top_n),
            cache: DatasetCache::new(),
            control_panel: ControlPanel::new(),
            load_rx: None,
            is_loading: false,
            config,
        };
        let source = app.config.source_path.clone();
        app.start_load(source, false);
        app
    }

    /// Show the dataset for `path`, loading it in the background unless cached.
    fn start_load(&mut self, path: PathBuf, force: bool) {
        if self.is_loading {
            return;
        }
        self.control_panel.settings.csv_path = Some(path.clone());

        if !force {
            if let Some(dataset) = self.cache.cached(&path) {
                self.apply_dataset(dataset);
                return;
            }
        }

        self.control_panel.set_status("Loading CSV file...");
        self.is_loading = true;
        self.control_panel.is_busy = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        // Load CSV in background thread
        thread::spawn(move || {
            let result = match data::load(&path) {
                Ok(dataset) => LoadResult::Complete { path, dataset },
                Err(e) => LoadResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete { path, dataset }) => {
                let dataset = Arc::new(dataset);
                self.cache.insert(&path, Arc::clone(&dataset));
                self.finish_loading();
                self.apply_dataset(dataset);
            }
            Ok(LoadResult::Error(message)) => {
                error!(%message, "dataset load failed");
                self.finish_loading();
                self.control_panel.set_status(&format!("Error: {}", message));
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.finish_loading();
                self.control_panel.set_status("Error: loader stopped unexpectedly");
            }
        }
    }

    fn finish_loading(&mut self) {
        self.is_loading = false;
        self.control_panel.is_busy = false;
    }

    fn apply_dataset(&mut self, dataset: Arc<Dataset>) {
        self.control_panel.update_dataset(&dataset);
        self.control_panel.set_status(&format!(
            "Loaded {} transactions, {} countries",
            dataset.len(),
            dataset.countries().len()
        ));
        self.refresh_report();
    }

    /// Recompute the report for the current filter inputs.
    fn refresh_report(&mut self) {
        let Some(dataset) = self.cache.current() else {
            self.report_view.clear();
            self.control_panel.export_enabled = false;
            return;
        };

        let criteria = match self.control_panel.criteria() {
            Ok(criteria) => criteria,
            Err(message) => {
                self.control_panel.reject_selection(message);
                self.report_view.clear();
                return;
            }
        };

        match DashboardReport::build(&dataset, &criteria, self.config.top_n) {
            Ok(report) => {
                self.control_panel.validation = None;
                self.control_panel.export_enabled = true;
                self.report_view.set_report(report);
            }
            Err(e) if e.is_invalid_filter() => {
                self.control_panel.reject_selection(e.to_string());
                self.report_view.clear();
            }
            Err(e) => {
                error!(error = %e, "report computation failed");
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_load(path, false);
        }
    }

    fn handle_reload(&mut self) {
        let path = self
            .control_panel
            .settings
            .csv_path
            .clone()
            .unwrap_or_else(|| self.config.source_path.clone());
        self.start_load(path, true);
    }

    /// Handle chart export - render the ranking to PNG and open it
    fn handle_export_chart(&mut self) {
        let Some(report) = &self.report_view.report else {
            self.control_panel.set_status("No chart to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("top_products.png")
            .save_file()
        else {
            return; // User cancelled
        };

        let (width, height) = self.config.chart_export_size;
        let title = report.chart_title(self.config.top_n);
        let status = match StaticChartRenderer::save_top_products_png(
            &path,
            &title,
            &report.top_products,
            width,
            height,
        ) {
            Ok(()) => {
                open_exported(&path);
                format!("Exported chart to {}", path.display())
            }
            Err(e) => {
                warn!(error = %e, "chart export failed");
                format!("Error: {}", e)
            }
        };
        self.control_panel.set_status(&status);
    }

    /// Handle report export - write the current selection as JSON and open it
    fn handle_export_report(&mut self) {
        let Some(report) = &self.report_view.report else {
            self.control_panel.set_status("No report to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("sales_report.json")
            .save_file()
        else {
            return; // User cancelled
        };

        let status = match report.write_json(&path) {
            Ok(()) => {
                open_exported(&path);
                format!("Exported report to {}", path.display())
            }
            Err(e) => {
                warn!(error = %e, "report export failed");
                format!("Error: {}", e)
            }
        };
        self.control_panel.set_status(&status);
    }
}

fn open_exported(path: &Path) {
    if let Err(e) = open::that(path) {
        warn!(path = %path.display(), error = %e, "could not open exported file");
    }
}

impl eframe::App for RetailInsightsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::FilterChanged => self.refresh_report(),
                        ControlPanelAction::ExportChart => self.handle_export_chart(),
                        ControlPanelAction::ExportReport => self.handle_export_report(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Report View
        egui::CentralPanel::default().show(ctx, |ui| {
            self.report_view.show(ui);
        });
    }
}
