use eframe::egui;

use crate::state::{AppState, View};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HeatmapApp {
    pub title: String,
    pub state: AppState,
}

impl HeatmapApp {
    pub fn new(title: String, state: AppState) -> Self {
        Self { title, state }
    }
}

impl eframe::App for HeatmapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: status line ----
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            panels::status_bar(ui, &self.state);
        });

        // ---- Left side panel: metric, scale and gene selectors ----
        egui::SidePanel::left("selection_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // Recompute after any widget change this frame.
        self.state.refresh();

        // ---- Central panel: heatmap or table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&self.title);
            match self.state.view {
                View::Heatmap => plot::heatmap_plot(ui, &self.state),
                View::Table => table::data_table(ui, &self.state),
            }
        });
    }
}
