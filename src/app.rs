use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{dashboard, panels, products};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalesDashApp {
    pub state: AppState,
}

impl Default for SalesDashApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for SalesDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tabbed dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a sales export to begin  (File → Open…)");
                });
                return;
            }

            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.state.tab, Tab::Dashboard, "Sales Dashboard");
                ui.selectable_value(&mut self.state.tab, Tab::Products, "Product Analysis");
            });
            ui.separator();

            match self.state.tab {
                Tab::Dashboard => dashboard::sales_trend(ui, &self.state),
                Tab::Products => products::product_analysis(ui, &self.state),
            }
        });
    }
}
