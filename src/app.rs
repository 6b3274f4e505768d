use eframe::egui::{self, ScrollArea, Ui};

use crate::color::{self, ColorMap};
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AnimeDashboardApp {
    pub state: AppState,
    type_colors: ColorMap,
}

impl AnimeDashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = color::BACKGROUND;
        visuals.window_fill = color::BACKGROUND;
        cc.egui_ctx.set_visuals(visuals);

        let type_colors = ColorMap::new(state.views.type_shares.iter().map(|s| s.label.as_str()));
        Self { state, type_colors }
    }
}

impl eframe::App for AnimeDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title ----
        egui::TopBottomPanel::top("title_bar").show(ctx, |ui: &mut Ui| {
            panels::title_bar(ui, &self.state);
        });

        // ---- Central panel: scrolling chart grid ----
        egui::CentralPanel::default().show(ctx, |ui: &mut Ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    panels::overview_row(ui, &self.state, &self.type_colors);
                    ui.add_space(15.0);
                    panels::ratings_row(ui, &self.state);
                    ui.add_space(15.0);
                    panels::genre_panel(ui, &mut self.state);
                    ui.add_space(15.0);
                    panels::detail_tabs(ui, &mut self.state);
                });
        });
    }
}
