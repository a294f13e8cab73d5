mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::SalesDashApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    // Optional path argument; otherwise start empty and use File → Open.
    let initial: Option<PathBuf> = std::env::args().nth(1).map(PathBuf::from);

    eframe::run_native(
        "SalesDash – Sales Dashboard",
        options,
        Box::new(move |_cc| {
            let mut app = SalesDashApp::default();
            if let Some(path) = initial {
                app.state.open_source(path);
            }
            Ok(Box::new(app))
        }),
    )
}
