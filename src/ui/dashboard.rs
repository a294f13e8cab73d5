use eframe::egui::{RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::state::AppState;
use crate::ui::{thousands, tick_label};

// ---------------------------------------------------------------------------
// Tab 1 – monthly sales trend
// ---------------------------------------------------------------------------

/// Render the sales-trend tab: scorecard row plus the monthly value/profit
/// chart with its AOV companion.
pub fn sales_trend(ui: &mut Ui, state: &AppState) {
    ui.heading("Sales Trend (Monthly)");

    if state.trend.is_empty() {
        ui.label("No data available for selected filters.");
        return;
    }
    let Some(overview) = &state.overview else {
        return;
    };

    // ---- Scorecards for the filtered period ----
    ui.columns(5, |cols| {
        scorecard(&mut cols[0], "Before Discount (Total)", thousands(overview.before_discount));
        scorecard(
            &mut cols[1],
            "After Discount (Est.)",
            overview
                .after_discount
                .map(thousands)
                .unwrap_or_else(|| "N/A".to_string()),
        );
        scorecard(&mut cols[2], "Net Profit (Total)", thousands(overview.net_profit));
        scorecard(&mut cols[3], "Total Quantity", thousands(overview.qty_ordered));
        scorecard(&mut cols[4], "Unique Orders", thousands(overview.unique_orders as f64));
    });
    ui.separator();

    // ---- Value sales & net profit per month ----
    let months: Vec<String> = state.trend.iter().map(|b| b.month.clone()).collect();
    let value_points: PlotPoints = state
        .trend
        .iter()
        .enumerate()
        .map(|(i, b)| [i as f64, b.before_discount])
        .collect();
    let profit_points: PlotPoints = state
        .trend
        .iter()
        .enumerate()
        .map(|(i, b)| [i as f64, b.net_profit])
        .collect();

    let month_labels = months.clone();
    let available = ui.available_height();
    Plot::new("monthly_trend")
        .legend(Legend::default())
        .height((available * 0.6).max(200.0))
        .x_axis_label("Month (YYYY-MM)")
        .y_axis_label("Value (currency)")
        .x_axis_formatter(move |mark, _range| tick_label(&month_labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(value_points).name("Value Sales (before_discount)").width(1.5));
            plot_ui.line(Line::new(profit_points).name("Net Profit").width(1.5));
        });

    // AOV lives on its own scale, so it gets a companion plot instead of
    // sharing an axis with raw sales values. NaN buckets leave a gap.
    let aov_points: PlotPoints = state
        .trend
        .iter()
        .enumerate()
        .filter(|(_, b)| !b.aov.is_nan())
        .map(|(i, b)| [i as f64, b.aov])
        .collect();
    let month_labels = months;
    Plot::new("monthly_aov")
        .legend(Legend::default())
        .height(140.0)
        .y_axis_label("AOV (currency)")
        .x_axis_formatter(move |mark, _range| tick_label(&month_labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(aov_points).name("AOV").width(1.5));
        });
}

fn scorecard(ui: &mut Ui, title: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(title).small().weak());
        ui.label(RichText::new(value).heading());
    });
}
