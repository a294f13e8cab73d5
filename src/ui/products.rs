use eframe::egui::{RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::CategoryColors;
use crate::state::AppState;
use crate::ui::{thousands, tick_label};

// ---------------------------------------------------------------------------
// Tab 2 – product-level analysis
// ---------------------------------------------------------------------------

/// Render the product-analysis tab: scorecards, product table, category
/// bar chart and the mobile/tablet payment-provider segment.
pub fn product_analysis(ui: &mut Ui, state: &AppState) {
    ui.heading("Product-level Summary");

    if state.rollup.is_empty() {
        ui.label("No data available for selected filters.");
        return;
    }
    let Some(overview) = &state.overview else {
        return;
    };

    // ---- KPI scorecards ----
    ui.columns(5, |cols| {
        scorecard(&mut cols[0], "Total Before Discount", thousands(overview.before_discount));
        scorecard(
            &mut cols[1],
            "Total After Discount",
            overview
                .after_discount
                .map(thousands)
                .unwrap_or_else(|| "N/A".to_string()),
        );
        scorecard(&mut cols[2], "Total Net Profit", thousands(overview.net_profit));
        scorecard(&mut cols[3], "Total Quantity", thousands(overview.qty_ordered));
        scorecard(&mut cols[4], "AOV (overall)", format_aov(overview.aov));
    });
    ui.separator();

    ScrollArea::vertical().show(ui, |ui: &mut Ui| {
        let colors = state
            .dataset
            .as_ref()
            .map(|ds| CategoryColors::new(&ds.categories))
            .unwrap_or_default();

        product_table(ui, state, &colors);
        ui.separator();
        category_chart(ui, state, &colors);
        ui.separator();
        segment_panel(ui, state);
    });
}

fn scorecard(ui: &mut Ui, title: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(title).small().weak());
        ui.label(RichText::new(value).heading());
    });
}

fn format_aov(aov: f64) -> String {
    if aov.is_nan() {
        "N/A".to_string()
    } else {
        format!("{aov:.2}")
    }
}

// ---------------------------------------------------------------------------
// Product table – descending by pre-discount sales
// ---------------------------------------------------------------------------

fn product_table(ui: &mut Ui, state: &AppState, colors: &CategoryColors) {
    ui.strong("Top Products");
    // The surrounding panel scrolls; the table itself must not.
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(160.0))
        .column(Column::auto().at_least(90.0))
        .columns(Column::auto().at_least(80.0), 5)
        .header(20.0, |mut header| {
            for title in [
                "Product Name",
                "Category",
                "Before Discount",
                "After Discount",
                "Net Profit",
                "Qty",
                "Unique Customers",
            ] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for r in &state.rollup {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&r.sku_name);
                    });
                    row.col(|ui| {
                        ui.label(RichText::new(&r.category).color(colors.color_for(&r.category)));
                    });
                    row.col(|ui| {
                        ui.label(thousands(r.before_discount));
                    });
                    row.col(|ui| {
                        ui.label(thousands(r.after_discount));
                    });
                    row.col(|ui| {
                        ui.label(thousands(r.net_profit));
                    });
                    row.col(|ui| {
                        ui.label(thousands(r.qty_ordered));
                    });
                    row.col(|ui| {
                        ui.label(thousands(r.unique_customers as f64));
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Category bar chart
// ---------------------------------------------------------------------------

fn category_chart(ui: &mut Ui, state: &AppState, colors: &CategoryColors) {
    ui.strong("Sales by Category (filtered)");

    let bars: Vec<Bar> = state
        .category_totals
        .iter()
        .enumerate()
        .map(|(i, (category, total))| {
            Bar::new(i as f64, *total)
                .name(category)
                .fill(colors.color_for(category))
        })
        .collect();
    let labels: Vec<String> = state
        .category_totals
        .iter()
        .map(|(c, _)| c.clone())
        .collect();

    Plot::new("category_totals")
        .legend(Legend::default())
        .height(180.0)
        .x_axis_formatter(move |mark, _range| tick_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Mobile & tablet via payment provider
// ---------------------------------------------------------------------------

fn segment_panel(ui: &mut Ui, state: &AppState) {
    ui.strong("Mobile & Tablet paid via JazzWallet");

    let Some(segment) = &state.segment else {
        return;
    };
    if segment.is_empty() {
        ui.label("No Mobile & Tablet transactions paid via JazzWallet for selected filters.");
        return;
    }

    ui.label(format!(
        "Total Quantity: {}    Unique Customers: {}",
        segment.total_qty, segment.unique_customers
    ));

    let bars: Vec<Bar> = segment
        .monthly_qty
        .iter()
        .enumerate()
        .map(|(i, (_, qty))| Bar::new(i as f64, *qty))
        .collect();
    let labels: Vec<String> = segment.monthly_qty.iter().map(|(m, _)| m.clone()).collect();

    Plot::new("segment_monthly_qty")
        .height(160.0)
        .y_axis_label("Quantity")
        .x_axis_formatter(move |mark, _range| tick_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Quantity by Month"));
        });
}
