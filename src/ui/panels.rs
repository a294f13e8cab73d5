use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::ValidityFilter;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel: year, category, payment method and
/// validity selectors. Any change triggers a full recomputation pass.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };
    let Some(criteria) = state.criteria.clone() else {
        ui.label("Dataset has no dated rows to filter.");
        return;
    };

    // ---- Year (single choice, required) ----
    ui.strong("Year");
    egui::ComboBox::from_id_salt("year")
        .selected_text(criteria.year.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for &year in &dataset.years {
                if ui
                    .selectable_label(criteria.year == year, year.to_string())
                    .clicked()
                {
                    state.set_year(year);
                }
            }
        });
    ui.separator();

    // ---- Category (all-or-one) ----
    ui.strong("Category");
    all_or_one(
        ui,
        "category",
        &dataset.categories,
        criteria.category.as_deref(),
        |selection| state.set_category(selection),
    );
    ui.separator();

    // ---- Payment method (all-or-one) ----
    ui.strong("Payment Method");
    all_or_one(
        ui,
        "payment_method",
        &dataset.payment_methods,
        criteria.payment_method.as_deref(),
        |selection| state.set_payment_method(selection),
    );
    ui.separator();

    // ---- Validity tri-state ----
    ui.strong("Value Transaction");
    ui.add_enabled_ui(dataset.has_validity, |ui: &mut Ui| {
        egui::ComboBox::from_id_salt("validity")
            .selected_text(criteria.validity.label())
            .show_ui(ui, |ui: &mut Ui| {
                for option in ValidityFilter::ALL {
                    if ui
                        .selectable_label(criteria.validity == option, option.label())
                        .clicked()
                    {
                        state.set_validity(option);
                    }
                }
            });
    });
    if !dataset.has_validity {
        ui.label(
            RichText::new("No validity column in this export.")
                .small()
                .weak(),
        );
    }
}

/// An "All"-or-one combo box over a list of names. `None` means "All".
fn all_or_one(
    ui: &mut Ui,
    id: &str,
    options: &[String],
    current: Option<&str>,
    mut on_select: impl FnMut(Option<String>),
) {
    let shown = current.unwrap_or("All");
    egui::ComboBox::from_id_salt(id)
        .selected_text(shown)
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), "All").clicked() {
                on_select(None);
            }
            for option in options {
                if ui
                    .selectable_label(current == Some(option.as_str()), option)
                    .clicked()
                {
                    on_select(Some(option.clone()));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} transactions loaded, {} in view",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales export")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_source(path);
    }
}
