use std::path::PathBuf;
use std::sync::Arc;

use crate::data::aggregate::{
    self, MonthlyBucket, Overview, ProductRollup, SegmentSnapshot,
};
use crate::data::cache::DatasetStore;
use crate::data::filter::{filtered_indices, FilterCriteria, ValidityFilter};
use crate::data::model::SalesDataset;

/// Fiscal year the dashboard opens on when the data has it.
pub const PREFERRED_YEAR: i32 = 2022;

/// Payment provider highlighted by the mobile/tablet segment panel.
pub const SEGMENT_PROVIDER: &str = "jazz";

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Products,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Every filter change triggers one full recomputation pass: the index
/// view and all aggregates are rebuilt from the immutable dataset. The
/// recomputation is cheap enough to always run to completion.
pub struct AppState {
    /// Load-once dataset cache, keyed by source path.
    pub store: DatasetStore,

    /// Path of the currently shown dataset (None until a file is opened).
    pub source: Option<PathBuf>,

    /// Prepared dataset shared with the store.
    pub dataset: Option<Arc<SalesDataset>>,

    /// Current sidebar selections.
    pub criteria: Option<FilterCriteria>,

    /// Indices of transactions passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    // Aggregates over the current view, rebuilt on every filter change.
    pub trend: Vec<MonthlyBucket>,
    pub rollup: Vec<ProductRollup>,
    pub category_totals: Vec<(String, f64)>,
    pub overview: Option<Overview>,
    pub segment: Option<SegmentSnapshot>,

    /// Which tab is active.
    pub tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            store: DatasetStore::new(),
            source: None,
            dataset: None,
            criteria: None,
            visible_indices: Vec::new(),
            trend: Vec::new(),
            rollup: Vec::new(),
            category_totals: Vec::new(),
            overview: None,
            segment: None,
            tab: Tab::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Load a source through the store and make it the shown dataset.
    /// Errors (missing file, missing required column) become a status
    /// message and leave the previous dataset untouched.
    pub fn open_source(&mut self, path: PathBuf) {
        match self.store.load(&path) {
            Ok(dataset) => {
                self.source = Some(path);
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly prepared dataset and reset the filters to their
    /// defaults (preferred year, all categories, all payment methods).
    pub fn set_dataset(&mut self, dataset: Arc<SalesDataset>) {
        self.criteria = dataset
            .default_year(PREFERRED_YEAR)
            .map(FilterCriteria::for_year);
        if !dataset.has_validity {
            log::warn!("source has no 'is_valid' column; validity filter is inert");
        }
        self.dataset = Some(dataset);
        self.status_message = None;
        self.recompute();
    }

    /// Recompute the index view and every aggregate after a filter change.
    pub fn recompute(&mut self) {
        let (Some(dataset), Some(criteria)) = (&self.dataset, &self.criteria) else {
            self.visible_indices.clear();
            self.trend.clear();
            self.rollup.clear();
            self.category_totals.clear();
            self.overview = None;
            self.segment = None;
            return;
        };

        self.visible_indices = filtered_indices(dataset, criteria);
        self.trend = aggregate::monthly_trend(dataset, &self.visible_indices);
        self.rollup = aggregate::product_rollup(dataset, &self.visible_indices);
        self.category_totals = aggregate::category_totals(&self.rollup);
        self.overview = Some(aggregate::overview(dataset, &self.visible_indices));
        self.segment = Some(aggregate::segment_snapshot(
            dataset,
            &self.visible_indices,
            SEGMENT_PROVIDER,
        ));
    }

    pub fn set_year(&mut self, year: i32) {
        if let Some(c) = &mut self.criteria {
            c.year = year;
            self.recompute();
        }
    }

    pub fn set_category(&mut self, category: Option<String>) {
        if let Some(c) = &mut self.criteria {
            c.category = category;
            self.recompute();
        }
    }

    pub fn set_payment_method(&mut self, payment_method: Option<String>) {
        if let Some(c) = &mut self.criteria {
            c.payment_method = payment_method;
            self.recompute();
        }
    }

    pub fn set_validity(&mut self, validity: ValidityFilter) {
        if let Some(c) = &mut self.criteria {
            c.validity = validity;
            self.recompute();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, RawTable};
    use crate::data::prepare::prepare;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    fn two_year_dataset() -> Arc<SalesDataset> {
        let headers = [
            "order_date",
            "id",
            "customer_id",
            "sku_id",
            "sku_name",
            "category",
            "payment_method",
            "qty_ordered",
            "before_discount",
            "cogs",
        ];
        let raw = RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: vec![
                vec![
                    s("2021-06-01"),
                    s("1"),
                    s("C1"),
                    s("A"),
                    s("Alpha"),
                    s("Mobile"),
                    s("Card"),
                    CellValue::Float(1.0),
                    CellValue::Float(10.0),
                    CellValue::Float(5.0),
                ],
                vec![
                    s("2022-03-01"),
                    s("2"),
                    s("C2"),
                    s("B"),
                    s("Beta"),
                    s("Laptop"),
                    s("Card"),
                    CellValue::Float(1.0),
                    CellValue::Float(20.0),
                    CellValue::Float(5.0),
                ],
            ],
        };
        Arc::new(prepare(raw).unwrap())
    }

    #[test]
    fn defaults_to_preferred_year_and_recomputes() {
        let mut state = AppState::default();
        state.set_dataset(two_year_dataset());
        assert_eq!(state.criteria.as_ref().unwrap().year, PREFERRED_YEAR);
        assert_eq!(state.visible_indices, vec![1]);
        assert_eq!(state.trend.len(), 1);
        assert_eq!(state.overview.as_ref().unwrap().unique_orders, 1);
    }

    #[test]
    fn year_change_rebuilds_the_view() {
        let mut state = AppState::default();
        state.set_dataset(two_year_dataset());
        state.set_year(2021);
        assert_eq!(state.visible_indices, vec![0]);
        assert_eq!(state.trend[0].month, "2021-06");
    }
}
