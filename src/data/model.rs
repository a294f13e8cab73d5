use std::fmt;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// CellValue – a single raw cell before preparation
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as the loader sees it, before any coercion.
/// Spreadsheet exports are messy: the same column can hold numbers in one
/// file and quoted strings in the next, so the loader keeps whatever the
/// source claims and the preparer decides what it means.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, ""),
        }
    }
}

impl CellValue {
    /// Interpret the cell as a number. Numeric strings count; anything
    /// else is `None` (the preparer maps that to 0.0).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::String(s) => s.trim().parse::<f64>().ok(),
            CellValue::Null => None,
        }
    }

    /// Interpret the cell as text, `None` for null cells.
    pub fn as_str(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – the loaded, unprepared source
// ---------------------------------------------------------------------------

/// The tabular source exactly as loaded: named columns × rows of raw cells.
/// Rows may be ragged (short rows read as nulls); the preparer handles that.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Cell at (row, column index), `Null` when the row is short.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&CellValue::Null)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Transaction – one prepared row
// ---------------------------------------------------------------------------

/// A single sales transaction (one prepared row of the source table).
/// Monetary and quantity fields are always finite; unparseable cells were
/// coerced to 0.0 during preparation. An unparseable order date is `None`
/// and the row is kept.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub order_id: String,
    pub customer_id: String,
    pub sku_id: String,
    pub sku_name: String,
    pub category: String,
    pub payment_method: String,

    pub order_date: Option<NaiveDate>,
    pub registered_date: Option<NaiveDate>,
    /// Coerced 0/1 validity flag; `true` for every row when the source has
    /// no `is_valid` column (see [`SalesDataset::has_validity`]).
    pub is_valid: bool,

    pub price: f64,
    pub qty_ordered: f64,
    pub before_discount: f64,
    pub discount_amount: f64,
    pub after_discount: f64,
    pub cogs: f64,

    // Derived once at prepare time, immutable afterwards.
    pub net_profit: f64,
    pub year: Option<i32>,
    pub month: Option<u32>,
    /// `"YYYY-MM"` — lexical order is chronological order.
    pub month_key: Option<String>,
}

// ---------------------------------------------------------------------------
// ProfitPlan – which net-profit formula is in force
// ---------------------------------------------------------------------------

/// Net-profit formula, selected once at prepare time from the columns the
/// source actually has and then applied uniformly to every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfitPlan {
    /// `before_discount − cogs × qty_ordered` (authoritative).
    BeforeDiscount,
    /// `price × qty_ordered − cogs × qty_ordered`, used only when the
    /// source lacks a `before_discount` column.
    PriceTimesQty,
}

impl fmt::Display for ProfitPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfitPlan::BeforeDiscount => write!(f, "before_discount - cogs*qty"),
            ProfitPlan::PriceTimesQty => write!(f, "price*qty - cogs*qty"),
        }
    }
}

// ---------------------------------------------------------------------------
// SalesDataset – the complete prepared table
// ---------------------------------------------------------------------------

/// The prepared table plus selector indices computed once. Immutable after
/// preparation: filtering yields index views, never mutated copies.
#[derive(Debug, Clone)]
pub struct SalesDataset {
    pub transactions: Vec<Transaction>,

    /// Distinct years with at least one dated row, ascending.
    pub years: Vec<i32>,
    /// Distinct category names, sorted, for the sidebar selector.
    pub categories: Vec<String>,
    /// Distinct payment methods, sorted, for the sidebar selector.
    pub payment_methods: Vec<String>,

    /// Whether the source carried an `is_valid` column. When `false`, a
    /// validity filter excludes no rows.
    pub has_validity: bool,
    /// Whether the source carried an `after_discount` column; when `false`
    /// the dependent scorecard reports N/A.
    pub has_after_discount: bool,
    pub has_registered_date: bool,

    /// Formula the preparer selected for `net_profit`.
    pub profit_plan: ProfitPlan,
}

impl SalesDataset {
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Default year for the sidebar: the preferred fiscal year when the
    /// data has it, otherwise the latest year present.
    pub fn default_year(&self, preferred: i32) -> Option<i32> {
        if self.years.contains(&preferred) {
            Some(preferred)
        } else {
            self.years.last().copied()
        }
    }
}
