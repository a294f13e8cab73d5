use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use thiserror::Error;

use super::model::{CellValue, ProfitPlan, RawTable, SalesDataset, Transaction};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Fatal preparation failures. Anything that makes every downstream
/// computation meaningless fails here, before a single widget renders.
#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("required column '{0}' is missing from the source table")]
    MissingColumn(&'static str),
}

// ---------------------------------------------------------------------------
// Column layout – capability check done once, not per row
// ---------------------------------------------------------------------------

/// Resolved column positions. Built once per table after header trimming;
/// every row is then read through fixed indices instead of name lookups.
struct ColumnLayout {
    order_date: usize,
    id: usize,
    customer_id: usize,
    sku_id: usize,
    sku_name: usize,
    category: usize,
    payment_method: usize,
    qty_ordered: usize,
    cogs: usize,

    price: Option<usize>,
    before_discount: Option<usize>,
    discount_amount: Option<usize>,
    after_discount: Option<usize>,
    is_valid: Option<usize>,
    registered_date: Option<usize>,
}

impl ColumnLayout {
    fn resolve(headers: &[String]) -> Result<Self, PrepareError> {
        let find = |name: &'static str| -> Result<usize, PrepareError> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(PrepareError::MissingColumn(name))
        };
        let find_opt = |name: &str| headers.iter().position(|h| h == name);

        Ok(ColumnLayout {
            order_date: find("order_date")?,
            id: find("id")?,
            customer_id: find("customer_id")?,
            sku_id: find("sku_id")?,
            sku_name: find("sku_name")?,
            category: find("category")?,
            payment_method: find("payment_method")?,
            qty_ordered: find("qty_ordered")?,
            cogs: find("cogs")?,
            price: find_opt("price"),
            before_discount: find_opt("before_discount"),
            discount_amount: find_opt("discount_amount"),
            after_discount: find_opt("after_discount"),
            is_valid: find_opt("is_valid"),
            registered_date: find_opt("registered_date"),
        })
    }
}

// ---------------------------------------------------------------------------
// Cell coercion helpers
// ---------------------------------------------------------------------------

/// Numeric coercion: unparseable or missing cells become 0.0, never NaN.
fn coerce_numeric(cell: &CellValue) -> f64 {
    match cell.as_f64() {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Date parsing with the formats spreadsheet exports actually produce.
/// Failures yield `None` (the "unknown date" sentinel), never an error.
fn parse_date(cell: &CellValue) -> Option<NaiveDate> {
    let text = cell.as_str()?;
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    // Datetime forms first, then plain dates.
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return Some(d);
        }
    }
    None
}

/// Validity coercion mirroring the numeric rule: anything that is not a
/// parseable non-zero number counts as invalid (0).
fn coerce_validity(cell: &CellValue) -> bool {
    match cell.as_f64() {
        Some(v) if v.is_finite() => (v as i64) != 0,
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// prepare – RawTable → SalesDataset
// ---------------------------------------------------------------------------

/// Turn a raw load into the prepared, immutable dataset.
///
/// Deterministic: the same raw table always yields the same dataset. The
/// net-profit formula is chosen once from column availability — exports
/// without a `before_discount` column fall back to `price × qty` — and is
/// recorded on the dataset so the UI can report which branch is in force.
pub fn prepare(mut raw: RawTable) -> Result<SalesDataset, PrepareError> {
    for h in &mut raw.headers {
        let trimmed = h.trim();
        if trimmed.len() != h.len() {
            *h = trimmed.to_string();
        }
    }

    let layout = ColumnLayout::resolve(&raw.headers)?;

    let profit_plan = if layout.before_discount.is_some() {
        ProfitPlan::BeforeDiscount
    } else {
        ProfitPlan::PriceTimesQty
    };
    if profit_plan == ProfitPlan::PriceTimesQty {
        log::warn!(
            "source has no 'before_discount' column; net profit falls back to {profit_plan}"
        );
    }

    let opt_numeric = |row: usize, col: Option<usize>| -> f64 {
        col.map(|c| coerce_numeric(raw.cell(row, c))).unwrap_or(0.0)
    };
    let text = |row: usize, col: usize| -> String {
        raw.cell(row, col).as_str().unwrap_or_default()
    };

    let mut transactions = Vec::with_capacity(raw.len());
    let mut unparseable_dates = 0usize;

    for i in 0..raw.len() {
        let order_date = parse_date(raw.cell(i, layout.order_date));
        if order_date.is_none() {
            unparseable_dates += 1;
        }
        let registered_date = layout
            .registered_date
            .and_then(|c| parse_date(raw.cell(i, c)));

        let price = opt_numeric(i, layout.price);
        let qty_ordered = coerce_numeric(raw.cell(i, layout.qty_ordered));
        let before_discount = opt_numeric(i, layout.before_discount);
        let discount_amount = opt_numeric(i, layout.discount_amount);
        let after_discount = opt_numeric(i, layout.after_discount);
        let cogs = coerce_numeric(raw.cell(i, layout.cogs));

        let net_profit = match profit_plan {
            ProfitPlan::BeforeDiscount => before_discount - cogs * qty_ordered,
            ProfitPlan::PriceTimesQty => price * qty_ordered - cogs * qty_ordered,
        };

        let is_valid = match layout.is_valid {
            Some(c) => coerce_validity(raw.cell(i, c)),
            None => true,
        };

        transactions.push(Transaction {
            order_id: text(i, layout.id),
            customer_id: text(i, layout.customer_id),
            sku_id: text(i, layout.sku_id),
            sku_name: text(i, layout.sku_name),
            category: text(i, layout.category),
            payment_method: text(i, layout.payment_method),
            order_date,
            registered_date,
            is_valid,
            price,
            qty_ordered,
            before_discount,
            discount_amount,
            after_discount,
            cogs,
            net_profit,
            year: order_date.map(|d| d.year()),
            month: order_date.map(|d| d.month()),
            month_key: order_date.map(|d| d.format("%Y-%m").to_string()),
        });
    }

    if unparseable_dates > 0 {
        log::warn!("{unparseable_dates} rows have unparseable order dates");
    }

    // Selector indices, computed once.
    let mut years: BTreeSet<i32> = BTreeSet::new();
    let mut categories: BTreeSet<String> = BTreeSet::new();
    let mut payment_methods: BTreeSet<String> = BTreeSet::new();
    for tx in &transactions {
        if let Some(y) = tx.year {
            years.insert(y);
        }
        if !tx.category.is_empty() {
            categories.insert(tx.category.clone());
        }
        if !tx.payment_method.is_empty() {
            payment_methods.insert(tx.payment_method.clone());
        }
    }

    Ok(SalesDataset {
        transactions,
        years: years.into_iter().collect(),
        categories: categories.into_iter().collect(),
        payment_methods: payment_methods.into_iter().collect(),
        has_validity: layout.is_valid.is_some(),
        has_after_discount: layout.after_discount.is_some(),
        has_registered_date: layout.registered_date.is_some(),
        profit_plan,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    fn full_table() -> RawTable {
        RawTable {
            headers: [
                " order_date",
                "id",
                "customer_id",
                "sku_id",
                "sku_name",
                "category",
                "payment_method",
                "price",
                "qty_ordered",
                "before_discount",
                "discount_amount",
                "after_discount",
                "cogs",
                "is_valid",
            ]
            .iter()
            .map(|h| h.to_string())
            .collect(),
            rows: vec![
                vec![
                    s("2022-01-15"),
                    s("1"),
                    s("C1"),
                    s("SKU-1"),
                    s("Phone X"),
                    s("Mobile"),
                    s("JazzWallet"),
                    CellValue::Float(50.0),
                    CellValue::Integer(2),
                    CellValue::Float(100.0),
                    CellValue::Float(10.0),
                    CellValue::Float(90.0),
                    CellValue::Float(20.0),
                    CellValue::Integer(1),
                ],
                vec![
                    s("not-a-date"),
                    s("2"),
                    s("C2"),
                    s("SKU-2"),
                    s("Laptop Y"),
                    s("Laptop"),
                    s("Card"),
                    s("oops"),
                    CellValue::Integer(1),
                    CellValue::Null,
                    CellValue::Null,
                    CellValue::Null,
                    CellValue::Float(300.0),
                    s("bogus"),
                ],
            ],
        }
    }

    #[test]
    fn trims_headers_and_coerces_numerics() {
        let ds = prepare(full_table()).unwrap();
        assert_eq!(ds.len(), 2);

        // Row 2 had an unparseable price and null monetary cells.
        let tx = &ds.transactions[1];
        assert_eq!(tx.price, 0.0);
        assert_eq!(tx.before_discount, 0.0);
        for v in [
            tx.price,
            tx.qty_ordered,
            tx.before_discount,
            tx.discount_amount,
            tx.after_discount,
            tx.cogs,
            tx.net_profit,
        ] {
            assert!(v.is_finite());
        }
    }

    #[test]
    fn unparseable_dates_become_sentinel_not_dropped() {
        let ds = prepare(full_table()).unwrap();
        let tx = &ds.transactions[1];
        assert!(tx.order_date.is_none());
        assert!(tx.year.is_none());
        assert!(tx.month_key.is_none());
        // Row survives with its other fields intact.
        assert_eq!(tx.order_id, "2");
    }

    #[test]
    fn primary_profit_plan_uses_before_discount() {
        let ds = prepare(full_table()).unwrap();
        assert_eq!(ds.profit_plan, ProfitPlan::BeforeDiscount);
        // 100 − 20×2
        assert_eq!(ds.transactions[0].net_profit, 60.0);
    }

    #[test]
    fn fallback_profit_plan_when_before_discount_missing() {
        let mut raw = full_table();
        let idx = raw.headers.iter().position(|h| h == "before_discount").unwrap();
        raw.headers.remove(idx);
        for row in &mut raw.rows {
            row.remove(idx);
        }
        let ds = prepare(raw).unwrap();
        assert_eq!(ds.profit_plan, ProfitPlan::PriceTimesQty);
        // 50×2 − 20×2
        assert_eq!(ds.transactions[0].net_profit, 60.0);
    }

    #[test]
    fn validity_coercion() {
        let ds = prepare(full_table()).unwrap();
        assert!(ds.has_validity);
        assert!(ds.transactions[0].is_valid);
        // "bogus" coerces to 0 → invalid.
        assert!(!ds.transactions[1].is_valid);
    }

    #[test]
    fn missing_validity_column_means_all_valid() {
        let mut raw = full_table();
        let idx = raw.headers.iter().position(|h| h == "is_valid").unwrap();
        raw.headers.remove(idx);
        for row in &mut raw.rows {
            row.remove(idx);
        }
        let ds = prepare(raw).unwrap();
        assert!(!ds.has_validity);
        assert!(ds.transactions.iter().all(|t| t.is_valid));
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let mut raw = full_table();
        let idx = raw.headers.iter().position(|h| h == "category").unwrap();
        raw.headers.remove(idx);
        for row in &mut raw.rows {
            row.remove(idx);
        }
        let err = prepare(raw).unwrap_err();
        assert!(matches!(err, PrepareError::MissingColumn("category")));
    }

    #[test]
    fn calendar_keys_and_selector_indices() {
        let ds = prepare(full_table()).unwrap();
        let tx = &ds.transactions[0];
        assert_eq!(tx.year, Some(2022));
        assert_eq!(tx.month, Some(1));
        assert_eq!(tx.month_key.as_deref(), Some("2022-01"));

        assert_eq!(ds.years, vec![2022]);
        assert_eq!(ds.categories, vec!["Laptop", "Mobile"]);
        assert_eq!(ds.payment_methods, vec!["Card", "JazzWallet"]);
    }

    #[test]
    fn optional_registration_date_is_parsed() {
        let mut raw = full_table();
        raw.headers.push("registered_date".to_string());
        raw.rows[0].push(s("2021-11-03"));
        raw.rows[1].push(s("garbage"));
        let ds = prepare(raw).unwrap();
        assert!(ds.has_registered_date);
        assert_eq!(
            ds.transactions[0].registered_date,
            NaiveDate::from_ymd_opt(2021, 11, 3)
        );
        assert!(ds.transactions[1].registered_date.is_none());
    }

    #[test]
    fn preparation_is_deterministic() {
        let a = prepare(full_table()).unwrap();
        let b = prepare(full_table()).unwrap();
        for (x, y) in a.transactions.iter().zip(&b.transactions) {
            assert_eq!(x.net_profit, y.net_profit);
            assert_eq!(x.month_key, y.month_key);
            assert_eq!(x.is_valid, y.is_valid);
        }
        assert_eq!(a.profit_plan, b.profit_plan);
    }
}
