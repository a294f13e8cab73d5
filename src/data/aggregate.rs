use std::collections::{BTreeMap, HashMap, HashSet};

use super::model::SalesDataset;

// ---------------------------------------------------------------------------
// Monthly trend
// ---------------------------------------------------------------------------

/// One month of the sales trend.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyBucket {
    /// `"YYYY-MM"` grouping key.
    pub month: String,
    pub unique_orders: usize,
    pub before_discount: f64,
    pub net_profit: f64,
    /// Average order value: `before_discount / unique_orders`. NaN when a
    /// bucket somehow holds zero orders; callers render it as a gap.
    pub aov: f64,
}

/// Group a filtered view by month and compute the trend metrics.
///
/// Buckets come out in chronological order (lexical order of the key).
/// Rows with an unknown order date carry no `month_key`; a year-filtered
/// view cannot contain them, and they are skipped if handed in anyway.
pub fn monthly_trend(dataset: &SalesDataset, view: &[usize]) -> Vec<MonthlyBucket> {
    struct Acc {
        orders: HashSet<String>,
        before_discount: f64,
        net_profit: f64,
    }

    let mut buckets: BTreeMap<String, Acc> = BTreeMap::new();
    for &i in view {
        let tx = &dataset.transactions[i];
        let Some(key) = &tx.month_key else { continue };
        let acc = buckets.entry(key.clone()).or_insert_with(|| Acc {
            orders: HashSet::new(),
            before_discount: 0.0,
            net_profit: 0.0,
        });
        acc.orders.insert(tx.order_id.clone());
        acc.before_discount += tx.before_discount;
        acc.net_profit += tx.net_profit;
    }

    buckets
        .into_iter()
        .map(|(month, acc)| {
            let unique_orders = acc.orders.len();
            let aov = if unique_orders > 0 {
                acc.before_discount / unique_orders as f64
            } else {
                f64::NAN
            };
            MonthlyBucket {
                month,
                unique_orders,
                before_discount: acc.before_discount,
                net_profit: acc.net_profit,
                aov,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Product / category rollup
// ---------------------------------------------------------------------------

/// Per-product aggregate for the product-analysis table.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRollup {
    pub sku_id: String,
    pub sku_name: String,
    pub category: String,
    pub before_discount: f64,
    pub after_discount: f64,
    pub net_profit: f64,
    pub qty_ordered: f64,
    pub unique_customers: usize,
}

/// Group a filtered view by (sku_id, sku_name, category), descending by
/// summed pre-discount value. Ties keep discovery order (stable sort).
pub fn product_rollup(dataset: &SalesDataset, view: &[usize]) -> Vec<ProductRollup> {
    struct Acc {
        before_discount: f64,
        after_discount: f64,
        net_profit: f64,
        qty_ordered: f64,
        customers: HashSet<String>,
    }

    // Discovery order matters for tie-breaking, so group through a side
    // index into an ordered Vec rather than a map alone.
    let mut order: Vec<(String, String, String)> = Vec::new();
    let mut groups: HashMap<(String, String, String), Acc> = HashMap::new();

    for &i in view {
        let tx = &dataset.transactions[i];
        let key = (tx.sku_id.clone(), tx.sku_name.clone(), tx.category.clone());
        let acc = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            Acc {
                before_discount: 0.0,
                after_discount: 0.0,
                net_profit: 0.0,
                qty_ordered: 0.0,
                customers: HashSet::new(),
            }
        });
        acc.before_discount += tx.before_discount;
        acc.after_discount += tx.after_discount;
        acc.net_profit += tx.net_profit;
        acc.qty_ordered += tx.qty_ordered;
        acc.customers.insert(tx.customer_id.clone());
    }

    let mut rollup: Vec<ProductRollup> = order
        .into_iter()
        .map(|key| {
            let acc = groups.remove(&key).expect("group recorded at discovery");
            let (sku_id, sku_name, category) = key;
            ProductRollup {
                sku_id,
                sku_name,
                category,
                before_discount: acc.before_discount,
                after_discount: acc.after_discount,
                net_profit: acc.net_profit,
                qty_ordered: acc.qty_ordered,
                unique_customers: acc.customers.len(),
            }
        })
        .collect();

    rollup.sort_by(|a, b| b.before_discount.total_cmp(&a.before_discount));
    rollup
}

/// Pre-discount sales per category, descending, for the category bar chart.
pub fn category_totals(rollup: &[ProductRollup]) -> Vec<(String, f64)> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, f64> = HashMap::new();
    for r in rollup {
        if !totals.contains_key(&r.category) {
            order.push(r.category.clone());
        }
        *totals.entry(r.category.clone()).or_insert(0.0) += r.before_discount;
    }
    let mut out: Vec<(String, f64)> = order
        .into_iter()
        .map(|c| {
            let total = totals[&c];
            (c, total)
        })
        .collect();
    out.sort_by(|a, b| b.1.total_cmp(&a.1));
    out
}

// ---------------------------------------------------------------------------
// Overview totals (scorecards)
// ---------------------------------------------------------------------------

/// Totals for the scorecard row over one filtered view.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub before_discount: f64,
    /// `None` when the source has no `after_discount` column (rendered N/A).
    pub after_discount: Option<f64>,
    pub net_profit: f64,
    pub qty_ordered: f64,
    pub unique_orders: usize,
    pub unique_customers: usize,
    /// Overall AOV; NaN on an empty view.
    pub aov: f64,
}

pub fn overview(dataset: &SalesDataset, view: &[usize]) -> Overview {
    let mut before_discount = 0.0;
    let mut after_discount = 0.0;
    let mut net_profit = 0.0;
    let mut qty_ordered = 0.0;
    let mut orders: HashSet<&str> = HashSet::new();
    let mut customers: HashSet<&str> = HashSet::new();

    for &i in view {
        let tx = &dataset.transactions[i];
        before_discount += tx.before_discount;
        after_discount += tx.after_discount;
        net_profit += tx.net_profit;
        qty_ordered += tx.qty_ordered;
        orders.insert(tx.order_id.as_str());
        customers.insert(tx.customer_id.as_str());
    }

    let aov = if orders.is_empty() {
        f64::NAN
    } else {
        before_discount / orders.len() as f64
    };

    Overview {
        before_discount,
        after_discount: dataset.has_after_discount.then_some(after_discount),
        net_profit,
        qty_ordered,
        unique_orders: orders.len(),
        unique_customers: customers.len(),
        aov,
    }
}

// ---------------------------------------------------------------------------
// Derived segment: mobile & tablet paid via a given provider
// ---------------------------------------------------------------------------

/// Summary of the mobile/tablet segment restricted to one payment provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSnapshot {
    pub total_qty: i64,
    pub unique_customers: usize,
    /// Quantity per month, chronological.
    pub monthly_qty: Vec<(String, f64)>,
}

impl SegmentSnapshot {
    pub fn is_empty(&self) -> bool {
        self.monthly_qty.is_empty()
    }
}

/// Restrict a filtered view to rows whose category mentions mobile or
/// tablet, whose payment method mentions `provider` (both case-insensitive
/// substring matches), and which are valid when the source has a validity
/// column. Reports quantity and customer reach plus the monthly quantity
/// series.
pub fn segment_snapshot(
    dataset: &SalesDataset,
    view: &[usize],
    provider: &str,
) -> SegmentSnapshot {
    let provider = provider.to_lowercase();

    let mut total_qty = 0.0;
    let mut customers: HashSet<&str> = HashSet::new();
    let mut monthly: BTreeMap<String, f64> = BTreeMap::new();

    for &i in view {
        let tx = &dataset.transactions[i];
        let category = tx.category.to_lowercase();
        if !category.contains("mobile") && !category.contains("tablet") {
            continue;
        }
        if !tx.payment_method.to_lowercase().contains(&provider) {
            continue;
        }
        if dataset.has_validity && !tx.is_valid {
            continue;
        }
        total_qty += tx.qty_ordered;
        customers.insert(tx.customer_id.as_str());
        if let Some(key) = &tx.month_key {
            *monthly.entry(key.clone()).or_insert(0.0) += tx.qty_ordered;
        }
    }

    SegmentSnapshot {
        total_qty: total_qty as i64,
        unique_customers: customers.len(),
        monthly_qty: monthly.into_iter().collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
