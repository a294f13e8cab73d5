use super::model::{SalesDataset, Transaction};

// ---------------------------------------------------------------------------
// Filter criteria: the sidebar selections as one typed record
// ---------------------------------------------------------------------------

/// Tri-state validity selector. An enum rather than the "All"/"Valid"/
/// "Not Valid" strings it renders as, so an invalid filter state cannot be
/// represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidityFilter {
    #[default]
    Any,
    ValidOnly,
    InvalidOnly,
}

impl ValidityFilter {
    pub const ALL: [ValidityFilter; 3] = [
        ValidityFilter::Any,
        ValidityFilter::ValidOnly,
        ValidityFilter::InvalidOnly,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ValidityFilter::Any => "All",
            ValidityFilter::ValidOnly => "Valid",
            ValidityFilter::InvalidOnly => "Not Valid",
        }
    }
}

/// One filter selection. `None` on a selector means "All".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub year: i32,
    pub category: Option<String>,
    pub payment_method: Option<String>,
    pub validity: ValidityFilter,
}

impl FilterCriteria {
    pub fn for_year(year: i32) -> Self {
        FilterCriteria {
            year,
            category: None,
            payment_method: None,
            validity: ValidityFilter::Any,
        }
    }
}

// ---------------------------------------------------------------------------
// Filtering – pure restriction to an index view
// ---------------------------------------------------------------------------

fn matches(tx: &Transaction, criteria: &FilterCriteria, has_validity: bool) -> bool {
    if tx.year != Some(criteria.year) {
        return false;
    }
    if let Some(cat) = &criteria.category {
        if &tx.category != cat {
            return false;
        }
    }
    if let Some(pay) = &criteria.payment_method {
        if &tx.payment_method != pay {
            return false;
        }
    }
    // Without an is_valid column the tri-state excludes nothing; the UI
    // disables the selector and logs the condition once.
    if has_validity {
        match criteria.validity {
            ValidityFilter::Any => {}
            ValidityFilter::ValidOnly => {
                if !tx.is_valid {
                    return false;
                }
            }
            ValidityFilter::InvalidOnly => {
                if tx.is_valid {
                    return false;
                }
            }
        }
    }
    true
}

/// Return indices of transactions passing all criteria (a logical AND).
///
/// The dataset is never mutated; repeated calls with the same criteria
/// return the same view.
pub fn filtered_indices(dataset: &SalesDataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .transactions
        .iter()
        .enumerate()
        .filter(|(_, tx)| matches(tx, criteria, dataset.has_validity))
        .map(|(i, _)| i)
        .collect()
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

    #[allow(clippy::too_many_arguments)]
    fn row(
        date: &str,
        id: &str,
        cust: &str,
        cat: &str,
        pay: &str,
        qty: f64,
        before: f64,
        cogs: f64,
        valid: i64,
    ) -> Vec<CellValue> {
        vec![
            s(date),
            s(id),
            s(cust),
            s(&format!("SKU-{id}")),
            s(&format!("Item {id}")),
            s(cat),
            s(pay),
            CellValue::Float(qty),
            CellValue::Float(before),
            CellValue::Float(cogs),
            CellValue::Integer(valid),
        ]
    }

    fn dataset() -> crate::data::model::SalesDataset {
        let raw = RawTable {
            headers: [
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
                "is_valid",
            ]
            .iter()
            .map(|h| h.to_string())
            .collect(),
            rows: vec![
                row("2022-01-15", "1", "C1", "Mobile", "JazzWallet", 2.0, 100.0, 20.0, 1),
                row("2022-02-01", "2", "C2", "Laptop", "Card", 1.0, 500.0, 300.0, 1),
                row("2022-03-10", "3", "C3", "Mobile", "Card", 1.0, 80.0, 30.0, 0),
                row("2021-12-30", "4", "C4", "Tablet", "JazzWallet", 1.0, 60.0, 10.0, 1),
            ],
        };
        prepare(raw).unwrap()
    }

    #[test]
    fn year_filter_with_all_selectors() {
        let ds = dataset();
        let view = filtered_indices(&ds, &FilterCriteria::for_year(2022));
        assert_eq!(view, vec![0, 1, 2]);
    }

    #[test]
    fn filtering_is_a_pure_restriction() {
        let ds = dataset();
        let mut criteria = FilterCriteria::for_year(2022);
        criteria.category = Some("Mobile".to_string());
        let view = filtered_indices(&ds, &criteria);
        assert!(view.iter().all(|&i| i < ds.len()));
        assert_eq!(view, vec![0, 2]);
        // Dataset untouched.
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn criteria_compose_like_a_conjunction() {
        let ds = dataset();
        let mut combined = FilterCriteria::for_year(2022);
        combined.category = Some("Mobile".to_string());
        combined.validity = ValidityFilter::ValidOnly;
        let both = filtered_indices(&ds, &combined);

        // Same result as restricting the year+category view by validity.
        let mut first = FilterCriteria::for_year(2022);
        first.category = Some("Mobile".to_string());
        let view = filtered_indices(&ds, &first);
        let narrowed: Vec<usize> = view
            .into_iter()
            .filter(|&i| ds.transactions[i].is_valid)
            .collect();
        assert_eq!(both, narrowed);
        assert_eq!(both, vec![0]);
    }

    #[test]
    fn validity_tri_state() {
        let ds = dataset();
        let mut criteria = FilterCriteria::for_year(2022);

        criteria.validity = ValidityFilter::ValidOnly;
        assert_eq!(filtered_indices(&ds, &criteria), vec![0, 1]);

        criteria.validity = ValidityFilter::InvalidOnly;
        assert_eq!(filtered_indices(&ds, &criteria), vec![2]);
    }

    #[test]
    fn validity_filter_without_column_excludes_nothing() {
        let raw = RawTable {
            headers: [
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
                    s("Item 1"),
                    s("Mobile"),
                    s("Card"),
                    CellValue::Float(1.0),
                    CellValue::Float(10.0),
                    CellValue::Float(5.0),
                ],
            ],
        };
        let ds = prepare(raw).unwrap();
        let mut criteria = FilterCriteria::for_year(2022);
        criteria.validity = ValidityFilter::InvalidOnly;
        assert_eq!(filtered_indices(&ds, &criteria), vec![0]);
    }
}
