use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use super::loader;
use super::model::SalesDataset;
use super::prepare;

// ---------------------------------------------------------------------------
// DatasetStore – memoizing load-once cache keyed by source path
// ---------------------------------------------------------------------------

/// Loads and prepares each source at most once per process, keyed by path.
///
/// The store is an owned collaborator of the app state rather than a
/// global: callers hold it for the process lifetime and every filter or
/// aggregation request reuses the same prepared dataset. Entries are never
/// invalidated; picking up a changed file on disk requires a restart.
#[derive(Default)]
pub struct DatasetStore {
    entries: HashMap<PathBuf, Arc<SalesDataset>>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepared dataset for `path`: cached on first access, shared after.
    pub fn load(&mut self, path: &Path) -> Result<Arc<SalesDataset>> {
        if let Some(dataset) = self.entries.get(path) {
            log::debug!("dataset cache hit: {}", path.display());
            return Ok(Arc::clone(dataset));
        }

        let raw = loader::load_file(path)
            .with_context(|| format!("loading {}", path.display()))?;
        let dataset = prepare::prepare(raw)
            .with_context(|| format!("preparing {}", path.display()))?;
        log::info!(
            "loaded {} transactions from {} (net profit plan: {})",
            dataset.len(),
            path.display(),
            dataset.profit_plan
        );

        let dataset = Arc::new(dataset);
        self.entries.insert(path.to_path_buf(), Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
order_date,id,customer_id,sku_id,sku_name,category,payment_method,qty_ordered,before_discount,cogs
2022-01-15,1,C1,SKU-1,Phone X,Mobile,JazzWallet,2,100,20
2022-02-01,2,C2,SKU-2,Laptop Y,Laptop,Card,1,500,300
";

    fn write_sample(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(SAMPLE.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_once_and_shares_the_dataset() {
        let dir = std::env::temp_dir().join("salesdash-store-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = write_sample(&dir, "export.csv");

        let mut store = DatasetStore::new();
        let first = store.load(&path).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(store.len(), 1);

        // Second access returns the same allocation, not a re-parse.
        let second = store.load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_file_is_an_error_not_an_entry() {
        let mut store = DatasetStore::new();
        let missing = Path::new("/nonexistent/export.csv");
        assert!(store.load(missing).is_err());
        assert!(store.is_empty());
    }
}
