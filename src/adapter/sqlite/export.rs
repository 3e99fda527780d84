//! CSV export of recorded price history.
//!
//! Column order and presence are a compatibility contract for downstream
//! spreadsheet consumers - change them and every saved import breaks.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{PriceEntry, ProductId};
use crate::error::StoreError;
use crate::port::HistoryStore;

use super::store::SqliteHistoryStore;

/// Fixed export header; one row per recorded entry follows.
pub const EXPORT_HEADER: &str =
    "product_id,observed_at,language,condition,price,currency,quantity,listing_id";

/// Render entries to CSV in insertion order.
#[must_use]
pub fn entries_to_csv(entries: &[PriceEntry]) -> String {
    let mut csv = String::from(EXPORT_HEADER);
    csv.push('\n');
    for entry in entries {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            entry.product_id(),
            entry.observed_at().to_rfc3339(),
            entry.language(),
            entry.condition(),
            entry.price(),
            entry.currency(),
            entry.quantity(),
            entry.listing_id().map(|l| l.as_str()).unwrap_or(""),
        ));
    }
    csv
}

/// CSV for one product's full history.
///
/// # Errors
/// Returns [`StoreError`] when history cannot be read.
pub async fn export_product_csv(
    store: &SqliteHistoryStore,
    product: &ProductId,
) -> Result<String, StoreError> {
    let entries = store.history(product).await?;
    Ok(entries_to_csv(&entries))
}

/// CSV for every product's log, products in sorted order.
///
/// # Errors
/// Returns [`StoreError`] when history cannot be read.
pub async fn export_all_csv(store: &SqliteHistoryStore) -> Result<String, StoreError> {
    let mut entries = Vec::new();
    for product in store.product_ids()? {
        entries.extend(store.history(&product).await?);
    }
    Ok(entries_to_csv(&entries))
}

/// Write an export file under `exports_dir` and return its path.
///
/// With a product, the file is named after it; without, the export spans
/// all products.
///
/// # Errors
/// Returns [`StoreError`] when history cannot be read or the file cannot
/// be written.
pub async fn write_export(
    store: &SqliteHistoryStore,
    product: Option<&ProductId>,
    exports_dir: &Path,
) -> Result<PathBuf, StoreError> {
    let (csv, file_name) = match product {
        Some(product) => (
            export_product_csv(store, product).await?,
            format!("{}.csv", product.as_str().replace('/', "_")),
        ),
        None => (export_all_csv(store).await?, "all-products.csv".to_string()),
    };

    fs::create_dir_all(exports_dir)?;
    let path = exports_dir.join(file_name);
    fs::write(&path, csv)?;
    Ok(path)
}
