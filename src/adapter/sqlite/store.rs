//! SQLite history store implementation.
//!
//! Persists price observations append-only using SQLite and Diesel ORM.
//! Rows are keyed by an autoincrement id, which is the insertion order the
//! [`HistoryStore`] contract is defined over; prices are stored as exact
//! decimal text and timestamps as RFC 3339 text.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use super::database::connection::DbPool;
use super::database::model::{NewPriceEntryRow, PriceEntryRow};
use super::database::schema::price_entries;
use crate::domain::{FilterCriteria, ListingId, PriceEntry, ProductId};
use crate::error::StoreError;
use crate::port::HistoryStore;

/// SQLite-backed append-only observation log.
pub struct SqliteHistoryStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteHistoryStore {
    /// Create a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// All product ids with recorded history, sorted. Used by bulk export.
    pub fn product_ids(&self) -> Result<Vec<ProductId>, StoreError> {
        let mut conn = self.conn()?;
        let ids: Vec<String> = price_entries::table
            .select(price_entries::product_id)
            .distinct()
            .order(price_entries::product_id.asc())
            .load(&mut conn)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(ids.into_iter().map(ProductId::from).collect())
    }

    fn conn(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>, StoreError>
    {
        self.pool.get().map_err(|e| StoreError::Pool(e.to_string()))
    }

    fn to_row(entry: &PriceEntry) -> Result<NewPriceEntryRow, StoreError> {
        let quantity = i32::try_from(entry.quantity())
            .map_err(|_| StoreError::Decode(format!("quantity out of range: {}", entry.quantity())))?;
        Ok(NewPriceEntryRow {
            product_id: entry.product_id().to_string(),
            observed_at: entry.observed_at().to_rfc3339(),
            language: entry.language().to_string(),
            condition: entry.condition().to_string(),
            price: entry.price().to_string(),
            currency: entry.currency().to_string(),
            quantity,
            listing_id: entry.listing_id().map(ToString::to_string),
        })
    }

    fn from_row(row: PriceEntryRow) -> Result<PriceEntry, StoreError> {
        let observed_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&row.observed_at)
            .map_err(|e| StoreError::Decode(e.to_string()))?
            .with_timezone(&Utc);
        let price: Decimal = row
            .price
            .parse()
            .map_err(|e| StoreError::Decode(format!("bad price '{}': {e}", row.price)))?;
        let quantity = u32::try_from(row.quantity)
            .map_err(|_| StoreError::Decode(format!("negative quantity: {}", row.quantity)))?;

        PriceEntry::try_new(
            ProductId::from(row.product_id),
            observed_at,
            row.language,
            row.condition,
            price,
            row.currency,
            quantity,
            row.listing_id.map(ListingId::from),
        )
        .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

impl HistoryStore for SqliteHistoryStore {
    async fn append(&self, entry: &PriceEntry) -> Result<(), StoreError> {
        let row = Self::to_row(entry)?;
        let mut conn = self.conn()?;

        diesel::insert_into(price_entries::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    async fn latest(
        &self,
        product: &ProductId,
        filter: &FilterCriteria,
    ) -> Result<Option<PriceEntry>, StoreError> {
        let mut conn = self.conn()?;
        let min_quantity = i32::try_from(filter.min_quantity()).unwrap_or(i32::MAX);

        let mut query = price_entries::table
            .filter(price_entries::product_id.eq(product.as_str()))
            .filter(price_entries::quantity.ge(min_quantity))
            .order(price_entries::id.desc())
            .into_boxed();

        if let Some(language) = filter.language() {
            query = query.filter(price_entries::language.eq(language.to_string()));
        }
        if let Some(condition) = filter.condition() {
            query = query.filter(price_entries::condition.eq(condition.to_string()));
        }

        let row: Option<PriceEntryRow> = query
            .first(&mut conn)
            .optional()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        row.map(Self::from_row).transpose()
    }

    async fn history(&self, product: &ProductId) -> Result<Vec<PriceEntry>, StoreError> {
        let mut conn = self.conn()?;

        let rows: Vec<PriceEntryRow> = price_entries::table
            .filter(price_entries::product_id.eq(product.as_str()))
            .order(price_entries::id.asc())
            .load(&mut conn)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        rows.into_iter().map(Self::from_row).collect()
    }
}
