//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::price_entries;

/// Database row for a price observation (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = price_entries)]
pub struct NewPriceEntryRow {
    pub product_id: String,
    pub observed_at: String,
    pub language: String,
    pub condition: String,
    pub price: String,
    pub currency: String,
    pub quantity: i32,
    pub listing_id: Option<String>,
}

/// Database row for a price observation (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = price_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PriceEntryRow {
    pub id: Option<i32>,
    pub product_id: String,
    pub observed_at: String,
    pub language: String,
    pub condition: String,
    pub price: String,
    pub currency: String,
    pub quantity: i32,
    pub listing_id: Option<String>,
}
