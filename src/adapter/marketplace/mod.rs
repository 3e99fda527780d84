//! Marketplace API adapter.

pub mod client;

pub use client::MarketplaceClient;
