//! Cardwatch - marketplace price tracking and alerting.
//!
//! This crate polls marketplace listings for a configured watchlist,
//! records every observation in an append-only history store, and raises
//! alerts when prices or availability move past configured thresholds.
//!
//! # Architecture
//!
//! A small hexagonal layout: pure domain logic in the middle, traits at
//! the seams, adapters at the edge.
//!
//! - [`domain`] - products, observations, alerts, and the pure movement
//!   detector ([`domain::detect`])
//! - [`port`] - capabilities the core consumes: snapshot fetcher, history
//!   store, watchlist provider, and the notifier fan-out
//! - [`adapter`] - concrete implementations: marketplace HTTP client,
//!   SQLite history store with CSV export, console notifier, in-memory
//!   watchlist
//! - [`app`] - the pricing service that orchestrates one cycle and the
//!   non-overlapping scheduler that drives it
//! - [`config`] - TOML configuration with startup validation
//! - [`error`] - error taxonomy for the crate
//! - [`cli`] - `run` / `history` / `export` commands
//!
//! # Example
//!
//! ```no_run
//! use cardwatch::app::App;
//! use cardwatch::config::Config;
//!
//! # async fn demo() -> cardwatch::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! config.init_logging();
//! App::run(config).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
