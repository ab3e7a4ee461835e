//! # Tickerscope Database Crate
//!
//! This crate is the system's price archive: daily OHLCV observations and the
//! descriptive instrument catalog, stored in PostgreSQL.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All SQL lives here. The analysis crate only sees the
//!   `core_types::PriceStore` trait, which `DbRepository` implements.
//! - **Asynchronous & Pooled:** Every operation is async and runs on a shared
//!   `PgPool` created by the host process.
//!
//! ## Public API
//!
//! - `connect` / `run_migrations`: pool creation and schema setup.
//! - `DbRepository`: price queries, idempotent bar ingestion, catalog CRUD.
//! - `InMemoryPriceStore`: a `PriceStore` over a vector, for tests and fixtures.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod memory;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use memory::{InMemoryPriceStore, MemoryStoreError};
pub use repository::{DbRepository, NewStock, StockUpdate};
