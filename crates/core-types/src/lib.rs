pub mod enums;
pub mod error;
pub mod store;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Direction, SortOrder};
pub use error::CoreError;
pub use store::PriceStore;
pub use structs::{normalize_ticker, PriceBar, PriceRecord, StockListing};
