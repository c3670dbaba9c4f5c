//! Market time-series ingestion and generation.

/// CSV loading and the exact-timestamp join of the grid and site series.
pub mod loader;
pub mod record;
/// Seeded synthetic market-year generator.
pub mod synthetic;

pub use loader::load_joined;
pub use record::{HourlyRecord, MarketDataset};
pub use synthetic::SyntheticMarket;
