//! Label pricing engine.
//!
//! Reproduces the legacy spreadsheet quote: a price per meter taken from a
//! length tier, adjusted by width coefficients, surcharges and client factors,
//! then converted into per-unit, per-thousand and total prices.
//!
//! The calculation itself (`engine::calculate_quote`) is pure and works on an
//! immutable [`PricingSnapshot`]. Loading snapshots from Postgres, caching them
//! and exposing the JSON API live in `queries`, `services` and `routes`.

pub mod calculators;
pub mod derivation;
pub mod engine;
pub mod factors;
pub mod models;
pub mod queries;
pub mod reference;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;
pub mod settings;
pub mod snapshot;
pub mod tables;
pub mod trace;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export commonly used items
pub use calculators::{round_down, round_money, Prices};
pub use engine::{calculate_quote, PricingError, QuoteInput, QuoteResult};
pub use factors::ClientCategory;
pub use routes::router;
pub use snapshot::{PricingSnapshot, SnapshotInfo};
