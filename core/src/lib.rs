//! `booked-balance-core`: average booked balance over a trailing window.
//!
//! Pure computation crate: receives pre-loaded ledger, registry and query
//! records, returns a result table. No file or CLI dependencies.

pub mod averager;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod ledger;
pub mod reconstructor;
pub mod registry;
pub mod report;
pub mod rng;
pub mod synth;
pub mod timestamp;
pub mod types;

pub use config::BalanceConfig;
pub use engine::{average_booked_balance_from, BalanceEngine};
pub use error::{BalanceError, BalanceResult};
pub use report::{BalanceOutcome, BalanceReport, BalanceRow};
pub use types::{AccountRecord, BalanceQuery, Transaction};
