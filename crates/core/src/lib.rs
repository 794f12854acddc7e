//! Cointax Core - cost-basis inventory and tax event engine.
//!
//! This crate turns an ordered stream of ledger events (trades, deposits,
//! withdrawals, transfers, rewards) into acquisition lots, FIFO disposal
//! links, wallet-balance checks, and taxable events. It is storage- and
//! network-agnostic: importers and price sources live behind traits.

pub mod balances;
pub mod constants;
pub mod errors;
pub mod inventory;
pub mod ledger;
pub mod pricing;
pub mod reports;
pub mod seed;
pub mod tax;
pub mod utils;

// Re-export common types from the ledger and inventory modules
pub use inventory::*;
pub use ledger::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
