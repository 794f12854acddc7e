//! Balances module - per (asset, wallet) solvency tracking.

mod balance_tracker;


pub use balance_tracker::WalletBalanceTracker;
