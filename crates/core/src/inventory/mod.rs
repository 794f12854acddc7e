//! Inventory module - FIFO cost-basis engine and its result models.

mod inventory_engine;
mod inventory_model;

#[cfg(test)]
mod inventory_engine_tests;

pub use inventory_engine::InventoryEngine;
pub use inventory_model::{InventoryResult, OpenLotSnapshot};
