//! Reports module - open-inventory valuation and text rendering.

mod reports_model;
mod reports_service;


pub use reports_model::{AssetInventorySummary, InventorySummary};
pub use reports_service::{
    compute_inventory_summary, render_inventory_summary, render_weekly_tax_summary,
};
