//! Tax module - taxable event generation and weekly aggregation.

mod tax_model;
mod tax_service;


pub use tax_model::{TaxEvent, TaxEventKind, TaxEventSource, WeeklyTaxSummary};
pub use tax_service::{compute_weekly_tax_summary, generate_tax_events};
