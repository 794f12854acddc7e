use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Open-inventory totals for one asset, split into the tax-free portion
/// (held past the exemption window) and the still-taxable remainder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInventorySummary {
    pub asset_id: String,
    pub total_quantity: Decimal,
    pub tax_free_quantity: Decimal,
    pub taxable_quantity: Decimal,
    pub total_value: Decimal,
    pub tax_free_value: Decimal,
    pub taxable_value: Decimal,
    pub lots: usize,
}

/// Valuation of all open inventory at a point in time, in quote-currency
/// units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub as_of: DateTime<Utc>,
    pub assets: Vec<AssetInventorySummary>,
    pub total_value: Decimal,
    pub total_tax_free_value: Decimal,
}

impl InventorySummary {
    pub fn total_taxable_value(&self) -> Decimal {
        self.total_value - self.total_tax_free_value
    }
}
