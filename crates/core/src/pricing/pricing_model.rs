use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::errors::{PricingError, Result};
use crate::pricing::PriceProviderTrait;

/// Deterministic price provider backed by a static rate table.
///
/// Rates are keyed by (base, quote) and ignore the timestamp. Useful for
/// seeded batch runs and tests where reproducible valuations matter more
/// than market accuracy.
#[derive(Debug, Default, Clone)]
pub struct FixedPriceProvider {
    rates: HashMap<(String, String), Decimal>,
}

impl FixedPriceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(
        mut self,
        base_asset_id: impl Into<String>,
        quote_asset_id: impl Into<String>,
        rate: Decimal,
    ) -> Self {
        self.set_rate(base_asset_id, quote_asset_id, rate);
        self
    }

    pub fn set_rate(
        &mut self,
        base_asset_id: impl Into<String>,
        quote_asset_id: impl Into<String>,
        rate: Decimal,
    ) {
        self.rates
            .insert((base_asset_id.into(), quote_asset_id.into()), rate);
    }
}

impl PriceProviderTrait for FixedPriceProvider {
    fn rate(
        &self,
        base_asset_id: &str,
        quote_asset_id: &str,
        _timestamp: DateTime<Utc>,
    ) -> Result<Decimal> {
        self.rates
            .get(&(base_asset_id.to_string(), quote_asset_id.to_string()))
            .copied()
            .ok_or_else(|| {
                PricingError::UnknownPair {
                    base: base_asset_id.to_string(),
                    quote: quote_asset_id.to_string(),
                }
                .into()
            })
    }
}
