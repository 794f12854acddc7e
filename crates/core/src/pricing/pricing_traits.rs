use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::errors::Result;

/// Lookup interface for asset-to-quote exchange rates.
///
/// Implementations return a positive rate meaning "1 unit of base =
/// rate units of quote" at (or nearest valid to) the given instant. The
/// engine treats a failing lookup as fatal for the whole batch; it never
/// distinguishes "no price available" from any other provider failure.
pub trait PriceProviderTrait: Send + Sync {
    fn rate(
        &self,
        base_asset_id: &str,
        quote_asset_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Decimal>;
}
