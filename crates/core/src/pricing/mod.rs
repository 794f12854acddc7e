//! Pricing module - the rate-lookup seam the engine depends on.

mod pricing_model;
mod pricing_traits;

pub use pricing_model::FixedPriceProvider;
pub use pricing_traits::PriceProviderTrait;
