/// Quote asset used for cost basis and proceeds when none is configured
pub const DEFAULT_QUOTE_ASSET: &str = "EUR";

/// Holding period (in days) after which a disposal is exempt from tax
pub const DEFAULT_TAX_FREE_DAYS: i64 = 365;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Ingestion tag attached to synthetic seed events
pub const SEED_INGESTION_SOURCE: &str = "seed-csv";
