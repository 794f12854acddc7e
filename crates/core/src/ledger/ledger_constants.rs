// Event type string representations
pub const EVENT_TYPE_TRADE: &str = "TRADE";
pub const EVENT_TYPE_DEPOSIT: &str = "DEPOSIT";
pub const EVENT_TYPE_WITHDRAWAL: &str = "WITHDRAWAL";
pub const EVENT_TYPE_TRANSFER: &str = "TRANSFER";
pub const EVENT_TYPE_REWARD: &str = "REWARD";
pub const EVENT_TYPE_OPERATION: &str = "OPERATION";

// Event location string representations
pub const LOCATION_ETHEREUM: &str = "ETHEREUM";
pub const LOCATION_ARBITRUM: &str = "ARBITRUM";
pub const LOCATION_BASE: &str = "BASE";
pub const LOCATION_OPTIMISM: &str = "OPTIMISM";
pub const LOCATION_KRAKEN: &str = "KRAKEN";
pub const LOCATION_COINBASE: &str = "COINBASE";
pub const LOCATION_BINANCE: &str = "BINANCE";
pub const LOCATION_INTERNAL: &str = "INTERNAL";
