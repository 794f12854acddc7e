//! Core error types for the cost-basis and tax engine.
//!
//! Every error here is fatal to the batch being processed: nothing is
//! caught or retried inside the crate, callers observe either a complete
//! result or one of these errors.

use chrono::{DateTime, ParseError as ChronoParseError, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::ledger::{DisposalId, LedgerEventId, LegId, LotId};

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Wallet balance violation: {0}")]
    Balance(#[from] BalanceError),

    #[error("Inventory matching failed: {0}")]
    Inventory(#[from] InventoryError),

    #[error("Price lookup failed: {0}")]
    Pricing(#[from] PricingError),

    #[error("Tax event generation failed: {0}")]
    Tax(#[from] TaxError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// A movement that would drive an (asset, wallet) balance negative.
///
/// Usually indicates missing import data (a deposit that was never
/// ingested) rather than a genuinely negative balance.
#[derive(Error, Debug, Clone, PartialEq)]
#[error(
    "insufficient balance for asset={asset_id} wallet={wallet_id} \
     attempted={attempted_quantity} available={available_balance}"
)]
pub struct BalanceError {
    pub asset_id: String,
    pub wallet_id: String,
    /// Signed delta that was rejected.
    pub attempted_quantity: Decimal,
    /// Balance just before the attempt.
    pub available_balance: Decimal,
}

/// Errors raised while matching disposals against open lots.
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("no open lots for asset {asset_id} (event {event_id}, leg {leg_id})")]
    NoOpenLots {
        asset_id: String,
        event_id: LedgerEventId,
        leg_id: LegId,
    },

    #[error(
        "ran out of inventory for asset {asset_id}: still need {shortfall} \
         (event {event_id}, leg {leg_id})"
    )]
    InsufficientInventory {
        asset_id: String,
        shortfall: Decimal,
        event_id: LedgerEventId,
        leg_id: LegId,
    },

    #[error("insufficient wallet balance applying event {event_id} leg {leg_id}: {source}")]
    InsufficientBalance {
        event_id: LedgerEventId,
        leg_id: LegId,
        #[source]
        source: BalanceError,
    },
}

/// Errors surfaced by a price provider. They propagate through the engine
/// unmodified and abort the whole batch.
#[derive(Error, Debug)]
pub enum PricingError {
    #[error("no rate available for pair {base}/{quote}")]
    UnknownPair { base: String, quote: String },

    #[error("no rate history for {base}/{quote} at {timestamp}")]
    HistoryUnavailable {
        base: String,
        quote: String,
        timestamp: DateTime<Utc>,
    },

    #[error("price lookup failed: {0}")]
    Lookup(String),
}

/// Referential problems between an inventory result and its event stream.
#[derive(Error, Debug)]
pub enum TaxError {
    #[error("unknown disposal leg {0}")]
    UnknownDisposalLeg(LegId),

    #[error("unknown acquisition leg {0}")]
    UnknownAcquisitionLeg(LegId),

    #[error("unknown lot {0}")]
    UnknownLot(LotId),

    #[error("unknown disposal link {0}")]
    UnknownDisposalLink(DisposalId),

    #[error("lot {0} is not linked to a reward event")]
    NotARewardLot(LotId),
}

/// Validation errors for model construction and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Validation(ValidationError::Csv(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
