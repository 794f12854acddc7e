use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Result, ValidationError};

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(
    /// Identifier of a ledger event.
    LedgerEventId
);
define_id!(
    /// Identifier of a single leg within a ledger event.
    LegId
);
define_id!(
    /// Identifier of an acquisition lot.
    LotId
);
define_id!(
    /// Identifier of a disposal link.
    DisposalId
);

/// Classification of a ledger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Trade,
    Deposit,
    Withdrawal,
    Transfer,
    Reward,
    Operation,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        use crate::ledger::ledger_constants::*;
        match self {
            EventType::Trade => EVENT_TYPE_TRADE,
            EventType::Deposit => EVENT_TYPE_DEPOSIT,
            EventType::Withdrawal => EVENT_TYPE_WITHDRAWAL,
            EventType::Transfer => EVENT_TYPE_TRANSFER,
            EventType::Reward => EVENT_TYPE_REWARD,
            EventType::Operation => EVENT_TYPE_OPERATION,
        }
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        use crate::ledger::ledger_constants::*;
        match s {
            s if s == EVENT_TYPE_TRADE => Ok(EventType::Trade),
            s if s == EVENT_TYPE_DEPOSIT => Ok(EventType::Deposit),
            s if s == EVENT_TYPE_WITHDRAWAL => Ok(EventType::Withdrawal),
            s if s == EVENT_TYPE_TRANSFER => Ok(EventType::Transfer),
            s if s == EVENT_TYPE_REWARD => Ok(EventType::Reward),
            s if s == EVENT_TYPE_OPERATION => Ok(EventType::Operation),
            _ => Err(format!("Unknown event type: {}", s)),
        }
    }
}

/// Venue or chain an event was observed on. Used for traceability only,
/// never for matching logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventLocation {
    Ethereum,
    Arbitrum,
    Base,
    Optimism,
    Kraken,
    Coinbase,
    Binance,
    Internal,
}

impl EventLocation {
    pub fn as_str(&self) -> &'static str {
        use crate::ledger::ledger_constants::*;
        match self {
            EventLocation::Ethereum => LOCATION_ETHEREUM,
            EventLocation::Arbitrum => LOCATION_ARBITRUM,
            EventLocation::Base => LOCATION_BASE,
            EventLocation::Optimism => LOCATION_OPTIMISM,
            EventLocation::Kraken => LOCATION_KRAKEN,
            EventLocation::Coinbase => LOCATION_COINBASE,
            EventLocation::Binance => LOCATION_BINANCE,
            EventLocation::Internal => LOCATION_INTERNAL,
        }
    }
}

impl FromStr for EventLocation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        use crate::ledger::ledger_constants::*;
        match s {
            s if s == LOCATION_ETHEREUM => Ok(EventLocation::Ethereum),
            s if s == LOCATION_ARBITRUM => Ok(EventLocation::Arbitrum),
            s if s == LOCATION_BASE => Ok(EventLocation::Base),
            s if s == LOCATION_OPTIMISM => Ok(EventLocation::Optimism),
            s if s == LOCATION_KRAKEN => Ok(EventLocation::Kraken),
            s if s == LOCATION_COINBASE => Ok(EventLocation::Coinbase),
            s if s == LOCATION_BINANCE => Ok(EventLocation::Binance),
            s if s == LOCATION_INTERNAL => Ok(EventLocation::Internal),
            _ => Err(format!("Unknown event location: {}", s)),
        }
    }
}

/// Where an event came from, with the identifier assigned by that venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventOrigin {
    pub location: EventLocation,
    pub external_id: String,
}

impl EventOrigin {
    pub fn new(location: EventLocation, external_id: impl Into<String>) -> Result<Self> {
        let external_id = external_id.into();
        if external_id.is_empty() {
            return Err(ValidationError::MissingField("external_id".to_string()).into());
        }
        Ok(EventOrigin {
            location,
            external_id,
        })
    }
}

/// A single signed quantity movement of one asset in one wallet.
///
/// Quantity sign convention:
/// - Positive quantity indicates an asset/position increase.
/// - Negative quantity indicates an asset/position decrease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerLeg {
    pub id: LegId,
    pub asset_id: String,
    pub quantity: Decimal,
    pub wallet_id: String,
    pub is_fee: bool,
}

impl LedgerLeg {
    pub fn new(
        asset_id: impl Into<String>,
        quantity: Decimal,
        wallet_id: impl Into<String>,
    ) -> Result<Self> {
        Self::build(asset_id, quantity, wallet_id, false)
    }

    /// A leg flagged as a fee. Fee legs still move balances and, when
    /// denominated in a non-quote asset, still consume inventory.
    pub fn new_fee(
        asset_id: impl Into<String>,
        quantity: Decimal,
        wallet_id: impl Into<String>,
    ) -> Result<Self> {
        Self::build(asset_id, quantity, wallet_id, true)
    }

    fn build(
        asset_id: impl Into<String>,
        quantity: Decimal,
        wallet_id: impl Into<String>,
        is_fee: bool,
    ) -> Result<Self> {
        // Zero-quantity legs are not meaningful in the ledger.
        if quantity.is_zero() {
            return Err(ValidationError::InvalidInput(
                "LedgerLeg quantity must be non-zero".to_string(),
            )
            .into());
        }
        Ok(LedgerLeg {
            id: LegId::new(),
            asset_id: asset_id.into(),
            quantity,
            wallet_id: wallet_id.into(),
            is_fee,
        })
    }
}

/// One normalized ledger entry: a timestamped set of legs that together
/// describe a trade, deposit, withdrawal, transfer, reward, or on-chain
/// operation. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEvent {
    pub id: LedgerEventId,
    pub timestamp: DateTime<Utc>,
    pub origin: EventOrigin,
    pub ingestion: String,
    pub event_type: EventType,
    pub legs: Vec<LedgerLeg>,
}

impl LedgerEvent {
    pub fn new(
        timestamp: DateTime<Utc>,
        origin: EventOrigin,
        ingestion: impl Into<String>,
        event_type: EventType,
        legs: Vec<LedgerLeg>,
    ) -> Result<Self> {
        let ingestion = ingestion.into();
        if legs.is_empty() {
            return Err(ValidationError::InvalidInput(
                "LedgerEvent must have at least one leg".to_string(),
            )
            .into());
        }
        if ingestion.is_empty() {
            return Err(ValidationError::MissingField("ingestion".to_string()).into());
        }
        Ok(LedgerEvent {
            id: LedgerEventId::new(),
            timestamp,
            origin,
            ingestion,
            event_type,
            legs,
        })
    }
}

/// A specific acquired quantity of an asset carrying its own cost basis,
/// expressed in quote-currency units per unit of asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionLot {
    pub id: LotId,
    pub acquired_leg_id: LegId,
    pub cost_per_unit: Decimal,
}

impl AcquisitionLot {
    pub fn new(acquired_leg_id: LegId, cost_per_unit: Decimal) -> Result<Self> {
        if cost_per_unit.is_sign_negative() {
            return Err(ValidationError::InvalidInput(
                "AcquisitionLot cost_per_unit must be >= 0".to_string(),
            )
            .into());
        }
        Ok(AcquisitionLot {
            id: LotId::new(),
            acquired_leg_id,
            cost_per_unit,
        })
    }
}

/// One slice of a disposal matched against one lot. A disposal leg that
/// spans several lots produces several links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisposalLink {
    pub id: DisposalId,
    pub disposal_leg_id: LegId,
    pub lot_id: LotId,
    pub quantity_used: Decimal,
    pub proceeds_total: Decimal,
}

impl DisposalLink {
    pub fn new(
        disposal_leg_id: LegId,
        lot_id: LotId,
        quantity_used: Decimal,
        proceeds_total: Decimal,
    ) -> Result<Self> {
        if quantity_used <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(
                "DisposalLink quantity_used must be > 0".to_string(),
            )
            .into());
        }
        if proceeds_total.is_sign_negative() {
            return Err(ValidationError::InvalidInput(
                "DisposalLink proceeds_total must be >= 0".to_string(),
            )
            .into());
        }
        Ok(DisposalLink {
            id: DisposalId::new(),
            disposal_leg_id,
            lot_id,
            quantity_used,
            proceeds_total,
        })
    }
}
