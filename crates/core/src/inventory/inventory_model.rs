use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{AcquisitionLot, DisposalLink, LotId};

/// Mutable working state of one open lot while a batch is processed.
/// Consumed down by FIFO matching; dropped from its queue at zero.
#[derive(Debug, Clone)]
pub(crate) struct OpenLotState {
    pub lot_id: LotId,
    pub asset_id: String,
    pub acquired_timestamp: DateTime<Utc>,
    pub remaining_quantity: Decimal,
    pub cost_per_unit: Decimal,
}

/// Read-only projection of an open lot at end of processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenLotSnapshot {
    pub lot_id: LotId,
    pub asset_id: String,
    pub acquired_timestamp: DateTime<Utc>,
    pub quantity_remaining: Decimal,
    pub cost_per_unit: Decimal,
}

impl From<&OpenLotState> for OpenLotSnapshot {
    fn from(state: &OpenLotState) -> Self {
        OpenLotSnapshot {
            lot_id: state.lot_id,
            asset_id: state.asset_id.clone(),
            acquired_timestamp: state.acquired_timestamp,
            quantity_remaining: state.remaining_quantity,
            cost_per_unit: state.cost_per_unit,
        }
    }
}

/// Complete output of one `process()` call. Either fully populated or
/// never constructed - there is no partial-commit mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryResult {
    pub acquisition_lots: Vec<AcquisitionLot>,
    pub disposal_links: Vec<DisposalLink>,
    /// Sorted by (asset_id, acquired_timestamp) ascending.
    pub open_inventory: Vec<OpenLotSnapshot>,
}
