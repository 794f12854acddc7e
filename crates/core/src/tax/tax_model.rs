use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{DisposalId, LotId};

/// What a taxable event was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "sourceType", content = "id", rename_all = "camelCase")]
pub enum TaxEventSource {
    /// A disposal link: gain realized against the consumed lot's basis.
    Disposal(DisposalId),
    /// An acquisition lot created by a reward: income taxed at receipt.
    Lot(LotId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxEventKind {
    Disposal,
    Reward,
}

/// One taxable event. `taxable_gain` is signed; disposals can realize a
/// capital loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxEvent {
    pub source_id: TaxEventSource,
    pub kind: TaxEventKind,
    pub taxable_gain: Decimal,
}

/// Additive aggregates over one Monday-aligned week. Weeks without
/// taxable events are omitted from summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTaxSummary {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub taxable_events: usize,
    pub proceeds: Decimal,
    pub cost_basis: Decimal,
    pub taxable_gain: Decimal,
}
