use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Duration};
use log::debug;
use rust_decimal::Decimal;

use crate::errors::{Result, TaxError};
use crate::inventory::InventoryResult;
use crate::ledger::{
    AcquisitionLot, DisposalId, DisposalLink, EventType, LedgerEvent, LedgerLeg, LegId, LotId,
};
use crate::tax::{TaxEvent, TaxEventKind, TaxEventSource, WeeklyTaxSummary};

struct LedgerIndex<'a> {
    legs_by_id: HashMap<LegId, &'a LedgerLeg>,
    leg_to_event: HashMap<LegId, &'a LedgerEvent>,
}

impl<'a> LedgerIndex<'a> {
    fn build(events: &'a [LedgerEvent]) -> Self {
        let mut legs_by_id = HashMap::new();
        let mut leg_to_event = HashMap::new();
        for event in events {
            for leg in &event.legs {
                legs_by_id.insert(leg.id, leg);
                leg_to_event.insert(leg.id, event);
            }
        }
        LedgerIndex {
            legs_by_id,
            leg_to_event,
        }
    }

    fn leg(&self, id: LegId) -> Option<&'a LedgerLeg> {
        self.legs_by_id.get(&id).copied()
    }

    fn owning_event(&self, id: LegId) -> Option<&'a LedgerEvent> {
        self.leg_to_event.get(&id).copied()
    }
}

/// Creates taxable events from disposals and reward acquisitions.
///
/// Disposals whose holding period reaches `tax_free_days` are exempt (the
/// boundary itself is exempt). Reward lots are taxed in full at receipt
/// regardless of how long they are later held.
pub fn generate_tax_events(
    inventory_result: &InventoryResult,
    events: &[LedgerEvent],
    tax_free_days: i64,
) -> Result<Vec<TaxEvent>> {
    debug!(
        "Generating tax events from {} disposal links and {} lots",
        inventory_result.disposal_links.len(),
        inventory_result.acquisition_lots.len()
    );

    let index = LedgerIndex::build(events);
    let lots_by_id: HashMap<LotId, &AcquisitionLot> = inventory_result
        .acquisition_lots
        .iter()
        .map(|lot| (lot.id, lot))
        .collect();

    let tax_free_threshold = Duration::days(tax_free_days);
    let mut tax_events: Vec<TaxEvent> = Vec::new();

    for link in &inventory_result.disposal_links {
        let disposal_event = index
            .owning_event(link.disposal_leg_id)
            .ok_or(TaxError::UnknownDisposalLeg(link.disposal_leg_id))?;
        let lot = lots_by_id
            .get(&link.lot_id)
            .ok_or(TaxError::UnknownLot(link.lot_id))?;
        let acquisition_event = index
            .owning_event(lot.acquired_leg_id)
            .ok_or(TaxError::UnknownAcquisitionLeg(lot.acquired_leg_id))?;

        // Long-term holding exemption, boundary inclusive.
        if disposal_event.timestamp - acquisition_event.timestamp >= tax_free_threshold {
            continue;
        }

        let cost_basis = link.quantity_used * lot.cost_per_unit;
        tax_events.push(TaxEvent {
            source_id: TaxEventSource::Disposal(link.id),
            kind: TaxEventKind::Disposal,
            taxable_gain: link.proceeds_total - cost_basis,
        });
    }

    for lot in &inventory_result.acquisition_lots {
        let acquisition_leg = index
            .leg(lot.acquired_leg_id)
            .ok_or(TaxError::UnknownAcquisitionLeg(lot.acquired_leg_id))?;
        let acquisition_event = index
            .owning_event(lot.acquired_leg_id)
            .ok_or(TaxError::UnknownAcquisitionLeg(lot.acquired_leg_id))?;

        if acquisition_event.event_type != EventType::Reward {
            continue;
        }

        // Nothing was paid for the reward, so the full fair-market value
        // at receipt is the gain.
        tax_events.push(TaxEvent {
            source_id: TaxEventSource::Lot(lot.id),
            kind: TaxEventKind::Reward,
            taxable_gain: acquisition_leg.quantity * lot.cost_per_unit,
        });
    }

    Ok(tax_events)
}

/// Aggregates taxable events per Monday-aligned week, re-deriving each
/// event's timestamp and proceeds/cost/gain from the inventory result and
/// event stream rather than trusting anything cached on the tax event.
pub fn compute_weekly_tax_summary(
    tax_events: &[TaxEvent],
    inventory_result: &InventoryResult,
    events: &[LedgerEvent],
) -> Result<Vec<WeeklyTaxSummary>> {
    let index = LedgerIndex::build(events);
    let lots_by_id: HashMap<LotId, &AcquisitionLot> = inventory_result
        .acquisition_lots
        .iter()
        .map(|lot| (lot.id, lot))
        .collect();
    let links_by_id: HashMap<DisposalId, &DisposalLink> = inventory_result
        .disposal_links
        .iter()
        .map(|link| (link.id, link))
        .collect();

    // (count, proceeds, cost basis, gain) keyed by week start.
    let mut weekly_totals: BTreeMap<chrono::NaiveDate, (usize, Decimal, Decimal, Decimal)> =
        BTreeMap::new();

    for tax_event in tax_events {
        let (proceeds, cost_basis, gain, timestamp) = match tax_event.source_id {
            TaxEventSource::Disposal(link_id) => {
                let link = links_by_id
                    .get(&link_id)
                    .ok_or(TaxError::UnknownDisposalLink(link_id))?;
                let lot = lots_by_id
                    .get(&link.lot_id)
                    .ok_or(TaxError::UnknownLot(link.lot_id))?;
                let disposal_event = index
                    .owning_event(link.disposal_leg_id)
                    .ok_or(TaxError::UnknownDisposalLeg(link.disposal_leg_id))?;

                let cost_basis = link.quantity_used * lot.cost_per_unit;
                (
                    link.proceeds_total,
                    cost_basis,
                    link.proceeds_total - cost_basis,
                    disposal_event.timestamp,
                )
            }
            TaxEventSource::Lot(lot_id) => {
                let lot = lots_by_id.get(&lot_id).ok_or(TaxError::UnknownLot(lot_id))?;
                let acquisition_leg = index
                    .leg(lot.acquired_leg_id)
                    .ok_or(TaxError::UnknownAcquisitionLeg(lot.acquired_leg_id))?;
                let acquisition_event = index
                    .owning_event(lot.acquired_leg_id)
                    .ok_or(TaxError::UnknownAcquisitionLeg(lot.acquired_leg_id))?;
                if acquisition_event.event_type != EventType::Reward {
                    return Err(TaxError::NotARewardLot(lot_id).into());
                }

                let proceeds = acquisition_leg.quantity * lot.cost_per_unit;
                (
                    proceeds,
                    Decimal::ZERO,
                    proceeds,
                    acquisition_event.timestamp,
                )
            }
        };

        let date = timestamp.date_naive();
        let week_start = date - Duration::days(date.weekday().num_days_from_monday() as i64);

        let totals = weekly_totals.entry(week_start).or_insert((
            0,
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
        ));
        totals.0 += 1;
        totals.1 += proceeds;
        totals.2 += cost_basis;
        totals.3 += gain;
    }

    Ok(weekly_totals
        .into_iter()
        .map(
            |(week_start, (count, proceeds, cost_basis, gain))| WeeklyTaxSummary {
                week_start,
                week_end: week_start + Duration::days(6),
                taxable_events: count,
                proceeds,
                cost_basis,
                taxable_gain: gain,
            },
        )
        .collect())
}
