use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use log::debug;
use rust_decimal::Decimal;

use crate::balances::WalletBalanceTracker;
use crate::errors::{InventoryError, Result};
use crate::inventory::inventory_model::OpenLotState;
use crate::inventory::{InventoryResult, OpenLotSnapshot};
use crate::ledger::{AcquisitionLot, DisposalLink, EventType, LedgerEvent, LedgerLeg};
use crate::pricing::PriceProviderTrait;

/// Sign a quote leg must carry to be a pricing candidate.
#[derive(Clone, Copy, PartialEq)]
enum QuoteLegSign {
    /// Money paid out: prices an acquisition.
    Paid,
    /// Money received: prices a disposal.
    Received,
}

/// Creates acquisition lots and FIFO disposal links from ordered ledger
/// events, checking wallet solvency along the way.
///
/// The caller provides events already sorted ascending by timestamp; the
/// engine treats input order as ground truth and never re-sorts. Lots are
/// pooled per asset (not per wallet): moving an asset between the user's
/// own wallets is a relabeling, not a disposal, so `Transfer` events touch
/// wallet balances only.
///
/// One engine instance covers exactly one batch: `process` consumes the
/// engine, so reusing accumulated state for a second independent batch is
/// ruled out at the type level.
pub struct InventoryEngine {
    price_provider: Arc<dyn PriceProviderTrait>,
    quote_asset: String,
    tracker: WalletBalanceTracker,
    inventory: HashMap<String, VecDeque<OpenLotState>>,
}

impl InventoryEngine {
    pub fn new(price_provider: Arc<dyn PriceProviderTrait>, quote_asset: impl Into<String>) -> Self {
        InventoryEngine {
            price_provider,
            quote_asset: quote_asset.into(),
            tracker: WalletBalanceTracker::new(),
            inventory: HashMap::new(),
        }
    }

    /// Transforms ordered ledger events into lots, disposal links, and
    /// open-inventory snapshots.
    ///
    /// All-or-nothing: the first wallet balance violation or matching
    /// shortfall aborts the batch and no [`InventoryResult`] is produced.
    pub fn process(mut self, events: &[LedgerEvent]) -> Result<InventoryResult> {
        debug!("Processing {} ledger events", events.len());

        let mut acquisitions: Vec<AcquisitionLot> = Vec::new();
        let mut disposals: Vec<DisposalLink> = Vec::new();

        for event in events {
            self.apply_balance_movements(event)?;

            // Transfers never create or consume cost-basis lots.
            if event.event_type == EventType::Transfer {
                continue;
            }

            let mut acquisition_legs: Vec<&LedgerLeg> = Vec::new();
            let mut disposal_legs: Vec<&LedgerLeg> = Vec::new();
            for leg in &event.legs {
                if leg.asset_id == self.quote_asset {
                    continue;
                }
                // A fee paid in-kind is itself a disposal of that asset, so
                // fee legs stay in the partition.
                if leg.quantity > Decimal::ZERO {
                    acquisition_legs.push(leg);
                } else {
                    disposal_legs.push(leg);
                }
            }

            for leg in acquisition_legs {
                let cost_per_unit = self.resolve_cost_per_unit(event, leg)?;
                let lot = AcquisitionLot::new(leg.id, cost_per_unit)?;
                self.push_open_lot(OpenLotState {
                    lot_id: lot.id,
                    asset_id: leg.asset_id.clone(),
                    acquired_timestamp: event.timestamp,
                    remaining_quantity: leg.quantity,
                    cost_per_unit,
                });
                acquisitions.push(lot);
            }

            for leg in disposal_legs {
                let proceeds_per_unit = self.resolve_proceeds_per_unit(event, leg)?;
                self.match_disposal(event, leg, proceeds_per_unit, &mut disposals)?;
            }
        }

        let mut open_inventory: Vec<OpenLotSnapshot> = self
            .inventory
            .values()
            .flat_map(|queue| queue.iter().map(OpenLotSnapshot::from))
            .collect();
        open_inventory.sort_by(|a, b| {
            a.asset_id
                .cmp(&b.asset_id)
                .then(a.acquired_timestamp.cmp(&b.acquired_timestamp))
        });

        Ok(InventoryResult {
            acquisition_lots: acquisitions,
            disposal_links: disposals,
            open_inventory,
        })
    }

    /// Applies every non-quote leg to the wallet tracker. This runs for
    /// every event type, transfers included, so solvency is checked
    /// uniformly.
    fn apply_balance_movements(&mut self, event: &LedgerEvent) -> Result<()> {
        for leg in &event.legs {
            if leg.asset_id == self.quote_asset {
                continue;
            }
            self.tracker
                .apply_movement(&leg.asset_id, &leg.wallet_id, leg.quantity)
                .map_err(|source| InventoryError::InsufficientBalance {
                    event_id: event.id,
                    leg_id: leg.id,
                    source,
                })?;
        }
        Ok(())
    }

    fn resolve_cost_per_unit(&self, event: &LedgerEvent, leg: &LedgerLeg) -> Result<Decimal> {
        if let Some(quote_leg) = self.find_unique_quote_leg(event, QuoteLegSign::Paid) {
            return Ok(quote_leg.quantity.abs() / leg.quantity);
        }
        self.price_provider
            .rate(&leg.asset_id, &self.quote_asset, event.timestamp)
    }

    fn resolve_proceeds_per_unit(&self, event: &LedgerEvent, leg: &LedgerLeg) -> Result<Decimal> {
        if let Some(quote_leg) = self.find_unique_quote_leg(event, QuoteLegSign::Received) {
            return Ok(quote_leg.quantity.abs() / leg.quantity.abs());
        }
        self.price_provider
            .rate(&leg.asset_id, &self.quote_asset, event.timestamp)
    }

    /// Locates the single non-fee quote-currency leg with the expected
    /// sign. None when zero or several candidates exist - ambiguous events
    /// fall back to the price provider instead of guessing.
    fn find_unique_quote_leg<'a>(
        &self,
        event: &'a LedgerEvent,
        sign: QuoteLegSign,
    ) -> Option<&'a LedgerLeg> {
        let mut matches = event.legs.iter().filter(|leg| {
            !leg.is_fee
                && leg.asset_id == self.quote_asset
                && match sign {
                    QuoteLegSign::Paid => leg.quantity < Decimal::ZERO,
                    QuoteLegSign::Received => leg.quantity > Decimal::ZERO,
                }
        });
        let first = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        Some(first)
    }

    /// Inserts a lot state keeping the queue ordered ascending by
    /// acquisition timestamp. Normally an append since input is
    /// time-ordered; the scan tolerates same-timestamp interleavings.
    fn push_open_lot(&mut self, state: OpenLotState) {
        let queue = self.inventory.entry(state.asset_id.clone()).or_default();
        let index = queue
            .iter()
            .rposition(|open| open.acquired_timestamp <= state.acquired_timestamp)
            .map_or(0, |i| i + 1);
        queue.insert(index, state);
    }

    /// FIFO-matches one disposal leg against the asset's open lots,
    /// emitting one link per consumed slice.
    fn match_disposal(
        &mut self,
        event: &LedgerEvent,
        leg: &LedgerLeg,
        proceeds_per_unit: Decimal,
        disposals: &mut Vec<DisposalLink>,
    ) -> Result<()> {
        let mut qty_to_match = leg.quantity.abs();

        let queue = match self.inventory.get_mut(&leg.asset_id) {
            Some(queue) if !queue.is_empty() => queue,
            _ => {
                return Err(InventoryError::NoOpenLots {
                    asset_id: leg.asset_id.clone(),
                    event_id: event.id,
                    leg_id: leg.id,
                }
                .into())
            }
        };

        while qty_to_match > Decimal::ZERO {
            let Some(front) = queue.front_mut() else {
                return Err(InventoryError::InsufficientInventory {
                    asset_id: leg.asset_id.clone(),
                    shortfall: qty_to_match,
                    event_id: event.id,
                    leg_id: leg.id,
                }
                .into());
            };

            let take = qty_to_match.min(front.remaining_quantity);
            disposals.push(DisposalLink::new(
                leg.id,
                front.lot_id,
                take,
                proceeds_per_unit * take,
            )?);

            front.remaining_quantity -= take;
            qty_to_match -= take;

            if front.remaining_quantity.is_zero() {
                queue.pop_front();
            }
        }
        Ok(())
    }
}
