//! Ledger module - normalized event, leg, lot, and disposal-link models.

mod ledger_constants;
mod ledger_model;


pub use ledger_constants::*;
pub use ledger_model::{
    AcquisitionLot, DisposalId, DisposalLink, EventLocation, EventOrigin, EventType, LedgerEvent,
    LedgerEventId, LedgerLeg, LegId, LotId,
};
