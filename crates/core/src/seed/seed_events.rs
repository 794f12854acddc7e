use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::SEED_INGESTION_SOURCE;
use crate::errors::{Result, ValidationError};
use crate::ledger::{EventLocation, EventOrigin, EventType, LedgerEvent, LedgerLeg};

/// Acquisition timestamp used when a seed row carries none. Far enough in
/// the past that seeded lots are always the oldest in their queue and
/// always past the tax-free window.
fn default_seed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
}

const DEFAULT_SEED_COST_TOTAL: Decimal = dec!(0.0001);

const REQUIRED_COLUMNS: [&str; 3] = ["asset_id", "wallet_id", "quantity"];

/// Loads synthetic acquisition events seeded via CSV.
///
/// Each row contains `asset_id,wallet_id,quantity[,timestamp][,cost_total]
/// [,note]` and becomes a trade event with an asset leg and a matching
/// negative quote leg. Seed events repair import gaps (an exchange export
/// that starts after the user's first acquisition) so the engine has
/// inventory to match early disposals against. A missing file yields an
/// empty list.
pub fn load_seed_events(path: &Path, quote_asset: &str) -> Result<Vec<LedgerEvent>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::InvalidInput(format!(
            "Seed CSV {} missing required columns: {}",
            path.display(),
            missing.join(", ")
        ))
        .into());
    }

    let column_index =
        |name: &str| -> Option<usize> { headers.iter().position(|header| header == name) };
    let asset_idx = column_index("asset_id").unwrap_or_default();
    let wallet_idx = column_index("wallet_id").unwrap_or_default();
    let quantity_idx = column_index("quantity").unwrap_or_default();
    let timestamp_idx = column_index("timestamp").or_else(|| column_index("acquired_timestamp"));
    let cost_idx = column_index("cost_total");

    let mut events: Vec<LedgerEvent> = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;

        let asset_id = record.get(asset_idx).unwrap_or_default().trim();
        let wallet_id = record.get(wallet_idx).unwrap_or_default().trim();
        let quantity = Decimal::from_str(record.get(quantity_idx).unwrap_or_default().trim())
            .map_err(ValidationError::DecimalParse)?;

        let timestamp = match timestamp_idx.and_then(|idx| record.get(idx)).map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_timestamp(raw)?,
            _ => default_seed_timestamp(),
        };
        let cost_total = match cost_idx.and_then(|idx| record.get(idx)).map(str::trim) {
            Some(raw) if !raw.is_empty() => {
                Decimal::from_str(raw).map_err(ValidationError::DecimalParse)?
            }
            _ => DEFAULT_SEED_COST_TOTAL,
        };

        events.push(LedgerEvent::new(
            timestamp,
            EventOrigin::new(EventLocation::Internal, format!("seed-{}", row + 1))?,
            SEED_INGESTION_SOURCE,
            EventType::Trade,
            vec![
                LedgerLeg::new(asset_id, quantity, wallet_id)?,
                LedgerLeg::new(quote_asset, -cost_total, wallet_id)?,
            ],
        )?);
    }

    debug!("Loaded {} seed events from {}", events.len(), path.display());
    Ok(events)
}

/// Accepts RFC 3339 instants or bare dates (taken as UTC midnight).
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(ValidationError::DateTimeParse)?;
    Ok(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default()))
}
