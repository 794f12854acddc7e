use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::inventory::OpenLotSnapshot;
use crate::pricing::PriceProviderTrait;
use crate::reports::{AssetInventorySummary, InventorySummary};
use crate::tax::WeeklyTaxSummary;
use crate::utils::{format_currency, format_decimal};

/// Values the open inventory at `as_of`, splitting each asset's quantity
/// into the portion already past the tax-free window and the portion
/// still taxable if disposed now.
pub fn compute_inventory_summary(
    open_inventory: &[OpenLotSnapshot],
    price_provider: &dyn PriceProviderTrait,
    quote_asset: &str,
    as_of: DateTime<Utc>,
    tax_free_days: i64,
) -> Result<InventorySummary> {
    let tax_free_cutoff = as_of - Duration::days(tax_free_days);

    // (total quantity, tax-free quantity, open lot count) per asset.
    let mut accumulators: BTreeMap<&str, (Decimal, Decimal, usize)> = BTreeMap::new();
    for lot in open_inventory {
        if lot.quantity_remaining <= Decimal::ZERO {
            continue;
        }
        let entry = accumulators
            .entry(lot.asset_id.as_str())
            .or_insert((Decimal::ZERO, Decimal::ZERO, 0));
        entry.0 += lot.quantity_remaining;
        if lot.acquired_timestamp <= tax_free_cutoff {
            entry.1 += lot.quantity_remaining;
        }
        entry.2 += 1;
    }

    let mut assets: Vec<AssetInventorySummary> = Vec::new();
    let mut total_value = Decimal::ZERO;
    let mut total_tax_free_value = Decimal::ZERO;

    for (asset_id, (total_quantity, tax_free_quantity, lots)) in accumulators {
        let rate = price_provider.rate(asset_id, quote_asset, as_of)?;
        let value_total = total_quantity * rate;
        let value_tax_free = tax_free_quantity * rate;

        total_value += value_total;
        total_tax_free_value += value_tax_free;

        assets.push(AssetInventorySummary {
            asset_id: asset_id.to_string(),
            total_quantity,
            tax_free_quantity,
            taxable_quantity: total_quantity - tax_free_quantity,
            total_value: value_total,
            tax_free_value: value_tax_free,
            taxable_value: value_total - value_tax_free,
            lots,
        });
    }

    Ok(InventorySummary {
        as_of,
        assets,
        total_value,
        total_tax_free_value,
    })
}

fn column_width(label: &str, cells: impl Iterator<Item = usize>) -> usize {
    cells.fold(label.len(), usize::max)
}

/// Renders the inventory summary as an aligned text table.
pub fn render_inventory_summary(summary: &InventorySummary, quote_asset: &str) -> String {
    let mut lines = vec![format!("Open inventory by asset ({}):", quote_asset)];
    if summary.assets.is_empty() {
        lines.push("  (empty)".to_string());
        return lines.join("\n");
    }

    let quantity_label = "Quantity (total/free/taxable)";
    let value_label = "Value (total/free/taxable)";

    let rows: Vec<(String, String, String, String)> = summary
        .assets
        .iter()
        .map(|asset| {
            let quantities = format!(
                "{} / {} / {}",
                format_decimal(asset.total_quantity),
                format_decimal(asset.tax_free_quantity),
                format_decimal(asset.taxable_quantity)
            );
            let values = format!(
                "{} / {} / {}",
                format_currency(asset.total_value),
                format_currency(asset.tax_free_value),
                format_currency(asset.taxable_value)
            );
            (
                asset.asset_id.clone(),
                quantities,
                values,
                asset.lots.to_string(),
            )
        })
        .collect();

    let asset_width = column_width("Asset", rows.iter().map(|r| r.0.len()));
    let quantity_width = column_width(quantity_label, rows.iter().map(|r| r.1.len()));
    let value_width = column_width(value_label, rows.iter().map(|r| r.2.len()));
    let lots_width = column_width("Lots", rows.iter().map(|r| r.3.len()));

    let header = format!(
        "{:<asset_width$} {:>quantity_width$} {:>value_width$} {:>lots_width$}",
        "Asset", quantity_label, value_label, "Lots"
    );
    let separator = "-".repeat(header.len());
    lines.push(header);
    lines.push(separator.clone());

    for (asset_id, quantities, values, lots) in &rows {
        lines.push(format!(
            "{:<asset_width$} {:>quantity_width$} {:>value_width$} {:>lots_width$}",
            asset_id, quantities, values, lots
        ));
    }

    lines.push(separator);
    let totals = format!(
        "{} / {} / {}",
        format_currency(summary.total_value),
        format_currency(summary.total_tax_free_value),
        format_currency(summary.total_taxable_value())
    );
    lines.push(format!(
        "{:<asset_width$} {:>quantity_width$} {:>value_width$} {:>lots_width$}",
        "TOTAL", "", totals, ""
    ));

    lines.join("\n")
}

/// Renders weekly taxable totals as an aligned text table.
pub fn render_weekly_tax_summary(weeks: &[WeeklyTaxSummary], quote_asset: &str) -> String {
    let mut lines = vec![format!("Weekly taxable totals ({}):", quote_asset)];
    if weeks.is_empty() {
        lines.push("  (no taxable events)".to_string());
        return lines.join("\n");
    }

    let rows: Vec<(String, String, String, String, String)> = weeks
        .iter()
        .map(|week| {
            (
                format!("{} -> {}", week.week_start, week.week_end),
                week.taxable_events.to_string(),
                format_currency(week.proceeds),
                format_currency(week.cost_basis),
                format_currency(week.taxable_gain),
            )
        })
        .collect();

    let week_width = column_width("Week", rows.iter().map(|r| r.0.len()));
    let count_width = column_width("Events", rows.iter().map(|r| r.1.len()));
    let proceeds_width = column_width("Proceeds", rows.iter().map(|r| r.2.len()));
    let cost_width = column_width("Cost basis", rows.iter().map(|r| r.3.len()));
    let gain_width = column_width("Taxable gain", rows.iter().map(|r| r.4.len()));

    let header = format!(
        "{:<week_width$} {:>count_width$} {:>proceeds_width$} {:>cost_width$} {:>gain_width$}",
        "Week", "Events", "Proceeds", "Cost basis", "Taxable gain"
    );
    let separator = "-".repeat(header.len());
    lines.push(header);
    lines.push(separator);

    for (week, count, proceeds, cost, gain) in &rows {
        lines.push(format!(
            "{:<week_width$} {:>count_width$} {:>proceeds_width$} {:>cost_width$} {:>gain_width$}",
            week, count, proceeds, cost, gain
        ));
    }

    lines.join("\n")
}
