//! Tests for the FIFO cost-basis inventory engine.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal_macros::dec;

    use crate::errors::{Error, InventoryError};
    use crate::inventory::InventoryEngine;
    use crate::ledger::{EventLocation, EventOrigin, EventType, LedgerEvent, LedgerLeg};
    use crate::pricing::FixedPriceProvider;

    const WALLET: &str = "wallet";

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, day, hour, 0, 0).unwrap()
    }

    fn event(
        timestamp: DateTime<Utc>,
        event_type: EventType,
        legs: Vec<LedgerLeg>,
    ) -> LedgerEvent {
        LedgerEvent::new(
            timestamp,
            EventOrigin::new(EventLocation::Kraken, "tx").unwrap(),
            "test",
            event_type,
            legs,
        )
        .unwrap()
    }

    fn engine() -> InventoryEngine {
        InventoryEngine::new(Arc::new(FixedPriceProvider::new()), "EUR")
    }

    fn engine_with(provider: FixedPriceProvider) -> InventoryEngine {
        InventoryEngine::new(Arc::new(provider), "EUR")
    }

    fn buy(timestamp: DateTime<Utc>, quantity: &str, cost: &str) -> (LedgerEvent, LedgerLeg) {
        let leg = LedgerLeg::new("ETH", quantity.parse().unwrap(), WALLET).unwrap();
        let quote = LedgerLeg::new("EUR", format!("-{}", cost).parse().unwrap(), WALLET).unwrap();
        (
            event(timestamp, EventType::Trade, vec![leg.clone(), quote]),
            leg,
        )
    }

    fn sell(timestamp: DateTime<Utc>, quantity: &str, proceeds: &str) -> (LedgerEvent, LedgerLeg) {
        let leg = LedgerLeg::new("ETH", format!("-{}", quantity).parse().unwrap(), WALLET).unwrap();
        let quote = LedgerLeg::new("EUR", proceeds.parse().unwrap(), WALLET).unwrap();
        (
            event(timestamp, EventType::Trade, vec![leg.clone(), quote]),
            leg,
        )
    }

    #[test]
    fn fifo_matching_splits_across_lots() {
        let (buy1, buy1_leg) = buy(ts(2, 12), "1.0", "2000");
        let (buy2, buy2_leg) = buy(ts(3, 12), "0.5", "2200");
        let (sell1, sell1_leg) = sell(ts(10, 12), "0.6", "2040");
        let (sell2, sell2_leg) = sell(ts(10, 13), "0.7", "1900");

        let result = engine().process(&[buy1, buy2, sell1, sell2]).unwrap();

        assert_eq!(result.acquisition_lots.len(), 2);
        assert_eq!(result.disposal_links.len(), 3);

        let lot1 = &result.acquisition_lots[0];
        assert_eq!(lot1.acquired_leg_id, buy1_leg.id);
        assert_eq!(lot1.cost_per_unit, dec!(2000));

        let lot2 = &result.acquisition_lots[1];
        assert_eq!(lot2.acquired_leg_id, buy2_leg.id);
        assert_eq!(lot2.cost_per_unit, dec!(4400));

        // First sell fully matched against lot 1.
        let link1 = &result.disposal_links[0];
        assert_eq!(link1.disposal_leg_id, sell1_leg.id);
        assert_eq!(link1.lot_id, lot1.id);
        assert_eq!(link1.quantity_used, dec!(0.6));
        assert_eq!(link1.proceeds_total, dec!(2040));

        // Second sell drains lot 1's remaining 0.4, then takes 0.3 of lot 2.
        let per_unit = dec!(1900) / dec!(0.7);
        let link2 = &result.disposal_links[1];
        assert_eq!(link2.disposal_leg_id, sell2_leg.id);
        assert_eq!(link2.lot_id, lot1.id);
        assert_eq!(link2.quantity_used, dec!(0.4));
        assert_eq!(link2.proceeds_total, per_unit * dec!(0.4));

        let link3 = &result.disposal_links[2];
        assert_eq!(link3.disposal_leg_id, sell2_leg.id);
        assert_eq!(link3.lot_id, lot2.id);
        assert_eq!(link3.quantity_used, dec!(0.3));
        assert_eq!(link3.proceeds_total, per_unit * dec!(0.3));

        assert_eq!(result.open_inventory.len(), 1);
        let open = &result.open_inventory[0];
        assert_eq!(open.lot_id, lot2.id);
        assert_eq!(open.quantity_remaining, dec!(0.2));
    }

    #[test]
    fn reward_without_quote_leg_uses_price_provider() {
        let provider = FixedPriceProvider::new().with_rate("XYZ", "EUR", dec!(1.25));
        let reward_leg = LedgerLeg::new("XYZ", dec!(5), WALLET).unwrap();
        let reward = event(ts(4, 9), EventType::Reward, vec![reward_leg.clone()]);

        let result = engine_with(provider).process(&[reward]).unwrap();

        assert_eq!(result.acquisition_lots.len(), 1);
        let lot = &result.acquisition_lots[0];
        assert_eq!(lot.acquired_leg_id, reward_leg.id);
        assert_eq!(lot.cost_per_unit, dec!(1.25));
        assert_eq!(result.open_inventory[0].quantity_remaining, dec!(5));
    }

    #[test]
    fn unknown_pair_aborts_the_batch() {
        let reward = event(
            ts(4, 9),
            EventType::Reward,
            vec![LedgerLeg::new("XYZ", dec!(5), WALLET).unwrap()],
        );

        let err = engine().process(&[reward]).unwrap_err();
        assert!(matches!(err, Error::Pricing(_)));
    }

    #[test]
    fn transfer_moves_balances_but_not_lots() {
        let (buy1, _) = buy(ts(2, 12), "1.0", "2000");
        let transfer = event(
            ts(3, 12),
            EventType::Transfer,
            vec![
                LedgerLeg::new("ETH", dec!(-0.5), "wallet").unwrap(),
                LedgerLeg::new("ETH", dec!(0.5), "cold-storage").unwrap(),
            ],
        );

        let result = engine().process(&[buy1, transfer]).unwrap();

        // The FIFO pool is untouched: one lot, fully open, no links.
        assert_eq!(result.acquisition_lots.len(), 1);
        assert!(result.disposal_links.is_empty());
        assert_eq!(result.open_inventory.len(), 1);
        assert_eq!(result.open_inventory[0].quantity_remaining, dec!(1.0));
    }

    #[test]
    fn transfer_exceeding_balance_fails() {
        let (buy1, _) = buy(ts(2, 12), "1.0", "2000");
        let transfer = event(
            ts(3, 12),
            EventType::Transfer,
            vec![
                LedgerLeg::new("ETH", dec!(-1.5), "wallet").unwrap(),
                LedgerLeg::new("ETH", dec!(1.5), "cold-storage").unwrap(),
            ],
        );

        let err = engine().process(&[buy1, transfer]).unwrap_err();
        match err {
            Error::Inventory(InventoryError::InsufficientBalance { source, .. }) => {
                assert_eq!(source.asset_id, "ETH");
                assert_eq!(source.wallet_id, "wallet");
                assert_eq!(source.attempted_quantity, dec!(-1.5));
                assert_eq!(source.available_balance, dec!(1.0));
            }
            other => panic!("expected InsufficientBalance, got {other:?}"),
        }
    }

    #[test]
    fn disposal_without_any_lots_fails() {
        // Selling with no prior acquisition at all: the balance check trips
        // before matching even starts.
        let (sell1, sell1_leg) = sell(ts(10, 12), "0.6", "2040");
        let sell_event_id = sell1.id;

        let err = engine().process(&[sell1]).unwrap_err();
        match err {
            Error::Inventory(InventoryError::InsufficientBalance { event_id, leg_id, .. }) => {
                assert_eq!(event_id, sell_event_id);
                assert_eq!(leg_id, sell1_leg.id);
            }
            other => panic!("expected InsufficientBalance, got {other:?}"),
        }
    }

    #[test]
    fn disposal_with_balance_but_no_lots_fails_with_no_open_lots() {
        // A transfer-in gives wallet balance without creating a lot.
        let transfer = event(
            ts(2, 12),
            EventType::Transfer,
            vec![LedgerLeg::new("ETH", dec!(1), WALLET).unwrap()],
        );
        let (sell1, sell1_leg) = sell(ts(10, 12), "0.6", "2040");
        let sell_event_id = sell1.id;

        let err = engine().process(&[transfer, sell1]).unwrap_err();
        match err {
            Error::Inventory(InventoryError::NoOpenLots {
                asset_id,
                event_id,
                leg_id,
            }) => {
                assert_eq!(asset_id, "ETH");
                assert_eq!(event_id, sell_event_id);
                assert_eq!(leg_id, sell1_leg.id);
            }
            other => panic!("expected NoOpenLots, got {other:?}"),
        }
    }

    #[test]
    fn running_out_mid_match_reports_shortfall() {
        let (buy1, _) = buy(ts(2, 12), "1.0", "2000");
        // Wallet balance is fine (transfer-in adds 1 ETH with no lot), but
        // the pool only covers 1.0 of the 1.4 disposed.
        let transfer = event(
            ts(3, 12),
            EventType::Transfer,
            vec![LedgerLeg::new("ETH", dec!(1), WALLET).unwrap()],
        );
        let (sell1, _) = sell(ts(10, 12), "1.4", "3000");

        let err = engine().process(&[buy1, transfer, sell1]).unwrap_err();
        match err {
            Error::Inventory(InventoryError::InsufficientInventory {
                asset_id,
                shortfall,
                ..
            }) => {
                assert_eq!(asset_id, "ETH");
                assert_eq!(shortfall, dec!(0.4));
            }
            other => panic!("expected InsufficientInventory, got {other:?}"),
        }
    }

    #[test]
    fn in_kind_fee_leg_consumes_inventory() {
        let (buy1, _) = buy(ts(2, 12), "1.0", "2000");
        let provider = FixedPriceProvider::new().with_rate("ETH", "EUR", dec!(2100));
        // A withdrawal charging its fee in ETH: the fee leg is a disposal.
        let fee_leg = LedgerLeg::new_fee("ETH", dec!(-0.01), WALLET).unwrap();
        let withdrawal = event(ts(5, 12), EventType::Withdrawal, vec![fee_leg.clone()]);

        let result = engine_with(provider).process(&[buy1, withdrawal]).unwrap();

        assert_eq!(result.disposal_links.len(), 1);
        let link = &result.disposal_links[0];
        assert_eq!(link.disposal_leg_id, fee_leg.id);
        assert_eq!(link.quantity_used, dec!(0.01));
        // No non-fee quote leg in the event, so proceeds come from the
        // provider rate.
        assert_eq!(link.proceeds_total, dec!(2100) * dec!(0.01));
        assert_eq!(result.open_inventory[0].quantity_remaining, dec!(0.99));
    }

    #[test]
    fn fee_quote_leg_is_not_a_pricing_candidate() {
        // Payment of 2000 EUR plus a 10 EUR fee leg: the fee leg must not
        // make the quote-leg candidate set ambiguous.
        let asset_leg = LedgerLeg::new("ETH", dec!(1), WALLET).unwrap();
        let trade = event(
            ts(2, 12),
            EventType::Trade,
            vec![
                asset_leg.clone(),
                LedgerLeg::new("EUR", dec!(-2000), WALLET).unwrap(),
                LedgerLeg::new_fee("EUR", dec!(-10), WALLET).unwrap(),
            ],
        );

        let result = engine().process(&[trade]).unwrap();
        assert_eq!(result.acquisition_lots[0].cost_per_unit, dec!(2000));
    }

    #[test]
    fn ambiguous_quote_legs_fall_back_to_provider() {
        let provider = FixedPriceProvider::new().with_rate("ETH", "EUR", dec!(1950));
        let asset_leg = LedgerLeg::new("ETH", dec!(1), WALLET).unwrap();
        let trade = event(
            ts(2, 12),
            EventType::Trade,
            vec![
                asset_leg,
                LedgerLeg::new("EUR", dec!(-1000), WALLET).unwrap(),
                LedgerLeg::new("EUR", dec!(-1000), WALLET).unwrap(),
            ],
        );

        let result = engine_with(provider).process(&[trade]).unwrap();
        assert_eq!(result.acquisition_lots[0].cost_per_unit, dec!(1950));
    }

    #[test]
    fn open_inventory_is_sorted_by_asset_then_timestamp() {
        let (eth_buy, _) = buy(ts(5, 12), "1.0", "2000");
        let btc_leg = LedgerLeg::new("BTC", dec!(0.1), WALLET).unwrap();
        let btc_buy = event(
            ts(6, 12),
            EventType::Trade,
            vec![btc_leg, LedgerLeg::new("EUR", dec!(-5000), WALLET).unwrap()],
        );
        let (eth_buy2, _) = buy(ts(7, 12), "0.5", "1100");

        let result = engine().process(&[eth_buy, btc_buy, eth_buy2]).unwrap();

        let keys: Vec<(&str, DateTime<Utc>)> = result
            .open_inventory
            .iter()
            .map(|snap| (snap.asset_id.as_str(), snap.acquired_timestamp))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("BTC", ts(6, 12)),
                ("ETH", ts(5, 12)),
                ("ETH", ts(7, 12)),
            ]
        );
    }

    #[test]
    fn deposit_and_withdrawal_round_trip_through_the_pool() {
        let provider = FixedPriceProvider::new().with_rate("ETH", "EUR", dec!(2000));
        let deposit = event(
            ts(1, 9),
            EventType::Deposit,
            vec![LedgerLeg::new("ETH", dec!(2), WALLET).unwrap()],
        );
        let withdrawal = event(
            ts(8, 9),
            EventType::Withdrawal,
            vec![LedgerLeg::new("ETH", dec!(-2), WALLET).unwrap()],
        );

        let result = engine_with(provider).process(&[deposit, withdrawal]).unwrap();

        assert_eq!(result.acquisition_lots.len(), 1);
        assert_eq!(result.disposal_links.len(), 1);
        assert!(result.open_inventory.is_empty());
    }
}
