use std::collections::{BTreeMap, HashMap, HashSet};

use rust_decimal::Decimal;

use crate::errors::BalanceError;

/// Running signed balance per (asset, wallet) pair.
///
/// The tracker is a pure arithmetic ledger with one guarantee: a balance is
/// never allowed to go negative. It knows nothing about lots, time, or
/// prices; it exists to catch data-integrity problems (a missing deposit,
/// a double-counted withdrawal) independently from the cost-basis pool.
#[derive(Debug, Default, Clone)]
pub struct WalletBalanceTracker {
    balances: HashMap<(String, String), Decimal>,
}

impl WalletBalanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` (signed) to the balance for the pair. If the result
    /// would be negative the stored balance is left untouched and a
    /// [`BalanceError`] describing the rejected movement is returned.
    pub fn apply_movement(
        &mut self,
        asset_id: &str,
        wallet_id: &str,
        quantity: Decimal,
    ) -> std::result::Result<(), BalanceError> {
        let key = (asset_id.to_string(), wallet_id.to_string());
        let current_balance = self.balances.get(&key).copied().unwrap_or(Decimal::ZERO);
        let new_balance = current_balance + quantity;
        if new_balance < Decimal::ZERO {
            return Err(BalanceError {
                asset_id: asset_id.to_string(),
                wallet_id: wallet_id.to_string(),
                attempted_quantity: quantity,
                available_balance: current_balance,
            });
        }
        self.balances.insert(key, new_balance);
        Ok(())
    }

    /// Current balance for the pair, zero if never seen.
    pub fn get_balance(&self, asset_id: &str, wallet_id: &str) -> Decimal {
        self.balances
            .get(&(asset_id.to_string(), wallet_id.to_string()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Whether the current balance covers `quantity`.
    pub fn has_available(&self, asset_id: &str, wallet_id: &str, quantity: Decimal) -> bool {
        self.get_balance(asset_id, wallet_id) >= quantity
    }

    /// Per-asset balance totals over the given wallet set, or over all
    /// wallets when `wallet_ids` is `None`. Used by reporting only.
    pub fn asset_balances_for(
        &self,
        wallet_ids: Option<&HashSet<String>>,
    ) -> BTreeMap<String, Decimal> {
        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for ((asset_id, wallet_id), balance) in &self.balances {
            // Every seen asset gets an entry, even when the wallet filter
            // leaves its total at zero.
            let total = totals.entry(asset_id.clone()).or_insert(Decimal::ZERO);
            if let Some(wallets) = wallet_ids {
                if !wallets.contains(wallet_id) {
                    continue;
                }
            }
            *total += *balance;
        }
        totals
    }
}
