//! Warehouse balance and weighted-average cost at a point in time.

use super::{BalanceCheck, CheckStatus};
use crate::datasource::{BalanceStore, StoreError};
use crate::domain::{DealMode, Decimal, ProductType, Warehouse, WarehouseSnapshot};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

/// Inputs of a balance feasibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceContext {
    /// Quantity the deal wants to draw, kg.
    pub proposed_quantity_kg: Decimal,
    pub is_editing: bool,
    /// Stored quantity of the deal being edited; added back before the
    /// check so the in-progress edit is not double-subtracted.
    pub original_quantity_kg: Decimal,
    /// Warehouse's stored current average cost, used when the historical
    /// snapshot carries none.
    pub fallback_average_cost: Option<Decimal>,
}

impl BalanceContext {
    pub fn new(proposed_quantity_kg: Decimal, mode: &DealMode) -> Self {
        Self {
            proposed_quantity_kg,
            is_editing: mode.is_editing(),
            original_quantity_kg: mode.original_quantity_kg(),
            fallback_average_cost: None,
        }
    }

    pub fn with_fallback_average_cost(mut self, cost: Option<Decimal>) -> Self {
        self.fallback_average_cost = cost;
        self
    }
}

/// Check whether a warehouse can cover a deal, given its historical and
/// current snapshots.
///
/// The usable balance is the minimum of the two, so a back-dated deal
/// cannot borrow fuel that only arrived later, and a date moved forward
/// cannot spend fuel already gone today. The tiers below run in exactly
/// this order; an empty warehouse reports empty even when it also has no
/// cost, because emptiness is the failure the user can act on.
pub fn check_balance(
    historical: Option<&WarehouseSnapshot>,
    current: Option<&WarehouseSnapshot>,
    ctx: &BalanceContext,
) -> BalanceCheck {
    let (historical, current) = match (historical, current) {
        (Some(h), Some(c)) => (h, c),
        _ => {
            return BalanceCheck {
                usable_balance_kg: Decimal::zero(),
                average_cost_per_kg: Decimal::zero(),
                status: CheckStatus::Ok,
                message: "Загрузка...".to_string(),
            }
        }
    };

    let mut usable = historical.balance_kg.min(current.balance_kg);
    if ctx.is_editing {
        usable = usable + ctx.original_quantity_kg;
    }

    let average_cost = if historical.has_cost() {
        historical.average_cost_per_kg
    } else {
        ctx.fallback_average_cost
            .filter(|cost| cost.is_positive())
            .unwrap_or_else(Decimal::zero)
    };

    if !usable.is_positive() {
        return BalanceCheck {
            usable_balance_kg: usable,
            average_cost_per_kg: average_cost,
            status: CheckStatus::Error,
            message: "склад пуст".to_string(),
        };
    }

    if !average_cost.is_positive() {
        return BalanceCheck {
            usable_balance_kg: usable,
            average_cost_per_kg: average_cost,
            status: CheckStatus::Error,
            message: "нет себестоимости".to_string(),
        };
    }

    if !ctx.proposed_quantity_kg.is_positive() {
        return BalanceCheck {
            usable_balance_kg: usable,
            average_cost_per_kg: average_cost,
            status: CheckStatus::Ok,
            message: format!("остаток: {} кг", usable),
        };
    }

    let remaining = usable - ctx.proposed_quantity_kg;
    if remaining.is_negative() {
        BalanceCheck {
            usable_balance_kg: usable,
            average_cost_per_kg: average_cost,
            status: CheckStatus::Error,
            message: format!("недостаточно топлива: {} кг", remaining),
        }
    } else {
        BalanceCheck {
            usable_balance_kg: usable,
            average_cost_per_kg: average_cost,
            status: CheckStatus::Ok,
            message: format!("остаток: {} кг", remaining),
        }
    }
}

/// Computes a warehouse's usable balance and average cost as of a deal
/// date, reconciled with the current snapshot.
#[derive(Debug, Clone)]
pub struct WarehouseBalanceCalculator {
    store: Arc<dyn BalanceStore>,
}

impl WarehouseBalanceCalculator {
    pub fn new(store: Arc<dyn BalanceStore>) -> Self {
        Self { store }
    }

    /// Fetch the historical and current snapshots and run the check.
    ///
    /// `today` is passed in by the caller so the computation stays
    /// reproducible.
    pub async fn balance_at(
        &self,
        warehouse: &Warehouse,
        product: ProductType,
        on: NaiveDate,
        today: NaiveDate,
        mode: &DealMode,
        proposed_quantity_kg: Decimal,
    ) -> Result<BalanceCheck, StoreError> {
        let historical = self.store.snapshot(&warehouse.id, product, on).await?;
        let current = self.store.snapshot(&warehouse.id, product, today).await?;
        debug!(
            warehouse = %warehouse.id,
            %product,
            historical_kg = %historical.balance_kg,
            current_kg = %current.balance_kg,
            "Warehouse snapshots fetched"
        );

        let ctx = BalanceContext::new(proposed_quantity_kg, mode)
            .with_fallback_average_cost(warehouse.average_cost_per_kg);
        Ok(check_balance(Some(&historical), Some(&current), &ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn snap(balance: &str, cost: &str) -> WarehouseSnapshot {
        WarehouseSnapshot::new(d(balance), d(cost))
    }

    fn ctx(qty: &str) -> BalanceContext {
        BalanceContext {
            proposed_quantity_kg: d(qty),
            is_editing: false,
            original_quantity_kg: Decimal::zero(),
            fallback_average_cost: None,
        }
    }

    #[test]
    fn test_missing_snapshot_reports_loading() {
        let check = check_balance(None, Some(&snap("100", "58.5")), &ctx("10"));
        assert_eq!(check.status, CheckStatus::Ok);
        assert_eq!(check.message, "Загрузка...");
    }

    #[test]
    fn test_usable_is_min_of_historical_and_current() {
        let check = check_balance(Some(&snap("5000", "58.5")), Some(&snap("3000", "60")), &ctx("0"));
        assert_eq!(check.usable_balance_kg, d("3000"));

        let check = check_balance(Some(&snap("2000", "58.5")), Some(&snap("9000", "60")), &ctx("0"));
        assert_eq!(check.usable_balance_kg, d("2000"));
    }

    #[test]
    fn test_average_cost_prefers_historical() {
        let check = check_balance(Some(&snap("5000", "58.5")), Some(&snap("5000", "61")), &ctx("0"));
        assert_eq!(check.average_cost_per_kg, d("58.5"));
    }

    #[test]
    fn test_average_cost_falls_back_to_stored() {
        let mut c = ctx("0");
        c.fallback_average_cost = Some(d("59.2"));
        let check = check_balance(Some(&snap("5000", "0")), Some(&snap("5000", "61")), &c);
        assert_eq!(check.average_cost_per_kg, d("59.2"));
    }

    #[test]
    fn test_empty_warehouse_reported_before_missing_cost() {
        let check = check_balance(Some(&snap("0", "0")), Some(&snap("0", "0")), &ctx("10"));
        assert_eq!(check.status, CheckStatus::Error);
        assert_eq!(check.message, "склад пуст");
    }

    #[test]
    fn test_missing_cost_reported_on_stocked_warehouse() {
        let check = check_balance(Some(&snap("5000", "0")), Some(&snap("5000", "0")), &ctx("10"));
        assert_eq!(check.status, CheckStatus::Error);
        assert_eq!(check.message, "нет себестоимости");
    }

    #[test]
    fn test_zero_quantity_shows_balance_only() {
        let check = check_balance(Some(&snap("5000", "58.5")), Some(&snap("5000", "58.5")), &ctx("0"));
        assert_eq!(check.status, CheckStatus::Ok);
        assert_eq!(check.message, "остаток: 5000 кг");
    }

    #[test]
    fn test_feasibility_boundary() {
        let h = snap("3000", "58.5");
        let c = snap("3000", "58.5");

        let check = check_balance(Some(&h), Some(&c), &ctx("3000"));
        assert_eq!(check.status, CheckStatus::Ok);
        assert_eq!(check.message, "остаток: 0 кг");

        let check = check_balance(Some(&h), Some(&c), &ctx("3001"));
        assert_eq!(check.status, CheckStatus::Error);
        assert!(check.message.contains("-1"));
    }

    #[test]
    fn test_edit_adds_back_original_quantity() {
        let mut c = ctx("3200");
        c.is_editing = true;
        c.original_quantity_kg = d("3000");

        // Only 500 left on hand, but 3000 of that draw belongs to the
        // deal being edited.
        let check = check_balance(Some(&snap("500", "58.5")), Some(&snap("500", "58.5")), &c);
        assert_eq!(check.usable_balance_kg, d("3500"));
        assert_eq!(check.status, CheckStatus::Ok);
    }

    #[test]
    fn test_negative_ledger_balance_is_empty() {
        let check = check_balance(Some(&snap("-40", "58.5")), Some(&snap("100", "58.5")), &ctx("10"));
        assert_eq!(check.status, CheckStatus::Error);
        assert_eq!(check.message, "склад пуст");
    }
}
