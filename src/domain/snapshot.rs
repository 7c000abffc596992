//! Warehouse balance snapshots.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};

/// A warehouse's fuel state for one product at a point in time, derived
/// by the ledger from all movements up to that date.
///
/// `balance_kg` may come back negative only as an error state of the
/// underlying ledger; it is never a valid target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseSnapshot {
    /// Quantity on hand, kg.
    pub balance_kg: Decimal,
    /// Weighted-average acquisition cost per kg.
    pub average_cost_per_kg: Decimal,
}

impl WarehouseSnapshot {
    pub fn new(balance_kg: Decimal, average_cost_per_kg: Decimal) -> Self {
        Self {
            balance_kg,
            average_cost_per_kg,
        }
    }

    /// An empty snapshot: no fuel, no cost.
    pub fn empty() -> Self {
        Self {
            balance_kg: Decimal::zero(),
            average_cost_per_kg: Decimal::zero(),
        }
    }

    /// True when the snapshot carries a usable average cost.
    pub fn has_cost(&self) -> bool {
        self.average_cost_per_kg.is_positive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot() {
        let s = WarehouseSnapshot::empty();
        assert!(s.balance_kg.is_zero());
        assert!(!s.has_cost());
    }

    #[test]
    fn test_has_cost() {
        let s = WarehouseSnapshot::new(
            Decimal::from_i64(1000),
            Decimal::from_str_canonical("58.5").unwrap(),
        );
        assert!(s.has_cost());
        let s = WarehouseSnapshot::new(Decimal::from_i64(1000), Decimal::zero());
        assert!(!s.has_cost());
    }
}
