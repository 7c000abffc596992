//! Counterparties and warehouses as the engine sees them.

use crate::domain::{
    BasisId, CounterpartyId, CounterpartyKind, Decimal, Endpoint, WarehouseId,
};
use serde::{Deserialize, Serialize};

/// A supplier or buyer legal entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    pub id: CounterpartyId,
    pub name: String,
    pub kind: CounterpartyKind,
    /// Warehouse owned by this counterparty, if any.
    pub warehouse_id: Option<WarehouseId>,
    /// Bases associated with this counterparty, in stored order.
    pub basis_ids: Vec<BasisId>,
}

impl Counterparty {
    /// The endpoint fuel is dispatched from when this counterparty
    /// supplies a deal: its warehouse when it owns one, otherwise its
    /// first associated basis.
    pub fn dispatch_origin(&self) -> Option<Endpoint> {
        if let Some(warehouse_id) = &self.warehouse_id {
            return Some(Endpoint::Warehouse(warehouse_id.clone()));
        }
        self.basis_ids
            .first()
            .map(|basis_id| Endpoint::Basis(basis_id.clone()))
    }
}

/// A fuel warehouse with its stored tariffs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub name: String,
    /// Storage tariff per metric ton, when configured.
    pub storage_cost_per_ton: Option<Decimal>,
    /// Stored current weighted-average acquisition cost per kg. Used as a
    /// fallback when a historical snapshot carries no cost.
    pub average_cost_per_kg: Option<Decimal>,
}
