//! In-memory stores for testing without a backend.

use super::{
    BalanceStore, ContractUsageStore, DeliveryRateStore, PriceStore, StoreError,
};
use crate::domain::{
    CarrierId, CounterpartyId, CounterpartyRole, Decimal, Endpoint, PriceId, PriceRecord,
    ProductType, WarehouseId, WarehouseSnapshot,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

/// In-memory implementation of every store trait, preloaded with test data.
///
/// Snapshots are keyed by `(warehouse, product, date)`; a missing key
/// resolves to an empty snapshot, matching a ledger with no movements.
#[derive(Debug, Clone, Default)]
pub struct MockStores {
    prices: Vec<PriceRecord>,
    snapshots: HashMap<(WarehouseId, ProductType, NaiveDate), WarehouseSnapshot>,
    used_volumes: HashMap<PriceId, Decimal>,
    rates: HashMap<(CarrierId, Endpoint, Endpoint), Decimal>,
}

impl MockStores {
    /// Create empty stores.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a price record.
    pub fn with_price(mut self, record: PriceRecord) -> Self {
        self.prices.push(record);
        self
    }

    /// Add multiple price records.
    pub fn with_prices(mut self, records: Vec<PriceRecord>) -> Self {
        self.prices.extend(records);
        self
    }

    /// Set the snapshot served for a warehouse, product and date.
    pub fn with_snapshot(
        mut self,
        warehouse_id: WarehouseId,
        product: ProductType,
        at: NaiveDate,
        snapshot: WarehouseSnapshot,
    ) -> Self {
        self.snapshots.insert((warehouse_id, product, at), snapshot);
        self
    }

    /// Set the aggregated used volume for a price record.
    pub fn with_used_volume(mut self, price_id: PriceId, used_kg: Decimal) -> Self {
        self.used_volumes.insert(price_id, used_kg);
        self
    }

    /// Set a carrier rate between two endpoints.
    pub fn with_rate(
        mut self,
        carrier_id: CarrierId,
        from: Endpoint,
        to: Endpoint,
        rate_per_kg: Decimal,
    ) -> Self {
        self.rates.insert((carrier_id, from, to), rate_per_kg);
        self
    }
}

#[async_trait]
impl PriceStore for MockStores {
    async fn find_prices(
        &self,
        counterparty_id: &CounterpartyId,
        role: CounterpartyRole,
    ) -> Result<Vec<PriceRecord>, StoreError> {
        Ok(self
            .prices
            .iter()
            .filter(|r| &r.counterparty_id == counterparty_id && r.role == role)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BalanceStore for MockStores {
    async fn snapshot(
        &self,
        warehouse_id: &WarehouseId,
        product: ProductType,
        at: NaiveDate,
    ) -> Result<WarehouseSnapshot, StoreError> {
        Ok(self
            .snapshots
            .get(&(warehouse_id.clone(), product, at))
            .copied()
            .unwrap_or_else(WarehouseSnapshot::empty))
    }
}

#[async_trait]
impl ContractUsageStore for MockStores {
    async fn used_volume(&self, price_id: &PriceId) -> Result<Decimal, StoreError> {
        Ok(self
            .used_volumes
            .get(price_id)
            .copied()
            .unwrap_or_else(Decimal::zero))
    }
}

#[async_trait]
impl DeliveryRateStore for MockStores {
    async fn find_rate(
        &self,
        carrier_id: &CarrierId,
        from: &Endpoint,
        to: &Endpoint,
    ) -> Result<Option<Decimal>, StoreError> {
        Ok(self
            .rates
            .get(&(carrier_id.clone(), from.clone(), to.clone()))
            .copied())
    }
}
