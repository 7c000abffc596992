//! Read-only collaborators the engine queries and must not reimplement.
//!
//! Prices, balance snapshots, contract usage aggregates and carrier rates
//! all live in external stores. The engine issues reads through these
//! traits and performs no writes; timeout and retry policy belongs to the
//! implementations.

use crate::domain::{
    CarrierId, CounterpartyId, CounterpartyRole, Decimal, Endpoint, PriceId, PriceRecord,
    ProductType, WarehouseId, WarehouseSnapshot,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

pub mod mock;

pub use mock::MockStores;

/// Error type for store reads.
///
/// These are the only failures the engine propagates; everything
/// domain-level is a computed value, not an error.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// The store rejected or failed the query.
    #[error("query failed: {0}")]
    Query(String),
    /// The store returned data the engine could not decode.
    #[error("decode failed: {0}")]
    Decode(String),
}

/// Price records negotiated with a counterparty.
///
/// Returns every stored record for the counterparty and role; the catalog
/// applies product, basis, activity and date-window filtering. Order must
/// be deterministic across repeated calls for the same inputs.
#[async_trait]
pub trait PriceStore: Send + Sync + fmt::Debug {
    async fn find_prices(
        &self,
        counterparty_id: &CounterpartyId,
        role: CounterpartyRole,
    ) -> Result<Vec<PriceRecord>, StoreError>;
}

/// Derived warehouse balance snapshots.
///
/// The ledger computes `snapshot` from all movements up to and including
/// `at`; the engine reads it for both the deal date and today.
#[async_trait]
pub trait BalanceStore: Send + Sync + fmt::Debug {
    async fn snapshot(
        &self,
        warehouse_id: &WarehouseId,
        product: ProductType,
        at: NaiveDate,
    ) -> Result<WarehouseSnapshot, StoreError>;
}

/// Cumulative volume already drawn against a price record's contract.
///
/// Contract: the aggregate sums quantities of existing, non-deleted deals
/// referencing the price record, INCLUDING the stored quantity of a deal
/// currently being edited. The asymmetric create/edit offset in the
/// volume check relies on this inclusion policy.
#[async_trait]
pub trait ContractUsageStore: Send + Sync + fmt::Debug {
    async fn used_volume(&self, price_id: &PriceId) -> Result<Decimal, StoreError>;
}

/// Carrier delivery rates between two endpoints, per kg.
#[async_trait]
pub trait DeliveryRateStore: Send + Sync + fmt::Debug {
    async fn find_rate(
        &self,
        carrier_id: &CarrierId,
        from: &Endpoint,
        to: &Endpoint,
    ) -> Result<Option<Decimal>, StoreError>;
}
