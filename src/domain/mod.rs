//! Domain types for the fuel-trading pricing and balance engine.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper
//! - Domain primitives: ids, ProductType, CounterpartyRole, CounterpartyKind
//! - Price records, selections and the composite-id codec
//! - Counterparties, warehouses and balance snapshots
//! - The transient DealDraft form state

pub mod counterparty;
pub mod deal;
pub mod decimal;
pub mod price;
pub mod primitives;
pub mod snapshot;

pub use counterparty::{Counterparty, Warehouse};
pub use deal::{CommissionInput, DealDraft, DealKind, DealMode, QuantityInput, SubmitMode};
pub use decimal::Decimal;
pub use price::{PriceRecord, PriceSelection, ResolvedPrice};
pub use primitives::{
    BasisId, CarrierId, CounterpartyId, CounterpartyKind, CounterpartyRole, Endpoint, PriceId,
    ProductType, WarehouseId,
};
pub use snapshot::WarehouseSnapshot;
