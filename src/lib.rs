pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod orchestration;

pub use config::{ConfigError, EngineConfig};
pub use datasource::{
    BalanceStore, ContractUsageStore, DeliveryRateStore, MockStores, PriceStore, StoreError,
};
pub use domain::{
    BasisId, CarrierId, CommissionInput, Counterparty, CounterpartyId, CounterpartyKind,
    CounterpartyRole, DealDraft, DealKind, DealMode, Decimal, Endpoint, PriceId, PriceRecord,
    PriceSelection, ProductType, QuantityInput, ResolvedPrice, SubmitMode, Warehouse, WarehouseId,
    WarehouseSnapshot,
};
pub use engine::{BalanceCheck, CheckStatus, DealFigures, VolumeCheck};
pub use orchestration::{
    DealContext, DealEvaluation, DealIssue, DealPricer, PricingError, SidePricing,
};
