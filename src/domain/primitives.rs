//! Domain primitives: ids, product types, counterparty roles and kinds.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            /// Create an id from a string.
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            /// Generate a fresh UUID-shaped id.
            pub fn generate() -> Self {
                $name(uuid::Uuid::new_v4().to_string())
            }

            /// Get the id as a string reference.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a counterparty (supplier or buyer legal entity).
    CounterpartyId
);
string_id!(
    /// Identifier of a fuel warehouse.
    WarehouseId
);
string_id!(
    /// Identifier of a basis (named pickup/delivery location).
    BasisId
);
string_id!(
    /// Identifier of a price record. UUID-shaped in practice.
    PriceId
);
string_id!(
    /// Identifier of a delivery carrier.
    CarrierId
);

/// Product moved and priced by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    /// Jet fuel (TS-1 kerosene).
    Kerosene,
    /// PVKJ anti-icing fluid.
    Pvkj,
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductType::Kerosene => write!(f, "kerosene"),
            ProductType::Pvkj => write!(f, "pvkj"),
        }
    }
}

/// Which side of a deal a counterparty (and its price records) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterpartyRole {
    /// The party we purchase from.
    Supplier,
    /// The party we sell to.
    Buyer,
}

impl std::fmt::Display for CounterpartyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CounterpartyRole::Supplier => write!(f, "supplier"),
            CounterpartyRole::Buyer => write!(f, "buyer"),
        }
    }
}

/// Business line a counterparty's prices are negotiated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterpartyKind {
    /// Wholesale deals and warehouse movements.
    Wholesale,
    /// Aircraft refueling (domestic and abroad).
    Refueling,
}

impl std::fmt::Display for CounterpartyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CounterpartyKind::Wholesale => write!(f, "wholesale"),
            CounterpartyKind::Refueling => write!(f, "refueling"),
        }
    }
}

/// One end of a delivery leg, as keyed in the carrier rate table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Endpoint {
    /// A fuel warehouse.
    Warehouse(WarehouseId),
    /// A basis location.
    Basis(BasisId),
    /// An airport, identified by its code.
    Airport(String),
}

impl Endpoint {
    /// The raw id string of this endpoint.
    pub fn id_str(&self) -> &str {
        match self {
            Endpoint::Warehouse(id) => id.as_str(),
            Endpoint::Basis(id) => id.as_str(),
            Endpoint::Airport(code) => code.as_str(),
        }
    }
}
