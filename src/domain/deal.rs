//! The in-progress deal form state the engine prices.
//!
//! A draft is transient: created when a form opens, discarded on close or
//! submit. It is never the system of record.

use crate::domain::{
    BasisId, CarrierId, CounterpartyId, CounterpartyKind, Decimal, Endpoint, PriceSelection,
    ProductType, WarehouseId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which module the deal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealKind {
    Wholesale,
    Movement,
    Refueling,
    RefuelingAbroad,
}

impl DealKind {
    /// The business line whose price records cover this deal.
    pub fn price_kind(&self) -> CounterpartyKind {
        match self {
            DealKind::Wholesale | DealKind::Movement => CounterpartyKind::Wholesale,
            DealKind::Refueling | DealKind::RefuelingAbroad => CounterpartyKind::Refueling,
        }
    }
}

/// Whether the form creates a new deal or edits a stored one.
///
/// An edit carries the stored quantity so balance and contract checks can
/// add it back before validating the new quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum DealMode {
    Create,
    Edit { original_quantity_kg: Decimal },
}

impl DealMode {
    pub fn is_editing(&self) -> bool {
        matches!(self, DealMode::Edit { .. })
    }

    /// The stored quantity of the deal being edited; zero when creating.
    pub fn original_quantity_kg(&self) -> Decimal {
        match self {
            DealMode::Create => Decimal::zero(),
            DealMode::Edit {
                original_quantity_kg,
            } => *original_quantity_kg,
        }
    }
}

/// How the deal is being saved. Drafts bypass price, balance and contract
/// validation entirely; final submission is gated on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitMode {
    Draft,
    Final,
}

/// Deal quantity as entered on the form: directly in kg, or in liters to
/// be converted through a density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", rename_all = "lowercase")]
pub enum QuantityInput {
    Kilograms { kg: Decimal },
    Liters {
        liters: Decimal,
        /// Measured density, kg per liter. Falls back to the configured
        /// per-product default when absent.
        density: Option<Decimal>,
    },
}

impl QuantityInput {
    /// The quantity in kg, using `default_density` when liters were
    /// entered without a measured density.
    pub fn as_kg(&self, default_density: Decimal) -> Decimal {
        match self {
            QuantityInput::Kilograms { kg } => *kg,
            QuantityInput::Liters { liters, density } => {
                *liters * density.unwrap_or(default_density)
            }
        }
    }
}

/// Commission entry: a formula or a manually entered value, never both.
///
/// Switching modes clears the other side, so no "last emitted value"
/// sentinels are needed to keep the two inputs from feeding each other.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum CommissionInput {
    #[default]
    None,
    Formula { text: String },
    Manual { value: Decimal },
}

impl CommissionInput {
    /// Enter formula mode, discarding any manual value.
    pub fn set_formula(&mut self, text: impl Into<String>) {
        *self = CommissionInput::Formula { text: text.into() };
    }

    /// Enter manual mode, discarding any formula.
    pub fn set_manual(&mut self, value: Decimal) {
        *self = CommissionInput::Manual { value };
    }

    pub fn clear(&mut self) {
        *self = CommissionInput::None;
    }
}

/// The in-progress form state for one deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealDraft {
    pub kind: DealKind,
    pub mode: DealMode,
    pub date: NaiveDate,
    pub product: ProductType,
    pub quantity: QuantityInput,

    pub supplier_id: Option<CounterpartyId>,
    pub buyer_id: Option<CounterpartyId>,

    /// Source warehouse the deal draws fuel from (movements, and deals
    /// shipped from our own stock).
    pub source_warehouse_id: Option<WarehouseId>,
    /// Destination warehouse (movements landing in our stock).
    pub dest_warehouse_id: Option<WarehouseId>,

    /// Basis the prices are negotiated against, by id when known.
    pub basis_id: Option<BasisId>,
    /// Basis name, used for matching when no id is stored.
    pub basis: Option<String>,

    pub carrier_id: Option<CarrierId>,
    /// Where the fuel is delivered to, for the carrier rate lookup.
    pub destination: Option<Endpoint>,

    pub purchase_selection: Option<PriceSelection>,
    pub sale_selection: Option<PriceSelection>,

    pub commission: CommissionInput,
    /// Exchange rate available to commission formulas.
    pub exchange_rate: Option<Decimal>,
}
