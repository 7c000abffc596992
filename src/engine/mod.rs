//! Pure computation engine for deal pricing and feasibility checks.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod contract;
pub mod cost;
pub mod formula;
pub mod resolver;
pub mod warehouse;

pub use catalog::{BasisRef, PriceCatalog, PriceQuery};
pub use contract::remaining_volume;
pub use cost::{CostInputs, DealFigures};
pub use formula::{evaluate, validate, FormulaVars};
pub use resolver::resolve;
pub use warehouse::{check_balance, BalanceContext, WarehouseBalanceCalculator};

/// Outcome of a feasibility check, surfaced to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Error,
}

impl CheckStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, CheckStatus::Error)
    }
}

/// Result of a contract volume check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeCheck {
    /// Remaining capacity in kg; None when the contract is uncapped.
    pub remaining_kg: Option<Decimal>,
    pub status: CheckStatus,
    pub message: String,
}

/// Result of a warehouse balance check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceCheck {
    /// Usable balance: min(historical, current), adjusted for an edit.
    pub usable_balance_kg: Decimal,
    /// Weighted-average acquisition cost per kg feeding the cost roll-up.
    pub average_cost_per_kg: Decimal,
    pub status: CheckStatus,
    pub message: String,
}
