//! Per-deal money figures: amounts, cost roll-up and profit.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};

/// Everything the roll-up needs, already resolved to numbers.
///
/// Unit prices are per kg; the storage tariff is per metric ton as
/// stored on the warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CostInputs {
    pub quantity_kg: Decimal,
    pub purchase_price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub delivery_rate_per_kg: Option<Decimal>,
    pub storage_cost_per_ton: Option<Decimal>,
    pub commission: Option<Decimal>,
}

/// The final per-deal figures.
///
/// Amount fields are None when uncomputable (missing price or quantity);
/// cost roll-up fields treat a missing term as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealFigures {
    pub purchase_amount: Option<Decimal>,
    pub sale_amount: Option<Decimal>,
    pub delivery_cost: Decimal,
    pub storage_cost: Decimal,
    pub commission: Decimal,
    pub total_cost: Decimal,
    pub cost_per_kg: Decimal,
    pub profit: Option<Decimal>,
}

/// Compute the deal figures from resolved inputs.
pub fn compute(inputs: &CostInputs) -> DealFigures {
    let qty = inputs.quantity_kg;

    let purchase_amount = amount(inputs.purchase_price, qty);
    let sale_amount = amount(inputs.sale_price, qty);

    let delivery_cost = if qty.is_positive() {
        inputs
            .delivery_rate_per_kg
            .map(|rate| rate * qty)
            .unwrap_or_else(Decimal::zero)
    } else {
        Decimal::zero()
    };

    let storage_cost = if qty.is_positive() {
        inputs
            .storage_cost_per_ton
            .map(|per_ton| per_ton / Decimal::thousand() * qty)
            .unwrap_or_else(Decimal::zero)
    } else {
        Decimal::zero()
    };

    let commission = inputs.commission.unwrap_or_else(Decimal::zero);

    let total_cost = purchase_amount.unwrap_or_else(Decimal::zero) + storage_cost + delivery_cost;
    let cost_per_kg = if qty.is_positive() {
        total_cost / qty
    } else {
        Decimal::zero()
    };

    let profit = match (purchase_amount, sale_amount) {
        (Some(purchase), Some(sale)) => Some(sale - purchase - delivery_cost - commission),
        _ => None,
    };

    DealFigures {
        purchase_amount,
        sale_amount,
        delivery_cost,
        storage_cost,
        commission,
        total_cost,
        cost_per_kg,
        profit,
    }
}

fn amount(price: Option<Decimal>, qty: Decimal) -> Option<Decimal> {
    match price {
        Some(price) if qty.is_positive() => Some(price * qty),
        _ => None,
    }
}
