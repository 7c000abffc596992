//! Prices one deal draft end to end.
//!
//! The pricer runs on every relevant input change: it resolves both
//! sides' prices, checks warehouse and contract feasibility, evaluates
//! the commission and rolls the figures up. The whole evaluation is
//! idempotent given the stores' contents, so the host can re-run it per
//! keystroke.

use crate::config::EngineConfig;
use crate::datasource::{
    BalanceStore, ContractUsageStore, DeliveryRateStore, PriceStore, StoreError,
};
use crate::domain::{
    CommissionInput, Counterparty, CounterpartyId, CounterpartyRole, DealDraft, DealKind, Decimal,
    Endpoint, PriceSelection, ResolvedPrice, SubmitMode, Warehouse,
};
use crate::engine::{
    contract, cost, formula, resolver, BalanceCheck, BasisRef, CostInputs, DealFigures,
    FormulaVars, PriceCatalog, PriceQuery, VolumeCheck, WarehouseBalanceCalculator,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Reference data the form has already loaded for the draft's ids.
#[derive(Debug, Clone, Default)]
pub struct DealContext {
    pub supplier: Option<Counterparty>,
    pub buyer: Option<Counterparty>,
    /// Warehouse the deal draws fuel from.
    pub source_warehouse: Option<Warehouse>,
    /// Warehouse the fuel lands in; its storage tariff feeds the roll-up.
    pub dest_warehouse: Option<Warehouse>,
}

/// One side's resolved price and contract headroom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidePricing {
    /// None when no applicable record was found or the stored value
    /// failed to decode.
    pub resolved: Option<ResolvedPrice>,
    /// Contract volume check for the resolved record; None until a price
    /// resolves.
    pub volume: Option<VolumeCheck>,
}

/// Everything one evaluation of a draft produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealEvaluation {
    pub quantity_kg: Decimal,
    /// Supplier-side pricing; None when the draft names no supplier.
    pub purchase: Option<SidePricing>,
    /// Buyer-side pricing; None when the draft names no buyer.
    pub sale: Option<SidePricing>,
    /// Source warehouse feasibility; None when nothing is drawn from
    /// our own stock.
    pub balance: Option<BalanceCheck>,
    pub commission: Option<Decimal>,
    pub figures: DealFigures,
}

impl DealEvaluation {
    /// Blocking issues for the given submit mode.
    ///
    /// Drafts bypass validation entirely and always submit clean.
    pub fn issues(&self, mode: SubmitMode) -> Vec<DealIssue> {
        if mode == SubmitMode::Draft {
            return Vec::new();
        }

        let mut issues = Vec::new();
        for (side, role) in [
            (&self.purchase, CounterpartyRole::Supplier),
            (&self.sale, CounterpartyRole::Buyer),
        ] {
            if let Some(side) = side {
                if side.resolved.is_none() {
                    issues.push(DealIssue::MissingPrice { role });
                }
                if let Some(volume) = &side.volume {
                    if volume.status.is_error() {
                        issues.push(DealIssue::ContractOverdraw {
                            role,
                            message: volume.message.clone(),
                        });
                    }
                }
            }
        }
        if let Some(balance) = &self.balance {
            if balance.status.is_error() {
                issues.push(DealIssue::InsufficientBalance {
                    message: balance.message.clone(),
                });
            }
        }
        issues
    }
}

/// A condition that blocks final submission.
///
/// Computed values, never raised: the form disables submission and shows
/// them inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DealIssue {
    MissingPrice {
        role: CounterpartyRole,
    },
    InsufficientBalance {
        message: String,
    },
    ContractOverdraw {
        role: CounterpartyRole,
        message: String,
    },
}

impl std::fmt::Display for DealIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DealIssue::MissingPrice { role } => write!(f, "нет цены ({})", role),
            DealIssue::InsufficientBalance { message } => write!(f, "{}", message),
            DealIssue::ContractOverdraw { role, message } => {
                write!(f, "{} ({})", message, role)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum PricingError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Composes catalog, resolver, balance, contract and formula evaluation
/// into the figures a deal form displays.
#[derive(Clone)]
pub struct DealPricer {
    catalog: PriceCatalog,
    balances: WarehouseBalanceCalculator,
    usage: Arc<dyn ContractUsageStore>,
    rates: Arc<dyn DeliveryRateStore>,
    config: EngineConfig,
}

impl DealPricer {
    pub fn new(
        prices: Arc<dyn PriceStore>,
        balances: Arc<dyn BalanceStore>,
        usage: Arc<dyn ContractUsageStore>,
        rates: Arc<dyn DeliveryRateStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            catalog: PriceCatalog::new(prices),
            balances: WarehouseBalanceCalculator::new(balances),
            usage,
            rates,
            config,
        }
    }

    /// Evaluate a draft against the stores.
    ///
    /// `today` is the caller's clock; it is never sampled here, so an
    /// evaluation can be replayed for any date.
    pub async fn evaluate(
        &self,
        draft: &DealDraft,
        ctx: &DealContext,
        today: NaiveDate,
    ) -> Result<DealEvaluation, PricingError> {
        let quantity_kg = draft
            .quantity
            .as_kg(self.config.default_density(draft.product));

        let purchase = match &draft.supplier_id {
            Some(supplier_id) => Some(
                self.price_side(
                    draft,
                    supplier_id,
                    CounterpartyRole::Supplier,
                    draft.purchase_selection.as_ref(),
                    quantity_kg,
                )
                .await?,
            ),
            None => None,
        };
        let sale = match &draft.buyer_id {
            Some(buyer_id) => Some(
                self.price_side(
                    draft,
                    buyer_id,
                    CounterpartyRole::Buyer,
                    draft.sale_selection.as_ref(),
                    quantity_kg,
                )
                .await?,
            ),
            None => None,
        };

        let balance = match &ctx.source_warehouse {
            Some(warehouse) => Some(
                self.balances
                    .balance_at(
                        warehouse,
                        draft.product,
                        draft.date,
                        today,
                        &draft.mode,
                        quantity_kg,
                    )
                    .await?,
            ),
            None => None,
        };

        // Deals drawing from our own stock without a supplier price are
        // costed at the warehouse's weighted-average acquisition cost.
        let purchase_price = purchase
            .as_ref()
            .and_then(|side| side.resolved.as_ref())
            .map(|r| r.unit_price)
            .or_else(|| {
                balance
                    .as_ref()
                    .map(|b| b.average_cost_per_kg)
                    .filter(|cost| cost.is_positive())
            });
        let sale_price = sale
            .as_ref()
            .and_then(|side| side.resolved.as_ref())
            .map(|r| r.unit_price);

        let delivery_rate = self.delivery_rate(draft, ctx).await?;

        let commission = match &draft.commission {
            CommissionInput::None => None,
            CommissionInput::Manual { value } => Some(*value),
            CommissionInput::Formula { text } => formula::evaluate(
                text,
                &FormulaVars {
                    purchase_price: purchase_price.unwrap_or_else(Decimal::zero),
                    sale_price: sale_price.unwrap_or_else(Decimal::zero),
                    quantity: quantity_kg,
                    exchange_rate: draft.exchange_rate.unwrap_or_else(Decimal::zero),
                },
            ),
        };

        let figures = cost::compute(&CostInputs {
            quantity_kg,
            purchase_price,
            sale_price,
            delivery_rate_per_kg: delivery_rate,
            storage_cost_per_ton: ctx
                .dest_warehouse
                .as_ref()
                .and_then(|w| w.storage_cost_per_ton),
            commission,
        });

        debug!(
            kind = ?draft.kind,
            quantity_kg = %quantity_kg,
            purchase_resolved = purchase.as_ref().map_or(false, |s| s.resolved.is_some()),
            sale_resolved = sale.as_ref().map_or(false, |s| s.resolved.is_some()),
            "Deal evaluated"
        );

        Ok(DealEvaluation {
            quantity_kg,
            purchase,
            sale,
            balance,
            commission,
            figures,
        })
    }

    /// Resolve one side's price and check its contract headroom.
    async fn price_side(
        &self,
        draft: &DealDraft,
        counterparty_id: &CounterpartyId,
        role: CounterpartyRole,
        selection: Option<&PriceSelection>,
        quantity_kg: Decimal,
    ) -> Result<SidePricing, PricingError> {
        let query = PriceQuery {
            counterparty_id: counterparty_id.clone(),
            role,
            kind: draft.kind.price_kind(),
            product: draft.product,
            basis: basis_ref(draft),
            date: draft.date,
        };
        let records = self.catalog.lookup(&query).await?;
        let resolved = resolver::resolve(&records, selection);

        let volume = match &resolved {
            Some(resolved) => {
                let cap = records
                    .iter()
                    .find(|r| r.id == resolved.price_id)
                    .and_then(|r| r.volume_cap());
                let used = match cap {
                    Some(_) => self.usage.used_volume(&resolved.price_id).await?,
                    None => Decimal::zero(),
                };
                Some(contract::remaining_volume(
                    cap,
                    used,
                    quantity_kg,
                    draft.mode.is_editing(),
                ))
            }
            None => None,
        };

        Ok(SidePricing { resolved, volume })
    }

    /// The carrier tariff for this draft's delivery leg, when one applies.
    async fn delivery_rate(
        &self,
        draft: &DealDraft,
        ctx: &DealContext,
    ) -> Result<Option<Decimal>, PricingError> {
        let carrier_id = match &draft.carrier_id {
            Some(id) => id,
            None => return Ok(None),
        };
        let to = match &draft.destination {
            Some(endpoint) => endpoint,
            None => return Ok(None),
        };
        // Internal movements dispatch from the source warehouse; deals
        // dispatch from the supplier's warehouse or first basis.
        let from = match draft.kind {
            DealKind::Movement => ctx
                .source_warehouse
                .as_ref()
                .map(|w| Endpoint::Warehouse(w.id.clone())),
            _ => ctx.supplier.as_ref().and_then(|s| s.dispatch_origin()),
        };
        let from = match from {
            Some(endpoint) => endpoint,
            None => return Ok(None),
        };
        Ok(self.rates.find_rate(carrier_id, &from, to).await?)
    }
}

/// Basis filter for the catalog: by id when the draft carries one, else
/// by name, else unconstrained.
fn basis_ref(draft: &DealDraft) -> BasisRef {
    if let Some(id) = &draft.basis_id {
        BasisRef::ById(id.clone())
    } else if let Some(name) = &draft.basis {
        BasisRef::ByName(name.clone())
    } else {
        BasisRef::Any
    }
}
