//! Price catalog: which price records apply to a deal.

use crate::datasource::{PriceStore, StoreError};
use crate::domain::{
    BasisId, CounterpartyId, CounterpartyKind, CounterpartyRole, PriceRecord, ProductType,
};
use chrono::NaiveDate;
use std::sync::Arc;

/// How the deal identifies its basis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BasisRef {
    /// Match records bound to this basis id.
    ById(BasisId),
    /// Match records bound to this basis name.
    ByName(String),
    /// No basis on the deal; any record matches (internal movements).
    Any,
}

/// Identifying fields a price lookup filters on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuery {
    pub counterparty_id: CounterpartyId,
    pub role: CounterpartyRole,
    pub kind: CounterpartyKind,
    pub product: ProductType,
    pub basis: BasisRef,
    pub date: NaiveDate,
}

/// Resolves the set of price records valid for a deal's identifying
/// fields. Pure read; an empty result is "no price", not a fault.
#[derive(Debug, Clone)]
pub struct PriceCatalog {
    store: Arc<dyn PriceStore>,
}

impl PriceCatalog {
    pub fn new(store: Arc<dyn PriceStore>) -> Self {
        Self { store }
    }

    /// All records applicable to the query, in store order.
    pub async fn lookup(&self, query: &PriceQuery) -> Result<Vec<PriceRecord>, StoreError> {
        let records = self
            .store
            .find_prices(&query.counterparty_id, query.role)
            .await?;
        Ok(records
            .into_iter()
            .filter(|record| matches(record, query))
            .collect())
    }
}

/// Whether one record satisfies every filter of the query.
fn matches(record: &PriceRecord, query: &PriceQuery) -> bool {
    record.counterparty_id == query.counterparty_id
        && record.role == query.role
        && record.kind == query.kind
        && record.product == query.product
        && matches_basis(record, &query.basis)
        && record.is_applicable_on(query.date)
}

/// Basis matching: by id when the deal carries one, else by name.
fn matches_basis(record: &PriceRecord, basis: &BasisRef) -> bool {
    match basis {
        BasisRef::ById(id) => record.basis_id.as_ref() == Some(id),
        BasisRef::ByName(name) => record.basis.as_deref() == Some(name.as_str()),
        BasisRef::Any => true,
    }
}
