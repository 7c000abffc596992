//! Price records, selections and the composite-id codec.
//!
//! A price record carries an ordered list of serialized `{"price": ...}`
//! entries. Decoding a stored entry never fails hard: a malformed value
//! resolves to "no price" so one bad historical record cannot block
//! unrelated lookups.

use crate::domain::{
    BasisId, CounterpartyId, CounterpartyKind, CounterpartyRole, Decimal, PriceId, ProductType,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One negotiated price agreement with a counterparty.
///
/// Created and edited by the pricing module; read-only to this engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub id: PriceId,
    pub counterparty_id: CounterpartyId,
    pub role: CounterpartyRole,
    pub kind: CounterpartyKind,
    pub product: ProductType,
    /// Basis location name, when the record is bound by name.
    pub basis: Option<String>,
    /// Basis id, preferred over the name when present.
    pub basis_id: Option<BasisId>,
    /// First day the record applies (inclusive).
    pub date_from: NaiveDate,
    /// Last day the record applies (inclusive).
    pub date_to: NaiveDate,
    /// Maximum cumulative volume this record may cover, in kg.
    /// Absent or non-positive means unlimited.
    pub total_volume_cap: Option<Decimal>,
    pub is_active: bool,
    /// Ordered serialized `{"price": ...}` entries; each is independently
    /// selectable by index.
    pub price_values: Vec<String>,
}

/// Wire shape of one stored price value entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PriceValue {
    price: Decimal,
}

impl PriceRecord {
    /// True when this record applies on `date`: active and inside the
    /// inclusive `date_from..=date_to` window.
    pub fn is_applicable_on(&self, date: NaiveDate) -> bool {
        self.is_active && self.date_from <= date && date <= self.date_to
    }

    /// Decode the unit price stored at `index`.
    ///
    /// Returns None when the index is out of range or the stored entry is
    /// malformed; the failure is logged and surfaced as a missing price.
    pub fn decode_value(&self, index: usize) -> Option<Decimal> {
        let raw = self.price_values.get(index)?;
        match serde_json::from_str::<PriceValue>(raw) {
            Ok(value) => Some(value.price),
            Err(e) => {
                warn!(price_id = %self.id, index, error = %e, "Failed to decode stored price value");
                None
            }
        }
    }

    /// The volume cap, normalized: None when absent or non-positive.
    pub fn volume_cap(&self) -> Option<Decimal> {
        self.total_volume_cap.filter(|cap| cap.is_positive())
    }

    /// Serialize a unit price the way the pricing module stores it.
    pub fn encode_value(price: Decimal) -> String {
        // PriceValue only holds serializable fields, so this cannot fail.
        serde_json::to_string(&PriceValue { price }).unwrap_or_default()
    }
}

/// A concrete `(price record, value index)` pair chosen by a user or
/// defaulted to the first matching record's first value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceSelection {
    pub price_id: PriceId,
    pub value_index: usize,
}

/// A UUID has five hyphen-separated segments; a composite id appends a
/// sixth for the value index.
const UUID_SEGMENTS: usize = 5;

impl PriceSelection {
    pub fn new(price_id: PriceId, value_index: usize) -> Self {
        Self {
            price_id,
            value_index,
        }
    }

    /// Encode to the persisted single-string form `"<price_id>-<index>"`.
    ///
    /// Kept only at the serialization edge; in-memory APIs pass the typed
    /// pair.
    pub fn encode(&self) -> String {
        format!("{}-{}", self.price_id, self.value_index)
    }

    /// Decode the persisted single-string form.
    ///
    /// The price id itself may contain hyphens (UUID), so the string is
    /// split on the last hyphen only when the segment count indicates a
    /// UUID-shaped id followed by an index. Anything else is treated as a
    /// bare id with index 0, tolerating ids stored without an embedded
    /// index.
    pub fn decode(s: &str) -> Self {
        let segments: Vec<&str> = s.split('-').collect();
        if segments.len() > UUID_SEGMENTS {
            if let Some((last, id_segments)) = segments.split_last() {
                if let Ok(index) = last.parse::<usize>() {
                    return Self {
                        price_id: PriceId::new(id_segments.join("-")),
                        value_index: index,
                    };
                }
            }
        }
        Self {
            price_id: PriceId::new(s),
            value_index: 0,
        }
    }
}

impl std::fmt::Display for PriceSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encode())
    }
}

/// A resolved unit price, always traceable back to the record and value
/// index it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPrice {
    pub unit_price: Decimal,
    pub price_id: PriceId,
    pub value_index: usize,
}

impl ResolvedPrice {
    /// The selection this price resolves to, for persisting alongside the
    /// numeric result.
    pub fn selection(&self) -> PriceSelection {
        PriceSelection::new(self.price_id.clone(), self.value_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(values: Vec<&str>) -> PriceRecord {
        PriceRecord {
            id: PriceId::new("p1"),
            counterparty_id: CounterpartyId::new("c1"),
            role: CounterpartyRole::Supplier,
            kind: CounterpartyKind::Wholesale,
            product: ProductType::Kerosene,
            basis: Some("Шереметьево".to_string()),
            basis_id: None,
            date_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            date_to: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            total_volume_cap: None,
            is_active: true,
            price_values: values.into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn test_window_is_inclusive() {
        let r = record(vec![r#"{"price": 58.5}"#]);
        assert!(r.is_applicable_on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        assert!(r.is_applicable_on(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()));
        assert!(!r.is_applicable_on(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
        assert!(!r.is_applicable_on(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()));
    }

    #[test]
    fn test_inactive_record_never_applies() {
        let mut r = record(vec![r#"{"price": 58.5}"#]);
        r.is_active = false;
        assert!(!r.is_applicable_on(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));
    }

    #[test]
    fn test_decode_value() {
        let r = record(vec![r#"{"price": 58.5}"#, r#"{"price": 61}"#]);
        assert_eq!(
            r.decode_value(0),
            Some(Decimal::from_str_canonical("58.5").unwrap())
        );
        assert_eq!(r.decode_value(1), Some(Decimal::from_i64(61)));
        assert_eq!(r.decode_value(2), None);
    }

    #[test]
    fn test_decode_malformed_value_is_none() {
        let r = record(vec!["{broken", r#"{"cost": 1}"#]);
        assert_eq!(r.decode_value(0), None);
        assert_eq!(r.decode_value(1), None);
    }

    #[test]
    fn test_encode_value_roundtrip() {
        let raw = PriceRecord::encode_value(Decimal::from_str_canonical("58.5").unwrap());
        let r = record(vec![&raw]);
        assert_eq!(
            r.decode_value(0),
            Some(Decimal::from_str_canonical("58.5").unwrap())
        );
    }

    #[test]
    fn test_volume_cap_normalization() {
        let mut r = record(vec![]);
        assert_eq!(r.volume_cap(), None);
        r.total_volume_cap = Some(Decimal::zero());
        assert_eq!(r.volume_cap(), None);
        r.total_volume_cap = Some(Decimal::from_i64(-10));
        assert_eq!(r.volume_cap(), None);
        r.total_volume_cap = Some(Decimal::from_i64(1000));
        assert_eq!(r.volume_cap(), Some(Decimal::from_i64(1000)));
    }

    #[test]
    fn test_composite_id_roundtrip_uuid() {
        let uuid = "3f2b8c1a-9d4e-4f6a-b7c8-0123456789ab";
        for index in 0..=2 {
            let sel = PriceSelection::new(PriceId::new(uuid), index);
            let decoded = PriceSelection::decode(&sel.encode());
            assert_eq!(decoded.price_id.as_str(), uuid);
            assert_eq!(decoded.value_index, index);
        }
    }

    #[test]
    fn test_decode_bare_uuid_defaults_to_index_zero() {
        let uuid = "3f2b8c1a-9d4e-4f6a-b7c8-0123456789ab";
        let decoded = PriceSelection::decode(uuid);
        assert_eq!(decoded.price_id.as_str(), uuid);
        assert_eq!(decoded.value_index, 0);
    }

    #[test]
    fn test_decode_bare_id_defaults_to_index_zero() {
        let decoded = PriceSelection::decode("price-7");
        assert_eq!(decoded.price_id.as_str(), "price-7");
        assert_eq!(decoded.value_index, 0);
    }

    #[test]
    fn test_decode_non_numeric_tail_is_bare_id() {
        let s = "3f2b8c1a-9d4e-4f6a-b7c8-0123456789ab-extra";
        let decoded = PriceSelection::decode(s);
        assert_eq!(decoded.price_id.as_str(), s);
        assert_eq!(decoded.value_index, 0);
    }

    #[test]
    fn test_resolved_price_traceability() {
        let resolved = ResolvedPrice {
            unit_price: Decimal::from_str_canonical("58.5").unwrap(),
            price_id: PriceId::new("p1"),
            value_index: 1,
        };
        let sel = resolved.selection();
        assert_eq!(sel.price_id.as_str(), "p1");
        assert_eq!(sel.value_index, 1);
    }
}
