//! Picks one concrete unit price from a catalog lookup result.

use crate::domain::{PriceRecord, PriceSelection, ResolvedPrice};

/// Resolve a unit price from `records`.
///
/// With a selection, the matching record's value at the selected index is
/// returned; a selection pointing at a record that is no longer in the
/// result set falls back to the default. Without a selection, the default
/// is the first record's first value.
///
/// Returns None when `records` is empty or the chosen value entry is
/// absent or fails to decode; callers render that as "no price" and
/// block non-draft submission.
pub fn resolve(
    records: &[PriceRecord],
    selection: Option<&PriceSelection>,
) -> Option<ResolvedPrice> {
    if let Some(selection) = selection {
        if let Some(record) = records.iter().find(|r| r.id == selection.price_id) {
            return record
                .decode_value(selection.value_index)
                .map(|unit_price| ResolvedPrice {
                    unit_price,
                    price_id: record.id.clone(),
                    value_index: selection.value_index,
                });
        }
    }

    let first = records.first()?;
    first.decode_value(0).map(|unit_price| ResolvedPrice {
        unit_price,
        price_id: first.id.clone(),
        value_index: 0,
    })
}
