//! Remaining capacity of a capped supply/sale contract.

use super::{CheckStatus, VolumeCheck};
use crate::domain::Decimal;

/// Compute remaining contract capacity against already-consumed volume
/// and the deal being entered.
///
/// `used_kg` comes from the external aggregator and, when editing,
/// already includes the edited deal's stored quantity; the pending
/// quantity is therefore subtracted only when creating. A cap that is
/// absent or non-positive means the contract is uncapped.
pub fn remaining_volume(
    total_volume_cap: Option<Decimal>,
    used_kg: Decimal,
    pending_kg: Decimal,
    is_editing: bool,
) -> VolumeCheck {
    let cap = match total_volume_cap.filter(|cap| cap.is_positive()) {
        Some(cap) => cap,
        None => {
            return VolumeCheck {
                remaining_kg: None,
                status: CheckStatus::Ok,
                message: "объём по договору не ограничен".to_string(),
            }
        }
    };

    let pending = if is_editing {
        Decimal::zero()
    } else {
        pending_kg
    };
    let remaining = cap - used_kg - pending;

    if remaining.is_negative() {
        VolumeCheck {
            remaining_kg: Some(remaining),
            status: CheckStatus::Error,
            message: format!("превышение объёма по договору: {} кг", remaining),
        }
    } else {
        VolumeCheck {
            remaining_kg: Some(remaining),
            status: CheckStatus::Ok,
            message: format!("остаток по договору: {} кг", remaining),
        }
    }
}
