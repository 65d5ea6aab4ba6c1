//! Capital expenditure items and the depreciation tracks they spawn.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Money;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapexItem {
    pub name: String,
    pub month_index: u32,
    pub amount: Money,
    pub useful_life_months: u32,
    #[serde(default)]
    pub salvage_value: Money,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapexModel {
    pub items: Vec<CapexItem>,
}

/// A single capex item's depreciation in progress: months remaining and the
/// constant monthly charge fixed at activation.
#[derive(Debug, Clone)]
struct DepreciationTrack {
    remaining_months: u32,
    monthly_charge: Money,
}

#[derive(Default)]
pub struct DepreciationLedger {
    tracks: Vec<DepreciationTrack>,
}

impl DepreciationLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Activates any capex items starting this month, charges straight-line
/// depreciation on every live track, retires exhausted tracks, and returns
/// `(depreciation, accumulated_depreciation, fixed_assets)`.
pub fn compute_depreciation(
    month_index: u32,
    capex_model: &CapexModel,
    ledger: &mut DepreciationLedger,
    mut fixed_assets: Money,
    mut accumulated_depreciation: Money,
) -> (Money, Money, Money) {
    for item in capex_model.items.iter().filter(|item| item.month_index == month_index) {
        fixed_assets += item.amount;
        let monthly_charge = ((item.amount - item.salvage_value) / Decimal::from(item.useful_life_months.max(1))).max(Decimal::ZERO);
        ledger.tracks.push(DepreciationTrack {
            remaining_months: item.useful_life_months,
            monthly_charge,
        });
    }

    let mut depreciation = Decimal::ZERO;
    ledger.tracks.retain_mut(|track| {
        if track.remaining_months == 0 {
            return false;
        }
        depreciation += track.monthly_charge;
        track.remaining_months -= 1;
        true
    });

    accumulated_depreciation += depreciation;
    (depreciation, accumulated_depreciation, fixed_assets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn capex_activates_fixed_assets_in_its_start_month() {
        let model = CapexModel {
            items: vec![CapexItem {
                name: "Platform".into(),
                month_index: 0,
                amount: dec!(360000),
                useful_life_months: 36,
                salvage_value: Decimal::ZERO,
            }],
        };
        let mut ledger = DepreciationLedger::new();
        let (dep, accum, fixed_assets) = compute_depreciation(0, &model, &mut ledger, Decimal::ZERO, Decimal::ZERO);
        assert_eq!(fixed_assets, dec!(360000));
        assert_eq!(dep, dec!(10000));
        assert_eq!(accum, dec!(10000));
    }

    #[test]
    fn depreciation_track_exhausts_after_useful_life() {
        let model = CapexModel {
            items: vec![CapexItem {
                name: "Laptop".into(),
                month_index: 0,
                amount: dec!(2400),
                useful_life_months: 2,
                salvage_value: Decimal::ZERO,
            }],
        };
        let mut ledger = DepreciationLedger::new();
        let (dep_month_0, _, _) = compute_depreciation(0, &model, &mut ledger, Decimal::ZERO, Decimal::ZERO);
        assert_eq!(dep_month_0, dec!(1200));
        let (dep_month_1, _, _) = compute_depreciation(1, &model, &mut ledger, Decimal::ZERO, Decimal::ZERO);
        assert_eq!(dep_month_1, dec!(1200));
        let (dep_after, _, _) = compute_depreciation(2, &model, &mut ledger, Decimal::ZERO, Decimal::ZERO);
        assert_eq!(dep_after, Decimal::ZERO);
    }
}
