//! Time-varying numeric primitives shared across the revenue, headcount and
//! cost models: per-month overrides, seasonal multipliers, ramp-up curves
//! and inflation-linked price adjustments.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Rate;

/// A monthly value with a default and sparse 0-based-month overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthlySchedule {
    pub default: Decimal,
    #[serde(default)]
    pub adjustments: HashMap<u32, Decimal>,
}

impl MonthlySchedule {
    pub fn flat(default: Decimal) -> Self {
        MonthlySchedule {
            default,
            adjustments: HashMap::new(),
        }
    }

    pub fn value_for(&self, month_index: u32) -> Decimal {
        self.adjustments
            .get(&month_index)
            .copied()
            .unwrap_or(self.default)
    }
}

/// Length-12 seasonal multipliers, indexed by `month_index % 12`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalPattern {
    pub values: [Decimal; 12],
}

impl SeasonalPattern {
    pub fn flat() -> Self {
        SeasonalPattern {
            values: [Decimal::ONE; 12],
        }
    }

    pub fn factor(&self, month_index: u32) -> Decimal {
        self.values[(month_index % 12) as usize]
    }
}

/// Linear ramp from zero to `factor` over `months` months.
///
/// Not applied anywhere in the monthly orchestrator (see the revenue and
/// headcount modules); carried on `RevenuePlan` purely as declared,
/// forward-looking configuration, matching the reference model it was
/// ported from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RampUpSettings {
    pub months: u32,
    pub factor: Rate,
}

impl Default for RampUpSettings {
    fn default() -> Self {
        RampUpSettings {
            months: 1,
            factor: Decimal::ONE,
        }
    }
}

impl RampUpSettings {
    pub fn completion(&self, month_index: u32) -> Decimal {
        let months = self.months.max(1);
        let fraction = Decimal::from(month_index + 1) / Decimal::from(months);
        fraction.min(Decimal::ONE) * self.factor
    }
}

/// A named annual inflation rate, convertible to a compounding monthly rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InflationIndex {
    pub name: String,
    pub annual_rate: Rate,
}

impl InflationIndex {
    pub fn monthly_factor(&self) -> Decimal {
        (Decimal::ONE + self.annual_rate).powd(dec!(1) / dec!(12)) - Decimal::ONE
    }
}

/// Combines an optional inflation indexer with a custom monthly rate; the
/// two add, they are not compounded together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceAdjustment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indexer: Option<InflationIndex>,
    #[serde(default)]
    pub custom_monthly_rate: Rate,
}

impl PriceAdjustment {
    pub fn factor_for_month(&self, _month_index: u32) -> Decimal {
        let mut base = self.custom_monthly_rate;
        if let Some(indexer) = &self.indexer {
            base += indexer.monthly_factor();
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn monthly_schedule_falls_back_to_default() {
        let mut sched = MonthlySchedule::flat(dec!(0.015));
        sched.adjustments.insert(3, dec!(0.05));
        assert_eq!(sched.value_for(0), dec!(0.015));
        assert_eq!(sched.value_for(3), dec!(0.05));
    }

    #[test]
    fn seasonal_pattern_wraps_at_twelve_months() {
        let mut values = [Decimal::ONE; 12];
        values[1] = dec!(1.2);
        let pattern = SeasonalPattern { values };
        assert_eq!(pattern.factor(1), dec!(1.2));
        assert_eq!(pattern.factor(13), dec!(1.2));
    }

    #[test]
    fn ramp_up_caps_at_factor() {
        let ramp = RampUpSettings {
            months: 4,
            factor: dec!(0.8),
        };
        assert_eq!(ramp.completion(0), dec!(0.2));
        assert_eq!(ramp.completion(3), dec!(0.8));
        assert_eq!(ramp.completion(10), dec!(0.8));
    }

    #[test]
    fn price_adjustment_sums_indexer_and_custom_rate() {
        let adj = PriceAdjustment {
            indexer: Some(InflationIndex {
                name: "CPI".into(),
                annual_rate: dec!(0.04),
            }),
            custom_monthly_rate: dec!(0.001),
        };
        let factor = adj.factor_for_month(5);
        assert!(factor > dec!(0.001));
    }
}
