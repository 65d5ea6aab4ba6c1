//! Fixed and variable operating cost items plus escalating supplier
//! contracts, split between COGS and opex.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::revenue::RevenueSummary;
use crate::schedule::{MonthlySchedule, PriceAdjustment};
use crate::types::{decimal_powu, Money, Rate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostNature {
    Fixed,
    Variable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostAllocation {
    Cogs,
    Opex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCenter {
    Engineering,
    Product,
    Sales,
    Marketing,
    Cs,
    Gna,
    Other,
}

impl Default for CostCenter {
    fn default() -> Self {
        CostCenter::Other
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostItem {
    pub name: String,
    pub nature: CostNature,
    pub allocation: CostAllocation,
    #[serde(default)]
    pub cost_center: CostCenter,
    pub base_amount: Money,
    #[serde(default)]
    pub variable_rate: Rate,
    #[serde(default = "default_driver")]
    pub driver: String,
    #[serde(default)]
    pub price_adjustment: PriceAdjustment,
    #[serde(default = "MonthlySchedule::one")]
    pub schedule: MonthlySchedule,
}

fn default_driver() -> String {
    "revenue".to_string()
}

impl MonthlySchedule {
    pub fn one() -> Self {
        MonthlySchedule::flat(Decimal::ONE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierContract {
    pub name: String,
    pub start_month: u32,
    pub base_amount: Money,
    #[serde(default)]
    pub escalation_pct: Rate,
    #[serde(default = "default_escalation_frequency")]
    pub escalation_frequency_months: u32,
    #[serde(default = "default_opex")]
    pub allocation: CostAllocation,
    #[serde(default)]
    pub cost_center: CostCenter,
}

fn default_escalation_frequency() -> u32 {
    12
}

fn default_opex() -> CostAllocation {
    CostAllocation::Opex
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CostModel {
    #[serde(default)]
    pub items: Vec<CostItem>,
    #[serde(default)]
    pub supplier_contracts: Vec<SupplierContract>,
    #[serde(default)]
    pub cogs_variable_pct: Rate,
    #[serde(default)]
    pub cogs_per_customer: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub cost_center: CostCenter,
    pub amount: Money,
}

/// Evaluates every line-item cost and escalating contract for
/// `month_index`, returning the per-cost-center breakdown and the COGS /
/// opex split. Does not include the revenue-driven `cogs_variable_pct` and
/// `cogs_per_customer` top-ups — the orchestrator adds those separately
/// since they depend on state (active customers) this function doesn't see.
pub fn compute_costs(
    month_index: u32,
    cost_model: &CostModel,
    revenue_summary: &RevenueSummary,
) -> (Vec<CostBreakdown>, Money, Money) {
    let mut breakdown: BTreeMap<CostCenter, Money> = BTreeMap::new();
    let mut cogs_total = Decimal::ZERO;
    let mut opex_total = Decimal::ZERO;

    for item in &cost_model.items {
        let base_amount = if item.nature == CostNature::Variable {
            let driver_value = if item.driver == "revenue" {
                revenue_summary.total_net
            } else {
                revenue_summary.total_gross
            };
            driver_value * item.variable_rate
        } else {
            item.base_amount
        };
        let mut amount = base_amount * item.schedule.value_for(month_index);
        amount *= Decimal::ONE + item.price_adjustment.factor_for_month(month_index);

        *breakdown.entry(item.cost_center).or_insert(Decimal::ZERO) += amount;
        match item.allocation {
            CostAllocation::Cogs => cogs_total += amount,
            CostAllocation::Opex => opex_total += amount,
        }
    }

    for contract in &cost_model.supplier_contracts {
        if month_index < contract.start_month {
            continue;
        }
        let frequency = contract.escalation_frequency_months.max(1);
        let escalations = (month_index - contract.start_month) / frequency;
        let amount = contract.base_amount * decimal_powu(Decimal::ONE + contract.escalation_pct, escalations);

        *breakdown.entry(contract.cost_center).or_insert(Decimal::ZERO) += amount;
        match contract.allocation {
            CostAllocation::Cogs => cogs_total += amount,
            CostAllocation::Opex => opex_total += amount,
        }
    }

    let breakdown_list = breakdown
        .into_iter()
        .map(|(cost_center, amount)| CostBreakdown { cost_center, amount })
        .collect();

    (breakdown_list, cogs_total, opex_total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn revenue(total_net: Money, total_gross: Money) -> RevenueSummary {
        RevenueSummary {
            total_gross,
            total_net,
            total_churn: Decimal::ZERO,
            total_expansion: Decimal::ZERO,
            arr: Decimal::ZERO,
        }
    }

    #[test]
    fn fixed_cost_is_unaffected_by_revenue() {
        let model = CostModel {
            items: vec![CostItem {
                name: "Rent".into(),
                nature: CostNature::Fixed,
                allocation: CostAllocation::Opex,
                cost_center: CostCenter::Gna,
                base_amount: dec!(10000),
                variable_rate: Decimal::ZERO,
                driver: "revenue".into(),
                price_adjustment: PriceAdjustment::default(),
                schedule: MonthlySchedule::one(),
            }],
            ..Default::default()
        };
        let (_, cogs, opex) = compute_costs(0, &model, &revenue(dec!(500000), dec!(500000)));
        assert_eq!(cogs, Decimal::ZERO);
        assert_eq!(opex, dec!(10000));
    }

    #[test]
    fn variable_cost_scales_with_net_revenue_driver() {
        let model = CostModel {
            items: vec![CostItem {
                name: "Hosting".into(),
                nature: CostNature::Variable,
                allocation: CostAllocation::Cogs,
                cost_center: CostCenter::Engineering,
                base_amount: Decimal::ZERO,
                variable_rate: dec!(0.1),
                driver: "revenue".into(),
                price_adjustment: PriceAdjustment::default(),
                schedule: MonthlySchedule::one(),
            }],
            ..Default::default()
        };
        let (_, cogs, _) = compute_costs(0, &model, &revenue(dec!(100000), dec!(120000)));
        assert_eq!(cogs, dec!(10000));
    }

    #[test]
    fn supplier_contract_escalates_after_each_period() {
        let model = CostModel {
            supplier_contracts: vec![SupplierContract {
                name: "AWS".into(),
                start_month: 0,
                base_amount: dec!(1000),
                escalation_pct: dec!(0.1),
                escalation_frequency_months: 12,
                allocation: CostAllocation::Opex,
                cost_center: CostCenter::Other,
            }],
            ..Default::default()
        };
        let (_, _, opex_month_0) = compute_costs(0, &model, &revenue(Decimal::ZERO, Decimal::ZERO));
        let (_, _, opex_month_12) = compute_costs(12, &model, &revenue(Decimal::ZERO, Decimal::ZERO));
        assert_eq!(opex_month_0, dec!(1000));
        assert_eq!(opex_month_12, dec!(1100.0));
    }

    #[test]
    fn supplier_contract_is_skipped_before_start_month() {
        let model = CostModel {
            supplier_contracts: vec![SupplierContract {
                name: "Vendor".into(),
                start_month: 5,
                base_amount: dec!(500),
                escalation_pct: Decimal::ZERO,
                escalation_frequency_months: 12,
                allocation: CostAllocation::Opex,
                cost_center: CostCenter::Other,
            }],
            ..Default::default()
        };
        let (_, _, opex) = compute_costs(2, &model, &revenue(Decimal::ZERO, Decimal::ZERO));
        assert_eq!(opex, Decimal::ZERO);
    }
}
