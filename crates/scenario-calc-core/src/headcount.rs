//! Headcount positions, scheduled hires, attrition, and the monthly payroll
//! cost breakdown by area.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::schedule::{MonthlySchedule, PriceAdjustment};
use crate::types::{Money, Rate};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionCost {
    pub name: String,
    pub monthly_cost: Money,
    #[serde(default)]
    pub price_adjustment: PriceAdjustment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadcountPosition {
    pub role: String,
    pub area: String,
    pub level: String,
    pub current_fte: Decimal,
    pub base_salary: Money,
    #[serde(default)]
    pub benefits_pct: Rate,
    #[serde(default)]
    pub benefits_fixed: Money,
    #[serde(default)]
    pub bonus_pct: Rate,
    #[serde(default)]
    pub payroll_taxes_pct: Rate,
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionCost>,
    /// Declared but never applied to `base_salary` by the orchestrator —
    /// only subscription costs carry a price adjustment month to month.
    #[serde(default)]
    pub salary_adjustment: PriceAdjustment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HiringPlan {
    pub role: String,
    pub month_index: u32,
    pub quantity: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_override: Option<Money>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeadcountModel {
    pub positions: Vec<HeadcountPosition>,
    #[serde(default)]
    pub hires: Vec<HiringPlan>,
    #[serde(default = "MonthlySchedule::zero")]
    pub attrition_pct: MonthlySchedule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadcountCostBreakdown {
    pub area: String,
    pub salaries: Money,
    pub benefits: Money,
    pub subscriptions: Money,
    pub total: Money,
    pub fte: Decimal,
}

/// Running state for one role: current headcount and the salary rate that
/// applies to it (which may have been overridden by a later hire).
#[derive(Debug, Clone)]
pub struct HeadcountState {
    pub position: HeadcountPosition,
    pub fte: Decimal,
    pub current_salary: Money,
}

#[derive(Default)]
struct AreaTotals {
    salaries: Money,
    benefits: Money,
    subscriptions: Money,
    total: Money,
    fte: Decimal,
}

/// Applies scheduled hires for `month_index`, ages every role by the
/// month's attrition rate, and returns the payroll breakdown by area
/// alongside the total payroll cost.
pub fn compute_headcount(
    month_index: u32,
    headcount_model: &HeadcountModel,
    headcount_states: &mut HashMap<String, HeadcountState>,
) -> (Vec<HeadcountCostBreakdown>, Money) {
    for hire in headcount_model.hires.iter().filter(|h| h.month_index == month_index) {
        if !headcount_states.contains_key(&hire.role) {
            let matching = headcount_model.positions.iter().find(|pos| pos.role == hire.role);
            let Some(matching) = matching else { continue };
            headcount_states.insert(
                hire.role.clone(),
                HeadcountState {
                    position: matching.clone(),
                    fte: Decimal::ZERO,
                    current_salary: matching.base_salary,
                },
            );
        }
        let state = headcount_states.get_mut(&hire.role).expect("inserted above");
        state.fte += hire.quantity;
        if let Some(override_salary) = hire.salary_override {
            state.current_salary = override_salary;
        }
    }

    let attrition_rate = headcount_model.attrition_pct.value_for(month_index);
    let mut payroll_total = Decimal::ZERO;
    let mut area_totals: BTreeMap<String, AreaTotals> = BTreeMap::new();

    for state in headcount_states.values_mut() {
        if state.fte <= Decimal::ZERO {
            continue;
        }
        state.fte *= Decimal::ONE - attrition_rate;

        let monthly_salary = state.current_salary / Decimal::from(12);
        let salary_cost = state.fte * monthly_salary;
        let benefits = salary_cost * state.position.benefits_pct + state.fte * state.position.benefits_fixed;
        let bonus = salary_cost * state.position.bonus_pct;
        let payroll_taxes = salary_cost * state.position.payroll_taxes_pct;
        let subs_cost: Money = state
            .position
            .subscriptions
            .iter()
            .map(|sub| sub.monthly_cost * (Decimal::ONE + sub.price_adjustment.factor_for_month(month_index)))
            .sum::<Money>()
            * state.fte;

        let total = salary_cost + benefits + bonus + payroll_taxes + subs_cost;
        payroll_total += total;

        let area = area_totals.entry(state.position.area.clone()).or_default();
        area.salaries += salary_cost;
        area.benefits += benefits + bonus + payroll_taxes;
        area.subscriptions += subs_cost;
        area.total += total;
        area.fte += state.fte;
    }

    let breakdown = area_totals
        .into_iter()
        .map(|(area, totals)| HeadcountCostBreakdown {
            area,
            salaries: totals.salaries,
            benefits: totals.benefits,
            subscriptions: totals.subscriptions,
            total: totals.total,
            fte: totals.fte,
        })
        .collect();

    (breakdown, payroll_total)
}
