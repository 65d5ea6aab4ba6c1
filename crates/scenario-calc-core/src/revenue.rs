//! Revenue plans: subscription-style customer cohorts plus flat
//! professional-services and other-recurring top-ups.

use std::collections::{HashMap, VecDeque};

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};

use crate::schedule::{MonthlySchedule, SeasonalPattern};
use crate::schedule::RampUpSettings;
use crate::types::{Money, Rate};

/// How a plan's revenue is recognised. Carried as declared metadata only —
/// the monthly orchestrator recognises every plan's revenue through the
/// same deferral-queue mechanism regardless of this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueRecognitionModel {
    Subscription,
    Services,
    Transactional,
}

impl Default for RevenueRecognitionModel {
    fn default() -> Self {
        RevenueRecognitionModel::Subscription
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenuePlan {
    pub name: String,
    #[serde(default)]
    pub recognition: RevenueRecognitionModel,
    pub initial_customers: Decimal,
    pub initial_arpa: Money,
    pub new_customers: MonthlySchedule,
    pub churn_rate: MonthlySchedule,
    #[serde(default = "MonthlySchedule::zero")]
    pub expansion_rate: MonthlySchedule,
    #[serde(default = "MonthlySchedule::zero")]
    pub contraction_rate: MonthlySchedule,
    #[serde(default = "MonthlySchedule::zero")]
    pub discount_rate: MonthlySchedule,
    #[serde(default = "MonthlySchedule::zero")]
    pub arpa_growth_rate: MonthlySchedule,
    #[serde(default = "SeasonalPattern::flat")]
    pub seasonal_pattern: SeasonalPattern,
    #[serde(default)]
    pub ramp_up: RampUpSettings,
    #[serde(default)]
    pub revenue_deferral_months: u32,
    #[serde(default)]
    pub services_attach_rate: Rate,
    #[serde(default)]
    pub services_asp: Money,
    /// Declared but never multiplied into revenue by the orchestrator — see
    /// `transactional_volume` / `transactional_fee` for the figures that
    /// actually drive transactional revenue.
    #[serde(default)]
    pub transactional_rate: Rate,
    #[serde(default = "MonthlySchedule::zero")]
    pub transactional_volume: MonthlySchedule,
    #[serde(default)]
    pub transactional_fee: Money,
}

impl MonthlySchedule {
    pub fn zero() -> Self {
        MonthlySchedule::flat(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevenueModel {
    pub plans: Vec<RevenuePlan>,
    #[serde(default = "MonthlySchedule::zero")]
    pub other_recurring_revenue: MonthlySchedule,
    #[serde(default = "MonthlySchedule::zero")]
    pub professional_services_revenue: MonthlySchedule,
    #[serde(default)]
    pub adjustments: HashMap<String, Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub total_gross: Money,
    pub total_net: Money,
    pub total_churn: Money,
    pub total_expansion: Money,
    pub arr: Money,
}

/// Running state carried month-to-month for a single plan's customer base
/// and revenue-recognition queue.
#[derive(Debug, Clone)]
pub struct PlanState {
    pub active_customers: Decimal,
    pub deferred_revenue: VecDeque<Money>,
}

impl PlanState {
    pub fn new(plan: &RevenuePlan) -> Self {
        PlanState {
            active_customers: plan.initial_customers,
            deferred_revenue: VecDeque::from(vec![Decimal::ZERO; plan.revenue_deferral_months as usize]),
        }
    }
}

/// Evaluates every plan for `month_index`, mutating `plan_states` in place,
/// and returns the aggregated revenue for the month.
pub fn compute_revenue(
    month_index: u32,
    revenue_model: &RevenueModel,
    plan_states: &mut HashMap<String, PlanState>,
) -> RevenueSummary {
    let mut total_gross = Decimal::ZERO;
    let mut total_net = Decimal::ZERO;
    let mut total_churn = Decimal::ZERO;
    let mut total_expansion = Decimal::ZERO;
    let mut arr = Decimal::ZERO;

    for plan in &revenue_model.plans {
        let state = plan_states.get_mut(&plan.name).expect("plan state seeded at run start");

        let new_customers = plan.new_customers.value_for(month_index).max(Decimal::ZERO);
        let churn_rate = plan.churn_rate.value_for(month_index);
        let expansion_rate = plan.expansion_rate.value_for(month_index);
        let contraction_rate = plan.contraction_rate.value_for(month_index);
        let arpa_growth = plan.arpa_growth_rate.value_for(month_index);
        let seasonal_factor = plan.seasonal_pattern.factor(month_index);

        let churned_customers = state.active_customers * churn_rate;
        state.active_customers = (state.active_customers + new_customers - churned_customers).max(Decimal::ZERO);

        let exponent = Decimal::from(month_index + 1);
        let mut arpa = plan.initial_arpa * (Decimal::ONE + arpa_growth).powd(exponent);
        arpa *= seasonal_factor;

        let base_revenue = state.active_customers * arpa;
        let discount = base_revenue * plan.discount_rate.value_for(month_index);
        let expansion_revenue = base_revenue * expansion_rate;
        let contraction_revenue = base_revenue * contraction_rate;
        let mut gross_revenue = base_revenue + expansion_revenue - contraction_revenue;

        let services_revenue = plan.services_attach_rate * new_customers * plan.services_asp;
        let transactional_revenue = plan.transactional_volume.value_for(month_index) * plan.transactional_fee;
        gross_revenue += services_revenue + transactional_revenue;

        let recognized = if plan.revenue_deferral_months > 0 {
            state.deferred_revenue.push_back(gross_revenue);
            let oldest = state.deferred_revenue.pop_front().unwrap_or(Decimal::ZERO);
            oldest / Decimal::from(plan.revenue_deferral_months.max(1))
        } else {
            gross_revenue
        };

        total_gross += gross_revenue;
        total_net += recognized - discount;
        total_churn += churned_customers * arpa;
        total_expansion += expansion_revenue;
        arr += recognized * Decimal::from(12);
    }

    total_gross += revenue_model.professional_services_revenue.value_for(month_index);
    total_net += revenue_model.other_recurring_revenue.value_for(month_index);

    RevenueSummary {
        total_gross,
        total_net,
        total_churn,
        total_expansion,
        arr,
    }
}
