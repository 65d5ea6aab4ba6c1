//! Top-level scenario composition: metadata, currency, timeframe, opening
//! balance sheet, and the `ScenarioInput` struct that wires every sub-model
//! together.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::capex::CapexModel;
use crate::costs::CostModel;
use crate::error::ScenarioError;
use crate::funding::FundingModel;
use crate::headcount::HeadcountModel;
use crate::revenue::RevenueModel;
use crate::taxes::TaxModel;
use crate::types::{Money, Rate};
use crate::valuation::ValuationSettings;
use crate::working_capital::WorkingCapitalModel;
use crate::ScenarioResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioType {
    Base,
    Bull,
    Bear,
}

impl Default for ScenarioType {
    fn default() -> Self {
        ScenarioType::Base
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioMeta {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub scenario_type: ScenarioType,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_timezone() -> String {
    "America/Sao_Paulo".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencySettings {
    pub base_currency: String,
    pub display_currency: String,
    #[serde(default = "one")]
    pub fx_rate: Decimal,
}

fn one() -> Decimal {
    Decimal::ONE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeframeSettings {
    pub start_date: NaiveDate,
    pub months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyState {
    pub as_of: NaiveDate,
    pub cash: Money,
    #[serde(default)]
    pub accounts_receivable: Money,
    #[serde(default)]
    pub accounts_payable: Money,
    #[serde(default)]
    pub inventory: Money,
    #[serde(default)]
    pub fixed_assets: Money,
    #[serde(default)]
    pub accumulated_depreciation: Money,
    #[serde(default)]
    pub debt: Money,
    #[serde(default)]
    pub equity: Money,
}

impl CompanyState {
    pub fn net_fixed_assets(&self) -> Money {
        (self.fixed_assets - self.accumulated_depreciation).max(Decimal::ZERO)
    }

    /// The opening equity to carry into month 0. If `equity` was left at
    /// zero, falls back to cash plus net fixed assets — the same fallback
    /// the reference model applies, since a freshly-seeded balance sheet
    /// rarely states equity explicitly.
    pub fn opening_equity(&self) -> Money {
        if self.equity.is_zero() {
            self.cash + self.net_fixed_assets()
        } else {
            self.equity
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioInput {
    pub meta: ScenarioMeta,
    pub currency: CurrencySettings,
    pub timeframe: TimeframeSettings,
    pub company_state: CompanyState,
    pub revenue: RevenueModel,
    pub headcount: HeadcountModel,
    pub costs: CostModel,
    pub taxes: TaxModel,
    pub capex: CapexModel,
    pub working_capital: WorkingCapitalModel,
    pub funding: FundingModel,
    pub valuation: ValuationSettings,
}

impl ScenarioInput {
    /// Returns a scenario identical to `self` but tagged with a different
    /// [`ScenarioType`] and id/name, for producing bull/bear variants
    /// without mutating the original.
    pub fn clone_as(&self, id: impl Into<String>, name: impl Into<String>, scenario_type: ScenarioType) -> Self {
        let mut clone = self.clone();
        clone.meta.id = id.into();
        clone.meta.name = name.into();
        clone.meta.scenario_type = scenario_type;
        clone
    }

    /// Validates structural invariants that the monthly orchestrator
    /// assumes hold. This never inspects sub-model *values* for financial
    /// plausibility (that is the domain of [`FinancialImpossibility`](ScenarioError::FinancialImpossibility)
    /// raised deeper in the valuation layer) — only the shape of the input.
    pub fn validate(&self) -> ScenarioResult<()> {
        if self.timeframe.months < 1 {
            return Err(ScenarioError::InvalidInput {
                field: "timeframe.months".into(),
                reason: "must be at least 1".into(),
            });
        }

        for plan in &self.revenue.plans {
            if plan.name.is_empty() {
                return Err(ScenarioError::InvalidInput {
                    field: "revenue.plans[].name".into(),
                    reason: "must not be empty".into(),
                });
            }
            if plan.revenue_deferral_months > 0 && plan.revenue_deferral_months as u32 > self.timeframe.months * 4 {
                return Err(ScenarioError::InvalidInput {
                    field: "revenue.plans[].revenue_deferral_months".into(),
                    reason: "deferral window is implausibly longer than the projection horizon".into(),
                });
            }
            if plan.ramp_up.factor < Decimal::ZERO || plan.ramp_up.factor > Decimal::ONE {
                return Err(ScenarioError::InvalidInput {
                    field: "revenue.plans[].ramp_up.factor".into(),
                    reason: "must be between 0 and 1".into(),
                });
            }
            if plan.ramp_up.months < 1 {
                return Err(ScenarioError::InvalidInput {
                    field: "revenue.plans[].ramp_up.months".into(),
                    reason: "must be at least 1".into(),
                });
            }
        }

        for item in &self.capex.items {
            if item.useful_life_months == 0 {
                return Err(ScenarioError::InvalidInput {
                    field: "capex.items[].useful_life_months".into(),
                    reason: "must be greater than zero".into(),
                });
            }
        }

        let wacc = self.valuation.wacc;
        let g = self.valuation.perpetual_growth_rate;
        if matches!(
            self.valuation.terminal_method,
            crate::valuation::TerminalValueMethod::Perpetuity
        ) && wacc <= g
        {
            return Err(ScenarioError::FinancialImpossibility(format!(
                "perpetuity terminal value requires wacc ({wacc}) > perpetual growth rate ({g})"
            )));
        }

        validate_rate(wacc, "valuation.wacc")?;

        Ok(())
    }
}

fn validate_rate(rate: Rate, field: &str) -> ScenarioResult<()> {
    if rate <= -Decimal::ONE {
        return Err(ScenarioError::InvalidInput {
            field: field.into(),
            reason: "rate must be greater than -100%".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capex::CapexModel;
    use crate::costs::CostModel;
    use crate::funding::FundingModel;
    use crate::headcount::HeadcountModel;
    use crate::revenue::{RevenueModel, RevenuePlan};
    use crate::schedule::{MonthlySchedule, RampUpSettings, SeasonalPattern};
    use crate::taxes::{TaxModel, TaxRegime};
    use crate::valuation::{MultipleMetric, TerminalValueMethod, ValuationSettings};
    use crate::working_capital::WorkingCapitalModel;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn plan_with_ramp_up(ramp_up: RampUpSettings) -> RevenuePlan {
        RevenuePlan {
            name: "Plan".into(),
            recognition: Default::default(),
            initial_customers: dec!(0),
            initial_arpa: dec!(0),
            new_customers: MonthlySchedule::zero(),
            churn_rate: MonthlySchedule::zero(),
            expansion_rate: MonthlySchedule::zero(),
            contraction_rate: MonthlySchedule::zero(),
            discount_rate: MonthlySchedule::zero(),
            arpa_growth_rate: MonthlySchedule::zero(),
            seasonal_pattern: SeasonalPattern::flat(),
            ramp_up,
            revenue_deferral_months: 0,
            services_attach_rate: dec!(0),
            services_asp: dec!(0),
            transactional_rate: dec!(0),
            transactional_volume: MonthlySchedule::zero(),
            transactional_fee: dec!(0),
        }
    }

    fn scenario_with_plan(plan: RevenuePlan) -> ScenarioInput {
        ScenarioInput {
            meta: ScenarioMeta {
                id: "s".into(),
                name: "Scenario".into(),
                scenario_type: ScenarioType::Base,
                timezone: default_timezone(),
                description: None,
            },
            currency: CurrencySettings {
                base_currency: "BRL".into(),
                display_currency: "BRL".into(),
                fx_rate: Decimal::ONE,
            },
            timeframe: TimeframeSettings {
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
                months: 12,
            },
            company_state: CompanyState {
                as_of: NaiveDate::from_ymd_opt(2023, 12, 31).expect("valid date"),
                cash: dec!(0),
                accounts_receivable: dec!(0),
                accounts_payable: dec!(0),
                inventory: dec!(0),
                fixed_assets: dec!(0),
                accumulated_depreciation: dec!(0),
                debt: dec!(0),
                equity: dec!(0),
            },
            revenue: RevenueModel {
                plans: vec![plan],
                other_recurring_revenue: MonthlySchedule::zero(),
                professional_services_revenue: MonthlySchedule::zero(),
                adjustments: HashMap::new(),
            },
            headcount: HeadcountModel::default(),
            costs: CostModel::default(),
            taxes: TaxModel {
                regime: TaxRegime::Custom,
                taxes: vec![],
                progressive: vec![],
                credits: vec![],
                effective_income_tax_rate: dec!(0),
            },
            capex: CapexModel::default(),
            working_capital: WorkingCapitalModel::default(),
            funding: FundingModel::default(),
            valuation: ValuationSettings {
                wacc: dec!(0.18),
                perpetual_growth_rate: dec!(0.03),
                terminal_method: TerminalValueMethod::Perpetuity,
                terminal_multiple: dec!(8.0),
                terminal_multiple_metric: MultipleMetric::Ebitda,
                exit_year_multiple: dec!(6.0),
                target_exit_year: 5,
                discount_rate_vc: dec!(0.35),
                probability_of_success: dec!(0.6),
                scorecard_weights: HashMap::new(),
            },
        }
    }

    #[test]
    fn ramp_up_factor_above_one_is_rejected() {
        let scenario = scenario_with_plan(plan_with_ramp_up(RampUpSettings { months: 3, factor: dec!(2.0) }));
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn ramp_up_factor_below_zero_is_rejected() {
        let scenario = scenario_with_plan(plan_with_ramp_up(RampUpSettings { months: 3, factor: dec!(-0.1) }));
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn ramp_up_zero_months_is_rejected() {
        let scenario = scenario_with_plan(plan_with_ramp_up(RampUpSettings { months: 0, factor: dec!(0.5) }));
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn ramp_up_within_bounds_is_accepted() {
        let scenario = scenario_with_plan(plan_with_ramp_up(RampUpSettings { months: 3, factor: dec!(0.5) }));
        assert!(scenario.validate().is_ok());
    }
}
