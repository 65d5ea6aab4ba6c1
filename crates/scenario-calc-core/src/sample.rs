//! A fully-populated scenario used by the test suite and the CLI's `sample`
//! subcommand, ported field-for-field from the reference model's example
//! fixture.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use crate::capex::{CapexItem, CapexModel};
use crate::costs::{CostAllocation, CostCenter, CostItem, CostModel, CostNature};
use crate::funding::{EquityRound, FundingModel};
use crate::headcount::{HeadcountModel, HeadcountPosition, HiringPlan};
use crate::revenue::{RevenueModel, RevenuePlan};
use crate::scenario::{CompanyState, CurrencySettings, ScenarioInput, ScenarioMeta, TimeframeSettings};
use crate::schedule::MonthlySchedule;
use crate::taxes::{TaxBase, TaxComponent, TaxModel, TaxRegime};
use crate::valuation::{MultipleMetric, TerminalValueMethod, ValuationSettings};
use crate::working_capital::WorkingCapitalModel;

pub fn sample_scenario() -> ScenarioInput {
    let revenue_plan = RevenuePlan {
        name: "SaaS".into(),
        recognition: Default::default(),
        initial_customers: dec!(120),
        initial_arpa: dec!(3200),
        new_customers: MonthlySchedule::flat(dec!(12.0)),
        churn_rate: MonthlySchedule::flat(dec!(0.015)),
        expansion_rate: MonthlySchedule::flat(dec!(0.03)),
        contraction_rate: MonthlySchedule::zero(),
        discount_rate: MonthlySchedule::zero(),
        arpa_growth_rate: MonthlySchedule::flat(dec!(0.015)),
        seasonal_pattern: crate::schedule::SeasonalPattern::flat(),
        ramp_up: Default::default(),
        revenue_deferral_months: 0,
        services_attach_rate: dec!(0),
        services_asp: dec!(0),
        transactional_rate: dec!(0),
        transactional_volume: MonthlySchedule::zero(),
        transactional_fee: dec!(0),
    };

    let revenue = RevenueModel {
        plans: vec![revenue_plan],
        other_recurring_revenue: MonthlySchedule::zero(),
        professional_services_revenue: MonthlySchedule::zero(),
        adjustments: HashMap::new(),
    };

    let headcount = HeadcountModel {
        positions: vec![
            HeadcountPosition {
                role: "Engineer".into(),
                area: "Engineering".into(),
                level: "Senior".into(),
                current_fte: dec!(9),
                base_salary: dec!(240000),
                benefits_pct: dec!(0.25),
                benefits_fixed: dec!(0),
                bonus_pct: dec!(0),
                payroll_taxes_pct: dec!(0),
                subscriptions: vec![],
                salary_adjustment: Default::default(),
            },
            HeadcountPosition {
                role: "Product Manager".into(),
                area: "Product".into(),
                level: "Pleno".into(),
                current_fte: dec!(3),
                base_salary: dec!(210000),
                benefits_pct: dec!(0.22),
                benefits_fixed: dec!(0),
                bonus_pct: dec!(0),
                payroll_taxes_pct: dec!(0),
                subscriptions: vec![],
                salary_adjustment: Default::default(),
            },
            HeadcountPosition {
                role: "Sales".into(),
                area: "Sales".into(),
                level: "Mid".into(),
                current_fte: dec!(4),
                base_salary: dec!(180000),
                benefits_pct: dec!(0.18),
                benefits_fixed: dec!(0),
                bonus_pct: dec!(0.1),
                payroll_taxes_pct: dec!(0),
                subscriptions: vec![],
                salary_adjustment: Default::default(),
            },
            HeadcountPosition {
                role: "Customer Success".into(),
                area: "CS".into(),
                level: "Mid".into(),
                current_fte: dec!(3),
                base_salary: dec!(156000),
                benefits_pct: dec!(0.18),
                benefits_fixed: dec!(0),
                bonus_pct: dec!(0),
                payroll_taxes_pct: dec!(0),
                subscriptions: vec![],
                salary_adjustment: Default::default(),
            },
            HeadcountPosition {
                role: "G&A".into(),
                area: "GNA".into(),
                level: "Mid".into(),
                current_fte: dec!(3),
                base_salary: dec!(150000),
                benefits_pct: dec!(0.16),
                benefits_fixed: dec!(0),
                bonus_pct: dec!(0),
                payroll_taxes_pct: dec!(0),
                subscriptions: vec![],
                salary_adjustment: Default::default(),
            },
        ],
        hires: vec![
            HiringPlan {
                role: "Engineer".into(),
                month_index: 6,
                quantity: dec!(2),
                salary_override: None,
            },
            HiringPlan {
                role: "Sales".into(),
                month_index: 3,
                quantity: dec!(1),
                salary_override: None,
            },
        ],
        attrition_pct: MonthlySchedule::flat(dec!(0.005)),
    };

    let costs = CostModel {
        items: vec![CostItem {
            name: "Opex Fixo".into(),
            nature: CostNature::Fixed,
            allocation: CostAllocation::Opex,
            cost_center: CostCenter::Gna,
            base_amount: dec!(120000),
            variable_rate: dec!(0),
            driver: "revenue".into(),
            price_adjustment: Default::default(),
            schedule: MonthlySchedule::one(),
        }],
        supplier_contracts: vec![],
        cogs_variable_pct: dec!(0.16),
        cogs_per_customer: dec!(0),
    };

    let taxes = TaxModel {
        regime: TaxRegime::LucroPresumido,
        taxes: vec![
            TaxComponent {
                name: "PIS/COFINS".into(),
                base: TaxBase::GrossRevenue,
                rate: dec!(0.0365),
                deductible: false,
            },
            TaxComponent {
                name: "ISS".into(),
                base: TaxBase::NetRevenue,
                rate: dec!(0.03),
                deductible: false,
            },
        ],
        progressive: vec![],
        credits: vec![],
        effective_income_tax_rate: dec!(0.24),
    };

    let capex = CapexModel {
        items: vec![CapexItem {
            name: "Plataforma".into(),
            month_index: 0,
            amount: dec!(450000),
            useful_life_months: 36,
            salvage_value: dec!(0),
        }],
    };

    let working_capital = WorkingCapitalModel {
        dso: dec!(30),
        dpo: dec!(35),
        dio: dec!(0),
        min_cash_balance: dec!(100000),
    };

    let funding = FundingModel {
        equity_rounds: vec![EquityRound {
            name: "Seed".into(),
            month_index: 0,
            amount: dec!(3000000),
            post_money_valuation: dec!(12000000),
            dilution_pct: dec!(0.2),
        }],
        debt: vec![],
    };

    let valuation = ValuationSettings {
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
    };

    ScenarioInput {
        meta: ScenarioMeta {
            id: "sample-base".into(),
            name: "Base".into(),
            scenario_type: Default::default(),
            timezone: "America/Sao_Paulo".into(),
            description: None,
        },
        currency: CurrencySettings {
            base_currency: "BRL".into(),
            display_currency: "BRL".into(),
            fx_rate: dec!(1.0),
        },
        timeframe: TimeframeSettings {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            months: 36,
        },
        company_state: CompanyState {
            as_of: NaiveDate::from_ymd_opt(2023, 12, 31).expect("valid date"),
            cash: dec!(2500000),
            accounts_receivable: dec!(100000),
            accounts_payable: dec!(90000),
            inventory: dec!(0),
            fixed_assets: dec!(450000),
            accumulated_depreciation: dec!(0),
            debt: dec!(0),
            equity: dec!(5000000),
        },
        revenue,
        headcount,
        costs,
        taxes,
        capex,
        working_capital,
        funding,
        valuation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sample_scenario_validates() {
        let scenario = sample_scenario();
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn sample_scenario_has_one_revenue_plan_and_five_roles() {
        let scenario = sample_scenario();
        assert_eq!(scenario.revenue.plans.len(), 1);
        assert_eq!(scenario.headcount.positions.len(), 5);
    }
}
