//! The three financial statements, the monthly/annual projection records
//! that wrap them, and the dashboard series built from a finished run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::costs::CostBreakdown;
use crate::headcount::HeadcountCostBreakdown;
use crate::revenue::RevenueSummary;
use crate::taxes::TaxBreakdown;
use crate::types::Money;
use crate::valuation::ValuationResult;
use crate::working_capital::WorkingCapitalDelta;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub gross_revenue: Money,
    pub revenue_taxes: Money,
    pub net_revenue: Money,
    pub cogs: Money,
    pub gross_margin: Money,
    pub operating_expenses: Money,
    pub ebitda: Money,
    pub depreciation: Money,
    pub amortization: Money,
    pub ebit: Money,
    pub interest: Money,
    pub ebt: Money,
    pub income_tax: Money,
    pub net_income: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub cash: Money,
    pub accounts_receivable: Money,
    pub inventory: Money,
    pub fixed_assets: Money,
    pub accumulated_depreciation: Money,
    pub accounts_payable: Money,
    pub debt: Money,
    pub equity: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowStatement {
    pub operating_cash_flow: Money,
    pub investing_cash_flow: Money,
    pub financing_cash_flow: Money,
    pub net_change_in_cash: Money,
    pub ending_cash: Money,
    pub fcff: Money,
    pub fcfe: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyProjection {
    pub period_start: NaiveDate,
    pub income_statement: IncomeStatement,
    pub balance_sheet: BalanceSheet,
    pub cash_flow: CashFlowStatement,
    pub revenue_summary: RevenueSummary,
    pub headcount_breakdown: Vec<HeadcountCostBreakdown>,
    pub cost_breakdown: Vec<CostBreakdown>,
    pub tax_breakdown: Vec<TaxBreakdown>,
    pub working_capital_delta: WorkingCapitalDelta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualSummary {
    pub year: i32,
    pub income_statement: IncomeStatement,
    pub cash_flow: CashFlowStatement,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSlice {
    pub name: String,
    pub data: serde_json::Value,
}

/// The full output of a scenario run: every month's three statements, the
/// annual roll-up, the valuation layer, and the dashboard series derived
/// from both. Named `ScenarioOutput` rather than `ScenarioResult` to avoid
/// colliding with this crate's `Result<T, ScenarioError>` alias.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutput {
    pub monthly: Vec<MonthlyProjection>,
    pub annual: Vec<AnnualSummary>,
    pub valuation: ValuationResult,
    pub dashboards: Vec<DashboardSlice>,
    /// Non-fatal observations surfaced during the run (e.g. a perpetuity
    /// terminal value computed with no annual history because the
    /// projection horizon was shorter than a year).
    pub warnings: Vec<String>,
}
