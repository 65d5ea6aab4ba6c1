//! The monthly simulation loop: wires every sub-model's evaluator together,
//! carries running state month to month, and rolls the result up into
//! annual summaries, a valuation, and dashboard series.

use std::collections::HashMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde_json::json;

use crate::capex::{compute_depreciation, DepreciationLedger};
use crate::costs::compute_costs;
use crate::date_util::add_months;
use crate::funding::{compute_debt, funding_inflows, DebtState};
use crate::headcount::{compute_headcount, HeadcountState};
use crate::results::{AnnualSummary, BalanceSheet, CashFlowStatement, DashboardSlice, IncomeStatement, MonthlyProjection, ScenarioOutput};
use crate::revenue::{compute_revenue, PlanState};
use crate::scenario::ScenarioInput;
use crate::taxes::compute_revenue_taxes;
use crate::types::Money;
use crate::valuation::{compute_multiples, compute_scorecard, compute_terminal_value, compute_vc_method, monthly_discount_factor, DiscountedCashFlowResult, ValuationResult};
use crate::working_capital::compute_working_capital;
use crate::ScenarioResult;

/// Runs the full month-by-month simulation for `scenario` and derives the
/// valuation and dashboard layers from the result.
///
/// Validates the scenario first; once validation passes, the loop itself
/// never fails — degenerate economics saturate or divide out to zero
/// rather than panicking or returning an error.
pub fn run(scenario: &ScenarioInput) -> ScenarioResult<ScenarioOutput> {
    scenario.validate()?;

    let months = scenario.timeframe.months;
    let start_date = scenario.timeframe.start_date;

    let mut plan_states: HashMap<String, PlanState> = scenario
        .revenue
        .plans
        .iter()
        .map(|plan| (plan.name.clone(), PlanState::new(plan)))
        .collect();

    let mut headcount_states: HashMap<String, HeadcountState> = scenario
        .headcount
        .positions
        .iter()
        .map(|pos| {
            (
                pos.role.clone(),
                HeadcountState {
                    position: pos.clone(),
                    fte: pos.current_fte,
                    current_salary: pos.base_salary,
                },
            )
        })
        .collect();

    let mut debt_states: Vec<DebtState> = Vec::new();
    let mut depreciation_ledger = DepreciationLedger::new();

    let company_state = &scenario.company_state;
    let mut cash = company_state.cash;
    let mut accounts_receivable = company_state.accounts_receivable;
    let mut accounts_payable = company_state.accounts_payable;
    let mut inventory = company_state.inventory;
    let mut fixed_assets = company_state.fixed_assets;
    let mut accumulated_depreciation = company_state.accumulated_depreciation;
    let mut debt_balance = company_state.debt;
    let mut equity = company_state.opening_equity();

    let mut monthly_results: Vec<MonthlyProjection> = Vec::with_capacity(months as usize);
    let mut annual_accumulators: HashMap<i32, AnnualAccumulator> = HashMap::new();

    for month_index in 0..months {
        let period_start = add_months(start_date, month_index);

        let revenue_summary = compute_revenue(month_index, &scenario.revenue, &mut plan_states);
        let (headcount_breakdown, payroll_total) = compute_headcount(month_index, &scenario.headcount, &mut headcount_states);
        let (cost_breakdown, mut total_cogs, total_opex) = compute_costs(month_index, &scenario.costs, &revenue_summary);

        let total_active_customers: Decimal = plan_states.values().map(|s| s.active_customers).sum();
        total_cogs += scenario.costs.cogs_per_customer * total_active_customers;
        total_cogs += scenario.costs.cogs_variable_pct * revenue_summary.total_net;

        let (revenue_taxes_amount, tax_breakdown) =
            compute_revenue_taxes(revenue_summary.total_gross, revenue_summary.total_net, &scenario.taxes, payroll_total);

        let gross_revenue = revenue_summary.total_gross;
        let net_revenue = revenue_summary.total_net - revenue_taxes_amount;

        let gross_margin = net_revenue - total_cogs;
        let operating_expenses = total_opex + payroll_total;
        let ebitda = gross_margin - operating_expenses;

        let (depreciation, new_accumulated_depreciation, new_fixed_assets) =
            compute_depreciation(month_index, &scenario.capex, &mut depreciation_ledger, fixed_assets, accumulated_depreciation);
        accumulated_depreciation = new_accumulated_depreciation;
        fixed_assets = new_fixed_assets;

        let amortization = Decimal::ZERO;
        let ebit = ebitda - depreciation - amortization;

        let (interest_expense, principal_paid) = compute_debt(month_index, &scenario.funding, &mut debt_states);
        let new_debt_draws: Money = scenario
            .funding
            .debt
            .iter()
            .filter(|d| d.month_index == month_index)
            .map(|d| d.amount)
            .sum();
        debt_balance += new_debt_draws;
        debt_balance -= principal_paid;

        let ebt = ebit - interest_expense;
        let income_tax = ebt.max(Decimal::ZERO) * scenario.taxes.effective_income_tax_rate;
        let net_income = ebt - income_tax;

        let working_capital_delta = compute_working_capital(
            &scenario.working_capital,
            net_revenue,
            total_cogs + operating_expenses,
            &revenue_summary,
            accounts_receivable,
            accounts_payable,
            inventory,
        );
        accounts_receivable += working_capital_delta.change_ar;
        accounts_payable += working_capital_delta.change_ap;
        inventory += working_capital_delta.change_inventory;

        let capex_amount: Money = scenario
            .capex
            .items
            .iter()
            .filter(|item| item.month_index == month_index)
            .map(|item| item.amount)
            .sum();

        let operating_cash_flow = net_income + depreciation + amortization - working_capital_delta.total_change;
        let investing_cash_flow = -capex_amount;

        let (equity_raise, debt_inflows) = funding_inflows(month_index, &scenario.funding);
        let mut financing_cash_flow = equity_raise + debt_inflows - principal_paid - interest_expense;

        let fcff = ebit * (Decimal::ONE - scenario.taxes.effective_income_tax_rate) + depreciation + amortization
            - working_capital_delta.total_change
            - capex_amount;
        let fcfe = fcff - principal_paid + debt_inflows;

        let net_change_in_cash = operating_cash_flow + investing_cash_flow + financing_cash_flow;
        cash += net_change_in_cash;

        if cash < scenario.working_capital.min_cash_balance {
            // The shortfall backstop tops up cash and financing flow after
            // `net_change_in_cash` has already been computed, so the two
            // are deliberately left inconsistent in a backstopped month —
            // preserved from the reference model rather than reconciled.
            let shortfall = scenario.working_capital.min_cash_balance - cash;
            cash += shortfall;
            financing_cash_flow += shortfall;
            equity += shortfall;
        }

        equity += net_income + equity_raise;

        let income_statement = IncomeStatement {
            gross_revenue,
            revenue_taxes: revenue_taxes_amount,
            net_revenue,
            cogs: total_cogs,
            gross_margin,
            operating_expenses,
            ebitda,
            depreciation,
            amortization,
            ebit,
            interest: interest_expense,
            ebt,
            income_tax,
            net_income,
        };

        let balance_sheet = BalanceSheet {
            cash,
            accounts_receivable,
            inventory,
            fixed_assets,
            accumulated_depreciation,
            accounts_payable,
            debt: debt_balance,
            equity,
        };

        let cash_flow = CashFlowStatement {
            operating_cash_flow,
            investing_cash_flow,
            financing_cash_flow,
            net_change_in_cash,
            ending_cash: cash,
            fcff,
            fcfe,
        };

        annual_accumulators
            .entry(period_start.year())
            .or_default()
            .accumulate(&income_statement, &cash_flow);

        monthly_results.push(MonthlyProjection {
            period_start,
            income_statement,
            balance_sheet,
            cash_flow,
            revenue_summary,
            headcount_breakdown,
            cost_breakdown,
            tax_breakdown,
            working_capital_delta,
        });
    }

    let annual_summaries = build_annual_summaries(annual_accumulators);
    let valuation = build_valuation(&monthly_results, &annual_summaries, scenario);
    let dashboards = build_dashboards(&monthly_results, &valuation);

    Ok(ScenarioOutput {
        monthly: monthly_results,
        annual: annual_summaries,
        valuation,
        dashboards,
        warnings: Vec::new(),
    })
}

#[derive(Default)]
struct AnnualAccumulator {
    gross_revenue: Money,
    revenue_taxes: Money,
    net_revenue: Money,
    cogs: Money,
    operating_expenses: Money,
    ebitda: Money,
    depreciation: Money,
    amortization: Money,
    ebit: Money,
    interest: Money,
    ebt: Money,
    income_tax: Money,
    net_income: Money,
    operating: Money,
    investing: Money,
    financing: Money,
    fcff: Money,
    fcfe: Money,
}

impl AnnualAccumulator {
    fn accumulate(&mut self, income: &IncomeStatement, cash_flow: &CashFlowStatement) {
        self.gross_revenue += income.gross_revenue;
        self.revenue_taxes += income.revenue_taxes;
        self.net_revenue += income.net_revenue;
        self.cogs += income.cogs;
        self.operating_expenses += income.operating_expenses;
        self.ebitda += income.ebitda;
        self.depreciation += income.depreciation;
        self.amortization += income.amortization;
        self.ebit += income.ebit;
        self.interest += income.interest;
        self.ebt += income.ebt;
        self.income_tax += income.income_tax;
        self.net_income += income.net_income;

        self.operating += cash_flow.operating_cash_flow;
        self.investing += cash_flow.investing_cash_flow;
        self.financing += cash_flow.financing_cash_flow;
        self.fcff += cash_flow.fcff;
        self.fcfe += cash_flow.fcfe;
    }
}

fn build_annual_summaries(accumulators: HashMap<i32, AnnualAccumulator>) -> Vec<AnnualSummary> {
    let mut years: Vec<i32> = accumulators.keys().copied().collect();
    years.sort_unstable();

    years
        .into_iter()
        .map(|year| {
            let acc = &accumulators[&year];
            AnnualSummary {
                year,
                income_statement: IncomeStatement {
                    gross_revenue: acc.gross_revenue,
                    revenue_taxes: acc.revenue_taxes,
                    net_revenue: acc.net_revenue,
                    cogs: acc.cogs,
                    gross_margin: acc.net_revenue - acc.cogs,
                    operating_expenses: acc.operating_expenses,
                    ebitda: acc.ebitda,
                    depreciation: acc.depreciation,
                    amortization: acc.amortization,
                    ebit: acc.ebit,
                    interest: acc.interest,
                    ebt: acc.ebt,
                    income_tax: acc.income_tax,
                    net_income: acc.net_income,
                },
                cash_flow: CashFlowStatement {
                    operating_cash_flow: acc.operating,
                    investing_cash_flow: acc.investing,
                    financing_cash_flow: acc.financing,
                    net_change_in_cash: acc.operating + acc.investing + acc.financing,
                    ending_cash: Decimal::ZERO,
                    fcff: acc.fcff,
                    fcfe: acc.fcfe,
                },
            }
        })
        .collect()
}

fn build_valuation(monthly_results: &[MonthlyProjection], annual_summaries: &[AnnualSummary], scenario: &ScenarioInput) -> ValuationResult {
    let wacc = scenario.valuation.wacc;
    let pv_cash_flows: Money = monthly_results
        .iter()
        .enumerate()
        .map(|(i, month)| month.cash_flow.fcff / monthly_discount_factor(wacc, (i + 1) as u32))
        .sum();
    let discount_factors: Vec<Decimal> = (1..=monthly_results.len() as u32).map(|i| monthly_discount_factor(wacc, i)).collect();

    let terminal_value = compute_terminal_value(&scenario.valuation, annual_summaries);
    let pv_terminal = terminal_value / monthly_discount_factor(wacc, monthly_results.len() as u32);
    let enterprise_value = pv_cash_flows + pv_terminal;

    let last_balance = monthly_results.last().map(|m| &m.balance_sheet);
    let equity_value = match last_balance {
        Some(balance) => enterprise_value - balance.debt + balance.cash,
        None => enterprise_value,
    };

    let dcf = DiscountedCashFlowResult {
        enterprise_value,
        equity_value,
        pv_of_cash_flows: pv_cash_flows,
        pv_of_terminal_value: pv_terminal,
        terminal_value,
        discount_factors,
    };

    let multiples = compute_multiples(&scenario.valuation, annual_summaries);
    let vc_method = compute_vc_method(&scenario.valuation, &scenario.funding, annual_summaries);
    let scorecard = compute_scorecard(&scenario.valuation, equity_value);

    ValuationResult {
        dcf,
        multiples,
        vc_method,
        scorecard,
    }
}

fn build_dashboards(monthly_results: &[MonthlyProjection], valuation: &ValuationResult) -> Vec<DashboardSlice> {
    let months: Vec<String> = monthly_results.iter().map(|m| m.period_start.to_string()).collect();
    let net_revenue: Vec<Money> = monthly_results.iter().map(|m| m.income_statement.net_revenue).collect();
    let ebitda: Vec<Money> = monthly_results.iter().map(|m| m.income_statement.ebitda).collect();
    let cash: Vec<Money> = monthly_results.iter().map(|m| m.balance_sheet.cash).collect();
    let fcff: Vec<Money> = monthly_results.iter().map(|m| m.cash_flow.fcff).collect();
    let gross_margin_pct: Vec<Money> = monthly_results
        .iter()
        .map(|m| {
            if m.income_statement.net_revenue.is_zero() {
                Decimal::ZERO
            } else {
                m.income_statement.gross_margin / m.income_statement.net_revenue
            }
        })
        .collect();
    let burn_rate: Vec<Money> = monthly_results
        .iter()
        .map(|m| -(m.cash_flow.operating_cash_flow + m.cash_flow.investing_cash_flow))
        .collect();

    vec![
        DashboardSlice {
            name: "revenue".into(),
            data: json!({ "months": months, "net_revenue": net_revenue, "ebitda": ebitda }),
        },
        DashboardSlice {
            name: "cash".into(),
            data: json!({ "months": months, "cash": cash, "fcff": fcff }),
        },
        DashboardSlice {
            name: "valuation".into(),
            data: json!({
                "enterprise_value": valuation.dcf.enterprise_value,
                "equity_value": valuation.dcf.equity_value,
                "pv_cash_flows": valuation.dcf.pv_of_cash_flows,
                "pv_terminal": valuation.dcf.pv_of_terminal_value,
            }),
        },
        DashboardSlice {
            name: "unit_economics".into(),
            data: json!({ "gross_margin_pct": gross_margin_pct, "burn_rate": burn_rate }),
        },
    ]
}
